//! Shared data models for the EcoLens backend.
//!
//! This crate provides Serde-serializable types for:
//! - Bin codes and their presentation mapping (label + accent colour)
//! - Parsed classification results from the vision backend

pub mod classification;

// Re-export common types
pub use classification::{Accent, BinCode, Classification, EXPLANATION_OFFSET};
