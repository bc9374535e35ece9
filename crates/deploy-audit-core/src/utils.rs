//! Utility functions for phase implementations.

pub mod yaml;

// Re-export commonly used utilities for phase implementations
#[doc(inline)]
pub use yaml::{
    as_mapping, is_truthy, mapping_keys, read_mapping, scalar_to_string, to_json, YamlError,
};
