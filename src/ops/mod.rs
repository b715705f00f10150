//! High-level operations.
//!
//! This module contains the implementation of modinfo commands.

pub mod generate;

pub use generate::{
    generate, GenerateOptions, GenerateResult, GenerateTask, TaskState, DESCRIPTOR_FILE,
};
