//! # ainotes-core
//!
//! Core types, traits, and abstractions for the ainotes note-taking library.
//!
//! This crate provides the note model and the collaborator traits that the
//! other ainotes crates implement (local cache, remote store, text refiner)
//! or consume (the reconciliation engine in `ainotes-sync`).

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;
pub mod view;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
pub use view::SortOption;
