//! # ainotes-inference
//!
//! Text refinement backends for ainotes.
//!
//! This crate provides:
//! - [`OpenAiRefiner`]: refiner for any OpenAI-compatible chat completions
//!   endpoint (the default points at Gemini's compatibility endpoint)
//! - [`RefineConfig`]: endpoint, credential and model configuration
//! - `mock::MockRefiner` (feature `mock`): deterministic refiner for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use ainotes_core::TextRefiner;
//! use ainotes_inference::OpenAiRefiner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let refiner = OpenAiRefiner::from_env().unwrap();
//!     let refined = refiner.refine("i has a idea for the app").await.unwrap();
//!     println!("{}", refined);
//! }
//! ```

pub mod config;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::RefineConfig;
pub use openai::OpenAiRefiner;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockRefiner;
