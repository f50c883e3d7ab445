//! Generate pull request descriptions from a branch diff with an LLM.

pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod render;

pub use config::GenerationConfig;
pub use error::{GenerateError, GitError};
pub use pipeline::{GenerationPipeline, Stage};
