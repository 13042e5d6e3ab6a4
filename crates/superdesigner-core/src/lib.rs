pub mod artifact;
pub mod comment;
pub mod config;
pub mod convert;
pub mod error;
pub mod figma;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod project;
pub mod prompts;
pub mod review;
pub mod screens;
pub mod telemetry;
pub mod templates;

pub use error::{DesignError, Result};
