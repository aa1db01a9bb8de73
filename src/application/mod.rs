//! Application layer - the use cases the CLI drives

pub mod dto;
pub mod errors;
pub mod generate_project;

pub use dto::*;
pub use errors::*;
pub use generate_project::*;
