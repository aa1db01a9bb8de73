//! Generation domain module - turns an OpenAPI document into a Go project
//!
//! Everything here is free of I/O. Loading, rendering, writing and shelling
//! out happen behind the ports in [`traits`], implemented by the
//! infrastructure layer.

pub mod config;
pub mod context;
pub mod domain_types;
pub mod errors;
pub mod layout;
pub mod operations;
pub mod pipeline;
pub mod repositories;
pub mod rules;
pub mod sanitizers;
pub mod service_adapters;
pub mod services;
pub mod traits;
pub mod type_mapper;
pub mod types;
pub mod utils;
pub mod wiring;

pub use config::*;
pub use context::*;
pub use errors::*;
pub use pipeline::*;
pub use traits::*;
pub use types::*;
