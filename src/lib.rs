//! apigen - generates layered Go API projects from OpenAPI 3.0 documents

pub mod application;
pub mod generation;
pub mod infrastructure;
