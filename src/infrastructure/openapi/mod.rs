//! OpenAPI loading: file I/O, parsing and the resolved document model

pub mod file_loader;
pub mod parser;
pub mod types;

pub use file_loader::FileOpenApiLoader;
pub use parser::OpenApiParser;
pub use types::{
    ApiDocument, ApiInfo, HttpMethod, MediaTypeNode, OperationNode, OperationRef,
    ParameterLocation, ParameterNode, PathItem, RequestBodyNode, ResponseNode, SchemaNode,
};
