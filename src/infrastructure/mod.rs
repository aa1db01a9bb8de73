//! Infrastructure layer - concrete implementations of domain ports

pub mod openapi;
pub mod output;
pub mod shell;
pub mod templates;

pub use openapi::FileOpenApiLoader;
pub use output::FileSystemOutputService;
pub use shell::ShellCommandExecutor;
pub use templates::TeraTemplateRenderer;
