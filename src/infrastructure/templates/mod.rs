//! Template storage and rendering

pub mod embedded;
pub mod renderer;

pub use embedded::embedded_templates;
pub use renderer::TeraTemplateRenderer;
