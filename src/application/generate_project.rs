//! Use case for generating a Go project from an OpenAPI document

use std::sync::Arc;
use tracing::info;

use crate::application::{ApplicationError, GenerateProjectRequest, GenerateProjectResponse};
use crate::generation::{GenerationPipeline, OpenApiLoader};

/// Loads the document, then runs the pipeline over it
pub struct GenerateProjectUseCase {
    openapi_loader: Arc<dyn OpenApiLoader>,
    pipeline: Arc<GenerationPipeline>,
}

impl GenerateProjectUseCase {
    pub fn new(openapi_loader: Arc<dyn OpenApiLoader>, pipeline: Arc<GenerationPipeline>) -> Self {
        Self {
            openapi_loader,
            pipeline,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateProjectRequest,
    ) -> Result<GenerateProjectResponse, ApplicationError> {
        // 1. Validate request
        let config = request.into_config()?;

        // 2. Load OpenAPI
        let document = self
            .openapi_loader
            .load(&config.spec_file)
            .await
            .map_err(|e| e.in_step("load"))?;
        info!(
            title = %document.info().title,
            version = %document.info().version,
            schemas = document.schemas().len(),
            "Loaded OpenAPI document"
        );

        // 3. Generate
        let report = self.pipeline.execute(&document, &config).await?;

        Ok(GenerateProjectResponse::from_report(
            config.output_dir,
            report,
        ))
    }
}
