//! Generation pipeline - coordinates the generation workflow
//!
//! Steps run in a fixed order, each gated by the feature set. Failures that
//! invalidate the run abort with a `StepFailed` naming the step; failures
//! scoped to one artifact or operation are logged, recorded in the report
//! and skipped.
//!
//! Every file passes through the merge protocol: stable files are written
//! only when absent (or with overwrite), derived files on every run.

use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::generation::domain_types::{build_types, is_struct_schema};
use crate::generation::layout::{
    ProjectLayout, app_name_from_module, default_module_path, mutability_of, parse_module_path,
};
use crate::generation::operations::{OperationResolver, ResourceGroup, group_by_resource};
use crate::generation::repositories::build_repository;
use crate::generation::service_adapters::{build_service_adapter, service_for_group};
use crate::generation::services::build_service;
use crate::generation::utils::to_package_name;
use crate::generation::wiring::build_wiring;
use crate::generation::{
    Artifact, ArtifactOutcome, CommandExecutor, GenerationConfig, GenerationError,
    GenerationReport, OutputService, ProjectInfo, RenderContext, TemplateRenderer, WriteDecision,
};
use crate::infrastructure::openapi::ApiDocument;

/// Modules fetched into a freshly initialized project
const GO_DEPENDENCIES: &[&str] = &[
    "github.com/go-chi/chi/v5",
    "github.com/go-chi/cors",
    "github.com/joho/godotenv",
    "go.mongodb.org/mongo-driver/mongo",
];

/// Mutable state of one run
struct Run<'a> {
    document: &'a ApiDocument,
    config: &'a GenerationConfig,
    layout: ProjectLayout,
    project: ProjectInfo,
    /// Schemas selected for generation
    resources: Vec<String>,
    /// Selected schemas that get a service and a repository
    service_resources: Vec<String>,
    groups: Vec<ResourceGroup>,
    report: GenerationReport,
}

impl Run<'_> {
    fn context(&self) -> Result<RenderContext, GenerationError> {
        RenderContext::for_project(&self.project)
    }
}

/// Orchestrates the code generation workflow
pub struct GenerationPipeline {
    renderer: Arc<dyn TemplateRenderer>,
    output: Arc<dyn OutputService>,
    executor: Arc<dyn CommandExecutor>,
}

impl GenerationPipeline {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        output: Arc<dyn OutputService>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            renderer,
            output,
            executor,
        }
    }

    /// Execute the generation workflow
    pub async fn execute(
        &self,
        document: &ApiDocument,
        config: &GenerationConfig,
    ) -> Result<GenerationReport, GenerationError> {
        config.validate()?;
        let features = config.features;

        // 1. Resolve resources
        let resources =
            resolve_resources(document, config).map_err(|e| e.in_step("resolve resources"))?;
        let service_resources = resources
            .iter()
            .filter(|name| document.schema(name).is_some_and(is_struct_schema))
            .cloned()
            .collect();

        // 2. Module
        self.output
            .ensure_directory(&config.output_dir)
            .await
            .map_err(|e| e.in_step("prepare output"))?;
        let module_path = self
            .detect_module(config)
            .await
            .map_err(|e| e.in_step("module"))?;
        let app_name = app_name_from_module(&module_path);

        let mut run = Run {
            document,
            config,
            layout: ProjectLayout::new(&app_name),
            project: ProjectInfo {
                module_path,
                app_name,
                package_name: config.package_name.clone(),
                api_title: document.info().title.clone(),
                api_version: document.info().version.clone(),
                features,
            },
            resources,
            service_resources,
            groups: Vec::new(),
            report: GenerationReport::default(),
        };
        info!(
            module = %run.project.module_path,
            resources = run.resources.len(),
            "Starting generation"
        );

        self.write_go_mod(&mut run)
            .await
            .map_err(|e| e.in_step("module"))?;

        // 3. Project skeleton and entrypoint
        if features.init {
            self.init_project(&mut run)
                .await
                .map_err(|e| e.in_step("init"))?;
        }

        // 4. Domain types
        if features.types {
            self.generate_types(&mut run)
                .await
                .map_err(|e| e.in_step("types"))?;
        }
        self.generate_domain_errors(&mut run)
            .await
            .map_err(|e| e.in_step("types"))?;

        // 5. Services
        if features.needs_services() {
            self.generate_services(&mut run)
                .await
                .map_err(|e| e.in_step("services"))?;
        }

        // 6. Persistence
        if features.persistence {
            self.generate_repositories(&mut run)
                .await
                .map_err(|e| e.in_step("persistence"))?;
        }

        // 7. HTTP handlers
        if features.http {
            self.generate_http(&mut run)
                .await
                .map_err(|e| e.in_step("http"))?;
        }

        // 8. Wiring reflects everything this run produced
        if features.affects_wiring() {
            self.generate_wiring(&mut run)
                .await
                .map_err(|e| e.in_step("wiring"))?;
        }

        // 9. Environment defaults and dependencies
        if features.init {
            let context = run.context().map_err(|e| e.in_step("init"))?;
            self.emit(&mut run, "project/.env", "project/env", &context)
                .await;

            if !config.skip_deps {
                self.fetch_dependencies(&mut run).await;
            }
        }

        self.format_sources(&mut run).await;

        info!(
            written = run.report.written().count(),
            skipped = run.report.skipped().count(),
            failed = run.report.failed().count(),
            "Generation finished"
        );
        Ok(run.report)
    }

    async fn detect_module(&self, config: &GenerationConfig) -> Result<String, GenerationError> {
        let go_mod = self.output.read_file(&config.output_dir.join("go.mod")).await?;
        let declared = go_mod.as_deref().and_then(parse_module_path);
        Ok(declared.unwrap_or_else(|| default_module_path(&config.output_dir)))
    }

    /// `go.mod` belongs to the user once it exists, even with overwrite
    async fn write_go_mod(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let logical_name = "project/go.mod";
        let relative = run.layout.resolve(logical_name);
        if self.output.exists(&run.config.output_dir.join(&relative)).await {
            debug!(module = %run.project.module_path, "Using existing go.mod");
            return Ok(());
        }

        let context = run.context()?;
        self.emit(run, logical_name, "project/go.mod", &context).await;
        Ok(())
    }

    async fn init_project(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        for dir in run.layout.skeleton() {
            self.output
                .ensure_directory(&run.config.output_dir.join(dir))
                .await?;
        }

        let context = run.context()?;
        self.emit(run, "cmd/main.go", "cmd/main.go", &context).await;
        self.generate_wiring(run).await
    }

    async fn generate_types(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let logical_name = "domain/types.go";
        // every schema, so cross references inside the file always resolve
        match build_types(run.document.schemas(), run.config.mapping_policy) {
            Ok(types) => {
                let context = run.context()?.with("types", &types)?;
                self.emit(run, logical_name, "domain/types.go", &context)
                    .await;
            }
            Err(e) => self.record_failure(run, logical_name, e),
        }
        Ok(())
    }

    async fn generate_domain_errors(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let context = run.context()?;
        self.emit(run, "domain/errors.go", "domain/errors.go", &context)
            .await;
        Ok(())
    }

    async fn generate_services(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let resolver = OperationResolver::new(run.document, &run.config.package_name);

        for name in run.service_resources.clone() {
            let Some(schema) = run.document.schema(&name) else {
                continue;
            };
            let crud = resolver.crud_operations(&name);
            let service = build_service(&name, schema, &crud);
            let context = run.context()?.with("service", &service)?;

            let dir = format!("services/{}", service.package);
            self.emit(run, &format!("{dir}/service.go"), "service/service.go", &context)
                .await;
            self.emit(
                run,
                &format!("{dir}/service_test.go"),
                "service/service_test.go",
                &context,
            )
            .await;
        }
        Ok(())
    }

    async fn generate_repositories(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        for name in run.service_resources.clone() {
            let Some(schema) = run.document.schema(&name) else {
                continue;
            };
            let repository = build_repository(&name, schema);
            let context = run.context()?.with("repository", &repository)?;

            let dir = format!("repository/{}", repository.package);
            self.emit(
                run,
                &format!("{dir}/repository.go"),
                "repository/repository.go",
                &context,
            )
            .await;
            self.emit(
                run,
                &format!("{dir}/repository_test.go"),
                "repository/repository_test.go",
                &context,
            )
            .await;
        }
        Ok(())
    }

    async fn generate_http(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let resolver = OperationResolver::new(run.document, &run.config.package_name);
        let (mut descriptors, errors) = resolver.resolve_all();
        for error in errors {
            let operation_id = match &error {
                GenerationError::OperationResolutionError { operation_id, .. }
                | GenerationError::OperationNotFound(operation_id) => operation_id.clone(),
                _ => "unknown".to_string(),
            };
            self.record_failure(run, &format!("operation/{operation_id}"), error);
        }

        if let Some(filter) = &run.config.schema_filter {
            let selected = to_package_name(filter);
            descriptors.retain(|d| to_package_name(&d.resource_tag) == selected);
        }

        let context = run.context()?;
        self.emit(run, "httputil/http_utils.go", "httputil/http_utils.go", &context)
            .await;
        self.emit(
            run,
            "httputil/handler_wrapper.go",
            "httputil/handler_wrapper.go",
            &context,
        )
        .await;

        let groups = group_by_resource(&descriptors);
        for group in &groups {
            let dir = format!("http/{}", group.domain);
            let summary = json!({ "name": group.name, "domain": group.domain });

            for operation in &group.operations {
                let context = run
                    .context()?
                    .with("group", &summary)?
                    .with("operation", operation)?;
                self.emit(
                    run,
                    &format!("{dir}/{}_handler.go", operation.file_stem),
                    "http/handler.go",
                    &context,
                )
                .await;
                self.emit(
                    run,
                    &format!("{dir}/{}_handler_test.go", operation.file_stem),
                    "http/handler_test.go",
                    &context,
                )
                .await;
            }

            let context = run.context()?.with("group", group)?;
            self.emit(
                run,
                &format!("{dir}/handler.go"),
                "http/registration.go",
                &context,
            )
            .await;
            self.emit(
                run,
                &format!("{dir}/mock_service_test.go"),
                "http/mock_service.go",
                &context,
            )
            .await;

            if let Some(resource) = service_for_group(group, &run.service_resources) {
                let crud = resolver.crud_operations(resource);
                let adapter = build_service_adapter(group, resource, &crud);
                let context = run.context()?.with("adapter", &adapter)?;
                self.emit(
                    run,
                    &format!("{dir}/service_adapter.go"),
                    "http/service_adapter.go",
                    &context,
                )
                .await;
            }
        }

        run.groups = groups;
        self.generate_wiring(run).await
    }

    /// Routing and storage wiring, always rewritten
    async fn generate_wiring(&self, run: &mut Run<'_>) -> Result<(), GenerationError> {
        let wiring = build_wiring(
            &run.config.features,
            &run.service_resources,
            &run.groups,
        );
        let context = run.context()?.with("wiring", &wiring)?;
        self.emit(run, "cmd/routes.go", "cmd/routes.go", &context)
            .await;
        self.emit(run, "cmd/database.go", "cmd/database.go", &context)
            .await;
        Ok(())
    }

    /// Render and write one artifact; failures stay scoped to it
    async fn emit(
        &self,
        run: &mut Run<'_>,
        logical_name: &str,
        template_id: &str,
        context: &RenderContext,
    ) {
        match self.renderer.render(template_id, context) {
            Ok(content) => {
                let artifact = Artifact {
                    logical_name: logical_name.to_string(),
                    path: run.layout.resolve(logical_name),
                    content,
                    mutability: mutability_of(logical_name),
                };
                self.write_artifact(run, artifact).await;
            }
            Err(e) => self.record_failure(run, logical_name, e),
        }
    }

    async fn write_artifact(&self, run: &mut Run<'_>, artifact: Artifact) {
        let target = run.config.output_dir.join(&artifact.path);
        let exists = self.output.exists(&target).await;

        match WriteDecision::decide(artifact.mutability, exists, run.config.overwrite) {
            WriteDecision::SkipExisting => {
                info!(
                    artifact = %artifact.logical_name,
                    path = %artifact.path.display(),
                    "File already exists, use --overwrite to replace"
                );
                run.report.record(
                    &artifact.logical_name,
                    artifact.path,
                    ArtifactOutcome::Skipped,
                );
            }
            WriteDecision::Write => match self.output.write_file(&target, &artifact.content).await
            {
                Ok(()) => {
                    info!(
                        artifact = %artifact.logical_name,
                        path = %artifact.path.display(),
                        "Generated file"
                    );
                    run.report.record(
                        &artifact.logical_name,
                        artifact.path,
                        ArtifactOutcome::Written,
                    );
                }
                Err(e) => {
                    warn!(artifact = %artifact.logical_name, error = %e, "Failed to write artifact");
                    run.report.record(
                        &artifact.logical_name,
                        artifact.path,
                        ArtifactOutcome::Failed(e.to_string()),
                    );
                }
            },
        }
    }

    fn record_failure(&self, run: &mut Run<'_>, logical_name: &str, error: GenerationError) {
        warn!(artifact = %logical_name, error = %error, "Skipping artifact");
        let path = if logical_name.starts_with("operation/") {
            PathBuf::new()
        } else {
            run.layout.resolve(logical_name)
        };
        run.report
            .record(logical_name, path, ArtifactOutcome::Failed(error.to_string()));
    }

    async fn fetch_dependencies(&self, run: &mut Run<'_>) {
        for dependency in GO_DEPENDENCIES {
            self.run_dependency_command(run, &format!("go get {dependency}"))
                .await;
        }
        self.run_dependency_command(run, "go mod tidy").await;
    }

    /// Dependency failures never abort generation
    async fn run_dependency_command(&self, run: &mut Run<'_>, command: &str) {
        let warning = match self.executor.execute(command, &run.config.output_dir).await {
            Ok(result) if result.is_success() => {
                debug!(command, "Dependency command succeeded");
                return;
            }
            Ok(result) => GenerationError::DependencyFetchWarning(format!(
                "`{command}` exited with code {}: {}",
                result.exit_code,
                result.stderr.trim()
            )),
            Err(e) => GenerationError::DependencyFetchWarning(format!("`{command}`: {e}")),
        };
        warn!(error = %warning, "Dependency fetch failed");
        run.report.warn(warning.to_string());
    }

    async fn format_sources(&self, run: &mut Run<'_>) {
        let wrote_go = run
            .report
            .written()
            .any(|entry| entry.path.extension().is_some_and(|ext| ext == "go"));
        if !wrote_go {
            return;
        }

        match self.executor.execute("gofmt -w .", &run.config.output_dir).await {
            Ok(result) if result.is_success() => debug!("Formatted generated sources"),
            Ok(result) => debug!(stderr = %result.stderr.trim(), "gofmt reported errors"),
            Err(e) => debug!(error = %e, "gofmt unavailable"),
        }
    }
}

/// Schema names selected by the filter, or every schema in name order
pub fn resolve_resources(
    document: &ApiDocument,
    config: &GenerationConfig,
) -> Result<Vec<String>, GenerationError> {
    match &config.schema_filter {
        Some(name) => match document.schema(name) {
            Some(_) => Ok(vec![name.clone()]),
            None => Err(GenerationError::SchemaNotFound(name.clone())),
        },
        None => {
            let mut names: Vec<String> = document.schemas().keys().cloned().collect();
            names.sort();
            Ok(names)
        }
    }
}
