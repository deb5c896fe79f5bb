use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use shoply_agent::catalog_tool::GetProductsTool;
use shoply_agent::llm::LlmError;
use shoply_agent::openai::OpenAiCompatClient;
use shoply_agent::runtime::AgentRuntime;
use shoply_agent::tools::ToolRegistry;
use shoply_core::catalog::HttpCatalogClient;
use shoply_core::config::{AppConfig, ConfigError, LoadOptions};
use shoply_core::errors::CatalogError;

pub struct Application {
    pub config: AppConfig,
    pub runtime: AgentRuntime,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog client initialization failed: {0}")]
    Catalog(#[source] CatalogError),
    #[error("language model client initialization failed: {0}")]
    Llm(#[source] LlmError),
}

#[allow(dead_code)]
pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = HttpCatalogClient::new(&config.catalog).map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        products_url = %catalog.products_url(),
        "catalog client initialized"
    );

    let llm = OpenAiCompatClient::new(&config.llm).map_err(BootstrapError::Llm)?;
    info!(
        event_name = "system.bootstrap.llm_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        "language model client initialized"
    );

    let mut tools = ToolRegistry::default();
    tools.register(GetProductsTool::new(Arc::new(catalog)));
    info!(
        event_name = "system.bootstrap.tools_registered",
        correlation_id = "bootstrap",
        tool_count = tools.len(),
        "tool registry initialized"
    );

    let runtime = AgentRuntime::new(Arc::new(llm), tools);
    info!(
        event_name = "system.bootstrap.completed",
        correlation_id = "bootstrap",
        "application bootstrap completed"
    );

    Ok(Application { config, runtime })
}
