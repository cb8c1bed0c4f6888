use crate::adapters::gemini::GeminiClient;
use crate::adapters::storage::LocalStorage;
use crate::config::toml_config::AppConfig;
use crate::core::flow::MenuQuestionFlow;
use crate::core::menu_store::MenuStore;
use crate::core::prompt::PromptTemplate;
use crate::core::tools::{MenuTool, ToolRegistry};
use crate::core::CompletionClient;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Everything a request needs, built once at startup and shared behind an `Arc`.
pub struct AppContext<C: CompletionClient> {
    pub config: AppConfig,
    pub menu: MenuStore,
    pub flow: MenuQuestionFlow<C>,
    pub started_at: DateTime<Utc>,
}

impl<C: CompletionClient> AppContext<C> {
    pub fn new(config: AppConfig, menu: MenuStore, client: C) -> Result<Self> {
        let prompt = match &config.prompt.template_path {
            Some(path) => PromptTemplate::data_menu_from_file(&config.completion.model, path)?,
            None => PromptTemplate::data_menu(&config.completion.model),
        };

        let mut tools = ToolRegistry::new();
        tools.register(MenuTool::new(menu.clone()));

        let flow = MenuQuestionFlow::new(client, prompt, tools)?
            .with_generation(config.completion.generation())
            .with_max_tool_turns(config.completion.max_tool_turns);

        Ok(Self {
            config,
            menu,
            flow,
            started_at: Utc::now(),
        })
    }
}

impl AppContext<GeminiClient> {
    /// Loads the menu and wires the Gemini client from configuration.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let storage = LocalStorage::new(".".to_string());
        let menu = MenuStore::load(&storage, &config.menu.path).await?;
        let client = GeminiClient::from_config(&config.completion)?;
        Self::new(config, menu, client)
    }
}
