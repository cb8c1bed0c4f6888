pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::{gemini::GeminiClient, storage::LocalStorage};
pub use config::{AppConfig, CliArgs};
pub use self::core::{context::AppContext, flow::MenuQuestionFlow, menu_store::MenuStore};
pub use domain::model::{AnswerOutput, MenuItem, QuestionInput};
pub use utils::error::{MenuAgentError, Result};
