pub mod context;
pub mod flow;
pub mod menu_store;
pub mod prompt;
pub mod tools;

pub use crate::domain::model::{
    AnswerOutput, CompletionRequest, CompletionResponse, GenerationSettings, MenuItem, Message,
    OutputFormat, Part, QuestionInput, Role, ToolDeclaration, ToolRequest,
};
pub use crate::domain::ports::{CompletionClient, Storage, Tool};
pub use crate::utils::error::Result;
