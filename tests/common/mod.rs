#![allow(dead_code)]

use async_trait::async_trait;
use menu_agent::core::{CompletionClient, CompletionRequest, CompletionResponse, Message, Part};
use menu_agent::{AppConfig, AppContext, MenuAgentError, MenuStore, Result};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const CLASSIC_BURGER_MENU: &str =
    r#"[{"title":"Classic Burger","description":"Beef patty, lettuce, tomato","price":8.5}]"#;

/// Asks for the menu first, then answers with the question and menu size it saw.
#[derive(Default)]
pub struct MenuAwareClient {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CompletionClient for MenuAwareClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let tool_output = request
            .messages
            .iter()
            .flat_map(|m| &m.parts)
            .find_map(|part| match part {
                Part::ToolResponse { output, .. } => Some(output.clone()),
                _ => None,
            });

        match tool_output {
            None => Ok(CompletionResponse {
                message: Message::model(vec![Part::ToolRequest {
                    name: "todaysMenu".to_string(),
                    input: json!({}),
                }]),
                finish_reason: Some("STOP".to_string()),
            }),
            Some(output) => {
                let items = output["menuData"].as_array().map_or(0, |items| items.len());
                Ok(CompletionResponse::from_text(format!(
                    "{} | {} item(s)",
                    question_of(request),
                    items
                )))
            }
        }
    }
}

/// Always answers with the same text.
pub struct FixedClient {
    pub text: String,
    pub calls: AtomicUsize,
}

impl FixedClient {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionClient for FixedClient {
    async fn generate(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CompletionResponse::from_text(self.text.clone()))
    }
}

/// Fails every call the way an upstream deadline does.
pub struct TimeoutClient;

#[async_trait]
impl CompletionClient for TimeoutClient {
    async fn generate(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
        Err(MenuAgentError::CompletionError {
            status: 504,
            message: "Deadline exceeded".to_string(),
        })
    }
}

/// The question as rendered into the `dataMenu` prompt.
pub fn question_of(request: &CompletionRequest) -> String {
    let prompt = match request.messages.first().and_then(|m| m.parts.first()) {
        Some(Part::Text(text)) => text.clone(),
        _ => return String::new(),
    };
    prompt
        .split("Question:\n")
        .nth(1)
        .and_then(|rest| rest.rsplit_once(" ?"))
        .map(|(question, _)| question.to_string())
        .unwrap_or_default()
}

pub fn context_with<C: CompletionClient>(client: C) -> AppContext<C> {
    let menu = MenuStore::from_json_str(CLASSIC_BURGER_MENU).unwrap();
    AppContext::new(AppConfig::default(), menu, client).unwrap()
}
