use crate::core::menu_store::MenuStore;
use crate::core::{MenuItem, Tool, ToolDeclaration};
use crate::utils::error::{MenuAgentError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MENU_TOOL_NAME: &str = "todaysMenu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuToolOutput {
    /// A list of all the items on the menu
    #[serde(rename = "menuData")]
    pub menu_data: Vec<MenuItem>,
}

/// Hands the model the full menu.
#[derive(Debug, Clone)]
pub struct MenuTool {
    menu: MenuStore,
}

impl MenuTool {
    pub fn new(menu: MenuStore) -> Self {
        Self { menu }
    }

    pub fn menu_data(&self) -> MenuToolOutput {
        MenuToolOutput {
            menu_data: self.menu.items().to_vec(),
        }
    }
}

#[async_trait]
impl Tool for MenuTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: MENU_TOOL_NAME.to_string(),
            description: "Use this tool to retrieve all the items on today's menu".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        match input {
            Value::Null | Value::Object(_) => {}
            other => {
                return Err(MenuAgentError::ToolInputError {
                    tool: MENU_TOOL_NAME.to_string(),
                    message: format!("expected an object, got {}", other),
                })
            }
        }

        Ok(serde_json::to_value(self.menu_data())?)
    }
}

/// Tools the model may call, keyed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.declaration().name;
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            tracing::warn!("Tool '{}' registered twice, keeping the latest", name);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.values().map(|tool| tool.declaration()).collect()
    }

    /// Declarations for the given names only; unknown names are an error.
    pub fn declarations_for(&self, names: &[String]) -> Result<Vec<ToolDeclaration>> {
        names
            .iter()
            .map(|name| {
                self.tools
                    .get(name)
                    .map(|tool| tool.declaration())
                    .ok_or_else(|| MenuAgentError::UnknownToolError { name: name.clone() })
            })
            .collect()
    }

    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| MenuAgentError::UnknownToolError {
                name: name.to_string(),
            })?;

        tracing::debug!("Invoking tool '{}' with input {}", name, input);
        tool.invoke(input).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
