use crate::core::{MenuItem, Storage};
use crate::utils::error::{MenuAgentError, Result};
use std::sync::Arc;

/// Read-only menu collection, loaded once at startup.
#[derive(Debug, Clone)]
pub struct MenuStore {
    items: Arc<[MenuItem]>,
}

impl MenuStore {
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        tracing::debug!("Loading menu data from: {}", path);
        let bytes = storage
            .read_file(path)
            .await
            .map_err(|e| MenuAgentError::MenuDataError {
                message: format!("cannot read '{}': {}", path, e),
            })?;

        let store = Self::from_slice(&bytes)?;
        if store.is_empty() {
            tracing::warn!("Menu file '{}' contains no items", path);
        } else {
            tracing::info!("📋 Loaded {} menu items from {}", store.len(), path);
        }
        Ok(store)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let items: Vec<MenuItem> =
            serde_json::from_slice(bytes).map_err(|e| MenuAgentError::MenuDataError {
                message: format!("expected a JSON array of menu items: {}", e),
            })?;
        Self::from_items(items)
    }

    pub fn from_items(items: Vec<MenuItem>) -> Result<Self> {
        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }
        Ok(Self {
            items: items.into(),
        })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn validate_item(index: usize, item: &MenuItem) -> Result<()> {
    let problem = if item.title.trim().is_empty() {
        Some("title is empty")
    } else if item.description.trim().is_empty() {
        Some("description is empty")
    } else if !item.price.is_finite() {
        Some("price is not a finite number")
    } else if item.price < 0.0 {
        Some("price is negative")
    } else {
        None
    };

    match problem {
        Some(reason) => Err(MenuAgentError::MenuDataError {
            message: format!("item {} ('{}'): {}", index, item.title, reason),
        }),
        None => Ok(()),
    }
}
