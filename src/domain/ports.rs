use crate::domain::model::{CompletionRequest, CompletionResponse, ToolDeclaration};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// A hosted model that turns a conversation into the next model message.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}

/// A capability the model may invoke by name while answering.
#[async_trait]
pub trait Tool: Send + Sync {
    fn declaration(&self) -> ToolDeclaration;
    async fn invoke(&self, input: Value) -> Result<Value>;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<T> {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        (**self).generate(request).await
    }
}
