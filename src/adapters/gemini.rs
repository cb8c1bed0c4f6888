//! Gemini `generateContent` client (Vertex AI or any compatible endpoint).

use crate::config::toml_config::CompletionConfig;
use crate::core::{
    CompletionClient, CompletionRequest, CompletionResponse, Message, OutputFormat, Part, Role,
    ToolDeclaration,
};
use crate::utils::error::{MenuAgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct GeminiClient {
    client: Client,
    models_url: String,
    access_token: Option<String>,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(models_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            models_url: models_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            api_key: None,
        }
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let mut client = Self::new(config.models_url()?);
        client.access_token = config.access_token.clone();
        client.api_key = config.api_key.clone();
        Ok(client)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.models_url, model)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = self.endpoint(&request.model);
        let body = to_wire_request(request);

        tracing::debug!(
            "Making completion request to: {} ({} message(s), {} tool(s))",
            url,
            body.contents.len(),
            request.tools.len()
        );

        let mut builder = self.client.post(&url).json(&body);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            builder = builder.header("x-goog-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(MenuAgentError::CompletionError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        from_wire_response(payload)
    }
}

fn to_wire_request(request: &CompletionRequest) -> GenerateContentRequest {
    let contents = request.messages.iter().map(to_wire_content).collect();

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![WireTool {
            function_declarations: request.tools.iter().map(to_function_declaration).collect(),
        }]
    };

    let generation = &request.generation;
    let response_mime_type = match request.output_format {
        OutputFormat::Text => None,
        OutputFormat::Json => Some("application/json".to_string()),
    };
    let generation_config = if generation.temperature.is_none()
        && generation.max_output_tokens.is_none()
        && response_mime_type.is_none()
    {
        None
    } else {
        Some(GenerationConfig {
            temperature: generation.temperature,
            max_output_tokens: generation.max_output_tokens,
            response_mime_type,
        })
    };

    GenerateContentRequest {
        contents,
        tools,
        generation_config,
    }
}

fn to_wire_content(message: &Message) -> Content {
    // Gemini has no tool role; function responses travel as user content.
    let role = match message.role {
        Role::User | Role::Tool => "user",
        Role::Model => "model",
    };

    let parts = message
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => WirePart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::ToolRequest { name, input } => WirePart {
                function_call: Some(FunctionCall {
                    name: name.clone(),
                    args: Some(input.clone()),
                }),
                ..Default::default()
            },
            Part::ToolResponse { name, output } => WirePart {
                function_response: Some(FunctionResponse {
                    name: name.clone(),
                    response: output.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

fn to_function_declaration(tool: &ToolDeclaration) -> FunctionDeclaration {
    // Vertex rejects OBJECT schemas without properties.
    let has_properties = tool
        .input_schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|props| !props.is_empty());

    FunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: has_properties.then(|| tool.input_schema.clone()),
    }
}

fn from_wire_response(payload: GenerateContentResponse) -> Result<CompletionResponse> {
    let candidate = payload.candidates.into_iter().next().ok_or_else(|| {
        MenuAgentError::MalformedResponseError {
            message: match payload.prompt_feedback {
                Some(feedback) => format!("no candidates returned, prompt feedback: {}", feedback),
                None => "no candidates returned".to_string(),
            },
        }
    })?;

    let content = candidate
        .content
        .ok_or_else(|| MenuAgentError::MalformedResponseError {
            message: format!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
        })?;

    let mut parts = Vec::with_capacity(content.parts.len());
    for part in content.parts {
        if let Some(call) = part.function_call {
            parts.push(Part::ToolRequest {
                name: call.name,
                input: call.args.unwrap_or_else(|| Value::Object(Default::default())),
            });
        } else if let Some(text) = part.text {
            parts.push(Part::Text(text));
        }
    }

    Ok(CompletionResponse {
        message: Message::model(parts),
        finish_reason: candidate.finish_reason,
    })
}
