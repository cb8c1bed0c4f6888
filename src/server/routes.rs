//! HTTP routes for the menu flow

use crate::core::context::AppContext;
use crate::core::{CompletionClient, QuestionInput};
use crate::utils::error::{MenuAgentError, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub menu_items: usize,
    pub started_at: DateTime<Utc>,
}

/// How the caller wrapped its input; the answer is wrapped the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"question": ...}` in, `{"answer": ...}` out
    Bare,
    /// `{"data": {...}}` in, `{"result": {...}}` out
    Data,
}

/// Checks the body against the `QuestionInput` shape before it reaches the flow.
pub fn parse_question(body: Value) -> Result<(QuestionInput, Envelope)> {
    let (payload, envelope) = match body {
        Value::Object(mut map) if !map.contains_key("question") => match map.remove("data") {
            Some(data) => (data, Envelope::Data),
            None => (Value::Object(map), Envelope::Bare),
        },
        other => (other, Envelope::Bare),
    };

    let question = match &payload {
        Value::Object(map) => match map.get("question") {
            Some(Value::String(question)) => question.clone(),
            Some(other) => {
                return Err(MenuAgentError::ValidationError {
                    message: format!("'question' must be a string, got {}", json_kind(other)),
                })
            }
            None => {
                return Err(MenuAgentError::ValidationError {
                    message: "missing required field 'question'".to_string(),
                })
            }
        },
        other => {
            return Err(MenuAgentError::ValidationError {
                message: format!("request body must be a JSON object, got {}", json_kind(other)),
            })
        }
    };

    Ok((QuestionInput { question }, envelope))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub async fn menu_question<C: CompletionClient + 'static>(
    State(context): State<Arc<AppContext<C>>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = body.map_err(|rejection| MenuAgentError::ValidationError {
        message: rejection.body_text(),
    })?;
    let (input, envelope) = parse_question(body)?;

    let started = Instant::now();
    let output = context.flow.run(input).await.map_err(|e| {
        error!("❌ Menu question failed: {}", e);
        e
    })?;
    info!("✅ Answered menu question in {:?}", started.elapsed());

    let output = serde_json::to_value(output)?;
    Ok(Json(match envelope {
        Envelope::Bare => output,
        Envelope::Data => json!({ "result": output }),
    }))
}

pub async fn health<C: CompletionClient + 'static>(
    State(context): State<Arc<AppContext<C>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        menu_items: context.menu.len(),
        started_at: context.started_at,
    })
}

impl IntoResponse for MenuAgentError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = json!({
            "error": {
                "status": self.canonical_status(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_question() {
        let (input, envelope) =
            parse_question(json!({"question": "What burgers do you have?"})).unwrap();
        assert_eq!(input.question, "What burgers do you have?");
        assert_eq!(envelope, Envelope::Bare);
    }

    #[test]
    fn test_parse_data_envelope() {
        let (input, envelope) = parse_question(json!({"data": {"question": ""}})).unwrap();
        assert_eq!(input.question, "");
        assert_eq!(envelope, Envelope::Data);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let (input, _) = parse_question(json!({"question": "Fries?", "table": 4})).unwrap();
        assert_eq!(input.question, "Fries?");
    }

    #[test]
    fn test_reject_bad_shapes() {
        for body in [
            json!({"question": 42}),
            json!({"query": "burgers"}),
            json!(["What burgers do you have?"]),
            json!("What burgers do you have?"),
            json!({"data": {"question": null}}),
        ] {
            assert!(
                matches!(parse_question(body.clone()), Err(MenuAgentError::ValidationError { .. })),
                "accepted {}",
                body
            );
        }
    }
}
