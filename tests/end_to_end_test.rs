//! Full path: HTTP request -> flow -> Gemini client -> fake model -> todaysMenu -> answer.

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use menu_agent::server::router;
use menu_agent::{AppConfig, AppContext, GeminiClient, MenuStore};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

type Recorded = Arc<Mutex<Vec<Value>>>;

/// Calls `todaysMenu` until it sees the tool's answer, then quotes the first item.
async fn fake_generate(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.lock().unwrap().push(body.clone());

    let menu = body["contents"]
        .as_array()
        .into_iter()
        .flatten()
        .flat_map(|content| content["parts"].as_array().cloned().unwrap_or_default())
        .find_map(|part| part.get("functionResponse").cloned());

    match menu {
        None => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"functionCall": {"name": "todaysMenu", "args": {}}}]},
                "finishReason": "STOP"
            }]
        })),
        Some(response) => {
            let item = &response["response"]["menuData"][0];
            let text = format!(
                "We have a {} for ${:.2}.",
                item["title"].as_str().unwrap_or("?"),
                item["price"].as_f64().unwrap_or_default()
            );
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": text}]},
                    "finishReason": "STOP"
                }]
            }))
        }
    }
}

async fn start_fake_model() -> (String, Recorded) {
    let recorded: Recorded = Arc::default();
    let app = Router::new()
        .route("/v1/models/:model_call", post(fake_generate))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/models", addr), recorded)
}

#[tokio::test]
async fn test_question_answered_from_menu_tool() {
    let (models_url, recorded) = start_fake_model().await;

    let mut config = AppConfig::default();
    config.completion.base_url = Some(models_url);
    let menu = MenuStore::from_json_str(
        r#"[{"title":"Classic Burger","description":"Beef patty, lettuce, tomato","price":8.5}]"#,
    )
    .unwrap();
    let client = GeminiClient::from_config(&config.completion).unwrap();
    let context = AppContext::new(config, menu, client).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/menuQuestion")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"question": "What burgers do you have?"}"#))
        .unwrap();
    let response = router(Arc::new(context)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"answer": "We have a Classic Burger for $8.50."}));

    let calls = recorded.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0]["tools"][0]["functionDeclarations"][0]["name"],
        "todaysMenu"
    );
    let followup = calls[1]["contents"].as_array().unwrap();
    assert_eq!(followup.len(), 3);
    assert_eq!(followup[1]["role"], "model");
    assert_eq!(
        followup[2]["parts"][0]["functionResponse"],
        json!({
            "name": "todaysMenu",
            "response": {"menuData": [
                {"title": "Classic Burger", "description": "Beef patty, lettuce, tomato", "price": 8.5}
            ]}
        })
    );
}
