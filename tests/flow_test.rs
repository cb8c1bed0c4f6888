mod common;

use common::{context_with, FixedClient, MenuAwareClient, TimeoutClient};
use menu_agent::{AppConfig, AppContext, MenuAgentError, QuestionInput};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::TempDir;

fn question(text: &str) -> QuestionInput {
    QuestionInput {
        question: text.to_string(),
    }
}

#[tokio::test]
async fn test_one_completion_call_per_question() {
    let client = Arc::new(FixedClient::new("We have a Classic Burger for $8.50."));
    let context = context_with(client.clone());

    let output = context
        .flow
        .run(question("What burgers do you have?"))
        .await
        .unwrap();

    assert_eq!(output.answer, "We have a Classic Burger for $8.50.");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    // No caching: the same question is asked again.
    context
        .flow
        .run(question("What burgers do you have?"))
        .await
        .unwrap();
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_timeout_produces_no_answer() {
    let context = context_with(TimeoutClient);

    let result = context.flow.run(question("What burgers do you have?")).await;

    assert!(matches!(
        result,
        Err(MenuAgentError::CompletionError { status: 504, .. })
    ));
}

#[tokio::test]
async fn test_concurrent_questions_stay_independent() {
    let client = Arc::new(MenuAwareClient::default());
    let context = Arc::new(context_with(client.clone()));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let context = Arc::clone(&context);
            tokio::spawn(async move {
                let asked = format!("question #{}", i);
                let output = context.flow.run(question(&asked)).await.unwrap();
                (asked, output.answer)
            })
        })
        .collect();

    for handle in handles {
        let (asked, answer) = handle.await.unwrap();
        assert_eq!(answer, format!("{} | 1 item(s)", asked));
    }

    // One tool round per question.
    assert_eq!(client.calls.load(Ordering::SeqCst), 100);
    assert_eq!(context.menu.len(), 1);
    assert_eq!(context.menu.items()[0].title, "Classic Burger");
    assert_eq!(context.menu.items()[0].price, 8.5);
}

#[tokio::test]
async fn test_malformed_menu_fails_startup() {
    let temp_dir = TempDir::new().unwrap();
    let menu_path = temp_dir.path().join("menu.json");
    std::fs::write(&menu_path, r#"[{"title": "Classic Burger", "price": 8.5}]"#).unwrap();

    let mut config = AppConfig::default();
    config.menu.path = menu_path.to_str().unwrap().to_string();
    config.completion.base_url = Some("http://127.0.0.1:1/v1/models".to_string());

    let result = AppContext::from_config(config).await;
    assert!(matches!(result, Err(MenuAgentError::MenuDataError { .. })));
}

#[tokio::test]
async fn test_missing_menu_fails_startup() {
    let mut config = AppConfig::default();
    config.menu.path = "/nonexistent/menu.json".to_string();
    config.completion.base_url = Some("http://127.0.0.1:1/v1/models".to_string());

    let result = AppContext::from_config(config).await;
    assert!(matches!(result, Err(MenuAgentError::MenuDataError { .. })));
}

#[tokio::test]
async fn test_context_loads_shipped_menu() {
    let mut config = AppConfig::default();
    config.menu.path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/menu.json").to_string();
    config.completion.base_url = Some("http://127.0.0.1:1/v1/models".to_string());

    let context = AppContext::from_config(config).await.unwrap();
    assert_eq!(context.menu.len(), 8);
    assert_eq!(context.flow.prompt().name, "dataMenu");
}
