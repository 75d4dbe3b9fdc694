// Handler-level tests for the styling actions and the chat loop.

use serde_json::json;
use uuid::Uuid;

use armoire_cli::chat::run_stylist_loop;
use armoire_cli::client::{OutfitRecommendation, ProValidation, StylistReply, TryOnResult};
use armoire_cli::error::CliError;
use armoire_cli::handlers;
use armoire_cli::test_helpers::{MockBackendClient, MockIoHandler};

#[tokio::test]
async fn recommendation_is_rendered_with_reasoning() {
    let client = MockBackendClient::new();
    client
        .recommend_results
        .lock()
        .unwrap()
        .push_back(Ok(OutfitRecommendation {
            summary: "Linen shirt, navy chinos, white sneakers.".to_string(),
            item_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            reasoning: Some("Light fabrics suit the warm evening.".to_string()),
        }));
    let mut io = MockIoHandler::new(vec![]);

    handlers::recommend_with(
        &client,
        &mut io,
        Some("dinner".to_string()),
        Some("warm".to_string()),
    )
    .await
    .unwrap();

    io.expect_output("Linen shirt, navy chinos, white sneakers.");
    io.expect_output("Why: Light fabrics suit the warm evening.");
    io.expect_output("Uses 2 item(s)");
}

#[tokio::test]
async fn try_on_requires_at_least_one_item() {
    let client = MockBackendClient::new();
    let mut io = MockIoHandler::new(vec![]);

    let result = handlers::try_on_with(&client, &mut io, vec![], None).await;

    assert!(matches!(result.unwrap_err(), CliError::Input(_)));
    assert!(client.call_names().is_empty());
}

#[tokio::test]
async fn try_on_prints_the_rendered_image_url() {
    let client = MockBackendClient::new();
    client
        .try_on_results
        .lock()
        .unwrap()
        .push_back(Ok(TryOnResult {
            image_url: "https://cdn.example.com/render/42.jpg".to_string(),
        }));
    let mut io = MockIoHandler::new(vec![]);

    handlers::try_on_with(&client, &mut io, vec![Uuid::new_v4()], None)
        .await
        .unwrap();

    io.expect_output("https://cdn.example.com/render/42.jpg");
}

#[tokio::test]
async fn pro_code_outcomes_are_reported() {
    let client = MockBackendClient::new();
    {
        let mut queue = client.validate_pro_results.lock().unwrap();
        queue.push_back(Ok(ProValidation {
            valid: true,
            plan: Some("annual".to_string()),
        }));
        queue.push_back(Ok(ProValidation {
            valid: false,
            plan: None,
        }));
    }

    let mut io = MockIoHandler::new(vec!["GOOD-CODE"]);
    handlers::handle_validate_pro_action(&client, &mut io)
        .await
        .unwrap();
    io.expect_output("Code accepted. Plan: annual");

    let mut io = MockIoHandler::new(vec!["BAD-CODE"]);
    handlers::handle_validate_pro_action(&client, &mut io)
        .await
        .unwrap();
    io.expect_output("Code rejected.");
}

#[tokio::test]
async fn chat_loop_exchanges_one_turn_and_quits() {
    let client = MockBackendClient::new();
    client
        .chat_results
        .lock()
        .unwrap()
        .push_back(Ok(StylistReply {
            reply: "Try the camel coat over it.".to_string(),
            suggestions: vec!["roll the sleeves".to_string()],
        }));
    let mut io = MockIoHandler::new(vec!["what goes with a white tee?", "quit"]);

    run_stylist_loop(&client, &mut io).await.unwrap();

    io.expect_output("Stylist: Try the camel coat over it.");
    io.expect_output("tip: roll the sleeves");
    assert_eq!(client.call_names(), vec!["stylist_chat".to_string()]);
}

#[tokio::test]
async fn chat_loop_surfaces_business_messages_verbatim() {
    let client = MockBackendClient::new();
    client
        .chat_results
        .lock()
        .unwrap()
        .push_back(Err(CliError::Business {
            code: Some(500),
            message: "model unavailable".to_string(),
            envelope: json!({"code": 500}),
        }));
    let mut io = MockIoHandler::new(vec!["hello", "quit"]);

    run_stylist_loop(&client, &mut io).await.unwrap();

    io.expect_output("model unavailable");
}

#[tokio::test]
async fn chat_loop_gives_connectivity_guidance_on_timeout() {
    let client = MockBackendClient::new();
    client
        .chat_results
        .lock()
        .unwrap()
        .push_back(Err(CliError::Timeout));
    let mut io = MockIoHandler::new(vec!["hello", "quit"]);

    run_stylist_loop(&client, &mut io).await.unwrap();

    io.expect_output("Connection problem");
    io.expect_output("Request timeout. Please check your connection.");
}

#[tokio::test]
async fn chat_loop_skips_empty_input_without_calling_the_backend() {
    let client = MockBackendClient::new();
    let mut io = MockIoHandler::new(vec!["", "exit"]);

    run_stylist_loop(&client, &mut io).await.unwrap();

    assert!(client.call_names().is_empty());
}
