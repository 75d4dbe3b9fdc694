// Handler-level tests for the wardrobe actions, driven by the scripted
// client and IO doubles.

use reqwest::StatusCode;
use serde_json::json;

use armoire_cli::client::GarmentCategory;
use armoire_cli::error::CliError;
use armoire_cli::handlers;
use armoire_cli::test_helpers::{
    mock_analysis, mock_clothing_item, MockBackendClient, MockIoHandler,
};

fn api_error(status: StatusCode) -> CliError {
    CliError::Api {
        status,
        message: "boom".to_string(),
    }
}

fn business_error(message: &str) -> CliError {
    CliError::Business {
        code: Some(500),
        message: message.to_string(),
        envelope: json!({"code": 500, "message": message}),
    }
}

fn write_temp_png(dir: &tempfile::TempDir, name: &str) -> String {
    let path = dir.path().join(name);
    let img = image::RgbImage::from_pixel(320, 240, image::Rgb([10, 20, 30]));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn list_failure_degrades_to_empty_wardrobe() {
    let client = MockBackendClient::new();
    client
        .list_wardrobe_results
        .lock()
        .unwrap()
        .push_back(Err(api_error(StatusCode::INTERNAL_SERVER_ERROR)));
    let mut io = MockIoHandler::new(vec![]);

    let items = handlers::handle_list_wardrobe_action(&client, &mut io)
        .await
        .unwrap();

    assert!(items.is_empty());
    io.expect_output("Showing an empty list");
    io.expect_output("Your wardrobe is empty.");
}

#[tokio::test]
async fn list_unauthorized_is_not_downgraded() {
    let client = MockBackendClient::new();
    client
        .list_wardrobe_results
        .lock()
        .unwrap()
        .push_back(Err(CliError::Unauthorized));
    let mut io = MockIoHandler::new(vec![]);

    let result = handlers::handle_list_wardrobe_action(&client, &mut io).await;
    assert!(matches!(result.unwrap_err(), CliError::Unauthorized));
}

#[tokio::test]
async fn list_success_renders_items() {
    let client = MockBackendClient::new();
    client.list_wardrobe_results.lock().unwrap().push_back(Ok(vec![
        mock_clothing_item("linen shirt", GarmentCategory::Top),
        mock_clothing_item("navy chinos", GarmentCategory::Bottom),
    ]));
    let mut io = MockIoHandler::new(vec![]);

    let items = handlers::handle_list_wardrobe_action(&client, &mut io)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    io.expect_output("[1] linen shirt (Top, blue)");
    io.expect_output("[2] navy chinos (Bottom, blue)");
}

#[tokio::test]
async fn analysis_failure_falls_back_to_default_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_png(&dir, "jacket.png");

    let client = MockBackendClient::new();
    client
        .analyze_upload_results
        .lock()
        .unwrap()
        .push_back(Err(business_error("model unavailable")));
    let mut io = MockIoHandler::new(vec![]);

    let analysis = handlers::analyze_photo_with_fallback(&client, &mut io, &path)
        .await
        .unwrap();

    assert_eq!(analysis.category, GarmentCategory::Top);
    assert_eq!(analysis.color, None);
    assert!(analysis.tags.is_empty());
    io.expect_output("model unavailable");
    io.expect_output("Using a default profile");
}

#[tokio::test]
async fn analysis_unauthorized_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_png(&dir, "jacket.png");

    let client = MockBackendClient::new();
    client
        .analyze_upload_results
        .lock()
        .unwrap()
        .push_back(Err(CliError::Unauthorized));
    let mut io = MockIoHandler::new(vec![]);

    let result = handlers::analyze_photo_with_fallback(&client, &mut io, &path).await;
    assert!(matches!(result.unwrap_err(), CliError::Unauthorized));
}

#[tokio::test]
async fn missing_file_is_a_local_error_without_backend_call() {
    let client = MockBackendClient::new();
    let mut io = MockIoHandler::new(vec![]);

    let result =
        handlers::analyze_photo_with_fallback(&client, &mut io, "/no/such/photo.png").await;

    assert!(matches!(result.unwrap_err(), CliError::Io(_)));
    assert!(client.call_names().is_empty());
}

#[tokio::test]
async fn batch_analysis_runs_strictly_in_submission_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_temp_png(&dir, "a.png");
    let second = write_temp_png(&dir, "b.png");

    let client = MockBackendClient::new();
    {
        let mut queue = client.analyze_upload_results.lock().unwrap();
        queue.push_back(Ok(mock_analysis(GarmentCategory::Top, "blue")));
        queue.push_back(Ok(mock_analysis(GarmentCategory::Shoes, "black")));
    }
    {
        let mut queue = client.save_item_results.lock().unwrap();
        queue.push_back(Ok(mock_clothing_item("a", GarmentCategory::Top)));
        queue.push_back(Ok(mock_clothing_item("b", GarmentCategory::Shoes)));
    }
    let mut io = MockIoHandler::new(vec![]);

    handlers::analyze_paths(&client, &mut io, &[first, second], true)
        .await
        .unwrap();

    // Each file finishes (analysis then save) before the next one starts.
    assert_eq!(
        client.call_names(),
        vec![
            "analyze_upload".to_string(),
            "save_item".to_string(),
            "analyze_upload".to_string(),
            "save_item".to_string(),
        ]
    );
}

#[tokio::test]
async fn batch_analysis_skips_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let real = write_temp_png(&dir, "real.png");

    let client = MockBackendClient::new();
    client
        .analyze_upload_results
        .lock()
        .unwrap()
        .push_back(Ok(mock_analysis(GarmentCategory::Dress, "red")));
    let mut io = MockIoHandler::new(vec![]);

    handlers::analyze_paths(
        &client,
        &mut io,
        &["/no/such/file.png".to_string(), real],
        false,
    )
    .await
    .unwrap();

    io.expect_output("Skipping /no/such/file.png");
    assert_eq!(client.call_names(), vec!["analyze_upload".to_string()]);
}

#[tokio::test]
async fn remove_by_id_respects_declined_confirmation() {
    let client = MockBackendClient::new();
    let mut io = MockIoHandler::new(vec!["n"]);
    let id = armoire_cli::Uuid::new_v4();

    handlers::handle_remove_by_id_action(&client, &mut io, id, false)
        .await
        .unwrap();

    io.expect_output("Kept.");
    assert!(client.call_names().is_empty());
}

#[tokio::test]
async fn remove_by_id_with_yes_skips_the_prompt() {
    let client = MockBackendClient::new();
    client
        .remove_item_results
        .lock()
        .unwrap()
        .push_back(Ok(()));
    let mut io = MockIoHandler::new(vec![]);
    let id = armoire_cli::Uuid::new_v4();

    handlers::handle_remove_by_id_action(&client, &mut io, id, true)
        .await
        .unwrap();

    assert_eq!(client.call_names(), vec!["remove_item".to_string()]);
}

#[tokio::test]
async fn select_item_picks_by_number() {
    let client = MockBackendClient::new();
    client.list_wardrobe_results.lock().unwrap().push_back(Ok(vec![
        mock_clothing_item("linen shirt", GarmentCategory::Top),
        mock_clothing_item("navy chinos", GarmentCategory::Bottom),
    ]));
    let mut io = MockIoHandler::new(vec!["2"]);

    let item = handlers::select_item(&client, &mut io).await.unwrap();
    assert_eq!(item.name, "navy chinos");
}

#[tokio::test]
async fn select_item_on_empty_wardrobe_is_an_input_error() {
    let client = MockBackendClient::new();
    client
        .list_wardrobe_results
        .lock()
        .unwrap()
        .push_back(Ok(vec![]));
    let mut io = MockIoHandler::new(vec![]);

    let result = handlers::select_item(&client, &mut io).await;
    assert!(matches!(result.unwrap_err(), CliError::Input(_)));
}
