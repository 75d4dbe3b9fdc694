// src/test_helpers.rs
//
// Scripted doubles for handler tests: a BackendClient whose results are
// queued per method, and an IoHandler fed from a canned input list.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::client::{
    AuthSession, BackendClient, ChatTurn, ClothingItem, EmailRegistration, GarmentAnalysis,
    GarmentCategory, NewClothingItem, OutfitRecommendation, PasswordCredentials, ProValidation,
    RecommendRequest, StylistReply, TryOnRequest, TryOnResult, UploadConfig, UserProfile,
};
use crate::error::CliError;
use crate::io::IoHandler;

type Queue<T> = Mutex<VecDeque<Result<T, CliError>>>;

fn next<T>(queue: &Queue<T>, method: &str) -> Result<T, CliError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(CliError::Internal(format!("no scripted result for {method}"))))
}

#[derive(Default)]
pub struct MockBackendClient {
    /// Method names in invocation order, for asserting call sequencing.
    pub calls: Mutex<Vec<String>>,
    pub send_login_code_results: Queue<()>,
    pub login_with_sms_results: Queue<AuthSession>,
    pub login_with_password_results: Queue<AuthSession>,
    pub register_email_results: Queue<AuthSession>,
    pub list_wardrobe_results: Queue<Vec<ClothingItem>>,
    pub save_item_results: Queue<ClothingItem>,
    pub remove_item_results: Queue<()>,
    pub analyze_image_url_results: Queue<GarmentAnalysis>,
    pub analyze_upload_results: Queue<GarmentAnalysis>,
    pub recommend_results: Queue<OutfitRecommendation>,
    pub chat_results: Queue<StylistReply>,
    pub try_on_results: Queue<TryOnResult>,
    pub validate_pro_results: Queue<ProValidation>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn send_login_code(&self, _phone: &str) -> Result<(), CliError> {
        self.record("send_login_code");
        next(&self.send_login_code_results, "send_login_code")
    }

    async fn login_with_sms(&self, _phone: &str, _code: &str) -> Result<AuthSession, CliError> {
        self.record("login_with_sms");
        next(&self.login_with_sms_results, "login_with_sms")
    }

    async fn login_with_password(
        &self,
        _credentials: &PasswordCredentials,
    ) -> Result<AuthSession, CliError> {
        self.record("login_with_password");
        next(&self.login_with_password_results, "login_with_password")
    }

    async fn register_email(
        &self,
        _registration: &EmailRegistration,
    ) -> Result<AuthSession, CliError> {
        self.record("register_email");
        next(&self.register_email_results, "register_email")
    }

    async fn list_wardrobe(&self) -> Result<Vec<ClothingItem>, CliError> {
        self.record("list_wardrobe");
        next(&self.list_wardrobe_results, "list_wardrobe")
    }

    async fn save_item(&self, _item: &NewClothingItem) -> Result<ClothingItem, CliError> {
        self.record("save_item");
        next(&self.save_item_results, "save_item")
    }

    async fn remove_item(&self, _item_id: Uuid) -> Result<(), CliError> {
        self.record("remove_item");
        next(&self.remove_item_results, "remove_item")
    }

    async fn analyze_image_url(&self, _image_url: &str) -> Result<GarmentAnalysis, CliError> {
        self.record("analyze_image_url");
        next(&self.analyze_image_url_results, "analyze_image_url")
    }

    async fn analyze_upload(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
        _config: &UploadConfig,
    ) -> Result<GarmentAnalysis, CliError> {
        self.record("analyze_upload");
        next(&self.analyze_upload_results, "analyze_upload")
    }

    async fn recommend_outfit(
        &self,
        _request: &RecommendRequest,
    ) -> Result<OutfitRecommendation, CliError> {
        self.record("recommend_outfit");
        next(&self.recommend_results, "recommend_outfit")
    }

    async fn stylist_chat(&self, _history: &[ChatTurn]) -> Result<StylistReply, CliError> {
        self.record("stylist_chat");
        next(&self.chat_results, "stylist_chat")
    }

    async fn generate_try_on(&self, _request: &TryOnRequest) -> Result<TryOnResult, CliError> {
        self.record("generate_try_on");
        next(&self.try_on_results, "generate_try_on")
    }

    async fn validate_pro(&self, _code: &str) -> Result<ProValidation, CliError> {
        self.record("validate_pro");
        next(&self.validate_pro_results, "validate_pro")
    }
}

/// IoHandler fed from a canned input list; everything written is kept for
/// assertions.
pub struct MockIoHandler {
    inputs: VecDeque<String>,
    pub output: Vec<String>,
}

impl MockIoHandler {
    pub fn new(inputs: Vec<&str>) -> Self {
        Self {
            inputs: inputs.into_iter().map(str::to_string).collect(),
            output: Vec::new(),
        }
    }

    /// Panics unless some output line contains `needle`.
    pub fn expect_output(&self, needle: &str) {
        assert!(
            self.output.iter().any(|line| line.contains(needle)),
            "expected output containing {needle:?}, got:\n{}",
            self.output.join("\n")
        );
    }

    pub fn output_contains(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl IoHandler for MockIoHandler {
    fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
        self.output.push(prompt.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| CliError::Input(format!("no scripted input for prompt {prompt:?}")))
    }

    fn write_line(&mut self, line: &str) -> Result<(), CliError> {
        self.output.push(line.to_string());
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> Result<(), CliError> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CliError> {
        Ok(())
    }
}

// --- Canned fixtures ---

pub fn mock_user_profile(nickname: &str) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        nickname: Some(nickname.to_string()),
        email: Some(format!("{nickname}@example.com")),
        phone: None,
        avatar_url: None,
        pro: false,
    }
}

pub fn mock_auth_session(nickname: &str) -> AuthSession {
    AuthSession {
        token: format!("token-for-{nickname}"),
        user: mock_user_profile(nickname),
    }
}

pub fn mock_clothing_item(name: &str, category: GarmentCategory) -> ClothingItem {
    ClothingItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category,
        color: Some("blue".to_string()),
        tags: vec!["casual".to_string()],
        image_url: None,
        created_at: Utc::now(),
    }
}

pub fn mock_analysis(category: GarmentCategory, color: &str) -> GarmentAnalysis {
    GarmentAnalysis {
        category,
        color: Some(color.to_string()),
        tags: vec!["casual".to_string()],
    }
}
