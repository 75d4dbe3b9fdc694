// src/client/implementation.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client as ReqwestClient, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::interface::BackendClient;
use super::types::{
    AnalyzeUrlPayload, AuthSession, ChatPayload, ChatTurn, ClothingItem, EmailRegistration,
    GarmentAnalysis, NewClothingItem, OutfitRecommendation, PasswordCredentials, ProValidation,
    RecommendRequest, SendCodePayload, SerializableEmailRegistration, SerializablePasswordLogin,
    SmsLoginPayload, StylistReply, TryOnRequest, TryOnResult, UploadConfig, ValidateProPayload,
};
use super::util::{build_url, classify_transport_error, extract_error_message, unwrap_envelope};
use crate::error::CliError;
use crate::session::SessionStore;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type UnauthorizedHandler = Box<dyn Fn() + Send + Sync>;

/// Wrapper around `reqwest::Client` implementing the `BackendClient` trait.
///
/// Owns the uniform request contract: bearer auth from the session store,
/// a per-request deadline, envelope unwrapping, and the session-expiry side
/// effects a 401 always triggers. The expiry observer is a single injected
/// slot rather than process-global state.
pub struct ReqwestBackendClient {
    client: ReqwestClient,
    base_url: Url,
    session: Arc<SessionStore>,
    on_unauthorized: Mutex<Option<UnauthorizedHandler>>,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ReqwestBackendClient {
    pub fn new(client: ReqwestClient, mut base_url: Url, session: Arc<SessionStore>) -> Self {
        // `Url::join` drops the last path segment unless the base ends with
        // '/'; normalize so relative "app/..." paths land under the base.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            session,
            on_unauthorized: Mutex::new(None),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: UPLOAD_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, request_timeout: Duration, upload_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.upload_timeout = upload_timeout;
        self
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Register the observer invoked whenever the backend rejects the bearer
    /// token. A later registration replaces the earlier one.
    pub fn set_unauthorized_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.lock().unwrap() = Some(Box::new(handler));
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CliError> {
        let response = request.send().await.map_err(classify_transport_error)?;
        self.process_response(response).await
    }

    /// Normalize a response per the envelope contract: 401 expires the
    /// session unconditionally, other non-2xx statuses carry an extracted
    /// message, and 2xx bodies are unwrapped before typed decoding.
    async fn process_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, CliError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // The body is irrelevant here; the token is dead regardless of
            // what the backend had to say.
            self.expire_session();
            return Err(CliError::Unauthorized);
        }
        let body = response.text().await.map_err(classify_transport_error)?;
        if !status.is_success() {
            let message = extract_error_message(status, &body);
            tracing::error!(target: "armoire_cli::client", %status, %message, "API request failed");
            return Err(CliError::Api { status, message });
        }
        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(target: "armoire_cli::client", %status, error = %e, "Success response body is not JSON");
            CliError::InvalidResponse(format!("expected a JSON body: {e}"))
        })?;
        let payload = unwrap_envelope(raw)?;
        serde_json::from_value(payload)
            .map_err(|e| CliError::InvalidResponse(format!("unexpected payload shape: {e}")))
    }

    fn expire_session(&self) {
        tracing::warn!(target: "armoire_cli::client", "Backend rejected the bearer token, clearing session");
        self.session.clear_token();
        self.session.clear_user();
        if let Err(e) = self.session.persist() {
            tracing::warn!(target: "armoire_cli::client", error = %e, "Failed to persist cleared session");
        }
        let handler = self.on_unauthorized.lock().unwrap();
        if let Some(callback) = handler.as_ref() {
            callback();
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[async_trait]
impl BackendClient for ReqwestBackendClient {
    async fn send_login_code(&self, phone: &str) -> Result<(), CliError> {
        let url = build_url(&self.base_url, "app/auth/send-code")?;
        tracing::info!(target: "armoire_cli::client", %url, "Requesting SMS login code");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&SendCodePayload { phone });
        self.execute::<Value>(request).await.map(|_| ())
    }

    async fn login_with_sms(&self, phone: &str, code: &str) -> Result<AuthSession, CliError> {
        let url = build_url(&self.base_url, "app/auth/login/sms")?;
        tracing::info!(target: "armoire_cli::client", %url, "Attempting SMS login");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&SmsLoginPayload { phone, code });
        self.execute(request).await
    }

    async fn login_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, CliError> {
        let url = build_url(&self.base_url, "app/auth/login/password")?;
        tracing::info!(target: "armoire_cli::client", %url, account = %credentials.account, "Attempting password login");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&SerializablePasswordLogin::from(credentials));
        self.execute(request).await
    }

    async fn register_email(
        &self,
        registration: &EmailRegistration,
    ) -> Result<AuthSession, CliError> {
        let url = build_url(&self.base_url, "app/auth/register/email")?;
        tracing::info!(target: "armoire_cli::client", %url, email = %registration.email, "Attempting registration");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&SerializableEmailRegistration::from(registration));
        self.execute(request).await
    }

    async fn list_wardrobe(&self) -> Result<Vec<ClothingItem>, CliError> {
        let url = build_url(&self.base_url, "app/wardrobe/list")?;
        tracing::info!(target: "armoire_cli::client", %url, "Listing wardrobe items");
        let request = self
            .authorize(self.client.get(url))
            .timeout(self.request_timeout);
        self.execute(request).await
    }

    async fn save_item(&self, item: &NewClothingItem) -> Result<ClothingItem, CliError> {
        let url = build_url(&self.base_url, "app/wardrobe/save")?;
        tracing::info!(target: "armoire_cli::client", %url, name = %item.name, "Saving wardrobe item");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(item);
        self.execute(request).await
    }

    async fn remove_item(&self, item_id: Uuid) -> Result<(), CliError> {
        let url = build_url(&self.base_url, &format!("app/wardrobe/{item_id}"))?;
        tracing::info!(target: "armoire_cli::client", %url, %item_id, "Removing wardrobe item");
        let request = self
            .authorize(self.client.delete(url))
            .timeout(self.request_timeout);
        self.execute::<Value>(request).await.map(|_| ())
    }

    async fn analyze_image_url(&self, image_url: &str) -> Result<GarmentAnalysis, CliError> {
        let url = build_url(&self.base_url, "app/wardrobe/analyze")?;
        tracing::info!(target: "armoire_cli::client", %url, "Analyzing garment by image URL");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&AnalyzeUrlPayload { image_url });
        self.execute(request).await
    }

    async fn analyze_upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        config: &UploadConfig,
    ) -> Result<GarmentAnalysis, CliError> {
        let url = build_url(&self.base_url, "app/clothing/analyze")?;
        tracing::info!(target: "armoire_cli::client", %url, %file_name, size = bytes.len(), "Uploading garment photo for analysis");
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| CliError::Internal(format!("Failed to build multipart file part: {e}")))?;
        // No manual Content-Type: the transport writes the boundary.
        let form = multipart::Form::new()
            .part("file", part)
            .text("config", serde_json::to_string(config)?);
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.upload_timeout)
            .multipart(form);
        self.execute(request).await
    }

    async fn recommend_outfit(
        &self,
        request: &RecommendRequest,
    ) -> Result<OutfitRecommendation, CliError> {
        let url = build_url(&self.base_url, "app/ai/recommend")?;
        tracing::info!(target: "armoire_cli::client", %url, "Requesting outfit recommendation");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(request);
        self.execute(request).await
    }

    async fn stylist_chat(&self, history: &[ChatTurn]) -> Result<StylistReply, CliError> {
        let url = build_url(&self.base_url, "app/ai/chat")?;
        tracing::info!(target: "armoire_cli::client", %url, turns = history.len(), "Sending stylist chat history");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&ChatPayload { messages: history });
        self.execute(request).await
    }

    async fn generate_try_on(&self, request: &TryOnRequest) -> Result<TryOnResult, CliError> {
        let url = build_url(&self.base_url, "app/ai/try-on")?;
        tracing::info!(target: "armoire_cli::client", %url, items = request.item_ids.len(), "Requesting virtual try-on render");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(request);
        self.execute(request).await
    }

    async fn validate_pro(&self, code: &str) -> Result<ProValidation, CliError> {
        let url = build_url(&self.base_url, "app/ai/validate-pro")?;
        tracing::info!(target: "armoire_cli::client", %url, "Validating pro access code");
        let request = self
            .authorize(self.client.post(url))
            .timeout(self.request_timeout)
            .json(&ValidateProPayload { code });
        self.execute(request).await
    }
}
