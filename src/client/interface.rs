// src/client/interface.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::types::{
    AuthSession, ChatTurn, ClothingItem, EmailRegistration, GarmentAnalysis, NewClothingItem,
    OutfitRecommendation, PasswordCredentials, ProValidation, RecommendRequest, StylistReply,
    TryOnRequest, TryOnResult, UploadConfig,
};
use crate::error::CliError;

/// Trait for abstracting backend calls to allow mocking in tests.
///
/// Every method is a thin pass-through over the shared request path; none
/// of them retry, and callers decide per call site whether a failure is
/// fatal or downgraded to a default.
#[async_trait]
pub trait BackendClient: Send + Sync {
    // Authentication
    async fn send_login_code(&self, phone: &str) -> Result<(), CliError>;
    async fn login_with_sms(&self, phone: &str, code: &str) -> Result<AuthSession, CliError>;
    async fn login_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, CliError>;
    async fn register_email(
        &self,
        registration: &EmailRegistration,
    ) -> Result<AuthSession, CliError>;

    // Wardrobe
    async fn list_wardrobe(&self) -> Result<Vec<ClothingItem>, CliError>;
    async fn save_item(&self, item: &NewClothingItem) -> Result<ClothingItem, CliError>;
    async fn remove_item(&self, item_id: Uuid) -> Result<(), CliError>;
    async fn analyze_image_url(&self, image_url: &str) -> Result<GarmentAnalysis, CliError>;
    async fn analyze_upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        config: &UploadConfig,
    ) -> Result<GarmentAnalysis, CliError>;

    // Styling
    async fn recommend_outfit(
        &self,
        request: &RecommendRequest,
    ) -> Result<OutfitRecommendation, CliError>;
    async fn stylist_chat(&self, history: &[ChatTurn]) -> Result<StylistReply, CliError>;
    async fn generate_try_on(&self, request: &TryOnRequest) -> Result<TryOnResult, CliError>;
    async fn validate_pro(&self, code: &str) -> Result<ProValidation, CliError>;
}
