// src/client/types.rs

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The envelope `code` value (or its absence) that denotes success.
pub(crate) const SUCCESS_CODE: i64 = 200;

/// Uniform wrapper the backend places around every JSON response.
///
/// All fields are optional on the wire; the precedence when interpreting
/// them is fixed in `util::unwrap_envelope`. `data` needs a custom
/// deserializer because an explicit `"data": null` unwraps to JSON `null`
/// while a missing `data` key means "return the whole envelope".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiEnvelope {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub msg: Option<String>,
    pub success: Option<bool>,
    #[serde(deserialize_with = "deserialize_present")]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Backend-supplied failure reason, probing the three message fields the
    /// wire contract allows.
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .or(self.msg.as_deref())
    }
}

// Maps a present JSON value (including `null`) to `Some`; only a missing key
// produces `None`, via the struct-level default.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// --- Domain DTOs ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarmentCategory {
    #[default]
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Accessory,
}

impl std::fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::Dress => "Dress",
            Self::Outerwear => "Outerwear",
            Self::Shoes => "Shoes",
            Self::Accessory => "Accessory",
        };
        write!(f, "{name}")
    }
}

/// What the backend's vision model extracted from a garment photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentAnalysis {
    #[serde(default)]
    pub category: GarmentCategory,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl GarmentAnalysis {
    /// Neutral result used when a caller chooses to keep the add-item flow
    /// alive after a failed analysis.
    pub fn fallback() -> Self {
        Self {
            category: GarmentCategory::Top,
            color: None,
            tags: Vec::new(),
        }
    }
}

/// A saved wardrobe record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: GarmentCategory,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for saving a new wardrobe record.
#[derive(Debug, Clone, Serialize)]
pub struct NewClothingItem {
    pub name: String,
    pub category: GarmentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// JSON metadata part accompanying a multipart garment upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<GarmentCategory>,
    pub auto_save: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutfitRecommendation {
    pub summary: String,
    #[serde(default)]
    pub item_ids: Vec<Uuid>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the stylist conversation, sent as accumulated history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StylistReply {
    pub reply: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TryOnRequest {
    pub item_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TryOnResult {
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProValidation {
    pub valid: bool,
    #[serde(default)]
    pub plan: Option<String>,
}

// --- Auth ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub pro: bool,
}

/// What every successful login/registration call returns.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Password login credentials. The password stays wrapped in a
/// `SecretString` until the request body is built.
#[derive(Debug, Clone)]
pub struct PasswordCredentials {
    pub account: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct EmailRegistration {
    pub email: String,
    pub nickname: Option<String>,
    pub password: SecretString,
}

// Wire-side borrow wrappers: the only place a secret is exposed.
#[derive(Serialize)]
pub(crate) struct SendCodePayload<'a> {
    pub(crate) phone: &'a str,
}

#[derive(Serialize)]
pub(crate) struct SmsLoginPayload<'a> {
    pub(crate) phone: &'a str,
    pub(crate) code: &'a str,
}

#[derive(Serialize)]
pub(crate) struct SerializablePasswordLogin<'a> {
    pub(crate) account: &'a str,
    pub(crate) password: &'a str,
}

impl<'a> From<&'a PasswordCredentials> for SerializablePasswordLogin<'a> {
    fn from(credentials: &'a PasswordCredentials) -> Self {
        Self {
            account: &credentials.account,
            password: credentials.password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SerializableEmailRegistration<'a> {
    pub(crate) email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) nickname: Option<&'a str>,
    pub(crate) password: &'a str,
}

impl<'a> From<&'a EmailRegistration> for SerializableEmailRegistration<'a> {
    fn from(registration: &'a EmailRegistration) -> Self {
        Self {
            email: &registration.email,
            nickname: registration.nickname.as_deref(),
            password: registration.password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct AnalyzeUrlPayload<'a> {
    pub(crate) image_url: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ChatPayload<'a> {
    pub(crate) messages: &'a [ChatTurn],
}

#[derive(Serialize)]
pub(crate) struct ValidateProPayload<'a> {
    pub(crate) code: &'a str,
}
