// src/client/mod.rs

pub mod implementation;
pub mod interface;
pub mod types;
pub mod util;


// Re-export the public API of this module.
pub use self::implementation::ReqwestBackendClient;
pub use self::interface::BackendClient;

// Types consumers of the client module (handlers, the chat loop, tests)
// need by name.
pub use self::types::{
    AuthSession, ChatRole, ChatTurn, ClothingItem, EmailRegistration, GarmentAnalysis,
    GarmentCategory, NewClothingItem, OutfitRecommendation, PasswordCredentials, ProValidation,
    RecommendRequest, StylistReply, TryOnRequest, TryOnResult, UploadConfig, UserProfile,
};
