// src/handlers.rs

use std::path::Path;

use secrecy::SecretString;
use uuid::Uuid;

use crate::client::{
    AuthSession, BackendClient, ClothingItem, EmailRegistration, GarmentAnalysis, NewClothingItem,
    PasswordCredentials, RecommendRequest, TryOnRequest, UploadConfig, UserProfile,
};
use crate::error::CliError;
use crate::imaging::{self, NormalizeOptions};
use crate::io::IoHandler;
use crate::session::SessionStore;

// --- Session plumbing shared by the login/registration actions ---

pub fn store_session(session: &SessionStore, auth: AuthSession) -> UserProfile {
    session.set_token(auth.token);
    session.set_user(auth.user.clone());
    if let Err(e) = session.persist() {
        tracing::warn!(target: "armoire_cli::handlers", error = %e, "Failed to persist session");
    }
    auth.user
}

// --- Authentication actions ---

pub async fn send_code_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    phone: &str,
) -> Result<(), CliError> {
    if phone.is_empty() {
        return Err(CliError::Input("Phone number cannot be empty.".into()));
    }
    client.send_login_code(phone).await?;
    io.write_line("Code sent. It is valid for a few minutes.")?;
    Ok(())
}

pub async fn handle_send_code_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nRequest an SMS login code.")?;
    let phone = io.read_line("Phone number:")?;
    send_code_with(client, io, &phone).await
}

pub async fn login_sms_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    _io: &mut IO,
    phone: &str,
    code: &str,
) -> Result<UserProfile, CliError> {
    if phone.is_empty() || code.is_empty() {
        return Err(CliError::Input("Phone number and code are required.".into()));
    }
    let auth = client.login_with_sms(phone, code).await?;
    Ok(store_session(session, auth))
}

pub async fn handle_sms_login_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    io: &mut IO,
) -> Result<UserProfile, CliError> {
    io.write_line("\nLog in with an SMS code.")?;
    let phone = io.read_line("Phone number:")?;
    let code = io.read_line("Code:")?;
    login_sms_with(client, session, io, &phone, &code).await
}

/// Password login; prompts for the password so it never lands in shell
/// history via argv.
pub async fn login_password_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    io: &mut IO,
    account: String,
) -> Result<UserProfile, CliError> {
    let password = io.read_line("Password:")?;
    if account.is_empty() || password.is_empty() {
        return Err(CliError::Input("Account and password are required.".into()));
    }
    let credentials = PasswordCredentials {
        account,
        password: SecretString::from(password),
    };
    let auth = client.login_with_password(&credentials).await?;
    Ok(store_session(session, auth))
}

pub async fn handle_password_login_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    io: &mut IO,
) -> Result<UserProfile, CliError> {
    io.write_line("\nLog in with a password.")?;
    let account = io.read_line("Email or phone:")?;
    login_password_with(client, session, io, account).await
}

pub async fn register_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    io: &mut IO,
    email: String,
    nickname: Option<String>,
) -> Result<UserProfile, CliError> {
    if !email.contains('@') {
        return Err(CliError::Input(
            "That does not look like an email address.".into(),
        ));
    }
    let password = io.read_line("Choose a password:")?;
    if password.len() < 8 {
        return Err(CliError::Input(
            "Password must be at least 8 characters long.".into(),
        ));
    }
    let registration = EmailRegistration {
        email,
        nickname: nickname.filter(|n| !n.is_empty()),
        password: SecretString::from(password),
    };
    let auth = client.register_email(&registration).await?;
    Ok(store_session(session, auth))
}

pub async fn handle_registration_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    session: &SessionStore,
    io: &mut IO,
) -> Result<UserProfile, CliError> {
    io.write_line("\nRegister with an email address.")?;
    let email = io.read_line("Email:")?;
    let nickname = io.read_line("Nickname (optional):")?;
    register_with(client, session, io, email, Some(nickname)).await
}

pub fn handle_logout_action<IO: IoHandler>(
    session: &SessionStore,
    io: &mut IO,
) -> Result<(), CliError> {
    session.clear();
    if let Err(e) = session.persist() {
        tracing::warn!(target: "armoire_cli::handlers", error = %e, "Failed to persist cleared session");
    }
    io.write_line("Logged out.")?;
    Ok(())
}

pub fn handle_profile_action<IO: IoHandler>(
    session: &SessionStore,
    io: &mut IO,
) -> Result<(), CliError> {
    match session.user() {
        Some(user) => {
            io.write_line("\n--- Profile ---")?;
            io.write_line(&format!(
                "  Nickname: {}",
                user.nickname.as_deref().unwrap_or("-")
            ))?;
            io.write_line(&format!("  Email: {}", user.email.as_deref().unwrap_or("-")))?;
            io.write_line(&format!("  Phone: {}", user.phone.as_deref().unwrap_or("-")))?;
            io.write_line(&format!("  Pro: {}", if user.pro { "yes" } else { "no" }))?;
        }
        None => {
            io.write_line("Not logged in.")?;
        }
    }
    Ok(())
}

// --- Wardrobe actions ---

/// List the wardrobe. A listing failure degrades to an empty wardrobe at
/// this call site so the menu stays usable; every other action that needs
/// the real list propagates the error instead.
pub async fn handle_list_wardrobe_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<Vec<ClothingItem>, CliError> {
    io.write_line("\nFetching your wardrobe...")?;
    let items = match client.list_wardrobe().await {
        Ok(items) => items,
        Err(e) if matches!(e, CliError::Unauthorized) => return Err(e),
        Err(e) => {
            tracing::warn!(target: "armoire_cli::handlers", error = %e, "Wardrobe listing failed, showing empty list");
            io.write_line(&format!(
                "Could not load the wardrobe ({e}). Showing an empty list."
            ))?;
            Vec::new()
        }
    };
    if items.is_empty() {
        io.write_line("Your wardrobe is empty.")?;
    } else {
        io.write_line("Your wardrobe:")?;
        for (index, item) in items.iter().enumerate() {
            io.write_line(&format!(
                "  [{}] {} ({}, {})",
                index + 1,
                item.name,
                item.category,
                item.color.as_deref().unwrap_or("no color")
            ))?;
        }
    }
    Ok(items)
}

/// Run one photo through normalization and analysis. An analysis failure
/// degrades to a neutral "Top" profile at this call site so the add-item
/// flow can continue; the user is told either way. Local failures (missing
/// file, corrupt image) still propagate.
pub async fn analyze_photo_with_fallback<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    path: &str,
) -> Result<GarmentAnalysis, CliError> {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::Input(format!("Invalid file path: {path}")))?
        .to_string();
    let source = std::fs::read(path)?;
    let normalized = imaging::normalize(&file_name, &source, &NormalizeOptions::default())?;
    io.write_line(&format!(
        "Prepared {} ({}x{}, {} KB). Analyzing...",
        normalized.file_name,
        normalized.width,
        normalized.height,
        normalized.bytes.len() / 1024
    ))?;

    let config = UploadConfig {
        name: Some(file_name.clone()),
        category: None,
        auto_save: false,
    };
    match client
        .analyze_upload(&normalized.file_name, normalized.bytes, &config)
        .await
    {
        Ok(analysis) => Ok(analysis),
        Err(e) if matches!(e, CliError::Unauthorized) => Err(e),
        Err(e) => {
            tracing::warn!(target: "armoire_cli::handlers", error = %e, %file_name, "Analysis failed, using default profile");
            io.write_line(&format!(
                "Analysis failed ({e}). Using a default profile; you can edit the item later."
            ))?;
            Ok(GarmentAnalysis::fallback())
        }
    }
}

fn file_stem_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("new item")
        .to_string()
}

fn display_analysis<IO: IoHandler>(io: &mut IO, analysis: &GarmentAnalysis) -> Result<(), CliError> {
    io.write_line(&format!("  Category: {}", analysis.category))?;
    io.write_line(&format!(
        "  Color: {}",
        analysis.color.as_deref().unwrap_or("unknown")
    ))?;
    io.write_line(&format!("  Tags: {}", analysis.tags.join(", ")))?;
    Ok(())
}

/// Analyze photos one at a time, in the order given, so a slow or failing
/// call never overlaps another against the rate-limited analyze endpoint.
pub async fn analyze_paths<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    paths: &[String],
    auto_save: bool,
) -> Result<(), CliError> {
    if paths.is_empty() {
        return Err(CliError::Input("No paths given.".into()));
    }
    for path in paths {
        if !Path::new(path).exists() {
            io.write_line(&format!("Skipping {path}: file not found."))?;
            continue;
        }
        match analyze_photo_with_fallback(client, io, path).await {
            Ok(analysis) => {
                display_analysis(io, &analysis)?;
                if auto_save {
                    let item = NewClothingItem {
                        name: file_stem_name(path),
                        category: analysis.category,
                        color: analysis.color,
                        tags: analysis.tags,
                        image_url: None,
                    };
                    let saved = client.save_item(&item).await?;
                    io.write_line(&format!("Saved '{}' with ID {}.", saved.name, saved.id))?;
                }
            }
            Err(e) if matches!(e, CliError::Unauthorized) => return Err(e),
            Err(e) => {
                // A bad file skips; the batch keeps going.
                io.write_line(&format!("  {path} -> failed: {e}"))?;
            }
        }
    }
    Ok(())
}

pub async fn handle_analyze_item_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nAdd a garment from a photo.")?;
    let path = io.read_line("Path to the photo:")?;
    if path.is_empty() {
        return Err(CliError::Input("File path cannot be empty.".into()));
    }
    if !Path::new(&path).exists() {
        return Err(CliError::Input(format!("File not found at path: {path}")));
    }

    let analysis = analyze_photo_with_fallback(client, io, &path).await?;
    display_analysis(io, &analysis)?;

    if !io.confirm("Save this item to your wardrobe?")? {
        io.write_line("Not saved.")?;
        return Ok(());
    }
    let default_name = file_stem_name(&path);
    let name = io.read_line(&format!("Item name [{default_name}]:"))?;
    let item = NewClothingItem {
        name: if name.is_empty() { default_name } else { name },
        category: analysis.category,
        color: analysis.color,
        tags: analysis.tags,
        image_url: None,
    };
    let saved = client.save_item(&item).await?;
    io.write_line(&format!("Saved '{}' with ID {}.", saved.name, saved.id))?;
    Ok(())
}

pub async fn handle_batch_analyze_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nAnalyze several photos (comma-separated paths).")?;
    let raw = io.read_line("Paths:")?;
    let paths: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    analyze_paths(client, io, &paths, false).await
}

pub async fn handle_remove_by_id_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    item_id: Uuid,
    assume_yes: bool,
) -> Result<(), CliError> {
    if !assume_yes && !io.confirm(&format!("Remove item {item_id}?"))? {
        io.write_line("Kept.")?;
        return Ok(());
    }
    client.remove_item(item_id).await?;
    io.write_line(&format!("Removed item {item_id}."))?;
    Ok(())
}

pub async fn handle_remove_item_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    let item = select_item(client, io).await?;
    if !io.confirm(&format!("Remove '{}'?", item.name))? {
        io.write_line("Kept.")?;
        return Ok(());
    }
    client.remove_item(item.id).await?;
    io.write_line(&format!("Removed '{}'.", item.name))?;
    Ok(())
}

/// Pick a wardrobe item by number. Selection needs the real list, so a
/// listing failure propagates here instead of degrading.
pub async fn select_item<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<ClothingItem, CliError> {
    let items = client.list_wardrobe().await?;
    if items.is_empty() {
        return Err(CliError::Input("Your wardrobe is empty.".into()));
    }
    io.write_line("Your wardrobe:")?;
    for (index, item) in items.iter().enumerate() {
        io.write_line(&format!(
            "  [{}] {} ({})",
            index + 1,
            item.name,
            item.category
        ))?;
    }
    let choice = io.read_line("Item number:")?;
    let index: usize = choice
        .parse()
        .map_err(|_| CliError::Input(format!("Not a number: {choice}")))?;
    items
        .into_iter()
        .nth(index.wrapping_sub(1))
        .ok_or_else(|| CliError::Input(format!("No item numbered {index}.")))
}

// --- Styling actions ---

pub async fn recommend_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    occasion: Option<String>,
    weather: Option<String>,
) -> Result<(), CliError> {
    let request = RecommendRequest {
        occasion: occasion.filter(|o| !o.is_empty()),
        weather: weather.filter(|w| !w.is_empty()),
        item_ids: Vec::new(),
    };
    let recommendation = client.recommend_outfit(&request).await?;
    io.write_line("\n--- Recommended outfit ---")?;
    io.write_line(&recommendation.summary)?;
    if let Some(reasoning) = &recommendation.reasoning {
        io.write_line(&format!("Why: {reasoning}"))?;
    }
    if !recommendation.item_ids.is_empty() {
        io.write_line(&format!(
            "Uses {} item(s) from your wardrobe.",
            recommendation.item_ids.len()
        ))?;
    }
    Ok(())
}

pub async fn handle_recommend_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nAsk the stylist for an outfit.")?;
    let occasion = io.read_line("Occasion (optional):")?;
    let weather = io.read_line("Weather (optional):")?;
    recommend_with(client, io, Some(occasion), Some(weather)).await
}

pub async fn try_on_with<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
    item_ids: Vec<Uuid>,
    person_image_url: Option<String>,
) -> Result<(), CliError> {
    if item_ids.is_empty() {
        return Err(CliError::Input("At least one item ID is required.".into()));
    }
    let request = TryOnRequest {
        item_ids,
        person_image_url: person_image_url.filter(|u| !u.is_empty()),
    };
    io.write_line("Rendering (this can take a while)...")?;
    let result = client.generate_try_on(&request).await?;
    io.write_line(&format!("Done: {}", result.image_url))?;
    Ok(())
}

pub async fn handle_try_on_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nRender a virtual try-on.")?;
    let raw = io.read_line("Item IDs (comma-separated):")?;
    let mut item_ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = Uuid::parse_str(part)
            .map_err(|_| CliError::Input(format!("Not a valid item ID: {part}")))?;
        item_ids.push(id);
    }
    let person_image_url = io.read_line("Photo URL of yourself (optional):")?;
    try_on_with(client, io, item_ids, Some(person_image_url)).await
}

pub async fn handle_validate_pro_action<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nValidate a pro access code.")?;
    let code = io.read_line("Code:")?;
    if code.is_empty() {
        return Err(CliError::Input("Code cannot be empty.".into()));
    }
    let validation = client.validate_pro(&code).await?;
    if validation.valid {
        io.write_line(&format!(
            "Code accepted. Plan: {}",
            validation.plan.as_deref().unwrap_or("pro")
        ))?;
    } else {
        io.write_line("Code rejected.")?;
    }
    Ok(())
}
