// src/lib.rs

// Declare modules
pub mod chat;
pub mod client;
pub mod error;
pub mod handlers;
pub mod imaging;
pub mod io;
pub mod session;
pub mod test_helpers;

// Re-export items needed by main.rs and tests
pub use clap::{Args as ClapArgs, Parser, Subcommand};
pub use error::CliError;
pub use uuid::Uuid;

use std::path::PathBuf;

// --- Menu Navigation Enums and Types ---

/// Current screen of the interactive menu in main.rs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Wardrobe,
    Stylist,
    Account,
}

/// Navigation result returned by menu handlers in main.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNavigation {
    GoTo(MenuState),
    ReturnToMainMenu,
    Logout,
    Quit,
}

/// Helper type alias for results from menu handling functions in main.rs.
pub type MenuResult = Result<MenuNavigation, CliError>;

// --- Clap Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the Armoire backend API
    #[arg(
        short,
        long,
        global = true,
        env = "ARMOIRE_BASE_URL",
        default_value = "http://127.0.0.1:8080/api/"
    )]
    pub base_url: url::Url,

    /// Session file path (defaults to the user config directory)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the wardrobe
    Wardrobe(WardrobeArgs),
    /// Talk to the AI stylist
    Stylist(StylistArgs),
    /// Log in, register, or log out
    Auth(AuthArgs),
}

#[derive(ClapArgs, Debug)]
pub struct WardrobeArgs {
    #[clap(subcommand)]
    pub command: WardrobeCommand,
}

#[derive(Subcommand, Debug)]
pub enum WardrobeCommand {
    /// List saved items
    List,
    /// Analyze one or more photos (processed in order, one at a time)
    Analyze(AnalyzeArgs),
    /// Remove an item by ID
    Remove(RemoveArgs),
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Photo paths
    #[arg(required = true)]
    pub paths: Vec<String>,
    /// Save each analyzed photo as a wardrobe item named after the file
    #[arg(long, default_value_t = false)]
    pub save: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RemoveArgs {
    /// The item ID to remove
    pub id: Uuid,
    /// Skip the confirmation prompt
    #[arg(long, short, default_value_t = false)]
    pub yes: bool,
}

#[derive(ClapArgs, Debug)]
pub struct StylistArgs {
    #[clap(subcommand)]
    pub command: StylistCommand,
}

#[derive(Subcommand, Debug)]
pub enum StylistCommand {
    /// Ask for an outfit recommendation
    Recommend(RecommendArgs),
    /// Render a virtual try-on for wardrobe items
    TryOn(TryOnArgs),
    /// Open an interactive chat with the stylist
    Chat,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct RecommendArgs {
    /// Occasion, e.g. "office party"
    #[arg(long)]
    pub occasion: Option<String>,
    /// Weather, e.g. "rainy, 12C"
    #[arg(long)]
    pub weather: Option<String>,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct TryOnArgs {
    /// Wardrobe item IDs to wear
    #[arg(long = "item", value_delimiter = ',', required = true)]
    pub items: Vec<Uuid>,
    /// URL of a photo of yourself
    #[arg(long, name = "person-image-url")]
    pub person_image_url: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct AuthArgs {
    #[clap(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Request an SMS login code
    SendCode(SendCodeArgs),
    /// Log in with a phone number and SMS code
    LoginSms(LoginSmsArgs),
    /// Log in with an account and password (password is prompted)
    LoginPassword(LoginPasswordArgs),
    /// Register with an email address (password is prompted)
    Register(RegisterArgs),
    /// Clear the stored session
    Logout,
    /// Show the cached profile
    Whoami,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SendCodeArgs {
    /// Phone number
    pub phone: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoginSmsArgs {
    /// Phone number
    pub phone: String,
    /// The code received by SMS
    pub code: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoginPasswordArgs {
    /// Email or phone number
    pub account: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RegisterArgs {
    /// Email address
    pub email: String,
    /// Display name
    #[arg(long)]
    pub nickname: Option<String>,
}
