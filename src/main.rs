// src/main.rs

use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use armoire_cli::chat::run_stylist_loop;
use armoire_cli::client::{BackendClient, ReqwestBackendClient, UserProfile};
use armoire_cli::error::CliError;
use armoire_cli::handlers;
use armoire_cli::io::{IoHandler, StdIoHandler};
use armoire_cli::session::SessionStore;
use armoire_cli::{
    AuthCommand, CliArgs, Commands, MenuNavigation, MenuResult, MenuState, Parser, StylistCommand,
    WardrobeCommand,
};

fn display_name(user: &UserProfile) -> &str {
    user.nickname
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or("you")
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "armoire_cli=info".into());
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = CliArgs::parse();
    let mut io_handler = StdIoHandler::default();

    tracing::info!(base_url = %args.base_url, "Starting Armoire CLI client");

    let session = Arc::new(
        match args.session_file.clone().or_else(SessionStore::default_path) {
            Some(path) => SessionStore::load_or_default(path),
            None => SessionStore::in_memory(),
        },
    );

    let reqwest_client = ReqwestClient::builder()
        .build()
        .context("Failed to build reqwest client")?;
    let client =
        ReqwestBackendClient::new(reqwest_client, args.base_url.clone(), Arc::clone(&session));
    client.set_unauthorized_handler(|| {
        println!("\nYour session has expired. Please log in again.");
    });

    if let Some(command) = args.command {
        return dispatch_command(command, &client, &session, &mut io_handler).await;
    }

    io_handler.write_line("Welcome to Armoire!")?;
    io_handler.write_line(&format!("Connecting to: {}", args.base_url))?;

    // Resume a persisted session when one is on disk.
    let mut logged_in_user: Option<UserProfile> = session.user();
    if let Some(user) = &logged_in_user {
        io_handler.write_line(&format!("Welcome back, {}.", display_name(user)))?;
    }

    loop {
        if logged_in_user.is_none() {
            // --- Unauthenticated Menu ---
            io_handler.write_line("\n--- Main Menu ---")?;
            io_handler.write_line("[1] Log in with SMS code")?;
            io_handler.write_line("[2] Log in with password")?;
            io_handler.write_line("[3] Register")?;
            io_handler.write_line("[4] Send login code")?;
            io_handler.write_line("[q] Quit")?;

            let choice = io_handler.read_line("Enter choice:")?;
            match choice.as_str() {
                "1" => {
                    match handlers::handle_sms_login_action(&client, &session, &mut io_handler)
                        .await
                    {
                        Ok(user) => {
                            tracing::info!(nickname = ?user.nickname, "Login successful");
                            io_handler
                                .write_line(&format!("Logged in as '{}'.", display_name(&user)))?;
                            logged_in_user = Some(user);
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Login failed");
                            io_handler.write_line(&format!("Login failed: {}", e))?;
                        }
                    }
                }
                "2" => {
                    match handlers::handle_password_login_action(
                        &client,
                        &session,
                        &mut io_handler,
                    )
                    .await
                    {
                        Ok(user) => {
                            tracing::info!(nickname = ?user.nickname, "Login successful");
                            io_handler
                                .write_line(&format!("Logged in as '{}'.", display_name(&user)))?;
                            logged_in_user = Some(user);
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Login failed");
                            io_handler.write_line(&format!("Login failed: {}", e))?;
                        }
                    }
                }
                "3" => {
                    match handlers::handle_registration_action(&client, &session, &mut io_handler)
                        .await
                    {
                        Ok(user) => {
                            tracing::info!(nickname = ?user.nickname, "Registration successful");
                            io_handler.write_line(&format!(
                                "Registered and logged in as '{}'.",
                                display_name(&user)
                            ))?;
                            logged_in_user = Some(user);
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Registration failed");
                            io_handler.write_line(&format!("Registration failed: {}", e))?;
                        }
                    }
                }
                "4" => {
                    if let Err(e) =
                        handlers::handle_send_code_action(&client, &mut io_handler).await
                    {
                        tracing::error!(error = ?e, "Sending login code failed");
                        io_handler.write_line(&format!("Could not send the code: {}", e))?;
                    }
                }
                "q" | "Q" => {
                    io_handler.write_line("Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    io_handler.write_line("Invalid choice, please try again.")?;
                }
            }
        } else {
            // --- Authenticated Menu ---
            let current_user = logged_in_user.as_ref().expect("checked above");
            io_handler.write_line(&format!("\n--- Armoire ({}) ---", display_name(current_user)))?;
            io_handler.write_line("[1] Wardrobe")?;
            io_handler.write_line("[2] Stylist")?;
            io_handler.write_line("[3] Account")?;
            io_handler.write_line("[q] Quit")?;

            let choice = io_handler.read_line("Enter choice:")?;
            let nav = match choice.as_str() {
                "1" => MenuNavigation::GoTo(MenuState::Wardrobe),
                "2" => MenuNavigation::GoTo(MenuState::Stylist),
                "3" => MenuNavigation::GoTo(MenuState::Account),
                "q" | "Q" => MenuNavigation::Quit,
                _ => {
                    io_handler.write_line("Invalid choice, please try again.")?;
                    continue;
                }
            };
            let nav = match nav {
                MenuNavigation::GoTo(MenuState::Wardrobe) => {
                    run_wardrobe_menu(&client, &mut io_handler).await?
                }
                MenuNavigation::GoTo(MenuState::Stylist) => {
                    run_stylist_menu(&client, &mut io_handler).await?
                }
                MenuNavigation::GoTo(MenuState::Account) => {
                    run_account_menu(&session, &client, &mut io_handler).await?
                }
                other => other,
            };
            match nav {
                MenuNavigation::Quit => {
                    io_handler.write_line("Goodbye.")?;
                    return Ok(());
                }
                MenuNavigation::Logout => {
                    logged_in_user = None;
                }
                MenuNavigation::ReturnToMainMenu | MenuNavigation::GoTo(_) => {}
            }
        }
    }
}

async fn run_wardrobe_menu<C: BackendClient, IO: IoHandler>(
    client: &C,
    io_handler: &mut IO,
) -> MenuResult {
    loop {
        io_handler.write_line("\n--- Wardrobe ---")?;
        io_handler.write_line("[1] List items")?;
        io_handler.write_line("[2] Add item from photo")?;
        io_handler.write_line("[3] Analyze several photos")?;
        io_handler.write_line("[4] Remove item")?;
        io_handler.write_line("[b] Back")?;
        io_handler.write_line("[q] Quit")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handlers::handle_list_wardrobe_action(client, io_handler)
                .await
                .map(|_| ()),
            "2" => handlers::handle_analyze_item_action(client, io_handler).await,
            "3" => handlers::handle_batch_analyze_action(client, io_handler).await,
            "4" => handlers::handle_remove_item_action(client, io_handler).await,
            "b" | "B" => return Ok(MenuNavigation::ReturnToMainMenu),
            "q" | "Q" => return Ok(MenuNavigation::Quit),
            _ => {
                io_handler.write_line("Invalid choice, please try again.")?;
                continue;
            }
        };
        if let Err(e) = result {
            if matches!(e, CliError::Unauthorized) {
                return Ok(MenuNavigation::Logout);
            }
            tracing::error!(error = ?e, "Wardrobe action failed");
            io_handler.write_line(&format!("Action failed: {}", e))?;
        }
    }
}

async fn run_stylist_menu<C: BackendClient, IO: IoHandler>(
    client: &C,
    io_handler: &mut IO,
) -> MenuResult {
    loop {
        io_handler.write_line("\n--- Stylist ---")?;
        io_handler.write_line("[1] Outfit recommendation")?;
        io_handler.write_line("[2] Virtual try-on")?;
        io_handler.write_line("[3] Chat")?;
        io_handler.write_line("[b] Back")?;
        io_handler.write_line("[q] Quit")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handlers::handle_recommend_action(client, io_handler).await,
            "2" => handlers::handle_try_on_action(client, io_handler).await,
            "3" => run_stylist_loop(client, io_handler).await,
            "b" | "B" => return Ok(MenuNavigation::ReturnToMainMenu),
            "q" | "Q" => return Ok(MenuNavigation::Quit),
            _ => {
                io_handler.write_line("Invalid choice, please try again.")?;
                continue;
            }
        };
        if let Err(e) = result {
            if matches!(e, CliError::Unauthorized) {
                return Ok(MenuNavigation::Logout);
            }
            tracing::error!(error = ?e, "Stylist action failed");
            io_handler.write_line(&format!("Action failed: {}", e))?;
        }
    }
}

async fn run_account_menu<C: BackendClient, IO: IoHandler>(
    session: &SessionStore,
    client: &C,
    io_handler: &mut IO,
) -> MenuResult {
    loop {
        io_handler.write_line("\n--- Account ---")?;
        io_handler.write_line("[1] My profile")?;
        io_handler.write_line("[2] Validate pro code")?;
        io_handler.write_line("[3] Log out")?;
        io_handler.write_line("[b] Back")?;
        io_handler.write_line("[q] Quit")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handlers::handle_profile_action(session, io_handler),
            "2" => handlers::handle_validate_pro_action(client, io_handler).await,
            "3" => {
                handlers::handle_logout_action(session, io_handler)?;
                return Ok(MenuNavigation::Logout);
            }
            "b" | "B" => return Ok(MenuNavigation::ReturnToMainMenu),
            "q" | "Q" => return Ok(MenuNavigation::Quit),
            _ => {
                io_handler.write_line("Invalid choice, please try again.")?;
                continue;
            }
        };
        if let Err(e) = result {
            if matches!(e, CliError::Unauthorized) {
                return Ok(MenuNavigation::Logout);
            }
            tracing::error!(error = ?e, "Account action failed");
            io_handler.write_line(&format!("Action failed: {}", e))?;
        }
    }
}

async fn dispatch_command(
    command: Commands,
    client: &ReqwestBackendClient,
    session: &SessionStore,
    io_handler: &mut StdIoHandler,
) -> Result<()> {
    match command {
        Commands::Wardrobe(args) => match args.command {
            WardrobeCommand::List => {
                handlers::handle_list_wardrobe_action(client, io_handler).await?;
            }
            WardrobeCommand::Analyze(analyze) => {
                handlers::analyze_paths(client, io_handler, &analyze.paths, analyze.save).await?;
            }
            WardrobeCommand::Remove(remove) => {
                handlers::handle_remove_by_id_action(client, io_handler, remove.id, remove.yes)
                    .await?;
            }
        },
        Commands::Stylist(args) => match args.command {
            StylistCommand::Recommend(recommend) => {
                handlers::recommend_with(client, io_handler, recommend.occasion, recommend.weather)
                    .await?;
            }
            StylistCommand::TryOn(try_on) => {
                handlers::try_on_with(client, io_handler, try_on.items, try_on.person_image_url)
                    .await?;
            }
            StylistCommand::Chat => {
                run_stylist_loop(client, io_handler).await?;
            }
        },
        Commands::Auth(args) => match args.command {
            AuthCommand::SendCode(send_code) => {
                handlers::send_code_with(client, io_handler, &send_code.phone).await?;
            }
            AuthCommand::LoginSms(login) => {
                let user =
                    handlers::login_sms_with(client, session, io_handler, &login.phone, &login.code)
                        .await?;
                io_handler.write_line(&format!("Logged in as '{}'.", display_name(&user)))?;
            }
            AuthCommand::LoginPassword(login) => {
                let user =
                    handlers::login_password_with(client, session, io_handler, login.account)
                        .await?;
                io_handler.write_line(&format!("Logged in as '{}'.", display_name(&user)))?;
            }
            AuthCommand::Register(register) => {
                let user = handlers::register_with(
                    client,
                    session,
                    io_handler,
                    register.email,
                    register.nickname,
                )
                .await?;
                io_handler.write_line(&format!(
                    "Registered and logged in as '{}'.",
                    display_name(&user)
                ))?;
            }
            AuthCommand::Logout => {
                handlers::handle_logout_action(session, io_handler)?;
            }
            AuthCommand::Whoami => {
                handlers::handle_profile_action(session, io_handler)?;
            }
        },
    }
    Ok(())
}
