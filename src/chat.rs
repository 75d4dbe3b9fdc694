// src/chat.rs

use crate::client::{BackendClient, ChatTurn};
use crate::error::CliError;
use crate::io::IoHandler;

/// Interactive stylist conversation. Reads a line, sends the accumulated
/// history, prints the reply, and repeats until the user types 'quit' or
/// 'exit'. History only grows on a successful exchange.
pub async fn run_stylist_loop<C: BackendClient, IO: IoHandler>(
    client: &C,
    io: &mut IO,
) -> Result<(), CliError> {
    io.write_line("\nChatting with your stylist. Type 'quit' or 'exit' to leave.")?;
    io.write_line("--------------------------------------------------")?;

    let mut history: Vec<ChatTurn> = Vec::new();
    loop {
        let user_input = io.read_line("You:")?;

        if user_input.eq_ignore_ascii_case("quit") || user_input.eq_ignore_ascii_case("exit") {
            io.write_line("Leaving the stylist chat.")?;
            break;
        }
        if user_input.is_empty() {
            continue;
        }

        history.push(ChatTurn::user(user_input));
        match client.stylist_chat(&history).await {
            Ok(reply) => {
                io.write_line(&format!("Stylist: {}", reply.reply))?;
                for suggestion in &reply.suggestions {
                    io.write_line(&format!("  tip: {suggestion}"))?;
                }
                history.push(ChatTurn::assistant(reply.reply));
            }
            Err(e) => {
                // The failed turn is dropped from history so a retry sends
                // a clean transcript.
                history.pop();
                match &e {
                    CliError::Business { message, .. } => {
                        io.write_line(&format!("Stylist: {message}"))?;
                    }
                    e if e.is_connectivity() => {
                        io.write_line(&format!(
                            "Connection problem: {e} Try again in a moment."
                        ))?;
                    }
                    _ => {
                        tracing::error!(target: "armoire_cli::chat", error = ?e, "Stylist chat turn failed");
                        io.write_line(&format!(
                            "Error: could not get a reply. Please try again. ({e})"
                        ))?;
                    }
                }
            }
        }
        io.write_line("--------------------------------------------------")?;
    }
    Ok(())
}
