//! Chat session commands: init, send, delete.

use parley_types::llm::ModelType;
use parley_types::session::{GenerationConfig, SessionId};

use super::OutputMode;
use crate::state::AppState;

/// Create a session and print its id.
pub async fn init_session(
    state: &AppState,
    model: ModelType,
    config: &GenerationConfig,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let session_id = state.chat.create_session(model, config).await?;

    match mode {
        OutputMode::Json => {
            let out = serde_json::json!({ "sessionId": session_id.as_str() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Plain => println!("{session_id}"),
        OutputMode::Styled => {
            println!();
            println!(
                "  {} Session created with {}",
                console::style("✓").green().bold(),
                console::style(model).cyan()
            );
            println!("  {}", console::style(session_id.as_str()).bold());
            println!();
        }
    }
    Ok(())
}

/// Send a batch of messages and print the joined response.
pub async fn send_messages(
    state: &AppState,
    session_id: &str,
    model: ModelType,
    messages: &[String],
    config: &GenerationConfig,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let session_id = SessionId::from(session_id);
    let response = state
        .chat
        .send_messages(model, &session_id, messages, config)
        .await?;

    match mode {
        OutputMode::Json => {
            let out = serde_json::json!({ "response": response });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Plain => println!("{response}"),
        OutputMode::Styled => {
            println!();
            println!("{}", console::style(format!("  {model}")).cyan().bold());
            for line in response.lines() {
                println!("  {line}");
            }
            println!();
        }
    }
    Ok(())
}

/// Delete a session.
pub async fn delete_session(
    state: &AppState,
    session_id: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let session_id = SessionId::from(session_id);
    state.chat.delete_session(&session_id).await?;

    match mode {
        OutputMode::Json => {
            let out = serde_json::json!({ "deleted": session_id.as_str() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Plain => {}
        OutputMode::Styled => {
            println!(
                "  {} Session {} deleted",
                console::style("✓").green().bold(),
                console::style(session_id.as_str()).dim()
            );
        }
    }
    Ok(())
}
