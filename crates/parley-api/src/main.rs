//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, wires the model registry and
//! session store, then dispatches to a command handler or starts the REST
//! API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use parley_observe::tracing_setup::{TracingOptions, filter_directive, init_tracing, shutdown_tracing};
use parley_types::config::StorageBackend;

use cli::{Cli, Commands, OutputMode};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        enable_otel: cli.otel,
        default_directive: filter_directive(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = OutputMode::from_flags(cli.json, cli.quiet);
    let state = AppState::init(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, "Parley API listening");
            if mode == OutputMode::Styled {
                println!(
                    "  {} Parley API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                if state.config.storage.backend == StorageBackend::File {
                    println!(
                        "  {} {}",
                        console::style("Sessions:").dim(),
                        state::sessions_dir(&state.config).display()
                    );
                }
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if mode == OutputMode::Styled {
                println!("\n  Server stopped.");
            }
        }

        Commands::Init { model, generation } => {
            cli::chat::init_session(&state, model, &generation.to_config(), mode).await?;
        }

        Commands::Send {
            session_id,
            model,
            messages,
            generation,
        } => {
            cli::chat::send_messages(
                &state,
                &session_id,
                model,
                &messages,
                &generation.to_config(),
                mode,
            )
            .await?;
        }

        Commands::Delete { session_id } => {
            cli::chat::delete_session(&state, &session_id, mode).await?;
        }

        Commands::Image { model, prompt } => {
            cli::image::generate_image(&state, model, &prompt, mode).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
