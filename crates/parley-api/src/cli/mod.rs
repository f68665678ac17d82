//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Every chat and image
//! command runs the same core operation the HTTP surface exposes, directly
//! in-process.

pub mod chat;
pub mod image;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use parley_types::llm::{ImageModelType, ModelType};
use parley_types::session::{DEFAULT_SYSTEM_INSTRUCTIONS, GenerationConfig};

use crate::http::extractors::json::check_temperature;

/// Session-backed chat and image generation over multiple model backends.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print only the bare result; logs are limited to errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Config file to use instead of `{data_dir}/config.toml`.
    #[arg(long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Create a chat session and print its id.
    Init {
        /// Chat model: gemini, gpt or grok.
        #[arg(long, short)]
        model: ModelType,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Send one or more messages to a session, in order.
    Send {
        /// Session id returned by `init`.
        session_id: String,

        /// Chat model: gemini, gpt or grok.
        #[arg(long, short)]
        model: ModelType,

        /// Messages to send.
        #[arg(required = true)]
        messages: Vec<String>,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Delete a chat session.
    #[command(alias = "rm")]
    Delete {
        /// Session id to delete.
        session_id: String,
    },

    /// Generate one image and print its URL.
    Image {
        /// Image model.
        #[arg(long, short, default_value = "dallE")]
        model: ImageModelType,

        /// Image description.
        prompt: String,
    },
}

/// Per-call generation settings.
#[derive(Debug, Args)]
pub struct GenerationArgs {
    /// System instructions for the session.
    #[arg(long = "system", default_value = DEFAULT_SYSTEM_INSTRUCTIONS)]
    pub system_instructions: String,

    /// Output token limit per model call.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[arg(long, value_parser = parse_temperature)]
    pub temperature: Option<f64>,

    /// Stop sequence (repeatable).
    #[arg(long = "stop")]
    pub stop_sequences: Vec<String>,
}

impl GenerationArgs {
    pub fn to_config(&self) -> GenerationConfig {
        let stop = (!self.stop_sequences.is_empty()).then(|| self.stop_sequences.clone());
        GenerationConfig::new(
            self.system_instructions.clone(),
            self.max_tokens,
            self.temperature,
            stop,
        )
    }
}

/// Parse a finite temperature.
fn parse_temperature(value: &str) -> Result<f64, String> {
    let temperature: f64 = value
        .parse()
        .map_err(|e| format!("invalid temperature '{value}': {e}"))?;
    check_temperature(Some(temperature))?;
    Ok(temperature)
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Styled,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Plain
        } else {
            OutputMode::Styled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from([
            "parley", "send", "s-1", "--model", "grok", "hello", "world", "--stop", "END",
            "--temperature", "0.3",
        ])
        .unwrap();

        match cli.command {
            Commands::Send {
                session_id,
                model,
                messages,
                generation,
            } => {
                assert_eq!(session_id, "s-1");
                assert_eq!(model, ModelType::Grok);
                assert_eq!(messages, vec!["hello", "world"]);
                let config = generation.to_config();
                assert_eq!(config.system_instructions, DEFAULT_SYSTEM_INSTRUCTIONS);
                assert_eq!(config.temperature, Some(0.3));
                assert_eq!(config.stop_sequences, vec!["END"]);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_model() {
        assert!(Cli::try_parse_from(["parley", "init", "--model", "claude"]).is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite_temperature() {
        for value in ["NaN", "inf", "-inf"] {
            let result = Cli::try_parse_from([
                "parley", "init", "--model", "gpt", "--temperature", value,
            ]);
            assert!(result.is_err(), "accepted temperature {value}");
        }
        assert!(
            Cli::try_parse_from(["parley", "init", "--model", "gpt", "--temperature", "0.9"])
                .is_ok()
        );
    }

    #[test]
    fn test_image_model_defaults_to_dall_e() {
        let cli = Cli::try_parse_from(["parley", "image", "a lighthouse"]).unwrap();
        match cli.command {
            Commands::Image { model, prompt } => {
                assert_eq!(model, ImageModelType::DallE);
                assert_eq!(prompt, "a lighthouse");
            }
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn test_output_mode() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::Plain);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Styled);
    }
}
