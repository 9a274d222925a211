//! Command-line interface parsing and handling

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::cli::say::run_say;
use crate::core::config::Config;
use crate::core::credentials::{resolve_api_settings, ApiSettings};
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::theme::ThemeMode;
use crate::utils::logging::{init_tracing, LogTarget};

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(version)]
#[command(about = "A terminal chat interface for the Gemini generateContent API")]
#[command(
    long_about = "A full-screen terminal chat that sends your messages, and optionally the text \
of an attached file, to a generative-language model and shows its answers.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    API key (required unless set with 'chatbot set api-key')\n\
  GEMINI_BASE_URL   API base URL (optional)\n\
  GEMINI_MODEL      Model name (optional, defaults to gemini-2.0-flash)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  /attach <path>    Attach a text file to the next message\n\
  /detach           Drop the pending attachment\n\
  PageUp/PageDown   Scroll the conversation\n\
  Ctrl+T            Toggle light/dark theme\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this session
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Attach a text file to the first message
    #[arg(short = 'f', long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Write diagnostic logs to the given file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message text (joined with spaces)
        #[arg(trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);
    let interactive = matches!(command, Commands::Chat);
    init_tracing(LogTarget::choose(args.log, interactive))?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let settings = settings_or_exit(&config, args.model.as_deref());
            let theme = initial_theme(&config);
            run_chat(ChatOptions {
                settings,
                theme,
                initial_file: args.file,
            })
            .await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let settings = settings_or_exit(&config, args.model.as_deref());
            run_say(prompt.join(" "), args.file, settings).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            if let Err(err) = config.set_value(&key, &value) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            if key == "api-key" {
                println!("✅ Set {key}");
            } else {
                println!("✅ Set {key} to: {}", value.trim());
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(err) = config.unset_value(&key) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("{}", config.describe());
            Ok(())
        }
    }
}

fn settings_or_exit(config: &Config, model: Option<&str>) -> ApiSettings {
    match resolve_api_settings(config, model) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            let fixes = err.quick_fixes();
            if !fixes.is_empty() {
                eprintln!();
                eprintln!("💡 Quick fixes:");
                for fix in fixes {
                    eprintln!("  • {fix}");
                }
            }
            std::process::exit(err.exit_code());
        }
    }
}

fn initial_theme(config: &Config) -> ThemeMode {
    match config.theme.as_deref() {
        None => ThemeMode::default(),
        Some(name) => ThemeMode::from_name(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme in config, using dark");
            ThemeMode::default()
        }),
    }
}
