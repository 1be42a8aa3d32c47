use std::path::PathBuf;

use clap::{Parser, Subcommand};
use faq_chat::{AppConfig, FaqError, Result};

#[derive(Parser, Debug)]
#[command(
    name = "faq-chat",
    version,
    about = "Keyword FAQ matcher and help chat for the food marketplace"
)]
pub struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "FAQ_CHAT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog JSON replacing the built-in FAQ
    #[arg(long, global = true, env = "FAQ_CHAT_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub output: String,

    #[arg(long, global = true, env = "FAQ_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[arg(long, global = true, env = "FAQ_FALLBACK_ENDPOINT")]
    pub fallback_endpoint: Option<String>,

    #[arg(long, global = true, env = "FAQ_FALLBACK_KEY", hide_env_values = true)]
    pub fallback_key: Option<String>,

    #[arg(long, global = true)]
    pub fallback_timeout: Option<humantime::Duration>,

    #[arg(long, global = true)]
    pub max_suggestions: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match one message and print the suggestions
    Ask { text: String },
    /// Print the answer to a canonical question
    Answer { question: String },
    /// Interactive help chat
    Chat {
        /// Write the conversation as JSON on exit
        #[arg(long, value_name = "FILE")]
        transcript: Option<PathBuf>,

        #[arg(long)]
        greeting: Option<String>,

        /// Never call the remote fallback responder
        #[arg(long)]
        no_fallback: bool,
    },
    /// Validate the catalog
    Check,
    /// Write the active catalog as JSON
    Export { path: PathBuf },
    /// Score the matcher against expected suggestion lists
    Eval {
        #[arg(long, value_name = "FILE")]
        cases: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        min_pass_rate: f32,
    },
    /// Print the effective configuration
    Config,
}

impl Cli {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_suggestions == Some(0) {
            return Err("max-suggestions must be > 0".to_string());
        }

        if let Some(timeout) = &self.fallback_timeout {
            if timeout.as_ref().is_zero() {
                return Err("fallback-timeout must be > 0".to_string());
            }
        }

        if let Command::Eval { min_pass_rate, .. } = &self.command {
            if !(0.0..=1.0).contains(min_pass_rate) {
                return Err("min-pass-rate must be within 0..=1".to_string());
            }
        }

        Ok(())
    }

    /// Layer file settings, then env and flags, over the defaults.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        self.validate().map_err(FaqError::InvalidArg)?;

        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(path) = &self.catalog {
            config.catalog = Some(path.clone());
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = Some(url.clone());
        }
        if let Some(endpoint) = &self.fallback_endpoint {
            config.fallback.endpoint = Some(endpoint.clone());
        }
        if let Some(key) = &self.fallback_key {
            config.fallback.api_key = Some(key.clone());
        }
        if let Some(timeout) = &self.fallback_timeout {
            config.fallback.timeout = timeout.to_string();
        }
        if let Some(max) = self.max_suggestions {
            config.matcher.max_suggestions = max;
        }
        if let Command::Chat {
            greeting: Some(greeting),
            ..
        } = &self.command
        {
            config.session.greeting = Some(greeting.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_defaults() {
        let args = ["faq-chat", "ask", "where is my order"];
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.output, "text");
        assert!(cli.max_suggestions.is_none());
        match cli.command {
            Command::Ask { text } => assert_eq!(text, "where is my order"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = [
            "faq-chat",
            "chat",
            "--output",
            "json",
            "--max-suggestions",
            "3",
            "--fallback-timeout",
            "2s",
            "--no-fallback",
        ];
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.output, "json");

        let config = cli.resolve_config().expect("config");
        assert_eq!(config.matcher.max_suggestions, 3);
        assert_eq!(config.fallback.timeout, "2s");
        assert!(matches!(cli.command, Command::Chat { no_fallback: true, .. }));
    }

    #[test]
    fn rejects_zero_suggestions() {
        let cli = Cli::try_parse_from(["faq-chat", "--max-suggestions", "0", "check"])
            .expect("parse");
        assert!(cli.validate().is_err());
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn rejects_out_of_range_pass_rate() {
        let cli = Cli::try_parse_from([
            "faq-chat",
            "eval",
            "--cases",
            "cases.json",
            "--min-pass-rate",
            "1.5",
        ])
        .expect("parse");
        assert!(cli.validate().is_err());
    }

    #[test]
    fn chat_greeting_lands_in_session_config() {
        let cli = Cli::try_parse_from(["faq-chat", "chat", "--greeting", "Muraho!"])
            .expect("parse");
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.session.greeting.as_deref(), Some("Muraho!"));
    }
}
