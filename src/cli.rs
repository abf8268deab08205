use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "replydesk",
    version,
    about = "Terminal dashboard for an AI-assisted social media auto-reply service"
)]
pub struct Flags {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend API base URL, overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Start with auto-reply mode switched on
    #[arg(long)]
    pub auto: bool,

    /// Log level for the replydesk target (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Flags {
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Command-line values win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let flags = Flags::parse_from([
            "replydesk",
            "--base-url",
            "http://example.test/api",
            "--log-level",
            "debug",
            "--auto",
        ]);
        let mut config = Config::default();
        flags.apply(&mut config);

        assert!(flags.auto);
        assert_eq!(config.api.base_url, "http://example.test/api");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let flags = Flags::parse_from(["replydesk"]);
        let mut config = Config::default();
        flags.apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
