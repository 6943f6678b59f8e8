//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for asset-assistant
#[derive(Parser, Debug)]
#[command(name = "asset-assistant")]
#[command(author, version, about = "Tool-calling chat assistant for Sitecore asset creation")]
#[command(long_about = r#"
Asset Assistant serves a chat endpoint that streams model output and lets the
model create assets in Sitecore products through validated tool calls.

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/asset-assistant/config.toml   Global config
2. ./assistant.toml or ./.assistant.toml   Project-level config
3. --config <path>                         Explicit config file
4. ASSET_ASSISTANT_<SECTION>__<KEY>        Environment variables

Example:
  asset-assistant --bind 0.0.0.0:3000
  asset-assistant -vv --framing sse --model gpt-4o
"#)]
pub struct Cli {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Model identifier (overrides model.name)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Response framing: sse or data-stream (overrides server.framing)
    #[arg(long, value_name = "FRAMING")]
    pub framing: Option<String>,

    /// Append turn transcripts to this JSONL file (overrides logging.transcript_path)
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["asset-assistant"]);
        assert!(cli.bind.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.show_config);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "asset-assistant",
            "-vv",
            "--bind",
            "0.0.0.0:8080",
            "--framing",
            "sse",
            "--config",
            "custom.toml",
            "--log-json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(cli.framing.as_deref(), Some("sse"));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.log_json);
    }
}
