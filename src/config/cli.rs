use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "menu-agent.toml";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "menu-agent")]
#[command(about = "Answers questions about Walt's Burgers menu over HTTP")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listening port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the menu JSON file
    #[arg(long)]
    pub menu: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// Config file (explicit, or the default one when present), then CLI overrides,
    /// then env fallbacks.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                AppConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => AppConfig::default(),
        };

        self.apply_overrides(&mut config);
        config.apply_env_fallbacks();
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(menu) = &self.menu {
            config.menu.path = menu.clone();
        }
        if self.verbose {
            config.logging.level = "trace".to_string();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::parse_from([
            "menu-agent",
            "--config",
            "prod.toml",
            "--port",
            "3000",
            "--menu",
            "menu.json",
            "--json-logs",
        ]);

        assert_eq!(args.config.as_deref(), Some("prod.toml"));
        assert_eq!(args.port, Some(3000));
        assert!(args.json_logs);
        assert!(!args.verbose);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            port: Some(3000),
            menu: Some("other.json".to_string()),
            verbose: true,
            ..Default::default()
        };

        args.apply_overrides(&mut config);

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.menu.path, "other.json");
        assert_eq!(config.logging.level, "trace");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let args = CliArgs {
            config: Some("/definitely/not/here.toml".to_string()),
            ..Default::default()
        };
        assert!(args.load_config().is_err());
    }
}
