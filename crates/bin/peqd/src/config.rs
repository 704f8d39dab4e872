use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "peqd", version, about = "PE percentile query daemon.")]
struct CliArgs {
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY")]
    supabase_key: Option<String>,

    #[arg(
        long,
        env = "PEQ_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "PEQ_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct PeqConfig {
    pub listen_addr: SocketAddr,
    pub supabase_url: String,
    pub supabase_key: String,
    pub request_timeout: Duration,
    pub enable_stdio: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl PeqConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for PeqConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let supabase_url = args
            .supabase_url
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("SUPABASE_URL"))?;
        let supabase_key = args
            .supabase_key
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("SUPABASE_KEY"))?;

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PEQ_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port)),
            supabase_url,
            supabase_key,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            enable_stdio: args.enable_stdio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            port: DEFAULT_PORT,
            supabase_url: Some("https://demo.supabase.co".to_string()),
            supabase_key: Some("anon-key".to_string()),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            enable_stdio: false,
        }
    }

    #[test]
    fn binds_all_interfaces_on_the_configured_port() {
        let config = PeqConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.enable_stdio);
    }

    #[test]
    fn requires_the_supabase_url() {
        let mut args = base_args();
        args.supabase_url = None;

        let err = PeqConfig::try_from(args).expect_err("config should be rejected");

        assert!(matches!(err, ConfigError::MissingSetting("SUPABASE_URL")));
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let mut args = base_args();
        args.supabase_key = Some("   ".to_string());

        let err = PeqConfig::try_from(args).expect_err("config should be rejected");

        assert!(matches!(err, ConfigError::MissingSetting("SUPABASE_KEY")));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut args = base_args();
        args.request_timeout_secs = 0;

        let err = PeqConfig::try_from(args).expect_err("config should be rejected");

        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "PEQ_REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
