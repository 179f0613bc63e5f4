use clap::{Parser, Subcommand, ValueEnum};
use ludo_gateway::{GatewayConfig, Profile, StorageBackend};
use ludo_telemetry::{LogFormat, TelemetryConfig};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const PROFILE_ENV: &str = "LUDO_PROFILE";
pub const LISTEN_ADDR_ENV: &str = "LUDO_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "LUDO_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "LUDO_DATABASE_URL";
pub const MAX_CONNECTIONS_ENV: &str = "LUDO_MAX_CONNECTIONS";
pub const MIGRATIONS_DIR_ENV: &str = "LUDO_MIGRATIONS_DIR";
pub const LOG_FORMAT_ENV: &str = "LUDO_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "LUDO_OTLP_ENDPOINT";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    #[value(name = "local")]
    Local,
    #[value(name = "production")]
    Production,
}

impl Display for ProfileArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileArg::Local => write!(f, "local"),
            ProfileArg::Production => write!(f, "production"),
        }
    }
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Local => Profile::Local,
            ProfileArg::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

impl From<StorageBackendArg> for StorageBackend {
    fn from(arg: StorageBackendArg) -> Self {
        match arg {
            StorageBackendArg::InMemory => StorageBackend::InMemory,
            StorageBackendArg::Postgres => StorageBackend::Postgres,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply database migrations and exit.
    Migrate,
}

#[derive(Debug, Parser)]
#[command(name = "ludo-gateway")]
pub struct CLI {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(
        long,
        global = true,
        env = PROFILE_ENV,
        value_enum,
        default_value_t = ProfileArg::Local
    )]
    pub profile: ProfileArg,

    /// Overrides the profile's bind address.
    #[arg(long, global = true, env = LISTEN_ADDR_ENV)]
    pub listen_addr: Option<SocketAddr>,

    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(
        long,
        global = true,
        env = DATABASE_URL_ENV,
        required_if_eq("storage", "postgres")
    )]
    pub database_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = MAX_CONNECTIONS_ENV,
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    pub max_connections: u32,

    /// Reads migrations from this directory instead of the bundled set.
    #[arg(long, global = true, env = MIGRATIONS_DIR_ENV)]
    pub migrations_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[arg(long, global = true, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    pub fn config(&self) -> GatewayConfig {
        let profile = Profile::from(self.profile);
        let telemetry = TelemetryConfig::builder()
            .format(self.log_format.into())
            .otlp_endpoint(self.otlp_endpoint.clone())
            .build();

        GatewayConfig::builder()
            .profile(profile)
            .listen_addr(
                self.listen_addr
                    .unwrap_or_else(|| profile.default_listen_addr()),
            )
            .storage(self.storage.into())
            .database_url(self.database_url.clone())
            .max_connections(self.max_connections)
            .migrations_dir(self.migrations_dir.clone())
            .auto_migrate(profile.auto_migrate())
            .telemetry(telemetry)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_serve_in_memory() {
        let cli = CLI::try_parse_from(["ludo-gateway"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);

        let config = cli.config();
        assert_eq!(config.profile, Profile::Local);
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.storage, StorageBackend::InMemory);
        assert!(config.auto_migrate);
        assert_eq!(config.telemetry.format, LogFormat::Text);
    }

    #[test]
    fn production_profile_changes_defaults() {
        let cli = CLI::try_parse_from(["ludo-gateway", "--profile", "production"]).unwrap();
        let config = cli.config();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:10000");
        assert!(!config.auto_migrate);
    }

    #[test]
    fn listen_addr_overrides_profile() {
        let cli = CLI::try_parse_from([
            "ludo-gateway",
            "--profile",
            "production",
            "--listen-addr",
            "127.0.0.1:9999",
        ])
        .unwrap();
        assert_eq!(cli.config().listen_addr.to_string(), "127.0.0.1:9999");
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(CLI::try_parse_from(["ludo-gateway", "--storage", "postgres"]).is_err());

        let cli = CLI::try_parse_from([
            "ludo-gateway",
            "--storage",
            "postgres",
            "--database-url",
            "postgres://localhost/ludo",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/ludo")
        );
    }

    #[test]
    fn migrate_subcommand_accepts_global_flags() {
        let cli = CLI::try_parse_from([
            "ludo-gateway",
            "migrate",
            "--storage",
            "postgres",
            "--database-url",
            "postgres://localhost/ludo",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.command(), Command::Migrate);
        assert_eq!(cli.config().telemetry.format, LogFormat::Json);
    }
}
