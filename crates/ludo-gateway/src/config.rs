use ludo_telemetry::TelemetryConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Local,
    Production,
}

impl Profile {
    pub fn default_listen_addr(self) -> SocketAddr {
        match self {
            Profile::Local => SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            Profile::Production => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 10000)),
        }
    }

    /// Whether `serve` applies pending migrations before accepting requests.
    pub fn auto_migrate(self) -> bool {
        matches!(self, Profile::Local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    InMemory,
    Postgres,
}

/// Everything the gateway binary needs to start, resolved once from the CLI.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GatewayConfig {
    #[builder(default)]
    pub profile: Profile,
    pub listen_addr: SocketAddr,
    #[builder(default)]
    pub storage: StorageBackend,
    #[builder(default)]
    pub database_url: Option<String>,
    #[builder(default = 10)]
    pub max_connections: u32,
    #[builder(default)]
    pub migrations_dir: Option<PathBuf>,
    pub auto_migrate: bool,
    #[builder(default)]
    pub telemetry: TelemetryConfig,
}

impl GatewayConfig {
    /// A config carrying `profile`'s defaults and in-memory storage.
    pub fn for_profile(profile: Profile) -> Self {
        Self::builder()
            .profile(profile)
            .listen_addr(profile.default_listen_addr())
            .auto_migrate(profile.auto_migrate())
            .build()
    }
}
