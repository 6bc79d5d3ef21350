//! Execution-context configuration: which replica to talk to, which
//! backend canister hosts the game, and which identity file to sign
//! with. Resolved once at startup and passed down explicitly so the
//! local-vs-mainnet decision is injectable rather than read ambiently.

use candid::Principal;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub const DEFAULT_LOCAL_URL: &str = "http://localhost:4943";
pub const DEFAULT_MAINNET_URL: &str = "https://ic0.app";

/// Environment fallback for the backend canister id.
pub const BACKEND_CANISTER_ENV: &str = "LOTERIA_BACKEND_CANISTER_ID";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NetworkTarget {
    /// Local replica; the actor factory must fetch the root key before
    /// any call against it is trusted.
    Local { url: String },
    Mainnet { url: String },
}

impl NetworkTarget {
    pub fn local() -> Self {
        NetworkTarget::Local {
            url: DEFAULT_LOCAL_URL.to_string(),
        }
    }

    pub fn mainnet() -> Self {
        NetworkTarget::Mainnet {
            url: DEFAULT_MAINNET_URL.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            NetworkTarget::Local { url } => url,
            NetworkTarget::Mainnet { url } => url,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, NetworkTarget::Local { .. })
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkTarget::Local { .. } => "local",
            NetworkTarget::Mainnet { .. } => "mainnet",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IdentityConfig {
    Anonymous,
    PemFile { path: PathBuf },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub network: NetworkTarget,
    pub backend_canister_id: Principal,
    pub identity: IdentityConfig,
}

impl AppConfig {
    pub fn new(
        network: NetworkTarget,
        backend_canister_id: &str,
        identity: IdentityConfig,
    ) -> Result<Self> {
        let backend_canister_id = Principal::from_text(backend_canister_id)
            .wrap_err_with(|| {
                format!("invalid backend canister id '{backend_canister_id}'")
            })?;
        Ok(Self {
            network,
            backend_canister_id,
            identity,
        })
    }

    /// Loads a saved configuration file (JSON, same shape the deploy
    /// tooling writes).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        file.try_into()
    }
}

/// Expands `~` in user-supplied identity paths.
pub fn resolve_pem_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    PathBuf::from(expanded.into_owned())
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    network: String,
    #[serde(default)]
    url: Option<String>,
    backend_canister_id: String,
    #[serde(default)]
    identity_pem: Option<String>,
}

impl TryFrom<ConfigFile> for AppConfig {
    type Error = color_eyre::eyre::Report;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let network = match file.network.as_str() {
            "local" => NetworkTarget::Local {
                url: file.url.unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string()),
            },
            "mainnet" | "ic" => NetworkTarget::Mainnet {
                url: file.url.unwrap_or_else(|| DEFAULT_MAINNET_URL.to_string()),
            },
            other => return Err(eyre!("unknown network '{other}' in config file")),
        };
        let identity = match file.identity_pem.as_deref() {
            Some(raw) => IdentityConfig::PemFile {
                path: resolve_pem_path(raw),
            },
            None => IdentityConfig::Anonymous,
        };
        AppConfig::new(network, &file.backend_canister_id, identity)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn config_file__local_network_defaults_url() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"network": "local", "backend_canister_id": "aaaaa-aa"}"#,
        )
        .unwrap();
        let config = AppConfig::try_from(file).unwrap();

        assert_eq!(config.network, NetworkTarget::local());
        assert_eq!(config.identity, IdentityConfig::Anonymous);
    }

    #[test]
    fn config_file__unknown_network_is_rejected() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"network": "staging", "backend_canister_id": "aaaaa-aa"}"#,
        )
        .unwrap();

        assert!(AppConfig::try_from(file).is_err());
    }

    #[test]
    fn config_file__identity_pem_selects_pem_file() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"network": "mainnet", "backend_canister_id": "aaaaa-aa",
                "identity_pem": "/keys/player.pem"}"#,
        )
        .unwrap();
        let config = AppConfig::try_from(file).unwrap();

        assert_eq!(config.identity, IdentityConfig::PemFile {
            path: PathBuf::from("/keys/player.pem"),
        });
    }

    #[test]
    fn app_config__invalid_canister_text_is_rejected() {
        let result =
            AppConfig::new(NetworkTarget::mainnet(), "not-a-principal", IdentityConfig::Anonymous);

        assert!(result.is_err());
    }
}
