//! Sign-in state. A [`Session`] either carries a PEM-backed identity
//! plus its principal, or nothing at all; there is no state where one
//! is present without the other.

use crate::config::IdentityConfig;
use candid::Principal;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use ic_agent::{
    Identity,
    identity::{
        BasicIdentity,
        Secp256k1Identity,
    },
};
use std::{
    fmt,
    path::Path,
    sync::Arc,
};
use tracing::warn;

#[derive(Clone, Default)]
pub struct Session {
    identity: Option<Arc<dyn Identity>>,
    principal: Option<Principal>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Rebuilds the session from saved configuration. A missing PEM
    /// file degrades to an anonymous session rather than failing
    /// startup; read-only browsing must still work.
    pub fn restore(config: &IdentityConfig) -> Result<Self> {
        match config {
            IdentityConfig::Anonymous => Ok(Self::anonymous()),
            IdentityConfig::PemFile { path } => {
                if path.exists() {
                    Self::sign_in_with_pem(path)
                } else {
                    warn!(
                        pem = %path.display(),
                        "identity file missing, continuing unauthenticated"
                    );
                    Ok(Self::anonymous())
                }
            }
        }
    }

    pub fn sign_in_with_pem(path: &Path) -> Result<Self> {
        let identity = load_pem_identity(path)?;
        let principal = identity
            .sender()
            .map_err(|e| eyre!("identity at {} has no principal: {e}", path.display()))?;
        Ok(Self {
            identity: Some(identity),
            principal: Some(principal),
        })
    }

    pub fn sign_out(&mut self) {
        self.identity = None;
        self.principal = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<Arc<dyn Identity>> {
        self.identity.clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.principal
    }

    pub fn principal_text(&self) -> Option<String> {
        self.principal.map(|p| p.to_text())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Secp256k1 PEMs are what dfx exports by default; ed25519 keys are
/// tried second.
pub fn load_pem_identity(path: &Path) -> Result<Arc<dyn Identity>> {
    if let Ok(identity) = Secp256k1Identity::from_pem_file(path) {
        return Ok(Arc::new(identity));
    }
    let identity = BasicIdentity::from_pem_file(path)
        .wrap_err_with(|| format!("failed to load identity from {}", path.display()))?;
    Ok(Arc::new(identity))
}
