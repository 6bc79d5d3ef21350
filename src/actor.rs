//! Canister transport. [`Connector`] is the seam between the service
//! layer and the network: production code goes through a
//! [`CanisterActor`] built by the [`ActorFactory`], tests substitute a
//! fake that replays canned candid blobs.

use crate::{
    config::AppConfig,
    error::{
        GameError,
        GameResult,
        TransportError,
    },
    session::Session,
};
use candid::Principal;
use ic_agent::{
    Agent,
    Identity,
    identity::AnonymousIdentity,
};
use std::sync::Arc;
use tracing::info;

/// Raw call surface against one canister. Arguments and replies are
/// candid-encoded blobs; decoding stays with the caller so the
/// connector has no opinion about method signatures.
#[allow(async_fn_in_trait)]
pub trait Connector {
    async fn query(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError>;

    async fn update(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

#[derive(Clone)]
pub struct ActorFactory {
    config: AppConfig,
}

impl ActorFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn create_actor(
        &self,
        canister: Principal,
        identity: Arc<dyn Identity>,
    ) -> GameResult<CanisterActor> {
        let agent = Agent::builder()
            .with_url(self.config.network.url())
            .with_arc_identity(identity)
            .build()
            .map_err(|e| GameError::Transport(format!("failed to build agent: {e}")))?;
        if self.config.network.is_local() {
            // Local replicas sign with an ad-hoc root key that has to
            // be fetched before any response can be verified. Never
            // reached for mainnet, whose root key is baked in.
            info!(url = self.config.network.url(), "fetching local root key");
            agent
                .fetch_root_key()
                .await
                .map_err(|e| GameError::Transport(format!("root key fetch failed: {e}")))?;
        }
        Ok(CanisterActor { agent, canister })
    }

    pub async fn create_anonymous_actor(
        &self,
        canister: Principal,
    ) -> GameResult<CanisterActor> {
        self.create_actor(canister, Arc::new(AnonymousIdentity)).await
    }

    /// Identity-bound actor for calls the backend attributes to the
    /// caller. Refuses to fall back to anonymous.
    pub async fn create_identity_actor(
        &self,
        session: &Session,
        canister: Principal,
    ) -> GameResult<CanisterActor> {
        let identity = session.identity().ok_or(GameError::NotAuthenticated)?;
        self.create_actor(canister, identity).await
    }
}

#[derive(Clone)]
pub struct CanisterActor {
    agent: Agent,
    canister: Principal,
}

impl CanisterActor {
    pub fn canister(&self) -> Principal {
        self.canister
    }
}

impl Connector for CanisterActor {
    async fn query(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.agent
            .query(&self.canister, method)
            .with_arg(args)
            .call()
            .await
            .map_err(|e| TransportError(format!("{method} query failed: {e}")))
    }

    async fn update(&self, method: &str, args: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.agent
            .update(&self.canister, method)
            .with_arg(args)
            .call_and_wait()
            .await
            .map_err(|e| TransportError(format!("{method} update failed: {e}")))
    }
}
