//! ICRC ledger access: balances, fees, spending approvals and
//! per-game pot inspection. One connector per supported ledger, all
//! behind the same [`Connector`] seam as the game backend.

use crate::{
    actor::{
        ActorFactory,
        CanisterActor,
        Connector,
    },
    codec,
    error::{
        GameError,
        GameResult,
    },
    session::Session,
    types::{
        PotSummary,
        TokenBalance,
        TokenKind,
    },
    wire,
};
use candid::{
    Decode,
    Encode,
    Nat,
    Principal,
};
use chrono::Utc;
use futures::future::try_join_all;
use sha2::{
    Digest,
    Sha256,
};
use std::collections::BTreeMap;
use tracing::debug;

pub const ICP_LEDGER_CANISTER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";
pub const CKBTC_LEDGER_CANISTER_ID: &str = "mxzaz-hqaaa-aaaar-qaada-cai";
pub const GLDT_LEDGER_CANISTER_ID: &str = "6c7su-kiaaa-aaaar-qaira-cai";

/// Approvals self-expire after five minutes; long enough for the join
/// flow, short enough that a stale approval is not a standing grant.
pub const APPROVAL_TTL_NANOS: u64 = 5 * 60 * 1_000_000_000;

pub fn ledger_canister_id(token: TokenKind) -> &'static str {
    match token {
        TokenKind::Icp => ICP_LEDGER_CANISTER_ID,
        TokenKind::CkBtc => CKBTC_LEDGER_CANISTER_ID,
        TokenKind::Gldt => GLDT_LEDGER_CANISTER_ID,
    }
}

/// Subaccount the backend escrows a game's pot under.
pub fn pot_subaccount(game_id: &str) -> [u8; 32] {
    let digest = Sha256::digest(format!("pot:{game_id}").as_bytes());
    digest.into()
}

#[derive(Clone, Debug, Default)]
pub struct ApproveRequest {
    pub amount: u128,
    pub spender_subaccount: Option<[u8; 32]>,
    pub from_subaccount: Option<[u8; 32]>,
    pub expected_allowance: Option<u128>,
    pub fee: Option<u128>,
    pub memo: Option<Vec<u8>>,
}

pub struct TokenService<C> {
    ledgers: BTreeMap<TokenKind, C>,
    /// The game backend; spender of approvals and owner of pot
    /// subaccounts.
    backend: Principal,
}

impl TokenService<CanisterActor> {
    pub async fn connect(factory: &ActorFactory, session: &Session) -> GameResult<Self> {
        let mut ledgers = BTreeMap::new();
        for token in TokenKind::ALL {
            let canister = Principal::from_text(ledger_canister_id(token))
                .map_err(|e| GameError::Transport(format!("bad ledger principal: {e}")))?;
            let actor = factory.create_identity_actor(session, canister).await?;
            ledgers.insert(token, actor);
        }
        Ok(Self::new(ledgers, factory.config().backend_canister_id))
    }
}

impl<C: Connector> TokenService<C> {
    pub fn new(ledgers: BTreeMap<TokenKind, C>, backend: Principal) -> Self {
        Self { ledgers, backend }
    }

    fn ledger(&self, token: TokenKind) -> GameResult<&C> {
        self.ledgers
            .get(&token)
            .ok_or_else(|| GameError::Transport(format!("no ledger endpoint for {token}")))
    }

    pub async fn balance_of(
        &self,
        token: TokenKind,
        owner: Principal,
        subaccount: Option<[u8; 32]>,
    ) -> GameResult<u128> {
        let account = wire::AccountDto {
            owner,
            subaccount: subaccount.map(|s| s.to_vec()),
        };
        let args = Encode!(&account)
            .map_err(|e| GameError::Transport(format!("icrc1_balance_of: {e}")))?;
        let blob = self.ledger(token)?.query("icrc1_balance_of", args).await?;
        let balance = Decode!(&blob, Nat)
            .map_err(|e| GameError::MalformedResponse(format!("icrc1_balance_of: {e}")))?;
        codec::nat_to_u128(balance)
    }

    pub async fn transaction_fee(&self, token: TokenKind) -> GameResult<u128> {
        let args = Encode!()
            .map_err(|e| GameError::Transport(format!("icrc1_fee: {e}")))?;
        let blob = self.ledger(token)?.query("icrc1_fee", args).await?;
        let fee = Decode!(&blob, Nat)
            .map_err(|e| GameError::MalformedResponse(format!("icrc1_fee: {e}")))?;
        codec::nat_to_u128(fee)
    }

    pub async fn balance(&self, token: TokenKind, owner: Principal) -> GameResult<TokenBalance> {
        let (raw, fee) = futures::try_join!(
            self.balance_of(token, owner, None),
            self.transaction_fee(token)
        )?;
        Ok(TokenBalance { token, raw, fee })
    }

    /// Fetches every supported token concurrently. All-or-error: a
    /// partial balance list would silently misreport net worth, so one
    /// failing ledger fails the whole refresh.
    pub async fn all_balances(&self, owner: Principal) -> GameResult<Vec<TokenBalance>> {
        try_join_all(TokenKind::ALL.iter().map(|&token| self.balance(token, owner))).await
    }

    /// Grants the backend an allowance so it can pull the entry fee.
    /// Returns the ledger block index of the approval.
    pub async fn approve(&self, token: TokenKind, request: &ApproveRequest) -> GameResult<u128> {
        let created_at = now_nanos();
        let args = wire::ApproveArgsDto {
            from_subaccount: request.from_subaccount.map(|s| s.to_vec()),
            spender: wire::AccountDto {
                owner: self.backend,
                subaccount: request.spender_subaccount.map(|s| s.to_vec()),
            },
            amount: Nat::from(request.amount),
            expected_allowance: request.expected_allowance.map(Nat::from),
            expires_at: Some(created_at + APPROVAL_TTL_NANOS),
            fee: request.fee.map(Nat::from),
            memo: request.memo.clone(),
            created_at_time: Some(created_at),
        };
        let args = Encode!(&args)
            .map_err(|e| GameError::Transport(format!("icrc2_approve: {e}")))?;
        let blob = self.ledger(token)?.update("icrc2_approve", args).await?;
        let result = Decode!(&blob, wire::ApproveResultDto)
            .map_err(|e| GameError::MalformedResponse(format!("icrc2_approve: {e}")))?;
        match result {
            wire::ApproveResultDto::Ok(block) => codec::nat_to_u128(block),
            wire::ApproveResultDto::Err(err) => {
                Err(GameError::Rejected(describe_approve_error(&err)))
            }
        }
    }

    /// Reads the escrowed pot for one game straight off the ledger.
    pub async fn pot_balance(&self, game_id: &str, token: TokenKind) -> GameResult<PotSummary> {
        let subaccount = pot_subaccount(game_id);
        debug!(game_id, subaccount = %hex::encode(subaccount), "reading pot balance");
        let base_units = self.balance_of(token, self.backend, Some(subaccount)).await?;
        Ok(PotSummary {
            game_id: game_id.to_string(),
            token,
            base_units,
        })
    }
}

fn now_nanos() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|ns| u64::try_from(ns).ok())
        .unwrap_or_default()
}

fn describe_approve_error(err: &wire::ApproveErrorDto) -> String {
    use wire::ApproveErrorDto as E;
    match err {
        E::BadFee { expected_fee } => format!("bad fee, ledger expects {expected_fee}"),
        E::InsufficientFunds { balance } => {
            format!("insufficient funds, balance is {balance}")
        }
        E::AllowanceChanged { current_allowance } => {
            format!("allowance changed concurrently, now {current_allowance}")
        }
        E::Expired { ledger_time } => format!("approval expired at ledger time {ledger_time}"),
        E::TooOld => "approval created too far in the past".to_string(),
        E::CreatedInFuture { ledger_time } => {
            format!("approval created in the future of ledger time {ledger_time}")
        }
        E::Duplicate { duplicate_of } => {
            format!("duplicate of ledger block {duplicate_of}")
        }
        E::TemporarilyUnavailable => "ledger temporarily unavailable".to_string(),
        E::GenericError { error_code, message } => {
            format!("ledger error {error_code}: {message}")
        }
    }
}

/// Cached wallet balances for the signed-in principal. Same
/// whole-value replacement discipline as the game store: fetches
/// either land completely or leave the previous snapshot in place.
pub struct TokenStore<C> {
    service: TokenService<C>,
    balances: Vec<TokenBalance>,
    is_loading: bool,
    last_error: Option<String>,
    last_updated: Option<chrono::DateTime<Utc>>,
}

impl<C: Connector> TokenStore<C> {
    pub fn new(service: TokenService<C>) -> Self {
        Self {
            service,
            balances: Vec::new(),
            is_loading: false,
            last_error: None,
            last_updated: None,
        }
    }

    pub fn service(&self) -> &TokenService<C> {
        &self.service
    }

    pub fn balances(&self) -> &[TokenBalance] {
        &self.balances
    }

    pub fn balance_for(&self, token: TokenKind) -> Option<&TokenBalance> {
        self.balances.iter().find(|b| b.token == token)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_updated(&self) -> Option<chrono::DateTime<Utc>> {
        self.last_updated
    }

    pub async fn refresh(&mut self, owner: Principal) -> GameResult<()> {
        self.is_loading = true;
        let fetched = self.service.all_balances(owner).await;
        let result = match fetched {
            Ok(balances) => {
                self.balances = balances;
                self.last_updated = Some(Utc::now());
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.is_loading = false;
        match &result {
            Ok(()) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }

    /// Drops cached balances on sign-out.
    pub fn reset(&mut self) {
        self.balances.clear();
        self.is_loading = false;
        self.last_error = None;
        self.last_updated = None;
    }
}
