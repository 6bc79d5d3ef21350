//! Typed facade over the game backend canister. Every method encodes a
//! request, routes it through a [`Connector`], and decodes the tagged
//! reply into domain types, so callers only ever see [`GameResult`].
//!
//! Local validation runs before any bytes leave the process: a request
//! that cannot succeed remotely is rejected without a network call.

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
        ChatMessage,
        FailedClaim,
        GameDetail,
        GameMode,
        GameSummary,
        PotSummary,
        Profile,
        Rarity,
        TABLA_GRID,
        TablaEarnings,
        TablaInfo,
        TokenKind,
        VolumeReport,
    },
    wire::{
        self,
        WireAck,
        WireResult,
    },
};
use candid::{
    CandidType,
    Decode,
    Encode,
    Nat,
    Principal,
};
use serde::de::DeserializeOwned;
use tracing::warn;

pub const MAX_HOST_FEE_PERCENT: u8 = 20;
pub const MIN_USERNAME_LEN: usize = 5;
pub const MAX_USERNAME_LEN: usize = 20;

#[derive(Clone, Debug)]
pub struct CreateGameParams {
    pub name: String,
    pub mode: GameMode,
    pub token: TokenKind,
    /// Whole tokens; converted to base units remotely.
    pub entry_fee_tokens: u64,
    pub host_fee_percent: u8,
}

#[derive(Clone, Debug)]
pub struct CreateTablaParams {
    pub tabla_id: u32,
    pub cards: Vec<u32>,
    pub rarity: Rarity,
    pub rental_fee: u128,
    pub owner: Principal,
    pub image: Option<String>,
}

pub struct GameService<C> {
    /// Identity-bound endpoint; every attributed call goes through it.
    actor: C,
    /// Anonymous endpoint for the public stats surface.
    public: C,
}

impl GameService<CanisterActor> {
    pub async fn connect(factory: &ActorFactory, session: &Session) -> GameResult<Self> {
        let canister = factory.config().backend_canister_id;
        let actor = factory.create_identity_actor(session, canister).await?;
        let public = factory.create_anonymous_actor(canister).await?;
        Ok(Self::new(actor, public))
    }

    /// Read-only service for browsing without signing in. Mutating
    /// calls still go out, but the backend attributes them to the
    /// anonymous principal and rejects them.
    pub async fn connect_anonymous(factory: &ActorFactory) -> GameResult<Self> {
        let canister = factory.config().backend_canister_id;
        let actor = factory.create_anonymous_actor(canister).await?;
        let public = factory.create_anonymous_actor(canister).await?;
        Ok(Self::new(actor, public))
    }
}

impl<C: Connector> GameService<C> {
    pub fn new(actor: C, public: C) -> Self {
        Self { actor, public }
    }

    // ---------- game listings & details ----------

    pub async fn get_open_games(&self, page: u64) -> GameResult<Vec<GameSummary>> {
        let args = encode_args("getOpenGames", Encode!(&wire::PageRequest {
            page: Nat::from(page)
        }))?;
        let games: Vec<wire::GameViewDto> = self.query_result("getOpenGames", args).await?;
        games.into_iter().map(GameSummary::try_from).collect()
    }

    pub async fn get_active_games(&self, page: u64) -> GameResult<Vec<GameSummary>> {
        let args = encode_args("getActiveGames", Encode!(&wire::PageRequest {
            page: Nat::from(page)
        }))?;
        let games: Vec<wire::GameViewDto> =
            self.query_result("getActiveGames", args).await?;
        games.into_iter().map(GameSummary::try_from).collect()
    }

    pub async fn get_game(&self, game_id: &str) -> GameResult<Option<GameSummary>> {
        let args = encode_args("getGame", Encode!(&wire::GameIdRequest {
            game_id: game_id.to_string()
        }))?;
        let slot: Vec<wire::GameViewDto> = self.query_result("getGame", args).await?;
        codec::unwrap_opt(slot)?.map(GameSummary::try_from).transpose()
    }

    pub async fn get_game_detail(&self, game_id: &str) -> GameResult<Option<GameDetail>> {
        let args = encode_args("getGameDetail", Encode!(&wire::GameIdRequest {
            game_id: game_id.to_string()
        }))?;
        let slot: Vec<wire::GameDetailDto> =
            self.query_result("getGameDetail", args).await?;
        codec::unwrap_opt(slot)?.map(GameDetail::try_from).transpose()
    }

    pub async fn get_draw_history(&self, game_id: &str) -> GameResult<Vec<u32>> {
        let args = encode_args("getDrawHistory", Encode!(&wire::GameIdRequest {
            game_id: game_id.to_string()
        }))?;
        self.query_result("getDrawHistory", args).await
    }

    pub async fn get_recent_games_for_player(
        &self,
        limit: u32,
    ) -> GameResult<Vec<GameSummary>> {
        let args = encode_args("getRecentGamesForPlayer", Encode!(&limit))?;
        let games: Vec<wire::GameViewDto> =
            self.query_result("getRecentGamesForPlayer", args).await?;
        games.into_iter().map(GameSummary::try_from).collect()
    }

    // ---------- game lifecycle ----------

    /// Returns the new game id on success.
    pub async fn create_game(&self, params: &CreateGameParams) -> GameResult<String> {
        if params.name.trim().is_empty() {
            return Err(GameError::Validation("game name must not be empty".into()));
        }
        validate_host_fee(params.host_fee_percent)?;
        let request = wire::CreateGameRequest {
            name: params.name.clone(),
            mode: codec::encode_game_mode(params.mode),
            token_type: codec::encode_token_type(params.token),
            entry_fee: Nat::from(params.entry_fee_tokens),
            host_fee_percent: Nat::from(params.host_fee_percent),
        };
        let args = encode_args("createGame", Encode!(&request))?;
        self.update_result("createGame", args).await
    }

    pub async fn join_game(&self, game_id: &str, tabla_ids: &[u32]) -> GameResult<()> {
        validate_tabla_selection(tabla_ids)?;
        let request = wire::JoinGameRequest {
            game_id: game_id.to_string(),
            tabla_ids: tabla_ids.to_vec(),
        };
        let args = encode_args("joinGame", Encode!(&request))?;
        self.update_ack("joinGame", args).await
    }

    pub async fn start_game(&self, game_id: &str) -> GameResult<()> {
        let args = encode_args("startGame", Encode!(&game_id))?;
        self.update_ack("startGame", args).await
    }

    pub async fn end_game(&self, game_id: &str) -> GameResult<()> {
        let args = encode_args("endGame", Encode!(&game_id))?;
        self.update_ack("endGame", args).await
    }

    pub async fn leave_game(&self, game_id: &str) -> GameResult<()> {
        let args = encode_args("leaveGame", Encode!(&game_id))?;
        self.update_ack("leaveGame", args).await
    }

    /// Host- or admin-initiated cancellation with refunds. The reply
    /// carries a human-readable settlement message.
    pub async fn terminate_game(&self, game_id: &str) -> GameResult<String> {
        let args = encode_args("terminateGame", Encode!(&game_id))?;
        self.update_result("terminateGame", args).await
    }

    /// The drawn card is decided remotely; the returned id is
    /// authoritative and must not be second-guessed locally.
    pub async fn draw_card(&self, game_id: &str) -> GameResult<u32> {
        let args = encode_args("drawCard", Encode!(&game_id))?;
        self.update_result("drawCard", args).await
    }

    /// A win that was accepted but only partially paid out comes back
    /// as [`GameError::PartialPayout`], carrying the recorded claim so
    /// the caller can offer a retry. That is a different failure from
    /// an outright rejection.
    pub async fn claim_win(&self, game_id: &str, tabla_id: u32) -> GameResult<()> {
        let args = encode_args("claimWin", Encode!(&game_id, &tabla_id))?;
        let outcome: wire::ClaimOutcomeDto = self.update_result("claimWin", args).await?;
        match outcome {
            wire::ClaimOutcomeDto::Completed => Ok(()),
            wire::ClaimOutcomeDto::Partial(claim) => {
                Err(GameError::PartialPayout(claim.try_into()?))
            }
        }
    }

    pub async fn retry_failed_claim(&self, game_id: &str) -> GameResult<()> {
        let args = encode_args("retryFailedClaim", Encode!(&game_id))?;
        let outcome: wire::ClaimOutcomeDto =
            self.update_result("retryFailedClaim", args).await?;
        match outcome {
            wire::ClaimOutcomeDto::Completed => Ok(()),
            wire::ClaimOutcomeDto::Partial(claim) => {
                Err(GameError::PartialPayout(claim.try_into()?))
            }
        }
    }

    pub async fn get_failed_claims(&self) -> GameResult<Vec<FailedClaim>> {
        let args = encode_args("getFailedClaims", Encode!())?;
        let claims: Vec<wire::FailedClaimDto> =
            self.query_result("getFailedClaims", args).await?;
        claims.into_iter().map(FailedClaim::try_from).collect()
    }

    pub async fn mark_position(
        &self,
        game_id: &str,
        tabla_id: u32,
        row: u32,
        col: u32,
    ) -> GameResult<()> {
        if row >= TABLA_GRID || col >= TABLA_GRID {
            return Err(GameError::Validation(format!(
                "position ({row}, {col}) is outside the {TABLA_GRID}x{TABLA_GRID} tabla"
            )));
        }
        let position = wire::PositionDto {
            row: Nat::from(row),
            col: Nat::from(col),
        };
        let args = encode_args("markPosition", Encode!(&game_id, &tabla_id, &position))?;
        self.update_ack("markPosition", args).await
    }

    // ---------- tablas ----------

    /// Best-effort: tabla browsing is decoration for the lobby, so a
    /// failing fetch degrades to an empty inventory instead of
    /// propagating.
    pub async fn get_available_tablas(&self) -> Vec<TablaInfo> {
        let result: GameResult<Vec<TablaInfo>> = async {
            let args = encode_args("getAvailableTablas", Encode!())?;
            let tablas: Vec<wire::TablaInfoDto> =
                self.query_result("getAvailableTablas", args).await?;
            tablas.into_iter().map(TablaInfo::try_from).collect()
        }
        .await;
        match result {
            Ok(tablas) => tablas,
            Err(err) => {
                warn!(%err, "getAvailableTablas failed");
                Vec::new()
            }
        }
    }

    /// Strict variant used by the join flow, where an empty inventory
    /// and a failed fetch must not look alike.
    pub async fn get_available_tablas_for_game(
        &self,
        game_id: &str,
    ) -> GameResult<Vec<TablaInfo>> {
        let args = encode_args("getAvailableTablasForGame", Encode!(&wire::GameIdRequest {
            game_id: game_id.to_string()
        }))?;
        let tablas: Vec<wire::TablaInfoDto> =
            self.query_result("getAvailableTablasForGame", args).await?;
        tablas.into_iter().map(TablaInfo::try_from).collect()
    }

    pub async fn get_tabla(&self, tabla_id: u32) -> GameResult<Option<TablaInfo>> {
        let args = encode_args("getTabla", Encode!(&tabla_id))?;
        let slot: Vec<wire::TablaInfoDto> = self.query_result("getTabla", args).await?;
        codec::unwrap_opt(slot)?.map(TablaInfo::try_from).transpose()
    }

    pub async fn get_tabla_cards(&self, tabla_id: u32) -> Vec<u32> {
        let result: GameResult<Vec<u32>> = async {
            let args = encode_args("getTablaCards", Encode!(&tabla_id))?;
            self.query_result("getTablaCards", args).await
        }
        .await;
        match result {
            Ok(cards) => cards,
            Err(err) => {
                warn!(tabla_id, %err, "getTablaCards failed");
                Vec::new()
            }
        }
    }

    pub async fn get_tabla_count(&self) -> GameResult<u64> {
        let args = encode_args("tablaCount", Encode!())?;
        let blob = self.actor.query("tablaCount", args).await?;
        let count =
            Decode!(&blob, Nat).map_err(|e| decode_error("tablaCount", &e))?;
        codec::nat_to_u64(count)
    }

    pub async fn get_tabla_stats(&self, tabla_id: u32) -> Option<TablaEarnings> {
        let result: GameResult<TablaEarnings> = async {
            let args = encode_args("getTablaStats", Encode!(&tabla_id))?;
            let stats: wire::TablaEarningsDto =
                self.query_result("getTablaStats", args).await?;
            stats.try_into()
        }
        .await;
        match result {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(tabla_id, %err, "getTablaStats failed");
                None
            }
        }
    }

    pub async fn get_all_tabla_stats(&self) -> Vec<TablaEarnings> {
        let result: GameResult<Vec<TablaEarnings>> = async {
            let args = encode_args("getAllTablaStats", Encode!())?;
            let stats: Vec<wire::TablaEarningsDto> =
                self.query_result("getAllTablaStats", args).await?;
            stats.into_iter().map(TablaEarnings::try_from).collect()
        }
        .await;
        match result {
            Ok(stats) => stats,
            Err(err) => {
                warn!(%err, "getAllTablaStats failed");
                Vec::new()
            }
        }
    }

    pub async fn update_rental_fee(&self, tabla_id: u32, new_fee: u128) -> GameResult<()> {
        let request = wire::UpdateRentalFeeRequest {
            tabla_id,
            new_fee: Nat::from(new_fee),
        };
        let args = encode_args("updateRentalFee", Encode!(&request))?;
        self.update_ack("updateRentalFee", args).await
    }

    // ---------- chat ----------

    pub async fn get_chat_messages(&self, game_id: &str) -> GameResult<Vec<ChatMessage>> {
        let args = encode_args("getChatMessages", Encode!(&wire::GameIdRequest {
            game_id: game_id.to_string()
        }))?;
        let messages: Vec<wire::ChatMessageDto> =
            self.query_result("getChatMessages", args).await?;
        messages.into_iter().map(ChatMessage::try_from).collect()
    }

    pub async fn send_chat_message(&self, game_id: &str, text: &str) -> GameResult<()> {
        if text.trim().is_empty() {
            return Err(GameError::Validation("chat message must not be empty".into()));
        }
        let args = encode_args("sendChatMessage", Encode!(&game_id, &text))?;
        self.update_ack("sendChatMessage", args).await
    }

    // ---------- profiles ----------

    pub async fn get_profile(&self) -> GameResult<Option<Profile>> {
        let args = encode_args("getProfile", Encode!())?;
        let slot: Vec<wire::ProfileDto> = self.query_result("getProfile", args).await?;
        codec::unwrap_opt(slot)?.map(Profile::try_from).transpose()
    }

    pub async fn create_profile(&self, username: &str) -> GameResult<()> {
        validate_username(username)?;
        let args = encode_args("createProfile", Encode!(&username))?;
        self.update_ack("createProfile", args).await
    }

    pub async fn update_tag(&self, username: &str) -> GameResult<()> {
        validate_username(username)?;
        let args = encode_args("updateTag", Encode!(&username))?;
        self.update_ack("updateTag", args).await
    }

    // ---------- public stats (anonymous endpoint) ----------

    pub async fn get_platform_volume(&self) -> GameResult<Vec<VolumeReport>> {
        let args = encode_args("getPlatformVolume", Encode!())?;
        let volumes: Vec<wire::VolumeDto> =
            self.query_public_result("getPlatformVolume", args).await?;
        volumes.into_iter().map(VolumeReport::try_from).collect()
    }

    pub async fn get_24h_volume(&self) -> GameResult<Vec<VolumeReport>> {
        let args = encode_args("get24hVolume", Encode!())?;
        let volumes: Vec<wire::VolumeDto> =
            self.query_public_result("get24hVolume", args).await?;
        volumes.into_iter().map(VolumeReport::try_from).collect()
    }

    pub async fn get_largest_pots(&self) -> GameResult<Vec<PotSummary>> {
        let args = encode_args("getLargestPots", Encode!())?;
        let pots: Vec<wire::PotSummaryDto> =
            self.query_public_result("getLargestPots", args).await?;
        pots.into_iter().map(PotSummary::try_from).collect()
    }

    // ---------- admin ----------

    pub async fn is_admin(&self) -> GameResult<bool> {
        let args = encode_args("isAdmin", Encode!())?;
        let blob = self.actor.query("isAdmin", args).await?;
        Decode!(&blob, bool).map_err(|e| decode_error("isAdmin", &e))
    }

    /// Returns the number of tablas created.
    pub async fn admin_batch_tablas(
        &self,
        tablas: &[CreateTablaParams],
    ) -> GameResult<u32> {
        let requests = tablas
            .iter()
            .map(|params| {
                if params.cards.len() != crate::types::TABLA_CELLS {
                    return Err(GameError::Validation(format!(
                        "tabla {} has {} cards, expected {}",
                        params.tabla_id,
                        params.cards.len(),
                        crate::types::TABLA_CELLS
                    )));
                }
                Ok(wire::CreateTablaRequest {
                    tabla_id: params.tabla_id,
                    cards: params.cards.clone(),
                    rarity: codec::rarity_label(params.rarity).to_string(),
                    rental_fee: Nat::from(params.rental_fee),
                    owner: params.owner,
                    image: params.image.iter().cloned().collect(),
                })
            })
            .collect::<GameResult<Vec<_>>>()?;
        let args = encode_args("adminBatchTablas", Encode!(&requests))?;
        self.update_result("adminBatchTablas", args).await
    }

    pub async fn delete_tabla(&self, tabla_id: u32) -> GameResult<()> {
        let args = encode_args("deleteTabla", Encode!(&tabla_id))?;
        self.update_ack("deleteTabla", args).await
    }

    pub async fn init_registry(&self, entries: &[(u32, String)]) -> GameResult<()> {
        let entries = entries.to_vec();
        let args = encode_args("initRegistry", Encode!(&entries))?;
        self.update_ack("initRegistry", args).await
    }

    pub async fn upsert_owners(&self, owners: &[(u32, Principal)]) -> GameResult<()> {
        let owners = owners.to_vec();
        let args = encode_args("upsertOwners", Encode!(&owners))?;
        self.update_ack("upsertOwners", args).await
    }

    pub async fn bootstrap_admin(&self) -> GameResult<()> {
        let args = encode_args("bootstrapAdmin", Encode!())?;
        self.update_ack("bootstrapAdmin", args).await
    }

    pub async fn refresh_registry(&self) -> GameResult<()> {
        let args = encode_args("refreshRegistry", Encode!())?;
        self.update_ack("refreshRegistry", args).await
    }

    // ---------- call plumbing ----------

    async fn query_result<T>(&self, method: &str, args: Vec<u8>) -> GameResult<T>
    where
        T: CandidType + DeserializeOwned,
    {
        let blob = self.actor.query(method, args).await?;
        unwrap_wire_result(method, &blob)
    }

    async fn query_public_result<T>(&self, method: &str, args: Vec<u8>) -> GameResult<T>
    where
        T: CandidType + DeserializeOwned,
    {
        let blob = self.public.query(method, args).await?;
        unwrap_wire_result(method, &blob)
    }

    async fn update_result<T>(&self, method: &str, args: Vec<u8>) -> GameResult<T>
    where
        T: CandidType + DeserializeOwned,
    {
        let blob = self.actor.update(method, args).await?;
        unwrap_wire_result(method, &blob)
    }

    async fn update_ack(&self, method: &str, args: Vec<u8>) -> GameResult<()> {
        let blob = self.actor.update(method, args).await?;
        let ack = Decode!(&blob, WireAck).map_err(|e| decode_error(method, &e))?;
        match ack {
            WireAck::Ok => Ok(()),
            WireAck::Err(reason) => Err(GameError::Rejected(reason)),
        }
    }
}

fn unwrap_wire_result<T>(method: &str, blob: &[u8]) -> GameResult<T>
where
    T: CandidType + DeserializeOwned,
{
    let result =
        Decode!(blob, WireResult<T>).map_err(|e| decode_error(method, &e))?;
    match result {
        WireResult::Ok(value) => Ok(value),
        WireResult::Err(reason) => Err(GameError::Rejected(reason)),
    }
}

fn encode_args(method: &str, encoded: Result<Vec<u8>, candid::Error>) -> GameResult<Vec<u8>> {
    encoded.map_err(|e| GameError::Transport(format!("{method}: failed to encode args: {e}")))
}

fn decode_error(method: &str, err: &candid::Error) -> GameError {
    GameError::MalformedResponse(format!("{method}: {err}"))
}

fn validate_host_fee(percent: u8) -> GameResult<()> {
    if percent > MAX_HOST_FEE_PERCENT {
        return Err(GameError::Validation(format!(
            "host fee must be between 0 and {MAX_HOST_FEE_PERCENT} percent, got {percent}"
        )));
    }
    Ok(())
}

fn validate_tabla_selection(tabla_ids: &[u32]) -> GameResult<()> {
    if tabla_ids.is_empty() {
        return Err(GameError::Validation("select at least one tabla".into()));
    }
    for (i, id) in tabla_ids.iter().enumerate() {
        if tabla_ids[..i].contains(id) {
            return Err(GameError::Validation(format!("tabla {id} selected twice")));
        }
    }
    Ok(())
}

fn validate_username(username: &str) -> GameResult<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(GameError::Validation(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(GameError::Validation(
            "username may only contain letters, digits and hyphens".into(),
        ));
    }
    Ok(())
}
