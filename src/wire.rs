//! Wire DTOs: the candid records and variants the backend and ledger
//! canisters speak, plus conversions into the client-side views.
//!
//! Conventions, mirrored from the backend contract:
//! - every fallible remote operation returns a tagged `ok`/`err` variant;
//! - optional single values travel as zero-or-one element sequences and
//!   are unwrapped only through [`crate::codec::unwrap_opt`];
//! - monetary amounts travel as arbitrary-precision naturals in base
//!   units; rarity travels as a free-text label;
//! - record fields are camelCase on the wire (candid hashes the
//!   renamed label, so the renames are load-bearing).

use crate::{
    codec,
    error::{
        GameError,
        GameResult,
    },
    types::{
        ChatMessage,
        FailedClaim,
        GameDetail,
        GameSummary,
        PayeeRole,
        PayoutShare,
        PlayerSummary,
        PotSummary,
        Profile,
        TABLA_CELLS,
        TablaEarnings,
        TablaInfo,
        VolumeReport,
    },
};
use candid::{
    CandidType,
    Deserialize,
    Nat,
    Principal,
};

/// Tagged result carrying an operation-specific payload.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub enum WireResult<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "err")]
    Err(String),
}

/// Tagged result for operations that return no payload. Kept separate
/// from [`WireResult`] because the `ok` alternative carries nothing.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub enum WireAck {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "err")]
    Err(String),
}

// ---------- game variants ----------

#[derive(CandidType, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenTypeDto {
    #[serde(rename = "ICP")]
    Icp,
    #[serde(rename = "ckBTC")]
    CkBtc,
    #[serde(rename = "gldt")]
    Gldt,
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameModeDto {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "blackout")]
    Blackout,
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameStatusDto {
    #[serde(rename = "lobby")]
    Lobby,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum TablaStatusDto {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "rented")]
    Rented,
    #[serde(rename = "inGame")]
    InGame,
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayeeRoleDto {
    #[serde(rename = "winner")]
    Winner,
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "tablaOwner")]
    TablaOwner,
    #[serde(rename = "platform")]
    Platform,
}

// ---------- game records ----------

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct GameViewDto {
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub name: String,
    pub host: Principal,
    pub mode: GameModeDto,
    #[serde(rename = "tokenType")]
    pub token_type: TokenTypeDto,
    #[serde(rename = "entryFee")]
    pub entry_fee: Nat,
    #[serde(rename = "hostFeePercent")]
    pub host_fee_percent: Nat,
    pub status: GameStatusDto,
    pub players: Vec<Principal>,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct ProfileDto {
    pub principal: Principal,
    pub username: Vec<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PlayerSummaryDto {
    pub principal: Principal,
    pub username: Vec<String>,
    pub tablas: Vec<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct ChatMessageDto {
    pub sender: Principal,
    pub username: Vec<String>,
    pub text: String,
    #[serde(rename = "sentAt")]
    pub sent_at: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct GameDetailDto {
    pub game: GameViewDto,
    pub host: ProfileDto,
    pub players: Vec<PlayerSummaryDto>,
    #[serde(rename = "drawHistory")]
    pub draw_history: Vec<u32>,
    pub chat: Vec<ChatMessageDto>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct TablaInfoDto {
    #[serde(rename = "tablaId")]
    pub tabla_id: u32,
    pub cards: Vec<u32>,
    pub rarity: String,
    #[serde(rename = "rentalFee")]
    pub rental_fee: Nat,
    pub owner: Principal,
    pub status: TablaStatusDto,
    pub image: Vec<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct TablaEarningsDto {
    #[serde(rename = "tablaId")]
    pub tabla_id: u32,
    #[serde(rename = "gamesPlayed")]
    pub games_played: u64,
    #[serde(rename = "totalEarned")]
    pub total_earned: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PayoutShareDto {
    pub role: PayeeRoleDto,
    pub payee: Principal,
    pub amount: Nat,
    pub paid: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct FailedClaimDto {
    #[serde(rename = "gameId")]
    pub game_id: String,
    #[serde(rename = "tablaId")]
    pub tabla_id: u32,
    pub payouts: Vec<PayoutShareDto>,
    #[serde(rename = "lastError")]
    pub last_error: String,
    #[serde(rename = "failedAt")]
    pub failed_at: u64,
}

/// Outcome of `claimWin` once the backend accepted the claim: either the
/// full payout completed, or it was recorded as a failed claim.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub enum ClaimOutcomeDto {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "partial")]
    Partial(FailedClaimDto),
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct VolumeDto {
    #[serde(rename = "tokenType")]
    pub token_type: TokenTypeDto,
    pub amount: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PotSummaryDto {
    #[serde(rename = "gameId")]
    pub game_id: String,
    #[serde(rename = "tokenType")]
    pub token_type: TokenTypeDto,
    pub amount: Nat,
}

// ---------- request DTOs ----------

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PageRequest {
    pub page: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct GameIdRequest {
    #[serde(rename = "gameId")]
    pub game_id: String,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct CreateGameRequest {
    pub name: String,
    pub mode: GameModeDto,
    #[serde(rename = "tokenType")]
    pub token_type: TokenTypeDto,
    #[serde(rename = "entryFee")]
    pub entry_fee: Nat,
    #[serde(rename = "hostFeePercent")]
    pub host_fee_percent: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct JoinGameRequest {
    #[serde(rename = "gameId")]
    pub game_id: String,
    /// Ordered set of tabla ids, 1..N. Single-tabla joins are the
    /// one-element case.
    #[serde(rename = "tablaIds")]
    pub tabla_ids: Vec<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PositionDto {
    pub row: Nat,
    pub col: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct UpdateRentalFeeRequest {
    #[serde(rename = "tablaId")]
    pub tabla_id: u32,
    #[serde(rename = "newFee")]
    pub new_fee: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct CreateTablaRequest {
    #[serde(rename = "tablaId")]
    pub tabla_id: u32,
    pub cards: Vec<u32>,
    pub rarity: String,
    #[serde(rename = "rentalFee")]
    pub rental_fee: Nat,
    pub owner: Principal,
    pub image: Vec<String>,
}

// ---------- ICRC ledger types ----------

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct AccountDto {
    pub owner: Principal,
    pub subaccount: Option<Vec<u8>>,
}

impl From<Principal> for AccountDto {
    fn from(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct ApproveArgsDto {
    pub from_subaccount: Option<Vec<u8>>,
    pub spender: AccountDto,
    pub amount: Nat,
    pub expected_allowance: Option<Nat>,
    pub expires_at: Option<u64>,
    pub fee: Option<Nat>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub enum ApproveErrorDto {
    BadFee { expected_fee: Nat },
    InsufficientFunds { balance: Nat },
    AllowanceChanged { current_allowance: Nat },
    Expired { ledger_time: u64 },
    TooOld,
    CreatedInFuture { ledger_time: u64 },
    Duplicate { duplicate_of: Nat },
    TemporarilyUnavailable,
    GenericError { error_code: Nat, message: String },
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub enum ApproveResultDto {
    Ok(Nat),
    Err(ApproveErrorDto),
}

// ---------- conversions ----------

impl TryFrom<GameViewDto> for GameSummary {
    type Error = GameError;

    fn try_from(dto: GameViewDto) -> GameResult<Self> {
        let host_fee_percent = codec::nat_to_u64(dto.host_fee_percent)?;
        let host_fee_percent = u8::try_from(host_fee_percent).map_err(|_| {
            GameError::MalformedResponse("host fee percent exceeds u8 range".into())
        })?;
        Ok(GameSummary {
            game_id: dto.game_id,
            name: dto.name,
            host: dto.host,
            mode: codec::decode_game_mode(&dto.mode),
            token: codec::decode_token_type(&dto.token_type),
            entry_fee_tokens: codec::nat_to_u64(dto.entry_fee)?,
            host_fee_percent,
            status: codec::decode_game_status(&dto.status),
            players: dto.players,
            created_at: dto.created_at,
        })
    }
}

impl TryFrom<ProfileDto> for Profile {
    type Error = GameError;

    fn try_from(dto: ProfileDto) -> GameResult<Self> {
        Ok(Profile {
            principal: dto.principal,
            username: codec::unwrap_opt(dto.username)?,
        })
    }
}

impl TryFrom<PlayerSummaryDto> for PlayerSummary {
    type Error = GameError;

    fn try_from(dto: PlayerSummaryDto) -> GameResult<Self> {
        Ok(PlayerSummary {
            principal: dto.principal,
            username: codec::unwrap_opt(dto.username)?,
            tablas: dto.tablas,
        })
    }
}

impl TryFrom<ChatMessageDto> for ChatMessage {
    type Error = GameError;

    fn try_from(dto: ChatMessageDto) -> GameResult<Self> {
        Ok(ChatMessage {
            sender: dto.sender,
            username: codec::unwrap_opt(dto.username)?,
            text: dto.text,
            sent_at: dto.sent_at,
        })
    }
}

impl TryFrom<GameDetailDto> for GameDetail {
    type Error = GameError;

    fn try_from(dto: GameDetailDto) -> GameResult<Self> {
        Ok(GameDetail {
            summary: dto.game.try_into()?,
            host: dto.host.try_into()?,
            players: dto
                .players
                .into_iter()
                .map(PlayerSummary::try_from)
                .collect::<GameResult<_>>()?,
            draw_history: dto.draw_history,
            chat: dto
                .chat
                .into_iter()
                .map(ChatMessage::try_from)
                .collect::<GameResult<_>>()?,
        })
    }
}

impl TryFrom<TablaInfoDto> for TablaInfo {
    type Error = GameError;

    fn try_from(dto: TablaInfoDto) -> GameResult<Self> {
        if dto.cards.len() != TABLA_CELLS {
            return Err(GameError::MalformedResponse(format!(
                "tabla {} carried {} cards, expected {TABLA_CELLS}",
                dto.tabla_id,
                dto.cards.len()
            )));
        }
        Ok(TablaInfo {
            tabla_id: dto.tabla_id,
            cards: dto.cards,
            rarity: codec::rarity_from_label(&dto.rarity),
            rental_fee: codec::nat_to_u128(dto.rental_fee)?,
            owner: dto.owner,
            status: codec::decode_tabla_status(&dto.status),
            image: codec::unwrap_opt(dto.image)?,
        })
    }
}

impl TryFrom<TablaEarningsDto> for TablaEarnings {
    type Error = GameError;

    fn try_from(dto: TablaEarningsDto) -> GameResult<Self> {
        Ok(TablaEarnings {
            tabla_id: dto.tabla_id,
            games_played: dto.games_played,
            total_earned: codec::nat_to_u128(dto.total_earned)?,
        })
    }
}

impl TryFrom<PayoutShareDto> for PayoutShare {
    type Error = GameError;

    fn try_from(dto: PayoutShareDto) -> GameResult<Self> {
        let role = match dto.role {
            PayeeRoleDto::Winner => PayeeRole::Winner,
            PayeeRoleDto::Host => PayeeRole::Host,
            PayeeRoleDto::TablaOwner => PayeeRole::TablaOwner,
            PayeeRoleDto::Platform => PayeeRole::Platform,
        };
        Ok(PayoutShare {
            role,
            payee: dto.payee,
            amount: codec::nat_to_u128(dto.amount)?,
            paid: dto.paid,
        })
    }
}

impl TryFrom<FailedClaimDto> for FailedClaim {
    type Error = GameError;

    fn try_from(dto: FailedClaimDto) -> GameResult<Self> {
        Ok(FailedClaim {
            game_id: dto.game_id,
            tabla_id: dto.tabla_id,
            payouts: dto
                .payouts
                .into_iter()
                .map(PayoutShare::try_from)
                .collect::<GameResult<_>>()?,
            last_error: dto.last_error,
            failed_at: dto.failed_at,
        })
    }
}

impl TryFrom<VolumeDto> for VolumeReport {
    type Error = GameError;

    fn try_from(dto: VolumeDto) -> GameResult<Self> {
        Ok(VolumeReport {
            token: codec::decode_token_type(&dto.token_type),
            base_units: codec::nat_to_u128(dto.amount)?,
        })
    }
}

impl TryFrom<PotSummaryDto> for PotSummary {
    type Error = GameError;

    fn try_from(dto: PotSummaryDto) -> GameResult<Self> {
        Ok(PotSummary {
            game_id: dto.game_id,
            token: codec::decode_token_type(&dto.token_type),
            base_units: codec::nat_to_u128(dto.amount)?,
        })
    }
}
