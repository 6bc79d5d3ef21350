//! Client-side views of remote game state. Authoritative copies live in
//! the backend canister; these shapes are what the store and UI consume.

use candid::Principal;
use chrono::{
    DateTime,
    Utc,
};
use std::fmt;

/// Tablas are fixed 4x4 boards.
pub const TABLA_GRID: u32 = 4;
pub const TABLA_CELLS: usize = 16;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TokenKind {
    Icp,
    CkBtc,
    Gldt,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [TokenKind::Icp, TokenKind::CkBtc, TokenKind::Gldt];

    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Icp => "ICP",
            TokenKind::CkBtc => "ckBTC",
            TokenKind::Gldt => "GLDT",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Icp => "Internet Computer",
            TokenKind::CkBtc => "Chain Key Bitcoin",
            TokenKind::Gldt => "Gold Token",
        }
    }

    /// All supported assets use 8-decimal base units.
    pub fn decimals(self) -> u32 {
        8
    }

    pub fn icon(self) -> &'static str {
        match self {
            TokenKind::Icp => "/tokens/ICP.svg",
            TokenKind::CkBtc => "/tokens/ck-BTC.svg",
            TokenKind::Gldt => "/tokens/gldt.png",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GameMode {
    Line,
    Blackout,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameMode::Line => "Line",
            GameMode::Blackout => "Blackout",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GameStatus {
    Lobby,
    Active,
    Completed,
    Cancelled,
}

impl GameStatus {
    /// A game is joinable only while it sits in the lobby.
    pub fn is_open(self) -> bool {
        matches!(self, GameStatus::Lobby)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Lobby => "Lobby",
            GameStatus::Active => "Active",
            GameStatus::Completed => "Completed",
            GameStatus::Cancelled => "Cancelled",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TablaStatus {
    Available,
    Rented,
    InGame,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        write!(f, "{label}")
    }
}

/// Abbreviated principal for display ("abcde…wxyz").
pub fn short_principal(text: &str) -> String {
    if text.len() > 9 {
        format!("{}…{}", &text[..5], &text[text.len() - 4..])
    } else {
        text.to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
    pub game_id: String,
    pub name: String,
    pub host: Principal,
    pub mode: GameMode,
    pub token: TokenKind,
    /// Entry fee as whole tokens; the backend scales to base units when
    /// it moves funds.
    pub entry_fee_tokens: u64,
    pub host_fee_percent: u8,
    pub status: GameStatus,
    pub players: Vec<Principal>,
    pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub principal: Principal,
    pub username: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| short_principal(&self.principal.to_text()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSummary {
    pub principal: Principal,
    pub username: Option<String>,
    /// Tabla ids the player brought into this game, in join order.
    pub tablas: Vec<u32>,
}

impl PlayerSummary {
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| short_principal(&self.principal.to_text()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub sender: Principal,
    pub username: Option<String>,
    pub text: String,
    pub sent_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameDetail {
    pub summary: GameSummary,
    pub host: Profile,
    pub players: Vec<PlayerSummary>,
    /// Ordered draw history, append-only for the life of the game.
    pub draw_history: Vec<u32>,
    pub chat: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TablaInfo {
    pub tabla_id: u32,
    /// 16 card ids in row-major order.
    pub cards: Vec<u32>,
    pub rarity: Rarity,
    /// Rental fee in base units.
    pub rental_fee: u128,
    pub owner: Principal,
    pub status: TablaStatus,
    pub image: Option<String>,
}

impl TablaInfo {
    pub fn card_at(&self, row: u32, col: u32) -> Option<u32> {
        if row >= TABLA_GRID || col >= TABLA_GRID {
            return None;
        }
        self.cards.get((row * TABLA_GRID + col) as usize).copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TablaEarnings {
    pub tabla_id: u32,
    pub games_played: u64,
    /// Lifetime rental earnings in base units.
    pub total_earned: u128,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PayeeRole {
    Winner,
    Host,
    TablaOwner,
    Platform,
}

impl fmt::Display for PayeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayeeRole::Winner => "winner",
            PayeeRole::Host => "host",
            PayeeRole::TablaOwner => "tabla owner",
            PayeeRole::Platform => "platform",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PayoutShare {
    pub role: PayeeRole,
    pub payee: Principal,
    /// Amount owed in base units.
    pub amount: u128,
    pub paid: bool,
}

/// A payout that partially failed remotely. The client surfaces it and
/// offers a whole-claim retry; amounts are never mutated locally.
#[derive(Clone, Debug, PartialEq)]
pub struct FailedClaim {
    pub game_id: String,
    pub tabla_id: u32,
    pub payouts: Vec<PayoutShare>,
    pub last_error: String,
    /// Nanoseconds since the Unix epoch, as recorded by the backend.
    pub failed_at: u64,
}

impl FailedClaim {
    pub fn failed_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.failed_at.min(i64::MAX as u64) as i64)
    }

    pub fn unpaid_shares(&self) -> impl Iterator<Item = &PayoutShare> {
        self.payouts.iter().filter(|share| !share.paid)
    }
}

/// Balance snapshot for one asset. Replaced atomically per fetch, never
/// patched field by field.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBalance {
    pub token: TokenKind,
    /// Raw balance in base units.
    pub raw: u128,
    /// Ledger transaction fee in base units.
    pub fee: u128,
}

impl TokenBalance {
    pub fn formatted(&self) -> String {
        crate::codec::format_balance(self.raw, self.token.decimals())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolumeReport {
    pub token: TokenKind,
    pub base_units: u128,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PotSummary {
    pub game_id: String,
    pub token: TokenKind,
    pub base_units: u128,
}
