//! Domain codec: pure, deterministic mappings between client-side value
//! shapes and the wire shapes the backend speaks.
//!
//! Every optional slot and every tagged union crossing the boundary goes
//! through this module so no call site reimplements the checks.

use crate::{
    error::{
        GameError,
        GameResult,
    },
    types::{
        GameMode,
        GameStatus,
        Rarity,
        TablaStatus,
        TokenKind,
    },
    wire,
};
use candid::Nat;

/// Base units per whole token (8 decimals for every supported asset).
pub const E8S_PER_TOKEN: u128 = 100_000_000;

pub fn encode_token_type(token: TokenKind) -> wire::TokenTypeDto {
    match token {
        TokenKind::Icp => wire::TokenTypeDto::Icp,
        TokenKind::CkBtc => wire::TokenTypeDto::CkBtc,
        TokenKind::Gldt => wire::TokenTypeDto::Gldt,
    }
}

pub fn decode_token_type(dto: &wire::TokenTypeDto) -> TokenKind {
    match dto {
        wire::TokenTypeDto::Icp => TokenKind::Icp,
        wire::TokenTypeDto::CkBtc => TokenKind::CkBtc,
        wire::TokenTypeDto::Gldt => TokenKind::Gldt,
    }
}

pub fn encode_game_mode(mode: GameMode) -> wire::GameModeDto {
    match mode {
        GameMode::Line => wire::GameModeDto::Line,
        GameMode::Blackout => wire::GameModeDto::Blackout,
    }
}

pub fn decode_game_mode(dto: &wire::GameModeDto) -> GameMode {
    match dto {
        wire::GameModeDto::Line => GameMode::Line,
        wire::GameModeDto::Blackout => GameMode::Blackout,
    }
}

pub fn decode_game_status(dto: &wire::GameStatusDto) -> GameStatus {
    match dto {
        wire::GameStatusDto::Lobby => GameStatus::Lobby,
        wire::GameStatusDto::Active => GameStatus::Active,
        wire::GameStatusDto::Completed => GameStatus::Completed,
        wire::GameStatusDto::Cancelled => GameStatus::Cancelled,
    }
}

pub fn decode_tabla_status(dto: &wire::TablaStatusDto) -> TablaStatus {
    match dto {
        wire::TablaStatusDto::Available => TablaStatus::Available,
        wire::TablaStatusDto::Rented => TablaStatus::Rented,
        wire::TablaStatusDto::InGame => TablaStatus::InGame,
    }
}

/// Maps a free-text rarity label to a tier.
///
/// Labels have drifted over the product's life ("uncommon party hats"
/// style background names), so matching is case-insensitive and accepts
/// one legacy alias per tier. Unrecognized input falls back to the
/// lowest tier; that permissive default is deliberate for this path.
pub fn rarity_from_label(label: &str) -> Rarity {
    let label = label.trim().to_ascii_lowercase();
    if label.contains("uncommon") || label.contains("party hats") {
        Rarity::Uncommon
    } else if label.contains("legendary") || label.contains("diamond") {
        Rarity::Legendary
    } else if label.contains("epic") || label.contains("neon") {
        Rarity::Epic
    } else if label.contains("rare") || label.contains("gold trim") {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Canonical label for a tier, used when the client originates the value
/// (admin batch loads).
pub fn rarity_label(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "common",
        Rarity::Uncommon => "uncommon",
        Rarity::Rare => "rare",
        Rarity::Epic => "epic",
        Rarity::Legendary => "legendary",
    }
}

/// Unwraps the wire representation of an optional value: a zero-or-one
/// element sequence. More than one element violates the contract and
/// fails loudly; it is never silently truncated to the first element.
pub fn unwrap_opt<T>(mut slot: Vec<T>) -> GameResult<Option<T>> {
    match slot.len() {
        0 => Ok(None),
        1 => Ok(slot.pop()),
        n => Err(GameError::MalformedResponse(format!(
            "optional slot carried {n} values"
        ))),
    }
}

/// Converts a wire amount to base units, failing loudly on overflow
/// instead of saturating.
pub fn nat_to_u128(amount: Nat) -> GameResult<u128> {
    u128::try_from(amount.0)
        .map_err(|_| GameError::MalformedResponse("amount exceeds u128 range".into()))
}

pub fn nat_to_u64(value: Nat) -> GameResult<u64> {
    u64::try_from(value.0)
        .map_err(|_| GameError::MalformedResponse("value exceeds u64 range".into()))
}

/// Whole tokens to base units. The multiplication cannot overflow:
/// u64::MAX * 10^8 fits in u128.
pub fn tokens_to_base_units(whole_tokens: u64) -> u128 {
    u128::from(whole_tokens) * E8S_PER_TOKEN
}

/// Renders a base-unit amount as a decimal string without losing
/// precision: integer arithmetic throughout, trailing zeros trimmed,
/// never rounded.
pub fn format_balance(raw: u128, decimals: u32) -> String {
    let divisor = 10u128.pow(decimals);
    let whole = raw / divisor;
    let fraction = raw % divisor;

    if fraction == 0 {
        return whole.to_string();
    }

    let fraction = format!("{fraction:0width$}", width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    format!("{whole}.{fraction}")
}
