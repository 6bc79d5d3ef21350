//! Static card registry: the 54 deck characters, their display colors,
//! and asset path helpers. Unknown ids resolve to stable fallbacks so
//! a deck extension on the backend never breaks rendering here.

use crate::types::Rarity;

pub const TOTAL_CARDS: u32 = 54;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardColor {
    Purple,
    Yellow,
    Blue,
    Fusia,
    Orange,
    Custom,
}

impl CardColor {
    pub fn hex(self) -> &'static str {
        match self {
            CardColor::Purple => "#9D4EDD",
            CardColor::Yellow => "#F4E04D",
            CardColor::Blue => "#29ABE2",
            CardColor::Fusia => "#FF6EC7",
            CardColor::Orange => "#FBB03B",
            CardColor::Custom => "#C9B5E8",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CardInfo {
    pub id: u32,
    pub name: &'static str,
    pub color: CardColor,
}

#[rustfmt::skip]
const CARDS: [CardInfo; TOTAL_CARDS as usize] = [
    CardInfo { id: 1,  name: "El ICP",               color: CardColor::Purple },
    CardInfo { id: 2,  name: "El Miner",             color: CardColor::Yellow },
    CardInfo { id: 3,  name: "El Windoge 98",        color: CardColor::Blue },
    CardInfo { id: 4,  name: "El Pollo",             color: CardColor::Yellow },
    CardInfo { id: 5,  name: "El VictorICP",         color: CardColor::Fusia },
    CardInfo { id: 6,  name: "El Canister",          color: CardColor::Purple },
    CardInfo { id: 7,  name: "El Wizard",            color: CardColor::Purple },
    CardInfo { id: 8,  name: "El Pepe Chad",         color: CardColor::Blue },
    CardInfo { id: 9,  name: "El Bitcoin",           color: CardColor::Orange },
    CardInfo { id: 10, name: "El Wumbro",            color: CardColor::Custom },
    CardInfo { id: 11, name: "La Litecoin",          color: CardColor::Yellow },
    CardInfo { id: 12, name: "El Openchat",          color: CardColor::Fusia },
    CardInfo { id: 13, name: "El Black Swan",        color: CardColor::Purple },
    CardInfo { id: 14, name: "La Bag",               color: CardColor::Yellow },
    CardInfo { id: 15, name: "Los Web 3 Vanguards",  color: CardColor::Custom },
    CardInfo { id: 16, name: "La Network",           color: CardColor::Fusia },
    CardInfo { id: 17, name: "El Vaultbet",          color: CardColor::Fusia },
    CardInfo { id: 18, name: "El Airdrop",           color: CardColor::Blue },
    CardInfo { id: 19, name: "La Plug Wallet",       color: CardColor::Fusia },
    CardInfo { id: 20, name: "El Crab",              color: CardColor::Fusia },
    CardInfo { id: 21, name: "El ckBTC",             color: CardColor::Fusia },
    CardInfo { id: 22, name: "El Motoko",            color: CardColor::Yellow },
    CardInfo { id: 23, name: "La BTC Flower",        color: CardColor::Blue },
    CardInfo { id: 24, name: "La Quokka",            color: CardColor::Orange },
    CardInfo { id: 25, name: "El Bull",              color: CardColor::Fusia },
    CardInfo { id: 26, name: "EL WUMBO",             color: CardColor::Custom },
    CardInfo { id: 27, name: "El Kongswap",          color: CardColor::Custom },
    CardInfo { id: 28, name: "El Yuku",              color: CardColor::Orange },
    CardInfo { id: 29, name: "La Moon",              color: CardColor::Yellow },
    CardInfo { id: 30, name: "El Sonic Dex",         color: CardColor::Orange },
    CardInfo { id: 31, name: "El ICPSwap",           color: CardColor::Orange },
    CardInfo { id: 32, name: "El ckETH",             color: CardColor::Orange },
    CardInfo { id: 33, name: "El Gold Dao",          color: CardColor::Yellow },
    CardInfo { id: 34, name: "El King Bean",         color: CardColor::Purple },
    CardInfo { id: 35, name: "El Ethereum",          color: CardColor::Purple },
    CardInfo { id: 36, name: "La Stoic Wallet",      color: CardColor::Yellow },
    CardInfo { id: 37, name: "El Hacker",            color: CardColor::Purple },
    CardInfo { id: 38, name: "El Party Token",       color: CardColor::Purple },
    CardInfo { id: 39, name: "La Miball",            color: CardColor::Custom },
    CardInfo { id: 40, name: "La Pee Lady",          color: CardColor::Custom },
    CardInfo { id: 41, name: "El Moonshift",         color: CardColor::Blue },
    CardInfo { id: 42, name: "El USDT",              color: CardColor::Orange },
    CardInfo { id: 43, name: "La KawaiiVHS",         color: CardColor::Purple },
    CardInfo { id: 44, name: "El Lambo",             color: CardColor::Yellow },
    CardInfo { id: 45, name: "El Trumpo",            color: CardColor::Custom },
    CardInfo { id: 46, name: "El Toniq Market",      color: CardColor::Blue },
    CardInfo { id: 47, name: "El Bear",              color: CardColor::Fusia },
    CardInfo { id: 48, name: "El BNB",               color: CardColor::Fusia },
    CardInfo { id: 49, name: "El Fuegozard",         color: CardColor::Blue },
    CardInfo { id: 50, name: "Las Diamond Hands",    color: CardColor::Yellow },
    CardInfo { id: 51, name: "El Dogecoin",          color: CardColor::Blue },
    CardInfo { id: 52, name: "La Whale",             color: CardColor::Orange },
    CardInfo { id: 53, name: "La Party Hat",         color: CardColor::Purple },
    CardInfo { id: 54, name: "La Printer",           color: CardColor::Blue },
];

pub fn card(card_id: u32) -> Option<&'static CardInfo> {
    if (1..=TOTAL_CARDS).contains(&card_id) {
        Some(&CARDS[(card_id - 1) as usize])
    } else {
        None
    }
}

pub fn card_name(card_id: u32) -> String {
    match card(card_id) {
        Some(info) => info.name.to_string(),
        None => format!("Card #{card_id}"),
    }
}

pub fn card_color(card_id: u32) -> CardColor {
    card(card_id).map(|info| info.color).unwrap_or(CardColor::Custom)
}

pub fn card_image(card_id: u32) -> String {
    format!("/cards/character_{card_id}.png")
}

pub fn tabla_image(tabla_id: u32) -> String {
    format!("/tablas/tabla_{tabla_id}.png")
}

/// Accent color used when rendering a tabla's rarity tier.
pub fn rarity_color(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "#C9B5E8",
        Rarity::Uncommon => "#29ABE2",
        Rarity::Rare => "#FBB03B",
        Rarity::Epic => "#9D4EDD",
        Rarity::Legendary => "#F4E04D",
    }
}
