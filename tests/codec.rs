#![allow(non_snake_case)]
use candid::Nat;
use loteria_client::{
    codec,
    error::GameError,
    types::Rarity,
};
use proptest::prelude::*;

#[test]
fn unwrap_opt__empty_slot_is_none() {
    let slot: Vec<u32> = vec![];
    assert_eq!(codec::unwrap_opt(slot).unwrap(), None);
}

#[test]
fn unwrap_opt__single_slot_is_some() {
    assert_eq!(codec::unwrap_opt(vec![42u32]).unwrap(), Some(42));
}

#[test]
fn unwrap_opt__overfull_slot_is_malformed() {
    let result = codec::unwrap_opt(vec![1u32, 2]);
    assert!(matches!(result, Err(GameError::MalformedResponse(_))));
}

#[test]
fn rarity_from_label__matches_known_backgrounds() {
    assert_eq!(codec::rarity_from_label("gold trim"), Rarity::Rare);
    assert_eq!(codec::rarity_from_label("neon"), Rarity::Epic);
    assert_eq!(codec::rarity_from_label("diamond"), Rarity::Legendary);
    assert_eq!(codec::rarity_from_label("party hats"), Rarity::Uncommon);
}

#[test]
fn rarity_from_label__combined_legacy_label_resolves() {
    assert_eq!(codec::rarity_from_label("uncommon party hats"), Rarity::Uncommon);
}

#[test]
fn rarity_from_label__is_case_insensitive() {
    assert_eq!(codec::rarity_from_label("Gold Trim"), Rarity::Rare);
    assert_eq!(codec::rarity_from_label("NEON"), Rarity::Epic);
}

#[test]
fn rarity_from_label__unknown_label_is_common() {
    assert_eq!(codec::rarity_from_label("plain"), Rarity::Common);
    assert_eq!(codec::rarity_from_label(""), Rarity::Common);
}

#[test]
fn token_and_mode_tags__round_trip_through_the_wire_shapes() {
    use loteria_client::types::{
        GameMode,
        TokenKind,
    };

    for token in TokenKind::ALL {
        let dto = codec::encode_token_type(token);
        assert_eq!(codec::decode_token_type(&dto), token);
    }
    for mode in [GameMode::Line, GameMode::Blackout] {
        let dto = codec::encode_game_mode(mode);
        assert_eq!(codec::decode_game_mode(&dto), mode);
    }
}

#[test]
fn nat_to_u128__rejects_oversized_values() {
    let oversized = Nat::from(u128::MAX) + Nat::from(1u8);
    assert!(matches!(
        codec::nat_to_u128(oversized),
        Err(GameError::MalformedResponse(_))
    ));
}

#[test]
fn tokens_to_base_units__scales_by_e8s() {
    assert_eq!(codec::tokens_to_base_units(0), 0);
    assert_eq!(codec::tokens_to_base_units(1), 100_000_000);
    assert_eq!(codec::tokens_to_base_units(250), 25_000_000_000);
}

#[test]
fn format_balance__whole_and_fractional_amounts() {
    assert_eq!(codec::format_balance(100_000_000, 8), "1");
    assert_eq!(codec::format_balance(123_456_789, 8), "1.23456789");
    assert_eq!(codec::format_balance(100_050_000, 8), "1.0005");
    assert_eq!(codec::format_balance(0, 8), "0");
}

#[test]
fn format_balance__sub_unit_amounts_keep_leading_zeros() {
    assert_eq!(codec::format_balance(1, 8), "0.00000001");
    assert_eq!(codec::format_balance(50_000, 8), "0.0005");
}

proptest! {
    #[test]
    fn format_balance__never_loses_precision(raw in 0u128..=10_000_000_000_000u128) {
        let formatted = codec::format_balance(raw, 8);
        let (whole, fraction) = match formatted.split_once('.') {
            Some((w, f)) => (w.to_string(), f.to_string()),
            None => (formatted.clone(), String::new()),
        };
        let mut padded = fraction.clone();
        while padded.len() < 8 {
            padded.push('0');
        }
        let reparsed: u128 =
            whole.parse::<u128>().unwrap() * 100_000_000 + padded.parse::<u128>().unwrap_or(0);
        prop_assert_eq!(reparsed, raw);
    }
}
