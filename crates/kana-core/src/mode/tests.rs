use proptest::prelude::*;

use super::*;

#[test]
fn empty_mode_is_identity() {
    let config = ModeConfig::parse("").unwrap();
    assert!(config.is_empty());
    assert_eq!(config.to_string(), "");
}

#[test]
fn unknown_characters_are_ignored() {
    let config = ModeConfig::parse("xK?V z").unwrap();
    assert_eq!(config.to_string(), "KV");
}

#[test]
fn repeated_flag_is_accepted() {
    let config = ModeConfig::parse("rrr").unwrap();
    assert!(config.contains(Flag::ZenkakuAlphaToHankaku));
    assert_eq!(config.to_string(), "r");
}

#[test]
fn display_is_canonical_order() {
    let config = ModeConfig::parse("VKsr").unwrap();
    assert_eq!(config.to_string(), "rsKV");
}

#[test]
fn from_str_matches_parse() {
    let config: ModeConfig = "HVc".parse().unwrap();
    assert_eq!(config, ModeConfig::parse("cHV").unwrap());
}

#[test]
fn conflict_is_order_independent() {
    let forward = ModeConfig::parse("rR").unwrap_err();
    let backward = ModeConfig::parse("Rr").unwrap_err();
    assert_eq!(forward, backward);
    assert_eq!(forward.to_string(), "must not combine 'r' and 'R' flags");
}

#[test]
fn katakana_and_hiragana_targets_conflict() {
    let err = ModeConfig::parse("KH").unwrap_err();
    assert_eq!(
        err,
        ModeError::Conflict {
            first: Flag::HankakuToKatakana,
            second: Flag::HankakuToHiragana,
        }
    );
    assert_eq!(err.to_string(), "must not combine 'K' and 'H' flags");
}

#[test]
fn combined_ascii_conflicts_with_opposite_subfamilies() {
    assert_eq!(
        ModeConfig::parse("aR").unwrap_err().to_string(),
        "must not combine 'R' and 'a' flags"
    );
    assert_eq!(
        ModeConfig::parse("Na").unwrap_err().to_string(),
        "must not combine 'N' and 'a' flags"
    );
    assert_eq!(
        ModeConfig::parse("Ar").unwrap_err().to_string(),
        "must not combine 'r' and 'A' flags"
    );
    assert_eq!(
        ModeConfig::parse("nA").unwrap_err().to_string(),
        "must not combine 'n' and 'A' flags"
    );
}

#[test]
fn same_direction_subfamilies_combine() {
    assert!(ModeConfig::parse("arn").is_ok());
    assert!(ModeConfig::parse("ARN").is_ok());
}

#[test]
fn permitted_kana_combinations() {
    for mode in ["kh", "kH", "kHV", "Kh", "KhV", "Kc", "KC", "KcV", "HC", "HVc", "sk", "AK"] {
        assert!(ModeConfig::parse(mode).is_ok(), "mode {mode} should compile");
    }
}

#[test]
fn from_char_round_trips_every_flag() {
    for flag in Flag::ALL {
        assert_eq!(Flag::from_char(flag.as_char()), Some(flag));
    }
    assert_eq!(Flag::from_char('x'), None);
}

proptest! {
    #[test]
    fn every_conflict_pair_fails_in_both_orders(idx in 0..CONFLICTS.len(), prefix in "[xyz ]{0,3}") {
        let (first, second) = CONFLICTS[idx];
        let expected = ModeError::Conflict { first, second };

        let forward = format!("{prefix}{}{}", first.as_char(), second.as_char());
        let backward = format!("{}{prefix}{}", second.as_char(), first.as_char());
        prop_assert_eq!(ModeConfig::parse(&forward).unwrap_err(), expected.clone());
        prop_assert_eq!(ModeConfig::parse(&backward).unwrap_err(), expected);

        prop_assert!(ModeConfig::parse(&first.to_string()).is_ok());
        prop_assert!(ModeConfig::parse(&second.to_string()).is_ok());
    }
}
