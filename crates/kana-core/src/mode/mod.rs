//! Mode-string compiler.
//!
//! A mode is a short string of flag characters (`"KV"`, `"rns"`, ...). Each
//! recognised character switches on one [`Flag`]; anything else is ignored.
//! Flags that target the same character family in opposite directions (or
//! that would fight over the kana chain) are rejected as a [`ModeError`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, debug_span};

#[cfg(test)]
mod tests;

/// One conversion directive of a mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Flag {
    /// `r`: full-width Latin letters to ASCII.
    ZenkakuAlphaToHankaku,
    /// `R`: ASCII letters to full-width.
    HankakuAlphaToZenkaku,
    /// `n`: full-width digits to ASCII.
    ZenkakuDigitToHankaku,
    /// `N`: ASCII digits to full-width.
    HankakuDigitToZenkaku,
    /// `a`: full-width letters, digits and symbols to ASCII.
    ZenkakuAsciiToHankaku,
    /// `A`: ASCII letters, digits and symbols to full-width.
    HankakuAsciiToZenkaku,
    /// `s`: ideographic space to ASCII space.
    ZenkakuSpaceToHankaku,
    /// `S`: ASCII space to ideographic space.
    HankakuSpaceToZenkaku,
    /// `k`: full-width katakana to half-width katakana.
    KatakanaToHankaku,
    /// `K`: half-width katakana to full-width katakana.
    HankakuToKatakana,
    /// `h`: hiragana to half-width katakana.
    HiraganaToHankaku,
    /// `H`: half-width katakana to hiragana.
    HankakuToHiragana,
    /// `c`: full-width katakana to hiragana.
    KatakanaToHiragana,
    /// `C`: hiragana to full-width katakana.
    HiraganaToKatakana,
    /// `V`: merge a half-width base kana with a following voicing mark.
    Ligature,
}

impl Flag {
    /// All flags in canonical mode-string order (`rRnNaAsSkKhHcCV`).
    pub const ALL: [Flag; 15] = [
        Flag::ZenkakuAlphaToHankaku,
        Flag::HankakuAlphaToZenkaku,
        Flag::ZenkakuDigitToHankaku,
        Flag::HankakuDigitToZenkaku,
        Flag::ZenkakuAsciiToHankaku,
        Flag::HankakuAsciiToZenkaku,
        Flag::ZenkakuSpaceToHankaku,
        Flag::HankakuSpaceToZenkaku,
        Flag::KatakanaToHankaku,
        Flag::HankakuToKatakana,
        Flag::HiraganaToHankaku,
        Flag::HankakuToHiragana,
        Flag::KatakanaToHiragana,
        Flag::HiraganaToKatakana,
        Flag::Ligature,
    ];

    pub fn from_char(c: char) -> Option<Flag> {
        Flag::ALL.iter().copied().find(|f| f.as_char() == c)
    }

    pub fn as_char(self) -> char {
        match self {
            Flag::ZenkakuAlphaToHankaku => 'r',
            Flag::HankakuAlphaToZenkaku => 'R',
            Flag::ZenkakuDigitToHankaku => 'n',
            Flag::HankakuDigitToZenkaku => 'N',
            Flag::ZenkakuAsciiToHankaku => 'a',
            Flag::HankakuAsciiToZenkaku => 'A',
            Flag::ZenkakuSpaceToHankaku => 's',
            Flag::HankakuSpaceToZenkaku => 'S',
            Flag::KatakanaToHankaku => 'k',
            Flag::HankakuToKatakana => 'K',
            Flag::HiraganaToHankaku => 'h',
            Flag::HankakuToHiragana => 'H',
            Flag::KatakanaToHiragana => 'c',
            Flag::HiraganaToKatakana => 'C',
            Flag::Ligature => 'V',
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Pairs of flags that must not appear together. The pair order here is the
/// order used in error messages, whatever order the mode string had.
pub const CONFLICTS: [(Flag, Flag); 16] = [
    (Flag::ZenkakuAlphaToHankaku, Flag::HankakuAlphaToZenkaku),
    (Flag::ZenkakuDigitToHankaku, Flag::HankakuDigitToZenkaku),
    (Flag::ZenkakuAsciiToHankaku, Flag::HankakuAsciiToZenkaku),
    (Flag::ZenkakuSpaceToHankaku, Flag::HankakuSpaceToZenkaku),
    (Flag::KatakanaToHankaku, Flag::HankakuToKatakana),
    (Flag::HiraganaToHankaku, Flag::HankakuToHiragana),
    (Flag::KatakanaToHiragana, Flag::HiraganaToKatakana),
    (Flag::ZenkakuAlphaToHankaku, Flag::HankakuAsciiToZenkaku),
    (Flag::ZenkakuDigitToHankaku, Flag::HankakuAsciiToZenkaku),
    (Flag::HankakuAlphaToZenkaku, Flag::ZenkakuAsciiToHankaku),
    (Flag::HankakuDigitToZenkaku, Flag::ZenkakuAsciiToHankaku),
    (Flag::KatakanaToHankaku, Flag::KatakanaToHiragana),
    (Flag::KatakanaToHankaku, Flag::HiraganaToKatakana),
    (Flag::HankakuToKatakana, Flag::HankakuToHiragana),
    (Flag::HiraganaToHankaku, Flag::KatakanaToHiragana),
    (Flag::HiraganaToHankaku, Flag::HiraganaToKatakana),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("must not combine '{first}' and '{second}' flags")]
    Conflict { first: Flag, second: Flag },
}

/// A validated set of flags. No two flags of a [`CONFLICTS`] pair are ever
/// both present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModeConfig {
    bits: u16,
}

impl ModeConfig {
    /// Compile a mode string. Repeated flags are harmless; unknown characters
    /// are skipped.
    pub fn parse(mode: &str) -> Result<ModeConfig, ModeError> {
        let _span = debug_span!("compile_mode", mode).entered();
        let mut config = ModeConfig::default();
        for flag in mode.chars().filter_map(Flag::from_char) {
            config.enable(flag)?;
        }
        debug!(flags = %config);
        Ok(config)
    }

    fn enable(&mut self, flag: Flag) -> Result<(), ModeError> {
        for &(first, second) in &CONFLICTS {
            let other = if flag == first {
                second
            } else if flag == second {
                first
            } else {
                continue;
            };
            if self.contains(other) {
                return Err(ModeError::Conflict { first, second });
            }
        }
        self.bits |= flag.bit();
        Ok(())
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Active flags in canonical order.
    pub fn flags(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl FromStr for ModeConfig {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeConfig::parse(s)
    }
}

impl fmt::Display for ModeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.flags() {
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}
