//! Conversion rules and the rule selector.
//!
//! A [`Rule`] maps one code point to one or two code points. A
//! [`ConversionPlan`] is the ordered chain of rules a mode selects, plus the
//! voicing-mark ligature target when `V` is active. Plans are immutable and
//! shared between transducers behind an `Arc`.

pub mod table;


use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::mode::{Flag, ModeConfig, ModeError};
use crate::unicode::{hiragana_to_katakana_char, katakana_to_hiragana_char};
use table::{
    HankakuEntry, HANKAKU_DAKUTEN, HANKAKU_FIRST, HANKAKU_HANDAKUTEN, HANKAKU_KATAKANA,
    HANKAKU_LAST, KANA_OFFSET, KANA_PUNCTUATION, KATAKANA_FIRST, KATAKANA_LAST,
    KATAKANA_TO_HANKAKU,
};

/// Offset between an ASCII character and its full-width form (U+FF01..U+FF5E).
const FULLWIDTH_OFFSET: u32 = 0xFEE0;
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Result of applying a rule to one code point: a base and, when a
/// precomposed voiced kana is split for half-width output, a trailing mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapped {
    pub base: char,
    pub mark: Option<char>,
}

impl Mapped {
    fn one(base: char) -> Self {
        Self { base, mark: None }
    }

    pub fn chars(self) -> impl Iterator<Item = char> {
        std::iter::once(self.base).chain(self.mark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    ZenkakuAlphaToHankaku,
    HankakuAlphaToZenkaku,
    ZenkakuDigitToHankaku,
    HankakuDigitToZenkaku,
    ZenkakuAsciiToHankaku,
    HankakuAsciiToZenkaku,
    ZenkakuSpaceToHankaku,
    HankakuSpaceToZenkaku,
    KatakanaToHankaku,
    HankakuToKatakana,
    HiraganaToHankaku,
    HankakuToHiragana,
    KatakanaToHiragana,
    HiraganaToKatakana,
}

/// ASCII symbols that keep their half-width form under `a`/`A`
/// (`"`, `'`, `\`, `~`).
fn is_width_exempt_ascii(c: char) -> bool {
    matches!(c, '"' | '\'' | '\\' | '~')
}

fn to_fullwidth(c: char) -> Option<char> {
    char::from_u32(c as u32 + FULLWIDTH_OFFSET)
}

fn to_halfwidth(c: char) -> Option<char> {
    char::from_u32(c as u32 - FULLWIDTH_OFFSET)
}

fn hankaku_entry(c: char) -> Option<&'static HankakuEntry> {
    let cp = c as u32;
    if (HANKAKU_FIRST..=HANKAKU_LAST).contains(&cp) {
        HANKAKU_KATAKANA.get((cp - HANKAKU_FIRST) as usize)
    } else {
        None
    }
}

fn punctuation_to_hankaku(c: char) -> Option<Mapped> {
    KANA_PUNCTUATION
        .iter()
        .find(|(full, _)| *full == c)
        .map(|&(_, half)| Mapped::one(half))
}

fn katakana_to_hankaku(c: char) -> Option<Mapped> {
    let cp = c as u32;
    if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&cp) {
        let &(base, mark) = KATAKANA_TO_HANKAKU.get((cp - KATAKANA_FIRST) as usize)?;
        return Some(Mapped { base, mark });
    }
    punctuation_to_hankaku(c)
}

fn push_if(rules: &mut Vec<Rule>, on: bool, rule: Rule) {
    if on {
        rules.push(rule);
    }
}

impl Rule {
    /// The flag that selects this rule.
    pub fn flag(self) -> Flag {
        match self {
            Rule::ZenkakuAlphaToHankaku => Flag::ZenkakuAlphaToHankaku,
            Rule::HankakuAlphaToZenkaku => Flag::HankakuAlphaToZenkaku,
            Rule::ZenkakuDigitToHankaku => Flag::ZenkakuDigitToHankaku,
            Rule::HankakuDigitToZenkaku => Flag::HankakuDigitToZenkaku,
            Rule::ZenkakuAsciiToHankaku => Flag::ZenkakuAsciiToHankaku,
            Rule::HankakuAsciiToZenkaku => Flag::HankakuAsciiToZenkaku,
            Rule::ZenkakuSpaceToHankaku => Flag::ZenkakuSpaceToHankaku,
            Rule::HankakuSpaceToZenkaku => Flag::HankakuSpaceToZenkaku,
            Rule::KatakanaToHankaku => Flag::KatakanaToHankaku,
            Rule::HankakuToKatakana => Flag::HankakuToKatakana,
            Rule::HiraganaToHankaku => Flag::HiraganaToHankaku,
            Rule::HankakuToHiragana => Flag::HankakuToHiragana,
            Rule::KatakanaToHiragana => Flag::KatakanaToHiragana,
            Rule::HiraganaToKatakana => Flag::HiraganaToKatakana,
        }
    }

    /// Map `c`, or `None` when `c` is outside this rule's input range.
    pub fn apply(self, c: char) -> Option<Mapped> {
        match self {
            Rule::ZenkakuAlphaToHankaku => match c {
                'Ａ'..='Ｚ' | 'ａ'..='ｚ' => to_halfwidth(c).map(Mapped::one),
                _ => None,
            },
            Rule::HankakuAlphaToZenkaku => match c {
                'A'..='Z' | 'a'..='z' => to_fullwidth(c).map(Mapped::one),
                _ => None,
            },
            Rule::ZenkakuDigitToHankaku => match c {
                '０'..='９' => to_halfwidth(c).map(Mapped::one),
                _ => None,
            },
            Rule::HankakuDigitToZenkaku => match c {
                '0'..='9' => to_fullwidth(c).map(Mapped::one),
                _ => None,
            },
            Rule::ZenkakuAsciiToHankaku => match c {
                '！'..='～' => to_halfwidth(c)
                    .filter(|h| !is_width_exempt_ascii(*h))
                    .map(Mapped::one),
                _ => None,
            },
            Rule::HankakuAsciiToZenkaku => match c {
                '!'..='~' if !is_width_exempt_ascii(c) => to_fullwidth(c).map(Mapped::one),
                _ => None,
            },
            Rule::ZenkakuSpaceToHankaku => (c == IDEOGRAPHIC_SPACE).then_some(Mapped::one(' ')),
            Rule::HankakuSpaceToZenkaku => (c == ' ').then_some(Mapped::one(IDEOGRAPHIC_SPACE)),
            Rule::KatakanaToHankaku => katakana_to_hankaku(c),
            Rule::HankakuToKatakana => hankaku_entry(c).map(|e| Mapped::one(e.full)),
            Rule::HiraganaToHankaku => match c {
                'ぁ'..='ん' => katakana_to_hankaku(hiragana_to_katakana_char(c)),
                _ => punctuation_to_hankaku(c),
            },
            Rule::HankakuToHiragana => {
                hankaku_entry(c).map(|e| Mapped::one(katakana_to_hiragana_char(e.full)))
            }
            Rule::KatakanaToHiragana => match c {
                'ァ'..='ヴ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - KANA_OFFSET).map(Mapped::one),
                _ => None,
            },
            Rule::HiraganaToKatakana => match c {
                'ぁ'..='ん' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + KANA_OFFSET).map(Mapped::one),
                _ => None,
            },
        }
    }

    /// Apply this rule alone to a whole string.
    pub fn apply_str(self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match self.apply(c) {
                Some(mapped) => out.extend(mapped.chars()),
                None => out.push(c),
            }
        }
        out
    }
}

/// Script that half-width base + voicing mark pairs are merged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LigatureTarget {
    Katakana,
    Hiragana,
}

impl LigatureTarget {
    /// Whether `c` is a half-width base that may merge with a following mark.
    /// The hiragana families stop at ん, so ｳ only merges into katakana.
    pub fn is_combinable(self, c: char) -> bool {
        match hankaku_entry(c) {
            Some(entry) if entry.dakuten.is_some() => {
                !(self == LigatureTarget::Hiragana && entry.full == 'ウ')
            }
            _ => false,
        }
    }

    /// The precomposed form of `base` followed by `mark`, if one exists.
    pub fn compose(self, base: char, mark: char) -> Option<char> {
        if !self.is_combinable(base) {
            return None;
        }
        let entry = hankaku_entry(base)?;
        let composed = match mark {
            HANKAKU_DAKUTEN => entry.dakuten,
            HANKAKU_HANDAKUTEN => entry.handakuten,
            _ => None,
        }?;
        Some(match self {
            LigatureTarget::Katakana => composed,
            LigatureTarget::Hiragana => katakana_to_hiragana_char(composed),
        })
    }

    /// Map a half-width character without merging (the plain `K`/`H` rule).
    pub fn map_single(self, c: char) -> char {
        let rule = match self {
            LigatureTarget::Katakana => Rule::HankakuToKatakana,
            LigatureTarget::Hiragana => Rule::HankakuToHiragana,
        };
        rule.apply(c).map_or(c, |m| m.base)
    }
}

pub fn is_voicing_mark(c: char) -> bool {
    c == HANKAKU_DAKUTEN || c == HANKAKU_HANDAKUTEN
}

/// Immutable conversion configuration compiled from a mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    mode: ModeConfig,
    rules: Vec<Rule>,
    ligature: Option<LigatureTarget>,
}

impl ConversionPlan {
    /// Compile a mode string straight into a shareable plan.
    pub fn compile(mode: &str) -> Result<Arc<ConversionPlan>, ModeError> {
        let config = ModeConfig::parse(mode)?;
        Ok(Arc::new(ConversionPlan::from_mode(config)))
    }

    /// Select the rule chain for a validated mode.
    ///
    /// Width rules come first, one per character family. The kana chain
    /// depends on which of `k`, `K`, `h`, `H` leads; `c`/`C` slot in around
    /// it. Within a chain the first rule that accepts a code point wins.
    pub fn from_mode(mode: ModeConfig) -> ConversionPlan {
        let has = |flag| mode.contains(flag);
        let mut rules = Vec::new();

        for (forward, backward) in [
            (Rule::ZenkakuAlphaToHankaku, Rule::HankakuAlphaToZenkaku),
            (Rule::ZenkakuDigitToHankaku, Rule::HankakuDigitToZenkaku),
            (Rule::ZenkakuAsciiToHankaku, Rule::HankakuAsciiToZenkaku),
            (Rule::ZenkakuSpaceToHankaku, Rule::HankakuSpaceToZenkaku),
        ] {
            if has(forward.flag()) {
                rules.push(forward);
            } else if has(backward.flag()) {
                rules.push(backward);
            }
        }

        if has(Flag::KatakanaToHankaku) {
            push_if(&mut rules, has(Flag::HiraganaToHankaku), Rule::HiraganaToHankaku);
            push_if(&mut rules, has(Flag::HankakuToHiragana), Rule::HankakuToHiragana);
            rules.push(Rule::KatakanaToHankaku);
        } else if has(Flag::HankakuToKatakana) {
            push_if(&mut rules, has(Flag::KatakanaToHiragana), Rule::KatakanaToHiragana);
            rules.push(Rule::HankakuToKatakana);
            push_if(&mut rules, has(Flag::HiraganaToHankaku), Rule::HiraganaToHankaku);
            push_if(&mut rules, has(Flag::HiraganaToKatakana), Rule::HiraganaToKatakana);
        } else if has(Flag::HiraganaToHankaku) {
            rules.push(Rule::HiraganaToHankaku);
        } else if has(Flag::HankakuToHiragana) {
            push_if(&mut rules, has(Flag::HiraganaToKatakana), Rule::HiraganaToKatakana);
            rules.push(Rule::HankakuToHiragana);
            push_if(&mut rules, has(Flag::KatakanaToHiragana), Rule::KatakanaToHiragana);
        } else {
            push_if(&mut rules, has(Flag::KatakanaToHiragana), Rule::KatakanaToHiragana);
            push_if(&mut rules, has(Flag::HiraganaToKatakana), Rule::HiraganaToKatakana);
        }

        let ligature = if !has(Flag::Ligature) {
            None
        } else if rules.contains(&Rule::HankakuToKatakana) {
            Some(LigatureTarget::Katakana)
        } else if rules.contains(&Rule::HankakuToHiragana) {
            Some(LigatureTarget::Hiragana)
        } else {
            None
        };

        debug!(mode = %mode, rules = ?rules, ligature = ?ligature);
        ConversionPlan {
            mode,
            rules,
            ligature,
        }
    }

    pub fn mode(&self) -> ModeConfig {
        self.mode
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn ligature(&self) -> Option<LigatureTarget> {
        self.ligature
    }

    /// Run `c` through the chain; the first matching rule wins and
    /// unmatched code points pass through.
    pub fn map_char(&self, c: char) -> Mapped {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(c))
            .unwrap_or(Mapped::one(c))
    }
}
