//! Character-level Unicode classification for Japanese text.

use unicode_width::UnicodeWidthStr;

use crate::rules::table::{HANKAKU_FIRST, HANKAKU_LAST, KANA_OFFSET};

/// Check the full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF). Includes rarely-used symbols
/// (゠ U+30A0, ヿ U+30FF) but no unassigned codepoints.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Half-width katakana block, including the half-width CJK punctuation and
/// the two half-width voicing marks (U+FF61..U+FF9F).
pub fn is_hankaku_katakana(c: char) -> bool {
    (HANKAKU_FIRST..=HANKAKU_LAST).contains(&(c as u32))
}

/// Map one hiragana letter or iteration mark to katakana.
/// Voicing marks (゛゜) and everything else are returned unchanged.
pub fn hiragana_to_katakana_char(c: char) -> char {
    match c {
        'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + KANA_OFFSET).unwrap_or(c),
        _ => c,
    }
}

/// Map one katakana letter or iteration mark to hiragana.
/// ー and ・ belong to both scripts and are returned unchanged.
pub fn katakana_to_hiragana_char(c: char) -> char {
    match c {
        'ァ'..='ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c),
        _ => c,
    }
}

/// Per-script character counts and terminal display width of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    pub chars: usize,
    pub hiragana: usize,
    pub katakana: usize,
    pub hankaku_katakana: usize,
    /// Display columns: half-width forms take one, full-width forms two.
    pub width: usize,
}

impl ScriptCounts {
    pub fn of(s: &str) -> Self {
        let mut counts = ScriptCounts {
            width: s.width(),
            ..Default::default()
        };
        for c in s.chars() {
            counts.chars += 1;
            if is_hiragana(c) {
                counts.hiragana += 1;
            } else if is_katakana(c) {
                counts.katakana += 1;
            } else if is_hankaku_katakana(c) {
                counts.hankaku_katakana += 1;
            }
        }
        counts
    }
}

impl std::ops::AddAssign for ScriptCounts {
    fn add_assign(&mut self, other: Self) {
        self.chars += other.chars;
        self.hiragana += other.hiragana;
        self.katakana += other.katakana;
        self.hankaku_katakana += other.hankaku_katakana;
        self.width += other.width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classification() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(is_katakana('ー'));
        assert!(!is_katakana('あ'));
        assert!(is_hankaku_katakana('ｱ'));
        assert!(is_hankaku_katakana('ﾟ'));
        assert!(!is_hankaku_katakana('ア'));
    }

    #[test]
    fn test_kana_char_mapping() {
        assert_eq!(hiragana_to_katakana_char('か'), 'カ');
        assert_eq!(hiragana_to_katakana_char('ゝ'), 'ヽ');
        assert_eq!(hiragana_to_katakana_char('゛'), '゛');
        assert_eq!(hiragana_to_katakana_char('a'), 'a');
        assert_eq!(katakana_to_hiragana_char('ヲ'), 'を');
        assert_eq!(katakana_to_hiragana_char('ヴ'), 'ゔ');
        assert_eq!(katakana_to_hiragana_char('ー'), 'ー');
        assert_eq!(katakana_to_hiragana_char('・'), '・');
    }

    #[test]
    fn test_script_counts() {
        let counts = ScriptCounts::of("ｱｲうエa");
        assert_eq!(counts.chars, 5);
        assert_eq!(counts.hankaku_katakana, 2);
        assert_eq!(counts.hiragana, 1);
        assert_eq!(counts.katakana, 1);
        assert_eq!(counts.width, 1 + 1 + 2 + 2 + 1);

        let mut total = ScriptCounts::of("ｱｲ");
        total += ScriptCounts::of("うエa");
        assert_eq!(total, counts);
    }
}
