//! Static conversion tables for the kana families.
//!
//! Every table is a plain array indexed by the code point's offset from the
//! first character of its block, so a lookup is one range check plus one
//! index. The Latin, digit, symbol and space families are fixed offsets and
//! live in `rules/mod.rs`.

pub const HANKAKU_DAKUTEN: char = '\u{FF9E}';
pub const HANKAKU_HANDAKUTEN: char = '\u{FF9F}';

/// First and last code points of the half-width katakana block.
pub const HANKAKU_FIRST: u32 = 0xFF61;
pub const HANKAKU_LAST: u32 = 0xFF9F;

/// First and last code points of the full-width katakana that have a
/// half-width form (ァ..ヴ).
pub const KATAKANA_FIRST: u32 = 0x30A1;
pub const KATAKANA_LAST: u32 = 0x30F4;

/// Distance between a hiragana and its katakana counterpart.
pub const KANA_OFFSET: u32 = 0x60;

/// Full-width counterpart of one half-width katakana, plus the precomposed
/// forms it takes when followed by a voicing mark.
#[derive(Debug, Clone, Copy)]
pub struct HankakuEntry {
    pub full: char,
    pub dakuten: Option<char>,
    pub handakuten: Option<char>,
}

const fn plain(full: char) -> HankakuEntry {
    HankakuEntry {
        full,
        dakuten: None,
        handakuten: None,
    }
}

const fn voiced(full: char, dakuten: char) -> HankakuEntry {
    HankakuEntry {
        full,
        dakuten: Some(dakuten),
        handakuten: None,
    }
}

const fn both(full: char, dakuten: char, handakuten: char) -> HankakuEntry {
    HankakuEntry {
        full,
        dakuten: Some(dakuten),
        handakuten: Some(handakuten),
    }
}

/// U+FF61..U+FF9F, in code point order.
pub const HANKAKU_KATAKANA: [HankakuEntry; 63] = [
    plain('。'), // ｡
    plain('「'), // ｢
    plain('」'), // ｣
    plain('、'), // ､
    plain('・'), // ･
    plain('ヲ'),
    plain('ァ'),
    plain('ィ'),
    plain('ゥ'),
    plain('ェ'),
    plain('ォ'),
    plain('ャ'),
    plain('ュ'),
    plain('ョ'),
    plain('ッ'),
    plain('ー'), // ｰ
    plain('ア'),
    plain('イ'),
    voiced('ウ', 'ヴ'),
    plain('エ'),
    plain('オ'),
    voiced('カ', 'ガ'),
    voiced('キ', 'ギ'),
    voiced('ク', 'グ'),
    voiced('ケ', 'ゲ'),
    voiced('コ', 'ゴ'),
    voiced('サ', 'ザ'),
    voiced('シ', 'ジ'),
    voiced('ス', 'ズ'),
    voiced('セ', 'ゼ'),
    voiced('ソ', 'ゾ'),
    voiced('タ', 'ダ'),
    voiced('チ', 'ヂ'),
    voiced('ツ', 'ヅ'),
    voiced('テ', 'デ'),
    voiced('ト', 'ド'),
    plain('ナ'),
    plain('ニ'),
    plain('ヌ'),
    plain('ネ'),
    plain('ノ'),
    both('ハ', 'バ', 'パ'),
    both('ヒ', 'ビ', 'ピ'),
    both('フ', 'ブ', 'プ'),
    both('ヘ', 'ベ', 'ペ'),
    both('ホ', 'ボ', 'ポ'),
    plain('マ'),
    plain('ミ'),
    plain('ム'),
    plain('メ'),
    plain('モ'),
    plain('ヤ'),
    plain('ユ'),
    plain('ヨ'),
    plain('ラ'),
    plain('リ'),
    plain('ル'),
    plain('レ'),
    plain('ロ'),
    plain('ワ'),
    plain('ン'),
    plain('゛'), // ﾞ
    plain('゜'), // ﾟ
];

const fn one(base: char) -> (char, Option<char>) {
    (base, None)
}

const fn dakuten(base: char) -> (char, Option<char>) {
    (base, Some(HANKAKU_DAKUTEN))
}

const fn handakuten(base: char) -> (char, Option<char>) {
    (base, Some(HANKAKU_HANDAKUTEN))
}

/// U+30A1 (ァ) ..= U+30F4 (ヴ), in code point order. Voiced kana decompose
/// into base + half-width mark. ヮ/ワ, ヰ/イ and ヱ/エ share a half-width form.
pub const KATAKANA_TO_HANKAKU: [(char, Option<char>); 84] = [
    one('ｧ'),
    one('ｱ'),
    one('ｨ'),
    one('ｲ'),
    one('ｩ'),
    one('ｳ'),
    one('ｪ'),
    one('ｴ'),
    one('ｫ'),
    one('ｵ'),
    one('ｶ'),
    dakuten('ｶ'),
    one('ｷ'),
    dakuten('ｷ'),
    one('ｸ'),
    dakuten('ｸ'),
    one('ｹ'),
    dakuten('ｹ'),
    one('ｺ'),
    dakuten('ｺ'),
    one('ｻ'),
    dakuten('ｻ'),
    one('ｼ'),
    dakuten('ｼ'),
    one('ｽ'),
    dakuten('ｽ'),
    one('ｾ'),
    dakuten('ｾ'),
    one('ｿ'),
    dakuten('ｿ'),
    one('ﾀ'),
    dakuten('ﾀ'),
    one('ﾁ'),
    dakuten('ﾁ'),
    one('ｯ'),
    one('ﾂ'),
    dakuten('ﾂ'),
    one('ﾃ'),
    dakuten('ﾃ'),
    one('ﾄ'),
    dakuten('ﾄ'),
    one('ﾅ'),
    one('ﾆ'),
    one('ﾇ'),
    one('ﾈ'),
    one('ﾉ'),
    one('ﾊ'),
    dakuten('ﾊ'),
    handakuten('ﾊ'),
    one('ﾋ'),
    dakuten('ﾋ'),
    handakuten('ﾋ'),
    one('ﾌ'),
    dakuten('ﾌ'),
    handakuten('ﾌ'),
    one('ﾍ'),
    dakuten('ﾍ'),
    handakuten('ﾍ'),
    one('ﾎ'),
    dakuten('ﾎ'),
    handakuten('ﾎ'),
    one('ﾏ'),
    one('ﾐ'),
    one('ﾑ'),
    one('ﾒ'),
    one('ﾓ'),
    one('ｬ'),
    one('ﾔ'),
    one('ｭ'),
    one('ﾕ'),
    one('ｮ'),
    one('ﾖ'),
    one('ﾗ'),
    one('ﾘ'),
    one('ﾙ'),
    one('ﾚ'),
    one('ﾛ'),
    one('ﾜ'), // ヮ
    one('ﾜ'),
    one('ｲ'), // ヰ
    one('ｴ'), // ヱ
    one('ｦ'),
    one('ﾝ'),
    dakuten('ｳ'), // ヴ
];

/// Punctuation shared by the katakana and hiragana scripts, with its
/// half-width form.
pub const KANA_PUNCTUATION: [(char, char); 8] = [
    ('、', '､'),
    ('。', '｡'),
    ('「', '｢'),
    ('」', '｣'),
    ('゛', 'ﾞ'),
    ('゜', 'ﾟ'),
    ('・', '･'),
    ('ー', 'ｰ'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hankaku_table_covers_block() {
        assert_eq!(
            HANKAKU_KATAKANA.len() as u32,
            HANKAKU_LAST - HANKAKU_FIRST + 1
        );
        assert_eq!(HANKAKU_KATAKANA[('ｶ' as u32 - HANKAKU_FIRST) as usize].full, 'カ');
        assert_eq!(HANKAKU_KATAKANA[('ﾝ' as u32 - HANKAKU_FIRST) as usize].full, 'ン');
        assert_eq!(
            HANKAKU_KATAKANA[(HANKAKU_HANDAKUTEN as u32 - HANKAKU_FIRST) as usize].full,
            '゜'
        );
    }

    #[test]
    fn katakana_table_covers_block() {
        assert_eq!(
            KATAKANA_TO_HANKAKU.len() as u32,
            KATAKANA_LAST - KATAKANA_FIRST + 1
        );
        assert_eq!(KATAKANA_TO_HANKAKU[('ッ' as u32 - KATAKANA_FIRST) as usize], ('ｯ', None));
        assert_eq!(
            KATAKANA_TO_HANKAKU[('ポ' as u32 - KATAKANA_FIRST) as usize],
            ('ﾎ', Some(HANKAKU_HANDAKUTEN))
        );
    }

    #[test]
    fn voiced_forms_decompose_back_to_their_base() {
        for (offset, entry) in HANKAKU_KATAKANA.iter().enumerate() {
            let base = char::from_u32(HANKAKU_FIRST + offset as u32).unwrap();
            for (composed, mark) in [
                (entry.dakuten, HANKAKU_DAKUTEN),
                (entry.handakuten, HANKAKU_HANDAKUTEN),
            ] {
                let Some(composed) = composed else { continue };
                let idx = (composed as u32 - KATAKANA_FIRST) as usize;
                assert_eq!(KATAKANA_TO_HANKAKU[idx], (base, Some(mark)), "{composed}");
            }
        }
    }
}
