use std::fmt::Write as _;

use kana_core::{ConversionPlan, Flag, LigatureTarget, ModeError, Rule};
use serde::Serialize;

use super::die;

/// What a mode string compiles to.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// Canonical form of the mode.
    pub mode: String,
    pub flags: Vec<Flag>,
    /// Rules in the order they are tried.
    pub rules: Vec<Rule>,
    pub ligature: Option<LigatureTarget>,
}

pub fn explain(mode: &str) -> Result<Explanation, ModeError> {
    let plan = ConversionPlan::compile(mode)?;
    Ok(Explanation {
        mode: plan.mode().to_string(),
        flags: plan.mode().flags().collect(),
        rules: plan.rules().to_vec(),
        ligature: plan.ligature(),
    })
}

pub fn format_text(e: &Explanation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "mode: {}", if e.mode.is_empty() { "(none)" } else { &e.mode });
    let _ = writeln!(out, "rules:");
    if e.rules.is_empty() {
        let _ = writeln!(out, "  (identity)");
    }
    for (i, rule) in e.rules.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:?} [{}]", i + 1, rule, rule.flag());
    }
    let ligature = match e.ligature {
        Some(LigatureTarget::Katakana) => "katakana",
        Some(LigatureTarget::Hiragana) => "hiragana",
        None => "off",
    };
    let _ = writeln!(out, "ligature: {ligature}");
    out
}

pub fn explain_cmd(mode: &str, json: bool) {
    let explanation = die!(explain(mode), "Error: {}");
    if json {
        let s = die!(
            serde_json::to_string_pretty(&explanation),
            "Error serializing JSON: {}"
        );
        println!("{s}");
    } else {
        print!("{}", format_text(&explanation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_katakana_ligature() {
        let e = explain("VKsr").unwrap();
        assert_eq!(e.mode, "rsKV");
        assert_eq!(
            e.rules,
            vec![
                Rule::ZenkakuAlphaToHankaku,
                Rule::ZenkakuSpaceToHankaku,
                Rule::HankakuToKatakana
            ]
        );
        assert_eq!(e.ligature, Some(LigatureTarget::Katakana));

        let text = format_text(&e);
        assert!(text.contains("mode: rsKV"));
        assert!(text.contains(" 3. HankakuToKatakana [K]"));
        assert!(text.contains("ligature: katakana"));
    }

    #[test]
    fn explain_empty_mode() {
        let text = format_text(&explain("").unwrap());
        assert!(text.contains("mode: (none)"));
        assert!(text.contains("(identity)"));
        assert!(text.contains("ligature: off"));
    }

    #[test]
    fn explain_json_shape() {
        let e = explain("HV").unwrap();
        let v: serde_json::Value = serde_json::to_value(&e).unwrap();
        assert_eq!(v["mode"], "HV");
        assert_eq!(v["rules"][0], "HankakuToHiragana");
        assert_eq!(v["ligature"], "Hiragana");
        assert_eq!(v["flags"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn explain_conflict() {
        let err = explain("kK").unwrap_err();
        assert_eq!(err.to_string(), "must not combine 'k' and 'K' flags");
    }
}
