//! 顧客名の正規化
//!
//! 請求書・CRMの顧客名を比較可能な形に揃える。
//!
//! ## 処理順
//! 1. 大文字化
//! 2. 音韻的な二重子音の置換（ΜΠ→B, ΝΤ→D）
//! 3. ギリシャ文字→ラテン文字の1文字変換
//! 4. 法人格・業態ノイズ語の除去
//! 5. 前後の空白を除去
//!
//! 2 は 3 より先に行う。3 を先にすると ΜΠ が "MP" になり B に畳めない。

use crate::config::{MatchConfig, DEFAULT_NOISE_PATTERNS};
use std::collections::BTreeSet;

/// 1音として読む子音の組（ΓΚ・ΤΣ・ΤΖ は対象外）
pub const PHONETIC_DIGRAPHS: &[(&str, &str)] = &[("ΜΠ", "B"), ("ΝΤ", "D")];

/// ギリシャ大文字→ラテン文字の対応表
#[rustfmt::skip]
pub const GREEK_TO_LATIN: &[(char, &str)] = &[
    ('Α', "A"), ('Β', "B"), ('Γ', "G"), ('Δ', "D"), ('Ε', "E"), ('Ζ', "Z"),
    ('Η', "I"), ('Θ', "TH"), ('Ι', "I"), ('Κ', "K"), ('Λ', "L"), ('Μ', "M"),
    ('Ν', "N"), ('Ξ', "X"), ('Ο', "O"), ('Π', "P"), ('Ρ', "R"), ('Σ', "S"),
    ('Τ', "T"), ('Υ', "Y"), ('Φ', "F"), ('Χ', "X"), ('Ψ', "PS"), ('Ω', "O"),
    // アクセント付き母音
    ('Ά', "A"), ('Έ', "E"), ('Ή', "I"), ('Ί', "I"), ('Ό', "O"), ('Ύ', "Y"), ('Ώ', "O"),
];

fn latin_for(c: char) -> Option<&'static str> {
    GREEK_TO_LATIN
        .iter()
        .find(|(greek, _)| *greek == c)
        .map(|(_, latin)| *latin)
}

/// 大文字化・二重子音置換・1文字変換（手順1〜3）
pub fn transliterate(text: &str) -> String {
    let mut upper = text.to_uppercase();

    for (digraph, latin) in PHONETIC_DIGRAPHS {
        if upper.contains(digraph) {
            upper = upper.replace(digraph, latin);
        }
    }

    let mut out = String::with_capacity(upper.len());
    for c in upper.chars() {
        match latin_for(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// ノイズ語を空白1文字に置換する（手順4）
///
/// 置換で新たにノイズ語が現れることがあるため、変化がなくなるまで繰り返す。
pub fn strip_noise<S: AsRef<str>>(text: &str, patterns: &[S]) -> String {
    let mut current = text.to_string();

    loop {
        let mut changed = false;
        for pattern in patterns {
            let pattern = pattern.as_ref();
            // 空白だけのパターンは置換しても消えない
            if pattern.trim().is_empty() {
                continue;
            }
            if current.contains(pattern) {
                current = current.replace(pattern, " ");
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}

/// 既定のノイズ語で正規化する
pub fn normalize_name(text: &str) -> String {
    strip_noise(&transliterate(text), DEFAULT_NOISE_PATTERNS)
        .trim()
        .to_string()
}

/// 設定のノイズ語で正規化する
pub fn normalize_with(text: &str, config: &MatchConfig) -> String {
    strip_noise(&transliterate(text), &config.noise_patterns)
        .trim()
        .to_string()
}

/// 値がない場合は空文字列
pub fn normalize_optional(text: Option<&str>, config: &MatchConfig) -> String {
    text.map(|t| normalize_with(t, config)).unwrap_or_default()
}

/// 正規化済み文字列をトークン集合に分割する
///
/// `short_token_max_len` 以下の文字数のトークン（頭文字・接続語）は捨てる。
pub fn tokenize(normalized: &str, config: &MatchConfig) -> BTreeSet<String> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() > config.short_token_max_len)
        .map(str::to_string)
        .collect()
}
