//! 照合設定
//!
//! ノイズ語リスト・トークン長の閾値・スコア重み・採用閾値をまとめる。
//! 既定値は請求書とCRM名簿の照合で使ってきた値。0.8 と 0.3 は手調整の値で、
//! 検証済みモデルから導いたものではない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 法人格・業態などのノイズ語（置換は空白1文字）
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &[
    " IKE",
    " E.E",
    " A.E",
    " O.E",
    " LTD",
    " ESTIATORIO",
    " ZAXAROPLASTEIO",
    " E ESTIASI",
    " / ",
];

/// 照合設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 除去するノイズ語
    pub noise_patterns: Vec<String>,
    /// この文字数以下のトークンは無視する
    pub short_token_max_len: usize,
    /// 部分一致は両トークンがこの文字数を超える場合のみ
    pub substring_min_len: usize,
    /// 完全一致の重み
    pub exact_weight: f64,
    /// 部分一致の重み
    pub substring_weight: f64,
    /// 採用閾値（スコアがこれを超えたら一致とみなす）
    pub threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            noise_patterns: DEFAULT_NOISE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            short_token_max_len: 2,
            substring_min_len: 3,
            exact_weight: 1.0,
            substring_weight: 0.8,
            threshold: 0.3,
        }
    }
}

impl MatchConfig {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 採用閾値を差し替えたコピー
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// 値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be within 0.0..=1.0, got {}",
                self.threshold
            )));
        }
        if self.exact_weight < 0.0 || self.substring_weight < 0.0 {
            return Err(Error::InvalidConfig("weights must not be negative".into()));
        }
        if self.noise_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::InvalidConfig("noise patterns must not be blank".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = MatchConfig::default();
        assert_eq!(config.noise_patterns.len(), 9);
        assert_eq!(config.short_token_max_len, 2);
        assert_eq!(config.substring_min_len, 3);
        assert_eq!(config.exact_weight, 1.0);
        assert_eq!(config.substring_weight, 0.8);
        assert_eq!(config.threshold, 0.3);
    }

    #[test]
    fn test_from_json_partial() {
        let config = MatchConfig::from_json(r#"{"threshold": 0.5}"#).unwrap();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.substring_weight, 0.8);
        assert_eq!(config.noise_patterns.len(), 9);
    }

    #[test]
    fn test_from_json_rejects_out_of_range_threshold() {
        let result = MatchConfig::from_json(r#"{"threshold": 1.5}"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_noise_pattern() {
        let result = MatchConfig::from_json(r#"{"noise_patterns": [" LTD", ""]}"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        let result = MatchConfig::from_json(r#"{"threshold": "#);
        assert!(matches!(result, Err(Error::ConfigJson(_))));
    }

    #[test]
    fn test_with_threshold() {
        let config = MatchConfig::default().with_threshold(0.6);
        assert_eq!(config.threshold, 0.6);
    }
}
