//! Costo.menu Match Common Library
//!
//! 請求書の顧客名とCRM名簿を突き合わせるための正規化・照合ロジック。
//! I/Oを持たないのでCLI以外からも使える。

pub mod config;
pub mod error;
pub mod matcher;
pub mod normalize;

pub use config::{MatchConfig, DEFAULT_NOISE_PATTERNS};
pub use error::{Error, Result};
pub use matcher::{
    find_best_match, score_tokens, EntityMatcher, MatchResult, PreparedRoster, TokenOverlap,
};
pub use normalize::{normalize_name, normalize_optional, normalize_with, tokenize, transliterate};
