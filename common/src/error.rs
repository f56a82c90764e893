//! 照合設定のエラー
//!
//! 正規化と照合そのものは失敗しない。失敗するのは設定の読み込みと検証だけ。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("match config is not valid JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
