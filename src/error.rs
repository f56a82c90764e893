use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式: {0}")]
    UnsupportedFormat(String),

    #[error("請求書データが不正: {0}")]
    InvalidInvoice(String),

    #[error("CRMデータが不正: {0}")]
    InvalidCrm(String),

    #[error("CRMに列がありません: {0}")]
    MissingColumn(String),

    #[error("CRM名簿が空です: {0}")]
    EmptyRoster(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel読み込みエラー: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("照合設定エラー: {0}")]
    Common(#[from] costo_match_common::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
