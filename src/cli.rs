use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "costo-reconcile")]
#[command(about = "請求書の顧客名をCRM名簿と照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/costo-reconcile/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 請求書をCRMと突き合わせてレポートを出力
    Reconcile {
        /// 請求書JSON（ファイルまたはフォルダ）
        #[arg(required = true)]
        invoices: PathBuf,

        /// CRMエクスポート（CSV/Excel）
        #[arg(short, long)]
        crm: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// 出力形式 (json/csv/excel/all)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// 採用閾値（0.0-1.0、設定ファイルより優先）
        #[arg(long)]
        threshold: Option<f64>,

        /// 経過日数の基準日（YYYY-MM-DD、省略時は今日）
        #[arg(long)]
        today: Option<String>,
    },

    /// 1つの名前をCRM名簿と照合
    Match {
        /// 照合する名前
        #[arg(required = true)]
        name: String,

        /// CRMエクスポート（CSV/Excel）
        #[arg(short, long)]
        crm: PathBuf,

        /// 候補の表示件数
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// 採用閾値（0.0-1.0、設定ファイルより優先）
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// 名前の正規化結果を表示
    Normalize {
        /// 正規化する名前
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,

        /// 採用閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExportFormat {
    Json,
    Csv,
    #[default]
    Excel,
    All,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use json, csv, excel, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("all".parse::<ExportFormat>(), Ok(ExportFormat::All));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_parse_reconcile_args() {
        let cli = Cli::parse_from([
            "costo-reconcile",
            "reconcile",
            "invoices.json",
            "--crm",
            "crm.csv",
            "-f",
            "csv",
            "--threshold",
            "0.4",
        ]);
        match cli.command {
            Commands::Reconcile { format, threshold, output, .. } => {
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(threshold, Some(0.4));
                assert_eq!(output, PathBuf::from("."));
            }
            _ => panic!("expected reconcile"),
        }
    }
}
