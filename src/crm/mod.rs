//! CRM名簿
//!
//! CRMエクスポート（CSV / Excel）から顧客名・累計支払額・最終活動日を読む。
//! 数値・日付が解釈できない値は 0 / なし として扱う。

pub mod reader;

use crate::config::CrmColumns;
use crate::error::{ReconcileError, Result};
use crate::invoice::parse_date;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// CRMの顧客1件
#[derive(Debug, Clone, PartialEq)]
pub struct CrmRecord {
    pub name: String,
    /// 累計支払額
    pub lifetime_value: f64,
    /// 最終活動日
    pub last_active: Option<NaiveDate>,
}

/// CRM名簿
#[derive(Debug, Clone, Default)]
pub struct Crm {
    records: Vec<CrmRecord>,
    /// 重複を除いた名前（初出順）
    names: Vec<String>,
    /// 名前 → 最初のレコード位置
    first_index: HashMap<String, usize>,
}

impl Crm {
    pub fn new(records: Vec<CrmRecord>) -> Self {
        let mut names = Vec::new();
        let mut first_index = HashMap::new();

        for (i, record) in records.iter().enumerate() {
            if !first_index.contains_key(&record.name) {
                first_index.insert(record.name.clone(), i);
                names.push(record.name.clone());
            }
        }

        Self {
            records,
            names,
            first_index,
        }
    }

    /// ファイルから読み込む
    pub fn load(path: &Path, columns: &CrmColumns) -> Result<Self> {
        let table = reader::read_table(path)?;

        let name_col = table
            .column(&columns.name)
            .ok_or_else(|| ReconcileError::MissingColumn(columns.name.clone()))?;
        // 金額・日付の列はなくてもよい
        let ltv_col = table.column(&columns.lifetime_value);
        let active_col = table.column(&columns.last_active);

        if ltv_col.is_none() {
            tracing::warn!(
                column = %columns.lifetime_value,
                "lifetime value column missing, using 0"
            );
        }
        if active_col.is_none() {
            tracing::warn!(
                column = %columns.last_active,
                "last activity column missing, status will be Unknown"
            );
        }

        let cell = |row: &[String], col: Option<usize>| -> String {
            col.and_then(|c| row.get(c)).cloned().unwrap_or_default()
        };

        let records: Vec<CrmRecord> = table
            .rows
            .iter()
            .filter_map(|row| {
                let name = row.get(name_col)?.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                Some(CrmRecord {
                    name,
                    lifetime_value: parse_amount(&cell(row, ltv_col)),
                    last_active: parse_date(&cell(row, active_col)),
                })
            })
            .collect();

        let skipped = table.rows.len() - records.len();
        let crm = Self::new(records);
        tracing::info!(
            file = %path.display(),
            records = crm.records.len(),
            unique_names = crm.names.len(),
            skipped,
            "CRM loaded"
        );
        Ok(crm)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CrmRecord] {
        &self.records
    }

    /// 照合用の名簿（重複なし・初出順）
    pub fn roster(&self) -> &[String] {
        &self.names
    }

    /// 同名が複数あれば最初のレコード
    pub fn record_for(&self, name: &str) -> Option<&CrmRecord> {
        self.first_index.get(name).map(|&i| &self.records[i])
    }
}

lazy_static::lazy_static! {
    static ref CURRENCY_RE: Regex = Regex::new(r"[€$£\s]|EUR").unwrap();
    static ref PLAIN_RE: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
    static ref THOUSANDS_RE: Regex = Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap();
    static ref DECIMAL_COMMA_RE: Regex = Regex::new(r"^-?\d+,\d{1,2}$").unwrap();
}

/// 金額文字列を数値にする（解釈できなければ 0）
pub fn parse_amount(value: &str) -> f64 {
    let cleaned = CURRENCY_RE.replace_all(value.trim(), "");

    let normalized = if PLAIN_RE.is_match(&cleaned) {
        cleaned.to_string()
    } else if THOUSANDS_RE.is_match(&cleaned) {
        cleaned.replace(',', "")
    } else if DECIMAL_COMMA_RE.is_match(&cleaned) {
        cleaned.replace(',', ".")
    } else {
        return 0.0;
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, ltv: f64) -> CrmRecord {
        CrmRecord {
            name: name.into(),
            lifetime_value: ltv,
            last_active: None,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("120"), 120.0);
        assert_eq!(parse_amount("90.50"), 90.5);
        assert_eq!(parse_amount("€1,234.50"), 1234.5);
        assert_eq!(parse_amount("45,90 €"), 45.9);
        assert_eq!(parse_amount("-10"), -10.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("12abc"), 0.0);
    }

    #[test]
    fn test_roster_unique_first_seen() {
        let crm = Crm::new(vec![
            record("Nikos", 10.0),
            record("Bakalis", 20.0),
            record("Nikos", 30.0),
        ]);
        assert_eq!(crm.len(), 3);
        assert_eq!(crm.roster(), &["Nikos".to_string(), "Bakalis".to_string()]);
        assert_eq!(crm.record_for("Nikos").unwrap().lifetime_value, 10.0);
        assert!(crm.record_for("Unknown").is_none());
    }

    #[test]
    fn test_load_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned_costo_menu.csv");
        std::fs::write(
            &path,
            "Fullname,Email,Total payments amount,Last activity date\n\
             Bakalis Georgios,g@example.com,120,2025-01-10\n\
             ,empty@example.com,50,2025-01-10\n\
             Papadopoulos Nikos,n@example.com,abc,not-a-date\n",
        )
        .unwrap();

        let crm = Crm::load(&path, &CrmColumns::default()).unwrap();
        assert_eq!(crm.len(), 2);

        let bakalis = crm.record_for("Bakalis Georgios").unwrap();
        assert_eq!(bakalis.lifetime_value, 120.0);
        assert_eq!(bakalis.last_active, NaiveDate::from_ymd_opt(2025, 1, 10));

        let nikos = crm.record_for("Papadopoulos Nikos").unwrap();
        assert_eq!(nikos.lifetime_value, 0.0);
        assert_eq!(nikos.last_active, None);
    }

    #[test]
    fn test_load_missing_name_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crm.csv");
        std::fs::write(&path, "Name,Total payments amount\nBakalis,10\n").unwrap();

        let result = Crm::load(&path, &CrmColumns::default());
        assert!(matches!(result, Err(ReconcileError::MissingColumn(_))));
    }

    #[test]
    fn test_load_custom_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crm.csv");
        std::fs::write(&path, "Name\nBakalis\n").unwrap();

        let columns = CrmColumns {
            name: "Name".into(),
            ..Default::default()
        };
        let crm = Crm::load(&path, &columns).unwrap();
        assert_eq!(crm.roster(), &["Bakalis".to_string()]);
        assert_eq!(crm.records()[0].lifetime_value, 0.0);
    }
}
