use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 請求書（invoices.json の1件）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,

    /// 発行日（YYYY-MM-DD）
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub customer: Customer,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,

    #[serde(default)]
    pub total_amount: f64,

    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// 明細行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total: f64,
}

impl InvoiceItem {
    /// パッケージ名（" - " より前）
    pub fn package(&self) -> &str {
        self.description
            .split(" - ")
            .next()
            .unwrap_or_default()
            .trim()
    }
}

impl Invoice {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// 日付文字列を解釈する（時刻部分は無視）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // "2025-01-15 10:30:00" / "2025-01-15T10:30:00Z"
    let date_part = value
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(value);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
