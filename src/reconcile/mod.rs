//! 請求書とCRMの突き合わせ
//!
//! ## 処理フロー
//! 1. 請求書の顧客名（重複なし）を名簿と並列に照合
//! 2. 明細行ごとに地域・パッケージ・CRM情報を付与
//! 3. 活動状況と所見を判定
//!
//! 出力は請求書・明細の入力順を保つ。

pub mod region;
pub mod status;

pub use status::{ActivityStatus, Insight};

use crate::config::ActivityWindows;
use crate::crm::Crm;
use crate::invoice::{Invoice, InvoiceItem};
use chrono::NaiveDate;
use costo_match_common::{MatchResult, PreparedRoster};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// 照合済みの明細行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledLine {
    pub date: String,
    pub invoice: String,
    pub customer: String,
    pub region: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub package: String,
    pub amount: f64,
    pub crm_match: Option<String>,
    pub match_score: Option<f64>,
    pub crm_ltv: f64,
    pub crm_status: ActivityStatus,
    pub crm_last_active: Option<String>,
    pub insight: Option<Insight>,
}

/// 突き合わせオプション
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// 経過日数の基準日
    pub today: NaiveDate,
    pub windows: ActivityWindows,
    /// 進捗バーを表示する
    pub show_progress: bool,
}

impl ReconcileOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            windows: ActivityWindows::default(),
            show_progress: false,
        }
    }
}

/// 顧客名ごとの照合結果
pub type NameMatches = HashMap<String, Option<MatchResult>>;

/// 顧客名を重複なしで並列照合する
pub fn match_customers(
    invoices: &[Invoice],
    roster: &PreparedRoster,
    show_progress: bool,
) -> NameMatches {
    let mut names: Vec<&str> = invoices.iter().map(|i| i.customer.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    let progress = if show_progress {
        let pb = ProgressBar::new(names.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let matches: NameMatches = names
        .par_iter()
        .map(|name| {
            let result = roster.best_match(name);
            progress.inc(1);
            (name.to_string(), result)
        })
        .collect();

    progress.finish_and_clear();

    let matched = matches.values().filter(|m| m.is_some()).count();
    tracing::info!(
        names = matches.len(),
        matched,
        roster = roster.len(),
        threshold = roster.config().threshold,
        "customer names matched"
    );
    matches
}

/// 請求書を明細行に展開してCRM情報を付与する
pub fn reconcile(
    invoices: &[Invoice],
    crm: &Crm,
    roster: &PreparedRoster,
    options: &ReconcileOptions,
) -> Vec<ReconciledLine> {
    let matches = match_customers(invoices, roster, options.show_progress);

    let lines: Vec<(&Invoice, &InvoiceItem)> = invoices
        .iter()
        .inspect(|inv| {
            if inv.items.is_empty() {
                tracing::warn!(invoice = %inv.invoice_number, "invoice has no items, skipped");
            }
        })
        .flat_map(|inv| inv.items.iter().map(move |item| (inv, item)))
        .collect();

    lines
        .par_iter()
        .map(|(invoice, item)| {
            let matched = matches.get(&invoice.customer.name).cloned().flatten();
            build_line(invoice, item, matched.as_ref(), crm, options)
        })
        .collect()
}

fn build_line(
    invoice: &Invoice,
    item: &InvoiceItem,
    matched: Option<&MatchResult>,
    crm: &Crm,
    options: &ReconcileOptions,
) -> ReconciledLine {
    let region = region::locate(&invoice.customer.address);
    let record = matched.and_then(|m| crm.record_for(&m.name));

    let last_active = record.and_then(|r| r.last_active);
    let crm_ltv = record.map(|r| r.lifetime_value).unwrap_or(0.0);
    let crm_status = if record.is_some() {
        ActivityStatus::classify(last_active, options.today, &options.windows)
    } else {
        ActivityStatus::Unknown
    };

    let date = match invoice.parsed_date() {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => {
            if !invoice.date.is_empty() {
                tracing::warn!(
                    invoice = %invoice.invoice_number,
                    date = %invoice.date,
                    "unparseable invoice date"
                );
            }
            invoice.date.clone()
        }
    };

    ReconciledLine {
        date,
        invoice: invoice.invoice_number.clone(),
        customer: invoice.customer.name.clone(),
        region: region.map(|r| r.name).unwrap_or(region::UNKNOWN_REGION).to_string(),
        lat: region.map(|r| r.lat),
        lon: region.map(|r| r.lon),
        package: item.package().to_string(),
        amount: item.total,
        crm_match: record.map(|r| r.name.clone()),
        match_score: matched.map(|m| m.score),
        crm_ltv,
        crm_status,
        crm_last_active: last_active.map(|d| d.format("%Y-%m-%d").to_string()),
        insight: Insight::evaluate(record.is_some(), crm_status, item.total, crm_ltv),
    }
}

/// 集計値
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// 明細合計
    pub total_revenue: f64,
    /// CRM一致率（%）
    pub match_rate: f64,
    /// 一致した顧客の累計支払額の合計
    pub ltv_impact: f64,
    pub lines: usize,
    pub matched_lines: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_insight: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_lines(lines: &[ReconciledLine]) -> Self {
        let matched_lines = lines.iter().filter(|l| l.crm_match.is_some()).count();
        let match_rate = if lines.is_empty() {
            0.0
        } else {
            matched_lines as f64 / lines.len() as f64 * 100.0
        };

        // 該当なしの区分も 0 件で載せる
        let mut by_status: BTreeMap<String, usize> = ActivityStatus::ALL
            .iter()
            .map(|status| (status.label().to_string(), 0))
            .collect();
        let mut by_insight = BTreeMap::new();
        for line in lines {
            *by_status.entry(line.crm_status.label().to_string()).or_insert(0) += 1;
            if let Some(insight) = line.insight {
                *by_insight.entry(insight.label().to_string()).or_insert(0) += 1;
            }
        }

        Self {
            total_revenue: lines.iter().map(|l| l.amount).sum(),
            match_rate,
            ltv_impact: lines.iter().map(|l| l.crm_ltv).sum(),
            lines: lines.len(),
            matched_lines,
            by_status,
            by_insight,
        }
    }
}
