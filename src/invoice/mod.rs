mod types;

pub use types::{parse_date, Customer, Invoice, InvoiceItem};

use crate::error::{ReconcileError, Result};
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

/// 1ファイルに1件または配列
#[derive(Deserialize)]
#[serde(untagged)]
enum InvoiceFile {
    Many(Vec<Invoice>),
    One(Box<Invoice>),
}

/// 請求書JSONを読み込む
///
/// ディレクトリを渡した場合は直下の `*.json` をファイル名順に読む。
pub fn load_invoices(path: &Path) -> Result<Vec<Invoice>> {
    if !path.exists() {
        return Err(ReconcileError::FileNotFound(path.display().to_string()));
    }

    if path.is_dir() {
        return load_invoice_dir(path);
    }

    load_invoice_file(path)
}

fn load_invoice_file(path: &Path) -> Result<Vec<Invoice>> {
    let content = std::fs::read_to_string(path)?;
    let parsed: InvoiceFile = serde_json::from_str(&content)
        .map_err(|e| ReconcileError::InvalidInvoice(format!("{}: {}", path.display(), e)))?;

    let invoices = match parsed {
        InvoiceFile::Many(list) => list,
        InvoiceFile::One(invoice) => vec![*invoice],
    };
    tracing::debug!(file = %path.display(), count = invoices.len(), "invoices loaded");
    Ok(invoices)
}

fn load_invoice_dir(folder: &Path) -> Result<Vec<Invoice>> {
    let mut files: Vec<_> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();

    let mut invoices = Vec::new();
    for file in &files {
        invoices.extend(load_invoice_file(file)?);
    }

    tracing::info!(
        folder = %folder.display(),
        files = files.len(),
        invoices = invoices.len(),
        "invoice folder scanned"
    );
    Ok(invoices)
}
