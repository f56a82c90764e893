pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::reconcile::{ReconciledLine, Summary};
use serde::Serialize;
use std::path::{Path, PathBuf};

const DEFAULT_STEM: &str = "reconciled_invoices";

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    lines: &'a [ReconciledLine],
}

/// 出力先がディレクトリ（または拡張子なし）なら既定のファイル名を付ける
fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_STEM, extension))
    } else {
        output.with_extension(extension)
    }
}

pub fn export_report(
    lines: &[ReconciledLine],
    summary: &Summary,
    format: &ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let targets: &[&str] = match format {
        ExportFormat::Json => &["json"],
        ExportFormat::Csv => &["csv"],
        ExportFormat::Excel => &["xlsx"],
        ExportFormat::All => &["json", "csv", "xlsx"],
    };

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let mut written = Vec::new();
    for extension in targets {
        let path = output_path_for_format(output, extension);
        match *extension {
            "json" => write_json(lines, summary, &path)?,
            "csv" => write_csv(lines, &path)?,
            _ => excel::generate_excel(lines, summary, &path)?,
        }
        tracing::info!(path = %path.display(), lines = lines.len(), "report written");
        written.push(path);
    }

    Ok(written)
}

pub fn write_json(lines: &[ReconciledLine], summary: &Summary, path: &Path) -> Result<()> {
    let report = JsonReport { summary, lines };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn write_csv(lines: &[ReconciledLine], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)?;

    for line in lines {
        writer.serialize(line)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path_for_format(dir.path(), "csv");
        assert_eq!(path, dir.path().join("reconciled_invoices.csv"));
    }

    #[test]
    fn test_output_path_replaces_extension() {
        let path = output_path_for_format(Path::new("out/report.json"), "xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }
}
