//! Excel出力
//!
//! 1枚目に明細行、2枚目に集計を書き出す。

use crate::error::Result;
use crate::reconcile::{ReconciledLine, Summary};
use rust_xlsxwriter::*;
use std::path::Path;

const HEADERS: &[(&str, f64)] = &[
    ("Date", 12.0),
    ("Invoice", 14.0),
    ("Customer", 32.0),
    ("Region", 14.0),
    ("Lat", 8.0),
    ("Lon", 8.0),
    ("Package", 30.0),
    ("Amount", 12.0),
    ("CRM Match", 32.0),
    ("Match Score", 12.0),
    ("CRM LTV", 12.0),
    ("CRM Status", 12.0),
    ("CRM Last Active", 16.0),
    ("Insight", 16.0),
];

pub fn generate_excel(
    lines: &[ReconciledLine],
    summary: &Summary,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let money_format = Format::new().set_num_format("€#,##0.00");
    let score_format = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name("Invoices")?;

    for (col, (title, width)) in HEADERS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header_format)?;
        sheet.set_column_width(col, *width)?;
    }

    for (i, line) in lines.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &line.date)?;
        sheet.write_string(row, 1, &line.invoice)?;
        sheet.write_string(row, 2, &line.customer)?;
        sheet.write_string(row, 3, &line.region)?;
        if let (Some(lat), Some(lon)) = (line.lat, line.lon) {
            sheet.write_number(row, 4, lat)?;
            sheet.write_number(row, 5, lon)?;
        }
        sheet.write_string(row, 6, &line.package)?;
        sheet.write_number_with_format(row, 7, line.amount, &money_format)?;
        if let Some(name) = &line.crm_match {
            sheet.write_string(row, 8, name)?;
        }
        if let Some(score) = line.match_score {
            sheet.write_number_with_format(row, 9, score, &score_format)?;
        }
        sheet.write_number_with_format(row, 10, line.crm_ltv, &money_format)?;
        sheet.write_string(row, 11, line.crm_status.label())?;
        if let Some(date) = &line.crm_last_active {
            sheet.write_string(row, 12, date)?;
        }
        if let Some(insight) = line.insight {
            sheet.write_string(row, 13, insight.label())?;
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    if !lines.is_empty() {
        sheet.autofilter(0, 0, lines.len() as u32, (HEADERS.len() - 1) as u16)?;
    }

    write_summary_sheet(workbook.add_worksheet(), summary, &header_format, &money_format)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    summary: &Summary,
    header_format: &Format,
    money_format: &Format,
) -> Result<()> {
    sheet.set_name("Summary")?;
    sheet.set_column_width(0, 28.0)?;
    sheet.set_column_width(1, 16.0)?;

    sheet.write_string_with_format(0, 0, "Metric", header_format)?;
    sheet.write_string_with_format(0, 1, "Value", header_format)?;

    sheet.write_string(1, 0, "Total Processed Revenue")?;
    sheet.write_number_with_format(1, 1, summary.total_revenue, money_format)?;
    sheet.write_string(2, 0, "CRM Match Rate (%)")?;
    sheet.write_number(2, 1, summary.match_rate)?;
    sheet.write_string(3, 0, "Lifetime Value (Impact)")?;
    sheet.write_number_with_format(3, 1, summary.ltv_impact, money_format)?;
    sheet.write_string(4, 0, "Invoice Lines")?;
    sheet.write_number(4, 1, summary.lines as f64)?;

    let mut row = 6u32;
    sheet.write_string_with_format(row, 0, "CRM Status", header_format)?;
    sheet.write_string_with_format(row, 1, "Lines", header_format)?;
    for (status, count) in &summary.by_status {
        row += 1;
        sheet.write_string(row, 0, status)?;
        sheet.write_number(row, 1, *count as f64)?;
    }

    row += 2;
    sheet.write_string_with_format(row, 0, "Insight", header_format)?;
    sheet.write_string_with_format(row, 1, "Lines", header_format)?;
    for (insight, count) in &summary.by_insight {
        row += 1;
        sheet.write_string(row, 0, insight)?;
        sheet.write_number(row, 1, *count as f64)?;
    }

    Ok(())
}
