//! Excel生成（共通ライブラリ）
//!
//! 診断結果の一覧シートと集計シートを持つブックを生成する。

use crate::analyzer::summarize;
use crate::types::Diagnosis;
use rust_xlsxwriter::*;

/// 列定義（見出し, 列幅）
const COLUMNS: &[(&str, f64)] = &[
    ("Fichier", 24.0),
    ("Date", 20.0),
    ("Culture", 16.0),
    ("Condition", 28.0),
    ("Statut", 20.0),
    ("Gravité", 10.0),
    ("Confiance", 11.0),
    ("Description", 60.0),
    ("Recommandations", 70.0),
];

const HEADER_ROW: u32 = 2;

/// Excelをバッファに生成
///
/// # Arguments
/// * `diagnoses` - 診断結果
/// * `title` - 一覧シート先頭に出力するタイトル
pub fn generate_excel_buffer(diagnoses: &[Diagnosis], title: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14.0);

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2E7D32))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    let text_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let percent_format = text_format.clone().set_num_format("0.0%");

    // 一覧シート
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Diagnostics").map_err(|e| e.to_string())?;
        sheet
            .write_string_with_format(0, 0, title, &title_format)
            .map_err(|e| e.to_string())?;

        for (col, (header, width)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            sheet.set_column_width(col, *width).map_err(|e| e.to_string())?;
            sheet
                .write_string_with_format(HEADER_ROW, col, *header, &header_format)
                .map_err(|e| e.to_string())?;
        }
        sheet.set_freeze_panes(HEADER_ROW + 1, 0).map_err(|e| e.to_string())?;

        for (idx, d) in diagnoses.iter().enumerate() {
            let row = HEADER_ROW + 1 + idx as u32;
            let date = if d.date.is_empty() { "-" } else { d.date.as_str() };
            let values = [
                d.file_name.as_str(),
                date,
                d.crop.as_str(),
                d.disease.as_str(),
                d.status.label(),
                d.severity.label(),
            ];

            for (col, value) in values.iter().enumerate() {
                sheet
                    .write_string_with_format(row, col as u16, *value, &text_format)
                    .map_err(|e| e.to_string())?;
            }

            sheet
                .write_number_with_format(row, 6, d.confidence as f64, &percent_format)
                .map_err(|e| e.to_string())?;
            sheet
                .write_string_with_format(row, 7, &d.description, &text_format)
                .map_err(|e| e.to_string())?;
            sheet
                .write_string_with_format(row, 8, d.recommendations.join("\n"), &text_format)
                .map_err(|e| e.to_string())?;
        }
    }

    // 集計シート
    {
        let summary = summarize(diagnoses);
        let sheet = workbook.add_worksheet();
        sheet.set_name("Résumé").map_err(|e| e.to_string())?;
        sheet.set_column_width(0, 32.0).map_err(|e| e.to_string())?;
        sheet.set_column_width(1, 10.0).map_err(|e| e.to_string())?;

        sheet
            .write_string_with_format(0, 0, "Total", &header_format)
            .map_err(|e| e.to_string())?;
        sheet
            .write_number(0, 1, summary.total as f64)
            .map_err(|e| e.to_string())?;

        let sections = [
            ("Statut", &summary.by_status),
            ("Culture", &summary.by_crop),
            ("Condition", &summary.by_disease),
        ];

        let mut row = 2u32;
        for (heading, counts) in sections {
            sheet
                .write_string_with_format(row, 0, heading, &header_format)
                .map_err(|e| e.to_string())?;
            row += 1;

            for (name, count) in counts {
                sheet.write_string(row, 0, name).map_err(|e| e.to_string())?;
                sheet
                    .write_number(row, 1, *count as f64)
                    .map_err(|e| e.to_string())?;
                row += 1;
            }
            row += 1;
        }
    }

    workbook.save_to_buffer().map_err(|e| e.to_string())
}
