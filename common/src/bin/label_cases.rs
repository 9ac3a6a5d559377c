use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use std::env;
use std::path::{Path, PathBuf};
use terralys_common::{describe, parse_label, DiseaseCategory, CROP_DISEASE_MAP};

/// 辞書に無い代表的なラベル表記
const EXTRA_CASES: &[&str] = &[
    "Corn_(maize)___Common_rust_",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Pepper_bell___Bacterial_spot",
    "Cherry_(including_sour)___Powdery_mildew",
    "Tomato___Tomato_mosaic_virus",
    "potato-late-blight",
    "rice leaf blast",
    "wheat-yellow-rust",
    "early leaf spot blight",
    "unknown_leaf_issue",
    "",
];

fn main() -> Result<(), XlsxError> {
    let args: Vec<String> = env::args().collect();

    let labels: Vec<String> = if args.len() >= 2 {
        let input = Path::new(&args[1]);
        match std::fs::read_to_string(input) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(e) => {
                eprintln!("Cannot read {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        CROP_DISEASE_MAP
            .iter()
            .map(|e| e.key.to_string())
            .chain(EXTRA_CASES.iter().map(|s| s.to_string()))
            .collect()
    };

    let output_path = if args.len() >= 3 {
        PathBuf::from(&args[2])
    } else {
        PathBuf::from("label_cases.xlsx")
    };

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    let cell = Format::new().set_border(FormatBorder::Hair).set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("labels")?;
    for (col, (name, width)) in [
        ("raw", 40.0),
        ("crop", 18.0),
        ("disease", 30.0),
        ("category", 14.0),
        ("description", 80.0),
    ]
    .iter()
    .enumerate()
    {
        worksheet.set_column_width(col as u16, *width)?;
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, raw) in labels.iter().enumerate() {
        let row = idx as u32 + 1;
        let parsed = parse_label(raw);
        let category = DiseaseCategory::of(&parsed.disease);

        worksheet.write_string_with_format(row, 0, raw, &cell)?;
        worksheet.write_string_with_format(row, 1, &parsed.crop, &cell)?;
        worksheet.write_string_with_format(row, 2, &parsed.disease, &cell)?;
        worksheet.write_string_with_format(row, 3, category.label(), &cell)?;
        worksheet.write_string_with_format(row, 4, describe(&parsed.crop, &parsed.disease), &cell)?;

        println!("{:<45} -> {} / {}", format!("{:?}", raw), parsed.crop, parsed.disease);
    }

    workbook.save(&output_path)?;
    println!("Saved: {}", output_path.display());

    Ok(())
}
