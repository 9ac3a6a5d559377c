//! Excel生成（CLI版）
//!
//! ワークブックの組み立ては `terralys_common::export::excel_core` が担当し、
//! ここではファイルへの書き出しのみ行う。

use crate::error::{Result, TerraLysError};
use std::path::Path;
use terralys_common::export::excel_core::generate_excel_buffer;
use terralys_common::Diagnosis;

pub fn generate_excel(diagnoses: &[Diagnosis], output_path: &Path, title: &str) -> Result<()> {
    let buffer = generate_excel_buffer(diagnoses, title).map_err(TerraLysError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, buffer)
        .map_err(|e| TerraLysError::ExcelGeneration(format!("{}: {}", output_path.display(), e)))?;

    Ok(())
}
