mod exif;

use crate::error::{Result, TerraLysError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<String>,
    /// ファイルサイズ (bytes)
    pub size: u64,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 画像ファイルまたはフォルダをスキャン
///
/// フォルダの場合は直下のみ（`recursive` で再帰）。ファイル名でソートして返す。
/// 存在しないパスは拡張子があればファイル、なければフォルダとして報告する。
pub fn scan_path(path: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !path.exists() && path.extension().is_some() {
        return Err(TerraLysError::FileNotFound(path.display().to_string()));
    }

    if path.is_file() {
        if !is_image_path(path) {
            return Err(TerraLysError::UnsupportedFile(path.display().to_string()));
        }
        return Ok(vec![image_info(path)?]);
    }

    scan_folder(path, recursive)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(TerraLysError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_path(path) {
            continue;
        }

        images.push(image_info(path)?);
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!("{}: {}枚の画像", folder.display(), images.len());

    Ok(images)
}

fn image_info(path: &Path) -> Result<ImageInfo> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let size = std::fs::metadata(path)?.len();
    let date = exif::extract_date(path).ok();

    Ok(ImageInfo {
        path: path.to_path_buf(),
        file_name,
        date,
        size,
    })
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

fn is_image_extension(ext: &str) -> bool {
    let lower = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&lower.as_str())
}
