//! 送信前の画像検証・縮小
//!
//! - ファイルサイズ上限の確認
//! - デコードできることの確認（画像でないファイルを弾く）
//! - 長辺が上限を超える場合はJPEGに縮小して再エンコード

use crate::error::{Result, TerraLysError};
use crate::scanner::ImageInfo;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

const JPEG_QUALITY: u8 = 85;

/// 分類APIに送る画像バイト列を準備
pub fn prepare_image(image: &ImageInfo, max_file_size_mb: u64, max_dim: u32) -> Result<Vec<u8>> {
    let max_bytes = max_file_size_mb * 1024 * 1024;
    if image.size > max_bytes {
        return Err(TerraLysError::FileTooLarge {
            size: image.size,
            max: max_bytes,
        });
    }

    let bytes = std::fs::read(&image.path)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| TerraLysError::ImageLoad(format!("{}: {}", image.file_name, e)))?;

    if decoded.width() <= max_dim && decoded.height() <= max_dim {
        return Ok(bytes);
    }

    let resized = decoded.thumbnail(max_dim, max_dim).to_rgb8();
    debug!(
        "{}: {}x{} → {}x{}",
        image.file_name,
        decoded.width(),
        decoded.height(),
        resized.width(),
        resized.height()
    );

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&resized)
        .map_err(|e| TerraLysError::ImageLoad(format!("{}: {}", image.file_name, e)))?;

    Ok(out)
}
