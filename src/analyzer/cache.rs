//! 診断結果キャッシュモジュール
//!
//! 画像のSHA-256ハッシュをキーにして診断結果をキャッシュし、
//! 同じ画像の再解析（API呼び出し）をスキップする。

use crate::error::Result;
use crate::scanner::ImageInfo;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use terralys_common::Diagnosis;
use tracing::{debug, warn};

const CACHE_FILE_NAME: &str = ".terralys-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → 診断結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub result: Diagnosis,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（存在しない・壊れている場合は空）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                warn!("キャッシュバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                warn!("キャッシュ読み込み失敗、再生成します: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&Diagnosis> {
        self.entries.get(hash).map(|e| &e.result)
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, result: Diagnosis) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            result,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 画像ファイルのハッシュ（SHA-256, hex）
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// キャッシュ済みの診断結果と未キャッシュの画像に振り分け
///
/// 未キャッシュ側はハッシュと組で返す（ハッシュ計算に失敗した画像は空文字）。
pub fn filter_cached_images(
    images: &[ImageInfo],
    cache: &CacheFile,
) -> (Vec<Diagnosis>, Vec<(ImageInfo, String)>) {
    let hashes: Vec<Option<String>> = images
        .par_iter()
        .map(|img| compute_file_hash(&img.path).ok())
        .collect();

    let mut cached_results = Vec::new();
    let mut uncached_images = Vec::new();

    for (img, hash) in images.iter().zip(hashes) {
        match hash {
            Some(h) => match cache.get(&h) {
                Some(result) => cached_results.push(for_image(result, img)),
                None => uncached_images.push((img.clone(), h)),
            },
            None => uncached_images.push((img.clone(), String::new())),
        }
    }

    debug!(
        "キャッシュ: ヒット {}件 / 未キャッシュ {}件",
        cached_results.len(),
        uncached_images.len()
    );

    (cached_results, uncached_images)
}

/// キャッシュ済みの結果を現在の画像に合わせる
///
/// 同じ内容の画像は同じエントリを共有するため、ファイル情報は画像側から取る。
fn for_image(result: &Diagnosis, img: &ImageInfo) -> Diagnosis {
    Diagnosis {
        file_name: img.file_name.clone(),
        file_path: super::display_path(img),
        date: img.date.clone().unwrap_or_default(),
        ..result.clone()
    }
}
