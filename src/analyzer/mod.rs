//! 診断処理
//!
//! 1画像ごとに: 検証・縮小 → 分類API → ラベル正規化・説明文 → 推奨事項
//! 1枚の失敗で全体を止めず、失敗した画像は [`DiagnosisStatus::Failed`] として記録する。

pub mod cache;

pub use cache::CacheFile;

use crate::classifier::HfClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::preprocess::prepare_image;
use crate::recommender::{recommend_or_fallback, GeminiRecommender};
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use terralys_common::{
    build_diagnosis, failed_diagnosis, parse_label, top_prediction, Diagnosis, DiagnosisStatus,
    ImageMeta,
};
use tracing::{info, warn};

/// 解析オプション
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// 診断確定に必要な分類スコア
    pub threshold: f32,
    /// 推奨事項を生成する
    pub recommendations: bool,
    /// 推奨生成モデルを使う（false なら定型文のみ）
    pub use_ai: bool,
}

impl AnalyzeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.confidence_threshold,
            recommendations: true,
            use_ai: true,
        }
    }
}

/// 画像を順に診断する
pub async fn analyze_images(
    images: &[ImageInfo],
    options: &AnalyzeOptions,
    config: &Config,
) -> Result<Vec<Diagnosis>> {
    if images.is_empty() {
        return Ok(Vec::new());
    }

    let classifier = HfClassifier::new(config)?;
    let recommender = if options.recommendations && options.use_ai {
        match GeminiRecommender::new(config) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!("{} → 定型の推奨事項を使用します", e);
                None
            }
        }
    } else {
        None
    };

    let progress = progress_bar(images.len() as u64);
    let mut results = Vec::with_capacity(images.len());

    for image in images {
        progress.set_message(image.file_name.clone());
        let meta = image_meta(image);

        let result =
            analyze_one(image, &meta, &classifier, recommender.as_ref(), options, config).await;
        let diagnosis = match result {
            Ok(d) => d,
            Err(e) => {
                warn!("{}: {}", image.file_name, e);
                failed_diagnosis(&meta, &e.to_string())
            }
        };

        info!(
            "{}: {} / {} ({})",
            diagnosis.file_name, diagnosis.crop, diagnosis.disease, diagnosis.status
        );
        results.push(diagnosis);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(results)
}

/// キャッシュを使用して診断する
///
/// キャッシュにない画像のみAPIを呼び出し、成功した結果をキャッシュに追加する。
pub async fn analyze_images_with_cache(
    images: &[ImageInfo],
    cache_folder: &Path,
    options: &AnalyzeOptions,
    config: &Config,
) -> Result<Vec<Diagnosis>> {
    let mut cache = CacheFile::load(cache_folder);
    let (mut results, uncached) = cache::filter_cached_images(images, &cache);

    if !results.is_empty() {
        println!("  キャッシュ使用: {}枚", results.len());
    }

    if !uncached.is_empty() {
        let targets: Vec<ImageInfo> = uncached.iter().map(|(img, _)| img.clone()).collect();
        let fresh = analyze_images(&targets, options, config).await?;

        for ((img, hash), diagnosis) in uncached.iter().zip(&fresh) {
            if !hash.is_empty() && diagnosis.status != DiagnosisStatus::Failed {
                cache.insert(hash.clone(), img.file_name.clone(), img.size, diagnosis.clone());
            }
        }
        cache.save(cache_folder)?;

        results.extend(fresh);
    }

    results.sort_by(|a, b| {
        a.file_name
            .cmp(&b.file_name)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    Ok(results)
}

async fn analyze_one(
    image: &ImageInfo,
    meta: &ImageMeta,
    classifier: &HfClassifier,
    recommender: Option<&GeminiRecommender>,
    options: &AnalyzeOptions,
    config: &Config,
) -> Result<Diagnosis> {
    let bytes = prepare_image(image, config.max_file_size_mb, config.max_image_size)?;
    let predictions = classifier.classify(bytes).await?;

    // classify は空の結果をエラーにする
    let Some(top) = top_prediction(&predictions) else {
        return Ok(failed_diagnosis(meta, "分類結果が空です"));
    };

    let mut diagnosis = build_diagnosis(meta, top, options.threshold);

    if options.recommendations && diagnosis.status.is_diagnosed() {
        let parsed = parse_label(&top.label);
        let (recommendations, source) =
            recommend_or_fallback(recommender, &parsed, &diagnosis.description, top.score).await;
        diagnosis.recommendations = recommendations;
        diagnosis.recommendation_source = source;
    }

    Ok(diagnosis)
}

fn image_meta(image: &ImageInfo) -> ImageMeta {
    ImageMeta {
        file_name: image.file_name.clone(),
        file_path: display_path(image),
        date: image.date.clone().unwrap_or_default(),
        analyzed_at: chrono::Local::now().to_rfc3339(),
    }
}

/// 画像の絶対パス（解決できなければそのまま）
pub(crate) fn display_path(image: &ImageInfo) -> String {
    image
        .path
        .canonicalize()
        .unwrap_or_else(|_| image.path.clone())
        .display()
        .to_string()
}

fn progress_bar(len: u64) -> ProgressBar {
    if len <= 1 {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("  {bar:30.green/white} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}
