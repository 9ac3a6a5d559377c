use clap::Parser;
use std::path::{Path, PathBuf};
use terralys::{analyzer, cli, config, error, export, logging, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use terralys_common::{describe_label, parse_label, summarize, Diagnosis, DiseaseCategory};

const DEFAULT_OUTPUT_STEM: &str = "diagnoses";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Analyze {
            path,
            output,
            recursive,
            threshold,
            no_recommendations,
            offline_recommendations,
            use_cache,
            format,
        } => {
            let config = Config::load()?;
            println!("🌿 terralys - 病害診断\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_path(&path, recursive)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::TerraLysError::NoImagesFound(path.display().to_string()));
            }

            let mut options = analyzer::AnalyzeOptions::from_config(&config);
            if let Some(t) = threshold {
                if !(0.0..=1.0).contains(&t) {
                    return Err(error::TerraLysError::Config(format!(
                        "閾値は0.0-1.0の範囲で指定してください: {}",
                        t
                    )));
                }
                options.threshold = t;
            }
            options.recommendations = !no_recommendations;
            options.use_ai = !offline_recommendations;

            // 2. 診断
            let base_dir = base_folder(&path);
            println!("[2/3] 診断中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let diagnoses = if use_cache {
                analyzer::analyze_images_with_cache(&images, &base_dir, &options, &config).await?
            } else {
                analyzer::analyze_images(&images, &options, &config).await?
            };
            println!("✔ 診断完了\n");

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| base_dir.clone());
            export::export_diagnoses(&diagnoses, &format, &output, DEFAULT_OUTPUT_STEM)?;

            print_summary(&diagnoses);
            println!("\n✅ 診断完了");
        }

        Commands::Label { labels, json } => {
            let parsed: Vec<_> = labels.iter().map(|raw| parse_label(raw)).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                for (raw, label) in labels.iter().zip(&parsed) {
                    println!("{}", raw);
                    println!("  作物: {}", label.crop);
                    println!("  病名: {}", label.disease);
                    println!("  分類: {}", DiseaseCategory::of(&label.disease));
                    println!("  説明: {}", describe_label(label));
                }
            }
        }

        Commands::Export { input, format, output, title } => {
            println!("📄 terralys - エクスポート\n");

            let content = std::fs::read_to_string(&input)?;
            let diagnoses: Vec<Diagnosis> = serde_json::from_str(&content)?;
            println!("- {}件の診断結果を読み込み", diagnoses.len());

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            export::export_diagnoses(&diagnoses, &format, &output_dir, &title)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_hf_key, set_gemini_key, set_threshold, show } => {
            let mut config = Config::load()?;

            if let Some(key) = set_hf_key {
                config.set_hf_api_key(key)?;
                println!("✔ 分類APIキーを設定しました");
            }

            if let Some(key) = set_gemini_key {
                config.set_gemini_api_key(key)?;
                println!("✔ 推奨生成APIキーを設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_confidence_threshold(threshold)?;
                println!("✔ 閾値を設定しました: {}", threshold);
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  分類モデル: {}", config.classifier_model);
                println!("  分類APIベースURL: {}", config.classifier_url);
                println!("  推奨生成モデル: {}", config.recommendation_model);
                println!("  信頼度閾値: {}", config.confidence_threshold);
                println!("  最大ファイルサイズ: {}MB", config.max_file_size_mb);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  分類APIキー: {}", key_state(config.hf_api_key().is_ok()));
                println!("  推奨生成APIキー: {}", key_state(config.gemini_api_key().is_ok()));
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = analyzer::CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = analyzer::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match analyzer::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// 入力がファイルならその親フォルダ
fn base_folder(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}

fn key_state(set: bool) -> &'static str {
    if set { "設定済み" } else { "未設定" }
}

fn print_summary(diagnoses: &[Diagnosis]) {
    let summary = summarize(diagnoses);
    println!("\n集計: {}件", summary.total);
    for (status, count) in &summary.by_status {
        println!("  {}: {}", status, count);
    }
    if !summary.by_disease.is_empty() {
        println!("病名別:");
        for (disease, count) in &summary.by_disease {
            println!("  {}: {}", disease, count);
        }
    }
}
