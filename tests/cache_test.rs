//! キャッシュ機能テスト
//!
//! 診断結果キャッシュの動作を検証

use terralys::analyzer::cache::{compute_file_hash, filter_cached_images, CacheFile};
use terralys::analyzer::{analyze_images_with_cache, AnalyzeOptions};
use terralys::config::Config;
use terralys::scanner::ImageInfo;
use terralys_common::{Diagnosis, DiagnosisStatus};
use std::path::Path;
use tempfile::tempdir;

fn diagnosis(file_name: &str, disease: &str) -> Diagnosis {
    Diagnosis {
        file_name: file_name.to_string(),
        crop: "Maïs".to_string(),
        disease: disease.to_string(),
        status: DiagnosisStatus::Diseased,
        confidence: 0.92,
        ..Default::default()
    }
}

fn image_info(path: &Path) -> ImageInfo {
    ImageInfo {
        path: path.to_path_buf(),
        file_name: path.file_name().unwrap().to_string_lossy().to_string(),
        date: None,
        size: std::fs::metadata(path).unwrap().len(),
    }
}

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = CacheFile::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    cache.insert(
        "abc123".to_string(),
        "feuille.jpg".to_string(),
        1024,
        diagnosis("feuille.jpg", "Rouille Commune"),
    );
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);

    let cached = loaded.get("abc123").expect("キャッシュが見つからない");
    assert_eq!(cached.file_name, "feuille.jpg");
    assert_eq!(cached.disease, "Rouille Commune");
    assert_eq!(cached.status, DiagnosisStatus::Diseased);
}

/// キャッシュヒット判定
#[test]
fn test_cache_hit() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    let hash = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    cache.insert(hash.to_string(), "cached.jpg".to_string(), 2048, diagnosis("cached.jpg", "Tache Brune"));

    assert!(cache.get(hash).is_some());
    assert!(cache.get("nonexistent_hash").is_none());
}

/// キャッシュの上書き
#[test]
fn test_cache_overwrite() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    let hash = "same_hash";

    cache.insert(hash.to_string(), "leaf.jpg".to_string(), 1000, diagnosis("leaf.jpg", "Rouille Brune"));
    cache.insert(hash.to_string(), "leaf.jpg".to_string(), 1000, diagnosis("leaf.jpg", "Rouille Jaune"));

    let cached = cache.get(hash).expect("キャッシュが見つからない");
    assert_eq!(cached.disease, "Rouille Jaune");
    assert_eq!(cache.len(), 1);
}

/// 同じ内容のファイルは同じハッシュ
#[test]
fn test_hash_depends_on_content_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    let c = dir.path().join("c.jpg");
    std::fs::write(&a, b"leaf bytes").unwrap();
    std::fs::write(&b, b"leaf bytes").unwrap();
    std::fs::write(&c, b"other leaf").unwrap();

    let hash_a = compute_file_hash(&a).unwrap();
    assert_eq!(hash_a.len(), 64);
    assert_eq!(hash_a, compute_file_hash(&b).unwrap());
    assert_ne!(hash_a, compute_file_hash(&c).unwrap());
}

/// filter_cached_imagesのテスト
#[test]
fn test_filter_cached_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    let img1_path = dir.path().join("img1.jpg");
    let img2_path = dir.path().join("img2.jpg");
    std::fs::write(&img1_path, b"fake image 1").unwrap();
    std::fs::write(&img2_path, b"fake image 2").unwrap();
    let images = vec![image_info(&img1_path), image_info(&img2_path)];

    // 空のキャッシュ → 全て未キャッシュ
    let mut cache = CacheFile::load(dir.path());
    let (cached, uncached) = filter_cached_images(&images, &cache);
    assert!(cached.is_empty());
    assert_eq!(uncached.len(), 2);

    // img1 をキャッシュ → img2 のみ未キャッシュ
    let hash1 = compute_file_hash(&img1_path).unwrap();
    cache.insert(hash1, "img1.jpg".to_string(), images[0].size, diagnosis("img1.jpg", "Tache Brune"));

    let (cached, uncached) = filter_cached_images(&images, &cache);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].file_name, "img1.jpg");
    assert_eq!(uncached.len(), 1);
    assert_eq!(uncached[0].0.file_name, "img2.jpg");
    assert_eq!(uncached[0].1, compute_file_hash(&img2_path).unwrap());
}

/// キャッシュファイルが破損している場合
#[test]
fn test_cache_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache_path = CacheFile::cache_path(dir.path());
    assert!(cache_path.ends_with(".terralys-cache.json"));

    std::fs::write(&cache_path, "{ invalid json }").unwrap();

    // 破損したキャッシュは空として扱われる
    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// バージョンが異なるキャッシュは破棄
#[test]
fn test_cache_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        CacheFile::cache_path(dir.path()),
        r#"{"version": 999, "entries": {"h": {"file_name": "x.jpg", "file_size": 1, "result": {}}}}"#,
    )
    .unwrap();

    assert!(CacheFile::load(dir.path()).is_empty());
}

/// キャッシュの削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    cache.insert("hash".to_string(), "x.jpg".to_string(), 100, diagnosis("x.jpg", "Mildiou Tardif"));
    cache.save(dir.path()).expect("保存失敗");

    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(CacheFile::load(dir.path()).is_empty());
    assert!(!CacheFile::clear(dir.path()).unwrap());
}

/// 同じ内容の画像はキャッシュを共有しても、それぞれのファイル名で返る
#[test]
fn test_identical_images_keep_their_own_names() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    std::fs::write(&a, b"same").unwrap();
    std::fs::write(&b, b"same").unwrap();

    let mut info_a = image_info(&a);
    info_a.date = Some("2026:05:01 08:00:00".to_string());
    let images = vec![info_a, image_info(&b)];

    // 2枚目の挿入で同じハッシュのエントリが上書きされる
    let mut cache = CacheFile::load(dir.path());
    for img in &images {
        let hash = compute_file_hash(&img.path).unwrap();
        cache.insert(hash, img.file_name.clone(), img.size, diagnosis(&img.file_name, "Tache Brune"));
    }
    assert_eq!(cache.len(), 1);

    let (cached, uncached) = filter_cached_images(&images, &cache);
    assert!(uncached.is_empty());

    let names: Vec<&str> = cached.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    assert!(cached[0].file_path.ends_with("a.jpg"));
    assert!(cached[1].file_path.ends_with("b.jpg"));
    assert_eq!(cached[0].date, "2026:05:01 08:00:00");
    assert_eq!(cached[1].date, "");
    assert_eq!(cached[0].disease, "Tache Brune");
}

/// 別フォルダの同名ファイルはパス順に並ぶ
#[tokio::test]
async fn test_cached_results_sorted_by_name_then_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let first = dir.path().join("parcelle-a");
    let second = dir.path().join("parcelle-b");
    std::fs::create_dir_all(&first).unwrap();
    std::fs::create_dir_all(&second).unwrap();
    std::fs::write(first.join("leaf.jpg"), b"leaf a").unwrap();
    std::fs::write(second.join("leaf.jpg"), b"leaf b").unwrap();

    let images = vec![image_info(&second.join("leaf.jpg")), image_info(&first.join("leaf.jpg"))];

    let mut cache = CacheFile::load(dir.path());
    for img in &images {
        let hash = compute_file_hash(&img.path).unwrap();
        cache.insert(hash, img.file_name.clone(), img.size, diagnosis(&img.file_name, "Rouille Brune"));
    }
    cache.save(dir.path()).expect("保存失敗");

    // 全件キャッシュ済みなのでAPIは呼ばれない
    let config = Config::default();
    let options = AnalyzeOptions::from_config(&config);
    let results = analyze_images_with_cache(&images, dir.path(), &options, &config)
        .await
        .expect("キャッシュ解析失敗");

    assert_eq!(results.len(), 2);
    assert!(results[0].file_path.contains("parcelle-a"));
    assert!(results[1].file_path.contains("parcelle-b"));
}
