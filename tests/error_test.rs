//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use terralys::error::TerraLysError;
use terralys::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, TerraLysError::FolderNotFound(_)));
}

/// 存在しない画像ファイルを指定した場合
#[test]
fn test_scan_nonexistent_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("feuille.jpg");

    let err = scanner::scan_path(&missing, false).unwrap_err();
    assert!(matches!(err, TerraLysError::FileNotFound(_)));
    assert!(err.to_string().contains("feuille.jpg"));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_path(dir.path(), true);

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notes.txt"), "parcelle nord").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path(), false);
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// TerraLysErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        TerraLysError::Config("テスト設定エラー".to_string()),
        TerraLysError::MissingApiKey("HF_API_KEY"),
        TerraLysError::FileNotFound("leaf.jpg".to_string()),
        TerraLysError::FolderNotFound("/path/to/folder".to_string()),
        TerraLysError::UnsupportedFile("leaf.gif".to_string()),
        TerraLysError::FileTooLarge { size: 20, max: 10 },
        TerraLysError::ImageLoad("壊れた画像".to_string()),
        TerraLysError::ApiCall("API呼び出し失敗".to_string()),
        TerraLysError::ApiParse("不正な応答".to_string()),
        TerraLysError::ExcelGeneration("Excel生成エラー".to_string()),
        TerraLysError::NoImagesFound("フォルダ".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_missing_api_key_points_to_config() {
    let display = TerraLysError::MissingApiKey("GEMINI_API_KEY").to_string();
    assert!(display.contains("GEMINI_API_KEY"));
    assert!(display.contains("terralys config"));
}

#[test]
fn test_file_too_large_display() {
    let display = TerraLysError::FileTooLarge { size: 2048, max: 1024 }.to_string();
    assert!(display.contains("2048"));
    assert!(display.contains("1024"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TerraLysError = io_err.into();

    assert!(matches!(err, TerraLysError::Io(_)));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: TerraLysError = json_err.into();

    assert!(matches!(err, TerraLysError::JsonParse(_)));
}

/// 共通ライブラリのエラーからの変換
#[test]
fn test_common_error_conversion() {
    let common = terralys_common::parse_recommendations("pas de json").unwrap_err();
    let err: TerraLysError = common.into();

    assert!(matches!(err, TerraLysError::Common(_)));
    assert!(!err.to_string().is_empty());
}
