use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerraLysError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("{0} のAPIキーが設定されていません。`terralys config --help` を参照して設定してください")]
    MissingApiKey(&'static str),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対応していないファイル形式です: {0}")]
    UnsupportedFile(String),

    #[error("ファイルサイズが上限を超えています: {size} bytes (上限 {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error(transparent)]
    Common(#[from] terralys_common::Error),
}

pub type Result<T> = std::result::Result<T, TerraLysError>;
