use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terralys")]
#[command(about = "作物の葉画像から病害を診断するCLIツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像（ファイルまたはフォルダ）を診断
    Analyze {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 出力先（デフォルト: 入力フォルダ/diagnoses.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 診断確定に必要な信頼度（0.0-1.0、省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f32>,

        /// 推奨事項を生成しない
        #[arg(long)]
        no_recommendations: bool,

        /// 推奨生成APIを使わず定型文のみ使用
        #[arg(long)]
        offline_recommendations: bool,

        /// キャッシュを使用（再解析をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
    },

    /// 分類ラベルを正規化して表示（API不要）
    Label {
        /// 分類ラベル（例: "Corn___Common_Rust"）
        #[arg(required = true)]
        labels: Vec<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 診断結果JSONからExcel/JSONを生成
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "Diagnostics TerraLys")]
        title: String,
    },

    /// 設定を表示/編集
    Config {
        /// 分類APIキー（Hugging Face）を設定
        #[arg(long)]
        set_hf_key: Option<String>,

        /// 推奨生成APIキー（Gemini）を設定
        #[arg(long)]
        set_gemini_key: Option<String>,

        /// 信頼度の閾値を設定（0.0-1.0）
        #[arg(long)]
        set_threshold: Option<f32>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}
