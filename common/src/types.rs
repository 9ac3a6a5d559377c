//! 診断結果の型定義
//!
//! CLIと他のフロントエンドで共有される型:
//! - Prediction: 画像分類モデルの出力1件
//! - Diagnosis: 最終出力（正規化・説明・推奨事項をまとめたもの）

use serde::{Deserialize, Serialize};

/// 画像分類モデルの出力
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// 最もスコアの高い予測を取得（同点は先頭）
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().fold(None, |best: Option<&Prediction>, p| match best {
        Some(b) if b.score >= p.score => Some(b),
        _ => Some(p),
    })
}

/// 診断ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosisStatus {
    Healthy,
    Diseased,
    /// 葉以外の画像
    Invalid,
    /// 信頼度が閾値未満
    LowConfidence,
    #[default]
    Unrecognized,
    /// 画像読み込み・API呼び出しの失敗
    Failed,
}

impl DiagnosisStatus {
    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosisStatus::Healthy => "Sain",
            DiagnosisStatus::Diseased => "Malade",
            DiagnosisStatus::Invalid => "Image invalide",
            DiagnosisStatus::LowConfidence => "Confiance insuffisante",
            DiagnosisStatus::Unrecognized => "Non reconnu",
            DiagnosisStatus::Failed => "Échec de l'analyse",
        }
    }

    /// 作物・病名が確定した診断か
    pub fn is_diagnosed(&self) -> bool {
        matches!(self, DiagnosisStatus::Healthy | DiagnosisStatus::Diseased)
    }
}

impl std::fmt::Display for DiagnosisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 重症度の目安
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "-",
            Severity::Low => "Faible",
            Severity::Moderate => "Modérée",
            Severity::High => "Élevée",
        }
    }
}

/// 推奨事項の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    /// 推奨生成モデル
    Ai,
    /// 組み込みの定型文
    Fallback,
    #[default]
    None,
}

/// 診断結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diagnosis {
    pub file_name: String,

    /// 画像ファイルの絶対パス
    pub file_path: String,

    /// 撮影日時（EXIF DateTimeOriginal）
    pub date: String,

    /// 分類モデルの生ラベル
    pub raw_label: String,

    /// 分類スコア (0.0-1.0)
    pub confidence: f32,

    pub crop: String,
    pub disease: String,
    pub status: DiagnosisStatus,
    pub severity: Severity,
    pub description: String,
    pub recommendations: Vec<String>,
    pub recommendation_source: RecommendationSource,

    /// 解析日時（RFC 3339）
    pub analyzed_at: String,
}
