//! TerraLys Common Library
//!
//! 作物病害診断のコアロジック（I/Oなし）:
//! - 分類ラベルの正規化（作物名・病名）
//! - 診断説明文・定型推奨事項の生成
//! - APIレスポンスのパースとプロンプト生成

pub mod analyzer;
pub mod describe;
pub mod error;
pub mod export;
pub mod fallback;
pub mod labels;
pub mod parser;
pub mod prompts;
pub mod types;

pub use analyzer::{
    build_diagnosis, classify_status, estimate_severity, failed_diagnosis, summarize,
    DiagnosisSummary, ImageMeta,
};
pub use describe::{describe, describe_label, DiseaseCategory};
pub use error::{Error, Result};
pub use fallback::fallback_recommendations;
pub use labels::{parse_label, CropDiseaseEntry, ParsedLabel, CROP_DISEASE_MAP};
pub use parser::{extract_json, parse_predictions, parse_recommendations};
pub use prompts::build_recommendation_prompt;
pub use types::{
    top_prediction, Diagnosis, DiagnosisStatus, Prediction, RecommendationSource, Severity,
};
