//! 診断ロジック（フロントエンド共通）
//!
//! 分類結果1件から診断結果を組み立てる。I/Oは行わない。

use crate::describe::{describe_label, DiseaseCategory};
use crate::labels::{parse_label, ParsedLabel, CROP_UNKNOWN, DISEASE_UNKNOWN};
use crate::types::{Diagnosis, DiagnosisStatus, Prediction, RecommendationSource, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// 重症度「高」とみなす信頼度
pub const HIGH_CONFIDENCE: f32 = 0.8;

const BLAST_DISEASE: &str = "Pyriculariose";

/// 画像メタデータ
#[derive(Debug, Clone, Default)]
pub struct ImageMeta {
    pub file_name: String,
    pub file_path: String,
    pub date: String,
    /// 解析日時（RFC 3339、呼び出し側で付与）
    pub analyzed_at: String,
}

/// 診断ステータスを判定
///
/// 信頼度が閾値未満の場合はラベルの内容に関わらず [`DiagnosisStatus::LowConfidence`]。
pub fn classify_status(prediction: &Prediction, parsed: &ParsedLabel, threshold: f32) -> DiagnosisStatus {
    if prediction.score < threshold {
        DiagnosisStatus::LowConfidence
    } else if parsed.is_invalid() {
        DiagnosisStatus::Invalid
    } else if parsed.is_unrecognized() {
        DiagnosisStatus::Unrecognized
    } else if parsed.is_healthy() {
        DiagnosisStatus::Healthy
    } else {
        DiagnosisStatus::Diseased
    }
}

/// 重症度の目安を推定
pub fn estimate_severity(status: DiagnosisStatus, parsed: &ParsedLabel, confidence: f32) -> Severity {
    if status != DiagnosisStatus::Diseased {
        return Severity::None;
    }

    let category = match DiseaseCategory::of(&parsed.disease) {
        // 稲のいもち病は辞書上の名称に "blast" を含まない
        DiseaseCategory::Other if parsed.disease == BLAST_DISEASE => DiseaseCategory::Blast,
        category => category,
    };

    match category {
        DiseaseCategory::Blight | DiseaseCategory::Blast if confidence >= HIGH_CONFIDENCE => Severity::High,
        DiseaseCategory::Rust | DiseaseCategory::Spot => Severity::Moderate,
        _ if confidence >= HIGH_CONFIDENCE => Severity::Moderate,
        _ => Severity::Low,
    }
}

/// 分類結果から診断結果を生成
///
/// 推奨事項は空のまま返す（推奨生成は呼び出し側の責務）。
pub fn build_diagnosis(meta: &ImageMeta, prediction: &Prediction, threshold: f32) -> Diagnosis {
    let parsed = parse_label(&prediction.label);
    let status = classify_status(prediction, &parsed, threshold);
    let severity = estimate_severity(status, &parsed, prediction.score);

    let description = match status {
        DiagnosisStatus::LowConfidence => format!(
            "Le modèle n'est pas suffisamment confiant ({:.0}%) pour établir un diagnostic. \
             Essayez une photo plus nette d'une seule feuille, bien éclairée.",
            prediction.score * 100.0
        ),
        DiagnosisStatus::Invalid => "L'image ne semble pas représenter une feuille de culture prise en charge \
             (maïs, pomme de terre, riz, blé)."
            .to_string(),
        _ => describe_label(&parsed),
    };

    Diagnosis {
        file_name: meta.file_name.clone(),
        file_path: meta.file_path.clone(),
        date: meta.date.clone(),
        raw_label: prediction.label.clone(),
        confidence: prediction.score,
        crop: parsed.crop,
        disease: parsed.disease,
        status,
        severity,
        description,
        recommendations: Vec::new(),
        recommendation_source: RecommendationSource::None,
        analyzed_at: meta.analyzed_at.clone(),
    }
}

/// 解析に失敗した画像の診断結果
pub fn failed_diagnosis(meta: &ImageMeta, message: &str) -> Diagnosis {
    Diagnosis {
        file_name: meta.file_name.clone(),
        file_path: meta.file_path.clone(),
        date: meta.date.clone(),
        crop: CROP_UNKNOWN.to_string(),
        disease: DISEASE_UNKNOWN.to_string(),
        status: DiagnosisStatus::Failed,
        description: message.to_string(),
        analyzed_at: meta.analyzed_at.clone(),
        ..Default::default()
    }
}

/// 集計
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSummary {
    pub total: usize,
    /// ステータス表示名 → 件数
    pub by_status: BTreeMap<String, usize>,
    /// 作物 → 件数（確定した診断のみ）
    pub by_crop: BTreeMap<String, usize>,
    /// 病名 → 件数（病害ありのみ）
    pub by_disease: BTreeMap<String, usize>,
}

/// 診断結果を集計
pub fn summarize(diagnoses: &[Diagnosis]) -> DiagnosisSummary {
    let mut summary = DiagnosisSummary {
        total: diagnoses.len(),
        ..Default::default()
    };

    for d in diagnoses {
        *summary.by_status.entry(d.status.label().to_string()).or_insert(0) += 1;

        if d.status.is_diagnosed() {
            *summary.by_crop.entry(d.crop.clone()).or_insert(0) += 1;
        }
        if d.status == DiagnosisStatus::Diseased {
            *summary.by_disease.entry(d.disease.clone()).or_insert(0) += 1;
        }
    }

    summary
}
