//! プロンプト生成モジュール
//!
//! 推奨生成モデルへ渡すプロンプトを組み立てる。
//! 出力はフランス語の推奨事項のJSON配列を要求する。

use crate::labels::ParsedLabel;

/// 推奨事項の件数
pub const RECOMMENDATION_COUNT: std::ops::RangeInclusive<usize> = 3..=5;

/// 推奨事項生成プロンプト
///
/// # Arguments
/// * `parsed` - 正規化済みの作物・病名
/// * `description` - 診断説明文
/// * `confidence` - 分類スコア (0.0-1.0)
pub fn build_recommendation_prompt(parsed: &ParsedLabel, description: &str, confidence: f32) -> String {
    let crop = &parsed.crop;
    let disease = &parsed.disease;
    let percent = (confidence * 100.0).round();
    let min = RECOMMENDATION_COUNT.start();
    let max = RECOMMENDATION_COUNT.end();

    let task = if parsed.is_healthy() {
        format!(
            "La culture de {crop} a été diagnostiquée saine. Donne des recommandations \
             de prévention pour la garder en bonne santé (surveillance, irrigation, fertilisation, \
             rotation)."
        )
    } else {
        format!(
            "La culture de {crop} est atteinte de : {disease}. Donne des recommandations \
             concrètes de traitement et de prévention (mesures culturales, traitements \
             biologiques ou chimiques homologués, surveillance)."
        )
    };

    format!(
        r#"Tu es un agronome qui conseille de petits exploitants agricoles.

## Diagnostic
- Culture : {crop}
- Condition : {disease}
- Confiance du modèle : {percent}%
- Description : {description}

## Tâche
{task}

## Format de sortie (strictement ce tableau JSON)
["recommandation 1", "recommandation 2", "recommandation 3"]

## Règles
- Entre {min} et {max} recommandations, en français
- Une phrase courte et actionnable par recommandation
- Pas de numérotation ni de puces
- Uniquement le tableau JSON, sans texte autour"#
    )
}
