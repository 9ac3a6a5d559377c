//! APIレスポンスパーサー
//!
//! - 画像分類APIのレスポンスから予測一覧を取り出す
//! - 推奨生成モデルのレスポンスからJSONを抽出し、推奨事項の一覧にする

use crate::error::{Error, Result};
use crate::types::Prediction;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

lazy_static! {
    // 行頭の箇条書き記号・番号
    static ref BULLET_RE: Regex = Regex::new(r"^\s*(?:[-*•]+|\d+\s*[.)])\s*").unwrap();
}

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use terralys_common::extract_json;
///
/// let response = "Voici: [\"Arroser le matin\"]";
/// assert_eq!(extract_json(response).unwrap(), "[\"Arroser le matin\"]");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 推奨生成モデルのレスポンスをパース
///
/// 文字列配列、または `text` / `recommendation` フィールドを持つオブジェクト配列を受け付ける。
/// 箇条書き記号を除去し、空の項目は捨てる。
pub fn parse_recommendations(response: &str) -> Result<Vec<String>> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("推奨事項 JSONパースエラー: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Err(Error::Parse("推奨事項が配列ではありません".into())),
    };

    let recommendations: Vec<String> = items
        .iter()
        .filter_map(recommendation_text)
        .map(clean_recommendation)
        .filter(|s| !s.is_empty())
        .collect();

    if recommendations.is_empty() {
        return Err(Error::Parse("推奨事項が空です".into()));
    }

    Ok(recommendations)
}

fn recommendation_text(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["text", "recommendation", "action"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}

fn clean_recommendation(text: &str) -> String {
    BULLET_RE.replace(text.trim(), "").trim().to_string()
}

/// 画像分類APIのレスポンス形式
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictionBody {
    Flat(Vec<Prediction>),
    Nested(Vec<Vec<Prediction>>),
    Error { error: String },
}

/// 画像分類APIのレスポンスをパース
///
/// `[{label, score}]` と `[[{label, score}]]` の両形式に対応。
/// `{"error": "..."}` は [`Error::Api`] になる。
pub fn parse_predictions(body: &str) -> Result<Vec<Prediction>> {
    let parsed: PredictionBody = serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("分類結果 JSONパースエラー: {}", e)))?;

    match parsed {
        PredictionBody::Flat(predictions) => Ok(predictions),
        PredictionBody::Nested(batches) => Ok(batches.into_iter().next().unwrap_or_default()),
        PredictionBody::Error { error } => Err(Error::Api(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Voici mes conseils :
```json
["Retirer les feuilles atteintes", "Appliquer un fongicide"]
```
Bonne chance."#;

        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("fongicide"));
    }

    #[test]
    fn test_extract_json_raw() {
        let json = extract_json(r#"["a", "b"]"#).unwrap();
        assert_eq!(json, r#"["a", "b"]"#);
    }

    #[test]
    fn test_extract_json_not_found() {
        assert!(matches!(extract_json("Aucune donnée"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_extract_json_from_wrapping_object() {
        let response = r#"{"recommendations": ["Irriguer au pied"]}"#;
        assert_eq!(extract_json(response).unwrap(), r#"["Irriguer au pied"]"#);
    }

    // =============================================
    // parse_recommendations テスト
    // =============================================

    #[test]
    fn test_parse_recommendations_strings() {
        let response = r#"```json
["1. Retirer les feuilles atteintes", "- Appliquer un fongicide cuprique", "  ", "• Espacer les plants"]
```"#;

        let result = parse_recommendations(response).unwrap();
        assert_eq!(
            result,
            vec![
                "Retirer les feuilles atteintes",
                "Appliquer un fongicide cuprique",
                "Espacer les plants",
            ]
        );
    }

    #[test]
    fn test_parse_recommendations_objects() {
        let response = r#"[{"title": "Hygiène", "text": "Désinfecter les outils"}, {"recommendation": "Rotation des cultures"}, {"other": 1}]"#;

        let result = parse_recommendations(response).unwrap();
        assert_eq!(result, vec!["Désinfecter les outils", "Rotation des cultures"]);
    }

    #[test]
    fn test_parse_recommendations_keeps_inner_numbers() {
        let result = parse_recommendations(r#"["2) Traiter tous les 7 jours"]"#).unwrap();
        assert_eq!(result, vec!["Traiter tous les 7 jours"]);
    }

    #[test]
    fn test_parse_recommendations_empty_is_error() {
        assert!(parse_recommendations("[]").is_err());
        assert!(parse_recommendations(r#"["", " - "]"#).is_err());
    }

    #[test]
    fn test_parse_recommendations_invalid_json() {
        assert!(matches!(parse_recommendations("[not json]"), Err(Error::Parse(_))));
    }

    // =============================================
    // parse_predictions テスト
    // =============================================

    #[test]
    fn test_parse_predictions_flat() {
        let body = r#"[{"label": "Corn___Common_Rust", "score": 0.93}, {"label": "Corn___Healthy", "score": 0.05}]"#;

        let result = parse_predictions(body).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label, "Corn___Common_Rust");
        assert!((result[0].score - 0.93).abs() < 1e-6);
    }

    #[test]
    fn test_parse_predictions_nested() {
        let body = r#"[[{"label": "Rice___Leaf_Blast", "score": 0.8}]]"#;

        let result = parse_predictions(body).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "Rice___Leaf_Blast");
    }

    #[test]
    fn test_parse_predictions_error_body() {
        let body = r#"{"error": "Model wambugu71/crop_leaf_diseases_vit is currently loading", "estimated_time": 20.0}"#;

        match parse_predictions(body) {
            Err(Error::Api(message)) => assert!(message.contains("loading")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_predictions_garbage() {
        assert!(matches!(parse_predictions("<html>"), Err(Error::Parse(_))));
    }
}
