//! 推奨事項生成API連携（Gemini）
//!
//! 診断結果からプロンプトを組み立てて推奨事項を生成する。
//! 失敗時は定型の推奨事項に切り替える。

use crate::config::Config;
use crate::error::{Result, TerraLysError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use terralys_common::{
    build_recommendation_prompt, fallback_recommendations, parse_recommendations, ParsedLabel,
    RecommendationSource,
};
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
// URLに含めるとreqwestのエラー文に出るためヘッダで渡す
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiRecommender {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiRecommender {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.gemini_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/{}:generateContent", GEMINI_API_BASE, config.recommendation_model),
            api_key,
        })
    }

    /// 推奨事項を生成
    pub async fn recommend(
        &self,
        parsed: &ParsedLabel,
        description: &str,
        confidence: f32,
    ) -> Result<Vec<String>> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_recommendation_prompt(parsed, description, confidence),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.4,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TerraLysError::ApiCall(format!(
                "推奨生成API失敗 (status {}): {}",
                status,
                body.trim()
            )));
        }

        let payload: GeminiResponse = response.json().await?;
        let text = first_candidate_text(&payload)
            .ok_or_else(|| TerraLysError::ApiParse("推奨生成APIの応答が空です".into()))?;
        debug!("推奨生成レスポンス長: {} chars", text.len());

        Ok(parse_recommendations(text)?)
    }
}

fn first_candidate_text(payload: &GeminiResponse) -> Option<&str> {
    payload
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .filter(|t| !t.trim().is_empty())
}

/// 推奨事項を生成し、使えない場合は定型文を返す
pub async fn recommend_or_fallback(
    recommender: Option<&GeminiRecommender>,
    parsed: &ParsedLabel,
    description: &str,
    confidence: f32,
) -> (Vec<String>, RecommendationSource) {
    if let Some(recommender) = recommender {
        match recommender.recommend(parsed, description, confidence).await {
            Ok(recommendations) => return (recommendations, RecommendationSource::Ai),
            Err(e) => warn!("推奨生成に失敗、定型文を使用します: {}", e),
        }
    }

    (fallback_recommendations(parsed), RecommendationSource::Fallback)
}
