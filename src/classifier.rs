//! 画像分類API連携
//!
//! Hugging Face 形式の推論エンドポイントに画像バイト列を送り、
//! `[{label, score}]` を受け取る。

use crate::config::Config;
use crate::error::{Result, TerraLysError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use terralys_common::{parse_predictions, Prediction};
use tracing::debug;

pub struct HfClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HfClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.hf_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.classifier_url, &config.classifier_model),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 画像を分類して予測一覧を返す（空の場合はエラー）
    pub async fn classify(&self, image: Vec<u8>) -> Result<Vec<Prediction>> {
        debug!("分類リクエスト: {} ({} bytes)", self.endpoint, image.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TerraLysError::ApiCall(format!(
                "分類API失敗 (status {}): {}",
                status,
                body.trim()
            )));
        }

        let predictions = parse_predictions(&body)
            .map_err(|e| TerraLysError::ApiParse(format!("分類結果: {}", e)))?;

        if predictions.is_empty() {
            return Err(TerraLysError::ApiParse("分類結果が空です".into()));
        }

        debug!("分類結果: {:?}", predictions.first());
        Ok(predictions)
    }
}

fn endpoint_url(base: &str, model: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), model.trim_start_matches('/'))
}
