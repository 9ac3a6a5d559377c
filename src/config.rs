use crate::error::{Result, TerraLysError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const HF_API_KEY_ENV: &str = "HF_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hf_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// 画像分類モデル
    pub classifier_model: String,
    /// 推論APIのベースURL（末尾にモデル名を付加）
    pub classifier_url: String,
    /// 推奨事項生成モデル
    pub recommendation_model: String,
    /// 診断確定に必要な分類スコア
    pub confidence_threshold: f32,
    pub max_file_size_mb: u64,
    /// 送信前に縮小する長辺ピクセル数
    pub max_image_size: u32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_api_key: None,
            gemini_api_key: None,
            classifier_model: "wambugu71/crop_leaf_diseases_vit".into(),
            classifier_url: "https://api-inference.huggingface.co/models".into(),
            recommendation_model: "gemini-2.0-flash".into(),
            confidence_threshold: 0.5,
            max_file_size_mb: 10,
            max_image_size: 1024,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TerraLysError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("terralys").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TerraLysError::Config(format!(
                "confidence_threshold は 0.0〜1.0 で指定してください: {}",
                self.confidence_threshold
            )));
        }
        if self.max_file_size_mb == 0 || self.max_image_size == 0 || self.timeout_seconds == 0 {
            return Err(TerraLysError::Config(
                "max_file_size_mb / max_image_size / timeout_seconds は 1 以上で指定してください".into(),
            ));
        }
        Ok(())
    }

    /// 推論APIキー（環境変数を優先）
    pub fn hf_api_key(&self) -> Result<String> {
        resolve_key(HF_API_KEY_ENV, self.hf_api_key.as_deref())
            .ok_or(TerraLysError::MissingApiKey("画像分類 (Hugging Face)"))
    }

    /// 推奨生成APIキー（環境変数を優先）
    pub fn gemini_api_key(&self) -> Result<String> {
        resolve_key(GEMINI_API_KEY_ENV, self.gemini_api_key.as_deref())
            .ok_or(TerraLysError::MissingApiKey("推奨生成 (Gemini)"))
    }

    pub fn set_hf_api_key(&mut self, key: String) -> Result<()> {
        self.hf_api_key = Some(key);
        self.save()
    }

    pub fn set_gemini_api_key(&mut self, key: String) -> Result<()> {
        self.gemini_api_key = Some(key);
        self.save()
    }

    pub fn set_confidence_threshold(&mut self, threshold: f32) -> Result<()> {
        let previous = self.confidence_threshold;
        self.confidence_threshold = threshold;
        if let Err(e) = self.validate() {
            self.confidence_threshold = previous;
            return Err(e);
        }
        self.save()
    }
}

fn resolve_key(env_name: &str, stored: Option<&str>) -> Option<String> {
    if let Ok(key) = std::env::var(env_name) {
        if !key.trim().is_empty() {
            return Some(key);
        }
    }

    stored
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_threshold, 0.5);
    }

    #[test]
    fn test_validate_rejects_threshold() {
        let config = Config {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TerraLysError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let config = Config {
            max_image_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"confidence_threshold": 0.75, "classifier_model": "org/model"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.classifier_model, "org/model");
        assert_eq!(config.confidence_threshold, 0.75);
        assert_eq!(config.max_file_size_mb, 10);
    }

    #[test]
    fn test_resolve_key_prefers_stored_when_env_missing() {
        let key = resolve_key("TERRALYS_TEST_UNSET_KEY", Some("stored-key"));
        assert_eq!(key.as_deref(), Some("stored-key"));
    }

    #[test]
    fn test_resolve_key_ignores_blank() {
        assert_eq!(resolve_key("TERRALYS_TEST_UNSET_KEY", Some("  ")), None);
        assert_eq!(resolve_key("TERRALYS_TEST_UNSET_KEY", None), None);
    }
}
