use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const GATEWAY_KEY_ENV: &str = "LOVABLE_API_KEY";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BACKEND_URL_ENV: &str = "MOOD_SNAP_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// バックエンドのベースURL（`/analyze-emotion` を持つ）
    pub backend_url: String,
    pub gateway_url: String,
    pub gateway_model: String,
    pub gemini_model: String,
    /// アップロード前の長辺上限
    pub max_image_size: u32,
    pub jpeg_quality: u8,
    /// コラージュテンプレートの縮小率
    pub collage_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_api_key: None,
            gemini_api_key: None,
            backend_url: "http://localhost:8000".into(),
            gateway_url: "https://ai.gateway.lovable.dev/v1/chat/completions".into(),
            gateway_model: "google/gemini-2.5-flash".into(),
            gemini_model: "gemini-flash-latest".into(),
            max_image_size: 1024,
            jpeg_quality: 80,
            collage_scale: 0.25,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend_url = url;
            }
        }
        Ok(config)
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
            .ok_or_else(|| StudioError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mood-snap").join("config.json"))
    }

    /// AIゲートウェイのキー（環境変数を優先）
    pub fn gateway_key(&self) -> Result<String> {
        env_or(GATEWAY_KEY_ENV, &self.gateway_api_key)
    }

    /// Gemini APIキー（環境変数を優先）
    pub fn gemini_key(&self) -> Result<String> {
        env_or(GEMINI_KEY_ENV, &self.gemini_api_key)
    }

    pub fn set_gateway_key(&mut self, key: String) -> Result<()> {
        self.gateway_api_key = Some(key);
        self.save()
    }

    pub fn set_gemini_key(&mut self, key: String) -> Result<()> {
        self.gemini_api_key = Some(key);
        self.save()
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        self.backend_url = url;
        self.save()
    }
}

fn env_or(var: &'static str, stored: &Option<String>) -> Result<String> {
    if let Ok(key) = std::env::var(var) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    stored
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or(StudioError::MissingApiKey(var))
}
