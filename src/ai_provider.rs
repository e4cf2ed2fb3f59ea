use clap::ValueEnum;

/// 感情解析に使うAI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    /// チャット補完形式のAIゲートウェイ（複数画像）
    Gateway,
    /// Gemini generateContent（先頭画像＋テーマ）
    Gemini,
}

impl AiProvider {
    pub fn label(&self) -> &'static str {
        match self {
            AiProvider::Gateway => "AI Gateway",
            AiProvider::Gemini => "Gemini",
        }
    }
}
