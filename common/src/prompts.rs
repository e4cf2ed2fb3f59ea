//! プロンプト生成モジュール
//!
//! - build_gateway_prompt: AIゲートウェイ（複数画像の感情解析）用
//! - build_director_prompt: バックエンドのGemini解析（先頭画像＋テーマ）用

/// AIゲートウェイ用プロンプト
///
/// # Arguments
/// * `image_count` - 解析する画像の枚数
pub fn build_gateway_prompt(image_count: usize) -> String {
    format!(
        r##"Analyze the emotions present in these {image_count} photos. For each photo, identify the dominant emotions (happiness, joy, love, nostalgia, excitement, peace, energy, sadness, etc.).

Return a JSON response with this exact structure:
{{
  "emotions": ["emotion1", "emotion2", "emotion3"],
  "dominantEmotion": "the most prominent emotion across all photos",
  "collageStyle": "suggested style based on emotions (e.g., 'warm and cozy', 'vibrant and energetic', 'romantic', 'peaceful and serene', 'nostalgic vintage')",
  "colorPalette": ["#color1", "#color2", "#color3", "#color4"],
  "layoutSuggestion": "grid" or "scattered" or "overlap" or "polaroid"
}}

Only respond with valid JSON, no additional text."##
    )
}

/// バックエンド（クリエイティブディレクター）用プロンプト
///
/// # Arguments
/// * `theme` - 選択されたスタイルキー
/// * `user_prompt` - ユーザーの演出指示（空可）
pub fn build_director_prompt(theme: &str, user_prompt: &str) -> String {
    let direction = user_prompt.trim();
    let direction_line = if direction.is_empty() {
        String::new()
    } else {
        format!("\nCreative direction: {direction}")
    };

    format!(
        r#"AS AN ELITE CREATIVE DIRECTOR:
Analyze this image. Return STRICT JSON: {{ "dominantEmotion": "", "vibeDescription": "", "collageStyle": "{theme}", "emotions": [], "colorPalette": [] }}
Theme: {theme}{direction_line}
"#
    )
}
