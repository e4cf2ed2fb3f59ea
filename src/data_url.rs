//! data URL と写真ソースの読み込み
//!
//! スタジオの写真はファイルパスか `data:image/...;base64,` 形式のどちらか。

use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// バイト列をbase64のdata URLにする
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn png_data_url(bytes: &[u8]) -> String {
    to_data_url("image/png", bytes)
}

pub fn jpeg_data_url(bytes: &[u8]) -> String {
    to_data_url("image/jpeg", bytes)
}

pub fn is_data_url(source: &str) -> bool {
    source.trim_start().starts_with("data:")
}

/// data URLをデコード（MIMEタイプとバイト列）
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::Decode("data URLではありません".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| StudioError::Decode("data URLにカンマがありません".into()))?;
    let mime = meta.split(';').next().unwrap_or_default().to_string();
    if !meta.ends_with(";base64") {
        return Err(StudioError::Decode(format!("base64以外のdata URLは未対応: {}", meta)));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| StudioError::Decode(e.to_string()))?;
    Ok((mime, bytes))
}

/// 写真ソースのバイト列（data URL or ファイルパス）
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    if is_data_url(source) {
        return decode_data_url(source).map(|(_, bytes)| bytes);
    }
    std::fs::read(source).map_err(|e| StudioError::FileNotFound(format!("{}: {}", source, e)))
}
