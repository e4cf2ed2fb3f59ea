//! 成果物の書き出し（最終画像・レイアウトSVG・解析JSON）

use std::path::{Path, PathBuf};

use mood_snap_common::{download_file_name, Composition};
use serde::Serialize;
use tracing::debug;

use crate::data_url::read_source;
use crate::error::Result;

/// 出力先がディレクトリ（または拡張子なし）ならファイル名を補う
pub fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// 最終画像を `mood-snap-<感情>.png` として保存
///
/// `source` はdata URLかファイルパス。ファイル名を補う場合、中身がPNG以外
/// （元のJPEGなど）なら拡張子を実際の形式に合わせる。
pub fn save_final_image(source: &str, output: &Path, dominant_emotion: &str) -> Result<PathBuf> {
    let bytes = read_source(source)?;
    let mut file_name = download_file_name(dominant_emotion);
    if let Some(ext) = image::guess_format(&bytes).ok().and_then(|f| f.extensions_str().first()) {
        if *ext != "png" {
            file_name = format!("{}.{}", file_name.trim_end_matches(".png"), ext);
        }
    }
    let path = output_path_for(output, &file_name);
    ensure_parent(&path)?;
    std::fs::write(&path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "final image saved");
    Ok(path)
}

pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn write_svg(composition: &Composition, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, composition.to_svg())?;
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
