//! 写真の収集（ファイル指定・フォルダ指定の両方）

use crate::error::{Result, StudioError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl PhotoFile {
    fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path: path.to_path_buf(), file_name }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// フォルダ直下の画像をファイル名順で返す
pub fn scan_folder(folder: &Path) -> Result<Vec<PhotoFile>> {
    if !folder.exists() {
        return Err(StudioError::FileNotFound(folder.display().to_string()));
    }

    let mut photos: Vec<PhotoFile> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_image_path(e.path()))
        .map(|e| PhotoFile::new(e.path()))
        .collect();

    photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(photos)
}

/// CLI引数から写真を集める
///
/// ファイルは指定順のまま、フォルダは直下の画像をファイル名順で展開する。
/// 画像以外の拡張子のファイルを直接指定した場合も受け付ける（デコード時に判定）。
pub fn collect_photos(inputs: &[PathBuf]) -> Result<Vec<PhotoFile>> {
    let mut photos = Vec::new();
    for input in inputs {
        if input.is_dir() {
            photos.extend(scan_folder(input)?);
        } else if input.is_file() {
            photos.push(PhotoFile::new(input));
        } else {
            return Err(StudioError::FileNotFound(input.display().to_string()));
        }
    }
    Ok(photos)
}
