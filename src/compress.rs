//! アップロード前の写真圧縮
//!
//! 長辺を上限以下に縮小（拡大はしない）し、JPEGで再エンコードする。
//! 各写真は独立したブロッキングタスクで処理し、全完了を待ってから返す。

use crate::data_url::read_source;
use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub max_edge: u32,
    pub quality: u8,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self { max_edge: 1024, quality: 80 }
    }
}

/// 圧縮済み写真
#[derive(Debug, Clone)]
pub struct CompressedPhoto {
    /// アップロード時のファイル名（`photo{i}.jpg`）
    pub upload_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 縮小後のサイズ（長辺がmax_edge以下ならそのまま）
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= max_edge || long == 0 {
        return (width, height);
    }
    let ratio = max_edge as f64 / long as f64;
    let w = ((width as f64 * ratio).round() as u32).max(1);
    let h = ((height as f64 * ratio).round() as u32).max(1);
    (w, h)
}

/// デコード済み画像を縮小してJPEGにする
pub fn encode_jpeg(img: &DynamicImage, options: CompressOptions) -> Result<(Vec<u8>, u32, u32)> {
    let (width, height) = img.dimensions();
    let (w, h) = fit_within(width, height, options.max_edge);
    let resized = if (w, h) == (width, height) {
        img.to_rgb8()
    } else {
        img.resize_exact(w, h, FilterType::Lanczos3).to_rgb8()
    };

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, options.quality);
    DynamicImage::ImageRgb8(resized).write_with_encoder(encoder)?;
    Ok((buf.into_inner(), w, h))
}

/// バイト列（任意形式）を圧縮
pub fn compress_bytes(bytes: &[u8], options: CompressOptions) -> Result<(Vec<u8>, u32, u32)> {
    let img = image::load_from_memory(bytes)?;
    encode_jpeg(&img, options)
}

/// 写真ソース（ファイルパス or data URL）を読み込んで圧縮
pub fn compress_source(source: &str, options: CompressOptions) -> Result<(Vec<u8>, u32, u32)> {
    let bytes = read_source(source)?;
    compress_bytes(&bytes, options)
}

/// 全写真を並行して圧縮する（結果は入力順）
///
/// 1枚でも失敗したらエラー。
pub async fn compress_all(sources: &[String], options: CompressOptions) -> Result<Vec<CompressedPhoto>> {
    let mut tasks = JoinSet::new();
    for (i, source) in sources.iter().cloned().enumerate() {
        tasks.spawn_blocking(move || (i, compress_source(&source, options)));
    }

    let mut done: Vec<(usize, CompressedPhoto)> = Vec::with_capacity(sources.len());
    while let Some(joined) = tasks.join_next().await {
        let (i, result) = joined?;
        let (bytes, width, height) = result?;
        debug!(index = i, width, height, size = bytes.len(), "compressed photo");
        done.push((
            i,
            CompressedPhoto { upload_name: format!("photo{}.jpg", i), bytes, width, height },
        ));
    }

    done.sort_by_key(|(i, _)| *i);
    Ok(done.into_iter().map(|(_, photo)| photo).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([200, 100, 50]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(4000, 3000, 1024), (1024, 768));
        assert_eq!(fit_within(3000, 4000, 1024), (768, 1024));
        assert_eq!(fit_within(800, 600, 1024), (800, 600));
        assert_eq!(fit_within(1024, 10, 1024), (1024, 10));
        assert_eq!(fit_within(5000, 1, 1024), (1024, 1));
    }

    #[test]
    fn test_compress_large_image() {
        let (bytes, w, h) = compress_bytes(&png_bytes(2048, 1024), CompressOptions::default()).unwrap();
        assert_eq!((w, h), (1024, 512));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 512));
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let (_, w, h) = compress_bytes(&png_bytes(300, 200), CompressOptions::default()).unwrap();
        assert_eq!((w, h), (300, 200));
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(compress_bytes(b"not an image", CompressOptions::default()).is_err());
    }
}
