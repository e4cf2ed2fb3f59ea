//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use mood_snap::error::StudioError;
use mood_snap::{compress, data_url, engine, scanner};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(StudioError::FileNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.unwrap().is_empty());
}

/// 存在しないファイルを直接指定した場合
#[test]
fn test_collect_missing_file() {
    let result = scanner::collect_photos(&[PathBuf::from("/nonexistent/photo.jpg")]);
    assert!(matches!(result, Err(StudioError::FileNotFound(_))));
}

/// 壊れた画像の圧縮
#[test]
fn test_compress_corrupt_image() {
    let result = compress::compress_bytes(b"\xFF\xD8 broken jpeg", compress::CompressOptions::default());
    assert!(matches!(result, Err(StudioError::Image(_))));
}

/// base64でないdata URL
#[test]
fn test_non_base64_data_url() {
    let result = data_url::decode_data_url("data:text/plain,hello");
    assert!(matches!(result, Err(StudioError::Decode(_))));
}

/// 縮小率の範囲外
#[test]
fn test_engine_rejects_bad_scale() {
    assert!(matches!(engine::CollageEngine::new(2.0), Err(StudioError::Config(_))));
}

/// 共通ライブラリのエラーは透過的に表示される
#[test]
fn test_common_error_is_transparent() {
    let error: StudioError = mood_snap_common::Error::UnknownStyle("baroque".into()).into();
    assert_eq!(error.to_string(), "Unknown style: baroque");
}

/// バックエンドエラーの表示
#[test]
fn test_backend_error_display() {
    let error = StudioError::Backend { status: 500, body: "boom".into() };
    let display = error.to_string();
    assert!(display.contains("500"));
    assert!(display.contains("boom"));
}
