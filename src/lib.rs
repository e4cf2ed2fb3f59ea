//! Mood Snap
//!
//! 写真をアップロードして感情解析とコラージュ合成を行うスタジオ。
//! CLI・バックエンドサーバー・AI連携・合成エンジンを含む。

pub mod ai_provider;
pub mod cli;
pub mod compress;
pub mod config;
pub mod data_url;
pub mod engine;
pub mod error;
pub mod export;
pub mod gateway;
pub mod scanner;
pub mod server;
pub mod studio;
