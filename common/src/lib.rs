//! Mood Snap Common Library
//!
//! 感情解析の契約型、レイアウト戦略、パレット、JSON抽出など
//! CLI・サーバー・コラージュエンジンで共有されるもの。

pub mod composition;
pub mod defaults;
pub mod display;
pub mod error;
pub mod layouts;
pub mod palette;
pub mod parser;
pub mod prompts;
pub mod style;
pub mod svg;
pub mod types;

pub use composition::{Composition, Element, Jitter, Page};
pub use display::{download_file_name, emotion_chips, EmotionChip};
pub use error::{Error, Result};
pub use layouts::{Layout, LayoutMount, Strategy};
pub use palette::Palette;
pub use parser::{extract_json, parse_analysis, parse_analysis_or_else, ParsedAnalysis};
pub use style::{find_mode, LayoutStyle, StudioMode, DEFAULT_MODE, STUDIO_MODES};
pub use types::{EmotionAnalysis, PartialEmotionAnalysis, StudioResponse};
