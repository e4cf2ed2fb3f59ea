//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("JSONが見つかりません".to_string());
        assert_eq!(format!("{}", error), "Parse error: JSONが見つかりません");
    }

    #[test]
    fn test_error_display_unknown_style() {
        let error = Error::UnknownStyle("baroque".to_string());
        assert_eq!(format!("{}", error), "Unknown style: baroque");
    }

    #[test]
    fn test_malformed_analysis_is_parse_error() {
        let error = crate::parse_analysis("{ not json }").unwrap_err();
        assert!(matches!(error, Error::Parse(_)));
    }
}
