use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません（{0}）。`mood-snap config` で設定してください")]
    MissingApiKey(&'static str),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("写真が選択されていません")]
    NoImages,

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("画像デコードエラー: {0}")]
    Decode(String),

    #[error("描画エラー: {0}")]
    Render(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Usage limit reached. Please add credits.")]
    PaymentRequired,

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("バックエンドエラー (HTTP {status}): {body}")]
    Backend { status: u16, body: String },

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("タスク実行エラー: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Common(#[from] mood_snap_common::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
