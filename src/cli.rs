use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use mood_snap_common::LayoutStyle;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mood-snap")]
#[command(about = "写真の感情を読み取ってコラージュを作るスタジオ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真をバックエンドへ送り、コラージュと解析を受け取る
    Studio {
        /// 写真ファイルまたはフォルダ
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// スタジオモード (pinterest/magazine/portrait/doodle)
        #[arg(short, long, default_value = mood_snap_common::DEFAULT_MODE)]
        mode: String,

        /// 追加の指示
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// バックエンドURL（未指定なら設定値）
        #[arg(long)]
        backend: Option<String>,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// AIで感情解析してJSONを出力
    Analyze {
        /// 写真ファイルまたはフォルダ
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// 使用するAI
        #[arg(long, value_enum, default_value = "gateway")]
        provider: AiProvider,

        /// テーマ（Geminiのみ）
        #[arg(short, long, default_value = mood_snap_common::DEFAULT_MODE)]
        theme: String,

        /// 追加の指示（Geminiのみ）
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "analysis.json")]
        output: PathBuf,
    },

    /// 解析JSONからローカルでコラージュPNGを合成
    Compose {
        /// 写真ファイルまたはフォルダ
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// 解析JSON（未指定なら既定の解析）
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// 出力PNG（ディレクトリなら mood-snap-<感情>.png）
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// 縮小率 (0, 1]
        #[arg(long)]
        scale: Option<f32>,
    },

    /// レイアウトをSVGに描画
    Layout {
        /// 写真ファイルまたはフォルダ（0枚も可）
        photos: Vec<PathBuf>,

        /// 解析JSON（未指定なら既定の解析）
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// レイアウト (pinterest/magazine/cinematic/...)
        #[arg(short, long, default_value = "magazine")]
        style: LayoutStyle,

        /// 配置の乱数シード
        #[arg(long)]
        seed: Option<u64>,

        /// 出力SVG
        #[arg(short, long, default_value = "layout.svg")]
        output: PathBuf,
    },

    /// コラージュバックエンドを起動
    Serve {
        /// 待ち受けアドレス
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },

    /// スタジオモード一覧
    Modes,

    /// 設定を変更・表示
    Config {
        /// AIゲートウェイのAPIキーを設定
        #[arg(long)]
        set_gateway_key: Option<String>,

        /// GeminiのAPIキーを設定
        #[arg(long)]
        set_gemini_key: Option<String>,

        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_layout_style_alias() {
        let cli = Cli::try_parse_from(["mood-snap", "layout", "--style", "bridal", "a.jpg"]).unwrap();
        match cli.command {
            Commands::Layout { style, photos, .. } => {
                assert_eq!(style, LayoutStyle::BridalStrip);
                assert_eq!(photos.len(), 1);
            }
            _ => panic!("layout以外にパースされた"),
        }
    }

    #[test]
    fn test_unknown_layout_style_rejected() {
        assert!(Cli::try_parse_from(["mood-snap", "layout", "--style", "baroque"]).is_err());
    }

    #[test]
    fn test_studio_defaults() {
        let cli = Cli::try_parse_from(["mood-snap", "-v", "studio", "a.jpg", "b.jpg"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Studio { mode, prompt, backend, .. } => {
                assert_eq!(mode, "magazine");
                assert_eq!(prompt, "");
                assert!(backend.is_none());
            }
            _ => panic!("studio以外にパースされた"),
        }
    }
}
