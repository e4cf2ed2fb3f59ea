use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mood_snap::{cli, compress, config, data_url, engine, export, gateway, scanner, server, studio};
use mood_snap::ai_provider::AiProvider;
use mood_snap_common::{download_file_name, emotion_chips, parse_analysis, EmotionAnalysis, LayoutMount, STUDIO_MODES};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use compress::CompressOptions;
use config::Config;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn collect_sources(inputs: &[PathBuf]) -> mood_snap::error::Result<Vec<String>> {
    let photos = scanner::collect_photos(inputs)?;
    Ok(photos.iter().map(|p| p.path.to_string_lossy().to_string()).collect())
}

/// 解析JSON（未指定なら既定の解析）
fn load_analysis(path: Option<&Path>) -> anyhow::Result<EmotionAnalysis> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("解析ファイルを読めません: {}", path.display()))?;
            Ok(parse_analysis(&content)?.resolve())
        }
        None => Ok(EmotionAnalysis::default()),
    }
}

fn print_analysis(analysis: &EmotionAnalysis) {
    println!("  感情: {}", analysis.dominant_emotion);
    println!("  雰囲気: {}", analysis.vibe_description);
    println!("  スタイル: {}", analysis.collage_style);
    let chips: Vec<String> = emotion_chips(analysis).into_iter().map(|c| c.label).collect();
    if !chips.is_empty() {
        println!("  タグ: {}", chips.join(", "));
    }
    if !analysis.color_palette.is_empty() {
        println!("  パレット: {}", analysis.color_palette.join(" "));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load()?;

    match cli.command {
        Commands::Studio { photos, mode, prompt, backend, output } => {
            println!("📸 mood-snap - スタジオ\n");

            println!("[1/3] 写真を収集中...");
            let sources = collect_sources(&photos)?;
            println!("✔ {}枚の写真\n", sources.len());

            let mut session = studio::StudioSession::new(CompressOptions {
                max_edge: config.max_image_size,
                quality: config.jpeg_quality,
            });
            session.set_mode(&mode)?;
            session.set_user_prompt(prompt);
            session.add_photos(sources);

            let base_url = backend.unwrap_or_else(|| config.backend_url.clone());
            let backend = studio::HttpBackend::new(&base_url)?;

            let pb = spinner(&format!("[2/3] {} で解析中...", base_url));
            let outcome = session.submit(&backend).await;
            pb.finish_and_clear();

            if let Some(n) = session.last_notification() {
                println!("{} {}: {}", if n.kind == studio::NotificationKind::Error { "✖" } else { "✔" }, n.title, n.description);
            }

            let collage_created = match outcome {
                studio::SubmitOutcome::NothingSelected => {
                    println!("写真がありません");
                    return Ok(());
                }
                studio::SubmitOutcome::Failed => {
                    anyhow::bail!("スタジオ処理に失敗しました");
                }
                studio::SubmitOutcome::CollageCreated => true,
                studio::SubmitOutcome::AnalysisOnly => false,
            };

            println!("\n[3/3] 結果を保存中...");
            if let Some(analysis) = session.analysis() {
                print_analysis(analysis);

                match session.final_image() {
                    Some(image) if collage_created => {
                        let saved = export::save_final_image(image, &output, &analysis.dominant_emotion)?;
                        println!("✔ 画像: {}", saved.display());
                    }
                    _ => println!("  コラージュは返されませんでした（画像は保存しません）"),
                }
                let json_path = output.join("analysis.json");
                export::write_json(analysis, &json_path)?;
                println!("✔ 解析: {}", json_path.display());
            }
            if let Some(composition) = session.compose() {
                let svg_path = output.join(format!("layout-{}.svg", composition.style.key()));
                export::write_svg(&composition, &svg_path)?;
                println!("✔ レイアウト: {}", svg_path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Analyze { photos, provider, theme, prompt, output } => {
            println!("🔍 mood-snap - 感情解析 ({})\n", provider.label());

            let sources = collect_sources(&photos)?;
            if sources.is_empty() {
                anyhow::bail!(mood_snap::error::StudioError::NoImages);
            }
            let options = CompressOptions { max_edge: config.max_image_size, quality: config.jpeg_quality };
            let compressed = compress::compress_all(&sources, options).await?;
            println!("✔ {}枚を圧縮\n", compressed.len());

            let pb = spinner("AI解析中...");
            let analysis = match provider {
                AiProvider::Gateway => {
                    let client = gateway::GatewayClient::from_config(&config)?;
                    let urls: Vec<String> = compressed.iter().map(|p| data_url::jpeg_data_url(&p.bytes)).collect();
                    let parsed = client.analyze(&urls).await;
                    pb.finish_and_clear();
                    let parsed = parsed?;
                    if parsed.used_fallback {
                        println!("⚠ 応答を解析できなかったため既定の解析を使用");
                    }
                    parsed.analysis.resolve()
                }
                AiProvider::Gemini => {
                    let client = gateway::GeminiClient::from_config(&config)?;
                    let result = client.analyze(&theme, &prompt, &compressed[0].bytes).await;
                    pb.finish_and_clear();
                    result?.resolve()
                }
            };

            print_analysis(&analysis);
            export::write_json(&analysis, &output)?;
            println!("\n✔ 結果を保存: {}", output.display());
        }

        Commands::Compose { photos, analysis, output, scale } => {
            println!("🎨 mood-snap - コラージュ合成\n");

            let analysis = load_analysis(analysis.as_deref())?;
            let sources = collect_sources(&photos)?;
            let mut bytes = Vec::with_capacity(sources.len());
            for source in &sources {
                bytes.push(data_url::read_source(source)?);
            }

            let engine = engine::CollageEngine::new(scale.unwrap_or(config.collage_scale))?;
            let pb = spinner(&format!("{}枚を {} で合成中...", bytes.len(), analysis.collage_style));
            let collage = {
                let analysis = analysis.clone();
                tokio::task::spawn_blocking(move || engine.create_collage_from_analysis(&bytes, &analysis)).await?
            };
            pb.finish_and_clear();

            let path = export::output_path_for(&output, &download_file_name(&analysis.dominant_emotion));
            export::write_bytes(&collage?, &path)?;
            println!("✔ コラージュ: {}", path.display());
        }

        Commands::Layout { photos, analysis, style, seed, output } => {
            let analysis = load_analysis(analysis.as_deref())?;
            let sources = collect_sources(&photos)?;

            let seed = seed.unwrap_or_else(rand::random);
            let mount = LayoutMount::new(style, seed, chrono::Local::now().year());
            let composition = mount.render(&sources, &analysis);

            export::write_svg(&composition, &output)?;
            println!("✔ {} レイアウト（seed {}）: {}", style.key(), seed, output.display());
            if composition.placeholder_count() > 0 {
                println!("  写真不足のため {} 箇所をプレースホルダーで描画", composition.placeholder_count());
            }
        }

        Commands::Serve { addr } => {
            println!("🚀 mood-snap - バックエンド起動: http://{}\n", addr);
            let state = server::ServerState::from_config(&config);
            server::run(addr, state).await?;
        }

        Commands::Modes => {
            println!("スタジオモード:");
            for mode in STUDIO_MODES {
                println!("  {:<10} {:<16} {} [{}]", mode.id, mode.label, mode.description, mode.layout().key());
            }
        }

        Commands::Config { set_gateway_key, set_gemini_key, set_backend_url, show } => {
            let mut config = config;

            if let Some(key) = set_gateway_key {
                config.set_gateway_key(key)?;
                println!("✔ AIゲートウェイのAPIキーを設定しました");
            }
            if let Some(key) = set_gemini_key {
                config.set_gemini_key(key)?;
                println!("✔ GeminiのAPIキーを設定しました");
            }
            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if show {
                let status = |ok: bool| if ok { "設定済み" } else { "未設定" };
                println!("設定:");
                println!("  バックエンド: {}", config.backend_url);
                println!("  ゲートウェイ: {} ({})", config.gateway_url, config.gateway_model);
                println!("  Geminiモデル: {}", config.gemini_model);
                println!("  最大画像サイズ: {}px (JPEG {}%)", config.max_image_size, config.jpeg_quality);
                println!("  合成の縮小率: {}", config.collage_scale);
                println!("  ゲートウェイキー: {}", status(config.gateway_key().is_ok()));
                println!("  Geminiキー: {}", status(config.gemini_key().is_ok()));
            }
        }
    }

    Ok(())
}
