//! コラージュ合成エンジン
//!
//! テンプレート選択 → 背景 → 写真ごとの加工と配置 → 装飾（ベクター＋文字）→ 紙テクスチャ → PNG。
//! テンプレートは原寸（約3000px）で定義し、`scale` で全体を一様に縮小する。

pub mod draw;
pub mod filters;
pub mod overlay;
pub mod templates;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mood_snap_common::palette::{parse_hex, FALLBACK_INK};
use mood_snap_common::{EmotionAnalysis, PartialEmotionAnalysis};
use tracing::debug;
use vello_cpu::kurbo::{Point, Rect};

use crate::error::{Result, StudioError};
use draw::{add_noise_texture, paste, vertical_gradient};
use filters::{apply_filter, border_frame, fit_inside, luxury_grade, polaroid_frame, rotate_expand};
use overlay::{star_points, Overlay};
use templates::{template_for_style, Background, CollageTemplate, Decoration, DoodleShape, FrameStyle, Placement};

pub use templates::{PhotoFilter, TemplateKind};

/// 既定の縮小率（3000px → 750px）
pub const DEFAULT_SCALE: f32 = 0.25;
const NOISE_ALPHA: f32 = 0.05;
const BORDER_WIDTH: f32 = 10.0;
const DOODLE_STROKE: f64 = 3.0;
const SQUIGGLE_STROKE: f64 = 4.0;
const SQUIGGLE_WAVE: f64 = 20.0;
const WASHI_TAPE_SIZE: (f64, f64) = (100.0, 30.0);
const SWATCH_SIZE: f64 = 40.0;
const SWATCH_SPACING: f64 = 10.0;
const SWATCH_OUTLINE: f64 = 2.0;
const MAX_SWATCHES: usize = 5;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 解析にスタイル・パレット・主感情が無い場合の合成用の既定値
pub const ENGINE_DEFAULT_STYLE: &str = "moodboard";
pub const ENGINE_DEFAULT_PALETTE: [&str; 2] = ["#FFFFFF", "#000000"];
pub const ENGINE_DEFAULT_EMOTION: &str = "Joy";

fn color_or(hex: &str, fallback: Rgb<u8>) -> Rgb<u8> {
    parse_hex(hex).map(Rgb).unwrap_or(fallback)
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn ink() -> Rgb<u8> {
    color_or(FALLBACK_INK, Rgb([0, 0, 0]))
}

pub struct CollageEngine {
    scale: f32,
    noise_seed: u64,
}

impl Default for CollageEngine {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE, noise_seed: rand::random() }
    }
}

impl CollageEngine {
    pub fn new(scale: f32) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
            return Err(StudioError::Config(format!("scale must be in (0, 1]: {}", scale)));
        }
        Ok(Self { scale, ..Default::default() })
    }

    /// ノイズの乱数シードを固定する（出力を再現したい場合）
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn px(&self, v: u32) -> u32 {
        ((v as f32 * self.scale).round() as u32).max(1)
    }

    fn at(&self, v: u32) -> i64 {
        (v as f32 * self.scale).round() as i64
    }

    /// 装飾用（サブピクセルのまま）
    fn scaled(&self, v: f64) -> f64 {
        v * f64::from(self.scale)
    }

    /// スタイル文字列からテンプレートを選んで合成し、PNGバイト列を返す
    pub fn create_collage(&self, photos: &[Vec<u8>], style: &str, palette: &[String], emotion: &str) -> Result<Vec<u8>> {
        let template = template_for_style(style);
        debug!(template = template.name, photos = photos.len(), emotion, "composing collage");
        self.render_template(template, photos, palette)
    }

    pub fn create_collage_from_analysis(&self, photos: &[Vec<u8>], analysis: &EmotionAnalysis) -> Result<Vec<u8>> {
        self.create_collage(photos, &analysis.collage_style, &analysis.color_palette, &analysis.dominant_emotion)
    }

    /// モデルが返したままの解析で合成
    ///
    /// スタイル欠落は moodboard、パレット欠落は白黒、主感情欠落は Joy。
    pub fn create_collage_from_partial(&self, photos: &[Vec<u8>], analysis: &PartialEmotionAnalysis) -> Result<Vec<u8>> {
        let style = present(&analysis.collage_style).unwrap_or_else(|| ENGINE_DEFAULT_STYLE.to_string());
        let emotion = present(&analysis.dominant_emotion).unwrap_or_else(|| ENGINE_DEFAULT_EMOTION.to_string());
        let palette: Vec<String> = match &analysis.color_palette {
            Some(colors) => colors.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect(),
            None => ENGINE_DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        };
        self.create_collage(photos, &style, &palette, &emotion)
    }

    /// 指定テンプレートで合成（テンプレートの枠数を超える写真は使わない）
    pub fn render_template(&self, template: &CollageTemplate, photos: &[Vec<u8>], palette: &[String]) -> Result<Vec<u8>> {
        let mut canvas = self.background(template);

        for (bytes, placement) in photos.iter().zip(template.placements) {
            let photo = self.process_photo(bytes, placement)?;
            paste(&mut canvas, &photo, self.at(placement.x), self.at(placement.y));
        }

        if !template.decorations.is_empty() {
            let mut overlay = Overlay::new(canvas.width(), canvas.height())?;
            for decoration in template.decorations {
                self.decorate(&mut overlay, decoration, palette);
            }
            overlay.composite_onto(&mut canvas)?;
        }

        add_noise_texture(&mut canvas, NOISE_ALPHA, self.noise_seed);

        let mut png = Vec::new();
        DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn background(&self, template: &CollageTemplate) -> RgbImage {
        let (w, h) = (self.px(template.width), self.px(template.height));
        match template.background {
            Background::Solid(color) => RgbImage::from_pixel(w, h, color_or(color, WHITE)),
            Background::Gradient(top, bottom) => vertical_gradient(w, h, color_or(top, WHITE), color_or(bottom, WHITE)),
        }
    }

    fn process_photo(&self, bytes: &[u8], placement: &Placement) -> Result<RgbImage> {
        let decoded = image::load_from_memory(bytes)?;
        let graded = luxury_grade(&decoded);
        let mut photo = fit_inside(&graded, self.px(placement.width), self.px(placement.height));

        apply_filter(&mut photo, placement.filter);

        photo = match placement.frame {
            FrameStyle::None => photo,
            FrameStyle::Polaroid => polaroid_frame(&photo),
            FrameStyle::Border => border_frame(&photo, ((BORDER_WIDTH * self.scale).round() as u32).max(1)),
        };

        if placement.rotation != 0.0 {
            photo = rotate_expand(&photo, placement.rotation);
        }
        Ok(photo)
    }

    fn decorate(&self, overlay: &mut Overlay, decoration: &Decoration, palette: &[String]) {
        match *decoration {
            Decoration::Doodle { shape, x, y, size, color } => {
                let color = match color {
                    Some(c) => color_or(c, ink()),
                    None => palette.first().map(|c| color_or(c, ink())).unwrap_or_else(ink),
                };
                self.doodle(overlay, shape, x, y, size, color);
            }
            Decoration::WashiTape { x, y, rotation, color } => {
                let (w, h) = WASHI_TAPE_SIZE;
                let (x, y) = (self.scaled(x.into()), self.scaled(y.into()));
                let rect = Rect::new(x, y, x + self.scaled(w), y + self.scaled(h));
                overlay.fill_rect(rect, rotation.into(), color_or(color, WHITE).0);
            }
            Decoration::ColorSwatch { x, y } => {
                let size = self.scaled(SWATCH_SIZE);
                let step = self.scaled(SWATCH_SIZE + SWATCH_SPACING);
                let outline = self.scaled(SWATCH_OUTLINE);
                let x = self.scaled(x.into());
                for (i, color) in palette.iter().take(MAX_SWATCHES).enumerate() {
                    let sy = self.scaled(y.into()) + i as f64 * step;
                    let outer = Rect::new(x, sy, x + size, sy + size);
                    overlay.fill_rect(outer, 0.0, WHITE.0);
                    overlay.fill_rect(outer.inset(-outline), 0.0, color_or(color, ink()).0);
                }
            }
            Decoration::Text { content, x, y, font_size, color } => {
                let size = self.scaled(font_size.into()) as f32;
                let glyphs = overlay.text(content, self.scaled(x.into()), self.scaled(y.into()), size, color_or(color, ink()).0);
                debug!(content, glyphs, "text decoration");
            }
        }
    }

    fn doodle(&self, overlay: &mut Overlay, shape: DoodleShape, x: u32, y: u32, size: u32, color: Rgb<u8>) {
        let (x, y, size) = (self.scaled(x.into()), self.scaled(y.into()), self.scaled(size.into()));
        let stroke = self.scaled(DOODLE_STROKE);
        match shape {
            DoodleShape::Heart => {
                let half = size / 2.0;
                overlay.ellipse_outline(Rect::new(x, y, x + half, y + half), stroke, color.0);
                overlay.ellipse_outline(Rect::new(x + half, y, x + size, y + half), stroke, color.0);
            }
            DoodleShape::Star => overlay.polygon_outline(&star_points(x, y, size), stroke, color.0),
            DoodleShape::Circle => overlay.ellipse_outline(Rect::new(x, y, x + size, y + size), stroke, color.0),
            DoodleShape::Squiggle => {
                let wave = self.scaled(SQUIGGLE_WAVE);
                let points = [
                    Point::new(x, y),
                    Point::new(x + size / 3.0, y - wave),
                    Point::new(x + 2.0 * size / 3.0, y + wave),
                    Point::new(x + size, y),
                ];
                overlay.polyline(&points, self.scaled(SQUIGGLE_STROKE), color.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templates::{MAGAZINE, SCRAPBOOK};

    fn png(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn decode(bytes: &[u8]) -> RgbImage {
        image::load_from_memory(bytes).unwrap().to_rgb8()
    }

    fn engine() -> CollageEngine {
        CollageEngine::new(0.1).unwrap().with_noise_seed(1)
    }

    #[test]
    fn test_canvas_is_scaled_template() {
        let photos = vec![png(60, 40, [200, 30, 30]); 3];
        let out = engine().create_collage(&photos, "magazine", &[], "Joy").unwrap();
        let canvas = decode(&out);
        assert_eq!(canvas.dimensions(), (300, 400));
    }

    #[test]
    fn test_extra_photos_are_ignored() {
        // Magazineは3枠
        let photos = vec![png(20, 20, [0, 0, 255]); 7];
        assert!(engine().render_template(&MAGAZINE, &photos, &[]).is_ok());
    }

    #[test]
    fn test_undecodable_photo_is_error() {
        let photos = vec![b"not an image".to_vec()];
        let result = engine().create_collage(&photos, "doodle", &[], "Joy");
        assert!(matches!(result, Err(StudioError::Image(_))));
    }

    #[test]
    fn test_zero_photos_renders_background() {
        let out = engine().create_collage(&[], "filmstrip", &[], "Calm").unwrap();
        let canvas = decode(&out);
        // 黒背景にノイズ（最大でも 49 * 0.05）
        assert!(canvas.get_pixel(5, 5)[0] <= 3);
    }

    #[test]
    fn test_same_seed_same_output() {
        let photos = vec![png(30, 30, [10, 200, 10])];
        let a = engine().create_collage(&photos, "scrapbook", &[], "Joy").unwrap();
        let b = engine().create_collage(&photos, "scrapbook", &[], "Joy").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_swatches_use_palette() {
        const SWATCHES: CollageTemplate = CollageTemplate {
            width: 100,
            height: 300,
            decorations: &[Decoration::ColorSwatch { x: 0, y: 0 }],
            placements: &[],
            background: Background::Solid("#FFFFFF"),
            ..SCRAPBOOK
        };
        let palette = vec!["#FF0000".to_string(), "#0000FF".to_string()];
        let canvas = decode(&CollageEngine::new(1.0).unwrap().render_template(&SWATCHES, &[], &palette).unwrap());
        let first = canvas.get_pixel(20, 20);
        assert!(first[0] > 230 && first[2] < 20);
        let second = canvas.get_pixel(20, 70);
        assert!(second[2] > 230 && second[0] < 20);
        // 白フチ
        assert!(canvas.get_pixel(0, 0)[1] > 230);
    }

    #[test]
    fn test_doodle_without_color_uses_palette() {
        const CIRCLE: CollageTemplate = CollageTemplate {
            width: 100,
            height: 100,
            decorations: &[Decoration::Doodle { shape: DoodleShape::Circle, x: 10, y: 10, size: 80, color: None }],
            placements: &[],
            background: Background::Solid("#FFFFFF"),
            ..SCRAPBOOK
        };
        let palette = vec!["#00FF00".to_string()];
        let canvas = decode(&CollageEngine::new(1.0).unwrap().with_noise_seed(3).render_template(&CIRCLE, &[], &palette).unwrap());
        // 左端の輪郭は緑、中心は背景のまま
        let edge = canvas.get_pixel(10, 50);
        assert!(edge[1] > 200 && edge[0] < 60);
        assert!(canvas.get_pixel(50, 50)[0] > 230);
    }

    #[test]
    fn test_washi_tape_is_filled() {
        const TAPE: CollageTemplate = CollageTemplate {
            width: 200,
            height: 100,
            decorations: &[Decoration::WashiTape { x: 50, y: 30, rotation: 0.0, color: "#000000" }],
            placements: &[],
            background: Background::Solid("#FFFFFF"),
            ..SCRAPBOOK
        };
        let canvas = decode(&CollageEngine::new(1.0).unwrap().render_template(&TAPE, &[], &[]).unwrap());
        assert!(canvas.get_pixel(100, 45)[0] < 5);
        assert!(canvas.get_pixel(100, 80)[0] > 230);
        assert!(canvas.get_pixel(20, 45)[0] > 230);
    }

    #[test]
    fn test_text_decoration_is_rendered() {
        const TITLE: CollageTemplate = CollageTemplate {
            width: 400,
            height: 120,
            decorations: &[Decoration::Text { content: "STAY WILD", x: 10, y: 10, font_size: 60, color: "#000000" }],
            placements: &[],
            background: Background::Solid("#FFFFFF"),
            ..SCRAPBOOK
        };
        let mut overlay = Overlay::new(10, 10).unwrap();
        if overlay.text("A", 0.0, 0.0, 8.0, [0, 0, 0]) == 0 {
            eprintln!("no system fonts available; skipping text rendering check");
            return;
        }

        let canvas = decode(&CollageEngine::new(1.0).unwrap().render_template(&TITLE, &[], &[]).unwrap());
        let dark = canvas.pixels().filter(|p| p[0] < 100).count();
        assert!(dark > 50, "text drew {} dark pixels", dark);
    }

    #[test]
    fn test_partial_without_style_uses_moodboard() {
        let partial = PartialEmotionAnalysis { dominant_emotion: Some("Calm".into()), ..Default::default() };
        let out = engine().create_collage_from_partial(&[png(10, 10, [1, 2, 3])], &partial).unwrap();
        // Moodboard 3000x3000（Magazineなら300x400になる）
        assert_eq!(decode(&out).dimensions(), (300, 300));

        let partial = PartialEmotionAnalysis { collage_style: Some("  ".into()), ..Default::default() };
        let out = engine().create_collage_from_partial(&[], &partial).unwrap();
        assert_eq!(decode(&out).dimensions(), (300, 300));
    }

    #[test]
    fn test_partial_keeps_given_style() {
        let partial = PartialEmotionAnalysis { collage_style: Some("filmstrip".into()), ..Default::default() };
        let out = engine().create_collage_from_partial(&[], &partial).unwrap();
        assert_eq!(decode(&out).dimensions(), (300, 420));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        assert!(CollageEngine::new(0.0).is_err());
        assert!(CollageEngine::new(1.5).is_err());
        assert!(CollageEngine::new(f32::NAN).is_err());
    }

    #[test]
    fn test_from_analysis_uses_collage_style() {
        let analysis = EmotionAnalysis { collage_style: "High Fashion".into(), ..Default::default() };
        let out = engine().create_collage_from_analysis(&[png(10, 10, [1, 2, 3])], &analysis).unwrap();
        assert_eq!(decode(&out).dimensions(), (300, 400));
    }
}
