//! 装飾レイヤー（落書き・マスキングテープ・カラースウォッチ・文字）
//!
//! 透明なピクスマップに vello_cpu でベクター描画し、最後にキャンバスへ合成する。
//! 文字は parley でシステムフォントを使ってレイアウトし、グリフランとして描く。

use std::borrow::Cow;
use std::collections::HashMap;

use image::RgbImage;
use tracing::debug;
use vello_cpu::kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape, Stroke};
use vello_cpu::peniko::Color;

use super::draw::composite_premul_over;
use crate::error::{Result, StudioError};

/// 曲線をパスへ変換する際の許容誤差（px）
const PATH_TOLERANCE: f64 = 0.1;

/// テンプレートの文字に使うフォント（見つからなければ汎用 sans-serif）
const TEXT_FONT_STACK: &str = "Arial, Helvetica, Liberation Sans, DejaVu Sans, sans-serif";

/// parley のブラシ（RGBA8）
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrush {
    pub fn rgb([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b, a: 255 }
    }
}

fn color([r, g, b]: [u8; 3]) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

/// 5角星の頂点（外径size、内径size/2、上向き）
pub fn star_points(cx: f64, cy: f64, size: f64) -> Vec<Point> {
    (0..10)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / 10.0 - std::f64::consts::FRAC_PI_2;
            let radius = if i % 2 == 0 { size } else { size / 2.0 };
            Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn polyline_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

/// 文字のレイアウト（parley）とフォントの受け渡し
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::new(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// 1行のテキストをレイアウト（改行なし）
    pub fn layout(&mut self, text: &str, size_px: f32, brush: TextBrush) -> parley::Layout<TextBrush> {
        let mut builder = self.layout_ctx.ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(parley::style::FontStack::Source(
            Cow::Borrowed(TEXT_FONT_STACK),
        )));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// グリフランのフォントを vello_cpu 側の FontData にする（同じフォントは使い回す）
    fn font_for(&mut self, blob_id: u64, index: u32, bytes: &[u8]) -> Option<vello_cpu::peniko::FontData> {
        if bytes.is_empty() {
            return None;
        }
        let entry = self.fonts.entry((blob_id, index)).or_insert_with(|| {
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), index)
        });
        Some(entry.clone())
    }
}

/// 装飾を描く透明レイヤー
pub struct Overlay {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    shaper: Option<TextShaper>,
}

impl Overlay {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| StudioError::Render(format!("canvas width exceeds u16: {}", width)))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| StudioError::Render(format!("canvas height exceeds u16: {}", height)))?;
        Ok(Self { ctx: vello_cpu::RenderContext::new(w, h), width: w, height: h, shaper: None })
    }

    fn stroke(&mut self, path: &BezPath, width: f64, rgb: [u8; 3]) {
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(color(rgb));
        self.ctx.set_stroke(Stroke::new(width));
        self.ctx.stroke_path(path);
    }

    /// 外接矩形の楕円の輪郭
    pub fn ellipse_outline(&mut self, rect: Rect, width: f64, rgb: [u8; 3]) {
        let path = Ellipse::from_rect(rect).to_path(PATH_TOLERANCE);
        self.stroke(&path, width, rgb);
    }

    pub fn polygon_outline(&mut self, points: &[Point], width: f64, rgb: [u8; 3]) {
        self.stroke(&polyline_path(points, true), width, rgb);
    }

    pub fn polyline(&mut self, points: &[Point], width: f64, rgb: [u8; 3]) {
        self.stroke(&polyline_path(points, false), width, rgb);
    }

    /// 矩形の塗り（`rotation` は中心まわり、反時計回りの度）
    pub fn fill_rect(&mut self, rect: Rect, rotation: f64, rgb: [u8; 3]) {
        let transform = if rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(-rotation.to_radians(), rect.center())
        };
        self.ctx.set_transform(transform);
        self.ctx.set_paint(color(rgb));
        self.ctx.fill_rect(&rect);
    }

    /// 左上 (x, y) から1行のテキストを描く
    ///
    /// 使えるフォントが無い環境ではグリフが出ないため何も描かない。
    pub fn text(&mut self, content: &str, x: f64, y: f64, size_px: f32, rgb: [u8; 3]) -> usize {
        let shaper = self.shaper.get_or_insert_with(TextShaper::new);
        let layout = shaper.layout(content, size_px, TextBrush::rgb(rgb));

        let mut drawn = 0;
        self.ctx.set_transform(Affine::translate((x, y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let run_font = run.run().font();
                let Some(font) = shaper.font_for(run_font.data.id(), run_font.index, run_font.data.data()) else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(Color::from_rgba8(brush.r, brush.g, brush.b, brush.a));

                let glyphs: Vec<vello_cpu::Glyph> = run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph { id: g.id, x: g.x, y: g.y })
                    .collect();
                drawn += glyphs.len();
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }
        if drawn == 0 {
            debug!(content, "no glyphs shaped for text decoration");
        }
        drawn
    }

    /// レイヤーをラスタライズしてキャンバスに重ねる
    pub fn composite_onto(mut self, canvas: &mut RgbImage) -> Result<()> {
        if canvas.dimensions() != (u32::from(self.width), u32::from(self.height)) {
            return Err(StudioError::Render("overlay/canvas size mismatch".into()));
        }
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        composite_premul_over(canvas, pixmap.data_as_u8_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn blank(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, WHITE)
    }

    #[test]
    fn test_star_has_ten_points() {
        let points = star_points(50.0, 50.0, 20.0);
        assert_eq!(points.len(), 10);
        assert!((points[0].x - 50.0).abs() < 1e-9);
        assert!((points[0].y - 30.0).abs() < 1e-9);
        // 内側の頂点は半径10
        assert!((points[1].distance(Point::new(50.0, 50.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_rect_covers_interior_only() {
        let mut canvas = blank(20, 20);
        let mut overlay = Overlay::new(20, 20).unwrap();
        overlay.fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), 0.0, [200, 0, 0]);
        overlay.composite_onto(&mut canvas).unwrap();

        assert_eq!(*canvas.get_pixel(5, 5), Rgb([200, 0, 0]));
        assert_eq!(*canvas.get_pixel(15, 15), WHITE);
    }

    #[test]
    fn test_rotated_rect_leaves_corner_untouched() {
        let mut canvas = blank(40, 40);
        let mut overlay = Overlay::new(40, 40).unwrap();
        overlay.fill_rect(Rect::new(10.0, 10.0, 30.0, 30.0), 45.0, [0, 0, 0]);
        overlay.composite_onto(&mut canvas).unwrap();

        // 中心は塗られ、元の角は菱形の外
        assert_eq!(*canvas.get_pixel(20, 20), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(11, 11), WHITE);
    }

    #[test]
    fn test_ellipse_outline_is_hollow() {
        let mut canvas = blank(60, 60);
        let mut overlay = Overlay::new(60, 60).unwrap();
        overlay.ellipse_outline(Rect::new(10.0, 10.0, 50.0, 50.0), 3.0, [0, 0, 255]);
        overlay.composite_onto(&mut canvas).unwrap();

        // 輪郭上（左端の中央）と中心
        let edge = canvas.get_pixel(10, 30);
        assert!(edge[2] > 200 && edge[0] < 80);
        assert_eq!(*canvas.get_pixel(30, 30), WHITE);
    }

    #[test]
    fn test_polyline_is_open() {
        let mut canvas = blank(40, 40);
        let mut overlay = Overlay::new(40, 40).unwrap();
        let points = [Point::new(5.0, 20.0), Point::new(35.0, 20.0), Point::new(35.0, 35.0)];
        overlay.polyline(&points, 4.0, [0, 0, 0]);
        overlay.composite_onto(&mut canvas).unwrap();

        assert!(canvas.get_pixel(20, 20)[0] < 60);
        // 始点と終点は結ばない
        assert_eq!(*canvas.get_pixel(20, 28), WHITE);
    }

    #[test]
    fn test_text_draws_glyphs_when_fonts_available() {
        let mut canvas = blank(200, 60);
        let mut overlay = Overlay::new(200, 60).unwrap();
        let glyphs = overlay.text("STAY WILD", 5.0, 5.0, 32.0, [0, 0, 0]);
        overlay.composite_onto(&mut canvas).unwrap();

        if glyphs == 0 {
            eprintln!("no system fonts available; skipping glyph check");
            assert!(canvas.pixels().all(|p| *p == WHITE));
            return;
        }
        assert!(glyphs >= 8);
        assert!(canvas.pixels().any(|p| p[0] < 128));
        // 右下の余白は白のまま
        assert_eq!(*canvas.get_pixel(199, 59), WHITE);
    }

    #[test]
    fn test_oversized_canvas_is_error() {
        assert!(matches!(Overlay::new(70_000, 10), Err(StudioError::Render(_))));
    }
}
