//! コンポジションのSVG出力
//!
//! 複数ページは縦に並べ、ページ間に `PAGE_GAP` の余白を入れる。

use std::fmt::Write;

use crate::composition::{Anchor, Composition, Element, Fill, FontFamily, Page, PhotoFrame, Rect, Sticker, StickerKind, TextBlock};

pub const PAGE_GAP: f32 = 40.0;

const SPARKLE_PATH: &str = "M12 2l2.4 7.6L22 12l-7.6 2.4L12 22l-2.4-7.6L2 12l7.6-2.4z";
const STAR_PATH: &str = "M50 5 L63 35 L95 35 L68 55 L78 85 L50 65 L22 85 L32 55 L5 35 L37 35 Z";
const HEART_PATH: &str = "M50 30 C 20 0, 0 40, 50 90 C 100 40, 80 0, 50 30";
const SQUIGGLE_PATH: &str = "M5 10 Q 25 0, 45 10 T 85 10 T 125 10 T 165 10";

/// XML特殊文字のエスケープ
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

struct SvgWriter {
    defs: String,
    body: String,
    next_id: usize,
}

impl SvgWriter {
    fn new() -> Self {
        Self { defs: String::new(), body: String::new(), next_id: 0 }
    }

    /// 塗りを `fill` 属性値に変換（グラデーションはdefsに登録）
    fn paint(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid { color } => escape_xml(color),
            Fill::LinearGradient { angle, stops } => {
                self.next_id += 1;
                let id = format!("grad{}", self.next_id);
                let (x1, y1, x2, y2) = gradient_vector(*angle);
                let _ = write!(
                    self.defs,
                    r#"<linearGradient id="{id}" x1="{x1:.3}" y1="{y1:.3}" x2="{x2:.3}" y2="{y2:.3}">"#
                );
                let last = stops.len().saturating_sub(1).max(1) as f32;
                for (i, color) in stops.iter().enumerate() {
                    let _ = write!(
                        self.defs,
                        r#"<stop offset="{:.3}" stop-color="{}"/>"#,
                        i as f32 / last,
                        escape_xml(color)
                    );
                }
                self.defs.push_str("</linearGradient>");
                format!("url(#{id})")
            }
        }
    }

    fn page(&mut self, page: &Page, offset_y: f32) {
        let _ = write!(self.body, r#"<g transform="translate(0,{offset_y})">"#);
        let background = self.paint(&page.background);
        let _ = write!(
            self.body,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{background}"/>"#,
            page.width, page.height
        );
        for element in &page.elements {
            self.element(element);
        }
        self.body.push_str("</g>");
    }

    fn element(&mut self, element: &Element) {
        match element {
            Element::Photo(frame) => self.photo(frame),
            Element::Placeholder { rect, label } => {
                let (cx, cy) = rect.center();
                let _ = write!(
                    self.body,
                    r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#E5E7EB"/><text x="{cx}" y="{cy}" font-family="sans-serif" font-size="{:.1}" fill="#9CA3AF" text-anchor="middle" dominant-baseline="middle">{}</text>"##,
                    rect.x, rect.y, rect.w, rect.h,
                    (rect.w.min(rect.h) / 10.0).max(10.0),
                    escape_xml(label)
                );
            }
            Element::Text(text) => self.text(text),
            Element::Sticker(sticker) => self.sticker(sticker),
            Element::Swatch { cx, cy, r, color } => {
                let _ = write!(
                    self.body,
                    r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}" stroke="#0000000D"/>"##,
                    escape_xml(color)
                );
            }
            Element::Tape { rect, rotation, color } => {
                let (cx, cy) = rect.center();
                let _ = write!(
                    self.body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" transform="rotate({rotation} {cx} {cy})"/>"#,
                    rect.x, rect.y, rect.w, rect.h, escape_xml(color)
                );
            }
            Element::Shape { rect, fill, opacity } => {
                let paint = self.paint(fill);
                let _ = write!(
                    self.body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{paint}" opacity="{opacity}"/>"#,
                    rect.x, rect.y, rect.w, rect.h
                );
            }
            Element::Chip { x, y, label, color, fill, border } => {
                let label = escape_xml(label);
                let width = 16.0 + label.chars().count() as f32 * 7.5;
                let fill = fill.as_deref().map(escape_xml).unwrap_or_else(|| "none".to_string());
                let _ = write!(
                    self.body,
                    r#"<g transform="translate({x},{y})"><rect x="0" y="0" width="{width}" height="24" rx="12" fill="{fill}" stroke="{}"/><text x="{:.1}" y="16" font-family="sans-serif" font-size="12" fill="{}" text-anchor="middle">{label}</text></g>"#,
                    escape_xml(border),
                    width / 2.0,
                    escape_xml(color)
                );
            }
            Element::Grain { rect, opacity } => {
                self.next_id += 1;
                let id = format!("grain{}", self.next_id);
                let _ = write!(
                    self.defs,
                    r#"<filter id="{id}"><feTurbulence type="fractalNoise" baseFrequency="0.65" numOctaves="3" stitchTiles="stitch"/></filter>"#
                );
                let _ = write!(
                    self.body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" filter="url(#{id})" opacity="{opacity}"/>"#,
                    rect.x, rect.y, rect.w, rect.h
                );
            }
        }
    }

    fn photo(&mut self, frame: &PhotoFrame) {
        let Rect { x, y, w, h } = frame.rect;
        let (cx, cy) = frame.rect.center();
        let (dx, dy) = frame.offset;
        let _ = write!(
            self.body,
            r#"<g transform="translate({dx},{dy}) rotate({} {cx} {cy}) translate({cx},{cy}) scale({}) translate({},{})" opacity="{}">"#,
            frame.rotation, frame.scale, -cx, -cy, frame.opacity
        );
        if frame.mat > 0.0 || frame.mat_bottom > 0.0 {
            let _ = write!(
                self.body,
                r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#FFFFFF"/>"##,
                x - frame.mat,
                y - frame.mat,
                w + frame.mat * 2.0,
                h + frame.mat + frame.mat_bottom.max(frame.mat)
            );
        }
        let filter = if frame.grayscale {
            if !self.defs.contains(r#"id="grayscale""#) {
                self.defs.push_str(
                    r#"<filter id="grayscale"><feColorMatrix type="saturate" values="0"/></filter>"#,
                );
            }
            r#" filter="url(#grayscale)""#
        } else {
            ""
        };
        let _ = write!(
            self.body,
            r#"<image href="{}" x="{x}" y="{y}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice"{filter}/></g>"#,
            escape_xml(&frame.src)
        );
    }

    fn text(&mut self, text: &TextBlock) {
        let family = match text.font {
            FontFamily::Serif => "Georgia, serif",
            FontFamily::Sans => "Helvetica, Arial, sans-serif",
            FontFamily::Mono => "monospace",
            FontFamily::Hand => "'Indie Flower', cursive",
            FontFamily::Impact => "Impact, sans-serif",
        };
        let anchor = match text.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let style = if text.italic { r#" font-style="italic""# } else { "" };
        let weight = if text.bold { r#" font-weight="bold""# } else { "" };
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{family}" font-size="{}" fill="{}" text-anchor="{anchor}" opacity="{}" transform="rotate({} {} {})"{style}{weight}>{}</text>"#,
            text.x, text.y, text.size,
            escape_xml(&text.color),
            text.opacity,
            text.rotation, text.x, text.y,
            escape_xml(&text.content)
        );
    }

    fn sticker(&mut self, sticker: &Sticker) {
        let (path, view, fill, stroke_width) = match sticker.kind {
            StickerKind::Sparkle => (SPARKLE_PATH, 24.0, true, 0.0),
            StickerKind::Star => (STAR_PATH, 100.0, false, 3.0),
            StickerKind::Heart => (HEART_PATH, 100.0, false, 4.0),
            StickerKind::Squiggle => (SQUIGGLE_PATH, 200.0, false, 4.0),
        };
        let color = escape_xml(&sticker.color);
        let paint = if fill {
            format!(r#"fill="{color}""#)
        } else {
            format!(r#"fill="none" stroke="{color}" stroke-width="{stroke_width}" stroke-linecap="round" stroke-linejoin="round""#)
        };
        let _ = write!(
            self.body,
            r#"<g transform="translate({},{}) rotate({}) scale({:.4})" opacity="{}"><path d="{path}" {paint}/></g>"#,
            sticker.x, sticker.y, sticker.rotation, sticker.size / view, sticker.opacity
        );
    }
}

/// CSS角度（0 = 上→下）をSVGのobjectBoundingBox座標へ変換
fn gradient_vector(angle: f32) -> (f32, f32, f32, f32) {
    // CSS: 0deg は下から上、180deg は上から下。ここでは 0 = 上→下 とする
    let rad = angle.to_radians();
    let (dx, dy) = (rad.sin() * 0.5, rad.cos() * 0.5);
    (0.5 - dx, 0.5 - dy, 0.5 + dx, 0.5 + dy)
}

impl Composition {
    /// SVG文字列に変換
    pub fn to_svg(&self) -> String {
        let width = self.pages.iter().map(|p| p.width).fold(0.0_f32, f32::max);
        let height = self.pages.iter().map(|p| p.height).sum::<f32>()
            + PAGE_GAP * self.pages.len().saturating_sub(1) as f32;

        let mut writer = SvgWriter::new();
        let mut offset_y = 0.0;
        for page in &self.pages {
            writer.page(page, offset_y);
            offset_y += page.height + PAGE_GAP;
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" data-style="{}"><defs>{}</defs>{}</svg>"#,
            self.style.key(),
            writer.defs,
            writer.body
        )
    }
}
