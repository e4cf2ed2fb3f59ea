//! 誌面系レイアウト（表紙・見開き・Vogue・フリップブック）

use super::{first_words, photo_or_placeholder, Layout, RenderContext};
use crate::composition::{Anchor, Composition, Element, Fill, FontFamily, Page, PhotoFrame, Rect, TextBlock};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

const PAGE_W: f32 = 900.0;
const PAGE_H: f32 = 1200.0;

const VOGUE_W: f32 = 750.0;
const VOGUE_H: f32 = 1000.0;

// =============================================
// 表紙
// =============================================

/// 雑誌表紙（写真1枚＋主感情の見出し）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagazineCoverLayout;

fn cover_page(photos: &[String], analysis: &EmotionAnalysis) -> Page {
    let mut page = Page::new(PAGE_W, PAGE_H, Fill::solid("#000000"));
    let bounds = page.bounds();

    page.push(photo_or_placeholder(photos, 0, bounds, |frame| frame));
    // 下側を暗くして見出しを読みやすくする
    page.push(Element::Shape {
        rect: bounds,
        fill: Fill::gradient(0.0, vec!["#00000033".into(), "#00000000".into(), "#00000099".into()]),
        opacity: 1.0,
    });
    page.push(Element::Text(
        TextBlock::new(analysis.dominant_emotion.to_uppercase(), 60.0, PAGE_H - 80.0, 72.0, "#FFFFFF")
            .font(FontFamily::Serif)
            .italic()
            .faded(0.8),
    ));
    page.push(Element::Grain { rect: bounds, opacity: 0.03 });
    page
}

impl Layout for MagazineCoverLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        Composition::single(LayoutStyle::Magazine, cover_page(photos, analysis))
    }
}

// =============================================
// 見開き
// =============================================

/// 表紙＋本文ページ（＋4枚以上なら全面写真ページ）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagazineSpreadLayout;

impl Layout for MagazineSpreadLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        let mut pages = vec![cover_page(photos, analysis)];

        let mut editorial = Page::new(PAGE_W, PAGE_H, Fill::solid("#FFFFFF"));
        editorial.push(Element::Shape {
            rect: Rect::new(80.0, PAGE_H / 2.0 - 4.0, 96.0, 8.0),
            fill: Fill::solid("#000000"),
            opacity: 1.0,
        });
        for (i, src) in photos.iter().enumerate().skip(1).take(2) {
            let rect = Rect::new(470.0, 160.0 + (i - 1) as f32 * 440.0, 350.0, 320.0);
            editorial.push(Element::Photo(PhotoFrame::new(i, src, rect).gray()));
        }
        pages.push(editorial);

        if let Some(src) = photos.get(3) {
            let mut bleed = Page::new(PAGE_W, PAGE_H, Fill::solid("#000000"));
            let bounds = bleed.bounds();
            bleed.push(Element::Photo(PhotoFrame::new(3, src, bounds).faded(0.8)));
            pages.push(bleed);
        }

        Composition { style: LayoutStyle::MagazineSpread, pages }
    }
}

// =============================================
// Vogue
// =============================================

/// 表紙写真＋2枚目の差し込み
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VogueLayout;

fn vogue_page(photos: &[String]) -> Page {
    let mut page = Page::new(VOGUE_W, VOGUE_H, Fill::solid("#FFFFFF"));
    let bounds = page.bounds();
    page.push(photo_or_placeholder(photos, 0, bounds, |frame| frame));

    if let Some(src) = photos.get(1) {
        let inset = Rect::new(VOGUE_W - 144.0 + 15.0, VOGUE_H * 0.3, 144.0, 192.0);
        page.push(Element::Photo(PhotoFrame::new(1, src, inset).matted(6.0, 6.0).rotated(6.0)));
    }
    page
}

impl Layout for VogueLayout {
    fn render(&self, photos: &[String], _analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        Composition::single(LayoutStyle::Vogue, vogue_page(photos))
    }
}

// =============================================
// フリップブック
// =============================================

/// Vogue表紙＋内側の左右ページ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipBookLayout;

impl Layout for FlipBookLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        let cover = vogue_page(photos);

        // 表紙の裏（左ページ）
        let mut left = Page::new(VOGUE_W, VOGUE_H, Fill::solid("#FFFFFF"));
        let cx = VOGUE_W / 2.0;
        left.push(Element::Text(
            TextBlock::new("\"Everything is aesthetic.\"", cx, 300.0, 32.0, "#1F2937")
                .font(FontFamily::Serif)
                .italic()
                .anchor(Anchor::Middle),
        ));
        left.push(Element::Shape {
            rect: Rect::new(cx - 32.0, 330.0, 64.0, 1.5),
            fill: Fill::solid("#000000"),
            opacity: 1.0,
        });
        left.push(Element::Text(
            TextBlock::new(analysis.vibe_description.clone(), cx, 370.0, 14.0, "#6B7280")
                .font(FontFamily::Mono)
                .anchor(Anchor::Middle),
        ));
        if let Some(src) = photos.get(2) {
            let rect = Rect::new(cx - 96.0, 440.0, 192.0, 192.0);
            left.push(Element::Photo(PhotoFrame::new(2, src, rect).matted(8.0, 8.0).rotated(2.0).gray()));
        }

        // 右ページ
        let mut right = Page::new(VOGUE_W, VOGUE_H, Fill::solid("#FFFFFF"));
        let hero = Rect::new(0.0, 0.0, VOGUE_W, VOGUE_H * 0.6);
        right.push(photo_or_placeholder(photos, 1, hero, |frame| frame));
        right.push(Element::Text(
            TextBlock::new("02", 40.0, hero.h + 24.0, 56.0, "#000000").bold(),
        ));
        right.push(Element::Text(
            TextBlock::new(first_words(&analysis.caption, 3), 40.0, VOGUE_H - 110.0, 44.0, "#000000")
                .font(FontFamily::Serif),
        ));
        let mut x = 40.0;
        for tag in analysis.emotions.iter().take(3) {
            let label = tag.to_uppercase();
            right.push(Element::Chip {
                x,
                y: VOGUE_H - 80.0,
                label: label.clone(),
                color: "#000000".into(),
                fill: None,
                border: "#000000".into(),
            });
            x += 24.0 + label.chars().count() as f32 * 7.5;
        }

        Composition { style: LayoutStyle::FlipBook, pages: vec![cover, left, right] }
    }
}
