//! ミックスメディア（グラデーション＋コラージュ散らし＋注釈）

use super::{first_words, placeholder, Layout, RenderContext};
use crate::composition::{Anchor, Composition, Element, Fill, FontFamily, Page, PhotoFrame, Rect, TextBlock};
use crate::palette::Palette;
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 1000.0;
const HERO: Rect = Rect::new(300.0, 200.0, 400.0, 500.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixedMediaLayout {
    pub default_palette: &'static [&'static str],
    pub satellite_w: f32,
    pub satellite_h: f32,
}

impl Default for MixedMediaLayout {
    fn default() -> Self {
        Self {
            default_palette: &["#FFDEE9", "#B5FFFC", "#E0C3FC"],
            satellite_w: 250.0,
            satellite_h: 312.0,
        }
    }
}

impl Layout for MixedMediaLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition {
        let palette = Palette::new(&analysis.color_palette, self.default_palette);
        let background = Fill::gradient(135.0, palette.take(3).into_iter().map(String::from).collect());
        let mut page = Page::new(WIDTH, HEIGHT, background);

        page.push(Element::Text(
            TextBlock::new(analysis.dominant_emotion.to_uppercase(), 60.0, 140.0, 96.0, "#FFFFFF")
                .font(FontFamily::Impact)
                .faded(0.9),
        ));
        if let Some(tag) = analysis.emotions.first() {
            page.push(Element::Chip {
                x: 64.0,
                y: 170.0,
                label: format!("#{}", tag),
                color: "#FFFFFF".into(),
                fill: Some("#000000".into()),
                border: "#000000".into(),
            });
        }

        match photos.first() {
            Some(src) => page.push(Element::Photo(PhotoFrame::new(0, src, HERO).matted(8.0, 8.0).rotated(-2.0))),
            None => page.push(placeholder(HERO)),
        }

        for (i, src) in photos.iter().enumerate().skip(1) {
            let x = ctx.jitter.range(0.0, WIDTH - self.satellite_w);
            let y = ctx.jitter.range(0.0, HEIGHT - self.satellite_h);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let rotation = sign * ctx.jitter.range(5.0, 20.0);
            let rect = Rect::new(x, y, self.satellite_w, self.satellite_h);
            page.push(Element::Photo(PhotoFrame::new(i, src, rect).rotated(rotation).gray().faded(0.9)));

            if i == 1 {
                page.push(Element::Text(
                    TextBlock::new(
                        format!("{}...", first_words(&analysis.vibe_description, 1)),
                        x + self.satellite_w / 2.0,
                        y + self.satellite_h + 28.0,
                        24.0,
                        "#222222",
                    )
                    .font(FontFamily::Hand)
                    .anchor(Anchor::Middle)
                    .rotated(rotation / 2.0),
                ));
            }
        }

        page.push(Element::Text(
            TextBlock::new(ctx.year.to_string(), WIDTH - 40.0, HEIGHT - 40.0, 120.0, "#FFFFFF")
                .font(FontFamily::Impact)
                .anchor(Anchor::End)
                .faded(0.2),
        ));

        Composition::single(LayoutStyle::MixedMedia, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Jitter;

    fn ctx() -> RenderContext {
        RenderContext { jitter: Jitter::new(8), year: 2031 }
    }

    #[test]
    fn test_year_watermark_from_context() {
        let composition = MixedMediaLayout::default().render(&[], &EmotionAnalysis::default(), &mut ctx());
        assert!(composition.texts().contains(&"2031"));
    }

    #[test]
    fn test_tag_chip_only_when_emotions_present() {
        let empty = EmotionAnalysis { emotions: vec![], ..Default::default() };
        let composition = MixedMediaLayout::default().render(&[], &empty, &mut ctx());
        assert!(!composition.texts().iter().any(|t| t.starts_with('#')));

        let tagged = EmotionAnalysis { emotions: vec!["nostalgia".into()], ..Default::default() };
        let composition = MixedMediaLayout::default().render(&[], &tagged, &mut ctx());
        assert!(composition.texts().contains(&"#nostalgia"));
    }

    #[test]
    fn test_gradient_wraps_short_palette() {
        let analysis = EmotionAnalysis { color_palette: vec!["#123456".into()], ..Default::default() };
        let composition = MixedMediaLayout::default().render(&[], &analysis, &mut ctx());
        assert_eq!(
            composition.pages[0].background,
            Fill::gradient(135.0, vec!["#123456".into(), "#123456".into(), "#123456".into()])
        );
    }

    #[test]
    fn test_satellites_are_tilted_and_gray() {
        let photos: Vec<String> = (0..5).map(|i| format!("{}.jpg", i)).collect();
        let analysis = EmotionAnalysis { vibe_description: "Dreamy afternoon light".into(), ..Default::default() };
        let composition = MixedMediaLayout::default().render(&photos, &analysis, &mut ctx());
        for frame in composition.photos().into_iter().filter(|f| f.slot > 0) {
            assert!(frame.grayscale);
            assert!((5.0..=20.0).contains(&frame.rotation.abs()));
        }
        assert!(composition.texts().contains(&"Dreamy..."));
    }
}
