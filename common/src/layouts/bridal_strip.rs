//! ブライダルストリップ（縦帯5本）

use super::{placeholder, Layout, RenderContext};
use crate::composition::{Composition, Element, Fill, Page, PhotoFrame, Rect};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridalStripLayout {
    pub width: f32,
    pub height: f32,
    pub max_strips: usize,
    pub separator: f32,
}

impl Default for BridalStripLayout {
    fn default() -> Self {
        Self { width: 1000.0, height: 700.0, max_strips: 5, separator: 2.0 }
    }
}

impl Layout for BridalStripLayout {
    fn render(&self, photos: &[String], _analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        let mut page = Page::new(self.width, self.height, Fill::solid("#000000"));
        let used = &photos[..photos.len().min(self.max_strips)];

        if used.is_empty() {
            page.push(placeholder(page.bounds()));
            return Composition::single(LayoutStyle::BridalStrip, page);
        }

        let strip_w = self.width / used.len() as f32;
        for (i, src) in used.iter().enumerate() {
            let rect = Rect::new(i as f32 * strip_w, 0.0, strip_w, self.height);
            page.push(Element::Photo(PhotoFrame::new(i, src, rect).gray().faded(0.8)));
        }

        page.push(Element::Shape {
            rect: page.bounds(),
            fill: Fill::gradient(0.0, vec!["#00000000".into(), "#00000000".into(), "#00000099".into()]),
            opacity: 1.0,
        });
        for i in 1..used.len() {
            page.push(Element::Shape {
                rect: Rect::new(i as f32 * strip_w - self.separator / 2.0, 0.0, self.separator, self.height),
                fill: Fill::solid("#000000"),
                opacity: 1.0,
            });
        }

        Composition::single(LayoutStyle::BridalStrip, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Jitter;

    fn render(n: usize) -> Composition {
        let photos: Vec<String> = (0..n).map(|i| format!("{}.jpg", i)).collect();
        let mut ctx = RenderContext { jitter: Jitter::new(0), year: 2025 };
        BridalStripLayout::default().render(&photos, &EmotionAnalysis::default(), &mut ctx)
    }

    #[test]
    fn test_strips_share_width_equally() {
        let composition = render(4);
        let frames = composition.photos();
        assert_eq!(frames.len(), 4);
        for frame in &frames {
            assert_eq!(frame.rect.w, 250.0);
            assert!(frame.grayscale);
        }
    }

    #[test]
    fn test_separators_between_strips() {
        let composition = render(5);
        let separators = composition
            .elements()
            .filter(|e| matches!(e, Element::Shape { fill: Fill::Solid { .. }, .. }))
            .count();
        assert_eq!(separators, 4);
    }
}
