//! レイアウト戦略
//!
//! 全戦略が同じ入力（写真列＋確定済み感情解析）を受け取り、
//! `Composition` を返す。スタイルキー → 戦略の対応は `Strategy::for_style`。
//!
//! 各戦略は必要な枚数だけ写真を使い、足りない枠は省略するか
//! "No Image" のプレースホルダーにする（範囲外アクセスはしない）。

mod bridal_strip;
mod cinematic;
mod doodle;
mod editorial;
mod mixed_media;
mod pinterest;
mod scrapbook;

pub use bridal_strip::BridalStripLayout;
pub use cinematic::CinematicLayout;
pub use doodle::DoodleLayout;
pub use editorial::{FlipBookLayout, MagazineCoverLayout, MagazineSpreadLayout, VogueLayout};
pub use mixed_media::MixedMediaLayout;
pub use pinterest::PinterestLayout;
pub use scrapbook::{ScatterPosition, ScrapbookLayout, SCATTERED_POSITIONS};

use crate::composition::{Composition, Element, Jitter, Rect};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

/// 写真が無い枠のラベル
pub const NO_IMAGE: &str = "No Image";

/// 描画コンテキスト
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub jitter: Jitter,
    /// 透かしに使う年
    pub year: i32,
}

/// レイアウト戦略
pub trait Layout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition;
}

/// 閉じた戦略集合（各戦略は自身の不変設定を持つ）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Pinterest(PinterestLayout),
    Magazine(MagazineCoverLayout),
    MagazineSpread(MagazineSpreadLayout),
    Cinematic(CinematicLayout),
    Scrapbook(ScrapbookLayout),
    Doodle(DoodleLayout),
    Vogue(VogueLayout),
    FlipBook(FlipBookLayout),
    MixedMedia(MixedMediaLayout),
    BridalStrip(BridalStripLayout),
}

impl Strategy {
    pub fn for_style(style: LayoutStyle) -> Self {
        match style {
            LayoutStyle::Pinterest => Strategy::Pinterest(PinterestLayout::default()),
            LayoutStyle::Magazine => Strategy::Magazine(MagazineCoverLayout),
            LayoutStyle::MagazineSpread => Strategy::MagazineSpread(MagazineSpreadLayout),
            LayoutStyle::Cinematic => Strategy::Cinematic(CinematicLayout::default()),
            LayoutStyle::Scrapbook => Strategy::Scrapbook(ScrapbookLayout::default()),
            LayoutStyle::Doodle => Strategy::Doodle(DoodleLayout::default()),
            LayoutStyle::Vogue => Strategy::Vogue(VogueLayout),
            LayoutStyle::FlipBook => Strategy::FlipBook(FlipBookLayout),
            LayoutStyle::MixedMedia => Strategy::MixedMedia(MixedMediaLayout::default()),
            LayoutStyle::BridalStrip => Strategy::BridalStrip(BridalStripLayout::default()),
        }
    }

    /// スタイルキーから（未知キーは既定スタイル）
    pub fn for_key(key: &str) -> Self {
        Self::for_style(LayoutStyle::from_key_or_default(key))
    }

    pub fn style(&self) -> LayoutStyle {
        match self {
            Strategy::Pinterest(_) => LayoutStyle::Pinterest,
            Strategy::Magazine(_) => LayoutStyle::Magazine,
            Strategy::MagazineSpread(_) => LayoutStyle::MagazineSpread,
            Strategy::Cinematic(_) => LayoutStyle::Cinematic,
            Strategy::Scrapbook(_) => LayoutStyle::Scrapbook,
            Strategy::Doodle(_) => LayoutStyle::Doodle,
            Strategy::Vogue(_) => LayoutStyle::Vogue,
            Strategy::FlipBook(_) => LayoutStyle::FlipBook,
            Strategy::MixedMedia(_) => LayoutStyle::MixedMedia,
            Strategy::BridalStrip(_) => LayoutStyle::BridalStrip,
        }
    }
}

impl Layout for Strategy {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition {
        match self {
            Strategy::Pinterest(l) => l.render(photos, analysis, ctx),
            Strategy::Magazine(l) => l.render(photos, analysis, ctx),
            Strategy::MagazineSpread(l) => l.render(photos, analysis, ctx),
            Strategy::Cinematic(l) => l.render(photos, analysis, ctx),
            Strategy::Scrapbook(l) => l.render(photos, analysis, ctx),
            Strategy::Doodle(l) => l.render(photos, analysis, ctx),
            Strategy::Vogue(l) => l.render(photos, analysis, ctx),
            Strategy::FlipBook(l) => l.render(photos, analysis, ctx),
            Strategy::MixedMedia(l) => l.render(photos, analysis, ctx),
            Strategy::BridalStrip(l) => l.render(photos, analysis, ctx),
        }
    }
}

/// マウント済みレイアウト
///
/// 揺らぎのシードはマウント時に一度だけ決め、以後の `render` は
/// 同じ入力に対して同じコンポジションを返す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMount {
    pub strategy: Strategy,
    pub seed: u64,
    pub year: i32,
}

impl LayoutMount {
    pub fn new(style: LayoutStyle, seed: u64, year: i32) -> Self {
        Self { strategy: Strategy::for_style(style), seed, year }
    }

    pub fn style(&self) -> LayoutStyle {
        self.strategy.style()
    }

    pub fn render(&self, photos: &[String], analysis: &EmotionAnalysis) -> Composition {
        let mut ctx = RenderContext { jitter: Jitter::new(self.seed), year: self.year };
        self.strategy.render(photos, analysis, &mut ctx)
    }
}

/// 写真 or プレースホルダー
pub(crate) fn photo_or_placeholder(
    photos: &[String],
    slot: usize,
    rect: Rect,
    build: impl FnOnce(crate::composition::PhotoFrame) -> crate::composition::PhotoFrame,
) -> Element {
    match photos.get(slot) {
        Some(src) => Element::Photo(build(crate::composition::PhotoFrame::new(slot, src, rect))),
        None => placeholder(rect),
    }
}

pub(crate) fn placeholder(rect: Rect) -> Element {
    Element::Placeholder { rect, label: NO_IMAGE.to_string() }
}

/// 先頭n語
pub(crate) fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Element;
    use crate::types::PartialEmotionAnalysis;

    fn photos(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("photo{}.jpg", i)).collect()
    }

    fn sparse_analysis() -> EmotionAnalysis {
        PartialEmotionAnalysis::default().resolve()
    }

    fn rich_analysis() -> EmotionAnalysis {
        PartialEmotionAnalysis {
            dominant_emotion: Some("Joy".into()),
            emotions: Some(vec!["joy".into(), "love".into(), "peace".into(), "energy".into()]),
            vibe_description: Some("Golden hour with friends".into()),
            color_palette: Some(vec!["#FF66A1".into()]),
            caption: Some("Summer days that never end".into()),
            ..Default::default()
        }
        .resolve()
    }

    #[test]
    fn test_every_style_resolves_to_its_strategy() {
        for style in LayoutStyle::ALL {
            assert_eq!(Strategy::for_style(style).style(), style);
            assert_eq!(Strategy::for_key(style.key()).style(), style);
        }
        assert_eq!(Strategy::for_key("no-such-style").style(), LayoutStyle::Magazine);
    }

    #[test]
    fn test_zero_photos_render_placeholder() {
        for style in LayoutStyle::ALL {
            let mount = LayoutMount::new(style, 1, 2025);
            let composition = mount.render(&[], &sparse_analysis());
            assert!(composition.photos().is_empty(), "{} placed a photo", style);
            assert!(composition.placeholder_count() >= 1, "{} has no placeholder", style);
        }
    }

    #[test]
    fn test_photo_slots_never_exceed_input() {
        for style in LayoutStyle::ALL {
            for n in 0..=10 {
                let input = photos(n);
                let mount = LayoutMount::new(style, 9, 2025);
                for analysis in [sparse_analysis(), rich_analysis()] {
                    let composition = mount.render(&input, &analysis);
                    for frame in composition.photos() {
                        assert!(frame.slot < n, "{} used slot {} of {}", style, frame.slot, n);
                        assert_eq!(frame.src, input[frame.slot]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_photo_consumption_per_style() {
        let input = photos(10);
        let analysis = rich_analysis();
        let used = |style| {
            LayoutMount::new(style, 3, 2025)
                .render(&input, &analysis)
                .photos()
                .len()
        };
        assert_eq!(used(LayoutStyle::Pinterest), 3);
        assert_eq!(used(LayoutStyle::Magazine), 1);
        assert_eq!(used(LayoutStyle::Cinematic), 3);
        assert_eq!(used(LayoutStyle::Doodle), 6);
        assert_eq!(used(LayoutStyle::BridalStrip), 5);
        assert_eq!(used(LayoutStyle::Vogue), 2);
        assert_eq!(used(LayoutStyle::Scrapbook), 10);
        assert_eq!(used(LayoutStyle::MixedMedia), 10);
    }

    #[test]
    fn test_same_mount_renders_identically() {
        let input = photos(6);
        let analysis = rich_analysis();
        for style in LayoutStyle::ALL {
            let mount = LayoutMount::new(style, 1234, 2025);
            assert_eq!(mount.render(&input, &analysis), mount.render(&input, &analysis), "{}", style);
        }
    }

    #[test]
    fn test_different_seed_changes_jitter() {
        let input = photos(6);
        let analysis = rich_analysis();
        let a = LayoutMount::new(LayoutStyle::Doodle, 1, 2025).render(&input, &analysis);
        let b = LayoutMount::new(LayoutStyle::Doodle, 2, 2025).render(&input, &analysis);
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_color_palette_is_reused() {
        let analysis = rich_analysis();
        let composition = LayoutMount::new(LayoutStyle::Doodle, 5, 2025).render(&photos(3), &analysis);
        let sticker_colors: Vec<_> = composition
            .elements()
            .filter_map(|e| match e {
                Element::Sticker(s) => Some(s.color.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sticker_colors.len(), 12);
        assert!(sticker_colors.iter().all(|c| *c == "#FF66A1"));
    }

    #[test]
    fn test_every_style_produces_svg() {
        for style in LayoutStyle::ALL {
            let svg = LayoutMount::new(style, 11, 2025).render(&photos(4), &rich_analysis()).to_svg();
            assert!(svg.contains("<svg"), "{}", style);
        }
    }

    #[test]
    fn test_first_words() {
        assert_eq!(first_words("Summer days that never end", 3), "Summer days that");
        assert_eq!(first_words("", 3), "");
    }
}
