//! キャンバスへのピクセル単位の処理（グラデーション・貼り付け・合成・ノイズ）

use image::{imageops, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn vertical_gradient(width: u32, height: u32, top: Rgb<u8>, bottom: Rgb<u8>) -> RgbImage {
    let h = height.max(1) as f32;
    RgbImage::from_fn(width, height, |_, y| {
        let t = y as f32 / h;
        Rgb([0, 1, 2].map(|c| (top[c] as f32 + (bottom[c] as f32 - top[c] as f32) * t).round() as u8))
    })
}

/// 写真を貼る（はみ出しは切り捨て）
pub fn paste(canvas: &mut RgbImage, photo: &RgbImage, x: i64, y: i64) {
    imageops::replace(canvas, photo, x, y);
}

/// 乗算済みRGBA8のレイヤーをキャンバスに重ねる（source-over）
///
/// `premul_rgba` はキャンバスと同じ幅・高さの行優先データ。
pub fn composite_premul_over(canvas: &mut RgbImage, premul_rgba: &[u8]) {
    for (dst, src) in canvas.pixels_mut().zip(premul_rgba.chunks_exact(4)) {
        let a = src[3] as u32;
        if a == 0 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let value = src[c] as u32 + (dst[c] as u32 * inv + 127) / 255;
            dst[c] = value.min(255) as u8;
        }
    }
}

/// ノイズを重ねて紙っぽさを出す（0〜49のグレーノイズをalphaで混ぜる）
pub fn add_noise_texture(canvas: &mut RgbImage, alpha: f32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for p in canvas.pixels_mut() {
        let noise: f32 = rng.random_range(0..50u8) as f32;
        for c in 0..3 {
            p[c] = (p[c] as f32 * (1.0 - alpha) + noise * alpha).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_gradient_endpoints() {
        let g = vertical_gradient(2, 100, BLACK, WHITE);
        assert_eq!(*g.get_pixel(0, 0), BLACK);
        assert!(g.get_pixel(0, 99)[0] > 240);
    }

    #[test]
    fn test_noise_is_subtle_and_seeded() {
        let mut a = RgbImage::from_pixel(8, 8, WHITE);
        let mut b = a.clone();
        add_noise_texture(&mut a, 0.05, 7);
        add_noise_texture(&mut b, 0.05, 7);
        assert_eq!(a, b);
        assert!(a.pixels().all(|p| p[0] >= 240));
    }

    #[test]
    fn test_composite_premul_over() {
        let mut canvas = RgbImage::from_pixel(3, 1, WHITE);
        // 不透明の赤、透明、半透明の黒（乗算済みなので色は0）
        let layer = [255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128];
        composite_premul_over(&mut canvas, &layer);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(1, 0), WHITE);
        assert_eq!(*canvas.get_pixel(2, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn test_paste_clips_at_edges() {
        let mut canvas = RgbImage::from_pixel(10, 10, WHITE);
        let photo = RgbImage::from_pixel(8, 8, BLACK);
        paste(&mut canvas, &photo, -5, -5);
        assert_eq!(*canvas.get_pixel(2, 2), BLACK);
        assert_eq!(*canvas.get_pixel(3, 3), WHITE);
    }
}
