//! 写真フィルタ（色調補正・フレーム・回転）

use image::{imageops, DynamicImage, Rgb, RgbImage};

use super::templates::PhotoFilter;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn luma(p: &Rgb<u8>) -> f32 {
    0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// 彩度（1.0で元のまま、0.0でグレー）
pub fn enhance_color(img: &mut RgbImage, factor: f32) {
    for p in img.pixels_mut() {
        let gray = luma(p);
        for c in 0..3 {
            p[c] = clamp_u8(gray + (p[c] as f32 - gray) * factor);
        }
    }
}

/// コントラスト（画像全体の平均輝度を中心に伸縮）
pub fn enhance_contrast(img: &mut RgbImage, factor: f32) {
    let count = (img.width() as u64 * img.height() as u64).max(1);
    let mean = img.pixels().map(|p| luma(p) as u64).sum::<u64>() as f32 / count as f32;
    for p in img.pixels_mut() {
        for c in 0..3 {
            p[c] = clamp_u8(mean + (p[c] as f32 - mean) * factor);
        }
    }
}

pub fn enhance_brightness(img: &mut RgbImage, factor: f32) {
    for p in img.pixels_mut() {
        for c in 0..3 {
            p[c] = clamp_u8(p[c] as f32 * factor);
        }
    }
}

/// 色かぶり（チャンネルごとの加算）
fn tint(img: &mut RgbImage, shift: [f32; 3]) {
    for p in img.pixels_mut() {
        for c in 0..3 {
            p[c] = clamp_u8(p[c] as f32 + shift[c]);
        }
    }
}

fn sepia(img: &mut RgbImage) {
    for p in img.pixels_mut() {
        let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
        *p = Rgb([
            clamp_u8(0.393 * r + 0.769 * g + 0.189 * b),
            clamp_u8(0.349 * r + 0.686 * g + 0.168 * b),
            clamp_u8(0.272 * r + 0.534 * g + 0.131 * b),
        ]);
    }
}

fn grayscale(img: &mut RgbImage) {
    for p in img.pixels_mut() {
        let g = clamp_u8(luma(p));
        *p = Rgb([g, g, g]);
    }
}

/// 輝度の1%〜99%点を0〜255に引き伸ばす
fn stretch_levels(img: &mut RgbImage) {
    let mut histogram = [0u64; 256];
    for p in img.pixels() {
        histogram[clamp_u8(luma(p)) as usize] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return;
    }
    let cut = total / 100;

    let mut acc = 0;
    let mut low = 0.0;
    for (i, count) in histogram.iter().enumerate() {
        acc += count;
        if acc > cut {
            low = i as f32;
            break;
        }
    }
    acc = 0;
    let mut high = 255.0;
    for (i, count) in histogram.iter().enumerate().rev() {
        acc += count;
        if acc > cut {
            high = i as f32;
            break;
        }
    }
    if high - low < 1.0 {
        return;
    }
    let scale = 255.0 / (high - low);
    for p in img.pixels_mut() {
        for c in 0..3 {
            p[c] = clamp_u8((p[c] as f32 - low) * scale);
        }
    }
}

/// "luxury grade"：レベル補正＋軽いシャープ＋彩度1.05
pub fn luxury_grade(img: &DynamicImage) -> RgbImage {
    let mut rgb = img.to_rgb8();
    stretch_levels(&mut rgb);
    let mut rgb = imageops::unsharpen(&rgb, 1.0, 2);
    enhance_color(&mut rgb, 1.05);
    rgb
}

pub fn apply_filter(img: &mut RgbImage, filter: PhotoFilter) {
    match filter {
        PhotoFilter::None => {}
        PhotoFilter::Luxury => {
            enhance_contrast(img, 1.05);
            enhance_color(img, 1.1);
        }
        PhotoFilter::Vintage => {
            sepia(img);
            enhance_contrast(img, 0.9);
        }
        PhotoFilter::Bw => {
            grayscale(img);
            enhance_contrast(img, 1.2);
        }
        PhotoFilter::Vibrant => {
            enhance_color(img, 1.4);
            enhance_contrast(img, 1.1);
        }
        PhotoFilter::Soft => {
            *img = imageops::blur(&*img, 1.0);
            enhance_brightness(img, 1.1);
        }
        PhotoFilter::Warm => {
            enhance_color(img, 1.2);
            tint(img, [8.0, 3.0, -8.0]);
        }
        PhotoFilter::Cool => {
            enhance_color(img, 0.9);
            tint(img, [-6.0, 0.0, 8.0]);
        }
        PhotoFilter::Watercolor => {
            *img = imageops::blur(&*img, 1.5);
            enhance_color(img, 1.15);
            enhance_brightness(img, 1.05);
        }
    }
}

/// 縦横比を保って枠内に収める（拡大はしない）
pub fn fit_inside(img: &RgbImage, max_w: u32, max_h: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w <= max_w && h <= max_h {
        return img.clone();
    }
    let ratio = (max_w as f32 / w as f32).min(max_h as f32 / h as f32);
    let nw = ((w as f32 * ratio).round() as u32).max(1);
    let nh = ((h as f32 * ratio).round() as u32).max(1);
    imageops::resize(img, nw, nh, imageops::FilterType::Lanczos3)
}

fn pad(img: &RgbImage, left: u32, top: u32, right: u32, bottom: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let mut framed = RgbImage::from_pixel(w + left + right, h + top + bottom, WHITE);
    imageops::replace(&mut framed, img, left as i64, top as i64);
    framed
}

/// ポラロイド風（左右上5%、下15%）
pub fn polaroid_frame(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let side = w * 5 / 100;
    let bottom = h * 15 / 100;
    pad(img, side, side, side, bottom)
}

pub fn border_frame(img: &RgbImage, width: u32) -> RgbImage {
    pad(img, width, width, width, width)
}

/// 反時計回りに回転し、はみ出さないようキャンバスを広げる（余白は白）
pub fn rotate_expand(img: &RgbImage, degrees: f32) -> RgbImage {
    if degrees.rem_euclid(360.0) == 0.0 {
        return img.clone();
    }
    let (w, h) = (img.width() as f32, img.height() as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();
    // 90度などで浮動小数の誤差が1px増やさないよう少し削ってから切り上げる
    let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as u32;
    let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as u32;

    let (cx, cy) = (w / 2.0, h / 2.0);
    let (ocx, ocy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    RgbImage::from_fn(out_w, out_h, |x, y| {
        // 出力画素 → 元画像（逆回転）
        let dx = x as f32 + 0.5 - ocx;
        let dy = y as f32 + 0.5 - ocy;
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *img.get_pixel(sx as u32, sy as u32)
        } else {
            WHITE
        }
    })
}
