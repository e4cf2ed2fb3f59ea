//! カラーパレット
//!
//! AIのパレットは長さが不定（0件もある）ため、参照は必ず
//! `Palette::color` 経由で行い、インデックスは長さで剰余を取る。

/// パレットが空の場合に色付き要素へ使う色
pub const FALLBACK_INK: &str = "#000000";

/// レイアウト用パレット（空の場合はデフォルトパレットを使う）
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// AIパレットから生成。空または全て不正な場合は `defaults` を使う
    pub fn new(colors: &[String], defaults: &[&str]) -> Self {
        let valid: Vec<String> = colors
            .iter()
            .filter(|c| parse_hex(c).is_some())
            .cloned()
            .collect();

        let colors = if valid.is_empty() {
            defaults.iter().map(|c| c.to_string()).collect()
        } else {
            valid
        };

        Self { colors }
    }

    /// i番目の色（剰余で折り返す）
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return FALLBACK_INK;
        }
        &self.colors[index % self.colors.len()]
    }

    /// 先頭からn色（足りなければ折り返して再利用）
    pub fn take(&self, n: usize) -> Vec<&str> {
        (0..n).map(|i| self.color(i)).collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }
}

/// 元のパレットの長さで折り返して参照（空なら黒）
///
/// デフォルトパレットを持たない表示（感情チップ等）用。
pub fn wrap_color(colors: &[String], index: usize) -> &str {
    if colors.is_empty() {
        return FALLBACK_INK;
    }
    &colors[index % colors.len()]
}

/// 16進カラーをRGBに変換
///
/// `#RGB` / `#RRGGBB` / `#RRGGBBAA`（アルファは無視）を受け付ける。
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#').unwrap_or(color.trim());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(rgb)
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// 16進カラーに2桁のアルファを付与（"#FF66A1" + "30"）
///
/// 6桁に正規化できない色はそのまま返す。
pub fn with_alpha(color: &str, alpha_hex: &str) -> String {
    match parse_hex(color) {
        Some([r, g, b]) => format!("#{:02X}{:02X}{:02X}{}", r, g, b, alpha_hex),
        None => color.to_string(),
    }
}

/// RGBを16進カラーに変換
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
