//! # 像素分类模块
//!
//! 比特与像素颜色之间的映射：1 为纯白，0 为纯黑。
//! 读取时对非纯色像素按"离哪个参考色更近"判断，白色必须在每个通道上都严格更近才算 1。

use image::Rgb;
use rayon::prelude::*;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// 比特对应的像素颜色。
pub fn paint(bit: bool) -> Rgb<u8> {
    if bit { WHITE } else { BLACK }
}

/// 将像素颜色还原为比特。
///
/// 纯白返回 `true`，纯黑返回 `false`。其余颜色逐通道比较到白色和到黑色的距离，
/// 只有每个通道上到白色的距离都严格更小时才返回 `true`，任何平局或反例都归为黑色。
pub fn classify(pixel: &Rgb<u8>) -> bool {
    if *pixel == WHITE {
        return true;
    }
    if *pixel == BLACK {
        return false;
    }

    pixel
        .0
        .iter()
        .zip(WHITE.0.iter().zip(BLACK.0.iter()))
        .all(|(&channel, (&white, &black))| channel.abs_diff(white) < channel.abs_diff(black))
}

/// 对 RGB 原始缓冲区 (每像素 3 字节) 逐像素分类。
///
/// 并行计算，但输出顺序与像素在缓冲区中的顺序 (行优先) 完全一致。
pub fn classify_pixels(raw: &[u8]) -> Vec<bool> {
    raw.par_chunks_exact(3)
        .map(|channels| classify(&Rgb([channels[0], channels[1], channels[2]])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_colors() {
        assert!(classify(&WHITE));
        assert!(!classify(&BLACK));
        assert_eq!(paint(true), WHITE);
        assert_eq!(paint(false), BLACK);
    }

    #[test]
    fn white_must_win_every_channel() {
        assert!(classify(&Rgb([250, 240, 200])));
        assert!(classify(&Rgb([128, 128, 128])));
        // 127 到白色 128、到黑色 127，黑色更近
        assert!(!classify(&Rgb([127, 255, 255])));
        assert!(!classify(&Rgb([255, 255, 0])));
        assert!(!classify(&Rgb([200, 10, 200])));
    }

    #[test]
    fn classifier_is_total_over_every_color() {
        // 每个通道 |255 - c| < |c| 当且仅当 c >= 128
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    let expected = r >= 128 && g >= 128 && b >= 128;
                    assert_eq!(classify(&Rgb([r, g, b])), expected, "({r}, {g}, {b})");
                }
            }
        }
    }

    #[test]
    fn classify_pixels_keeps_order() {
        let raw = [
            255, 255, 255, // 1
            0, 0, 0, // 0
            0, 0, 0, // 0
            200, 200, 200, // 1
            100, 255, 255, // 0
        ];
        assert_eq!(classify_pixels(&raw), vec![true, false, false, true, false]);
    }
}
