//! # 帧编码模块
//!
//! 将比特流按帧容量切块，每块按行优先顺序绘制成一帧黑白图像。

use crate::bitstream::BitStream;
use crate::classifier::{BLACK, paint};
use crate::config::{CodecConfig, Resolution};
use image::RgbImage;

/// 将比特流转换为帧序列。
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    resolution: Resolution,
}

impl FrameEncoder {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            resolution: config.resolution,
        }
    }

    /// 容纳 `bits` 个比特所需的帧数。
    pub fn frame_count(&self, bits: usize) -> usize {
        bits.div_ceil(self.resolution.capacity())
    }

    /// 按顺序逐帧生成图像。
    ///
    /// 帧是惰性生成的，调用方可以每生成一帧就写盘，避免同时持有全部帧。
    pub fn frames<'a>(&'a self, stream: &'a BitStream) -> impl Iterator<Item = RgbImage> + 'a {
        stream
            .as_slice()
            .chunks(self.resolution.capacity())
            .map(|chunk| self.render(chunk))
    }

    /// 一次性生成全部帧。
    pub fn encode(&self, stream: &BitStream) -> Vec<RgbImage> {
        self.frames(stream).collect()
    }

    fn render(&self, chunk: &[bool]) -> RgbImage {
        // 最后一块不足一帧时，剩余像素保持黑色 (即补零)
        let mut frame = RgbImage::from_pixel(self.resolution.width, self.resolution.height, BLACK);

        frame
            .pixels_mut()
            .zip(chunk)
            .for_each(|(pixel, &bit)| *pixel = paint(bit));

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::WHITE;
    use crate::config::Delimiter;

    fn config(width: u32, height: u32) -> CodecConfig {
        CodecConfig::default().with_resolution(Resolution::new(width, height).unwrap())
    }

    #[test]
    fn single_zero_byte_fits_in_one_default_frame() {
        let config = CodecConfig::default();
        let encoder = FrameEncoder::new(&config);
        let stream = BitStream::with_delimiter(&[0x00], &config.delimiter);

        assert_eq!(stream.len(), 208);
        let frames = encoder.encode(&stream);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].dimensions(), (1920, 1080));
    }

    #[test]
    fn empty_payload_still_produces_one_frame() {
        let config = config(16, 16);
        let stream = BitStream::with_delimiter(&[], &config.delimiter);
        assert_eq!(FrameEncoder::new(&config).encode(&stream).len(), 1);
    }

    #[test]
    fn pixels_follow_row_major_order() {
        let config = config(4, 2).with_delimiter(Delimiter::from_marker("\u{1}").unwrap());
        // 0x81 = 1000_0001 后接 0000_0001
        let stream = BitStream::with_delimiter(&[0x81], &config.delimiter);
        let frames = FrameEncoder::new(&config).encode(&stream);

        assert_eq!(frames.len(), 2);
        assert_eq!(*frames[0].get_pixel(0, 0), WHITE);
        assert_eq!(*frames[0].get_pixel(1, 0), BLACK);
        assert_eq!(*frames[0].get_pixel(3, 1), WHITE);
        assert_eq!(*frames[1].get_pixel(3, 1), WHITE);
        assert_eq!(*frames[1].get_pixel(2, 1), BLACK);
    }

    #[test]
    fn last_frame_is_padded_with_black() {
        let config = config(8, 8);
        let stream: BitStream = std::iter::repeat_n(true, 70).collect();
        let frames = FrameEncoder::new(&config).encode(&stream);

        assert_eq!(frames.len(), 2);
        assert!(frames[0].pixels().all(|p| *p == WHITE));
        let last: Vec<_> = frames[1].pixels().collect();
        assert!(last[..6].iter().all(|p| **p == WHITE));
        assert!(last[6..].iter().all(|p| **p == BLACK));
    }

    #[test]
    fn exact_fill_has_no_trailing_frame() {
        // 23 字节 + 200 位标记 = 384 bits = 3 帧 x 128 bits
        let config = config(16, 8);
        let encoder = FrameEncoder::new(&config);
        let stream = BitStream::with_delimiter(&[0x5A; 23], &config.delimiter);

        assert_eq!(stream.len(), 384);
        assert_eq!(encoder.frame_count(stream.len()), 3);
        assert_eq!(encoder.encode(&stream).len(), 3);
    }
}
