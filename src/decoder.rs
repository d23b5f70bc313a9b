//! # 帧解码模块
//!
//! 按帧序、行优先顺序读出每个像素的比特，追加到一个贯穿整个帧序列的累加器中，
//! 并在每追加一位后检查累加器末尾是否恰好等于结束标记。
//! 第一次匹配时剥离标记并停止扫描，剩余像素和后续帧全部忽略。

use crate::bitstream::BitStream;
use crate::classifier::classify_pixels;
use crate::config::{CodecConfig, Resolution, ScanMode};
use crate::error::{CodecError, Result};
use image::RgbImage;
use tracing::debug;

/// 增量式结束标记匹配器 (KMP)。
///
/// 每次 `push` 一位，当"到目前为止的比特串以标记结尾"时返回 `true`，
/// 与每步比较末尾 N 位等价，但每位只需均摊 O(1)。
#[derive(Debug, Clone)]
pub struct DelimiterScanner<'a> {
    pattern: &'a [bool],
    /// `failure[i]`: `pattern[..=i]` 的最长真前后缀长度
    failure: Vec<usize>,
    matched: usize,
}

impl<'a> DelimiterScanner<'a> {
    pub fn new(pattern: &'a [bool]) -> Self {
        let mut failure = vec![0; pattern.len()];
        let mut k = 0;
        for i in 1..pattern.len() {
            while k > 0 && pattern[i] != pattern[k] {
                k = failure[k - 1];
            }
            if pattern[i] == pattern[k] {
                k += 1;
            }
            failure[i] = k;
        }

        Self {
            pattern,
            failure,
            matched: 0,
        }
    }

    pub fn push(&mut self, bit: bool) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        while self.matched > 0 && self.pattern[self.matched] != bit {
            self.matched = self.failure[self.matched - 1];
        }
        if self.pattern[self.matched] == bit {
            self.matched += 1;
        }
        if self.matched == self.pattern.len() {
            self.matched = self.failure[self.matched - 1];
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.matched = 0;
    }
}

/// 解码结果：载荷比特以及是否遇到了结束标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub payload: BitStream,
    pub terminated: bool,
    /// 实际扫描过的帧数 (包括遇到标记的那一帧)。
    pub frames_scanned: usize,
}

/// 逐帧喂入的解码器。
///
/// 一个实例对应一次扫描：累加器和匹配状态在帧之间保留，不可跨视频复用。
#[derive(Debug)]
pub struct FrameDecoder<'a> {
    resolution: Resolution,
    scan: ScanMode,
    delimiter_len: usize,
    scanner: DelimiterScanner<'a>,
    accumulator: BitStream,
    frames_scanned: usize,
    terminated: bool,
}

impl<'a> FrameDecoder<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self {
            resolution: config.resolution,
            scan: config.scan,
            delimiter_len: config.delimiter.len(),
            scanner: DelimiterScanner::new(config.delimiter.bits()),
            accumulator: BitStream::new(),
            frames_scanned: 0,
            terminated: false,
        }
    }

    /// 喂入下一帧，返回是否已经遇到结束标记。
    ///
    /// 一旦返回 `true`，之后的调用不再读取任何像素。
    ///
    /// # Errors
    ///
    /// 帧尺寸与配置的分辨率不一致时返回 `CodecError::ResolutionMismatch`。
    pub fn feed(&mut self, frame: &RgbImage) -> Result<bool> {
        if self.terminated {
            return Ok(true);
        }

        let actual = Resolution {
            width: frame.width(),
            height: frame.height(),
        };
        if actual != self.resolution {
            return Err(CodecError::ResolutionMismatch {
                frame: self.frames_scanned,
                expected: self.resolution,
                actual,
            });
        }

        if self.scan == ScanMode::PerFrame {
            self.scanner.reset();
        }

        let bits = classify_pixels(frame.as_raw());
        for bit in bits {
            self.accumulator.push(bit);
            if self.scanner.push(bit) {
                let payload_len = self.accumulator.len() - self.delimiter_len;
                self.accumulator.truncate(payload_len);
                self.terminated = true;
                break;
            }
        }

        self.frames_scanned += 1;
        debug!(
            frame = self.frames_scanned - 1,
            bits = self.accumulator.len(),
            terminated = self.terminated,
            "scanned frame"
        );

        Ok(self.terminated)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn frames_scanned(&self) -> usize {
        self.frames_scanned
    }

    pub fn into_outcome(self) -> DecodeOutcome {
        DecodeOutcome {
            payload: self.accumulator,
            terminated: self.terminated,
            frames_scanned: self.frames_scanned,
        }
    }

    /// 结束扫描并取出载荷。
    ///
    /// # Errors
    ///
    /// 没有遇到结束标记时返回 `CodecError::DelimiterNotFound`。
    pub fn finish(self) -> Result<BitStream> {
        let outcome = self.into_outcome();
        if !outcome.terminated {
            return Err(CodecError::DelimiterNotFound {
                frames: outcome.frames_scanned,
                bits: outcome.payload.len(),
            });
        }
        Ok(outcome.payload)
    }
}

/// 对内存中的完整帧序列解码。
pub fn decode_frames<'f>(
    config: &CodecConfig,
    frames: impl IntoIterator<Item = &'f RgbImage>,
) -> Result<BitStream> {
    let mut decoder = FrameDecoder::new(config);
    for frame in frames {
        if decoder.feed(frame)? {
            break;
        }
    }
    decoder.finish()
}
