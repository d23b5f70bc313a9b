//! # 编解码配置模块
//!
//! 分辨率、结束标记和扫描模式被打包成一个不可变的 `CodecConfig`，
//! 由调用方显式传给编码器和解码器，而不是作为全局状态存在。

use crate::bitstream::byte_bits;
use crate::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DELIMITER_MARKER};
use crate::error::{CodecError, Result};
use std::fmt;

/// 帧分辨率。每个像素承载一个比特。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 创建分辨率，宽或高为零时返回 `CodecError::InvalidResolution`。
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidResolution { width, height });
        }
        Ok(Self { width, height })
    }

    /// 单帧可容纳的比特数 (`width * height`)。
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 结束标记：追加在载荷之后的固定比特串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    bits: Vec<bool>,
}

impl Delimiter {
    /// 将标记字符串的每个字节按 MSB 在前展开为比特。
    pub fn from_marker(marker: &str) -> Result<Self> {
        if marker.is_empty() {
            return Err(CodecError::EmptyDelimiter);
        }
        Ok(Self {
            bits: marker.bytes().flat_map(byte_bits).collect(),
        })
    }

    /// 默认的 25 字符标记，共 200 bits。
    pub fn standard() -> Self {
        Self {
            bits: DELIMITER_MARKER.bytes().flat_map(byte_bits).collect(),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::standard()
    }
}

/// 结束标记的扫描方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// 在整个帧序列上连续匹配，跨帧边界的标记也能识别。
    #[default]
    Continuous,
    /// 每一帧开始时清空匹配状态。跨帧的标记将无法识别，仅用于兼容旧视频。
    PerFrame,
}

/// 编码器与解码器共享的配置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecConfig {
    pub resolution: Resolution,
    pub delimiter: Delimiter,
    pub scan: ScanMode,
}

impl CodecConfig {
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_scan_mode(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }
}
