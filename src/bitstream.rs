//! # 比特流模块
//!
//! 文件字节按 MSB 在前的顺序展开为比特，解码后再按同样的顺序打包回字节。

use crate::config::Delimiter;
use crate::constants::BITS_PER_BYTE;

/// 将一个字节按 MSB 在前展开为 8 个比特。
pub fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1 == 1)
}

/// 有序的比特序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * BITS_PER_BYTE);
        bits.extend(bytes.iter().copied().flat_map(byte_bits));
        Self { bits }
    }

    /// 编码用的比特流：`bits(bytes) ++ delimiter`。
    pub fn with_delimiter(bytes: &[u8], delimiter: &Delimiter) -> Self {
        let mut stream = Self::from_bytes(bytes);
        stream.bits.extend_from_slice(delimiter.bits());
        stream
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// 按 MSB 在前将每 8 个比特打包成一个字节。
    ///
    /// 末尾不足 8 位的比特被丢弃 (而不是补零)，丢弃的数量记录在
    /// `PackedBytes::dropped_bits` 中，由调用方决定如何报告。
    pub fn pack(&self) -> PackedBytes {
        let chunks = self.bits.chunks_exact(BITS_PER_BYTE);
        let dropped_bits = chunks.remainder().len();
        let bytes = chunks
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
            .collect();

        PackedBytes {
            bytes,
            dropped_bits,
        }
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// 打包结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBytes {
    pub bytes: Vec<u8>,
    /// 因长度不是 8 的倍数而被丢弃的尾部比特数。
    pub dropped_bits: usize,
}

impl PackedBytes {
    pub fn is_aligned(&self) -> bool {
        self.dropped_bits == 0
    }
}
