//! # 错误类型模块
//!
//! 编解码流程中所有可预期的失败都以 `CodecError` 表示，而不是 panic。
//! 命令处理层 (`handler`) 再用 `anyhow` 为其附加上下文信息。

use crate::config::Resolution;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 编解码过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum CodecError {
    /// 输入文件不存在。
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// 读写文件或目录失败。
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 帧图像无法编码或解码。
    #[error("image failure on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 扫描完所有帧都没有遇到结束标记。
    /// 通常意味着视频被截断、损坏，或者不是由本工具生成的。
    #[error("delimiter not found after scanning {frames} frame(s) ({bits} bits)")]
    DelimiterNotFound { frames: usize, bits: usize },

    /// 拆出的帧尺寸与编码时使用的分辨率不一致。
    #[error("frame {frame} is {actual}, expected {expected}")]
    ResolutionMismatch {
        frame: usize,
        expected: Resolution,
        actual: Resolution,
    },

    /// 分辨率的宽或高为零。
    #[error("invalid resolution {width}x{height}: both dimensions must be non-zero")]
    InvalidResolution { width: u32, height: u32 },

    /// 结束标记不能为空。
    #[error("delimiter marker must not be empty")]
    EmptyDelimiter,

    /// 目标输出文件已存在，且没有指定强制覆盖。
    #[error("output file already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    /// 外部视频工具 (ffmpeg) 启动失败或返回非零状态。
    #[error("{tool} failed: {message}")]
    VideoTool { tool: &'static str, message: String },

    /// 用户按下了 Ctrl-C。
    #[error("interrupted")]
    Interrupted,
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
