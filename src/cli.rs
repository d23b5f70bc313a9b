//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构。
//! 第一个位置参数选择动作 (`encode` 或 `decode`)，其余参数两个动作共用。

use crate::config::{CodecConfig, Resolution, ScanMode};
use crate::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 将任意文件编码为无损的黑白视频，或从这样的视频中还原出原文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "将任意文件编码为无损的黑白视频 (每个像素一个比特)，或从这样的视频中还原出原文件。"
)]
pub struct Cli {
    /// 要执行的动作。
    #[arg(value_enum)]
    pub action: Action,

    #[command(flatten)]
    pub args: CodecArgs,
}

/// 可用的动作：encode (文件 -> 视频) 和 decode (视频 -> 文件)。
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// 将文件编码为视频 `<output>/file.mp4`。
    Encode,

    /// 从视频中还原文件 `<output>/file.<ext>`。
    Decode,
}

/// 两个动作共用的参数。
#[derive(Parser, Debug, Clone)]
pub struct CodecArgs {
    /// 输入文件：encode 时为任意文件，decode 时为视频文件。
    #[arg(short, long)]
    pub input: PathBuf,

    /// 输出目录，不存在时会自动创建。
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// 帧宽度 (像素)，解码时必须与编码时一致。
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// 帧高度 (像素)，解码时必须与编码时一致。
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// 每一帧开始时重新匹配结束标记，跨越两帧的标记不会被识别。
    #[arg(long)]
    pub per_frame_scan: bool,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

impl CodecArgs {
    /// 由命令行参数构造编解码配置。
    pub fn config(&self) -> Result<CodecConfig> {
        let scan = if self.per_frame_scan {
            ScanMode::PerFrame
        } else {
            ScanMode::Continuous
        };

        Ok(CodecConfig::default()
            .with_resolution(Resolution::new(self.width, self.height)?)
            .with_scan_mode(scan))
    }
}
