//! # 视频封装模块
//!
//! 帧序列与视频文件之间的转换交给外部工具完成。`VideoTransport` 是这一边界，
//! 默认实现 `Ffmpeg` 调用系统中的 `ffmpeg`，使用无损的 `libx264rgb` 编码，
//! 保证解码时能逐像素还原。

use crate::constants::{
    DECODED_FRAME_PREFIX, ENCODED_FRAME_PREFIX, FRAME_EXTENSION, MULTI_FRAME_RATE,
    SINGLE_FRAME_SECONDS,
};
use crate::error::{CodecError, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// 帧序列 <-> 视频文件。
pub trait VideoTransport {
    /// 将按顺序排列的帧图像封装为 `output` 视频文件。
    ///
    /// 帧文件都位于同一目录，文件名为 `encoded_` 加 6 位补零的序号。
    fn mux(&self, frames: &[PathBuf], output: &Path) -> Result<()>;

    /// 将 `input` 视频拆成帧图像写入 `dir`，返回按帧序排列的路径。
    fn demux(&self, input: &Path, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// 基于 `ffmpeg` 命令行的实现。
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl Ffmpeg {
    /// 使用指定路径的 ffmpeg 可执行文件。
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 检查 ffmpeg 是否可用。
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner").arg("-loglevel").arg("error").arg("-y");
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<()> {
        debug!(?cmd, "running ffmpeg");

        let output = cmd.output().map_err(|e| CodecError::VideoTool {
            tool: "ffmpeg",
            message: format!("Failed to run {}: {e}", self.program.display()),
        })?;

        if !output.status.success() {
            return Err(CodecError::VideoTool {
                tool: "ffmpeg",
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl VideoTransport for Ffmpeg {
    fn mux(&self, frames: &[PathBuf], output: &Path) -> Result<()> {
        let mut cmd = self.command();

        match frames {
            [] => {
                return Err(CodecError::VideoTool {
                    tool: "ffmpeg",
                    message: "no frames to encode".to_string(),
                });
            }
            // 单帧：循环 1 秒，即每秒一帧
            [frame] => {
                cmd.arg("-loop")
                    .arg("1")
                    .arg("-t")
                    .arg(SINGLE_FRAME_SECONDS)
                    .arg("-i")
                    .arg(frame);
            }
            // 多帧：每 5 秒一帧，按序号读入
            [first, ..] => {
                let dir = first.parent().unwrap_or_else(|| Path::new("."));
                let pattern = dir.join(format!("{ENCODED_FRAME_PREFIX}%06d.{FRAME_EXTENSION}"));
                cmd.arg("-framerate")
                    .arg(MULTI_FRAME_RATE)
                    .arg("-start_number")
                    .arg("0")
                    .arg("-i")
                    .arg(pattern);
            }
        }

        cmd.arg("-c:v")
            .arg("libx264rgb")
            .arg("-qp")
            .arg("0")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg(output);

        info!(frames = frames.len(), output = %output.display(), "muxing frames");
        self.run(cmd)
    }

    fn demux(&self, input: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = dir.join(format!("{DECODED_FRAME_PREFIX}%06d.{FRAME_EXTENSION}"));

        let mut cmd = self.command();
        cmd.arg("-i")
            .arg(input)
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-start_number")
            .arg("0")
            .arg(pattern);

        info!(input = %input.display(), "demuxing video");
        self.run(cmd)?;

        let frames = list_frames(dir, DECODED_FRAME_PREFIX)?;
        debug!(frames = frames.len(), "demuxed frames");
        Ok(frames)
    }
}

/// 列出 `dir` 中以 `prefix` 开头的帧文件，按文件名排序。
pub fn list_frames(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CodecError::io(dir, e))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CodecError::io(dir, e))?.path();
        let is_frame = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with(prefix))
            && path.extension() == Some(OsStr::new(FRAME_EXTENSION));
        if is_frame {
            frames.push(path);
        }
    }

    frames.sort();
    Ok(frames)
}
