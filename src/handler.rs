//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 动作的高级业务逻辑。
//! 本模块负责协调文件 I/O、帧的暂存、外部视频工具以及向用户报告结果。

use crate::bitstream::BitStream;
use crate::cli::CodecArgs;
use crate::constants::{DECODED_FILE_STEM, ENCODED_FRAME_PREFIX, ENCODED_VIDEO_NAME};
use crate::decoder::FrameDecoder;
use crate::encoder::FrameEncoder;
use crate::error::CodecError;
use crate::interrupt;
use crate::sniff::sniff;
use crate::staging::FrameStaging;
use crate::video::{Ffmpeg, VideoTransport};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 处理 'Encode' 动作，使用系统中的 ffmpeg 封装视频。
pub fn handle_encode(args: CodecArgs) -> Result<()> {
    ensure_input(&args.input, "input file")?;
    encode_with(&args, &system_ffmpeg()?).map(|_| ())
}

/// 处理 'Decode' 动作，使用系统中的 ffmpeg 拆帧。
pub fn handle_decode(args: CodecArgs) -> Result<()> {
    ensure_input(&args.input, "video file")?;
    decode_with(&args, &system_ffmpeg()?).map(|_| ())
}

fn system_ffmpeg() -> Result<Ffmpeg> {
    let ffmpeg = Ffmpeg::default();
    anyhow::ensure!(
        ffmpeg.is_available(),
        "{} was not found. \nInstall FFmpeg and make sure it is on your PATH.",
        "ffmpeg".red().bold()
    );
    Ok(ffmpeg)
}

/// 将输入文件编码为视频，返回写出的视频路径。
///
/// 读取输入文件、展开为带结束标记的比特流、逐帧绘制并暂存为 PNG，
/// 最后交给 `transport` 封装为 `<output>/file.mp4`。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入文件不存在或无法读取。
/// * 输出目录无法创建，或目标视频已存在且未指定 `--force`。
/// * 帧无法写入暂存目录。
/// * 视频封装失败 (此时不会留下不完整的视频文件)。
pub fn encode_with<T: VideoTransport>(args: &CodecArgs, transport: &T) -> Result<PathBuf> {
    let config = args.config()?;
    let data = read_input(&args.input)?;

    prepare_output_dir(&args.output)?;
    let dest = args.output.join(ENCODED_VIDEO_NAME);
    ensure_writable(&dest, args.force)?;

    let stream = BitStream::with_delimiter(&data, &config.delimiter);
    let encoder = FrameEncoder::new(&config);
    info!(
        bytes = data.len(),
        bits = stream.len(),
        frames = encoder.frame_count(stream.len()),
        resolution = %config.resolution,
        "encoding"
    );

    // 暂存目录在函数返回时 (包括出错返回) 自动删除
    let staging = FrameStaging::new()?;
    let progress = progress_bar(encoder.frame_count(stream.len()), "Writing frames");
    let mut frames = Vec::new();
    for (index, frame) in encoder.frames(&stream).enumerate() {
        interrupt::check()?;
        frames.push(staging.save_frame(ENCODED_FRAME_PREFIX, index, &frame)?);
        progress.inc(1);
        debug!(frame = index, "staged frame");
    }
    progress.finish_and_clear();

    interrupt::check()?;
    if let Err(e) = transport.mux(&frames, &dest) {
        let _ = fs::remove_file(&dest);
        return Err(e).with_context(|| {
            format!(
                "Failed to write video file: {}",
                dest.to_string_lossy().red().bold()
            )
        });
    }

    println!(
        "The file has been encoded into {} frame(s) and saved: {}",
        frames.len().to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 从视频中还原文件，返回写出的文件路径。
///
/// 视频由 `transport` 拆成帧后按顺序逐帧扫描，遇到结束标记即停止。
/// 还原出的字节经过类型嗅探决定扩展名，写为 `<output>/file.<ext>`。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误，且不会写出任何输出文件：
/// * 输入视频不存在，或拆帧失败。
/// * 帧尺寸与 `--width`/`--height` 不一致。
/// * 所有帧都扫描完仍未遇到结束标记。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn decode_with<T: VideoTransport>(args: &CodecArgs, transport: &T) -> Result<PathBuf> {
    let config = args.config()?;
    ensure_input(&args.input, "video file")?;
    prepare_output_dir(&args.output)?;

    let staging = FrameStaging::new()?;
    let frames = transport
        .demux(&args.input, staging.path())
        .with_context(|| {
            format!(
                "Failed to extract frames from '{}'.",
                args.input.to_string_lossy().red().bold()
            )
        })?;

    let progress = progress_bar(frames.len(), "Getting bits from frames");
    let mut decoder = FrameDecoder::new(&config);
    for path in &frames {
        interrupt::check()?;
        let frame = FrameStaging::load_frame(path)?;
        let terminated = decoder.feed(&frame)?;
        progress.inc(1);
        if terminated {
            break;
        }
    }
    progress.finish_and_clear();

    let scanned = decoder.frames_scanned();
    if scanned < frames.len() {
        debug!(ignored = frames.len() - scanned, "frames after the delimiter ignored");
    }

    let payload = decoder.finish().with_context(|| {
        format!(
            "'{}' does not contain a complete file. \nThe video may be truncated, corrupted, or encoded with different settings.",
            args.input.to_string_lossy().red().bold()
        )
    })?;

    let packed = payload.pack();
    if !packed.is_aligned() {
        warn!(dropped_bits = packed.dropped_bits, "payload is not byte aligned");
        println!(
            "{} the recovered data is not a whole number of bytes; {} trailing bit(s) were dropped.",
            "Warning:".yellow().bold(),
            packed.dropped_bits.to_string().yellow()
        );
    }

    let kind = sniff(&packed.bytes);
    let dest = args
        .output
        .join(format!("{DECODED_FILE_STEM}.{}", kind.extension));
    ensure_writable(&dest, args.force)?;
    info!(bytes = packed.bytes.len(), mime = kind.mime, "writing recovered file");

    fs::write(&dest, &packed.bytes).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully recovered ({}) and saved: {}",
        kind.mime.green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 以帧为单位的进度条。输出不是终端时 indicatif 会自动隐藏。
fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    progress.set_message(message);
    progress
}

fn ensure_input(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(CodecError::InputNotFound {
            path: path.to_path_buf(),
        })
        .with_context(|| {
            format!(
                "Unable to read {what}: {}",
                path.to_string_lossy().red().bold()
            )
        });
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    ensure_input(path, "input file")?;

    fs::read(path)
        .map_err(|e| CodecError::io(path, e))
        .with_context(|| {
            format!(
                "Unable to read input file: {}",
                path.to_string_lossy().red().bold()
            )
        })
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| CodecError::io(dir, e))
        .with_context(|| {
            format!(
                "Unable to create output directory: {}",
                dir.to_string_lossy().red().bold()
            )
        })
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    if !force && dest.exists() {
        return Err(CodecError::OutputExists {
            path: dest.to_path_buf(),
        })
        .with_context(|| {
            format!(
                "Output file already exists: {} \nUse --force to overwrite it.",
                dest.to_string_lossy().red().bold()
            )
        });
    }
    Ok(())
}
