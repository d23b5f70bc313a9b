//! # 帧暂存模块
//!
//! 编码和解码过程中，帧以 PNG 形式暂存在一个临时目录中，供外部视频工具读写。
//! 目录随 `FrameStaging` 的析构自动删除，无论流程成功、出错还是被中断。

use crate::constants::FRAME_EXTENSION;
use crate::error::{CodecError, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

#[derive(Debug)]
pub struct FrameStaging {
    dir: TempDir,
}

impl FrameStaging {
    /// 在系统临时目录下创建暂存目录。
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("fvid_frames_")
            .tempdir()
            .map_err(|e| CodecError::io(std::env::temp_dir(), e))?;

        debug!(path = %dir.path().display(), "created frame staging directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 第 `index` 帧的文件路径。序号补零到 6 位，使字典序与帧序一致。
    pub fn frame_path(&self, prefix: &str, index: usize) -> PathBuf {
        self.dir
            .path()
            .join(format!("{prefix}{index:06}.{FRAME_EXTENSION}"))
    }

    /// 将一帧写为 PNG，返回其路径。
    pub fn save_frame(&self, prefix: &str, index: usize, frame: &RgbImage) -> Result<PathBuf> {
        let path = self.frame_path(prefix, index);
        frame
            .save(&path)
            .map_err(|e| CodecError::image(&path, e))?;
        Ok(path)
    }

    /// 读取一帧并转换为 RGB。
    pub fn load_frame(path: &Path) -> Result<RgbImage> {
        let frame = image::open(path).map_err(|e| CodecError::image(path, e))?;
        Ok(frame.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{BLACK, WHITE};

    #[test]
    fn frames_survive_a_png_round_trip() {
        let staging = FrameStaging::new().unwrap();
        let mut frame = RgbImage::from_pixel(5, 3, BLACK);
        frame.put_pixel(4, 2, WHITE);

        let path = staging.save_frame("encoded_", 7, &frame).unwrap();
        assert!(path.ends_with("encoded_000007.png"));
        assert_eq!(FrameStaging::load_frame(&path).unwrap(), frame);
    }

    #[test]
    fn directory_is_removed_on_drop() {
        let staging = FrameStaging::new().unwrap();
        let dir = staging.path().to_path_buf();
        staging
            .save_frame("encoded_", 0, &RgbImage::new(2, 2))
            .unwrap();
        assert!(dir.exists());

        drop(staging);
        assert!(!dir.exists());
    }

    #[test]
    fn missing_frame_is_an_image_error() {
        let staging = FrameStaging::new().unwrap();
        let err = FrameStaging::load_frame(&staging.frame_path("decoded_", 1)).unwrap_err();
        assert!(matches!(err, CodecError::Image { .. }));
    }
}
