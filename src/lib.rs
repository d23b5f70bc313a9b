//! # fvid 库
//!
//! 本库包含文件 <-> 黑白视频编解码工具的核心逻辑：
//! 比特流、像素分类、帧编码与带结束标记的帧解码，以及外围的暂存、封装和嗅探。

// 声明库包含的所有模块。

pub mod bitstream;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod interrupt;
pub mod sniff;
pub mod staging;
pub mod video;
