//! # 中断处理模块
//!
//! Ctrl-C 只设置一个标志，流程在帧与帧之间调用 `check` 并以错误返回，
//! 让暂存目录等资源按正常路径析构。

use crate::error::{CodecError, Result};
use std::sync::atomic::{AtomicBool, Ordering::SeqCst};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// 注册 Ctrl-C 处理函数。整个进程只能调用一次。
pub fn install() -> std::result::Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, SeqCst))
}

/// 如果已收到中断信号，返回 `CodecError::Interrupted`。
pub fn check() -> Result<()> {
    if INTERRUPTED.load(SeqCst) {
        return Err(CodecError::Interrupted);
    }
    Ok(())
}
