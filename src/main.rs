use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fvid::{
    cli::{Action, Cli},
    handler::{handle_decode, handle_encode},
    interrupt,
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的动作（`encode` 或 `decode`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 诊断日志写到 stderr，默认只输出警告，可通过 RUST_LOG 调整
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // 解析命令行参数
    let cli = Cli::parse();

    interrupt::install().context("Failed to install the Ctrl-C handler")?;

    // 根据动作调用相应的处理函数
    match cli.action {
        Action::Encode => handle_encode(cli.args),
        Action::Decode => handle_decode(cli.args),
    }
}
