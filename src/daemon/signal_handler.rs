//! 信号处理模块
//!
//! 提供Unix信号处理和优雅关闭支持

use crate::error::Result;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal_hook::consts::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook_tokio::Signals;

/// 设置信号处理器
///
/// 接收到SIGINT或SIGTERM时通过广播通道发出关闭信号。
///
/// # 参数
/// * `shutdown_tx` - 关闭信号发送器
///
/// # 返回
/// * `Result<()>` - 设置结果
pub async fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>) -> Result<()> {
    #[cfg(unix)]
    {
        setup_unix_signals(shutdown_tx).await
    }
    #[cfg(not(unix))]
    {
        setup_ctrl_c(shutdown_tx);
        Ok(())
    }
}

/// Unix系统信号处理
#[cfg(unix)]
async fn setup_unix_signals(shutdown_tx: broadcast::Sender<()>) -> Result<()> {
    use futures::stream::StreamExt;

    let signals = Signals::new([SIGINT, SIGTERM])?;

    tokio::spawn(async move {
        let mut signals = signals;
        while let Some(signal) = signals.next().await {
            match signal {
                SIGINT => {
                    info!("接收到 SIGINT 信号，开始优雅关闭...");
                }
                SIGTERM => {
                    info!("接收到 SIGTERM 信号，开始优雅关闭...");
                }
                _ => {
                    warn!("接收到未处理的信号: {signal}");
                    continue;
                }
            }
            if let Err(e) = shutdown_tx.send(()) {
                error!("发送关闭信号失败: {e}");
            }
            break;
        }
    });

    Ok(())
}

/// 非Unix系统退化为Ctrl+C监听
#[cfg(not(unix))]
fn setup_ctrl_c(shutdown_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("接收到 Ctrl+C，开始优雅关闭...");
            let _ = shutdown_tx.send(());
        }
    });
}
