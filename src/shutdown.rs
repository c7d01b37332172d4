//! 优雅退出模块
//!
//! 监听进程信号（Unix: SIGINT/SIGTERM；其他平台: Ctrl+C），
//! 驱动 axum 的 graceful shutdown：停止接收新连接，存量请求
//! 跑完后退出，暂存文件由各请求的守卫自行清理。

use thiserror::Error;

/// 信号监听初始化错误
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// 注册信号处理器失败
    #[error("注册信号处理器失败: {0}")]
    SignalRegister(String),
}

/// 构建退出信号 future。
///
/// 信号注册在调用时完成（失败立刻报错，而不是运行期悄悄失效）；
/// 返回的 future 在收到退出信号后完成。
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl std::future::Future<Output = ()>, ShutdownError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| ShutdownError::SignalRegister(format!("SIGINT: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| ShutdownError::SignalRegister(format!("SIGTERM: {e}")))?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => tracing::info!("收到 SIGINT，开始优雅退出..."),
            _ = sigterm.recv() => tracing::info!("收到 SIGTERM，开始优雅退出..."),
        }
    })
}

/// 构建退出信号 future（非 Unix 平台走 Ctrl+C）。
#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl std::future::Future<Output = ()>, ShutdownError> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("收到 Ctrl+C，开始优雅退出..."),
            Err(e) => tracing::error!("等待 Ctrl+C 失败: {e}"),
        }
    })
}
