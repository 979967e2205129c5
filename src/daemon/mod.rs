//! 守护进程支持模块
//!
//! 提供PID文件管理和信号处理

use crate::error::{Result, ServiceSentinelError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod signal_handler;

/// PID文件守卫
///
/// 创建时写入当前进程ID，销毁时删除文件。同一PID文件被
/// 活跃进程持有时拒绝创建，陈旧文件直接覆盖。
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// 创建PID文件
    ///
    /// # 参数
    /// * `path` - PID文件路径
    ///
    /// # 返回
    /// * `Result<Self>` - PID文件守卫
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(pid) = content.trim().parse::<i32>() {
                if is_process_alive(pid) {
                    return Err(ServiceSentinelError::Daemon(format!(
                        "另一个实例正在运行（PID {}），PID文件: {}",
                        pid,
                        path.display()
                    )));
                }
                warn!(
                    "发现陈旧的PID文件（PID {} 已退出），将覆盖: {}",
                    pid,
                    path.display()
                );
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, format!("{}\n", std::process::id()))?;

        Ok(Self { path })
    }

    /// PID文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("删除PID文件失败 {}: {}", self.path.display(), e);
        }
    }
}

/// 检查指定PID的进程是否存活
#[cfg(unix)]
fn is_process_alive(pid: i32) -> bool {
    // 信号0不发送信号，仅检查进程是否存在
    unsafe { libc::kill(pid, 0) == 0 }
}

#[cfg(not(unix))]
fn is_process_alive(_pid: i32) -> bool {
    false
}
