//! 错误类型。
//!
//! - `DriveError`：只在构造阶段向调用方传播（盘符非法）。
//! - `PlatformError`：系统调用失败；由 `Drive` 记录日志后吞掉，状态以重新分类的结果为准。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// 盘符格式非法（应为单个大写字母 + 冒号，例如 `C:`）
    #[error("invalid drive name {0:?}: expected a single uppercase letter followed by ':'")]
    InvalidArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Win32 调用返回失败，`code` 为 GetLastError 的值
    #[error("{op} failed (os error {code})")]
    Os { op: &'static str, code: u32 },

    /// 查询结果超过缓冲区长度
    #[error("{op}: target does not fit in {capacity} characters")]
    BufferTooSmall { op: &'static str, capacity: usize },

    /// 路径无法编码为系统调用参数（例如包含 NUL）
    #[error("path cannot be passed to the OS: {0}")]
    InvalidPath(String),

    /// 当前平台不支持 DOS 设备映射
    #[error("DOS device mapping is not supported on this platform")]
    Unsupported,
}

pub type PlatformResult<T> = Result<T, PlatformError>;
