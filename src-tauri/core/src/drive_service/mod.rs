//! 盘符映射服务（跨平台门面）。
//!
//! - `DosDeviceService`：两个原语，定义/删除 DOS 设备映射、查询映射目标；
//! - `VolumeInspector`：读取卷的就绪状态、根目录属性、卷类型；
//! - 根据平台导出 `SystemDriveService`：Windows 调用 kernel32，其他平台为 stub；
//! - `memory::MemoryDriveService` 为进程内实现，供测试替换系统调用（`testing` feature）。

use std::path::Path;

use crate::drive::{DriveName, RootAttributes, VolumeKind, VolumeState};
use crate::error::{PlatformError, PlatformResult};

#[cfg(any(test, feature = "testing"))]
pub mod memory;

/// 映射目标的最大读取长度（UTF-16 字符数）
pub const QUERY_BUFFER_LEN: usize = 300;

/// WinError.h
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// GetFileAttributesW 失败时的返回值
pub const INVALID_FILE_ATTRIBUTES: u32 = u32::MAX;

// WinBase.h: GetDriveTypeW 返回值
pub const DRIVE_REMOVABLE: u32 = 2;
pub const DRIVE_FIXED: u32 = 3;
pub const DRIVE_REMOTE: u32 = 4;
pub const DRIVE_CDROM: u32 = 5;
pub const DRIVE_RAMDISK: u32 = 6;

/// DefineDosDevice 的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefineMode {
    /// 新建或替换映射（dwFlags = 0）
    Assign,
    /// 删除映射（dwFlags = DDD_REMOVE_DEFINITION）
    Unassign,
}

impl DefineMode {
    /// 原生 dwFlags 数值
    pub const fn flags(self) -> u32 {
        match self {
            DefineMode::Assign => 0,
            DefineMode::Unassign => 2,
        }
    }
}

/// DOS 设备映射原语。只做透传，不含业务逻辑。
pub trait DosDeviceService {
    /// 定义（或删除）`drive` 的映射；`Unassign` 时 `target` 为 `None`
    fn define_dos_device(
        &self,
        mode: DefineMode,
        drive: &DriveName,
        target: Option<&Path>,
    ) -> PlatformResult<()>;

    /// 当前映射目标；没有映射时返回 `Ok(None)`
    fn query_dos_device(&self, drive: &DriveName) -> PlatformResult<Option<String>>;
}

/// 卷信息查询
pub trait VolumeInspector {
    fn volume_state(&self, drive: &DriveName) -> VolumeState;
}

/// `Drive` 依赖的完整能力
pub trait DriveService: DosDeviceService + VolumeInspector + Send + Sync {}

impl<T: DosDeviceService + VolumeInspector + Send + Sync> DriveService for T {}

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(target_os = "windows"))]
mod stub;

#[cfg(target_os = "windows")]
pub use windows::SystemDriveService;

#[cfg(not(target_os = "windows"))]
pub use stub::SystemDriveService;

/// `QueryDosDevice` 对 `DefineDosDevice(0, ..)` 创建的映射返回 `\??\C:\dir`，
/// 去掉前缀后与传入的目标路径一致。其他设备路径原样返回。
pub fn normalize_device_target(raw: &str) -> &str {
    raw.strip_prefix(r"\??\").unwrap_or(raw)
}

/// 解析 `QueryDosDevice` 写入的缓冲区。
///
/// 结果是以 NUL 分隔的列表，只取第一项（当前生效的映射）；
/// `written` 超出缓冲区时按缓冲区长度截断。第一项为空时返回 `None`。
pub fn decode_query_buffer(buf: &[u16], written: usize) -> Option<String> {
    let written = written.min(buf.len());
    let end = buf[..written]
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(written);
    let raw = String::from_utf16_lossy(&buf[..end]);
    let target = normalize_device_target(&raw);
    (!target.is_empty()).then(|| target.to_string())
}

/// 查询失败时的错误：缓冲区不足单独区分，不做截断
pub fn query_error(op: &'static str, code: u32) -> PlatformError {
    if code == ERROR_INSUFFICIENT_BUFFER {
        PlatformError::BufferTooSmall {
            op,
            capacity: QUERY_BUFFER_LEN,
        }
    } else {
        PlatformError::Os { op, code }
    }
}

/// 已就绪卷的状态。
///
/// 根目录属性读取失败时按 0 处理，分类结果为 `Unknown`（不可分配），
/// 不能当作未就绪，否则会把存在的卷当成空闲盘符。
pub fn ready_volume(attributes: u32, drive_type: u32) -> VolumeState {
    let attributes = if attributes == INVALID_FILE_ATTRIBUTES {
        RootAttributes(0)
    } else {
        RootAttributes(attributes)
    };
    let kind = match drive_type {
        DRIVE_REMOVABLE => VolumeKind::Removable,
        DRIVE_FIXED => VolumeKind::Fixed,
        DRIVE_REMOTE => VolumeKind::Remote,
        DRIVE_CDROM => VolumeKind::Optical,
        DRIVE_RAMDISK => VolumeKind::RamDisk,
        _ => VolumeKind::Other,
    };
    VolumeState::Ready { attributes, kind }
}
