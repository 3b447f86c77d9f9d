use std::fmt;

use serde::Serialize;

/// 盘符状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DriveStatus {
    /// 未被系统使用，可以分配
    Enable,
    /// 硬盘/光驱等真实设备，不可分配
    Disable,
    /// 已映射到文件夹，可重新分配或解除
    Busy,
    /// 卷存在但属性无法识别
    Unknown,
}

impl DriveStatus {
    /// 可以（重新）分配文件夹的状态
    pub fn is_available(self) -> bool {
        matches!(self, DriveStatus::Enable | DriveStatus::Busy)
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            DriveStatus::Enable => "Enable",
            DriveStatus::Disable => "Disable",
            DriveStatus::Busy => "Busy",
            DriveStatus::Unknown => "Unknown",
        })
    }
}

/// 卷根目录的文件属性（Win32 `FILE_ATTRIBUTE_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootAttributes(pub u32);

impl RootAttributes {
    pub const SYSTEM: u32 = 0x0000_0004;
    pub const DIRECTORY: u32 = 0x0000_0010;

    pub fn is_system(self) -> bool {
        self.0 & Self::SYSTEM == Self::SYSTEM
    }

    pub fn is_directory(self) -> bool {
        self.0 & Self::DIRECTORY == Self::DIRECTORY
    }
}

/// 卷类型（对应 GetDriveTypeW）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    Removable,
    Fixed,
    Remote,
    Optical,
    RamDisk,
    Other,
}

/// 系统对某个盘符的卷信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeState {
    NotReady,
    Ready {
        attributes: RootAttributes,
        kind: VolumeKind,
    },
}

/// 由卷信息推导盘符状态。
///
/// 严格按优先级匹配，先命中者为准：
/// 未就绪 -> Enable；系统属性或光驱 -> Disable；目录属性 -> Busy；其余 -> Unknown。
pub fn classify(volume: &VolumeState) -> DriveStatus {
    let (attributes, kind) = match *volume {
        VolumeState::NotReady => return DriveStatus::Enable,
        VolumeState::Ready { attributes, kind } => (attributes, kind),
    };

    if attributes.is_system() || kind == VolumeKind::Optical {
        DriveStatus::Disable
    } else if attributes.is_directory() {
        DriveStatus::Busy
    } else {
        DriveStatus::Unknown
    }
}
