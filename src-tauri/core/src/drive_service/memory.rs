//! 进程内的映射服务：用一张表模拟 DOS 设备与卷，并记录每次 define 调用。
//!
//! 行为与系统实现保持一致：
//! - 映射中的盘符表现为就绪的卷，根目录带目录属性；
//! - 真实设备（硬盘/光驱）由 `add_device` 等登记，查询返回设备路径；
//! - 删除不存在的映射返回 `ERROR_FILE_NOT_FOUND`。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{DefineMode, DosDeviceService, VolumeInspector};
use crate::drive::{DriveName, RootAttributes, VolumeKind, VolumeState};
use crate::error::{PlatformError, PlatformResult};

const ERROR_FILE_NOT_FOUND: u32 = 2;
const ERROR_ACCESS_DENIED: u32 = 5;
const FILE_ATTRIBUTE_READONLY: u32 = 0x1;
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

/// 一次 `define_dos_device` 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineCall {
    pub mode: DefineMode,
    pub drive: DriveName,
    pub target: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct DeviceVolume {
    device: String,
    attributes: RootAttributes,
    kind: VolumeKind,
}

#[derive(Debug, Default)]
struct Inner {
    devices: HashMap<DriveName, DeviceVolume>,
    mappings: HashMap<DriveName, String>,
    calls: Vec<DefineCall>,
    fail_define: bool,
    fail_query: bool,
}

#[derive(Debug, Default)]
pub struct MemoryDriveService {
    inner: Mutex<Inner>,
}

impl MemoryDriveService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // 测试线程 panic 后仍然可以读取状态
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 登记一个真实设备卷
    pub fn add_device(
        &self,
        drive: DriveName,
        device: impl Into<String>,
        attributes: RootAttributes,
        kind: VolumeKind,
    ) {
        self.lock().devices.insert(
            drive,
            DeviceVolume {
                device: device.into(),
                attributes,
                kind,
            },
        );
    }

    /// 系统盘：根目录为 隐藏 | 系统 | 目录
    pub fn add_fixed_disk(&self, drive: DriveName) {
        let n = usize::from(drive.letter() as u8 - b'A') + 1;
        self.add_device(
            drive,
            format!(r"\Device\HarddiskVolume{n}"),
            RootAttributes(
                FILE_ATTRIBUTE_HIDDEN | RootAttributes::SYSTEM | RootAttributes::DIRECTORY,
            ),
            VolumeKind::Fixed,
        );
    }

    /// 插着光盘的光驱：根目录为 只读 | 目录
    pub fn add_optical(&self, drive: DriveName) {
        self.add_device(
            drive,
            r"\Device\CdRom0",
            RootAttributes(FILE_ATTRIBUTE_READONLY | RootAttributes::DIRECTORY),
            VolumeKind::Optical,
        );
    }

    /// 模拟外部（例如命令行 subst）直接修改映射
    pub fn set_mapping(&self, drive: DriveName, target: Option<&str>) {
        let mut inner = self.lock();
        match target {
            Some(t) => inner.mappings.insert(drive, t.to_string()),
            None => inner.mappings.remove(&drive),
        };
    }

    pub fn mapping(&self, drive: &DriveName) -> Option<String> {
        self.lock().mappings.get(drive).cloned()
    }

    pub fn set_fail_define(&self, fail: bool) {
        self.lock().fail_define = fail;
    }

    pub fn set_fail_query(&self, fail: bool) {
        self.lock().fail_query = fail;
    }

    /// 目前为止所有 define 调用（包括失败的）
    pub fn calls(&self) -> Vec<DefineCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

impl DosDeviceService for MemoryDriveService {
    fn define_dos_device(
        &self,
        mode: DefineMode,
        drive: &DriveName,
        target: Option<&Path>,
    ) -> PlatformResult<()> {
        let mut inner = self.lock();
        inner.calls.push(DefineCall {
            mode,
            drive: *drive,
            target: target.map(Path::to_path_buf),
        });

        if inner.fail_define {
            return Err(PlatformError::Os {
                op: "DefineDosDeviceW",
                code: ERROR_ACCESS_DENIED,
            });
        }

        match (mode, target) {
            (DefineMode::Assign, Some(target)) => {
                let target = target
                    .to_str()
                    .ok_or_else(|| PlatformError::InvalidPath(target.display().to_string()))?;
                inner.mappings.insert(*drive, target.to_string());
                Ok(())
            }
            (DefineMode::Assign, None) => Err(PlatformError::InvalidPath(String::new())),
            (DefineMode::Unassign, _) => match inner.mappings.remove(drive) {
                Some(_) => Ok(()),
                None => Err(PlatformError::Os {
                    op: "DefineDosDeviceW",
                    code: ERROR_FILE_NOT_FOUND,
                }),
            },
        }
    }

    fn query_dos_device(&self, drive: &DriveName) -> PlatformResult<Option<String>> {
        let inner = self.lock();
        if inner.fail_query {
            return Err(PlatformError::Os {
                op: "QueryDosDeviceW",
                code: ERROR_FILE_NOT_FOUND,
            });
        }
        if let Some(target) = inner.mappings.get(drive) {
            return Ok(Some(target.clone()));
        }
        Ok(inner.devices.get(drive).map(|d| d.device.clone()))
    }
}

impl VolumeInspector for MemoryDriveService {
    fn volume_state(&self, drive: &DriveName) -> VolumeState {
        let inner = self.lock();
        if inner.mappings.contains_key(drive) {
            return VolumeState::Ready {
                attributes: RootAttributes(RootAttributes::DIRECTORY),
                kind: VolumeKind::Fixed,
            };
        }
        match inner.devices.get(drive) {
            Some(d) => VolumeState::Ready {
                attributes: d.attributes,
                kind: d.kind,
            },
            None => VolumeState::NotReady,
        }
    }
}
