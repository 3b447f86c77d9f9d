//! 非 Windows 平台的占位实现：没有 DOS 设备表，所有盘符都视为未使用。

use std::path::Path;

use super::{DefineMode, DosDeviceService, VolumeInspector};
use crate::drive::{DriveName, VolumeState};
use crate::error::{PlatformError, PlatformResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDriveService;

impl DosDeviceService for SystemDriveService {
    fn define_dos_device(
        &self,
        _mode: DefineMode,
        _drive: &DriveName,
        _target: Option<&Path>,
    ) -> PlatformResult<()> {
        Err(PlatformError::Unsupported)
    }

    fn query_dos_device(&self, _drive: &DriveName) -> PlatformResult<Option<String>> {
        Err(PlatformError::Unsupported)
    }
}

impl VolumeInspector for SystemDriveService {
    fn volume_state(&self, _drive: &DriveName) -> VolumeState {
        VolumeState::NotReady
    }
}
