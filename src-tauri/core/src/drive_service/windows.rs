//! Windows 平台实现：kernel32 的 DOS 设备与卷信息接口。

use std::path::Path;

use widestring::U16CString;
use windows_sys::Win32::Storage::FileSystem::{
    DefineDosDeviceW, GetDriveTypeW, GetFileAttributesW, GetVolumeInformationW, QueryDosDeviceW,
};

use super::{
    decode_query_buffer, query_error, ready_volume, DefineMode, DosDeviceService,
    VolumeInspector, QUERY_BUFFER_LEN,
};
use crate::drive::{DriveName, VolumeState};
use crate::error::{PlatformError, PlatformResult};

/// 直接调用系统接口的映射服务（无状态）
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDriveService;

fn last_os_code() -> u32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or_default() as u32
}

fn wide_str(s: &str) -> PlatformResult<U16CString> {
    U16CString::from_str(s).map_err(|_| PlatformError::InvalidPath(s.to_string()))
}

fn wide_path(path: &Path) -> PlatformResult<U16CString> {
    U16CString::from_os_str(path.as_os_str())
        .map_err(|_| PlatformError::InvalidPath(path.display().to_string()))
}

impl DosDeviceService for SystemDriveService {
    fn define_dos_device(
        &self,
        mode: DefineMode,
        drive: &DriveName,
        target: Option<&Path>,
    ) -> PlatformResult<()> {
        let device = wide_str(drive.as_str())?;
        let target = target.map(wide_path).transpose()?;
        let target_ptr = target
            .as_ref()
            .map(|t| t.as_ptr())
            .unwrap_or(std::ptr::null());

        let ok = unsafe { DefineDosDeviceW(mode.flags(), device.as_ptr(), target_ptr) };
        if ok == 0 {
            return Err(PlatformError::Os {
                op: "DefineDosDeviceW",
                code: last_os_code(),
            });
        }
        Ok(())
    }

    fn query_dos_device(&self, drive: &DriveName) -> PlatformResult<Option<String>> {
        let device = wide_str(drive.as_str())?;
        let mut buffer = vec![0u16; QUERY_BUFFER_LEN];

        let written = unsafe {
            QueryDosDeviceW(device.as_ptr(), buffer.as_mut_ptr(), buffer.len() as u32)
        };
        if written == 0 {
            return Err(query_error("QueryDosDeviceW", last_os_code()));
        }
        Ok(decode_query_buffer(&buffer, written as usize))
    }
}

impl VolumeInspector for SystemDriveService {
    fn volume_state(&self, drive: &DriveName) -> VolumeState {
        let Ok(root) = wide_str(&drive.root_path()) else {
            return VolumeState::NotReady;
        };

        let ready = unsafe {
            GetVolumeInformationW(
                root.as_ptr(),
                std::ptr::null_mut(),
                0,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                0,
            )
        } != 0;
        if !ready {
            return VolumeState::NotReady;
        }

        let attributes = unsafe { GetFileAttributesW(root.as_ptr()) };
        let drive_type = unsafe { GetDriveTypeW(root.as_ptr()) };
        ready_volume(attributes, drive_type)
    }
}
