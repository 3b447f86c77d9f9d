//! 盘符映射核心库：探测 A: ~ Z: 的状态，为可用盘符分配/解除本地文件夹映射。

pub mod drive;
pub mod drive_service;
pub mod error;
pub mod registry;

pub use drive::{
    Drive, DriveEvent, DriveField, DriveName, DriveSnapshot, DriveStatus, NO_ASSIGNMENT,
};
pub use drive_service::SystemDriveService;
pub use error::{DriveError, PlatformError};
pub use registry::DriveRegistry;
