//! A: ~ Z: 共 26 个盘符，启动时一次性探测，顺序即显示顺序。

use std::sync::Arc;

use tracing::debug;

use crate::drive::{Drive, DriveName, DriveSnapshot};
use crate::drive_service::{DriveService, SystemDriveService};

#[derive(Debug)]
pub struct DriveRegistry<S: DriveService = SystemDriveService> {
    drives: Vec<Drive<S>>,
}

impl DriveRegistry<SystemDriveService> {
    /// 使用本机的映射服务
    pub fn system() -> Self {
        Self::new(Arc::new(SystemDriveService::default()))
    }
}

impl<S: DriveService> DriveRegistry<S> {
    pub fn new(service: Arc<S>) -> Self {
        let drives: Vec<Drive<S>> = DriveName::all()
            .map(|name| Drive::with_name(service.clone(), name))
            .collect();
        debug!(count = drives.len(), "drive registry built");
        Self { drives }
    }

    pub fn drives(&self) -> &[Drive<S>] {
        &self.drives
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drive<S>> {
        self.drives.iter()
    }

    pub fn len(&self) -> usize {
        self.drives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty()
    }

    pub fn get(&self, name: &DriveName) -> Option<&Drive<S>> {
        self.drives.get(Self::index_of(name))
    }

    /// 用户当前选中的盘符（用于 `assign`）
    pub fn get_mut(&mut self, name: &DriveName) -> Option<&mut Drive<S>> {
        self.drives.get_mut(Self::index_of(name))
    }

    pub fn snapshot(&self) -> Vec<DriveSnapshot> {
        self.drives.iter().map(Drive::snapshot).collect()
    }

    fn index_of(name: &DriveName) -> usize {
        usize::from(name.letter() as u8 - b'A')
    }
}

impl<'a, S: DriveService> IntoIterator for &'a DriveRegistry<S> {
    type Item = &'a Drive<S>;
    type IntoIter = std::slice::Iter<'a, Drive<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.drives.iter()
    }
}
