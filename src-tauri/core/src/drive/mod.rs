//! 盘符实体：名称、说明（映射目标）、状态。
//!
//! 状态永远来自系统的实时信息：构造时、以及每次 `assign` 之后都重新分类，
//! 不根据调用是否成功去推测。

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::drive_service::{DefineMode, DriveService, SystemDriveService};
use crate::error::DriveError;

mod events;
mod name;
mod status;

pub use events::{DriveEvent, DriveField};
pub use name::DriveName;
pub use status::{classify, DriveStatus, RootAttributes, VolumeKind, VolumeState};

use events::ChangeListeners;

/// 没有映射（或查询失败）时显示的说明
pub const NO_ASSIGNMENT: &str = "---------- no assignment ----------";

/// 给展示层用的只读快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveSnapshot {
    pub name: DriveName,
    pub status: DriveStatus,
    pub description: String,
}

/// 可以分配本地文件夹的盘符
#[derive(Debug)]
pub struct Drive<S: DriveService = SystemDriveService> {
    service: Arc<S>,
    name: DriveName,
    description: String,
    status: DriveStatus,
    listeners: ChangeListeners,
}

impl<S: DriveService> Drive<S> {
    /// 校验盘符后读取当前映射与状态。盘符非法时返回 `InvalidArgument`。
    pub fn new(service: Arc<S>, name: &str) -> Result<Self, DriveError> {
        let name = DriveName::parse(name)?;
        Ok(Self::with_name(service, name))
    }

    pub fn with_name(service: Arc<S>, name: DriveName) -> Self {
        let description = query_description(service.as_ref(), &name);
        let status = classify(&service.volume_state(&name));
        debug!(drive = %name, %status, %description, "probed drive");
        Self {
            service,
            name,
            description,
            status,
            listeners: ChangeListeners::default(),
        }
    }

    pub fn name(&self) -> &DriveName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> DriveStatus {
        self.status
    }

    pub fn snapshot(&self) -> DriveSnapshot {
        DriveSnapshot {
            name: self.name,
            status: self.status,
            description: self.description.clone(),
        }
    }

    /// 状态为 Enable / Busy，且目标文件夹存在
    pub fn is_assignable(&self, folder: &Path) -> bool {
        self.status.is_available() && folder.is_dir()
    }

    /// 把文件夹分配给该盘符。
    ///
    /// 不满足 `is_assignable` 时改为删除映射。系统调用的失败只记录日志，
    /// 最终状态以调用后重新读取的卷信息为准。
    pub fn assign(&mut self, folder: impl AsRef<Path>) {
        let folder = folder.as_ref();

        if self.is_assignable(folder) {
            if let Err(e) =
                self.service
                    .define_dos_device(DefineMode::Assign, &self.name, Some(folder))
            {
                warn!(drive = %self.name, folder = %folder.display(), error = %e, "assign failed");
            }
            self.set_description(folder.to_string_lossy().into_owned());
        } else {
            debug!(
                drive = %self.name,
                status = %self.status,
                folder = %folder.display(),
                "not assignable, removing mapping"
            );
            if let Err(e) = self
                .service
                .define_dos_device(DefineMode::Unassign, &self.name, None)
            {
                // 没有映射时删除必然失败，不算异常
                debug!(drive = %self.name, error = %e, "unassign failed");
            }
            self.set_description(NO_ASSIGNMENT.to_string());
        }

        let status = classify(&self.service.volume_state(&self.name));
        self.set_status(status);
    }

    /// 解除映射（等同于分配一个不存在的文件夹）
    pub fn clear(&mut self) {
        self.assign(Path::new(""));
    }

    /// 订阅字段变更
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DriveEvent> {
        self.listeners.subscribe()
    }

    /// 注册变更回调，在修改所在线程同步执行
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: Fn(&DriveEvent) + Send + Sync + 'static,
    {
        self.listeners.on_change(Box::new(callback));
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
        self.notify(DriveField::Description);
    }

    fn set_status(&mut self, status: DriveStatus) {
        self.status = status;
        self.notify(DriveField::Status);
    }

    fn notify(&mut self, field: DriveField) {
        self.listeners.emit(DriveEvent {
            drive: self.name,
            field,
        });
    }
}

fn query_description<S: DriveService + ?Sized>(service: &S, name: &DriveName) -> String {
    match service.query_dos_device(name) {
        Ok(Some(target)) if !target.is_empty() => target,
        Ok(_) => NO_ASSIGNMENT.to_string(),
        Err(e) => {
            debug!(drive = %name, error = %e, "query failed");
            NO_ASSIGNMENT.to_string()
        }
    }
}
