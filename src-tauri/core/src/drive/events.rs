//! 盘符变更通知。
//!
//! 每次写入 `description` / `status` 都会发出一个事件（标明字段），
//! 在 `Drive::assign` 返回之前同步送达：
//! - `subscribe()`：tokio 无界 channel，发送不阻塞、不需要 runtime；
//! - `on_change()`：回调，在修改所在线程内联执行。

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

use super::DriveName;

/// 发生变化的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DriveField {
    Description,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveEvent {
    pub drive: DriveName,
    pub field: DriveField,
}

type ChangeCallback = Box<dyn Fn(&DriveEvent) + Send + Sync>;

#[derive(Default)]
pub(crate) struct ChangeListeners {
    senders: Vec<mpsc::UnboundedSender<DriveEvent>>,
    callbacks: Vec<ChangeCallback>,
}

impl ChangeListeners {
    pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DriveEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    pub(crate) fn on_change(&mut self, callback: ChangeCallback) {
        self.callbacks.push(callback);
    }

    pub(crate) fn emit(&mut self, event: DriveEvent) {
        // 接收端已关闭的订阅直接丢弃
        self.senders.retain(|tx| tx.send(event).is_ok());
        for callback in &self.callbacks {
            callback(&event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len() + self.callbacks.len()
    }
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("senders", &self.senders.len())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
