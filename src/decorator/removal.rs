//! 通知移除处理与静默复活
//!
//! 渠道被删除时不能在移除回调里直接重投递（会重入宿主回调），
//! 因此把复活任务放入队列，由 `RevivalWorker` 在回调之外执行。

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{WeChatDecorator, SDK_O};
use crate::host::NotificationHost;
use crate::notification::extras::KEY_SILENT_REVIVAL;
use crate::notification::Extras;

/// 通知移除原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// 用户划掉
    Cancel,
    /// 发布方自行取消
    AppCancel,
    /// 渠道被删除
    ChannelBanned,
    Other(i32),
}

impl RemovalReason {
    pub const REASON_CANCEL: i32 = 2;
    pub const REASON_APP_CANCEL: i32 = 8;
    pub const REASON_CHANNEL_BANNED: i32 = 17;

    /// 从宿主原因码转换
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::REASON_CANCEL => RemovalReason::Cancel,
            Self::REASON_APP_CANCEL => RemovalReason::AppCancel,
            Self::REASON_CHANNEL_BANNED => RemovalReason::ChannelBanned,
            other => RemovalReason::Other(other),
        }
    }
}

/// 移除处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalAction {
    /// 已传播取消
    Cancelled,
    /// 已安排静默复活
    RevivalScheduled,
    /// 已标记会话已读
    MarkedRead,
    Ignored,
}

/// 延后执行的任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// 带静默标记重新投递
    Revive { key: String },
}

impl WeChatDecorator {
    /// 通知被移除时调用
    pub fn on_notification_removed(&self, key: &str, reason: RemovalReason) -> RemovalAction {
        match reason {
            // 仅在宿主开启移除感知时出现，取消所有由该 key 演化出的通知
            RemovalReason::AppCancel => {
                debug!(key = %key, "Cancel notification");
                if let Err(e) = self.host.cancel(key) {
                    warn!(key = %key, error = %e, "Failed to cancel notification");
                }
                RemovalAction::Cancelled
            }
            RemovalReason::ChannelBanned => {
                let task = DeferredTask::Revive { key: key.to_string() };
                if self.deferred.send(task).is_err() {
                    warn!(key = %key, "Revival worker stopped, notification not revived");
                    return RemovalAction::Ignored;
                }
                RemovalAction::RevivalScheduled
            }
            // 移除感知仅在 API 26+ 支持，低版本的任何移除都视为已读
            _ if self.config.sdk_level < SDK_O || reason == RemovalReason::Cancel => {
                self.builder.mark_read(key);
                RemovalAction::MarkedRead
            }
            _ => RemovalAction::Ignored,
        }
    }
}

/// 静默复活 worker
pub struct RevivalWorker {
    host: Arc<dyn NotificationHost>,
    rx: mpsc::UnboundedReceiver<DeferredTask>,
}

impl RevivalWorker {
    pub(super) fn new(host: Arc<dyn NotificationHost>, rx: mpsc::UnboundedReceiver<DeferredTask>) -> Self {
        Self { host, rx }
    }

    /// 持续处理任务，直到装饰器被释放
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            self.handle(task);
        }
        debug!("Revival worker stopped");
    }

    /// 在当前 tokio 运行时中启动
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 处理队列中已有的任务（不需要运行时），返回处理数量
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.rx.try_recv() {
            self.handle(task);
            count += 1;
        }
        count
    }

    fn handle(&self, task: DeferredTask) {
        match task {
            DeferredTask::Revive { key } => {
                debug!(key = %key, "Revive silently");
                let mut addition = Extras::new();
                addition.put_bool(KEY_SILENT_REVIVAL, true);
                if let Err(e) = self.host.recast(&key, addition) {
                    warn!(key = %key, error = %e, "Failed to revive notification");
                }
            }
        }
    }
}
