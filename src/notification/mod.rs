//! 通知数据模型 - 宿主投递的通知、extras 键值包与通知渠道
//!
//! # 组成
//! 1. `model`：`StatusBarNotification` / `Notification`，流水线逐步修改的记录
//! 2. `extras`：开放式键值包，合并时只接受固定几种值形状
//! 3. `channel`：通知渠道描述，供渠道迁移使用

pub mod channel;
pub mod extras;
pub mod model;

pub use channel::{AudioAttributes, ChannelDescriptor, Importance, Visibility, DEFAULT_NOTIFICATION_URI};
pub use extras::{ExtraValue, Extras};
pub use model::{GroupAlertBehavior, Notification, StatusBarNotification, FLAG_LOCAL_ONLY, FLAG_ONLY_ALERT_ONCE};
