//! 宿主通知平台接口
//!
//! 宿主负责通知的投递、取消、渠道存储与应用信息查询，本 crate 只通过
//! `NotificationHost` trait 访问这些能力。可能失败的查询返回 `anyhow::Result`，
//! 由调用方降级处理。

pub mod memory;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::notification::{ChannelDescriptor, Extras, StatusBarNotification};

pub use memory::InMemoryHost;

/// 已安装应用的元数据
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub version_code: i64,
    pub target_sdk: u32,
}

/// 宿主通知平台
pub trait NotificationHost: Send + Sync {
    /// 查询目标应用的渠道
    fn get_channel(&self, package: &str, channel_id: &str) -> Option<ChannelDescriptor>;

    /// 删除渠道（不存在时无操作）
    fn delete_channel(&self, package: &str, channel_id: &str);

    /// 批量创建渠道
    fn create_channels(&self, package: &str, channels: Vec<ChannelDescriptor>) -> Result<()>;

    /// 查询已安装应用信息
    fn package_info(&self, package: &str) -> Result<PackageInfo>;

    /// 查询同一 original key 的历史通知（最新在前，最多 `max` 条）
    fn archived_notifications(&self, original_key: &str, max: usize) -> Result<Vec<StatusBarNotification>>;

    /// 取消由该 key 演化出的所有通知
    fn cancel(&self, key: &str) -> Result<()>;

    /// 附加 extras 后重新投递
    fn recast(&self, key: &str, additions: Extras) -> Result<()>;
}
