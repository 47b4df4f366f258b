//! 内存宿主 - 记录所有调用，用于测试和 dry-run

use anyhow::{anyhow, bail, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{NotificationHost, PackageInfo};
use crate::notification::{ChannelDescriptor, Extras, StatusBarNotification};

#[derive(Default)]
struct State {
    channels: HashMap<(String, String), ChannelDescriptor>,
    packages: HashMap<String, PackageInfo>,
    archive: HashMap<String, Vec<StatusBarNotification>>,
    deleted_channels: Vec<String>,
    cancelled: Vec<String>,
    recasts: Vec<(String, Extras)>,
    package_queries: usize,
    /// 为 true 时所有可失败的调用返回错误
    failing: bool,
}

impl State {
    fn check(&self, op: &str) -> Result<()> {
        if self.failing {
            bail!("Host unavailable: {}", op);
        }
        Ok(())
    }
}

/// 内存宿主
#[derive(Default)]
pub struct InMemoryHost {
    state: Mutex<State>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 注册已安装应用
    pub fn install_package(&self, package: &str, info: PackageInfo) {
        self.state().packages.insert(package.to_string(), info);
    }

    /// 卸载应用（后续查询失败）
    pub fn uninstall_package(&self, package: &str) {
        self.state().packages.remove(package);
    }

    /// 预置渠道（模拟旧版本遗留渠道）
    pub fn put_channel(&self, package: &str, channel: ChannelDescriptor) {
        self.state()
            .channels
            .insert((package.to_string(), channel.id.clone()), channel);
    }

    /// 归档一条已投递通知（插入到最前）
    pub fn archive(&self, sbn: StatusBarNotification) {
        self.state()
            .archive
            .entry(sbn.original_key.clone())
            .or_default()
            .insert(0, sbn);
    }

    pub fn channel(&self, package: &str, channel_id: &str) -> Option<ChannelDescriptor> {
        self.get_channel(package, channel_id)
    }

    pub fn channel_ids(&self, package: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state()
            .channels
            .keys()
            .filter(|(pkg, _)| pkg == package)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn deleted_channels(&self) -> Vec<String> {
        self.state().deleted_channels.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state().cancelled.clone()
    }

    pub fn recasts(&self) -> Vec<(String, Extras)> {
        self.state().recasts.clone()
    }

    /// 模拟宿主故障：之后的查询、创建、取消、重投递都返回错误
    pub fn set_failing(&self, failing: bool) {
        self.state().failing = failing;
    }

    /// 应用信息查询次数（包括失败的查询）
    pub fn package_queries(&self) -> usize {
        self.state().package_queries
    }
}

impl NotificationHost for InMemoryHost {
    fn get_channel(&self, package: &str, channel_id: &str) -> Option<ChannelDescriptor> {
        self.state()
            .channels
            .get(&(package.to_string(), channel_id.to_string()))
            .cloned()
    }

    fn delete_channel(&self, package: &str, channel_id: &str) {
        let mut state = self.state();
        state
            .channels
            .remove(&(package.to_string(), channel_id.to_string()));
        state.deleted_channels.push(channel_id.to_string());
    }

    fn create_channels(&self, package: &str, channels: Vec<ChannelDescriptor>) -> Result<()> {
        let mut state = self.state();
        state.check("create_channels")?;
        for channel in channels {
            // 已存在的渠道只更新名称和描述，用户设置不被覆盖
            match state.channels.entry((package.to_string(), channel.id.clone())) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.name = channel.name;
                    if channel.description.is_some() {
                        existing.description = channel.description;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(channel);
                }
            }
        }
        Ok(())
    }

    fn package_info(&self, package: &str) -> Result<PackageInfo> {
        let mut state = self.state();
        state.package_queries += 1;
        state.check("package_info")?;
        state
            .packages
            .get(package)
            .copied()
            .ok_or_else(|| anyhow!("Package not found: {}", package))
    }

    fn archived_notifications(&self, original_key: &str, max: usize) -> Result<Vec<StatusBarNotification>> {
        let state = self.state();
        state.check("archived_notifications")?;
        Ok(state
            .archive
            .get(original_key)
            .map(|list| list.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }

    fn cancel(&self, key: &str) -> Result<()> {
        let mut state = self.state();
        state.check("cancel")?;
        state.cancelled.push(key.to_string());
        Ok(())
    }

    fn recast(&self, key: &str, additions: Extras) -> Result<()> {
        let mut state = self.state();
        state.check("recast")?;
        state.recasts.push((key.to_string(), additions));
        Ok(())
    }
}
