//! 通知渠道生命周期 - 连接时迁移旧渠道并创建默认渠道
//!
//! 旧版渠道 ID 迁移到新 ID 时保留用户自定义设置（铃声、震动、呼吸灯等）。
//! 旧 ID 无论是否存在都会被删除，删除不存在的渠道是无操作，因此重复执行是安全的。

use tracing::{info, warn};

use super::{SDK_O, WECHAT_PACKAGE};
use crate::config::ChannelNames;
use crate::host::NotificationHost;
use crate::notification::{AudioAttributes, ChannelDescriptor, Importance, DEFAULT_NOTIFICATION_URI};

/// 微信所有消息通知使用的渠道
pub const CHANNEL_MESSAGE: &str = "message_channel_new_id";
/// 消息渠道的旧 ID
pub const OLD_CHANNEL_MESSAGE: &str = "message";
/// 微信杂项通知（登录确认等）使用的渠道
pub const CHANNEL_MISC: &str = "reminder_channel_id";
/// 杂项渠道的旧 ID
pub const OLD_CHANNEL_MISC: &str = "misc";
/// 微信自身免打扰模式使用的渠道
pub const CHANNEL_DND: &str = "message_dnd_mode_channel_id";
/// 群聊渠道（微信没有单独的群聊渠道）
pub const CHANNEL_GROUP_CONVERSATION: &str = "group";

/// 呼吸灯颜色
pub const LIGHT_COLOR: u32 = 0xFF00_FF00;

/// 渠道生命周期管理
#[derive(Debug, Default)]
pub struct ChannelLifecycle {
    /// 微信是否以 API 26+ 为目标版本（此时铃声由通知渠道播放）
    targeting_o: bool,
}

impl ChannelLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targeting_o(&self) -> bool {
        self.targeting_o
    }

    /// 连接时执行：迁移消息与杂项渠道，创建群聊渠道
    pub fn on_connected(&mut self, host: &dyn NotificationHost, names: &ChannelNames) {
        self.targeting_o = Self::is_producer_targeting_o(host);

        let channels = vec![
            self.make_channel(CHANNEL_GROUP_CONVERSATION, &names.group, false),
            self.migrate(host, OLD_CHANNEL_MESSAGE, CHANNEL_MESSAGE, &names.message, false),
            self.migrate(host, OLD_CHANNEL_MISC, CHANNEL_MISC, &names.misc, true),
        ];

        info!(
            targeting_o = self.targeting_o,
            count = channels.len(),
            "Creating notification channels"
        );
        if let Err(e) = host.create_channels(WECHAT_PACKAGE, channels) {
            warn!(error = %e, "Failed to create notification channels");
        }
    }

    /// 把旧渠道迁移到新 ID，旧渠道不存在时创建默认渠道
    pub fn migrate(
        &self,
        host: &dyn NotificationHost,
        old_id: &str,
        new_id: &str,
        name: &str,
        silent: bool,
    ) -> ChannelDescriptor {
        let legacy = host.get_channel(WECHAT_PACKAGE, old_id);
        host.delete_channel(WECHAT_PACKAGE, old_id);

        match legacy {
            Some(legacy) => {
                info!(from = %old_id, to = %new_id, "Migrating notification channel");
                self.clone_channel(&legacy, new_id, name)
            }
            None => self.make_channel(new_id, name, silent),
        }
    }

    /// 创建默认渠道：高重要性（允许横幅），绿色呼吸灯
    pub fn make_channel(&self, id: &str, name: &str, silent: bool) -> ChannelDescriptor {
        let mut channel = ChannelDescriptor::new(id, name, Importance::High);
        if silent {
            channel.set_sound(None, None);
        } else {
            channel.set_sound(self.default_sound(), Some(AudioAttributes::instant_message()));
        }
        channel.lights_enabled = true;
        channel.light_color = LIGHT_COLOR;
        channel
    }

    /// 复制旧渠道的用户设置到新 ID
    pub fn clone_channel(&self, legacy: &ChannelDescriptor, id: &str, name: &str) -> ChannelDescriptor {
        let mut clone = ChannelDescriptor::new(id, name, legacy.importance);
        clone.group = legacy.group.clone();
        clone.description = legacy.description.clone();
        clone.lockscreen_visibility = legacy.lockscreen_visibility;
        clone.set_sound(
            legacy.sound.clone().or_else(|| self.default_sound()),
            legacy.audio_attributes,
        );
        clone.bypass_dnd = legacy.bypass_dnd;
        clone.lights_enabled = legacy.lights_enabled;
        clone.light_color = legacy.light_color;
        clone.show_badge = legacy.show_badge;
        clone.vibration_pattern = legacy.vibration_pattern.clone();
        clone
    }

    /// 目标版本低于 26 的微信自己播放铃声，渠道不再提供铃声
    fn default_sound(&self) -> Option<String> {
        self.targeting_o.then(|| DEFAULT_NOTIFICATION_URI.to_string())
    }

    fn is_producer_targeting_o(host: &dyn NotificationHost) -> bool {
        match host.package_info(WECHAT_PACKAGE) {
            Ok(info) => info.target_sdk >= SDK_O,
            Err(e) => {
                warn!(error = %e, "Failed to query target SDK, assuming below 26");
                false
            }
        }
    }
}
