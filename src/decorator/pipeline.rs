//! 通知改写流水线
//!
//! 每条通知同步处理，任何失败都降级为"保持原样"，不会影响其他通知。

use std::borrow::Cow;
use tracing::{debug, error, warn};

use super::channels::{CHANNEL_DND, CHANNEL_GROUP_CONVERSATION, CHANNEL_MESSAGE, CHANNEL_MISC};
use super::classifier::is_group_chat;
use super::identity::title_hash;
use super::{WeChatDecorator, SDK_N};
use crate::notification::extras::{
    EXTRA_CONVERSATION_TITLE, EXTRA_REMOTE_INPUT_HISTORY, EXTRA_SHOW_WHEN, EXTRA_TEMPLATE, EXTRA_TITLE,
    KEY_DEBUG, KEY_SILENT_REVIVAL, TEMPLATE_MESSAGING,
};
use crate::notification::{
    Extras, GroupAlertBehavior, StatusBarNotification, FLAG_LOCAL_ONLY, FLAG_ONLY_ALERT_ONCE,
};

/// 微信品牌色，用于小图标着色
pub const PRIMARY_COLOR: u32 = 0xFF33_B332;

/// 群聊排序偏移：按一天前的消息排序，始终排在同时间的单聊之后
pub const GROUP_CHAT_SORT_KEY_SHIFT: i64 = 24 * 60 * 60 * 1000;

/// 让宿主按"尚未分组"自动分组的特殊分组名
pub const AUTO_GROUP_KEY: &str = "nevo.group.auto";

/// 单条通知的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// 标题缺失，通知保持原样
    Rejected,
    /// 非会话通知（如网页登录确认），只分配渠道
    NonConversation,
    /// 无法重建时间线，保持普通通知
    NoTimeline,
    /// 已改写为会话样式
    Decorated {
        group_chat: bool,
        /// 合并时被拒绝的 extras 键
        rejected_extras: Vec<String>,
    },
}

/// 计算排序键
///
/// 宿主按升序排列，时间取反后新消息在前；群聊额外偏移一天。
/// 用 128 位计算，任何 `when` 都不会溢出。
pub fn sort_key(when: i64, group_chat: bool) -> String {
    let shift = if group_chat { GROUP_CHAT_SORT_KEY_SHIFT } else { 0 };
    (i128::from(i64::MAX) - i128::from(when) + i128::from(shift)).to_string()
}

impl WeChatDecorator {
    /// 改写一条通知
    pub fn apply(&mut self, sbn: &mut StatusBarNotification) -> ApplyOutcome {
        let raw_title = match sbn.notification.title() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => {
                error!(key = %sbn.key, "Title is missing");
                return ApplyOutcome::Rejected;
            }
        };

        let translated = match self.translator.translate(&raw_title) {
            Cow::Owned(title) => Some(title),
            Cow::Borrowed(_) => None,
        };
        let title = match translated {
            Some(title) => {
                sbn.notification.extras.put_text(EXTRA_TITLE, title.clone());
                title
            }
            None => raw_title,
        };

        let original_id = sbn.original_id;
        if self.config.debug {
            let ticker = sbn.notification.ticker_text.as_deref().unwrap_or("null");
            let debug_info = format!("ID:{},t:{}", original_id, ticker);
            sbn.notification.extras.put_text(KEY_DEBUG, debug_info);
        }

        sbn.notification.color = PRIMARY_COLOR;

        let channels_supported = self.channels_supported();
        let channel_id = if channels_supported {
            sbn.notification.channel_id.clone()
        } else {
            None
        };
        let ticker = match sbn.notification.ticker_text.clone() {
            Some(ticker) if channel_id.as_deref() != Some(CHANNEL_MISC) => ticker,
            _ => {
                if channels_supported && channel_id.is_none() {
                    sbn.notification.channel_id = Some(CHANNEL_MISC.to_string());
                }
                debug!(title = %title, "Skip further process for non-conversation notification");
                return ApplyOutcome::NonConversation;
            }
        };

        // 旧版微信复用计数器 ID，改用当前（已翻译的）标题哈希，避免多次演化后哈希漂移
        if !self.identity.is_distinct_id(
            &sbn.notification,
            &sbn.package_name,
            original_id,
            self.host.as_ref(),
        ) {
            sbn.id = title_hash(&title);
        }

        let n = &mut sbn.notification;
        n.extras.put_bool(EXTRA_SHOW_WHEN, true);
        if self.config.debug {
            n.flags &= !FLAG_LOCAL_ONLY;
        }

        let group_chat = is_group_chat(&ticker, &title, n.content_text());
        n.sort_key = Some(sort_key(n.when, group_chat));

        if channels_supported {
            if n.extras.contains_key(KEY_SILENT_REVIVAL) {
                // 只让摘要提醒，单条通知因此静默
                n.group = Some(AUTO_GROUP_KEY.to_string());
                n.group_alert_behavior = GroupAlertBehavior::Summary;
            }
            if group_chat && channel_id.as_deref() != Some(CHANNEL_DND) {
                n.channel_id = Some(CHANNEL_GROUP_CONVERSATION.to_string());
            } else if channel_id.is_none() {
                n.channel_id = Some(CHANNEL_MESSAGE.to_string());
            }
        }

        let timeline = match self.builder.build_from_extender(sbn, &title, group_chat) {
            Some(timeline) => Some(timeline),
            None => {
                let archive = self.archived(&sbn.original_key);
                self.builder
                    .build_from_archive(sbn, &title, group_chat, &archive)
            }
        };
        let mut timeline = match timeline {
            Some(timeline) if !timeline.messages.is_empty() => timeline,
            _ => {
                debug!(key = %sbn.key, "No message to show as conversation");
                return ApplyOutcome::NoTimeline;
            }
        };

        if group_chat {
            timeline
                .set_group_conversation(true)
                .set_conversation_title(title.clone());
        }
        let mut addition = Extras::new();
        timeline.add_compat_extras(&mut addition);

        let extras = &mut sbn.notification.extras;
        let rejected_extras = extras.merge_accepted(&addition);
        extras.put_text(EXTRA_CONVERSATION_TITLE, title);
        extras.put_text(EXTRA_TEMPLATE, TEMPLATE_MESSAGING);

        // 直接回复后不再提醒
        if self.config.sdk_level >= SDK_N && extras.get_text_array(EXTRA_REMOTE_INPUT_HISTORY).is_some() {
            sbn.notification.flags |= FLAG_ONLY_ALERT_ONCE;
        }

        debug!(
            key = %sbn.key,
            id = sbn.id,
            group_chat,
            messages = timeline.messages.len(),
            "Notification decorated"
        );
        ApplyOutcome::Decorated {
            group_chat,
            rejected_extras,
        }
    }

    /// 查询同一会话的历史通知，失败时视为没有历史
    fn archived(&self, original_key: &str) -> Vec<StatusBarNotification> {
        match self
            .host
            .archived_notifications(original_key, self.config.max_archived)
        {
            Ok(archive) => archive,
            Err(e) => {
                warn!(key = %original_key, error = %e, "Failed to query archived notifications");
                Vec::new()
            }
        }
    }
}
