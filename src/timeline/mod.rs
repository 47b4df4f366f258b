//! 会话时间线 - 一条会话通知内按时间排序的多条消息
//!
//! `TimelineBuilder` 负责从发布方嵌入的结构化数据或历史通知重建时间线，
//! 流水线只消费重建结果并把 `add_compat_extras` 产生的 extras 合并回通知。

pub mod builder;

use serde::{Deserialize, Serialize};

use crate::notification::extras::{
    EXTRA_CONVERSATION_TITLE, EXTRA_IS_GROUP_CONVERSATION, EXTRA_MESSAGES, EXTRA_SELF_DISPLAY_NAME,
};
use crate::notification::{ExtraValue, Extras, StatusBarNotification};

pub use builder::MessagingBuilder;

/// 时间线中的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineMessage {
    /// 发送者，None 表示自己
    pub sender: Option<String>,
    pub text: String,
    /// 毫秒时间戳
    pub timestamp: i64,
}

impl TimelineMessage {
    pub fn new(sender: Option<String>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    fn to_bundle(&self) -> Extras {
        let mut bundle = Extras::new();
        bundle.put_text("text", self.text.clone());
        bundle.put("time", ExtraValue::Long(self.timestamp));
        if let Some(sender) = &self.sender {
            bundle.put_text("sender", sender.clone());
        }
        bundle
    }
}

/// 重建出的会话时间线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub self_display_name: String,
    pub conversation_title: Option<String>,
    pub group_conversation: bool,
    pub messages: Vec<TimelineMessage>,
    /// 重建器希望额外展示的 extras
    #[serde(default)]
    pub additional_extras: Extras,
}

impl Timeline {
    pub fn new(self_display_name: impl Into<String>) -> Self {
        Self {
            self_display_name: self_display_name.into(),
            conversation_title: None,
            group_conversation: false,
            messages: Vec::new(),
            additional_extras: Extras::new(),
        }
    }

    pub fn add_message(&mut self, message: TimelineMessage) -> &mut Self {
        self.messages.push(message);
        self
    }

    pub fn set_group_conversation(&mut self, group: bool) -> &mut Self {
        self.group_conversation = group;
        self
    }

    pub fn set_conversation_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.conversation_title = Some(title.into());
        self
    }

    /// 生成需要展示的 extras
    pub fn add_compat_extras(&self, extras: &mut Extras) {
        for (key, value) in self.additional_extras.iter() {
            extras.put(key, value.clone());
        }
        extras.put_text(EXTRA_SELF_DISPLAY_NAME, self.self_display_name.clone());
        if let Some(title) = &self.conversation_title {
            extras.put_text(EXTRA_CONVERSATION_TITLE, title.clone());
        }
        extras.put_bool(EXTRA_IS_GROUP_CONVERSATION, self.group_conversation);
        if !self.messages.is_empty() {
            let bundles = self.messages.iter().map(TimelineMessage::to_bundle).collect();
            extras.put(EXTRA_MESSAGES, ExtraValue::ParcelableArray(bundles));
        }
    }
}

/// 时间线重建（外部协作者）
pub trait TimelineBuilder: Send + Sync {
    /// 仅使用发布方嵌入的结构化数据重建
    fn build_from_extender(&self, sbn: &StatusBarNotification, title: &str, group_chat: bool) -> Option<Timeline>;

    /// 从 ticker / 标题 / 正文与历史通知重建，可改写通知正文
    fn build_from_archive(
        &self,
        sbn: &mut StatusBarNotification,
        title: &str,
        group_chat: bool,
        archive: &[StatusBarNotification],
    ) -> Option<Timeline>;

    /// 标记会话已读
    fn mark_read(&self, key: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compat_extras_for_group() {
        let mut timeline = Timeline::new("Me");
        timeline
            .add_message(TimelineMessage::new(Some("Oasis".into()), "Hello", 1_000))
            .set_group_conversation(true)
            .set_conversation_title("Group");

        let mut extras = Extras::new();
        timeline.add_compat_extras(&mut extras);

        assert_eq!(extras.get_text(EXTRA_SELF_DISPLAY_NAME), Some("Me"));
        assert_eq!(extras.get_text(EXTRA_CONVERSATION_TITLE), Some("Group"));
        assert_eq!(extras.get_bool(EXTRA_IS_GROUP_CONVERSATION), Some(true));
        let messages = extras.get_parcelable_array(EXTRA_MESSAGES).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].get_text("sender"), Some("Oasis"));
        assert_eq!(messages[0].get_long("time"), Some(1_000));
    }

    #[test]
    fn test_compat_extras_without_messages() {
        let timeline = Timeline::new("Me");
        let mut extras = Extras::new();
        timeline.add_compat_extras(&mut extras);
        assert!(!extras.contains_key(EXTRA_MESSAGES));
        assert!(!extras.contains_key(EXTRA_CONVERSATION_TITLE));
    }
}
