//! 宿主投递的通知记录
//!
//! `StatusBarNotification` 包含身份信息（key / original key / id），
//! `Notification` 是流水线逐步修改的通知本体。

use serde::{Deserialize, Serialize};

use super::extras::{Extras, EXTRA_TEXT, EXTRA_TITLE};

/// 仅提醒一次（直接回复后不再响铃）
pub const FLAG_ONLY_ALERT_ONCE: u32 = 0x0000_0008;
/// 仅限本机（不桥接到穿戴设备）
pub const FLAG_LOCAL_ONLY: u32 = 0x0000_0100;

/// 分组提醒策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupAlertBehavior {
    #[default]
    All,
    Summary,
    Children,
}

/// 通知本体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 发布时间（毫秒）
    pub when: i64,
    /// 滚动文本（发布方约定以发送者开头）
    #[serde(default)]
    pub ticker_text: Option<String>,
    /// 小图标着色（ARGB）
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub group_alert_behavior: GroupAlertBehavior,
    #[serde(default)]
    pub extras: Extras,
}

impl Notification {
    pub fn new(when: i64) -> Self {
        Self {
            when,
            ..Self::default()
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.extras.get_text(EXTRA_TITLE)
    }

    pub fn content_text(&self) -> Option<&str> {
        self.extras.get_text(EXTRA_TEXT)
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker_text = Some(ticker.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.extras.put_text(EXTRA_TITLE, title);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.extras.put_text(EXTRA_TEXT, content);
        self
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// 宿主侧的通知记录，携带身份信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBarNotification {
    /// 当前（可能已演化的）key
    pub key: String,
    /// 同一逻辑通知所有重投递共享的 key
    pub original_key: String,
    pub package_name: String,
    /// 发布方分配的 id（旧版本会复用）
    pub original_id: i32,
    /// 最终投递使用的 id
    pub id: i32,
    pub notification: Notification,
}

impl StatusBarNotification {
    /// 创建新记录，key 与 original key 相同
    pub fn new(
        key: impl Into<String>,
        package_name: impl Into<String>,
        id: i32,
        notification: Notification,
    ) -> Self {
        let key = key.into();
        Self {
            original_key: key.clone(),
            key,
            package_name: package_name.into(),
            original_id: id,
            id,
            notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_helpers_write_extras() {
        let n = Notification::new(1_000)
            .with_ticker("Oasis: Hello")
            .with_title("Oasis")
            .with_content("Hello");

        assert_eq!(n.title(), Some("Oasis"));
        assert_eq!(n.content_text(), Some("Hello"));
        assert_eq!(n.ticker_text.as_deref(), Some("Oasis: Hello"));
        assert_eq!(n.group_alert_behavior, GroupAlertBehavior::All);
    }

    #[test]
    fn test_new_record_shares_original_identity() {
        let sbn = StatusBarNotification::new("0|com.tencent.mm|4097|null|10086", "com.tencent.mm", 4097, Notification::new(0));
        assert_eq!(sbn.key, sbn.original_key);
        assert_eq!(sbn.id, sbn.original_id);
    }
}
