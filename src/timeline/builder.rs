//! 时间线重建的默认实现
//!
//! ## 重建策略
//! 1. 优先读取发布方嵌入的车载扩展数据（`android.car.EXTENSIONS`），其中有完整的消息列表
//! 2. 否则从历史通知（发布方原始投递）和当前通知的正文逐条解析：
//!    - 去掉未读数前缀 `[2]` / `[2条]`
//!    - 群聊按 `发送者: 内容` 拆分，单聊去掉 `标题: ` 前缀
//! 3. 按 (时间, 发送者, 内容) 去重，按时间排序
//! 4. 已读水位之前的消息不再展示

use chrono::Utc;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{Timeline, TimelineBuilder, TimelineMessage};
use crate::decorator::classifier::SENDER_MESSAGE_SEPARATOR;
use crate::notification::extras::{EXTRA_CAR_EXTENDER, EXTRA_TEXT};
use crate::notification::{Notification, StatusBarNotification};

const KEY_CAR_CONVERSATION: &str = "car_conversation";
const KEY_CAR_MESSAGES: &str = "messages";
const KEY_CAR_AUTHOR: &str = "author";
const KEY_CAR_TEXT: &str = "text";
const KEY_CAR_TIMESTAMP: &str = "timestamp";

/// 最多保留的已读水位数量，超出时淘汰最早的水位
pub const MAX_READ_MARKS: usize = 1024;

/// 默认时间线重建器
pub struct MessagingBuilder {
    self_display_name: String,
    /// 未读数前缀，如 `[2]`、`[12条]`
    unread_prefix: Regex,
    /// 已读水位: original key -> 毫秒时间戳
    read_marks: Mutex<HashMap<String, i64>>,
}

impl MessagingBuilder {
    pub fn new(self_display_name: impl Into<String>) -> Self {
        Self {
            self_display_name: self_display_name.into(),
            unread_prefix: Regex::new(r"^\[\d+[^\]\d]{0,2}\]").expect("valid unread prefix pattern"),
            read_marks: Mutex::new(HashMap::new()),
        }
    }

    fn read_marks(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        match self.read_marks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 以指定时间标记已读（测试用）
    pub fn mark_read_at(&self, key: &str, millis: i64) {
        let mut marks = self.read_marks();
        if !marks.contains_key(key) && marks.len() >= MAX_READ_MARKS {
            let oldest = marks.iter().min_by_key(|(_, mark)| **mark).map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                marks.remove(&oldest);
            }
        }
        let mark = marks.entry(key.to_string()).or_insert(millis);
        *mark = (*mark).max(millis);
    }

    pub fn read_mark(&self, key: &str) -> Option<i64> {
        self.read_marks().get(key).copied()
    }

    /// 去掉未读数前缀
    fn strip_unread_prefix<'a>(&self, content: &'a str) -> &'a str {
        match self.unread_prefix.find(content) {
            Some(m) => &content[m.end()..],
            None => content,
        }
    }

    /// 从一条通知的正文解析出消息
    fn parse_message(&self, n: &Notification, title: &str, group_chat: bool) -> Option<TimelineMessage> {
        let content = n.content_text()?;
        let body = self.strip_unread_prefix(content);

        let (sender, text) = if group_chat {
            match body.split_once(SENDER_MESSAGE_SEPARATOR) {
                Some((sender, text)) => (sender, text),
                None => (title, body),
            }
        } else {
            let text = body
                .strip_prefix(title)
                .and_then(|rest| rest.strip_prefix(SENDER_MESSAGE_SEPARATOR))
                .unwrap_or(body);
            (title, text)
        };

        Some(TimelineMessage::new(Some(sender.to_string()), text, n.when))
    }
}

impl TimelineBuilder for MessagingBuilder {
    fn build_from_extender(&self, sbn: &StatusBarNotification, title: &str, _group_chat: bool) -> Option<Timeline> {
        let conversation = sbn
            .notification
            .extras
            .get_bundle(EXTRA_CAR_EXTENDER)?
            .get_bundle(KEY_CAR_CONVERSATION)?;
        let raw_messages = conversation.get_parcelable_array(KEY_CAR_MESSAGES)?;

        let mut messages: Vec<TimelineMessage> = raw_messages
            .iter()
            .filter_map(|bundle| {
                let text = bundle.get_text(KEY_CAR_TEXT)?;
                // 单聊的消息可能不带作者
                let sender = bundle.get_text(KEY_CAR_AUTHOR).unwrap_or(title);
                let timestamp = bundle
                    .get_long(KEY_CAR_TIMESTAMP)
                    .unwrap_or(sbn.notification.when);
                Some(TimelineMessage::new(Some(sender.to_string()), text, timestamp))
            })
            .collect();
        if messages.is_empty() {
            return None;
        }
        messages.sort_by_key(|m| m.timestamp);

        debug!(key = %sbn.key, count = messages.len(), "Timeline built from extender");
        let mut timeline = Timeline::new(self.self_display_name.clone());
        timeline.messages = messages;
        Some(timeline)
    }

    fn build_from_archive(
        &self,
        sbn: &mut StatusBarNotification,
        title: &str,
        group_chat: bool,
        archive: &[StatusBarNotification],
    ) -> Option<Timeline> {
        let read_mark = self.read_mark(&sbn.original_key);

        // 归档最新在前，这里按时间正序处理，最后追加当前通知
        let parsed: Vec<TimelineMessage> = archive
            .iter()
            .rev()
            .map(|archived| &archived.notification)
            .chain(std::iter::once(&sbn.notification))
            .filter_map(|n| self.parse_message(n, title, group_chat))
            .collect();
        if parsed.is_empty() {
            return None;
        }

        // 已读的历史都已滚出归档，水位不再起作用
        if let Some(mark) = read_mark {
            if parsed.iter().all(|m| m.timestamp > mark) {
                debug!(key = %sbn.original_key, "Read mark expired");
                self.read_marks().remove(&sbn.original_key);
            }
        }

        let mut seen = HashSet::new();
        let mut messages: Vec<TimelineMessage> = parsed
            .into_iter()
            .filter(|m| read_mark.map_or(true, |mark| m.timestamp > mark))
            .filter(|m| seen.insert((m.timestamp, m.sender.clone(), m.text.clone())))
            .collect();
        messages.sort_by_key(|m| m.timestamp);

        if let Some(latest) = messages.last() {
            sbn.notification.extras.put_text(EXTRA_TEXT, latest.text.clone());
        }

        debug!(
            key = %sbn.key,
            archived = archive.len(),
            count = messages.len(),
            "Timeline built from archive"
        );
        let mut timeline = Timeline::new(self.self_display_name.clone());
        timeline.messages = messages;
        Some(timeline)
    }

    fn mark_read(&self, key: &str) {
        let now = Utc::now().timestamp_millis();
        debug!(key = %key, "Mark conversation read");
        self.mark_read_at(key, now);
    }
}
