//! 通知 extras - 宿主通知携带的开放式键值包
//!
//! extras 既是输入信号（标题、正文、应用信息），也是输出通道（会话模板、会话标题）。
//! 值的形状用 `ExtraValue` 标记联合表达，合并时只接受固定的几种形状。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

pub const EXTRA_TITLE: &str = "android.title";
pub const EXTRA_TEXT: &str = "android.text";
pub const EXTRA_SHOW_WHEN: &str = "android.showWhen";
pub const EXTRA_TEMPLATE: &str = "android.template";
pub const EXTRA_CONVERSATION_TITLE: &str = "android.conversationTitle";
pub const EXTRA_REMOTE_INPUT_HISTORY: &str = "android.remoteInputHistory";
pub const EXTRA_APP_INFO: &str = "android.appInfo";
pub const EXTRA_MESSAGES: &str = "android.messages";
pub const EXTRA_SELF_DISPLAY_NAME: &str = "android.selfDisplayName";
pub const EXTRA_IS_GROUP_CONVERSATION: &str = "android.isGroupConversation";
pub const EXTRA_CAR_EXTENDER: &str = "android.car.EXTENSIONS";

/// 会话样式模板名
pub const TEMPLATE_MESSAGING: &str = "android.app.Notification$MessagingStyle";

/// 静默复活标记（由渠道删除后的重投递写入）
pub const KEY_SILENT_REVIVAL: &str = "nevo.wechat.revival";
/// 调试信息（仅 debug 配置下写入）
pub const KEY_DEBUG: &str = "nevo.debug";

/// extras 中的单个值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExtraValue {
    Text(String),
    TextArray(Vec<String>),
    Bool(bool),
    Int(i32),
    Long(i64),
    Bundle(Extras),
    ParcelableArray(Vec<Extras>),
    /// 发布方应用信息（宿主重投递时会附带）
    AppInfo {
        package_name: String,
        #[serde(default)]
        version_code: Option<i64>,
    },
}

impl ExtraValue {
    /// 值的形状名（用于日志）
    pub fn shape(&self) -> &'static str {
        match self {
            ExtraValue::Text(_) => "text",
            ExtraValue::TextArray(_) => "text_array",
            ExtraValue::Bool(_) => "bool",
            ExtraValue::Int(_) => "int",
            ExtraValue::Long(_) => "long",
            ExtraValue::Bundle(_) => "bundle",
            ExtraValue::ParcelableArray(_) => "parcelable_array",
            ExtraValue::AppInfo { .. } => "app_info",
        }
    }

    /// 是否允许合并进通知 extras
    fn is_mergeable(&self) -> bool {
        matches!(
            self,
            ExtraValue::Text(_)
                | ExtraValue::ParcelableArray(_)
                | ExtraValue::Bundle(_)
                | ExtraValue::Bool(_)
        )
    }
}

/// 有序的 extras 键值包
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extras(BTreeMap<String, ExtraValue>);

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: ExtraValue) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtraValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtraValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 读取文本值，其他形状返回 None
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ExtraValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn put_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, ExtraValue::Text(value.into()));
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ExtraValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.put(key, ExtraValue::Bool(value));
    }

    /// 读取整数值，Int 和 Long 都接受
    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ExtraValue::Long(v)) => Some(*v),
            Some(ExtraValue::Int(v)) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn get_text_array(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key) {
            Some(ExtraValue::TextArray(items)) => Some(items),
            _ => None,
        }
    }

    pub fn get_bundle(&self, key: &str) -> Option<&Extras> {
        match self.0.get(key) {
            Some(ExtraValue::Bundle(b)) => Some(b),
            _ => None,
        }
    }

    pub fn get_parcelable_array(&self, key: &str) -> Option<&[Extras]> {
        match self.0.get(key) {
            Some(ExtraValue::ParcelableArray(items)) => Some(items),
            _ => None,
        }
    }

    /// 把 `addition` 中可接受形状的值复制进来
    ///
    /// 只接受 text / parcelable array / bundle / bool，其他形状记录错误并跳过。
    /// 返回被拒绝的键。
    pub fn merge_accepted(&mut self, addition: &Extras) -> Vec<String> {
        let mut rejected = Vec::new();
        for (key, value) in addition.iter() {
            if value.is_mergeable() {
                self.put(key, value.clone());
            } else {
                error!(key = %key, shape = value.shape(), "Unsupported extra");
                rejected.push(key.to_string());
            }
        }
        rejected
    }
}

impl FromIterator<(String, ExtraValue)> for Extras {
    fn from_iter<T: IntoIterator<Item = (String, ExtraValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
