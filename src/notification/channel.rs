//! 通知渠道描述

use serde::{Deserialize, Serialize};

/// 系统默认通知铃声
pub const DEFAULT_NOTIFICATION_URI: &str = "content://settings/system/notification_sound";

/// 渠道重要性
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    None,
    Min,
    Low,
    Default,
    /// 允许横幅（heads-up）
    High,
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::None => "NONE",
            Importance::Min => "MIN",
            Importance::Low => "LOW",
            Importance::Default => "DEFAULT",
            Importance::High => "HIGH",
        }
    }
}

/// 锁屏可见性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// 未指定（跟随系统）
    #[default]
    NoOverride,
    Public,
    Private,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioContentType {
    Unknown,
    Speech,
    Music,
    Sonification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioUsage {
    Unknown,
    Notification,
    NotificationCommunicationInstant,
}

/// 铃声播放属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttributes {
    pub content_type: AudioContentType,
    pub usage: AudioUsage,
}

impl AudioAttributes {
    /// 即时通讯消息提示音
    pub fn instant_message() -> Self {
        Self {
            content_type: AudioContentType::Sonification,
            usage: AudioUsage::NotificationCommunicationInstant,
        }
    }
}

/// 通知渠道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lockscreen_visibility: Visibility,
    /// 铃声 URI，None 表示静音
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub audio_attributes: Option<AudioAttributes>,
    #[serde(default)]
    pub bypass_dnd: bool,
    #[serde(default)]
    pub lights_enabled: bool,
    /// 呼吸灯颜色（ARGB），0 表示未设置
    #[serde(default)]
    pub light_color: u32,
    #[serde(default = "default_true")]
    pub show_badge: bool,
    #[serde(default)]
    pub vibration_pattern: Option<Vec<i64>>,
}

fn default_true() -> bool {
    true
}

impl ChannelDescriptor {
    /// 创建渠道（其余属性取平台默认值）
    pub fn new(id: impl Into<String>, name: impl Into<String>, importance: Importance) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            importance,
            group: None,
            description: None,
            lockscreen_visibility: Visibility::NoOverride,
            sound: None,
            audio_attributes: None,
            bypass_dnd: false,
            lights_enabled: false,
            light_color: 0,
            show_badge: true,
            vibration_pattern: None,
        }
    }

    /// 设置铃声，None 表示静音
    pub fn set_sound(&mut self, sound: Option<String>, audio_attributes: Option<AudioAttributes>) {
        self.sound = sound;
        self.audio_attributes = audio_attributes;
    }

    pub fn is_silent(&self) -> bool {
        self.sound.is_none()
    }
}
