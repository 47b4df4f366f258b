//! 配置 - `~/.config/wechat-decorator/config.json`
//!
//! 所有字段都有默认值，配置文件不存在时使用默认配置。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 渠道显示名（宿主语言由这里决定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelNames {
    pub message: String,
    pub misc: String,
    pub group: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            message: "Messages".to_string(),
            misc: "Misc".to_string(),
            group: "Group conversations".to_string(),
        }
    }
}

/// 装饰器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    /// 宿主平台 API 级别（26 起支持通知渠道）
    pub sdk_level: u32,
    /// 调试模式：写入调试 extras，允许桥接到穿戴设备
    pub debug: bool,
    /// 重建时间线时读取的历史通知数量
    pub max_archived: usize,
    /// 会话中"自己"的显示名
    pub self_display_name: String,
    pub channel_names: ChannelNames,
    /// 默认日志过滤（`RUST_LOG` 优先）
    pub log_filter: String,
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            sdk_level: 34,
            debug: false,
            max_archived: 20,
            self_display_name: "Me".to_string(),
            channel_names: ChannelNames::default(),
            log_filter: "wechat_decorator=info".to_string(),
        }
    }
}

impl DecoratorConfig {
    /// 默认配置文件路径
    pub fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("wechat-decorator")
            .join("config.json")
    }

    /// 从默认路径加载
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// 从指定路径加载，文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DecoratorConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, DecoratorConfig::default());
        assert_eq!(config.max_archived, 20);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sdk_level": 23, "channel_names": {{"group": "群聊"}}}}"#
        )
        .unwrap();

        let config = DecoratorConfig::load_from(file.path()).unwrap();
        assert_eq!(config.sdk_level, 23);
        assert_eq!(config.channel_names.group, "群聊");
        assert_eq!(config.channel_names.message, "Messages");
        assert_eq!(config.self_display_name, "Me");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DecoratorConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_default_path() {
        let path = DecoratorConfig::path();
        assert!(path.ends_with(".config/wechat-decorator/config.json"));
    }
}
