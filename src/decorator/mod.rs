//! 微信通知装饰器
//!
//! # 处理流程
//! 1. 连接时迁移/创建通知渠道（`channels`）
//! 2. 每条通知经过 `pipeline::apply`：标题翻译、ID 修正、群聊判定、排序键、渠道分配、时间线重建
//! 3. 通知移除时由 `removal` 传播取消、标记已读，或在渠道被删除后静默复活
//!
//! 宿主保证生命周期回调串行投递，装饰器内部状态（版本探测结果、目标版本）只在回调线程写入，
//! 唯一的异步环节是静默复活，通过 `RevivalWorker` 的队列延后执行。

pub mod channels;
pub mod classifier;
pub mod identity;
pub mod pipeline;
pub mod removal;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::DecoratorConfig;
use crate::emoji::{EmojiTranslator, TitleTranslator};
use crate::host::NotificationHost;
use crate::timeline::{MessagingBuilder, TimelineBuilder};

use channels::ChannelLifecycle;
use identity::IdentityResolver;
use removal::{DeferredTask, RevivalWorker};

pub use pipeline::ApplyOutcome;
pub use removal::{RemovalAction, RemovalReason};

/// 微信包名
pub const WECHAT_PACKAGE: &str = "com.tencent.mm";

/// API 24：支持直接回复
pub const SDK_N: u32 = 24;
/// API 26：支持通知渠道
pub const SDK_O: u32 = 26;

/// 微信通知装饰器
pub struct WeChatDecorator {
    config: DecoratorConfig,
    host: Arc<dyn NotificationHost>,
    translator: Box<dyn TitleTranslator>,
    builder: Arc<dyn TimelineBuilder>,
    identity: IdentityResolver,
    channels: ChannelLifecycle,
    deferred: mpsc::UnboundedSender<DeferredTask>,
}

impl WeChatDecorator {
    /// 创建装饰器，同时返回处理延后任务的 worker
    pub fn new(
        config: DecoratorConfig,
        host: Arc<dyn NotificationHost>,
        translator: Box<dyn TitleTranslator>,
        builder: Arc<dyn TimelineBuilder>,
    ) -> (Self, RevivalWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = RevivalWorker::new(host.clone(), rx);
        let decorator = Self {
            config,
            host,
            translator,
            builder,
            identity: IdentityResolver::new(),
            channels: ChannelLifecycle::new(),
            deferred: tx,
        };
        (decorator, worker)
    }

    /// 使用默认的表情翻译和时间线重建
    pub fn with_defaults(config: DecoratorConfig, host: Arc<dyn NotificationHost>) -> (Self, RevivalWorker) {
        let builder = Arc::new(MessagingBuilder::new(config.self_display_name.clone()));
        Self::new(config, host, Box::new(EmojiTranslator::new()), builder)
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn channels(&self) -> &ChannelLifecycle {
        &self.channels
    }

    /// 是否支持通知渠道
    fn channels_supported(&self) -> bool {
        self.config.sdk_level >= SDK_O
    }

    /// 连接到宿主时调用
    pub fn on_connected(&mut self) {
        if !self.channels_supported() {
            debug!(sdk_level = self.config.sdk_level, "Notification channels not supported");
            return;
        }
        self.channels
            .on_connected(self.host.as_ref(), &self.config.channel_names);
    }
}
