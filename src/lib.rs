//! WeChat Decorator - 把微信通知改写为会话样式通知

pub mod config;
pub mod decorator;
pub mod emoji;
pub mod host;
pub mod logging;
pub mod notification;
pub mod timeline;

pub use config::{ChannelNames, DecoratorConfig};
pub use decorator::{ApplyOutcome, RemovalAction, RemovalReason, WeChatDecorator, WECHAT_PACKAGE};
pub use decorator::classifier::is_group_chat;
pub use decorator::removal::RevivalWorker;
pub use emoji::{EmojiTranslator, TitleTranslator};
pub use host::{InMemoryHost, NotificationHost, PackageInfo};
pub use notification::{ChannelDescriptor, ExtraValue, Extras, Notification, StatusBarNotification};
pub use timeline::{MessagingBuilder, Timeline, TimelineBuilder, TimelineMessage};
