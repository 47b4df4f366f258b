//! 群聊判定
//!
//! 微信不提供"是否群聊"的字段，只能根据 ticker / 标题 / 正文中发送者名字的重复方式推断。
//! 已观察到的几种形态：
//!
//! | 形态 | Ticker | 标题 | 正文 |
//! |------|--------|------|------|
//! | 单聊 1 条未读 | `Oasis: Hello` | `Oasis` | `Hello` |
//! | 单聊多条未读 | `Oasis: Hello` | `Oasis` | `[2]Oasis: Hello` |
//! | 服务号 1 条未读 | `FedEx: Delivered` | `FedEx` | `[Link] Delivered` |
//! | 群聊 1 条未读 | `Oasis: Hello` | `Group` | `Oasis: Hello` |
//! | 群聊多条未读 | `Oasis: [Link] Mm` | `Group` | `[2]Oasis: [Link] Mm` |
//!
//! 无法确定时偏向"非群聊"：把单聊误放进群聊渠道的代价更高。

/// 发送者与消息之间的分隔符
pub const SENDER_MESSAGE_SEPARATOR: &str = ": ";

/// 在正文中查找的 ticker 前缀长度（字符）
const TICKER_PREFIX_CHARS: usize = 10;

/// 未读数前缀的最大长度（最多 999 条未读: `[999条]`）
const MAX_UNREAD_PREFIX_OFFSET: usize = 6;

/// 判断是否群聊
pub fn is_group_chat(ticker: &str, title: &str, content: Option<&str>) -> bool {
    // 服务通知没有正文
    let Some(content) = content else {
        return false;
    };

    // ticker 可能带尾随空格，总是以发送者开头
    let ticker = ticker.trim();
    let prefix = match ticker.char_indices().nth(TICKER_PREFIX_CHARS) {
        Some((end, _)) => &ticker[..end],
        None => ticker,
    };

    // 没找到：单聊 1 条未读（正文不含发送者）
    let Some(byte_pos) = content.find(prefix) else {
        return false;
    };
    let pos = content[..byte_pos].chars().count();
    if pos > MAX_UNREAD_PREFIX_OFFSET {
        return false;
    }

    let message = if pos > 0 && content.starts_with('[') {
        &content[byte_pos..]
    } else {
        content
    };
    // 以 "标题: " 开头的是多条未读的单聊
    !message.starts_with(&format!("{title}{SENDER_MESSAGE_SEPARATOR}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_message_single_unread() {
        assert!(!is_group_chat("Oasis: Hello", "Oasis", Some("Hello")));
    }

    #[test]
    fn test_direct_message_multiple_unread() {
        assert!(!is_group_chat("Oasis: Hello", "Oasis", Some("[2]Oasis: Hello")));
    }

    #[test]
    fn test_service_message() {
        assert!(!is_group_chat("FedEx: Delivered", "FedEx", Some("[Link] Delivered")));
    }

    #[test]
    fn test_group_chat_single_unread() {
        assert!(is_group_chat("Oasis: Hello", "Group", Some("Oasis: Hello")));
    }

    #[test]
    fn test_group_chat_multiple_unread() {
        assert!(is_group_chat("Oasis: [Link] Mm", "Group", Some("[2]Oasis: [Link] Mm")));
    }

    #[test]
    fn test_missing_content() {
        assert!(!is_group_chat("Oasis: Hello", "Group", None));
    }

    #[test]
    fn test_ticker_trailing_spaces_trimmed() {
        assert!(is_group_chat("Oasis: Hi  ", "Group", Some("Oasis: Hi")));
    }

    #[test]
    fn test_unread_prefix_boundary() {
        // "[999条]" 占 6 个字符，仍在窗口内
        assert!(is_group_chat("Oasis: Hello", "群聊", Some("[999条]Oasis: Hello")));
        // 超出窗口视为单聊
        assert!(!is_group_chat("Oasis: Hello", "群聊", Some("[1000条]Oasis: Hello")));
    }

    #[test]
    fn test_chinese_names_counted_by_chars() {
        assert!(is_group_chat("张三: 你好", "家人群", Some("[3条]张三: 你好")));
        assert!(!is_group_chat("张三: 你好", "张三", Some("[3条]张三: 你好")));
    }
}
