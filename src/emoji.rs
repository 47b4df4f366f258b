//! 表情代码翻译 - 把微信的方括号表情代码替换为 Unicode 表情
//!
//! 微信在通知文本中用 `[Smile]`、`[微笑]` 这类代码表示表情，通知栏无法渲染。
//! 翻译结果不含方括号代码，因此重复翻译是无操作。

use std::borrow::Cow;

/// 标题文本替换
pub trait TitleTranslator: Send + Sync {
    /// 未发生替换时返回 `Cow::Borrowed`
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// 微信表情代码表
const EMOJI_TABLE: &[(&str, &str)] = &[
    ("微笑", "😊"),
    ("Smile", "😊"),
    ("撇嘴", "😟"),
    ("Grimace", "😟"),
    ("色", "😍"),
    ("Drool", "😍"),
    ("发呆", "😳"),
    ("Scowl", "😳"),
    ("得意", "😎"),
    ("CoolGuy", "😎"),
    ("流泪", "😭"),
    ("Sob", "😭"),
    ("害羞", "☺"),
    ("Shy", "☺"),
    ("睡", "😴"),
    ("Sleep", "😴"),
    ("大哭", "😭"),
    ("Cry", "😭"),
    ("尴尬", "😰"),
    ("Awkward", "😰"),
    ("发怒", "😡"),
    ("Angry", "😡"),
    ("调皮", "😜"),
    ("Tongue", "😜"),
    ("呲牙", "😁"),
    ("Grin", "😁"),
    ("惊讶", "😲"),
    ("Surprise", "😲"),
    ("难过", "🙁"),
    ("Frown", "🙁"),
    ("偷笑", "🤭"),
    ("Chuckle", "🤭"),
    ("再见", "👋"),
    ("Bye", "👋"),
    ("强", "👍"),
    ("ThumbsUp", "👍"),
    ("弱", "👎"),
    ("ThumbsDown", "👎"),
    ("握手", "🤝"),
    ("Shake", "🤝"),
    ("胜利", "✌"),
    ("Peace", "✌"),
    ("玫瑰", "🌹"),
    ("Rose", "🌹"),
    ("爱心", "❤"),
    ("Heart", "❤"),
    ("心碎", "💔"),
    ("BrokenHeart", "💔"),
    ("蛋糕", "🎂"),
    ("Cake", "🎂"),
    ("炸弹", "💣"),
    ("Bomb", "💣"),
    ("便便", "💩"),
    ("Poop", "💩"),
    ("月亮", "🌙"),
    ("Moon", "🌙"),
    ("太阳", "🌞"),
    ("Sun", "🌞"),
    ("拥抱", "🤗"),
    ("Hug", "🤗"),
    ("OK", "👌"),
];

/// 基于代码表的表情翻译
#[derive(Debug, Default, Clone, Copy)]
pub struct EmojiTranslator;

impl EmojiTranslator {
    pub fn new() -> Self {
        Self
    }

    fn lookup(code: &str) -> Option<&'static str> {
        EMOJI_TABLE
            .iter()
            .find(|(name, _)| *name == code)
            .map(|(_, emoji)| *emoji)
    }
}

impl TitleTranslator for EmojiTranslator {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('[') {
            return Cow::Borrowed(text);
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        let mut changed = false;

        while let Some(start) = rest.find('[') {
            result.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find(']') {
                Some(end) => match Self::lookup(&after[..end]) {
                    Some(emoji) => {
                        result.push_str(emoji);
                        changed = true;
                        rest = &after[end + 1..];
                    }
                    None => {
                        result.push('[');
                        rest = after;
                    }
                },
                None => {
                    result.push('[');
                    rest = after;
                }
            }
        }
        result.push_str(rest);

        if changed {
            Cow::Owned(result)
        } else {
            Cow::Borrowed(text)
        }
    }
}
