use serde::{Deserialize, Serialize};

/// The section-sign escape understood by game clients.
pub const COLOR_CHAR: char = '§';

/// The human-typable marker conventionally used in config files.
pub const COLOR_MARKER: char = '&';

/// A node of display text attached to items, titles and chat.
///
/// Only `Plain` text has a stored form; the other variants are resolved
/// client-side and are dropped when written into a config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Text {
    /// Literal text, possibly carrying `§` color codes.
    Plain(String),
    /// A translation key resolved against the client's locale.
    Translate(String),
    /// A keybind reference rendered as the client's current binding.
    Keybind(String),
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// The literal contents, or `None` for client-resolved variants.
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text),
            _ => None,
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_owned())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

/// True for characters that form a color or formatting code after a marker.
fn is_format_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r' | 'x')
}

/// Rewrites `marker`-escaped color codes into native `§` markup.
///
/// A marker followed by a valid code character becomes [`COLOR_CHAR`] plus
/// the lowercased code; any other occurrence of the marker is left untouched.
pub fn translate_color_codes(marker: char, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == marker {
            if let Some(&next) = chars.peek() {
                if is_format_code(next) {
                    out.push(COLOR_CHAR);
                    out.push(next.to_ascii_lowercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_rewrites_marker_codes() {
        assert_eq!(
            translate_color_codes('&', "&aWelcome to the &6Outpost"),
            "§aWelcome to the §6Outpost"
        );
    }

    #[test]
    fn translate_lowercases_codes() {
        assert_eq!(translate_color_codes('&', "&Cwarning"), "§cwarning");
    }

    #[test]
    fn translate_leaves_non_codes_alone() {
        assert_eq!(translate_color_codes('&', "fish & chips"), "fish & chips");
        assert_eq!(translate_color_codes('&', "trailing &"), "trailing &");
    }

    #[test]
    fn translate_doubled_marker_consumes_second_pair() {
        assert_eq!(translate_color_codes('&', "&&c"), "&§c");
    }

    #[test]
    fn plain_extraction() {
        assert_eq!(Text::plain("hi").as_plain(), Some("hi"));
        assert_eq!(Text::Translate("menu.title".into()).as_plain(), None);
        assert_eq!(Text::Keybind("key.sneak".into()).as_plain(), None);
    }
}
