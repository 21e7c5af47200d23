//! JSON syntax highlighting for the raw-response region.
//!
//! Escapes the text for HTML, then wraps every JSON token in a
//! `<span class="…">` where the class is one of `key`, `string`, `number`,
//! `boolean`, or `null`. The visible text of the output is exactly the input.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"("(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(true|false|null)\b|-?[0-9]+(?:\.[0-9]*)?(?:[eE][+\-]?[0-9]+)?)"#,
    )
    .expect("token pattern compiles")
});

/// Token class used as the span's CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Key,
    String,
    Number,
    Boolean,
    Null,
}

impl TokenClass {
    pub fn css(self) -> &'static str {
        match self {
            TokenClass::Key => "key",
            TokenClass::String => "string",
            TokenClass::Number => "number",
            TokenClass::Boolean => "boolean",
            TokenClass::Null => "null",
        }
    }

    fn of(token: &str) -> Self {
        if token.starts_with('"') {
            if token.ends_with(':') {
                TokenClass::Key
            } else {
                TokenClass::String
            }
        } else if token == "true" || token == "false" {
            TokenClass::Boolean
        } else if token == "null" {
            TokenClass::Null
        } else {
            TokenClass::Number
        }
    }
}

/// Escape `&`, `<`, and `>`.
pub fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Highlight a JSON text as HTML.
pub fn syntax_highlight(json: &str) -> String {
    let escaped = escape_markup(json);
    TOKEN
        .replace_all(&escaped, |caps: &Captures<'_>| {
            let token = &caps[0];
            format!(
                "<span class=\"{}\">{}</span>",
                TokenClass::of(token).css(),
                token
            )
        })
        .into_owned()
}

/// Pretty-print a value and highlight it.
pub fn highlight_value(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value).map(|json| syntax_highlight(&json))
}
