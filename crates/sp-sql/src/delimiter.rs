//! Statement delimiter tracking
//!
//! Scripts may switch the statement terminator with a `DELIMITER <token>`
//! line so routine bodies can contain `;`. [`DelimiterState`] follows those
//! switches and rewrites custom-terminated lines back to the default
//! terminator.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Terminator used when a script does not switch delimiters
pub const DEFAULT_DELIMITER: &str = ";";

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:#|--|//)\s*(.*?)\s*$").expect("valid regex"))
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*DELIMITER\s+(.+?)\s*$").expect("valid regex"))
}

/// What a single script line means to the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `#`, `--` or `//` comment; carries the comment text
    Comment(&'a str),
    /// `DELIMITER <token>`; carries the token
    Directive(&'a str),
    /// Anything else
    Sql(&'a str),
}

/// Classify one script line
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = comment_re().captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::Comment(text);
    }
    if let Some(token) = directive_re().captures(line).and_then(|c| c.get(1)) {
        return LineKind::Directive(token.as_str());
    }
    LineKind::Sql(line)
}

/// Case-insensitive check that `line` ends with `token`, ignoring trailing whitespace
fn ends_with_token(line: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let trimmed = line.trim_end();
    let Some(start) = trimmed.len().checked_sub(token.len()) else {
        return false;
    };
    trimmed.is_char_boundary(start) && trimmed[start..].eq_ignore_ascii_case(token)
}

/// Per-script delimiter state: the default terminator and the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterState {
    default: String,
    active: String,
}

impl DelimiterState {
    /// Start with `default` active
    pub fn new(default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            active: default.clone(),
            default,
        }
    }

    /// The default terminator
    pub fn default_delimiter(&self) -> &str {
        &self.default
    }

    /// The terminator currently in force
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Whether a custom terminator is in force
    pub fn is_custom(&self) -> bool {
        self.active != self.default
    }

    /// Apply a `DELIMITER` directive
    pub fn switch(&mut self, token: &str) {
        log::debug!("Delimiter switched to {token}");
        self.active = token.to_string();
    }

    /// Whether `line` completes a statement under the active terminator
    pub fn terminates(&self, line: &str) -> bool {
        ends_with_token(line, &self.active)
    }

    /// Rewrite a custom-terminated line so it ends with the default terminator.
    ///
    /// `END;$$` and `END$$` both become `END;`. Lines that are not terminated
    /// by the active custom delimiter are returned unchanged.
    pub fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !self.is_custom() || !self.terminates(line) {
            return Cow::Borrowed(line);
        }

        let trimmed = line.trim_end();
        let mut body = &trimmed[..trimmed.len() - self.active.len()];
        if ends_with_token(body, &self.default) {
            let inner = body.trim_end();
            body = &inner[..inner.len() - self.default.len()];
        }
        Cow::Owned(format!("{}{}", body.trim_end(), self.default))
    }

    /// Remove one trailing default terminator from finished statement text
    pub fn strip_default(&self, text: &str) -> String {
        let trimmed = text.trim_end();
        if ends_with_token(trimmed, &self.default) {
            trimmed[..trimmed.len() - self.default.len()]
                .trim_end()
                .to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for DelimiterState {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

#[cfg(test)]
#[path = "delimiter_test.rs"]
mod tests;
