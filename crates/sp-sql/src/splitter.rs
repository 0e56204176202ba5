//! Delimiter-aware statement splitting
//!
//! [`split_statements`] walks a script line by line and yields one
//! [`Statement`] per terminated statement. Routine bodies wrapped in
//! `DELIMITER $$ ... $$ DELIMITER ;` come out as a single statement.
//!
//! Content after the last terminator is never emitted; it stays available
//! through [`Statements::remainder`] once the iterator is exhausted.

use crate::delimiter::{classify_line, DelimiterState, LineKind, DEFAULT_DELIMITER};
use serde::Serialize;
use std::borrow::Cow;

/// Placeholder replaced by the `LOAD DATA` locality prefix
pub const LOCAL_PLACEHOLDER: &str = "{:local:}";

/// Placeholder replaced by the data directory path
pub const DATA_PLACEHOLDER: &str = "{:data:}";

/// Values substituted into statements before execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    /// Replacement for `{:local:}`; `None` leaves the token untouched
    pub local: Option<String>,
    /// Replacement for `{:data:}`; `None` or empty leaves the token untouched
    pub data: Option<String>,
}

impl Placeholders {
    /// Substitute both placeholders in `text`
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        if let Some(local) = &self.local {
            out = out.replace(LOCAL_PLACEHOLDER, local);
        }
        if let Some(data) = self.data.as_deref().filter(|d| !d.is_empty()) {
            out = out.replace(DATA_PLACEHOLDER, data);
        }
        out
    }
}

/// Options for [`split_statements`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Default statement terminator
    pub delimiter: String,
    /// Placeholder values
    pub placeholders: Placeholders,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            placeholders: Placeholders::default(),
        }
    }
}

/// One executable statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Statement text without its terminator
    pub text: String,
    /// 1-based line where the statement starts
    pub source_line: usize,
}

/// Lazy iterator over the statements of one script.
///
/// Owns its delimiter state, so two iterators over the same text never
/// influence each other.
pub struct Statements<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    state: DelimiterState,
    placeholders: Placeholders,
    buffer: Vec<Cow<'a, str>>,
    start_line: usize,
}

impl<'a> Statements<'a> {
    /// The delimiter state as of the last consumed line
    pub fn delimiter_state(&self) -> &DelimiterState {
        &self.state
    }

    /// Unterminated text buffered so far, if any.
    ///
    /// After the iterator returns `None` this is the trailing content that
    /// was dropped.
    pub fn remainder(&self) -> Option<String> {
        let joined = self.buffer.join("\n");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

fn finish_statement(
    buffer: &mut Vec<Cow<'_, str>>,
    state: &DelimiterState,
    placeholders: &Placeholders,
    source_line: usize,
) -> Statement {
    let joined = buffer.join("\n");
    buffer.clear();
    let text = state.strip_default(joined.trim());
    Statement {
        text: placeholders.apply(&text),
        source_line,
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        for (idx, line) in self.lines.by_ref() {
            // A bare custom terminator such as `//` must not be taken for a comment.
            let is_bare_terminator =
                self.state.is_custom() && line.trim().eq_ignore_ascii_case(self.state.active());

            let line = if is_bare_terminator {
                line
            } else {
                match classify_line(line) {
                    LineKind::Comment(text) => {
                        log::debug!("COMMENT: {text}");
                        continue;
                    }
                    LineKind::Directive(token) => {
                        self.state.switch(token);
                        continue;
                    }
                    LineKind::Sql(line) => line,
                }
            };

            if self.buffer.is_empty() {
                if line.trim().is_empty() {
                    continue;
                }
                self.start_line = idx + 1;
            }

            let complete = self.state.terminates(line);
            self.buffer.push(self.state.normalize(line));
            if complete {
                return Some(finish_statement(
                    &mut self.buffer,
                    &self.state,
                    &self.placeholders,
                    self.start_line,
                ));
            }
        }
        None
    }
}

/// Split `script` into statements.
///
/// Restart by calling again on the same text.
pub fn split_statements<'a>(script: &'a str, options: &SplitOptions) -> Statements<'a> {
    Statements {
        lines: script.lines().enumerate(),
        state: DelimiterState::new(options.delimiter.clone()),
        placeholders: options.placeholders.clone(),
        buffer: Vec::new(),
        start_line: 0,
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
