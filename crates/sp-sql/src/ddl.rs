//! DDL helpers: `ALTER IGNORE` detection and whole-file flattening

use regex::Regex;
use sqlparser::dialect::MySqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::sync::OnceLock;

fn alter_ignore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bALTER\s+IGNORE\b").expect("valid regex"))
}

fn is_bare_word(token: &Token, word: &str) -> bool {
    matches!(token, Token::Word(w) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(word))
}

/// Whether `sql` contains an `ALTER IGNORE` clause.
///
/// Tokenizes with the MySQL dialect so the keywords are not matched inside
/// string literals, quoted identifiers or comments. Text the tokenizer
/// rejects falls back to a plain pattern match.
pub fn is_alter_ignore(sql: &str) -> bool {
    let dialect = MySqlDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!("Tokenizer rejected statement ({e}); using pattern match");
            return alter_ignore_re().is_match(sql);
        }
    };

    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .collect();
    significant
        .windows(2)
        .any(|pair| is_bare_word(pair[0], "ALTER") && is_bare_word(pair[1], "IGNORE"))
}

/// Strip delimiter directives so a schema file can run as one batch.
///
/// Removes `DELIMITER $$`, `DELIMITER ;` and every remaining `$$`.
pub fn flatten_ddl_script(script: &str) -> String {
    script
        .replace("DELIMITER $$", "")
        .replace("DELIMITER ;", "")
        .replace("$$", "")
}
