//! Statement counting for query text.
//!
//! Uses the sqlparser-rs tokenizer with the SQLite dialect, so semicolons inside
//! string literals, quoted identifiers and comments are not treated as
//! separators.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Message reported for query text holding more than one statement.
pub const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

/// Counts the non-empty statements in `sql`.
///
/// Returns `None` when the text cannot be tokenized; the engine then reports the
/// problem itself when the statement is prepared. Stray semicolons and
/// comment-only segments do not count.
pub fn statement_count(sql: &str) -> Option<usize> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize().ok()?;

    let mut count = 0;
    let mut in_statement = false;
    for token in &tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon => in_statement = false,
            _ if !in_statement => {
                in_statement = true;
                count += 1;
            }
            _ => {}
        }
    }
    Some(count)
}
