//! Indentation-aware YAML line writer.
//!
//! Nesting is only reachable through [`YamlWriter::indented`], which restores
//! the previous level when its closure returns, so every block is closed on
//! every path out of it.

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct YamlWriter {
    buf: String,
    level: usize,
}

impl YamlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Writes one line at the current level from concatenated fragments.
    pub fn line(&mut self, fragments: &[&str]) {
        for _ in 0..self.level {
            self.buf.push_str(INDENT);
        }
        for fragment in fragments {
            self.buf.push_str(fragment);
        }
        self.buf.push('\n');
    }

    /// Writes an empty separator line. Blank lines carry no indentation.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// `key: "value"`
    pub fn string(&mut self, key: &str, value: &str) {
        self.line(&[key, ": ", &quote(value)]);
    }

    /// `key: "value"`, skipped when the value is empty.
    pub fn non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.string(key, value);
        }
    }

    /// `key: true`
    pub fn boolean(&mut self, key: &str, value: bool) {
        self.line(&[key, ": ", bool_literal(value)]);
    }

    /// `- "value"`
    pub fn item(&mut self, value: &str) {
        self.line(&["- ", &quote(value)]);
    }

    /// Runs `f` one level deeper.
    pub fn indented<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.level += 1;
        f(self);
        self.level -= 1;
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

fn bool_literal(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Double-quoted YAML scalar. Anything outside the printable set is escaped
/// as `\xNN`, `\uNNNN` or `\UNNNNNNNN`, so separators such as U+2028 never
/// land raw inside the scalar.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if is_printable(c) => out.push(c),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < ' ' || c == '\u{7F}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
fn is_printable(c: char) -> bool {
    c == ' '
        || matches!(
            c.general_category_group(),
            GeneralCategoryGroup::Letter
                | GeneralCategoryGroup::Mark
                | GeneralCategoryGroup::Number
                | GeneralCategoryGroup::Punctuation
                | GeneralCategoryGroup::Symbol
        )
}
