//! Code Writer
//!
//! Indentation-tracking text buffer shared by every emitter. Indentation is
//! applied lazily at the start of each non-empty line, so multi-line string
//! constants can be written verbatim at the current level.

use std::fmt;

#[derive(Debug, Clone)]
pub struct CodeWriter {
    indent_unit: String,
    level: usize,
    code: String,
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            level: 0,
            code: String::new(),
            at_line_start: true,
        }
    }

    /// Append `text`, indenting every line that does not start empty
    pub fn write(&mut self, text: &str) {
        for c in text.chars() {
            if self.at_line_start && c != '\n' {
                for _ in 0..self.level {
                    self.code.push_str(&self.indent_unit);
                }
            }
            self.code.push(c);
            self.at_line_start = c == '\n';
        }
    }

    /// Backs `write!(writer, ...)`. Shadows [`fmt::Write::write_fmt`] so callers
    /// get no `fmt::Result` to discard.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.write(text),
            None => self.write(&args.to_string()),
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// # Panics
    ///
    /// When called more often than [`CodeWriter::indent`]; that is an emitter bug.
    pub fn dedent(&mut self) {
        assert!(self.level > 0, "CodeWriter::dedent called at indentation level 0");
        self.level -= 1;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

impl fmt::Write for CodeWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}
