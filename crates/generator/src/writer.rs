//! Indentation-aware text emitter
//!
//! `CodeWriter` accumulates lines into a buffer. Nested blocks are bracketed
//! with [`CodeWriter::indent`], which hands out a guard that restores the
//! previous depth when dropped, including on early return through `?`.

use std::ops::{Deref, DerefMut};

/// One level of indentation
pub const INDENT_UNIT: &str = "    ";

/// Line-oriented code buffer with a current indent depth
#[derive(Debug, Default)]
pub struct CodeWriter {
    buffer: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `line` at the current depth followed by a newline
    pub fn write_line(&mut self, line: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT_UNIT);
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Enter one nesting level until the returned guard is dropped
    pub fn indent(&mut self) -> IndentGuard<'_> {
        self.depth += 1;
        IndentGuard { writer: self }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get_code(&self) -> &str {
        &self.buffer
    }

    pub fn into_code(self) -> String {
        self.buffer
    }
}

/// Scoped indentation; writes through to the underlying writer
pub struct IndentGuard<'a> {
    writer: &'a mut CodeWriter,
}

impl Deref for IndentGuard<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.writer.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_at_top_level() {
        let mut writer = CodeWriter::new();
        writer.write_line("syntax = \"proto3\";");
        writer.write_line("");
        assert_eq!(writer.get_code(), "syntax = \"proto3\";\n\n");
    }

    #[test]
    fn test_nested_indentation() {
        let mut writer = CodeWriter::new();
        writer.write_line("message Outer {");
        {
            let mut body = writer.indent();
            body.write_line("message Inner {");
            {
                let mut inner = body.indent();
                inner.write_line("string name = 1;");
            }
            body.write_line("}");
        }
        writer.write_line("}");

        assert_eq!(
            writer.into_code(),
            "message Outer {\n    message Inner {\n        string name = 1;\n    }\n}\n"
        );
    }

    #[test]
    fn test_depth_restored_on_early_return() {
        fn write_until_failure(writer: &mut CodeWriter) -> Result<(), String> {
            let mut body = writer.indent();
            body.write_line("int32 id = 1;");
            assert_eq!(body.depth(), 1);
            let lookup: Result<(), String> = Err("missing field".to_string());
            lookup?;
            body.write_line("unreachable");
            Ok(())
        }

        let mut writer = CodeWriter::new();
        assert!(write_until_failure(&mut writer).is_err());
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.get_code(), "    int32 id = 1;\n");
    }

    #[test]
    fn test_no_validation_of_content() {
        let mut writer = CodeWriter::new();
        writer.write_line("not { valid proto");
        assert_eq!(writer.get_code(), "not { valid proto\n");
    }
}
