//! Indentation-aware line writer.
//!
//! Nesting only happens through [`CodeWriter::scope`] and
//! [`CodeWriter::block`], which write the closing line after the body runs
//! no matter what the body returns.

use crate::diagnostic::CompilerError;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    buffer: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text.as_ref());
        self.buffer.push('\n');
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
    }

    /// Writes an empty line, without indentation.
    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Writes `open`, runs `body` one level deeper, then writes `close`.
    pub fn scope<T>(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self) -> T) -> T {
        self.line(open);
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        self.line(close);
        result
    }

    /// A braced block under `header`.
    pub fn block<T>(&mut self, header: &str, body: impl FnOnce(&mut Self) -> T) -> T {
        self.line(header);
        self.scope("{", "}", body)
    }

    /// Returns the generated text. Fails if any scope is still open.
    pub fn finish(self) -> Result<String, CompilerError> {
        if self.depth != 0 {
            return Err(CompilerError::UnbalancedScope { depth: self.depth });
        }
        Ok(self.buffer)
    }
}
