use std::fmt::Write as _;

/// Line-based text sink for the generators.
pub(crate) struct Writer {
    out: String,
    unit: usize,
    depth: usize,
}

impl Writer {
    pub(crate) fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            unit: indent,
            depth: 0,
        }
    }

    pub(crate) fn line(&mut self, text: impl std::fmt::Display) {
        let width = self.unit * self.depth;
        let _ = writeln!(self.out, "{:width$}{text}", "");
    }

    /// Runs `body` one nesting level deeper.
    pub(crate) fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    /// The generated text without its final newline.
    pub(crate) fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

/// True when `text` can be written without quotes: non-empty, no outer whitespace, and only
/// alphanumerics, inner spaces and chars `extra` accepts.
pub(crate) fn is_bare(text: &str, extra: impl Fn(char) -> bool) -> bool {
    !text.is_empty()
        && text.trim() == text
        && text.chars().all(|c| c.is_alphanumeric() || c == ' ' || extra(c))
}
