//! Where `print` writes.
//!
//! The interpreter never touches stdout itself. Its [`Output`] is chosen
//! when it is built: stdout for the `flow` binary, a line capture for tests
//! and embedders, or nothing at all.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Lines printed so far, in order.
#[derive(Default)]
pub struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }

    /// Every captured line, each followed by a newline.
    pub fn contents(&self) -> String {
        join_lines(&self.lines.lock())
    }

    /// Like [`contents`](Self::contents), emptying the capture.
    pub fn take(&self) -> String {
        join_lines(&std::mem::take(&mut *self.lines.lock()))
    }

    pub fn line_count(&self) -> usize {
        self.lines.lock().len()
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Print destination, dispatched by enum rather than trait object.
pub enum Output {
    Stdout,
    Capture(Capture),
    Discard,
}

impl Output {
    /// Write one line.
    ///
    /// A closed stdout is ignored: `print` has no way to report it and the
    /// program keeps running.
    pub fn write_line(&self, line: &str) {
        match self {
            Output::Stdout => {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{line}");
            }
            Output::Capture(capture) => capture.push(line),
            Output::Discard => {}
        }
    }

    /// Captured text; empty unless this is a capture.
    pub fn captured(&self) -> String {
        match self {
            Output::Capture(capture) => capture.contents(),
            Output::Stdout | Output::Discard => String::new(),
        }
    }

    /// Captured text, clearing the capture.
    pub fn take(&self) -> String {
        match self {
            Output::Capture(capture) => capture.take(),
            Output::Stdout | Output::Discard => String::new(),
        }
    }
}

/// Output shared between the interpreter and its embedder.
pub type SharedOutput = Arc<Output>;

pub fn stdout_output() -> SharedOutput {
    Arc::new(Output::Stdout)
}

pub fn capture_output() -> SharedOutput {
    Arc::new(Output::Capture(Capture::new()))
}

pub fn discard_output() -> SharedOutput {
    Arc::new(Output::Discard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_keeps_lines_in_order() {
        let out = capture_output();
        out.write_line("a");
        out.write_line("");
        out.write_line("b");
        assert_eq!(out.captured(), "a\n\nb\n");
        let Output::Capture(capture) = &*out else {
            panic!("expected a capture");
        };
        assert_eq!(capture.line_count(), 3);
    }

    #[test]
    fn test_take_drains() {
        let out = capture_output();
        out.write_line("hello");
        assert_eq!(out.take(), "hello\n");
        assert_eq!(out.captured(), "");
        out.write_line("again");
        assert_eq!(out.captured(), "again\n");
    }

    #[test]
    fn test_discard_keeps_nothing() {
        let out = discard_output();
        out.write_line("hello");
        assert_eq!(out.captured(), "");
        assert_eq!(out.take(), "");
    }
}
