//! Output helpers for the installer CLI.
//!
//! Progress and diagnostics go to stderr through an injected writer so the
//! binaries stay testable; machine-readable output goes to stdout.

use camino::Utf8Path;
use std::io::Write;

/// Write one line to the given stderr writer, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(count: usize, target: &Utf8Path) -> String {
    let plural = if count == 1 { "artifact" } else { "artifacts" };
    format!("Successfully installed {count} {plural} to {target}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    #[rstest]
    #[case::singular(1, "1 artifact")]
    #[case::plural(3, "3 artifacts")]
    fn success_message_pluralises_correctly(#[case] count: usize, #[case] expected: &str) {
        let path = Utf8PathBuf::from("/tmp/tools");
        let msg = success_message(count, &path);
        assert!(msg.contains(expected));
        assert!(msg.contains("/tmp/tools"));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
