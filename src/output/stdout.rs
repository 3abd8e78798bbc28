use std::io::{self, ErrorKind, Write};

/// Write `text` and a newline, then flush.
///
/// A closed reader (`popa questions | head`) is not a failure: a broken pipe
/// is reported as success so the caller can exit normally.
pub fn write_report<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    match writeln!(out, "{}", text).and_then(|()| out.flush()) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
