use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log output is stored instead of being
/// printed to stderr.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// `io::Write` sink for the tracing subscriber that honors the buffer.
///
/// Each formatted event arrives as a single write ending in a newline, which
/// is stripped before the line is stored.
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut guard = lock();
        if let Some(buf) = guard.as_mut() {
            let text = String::from_utf8_lossy(bytes);
            buf.push(text.trim_end_matches('\n').to_string());
            Ok(bytes.len())
        } else {
            drop(guard);
            io::stderr().write(bytes)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Writer factory handed to `tracing_subscriber::fmt().with_writer(..)`
pub fn writer() -> BufferedStderr {
    BufferedStderr
}

#[cfg(test)]
mod tests {
    use super::*;

    // The buffer is process-global, so everything runs in one test.
    #[test]
    fn test_buffering_lifecycle() {
        activate();
        BufferedStderr.write_all(b"WARN first\n").unwrap();
        writer().write_all(b"INFO second\n").unwrap();

        let messages = drain();
        assert_eq!(messages, vec!["WARN first", "INFO second"]);

        // Inactive again: nothing is collected
        assert!(drain().is_empty());
    }
}
