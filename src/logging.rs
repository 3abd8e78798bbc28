use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `POPA_LOG=popa=trace`
pub const LOG_ENV: &str = "POPA_LOG";

/// Default filter: warnings only, or everything from this crate at debug
/// level with `--verbose`.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,popa=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber.
///
/// Output goes through [`crate::stderr_buffer`] so that log lines emitted
/// while the TUI owns the terminal are held back until it is restored.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(crate::stderr_buffer::writer)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "warn,popa=debug");
    }
}
