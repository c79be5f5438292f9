//! Severity-laddered security log with a redirectable output descriptor.
//!
//! This channel is separate from the `log` facade on purpose: the fatal
//! paths in [`crate::privileges`] and [`crate::environment`] must be able to
//! emit a diagnostic immediately before aborting, whether or not the
//! embedding application ever installed a logger. Operational chatter
//! elsewhere in the crate still goes through `log` macros.

use crate::error::LogError;
use crate::utils::io::write_exact;
use std::fmt;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicI32, Ordering};

/// Severity of a security log line, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    /// Tag used in the line prefix, at most six characters.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERG",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRIT",
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Closest `log` facade level, for code forwarding between the two.
    pub fn log_level(self) -> log::Level {
        match self {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                log::Level::Error
            }
            Severity::Warning => log::Level::Warn,
            Severity::Notice | Severity::Info => log::Level::Info,
            Severity::Debug => log::Level::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static OUTPUT_FD: AtomicI32 = AtomicI32::new(libc::STDERR_FILENO);

/// Redirect security log output to `fd`, returning the previous descriptor.
///
/// The descriptor is used as-is and never closed by this module. A negative
/// `fd` is rejected without changing the current target.
pub fn redirect_output(fd: RawFd) -> Result<RawFd, LogError> {
    if fd < 0 {
        return Err(LogError::InvalidFd(fd));
    }
    Ok(OUTPUT_FD.swap(fd, Ordering::SeqCst))
}

/// Descriptor security log lines are currently written to.
pub fn output_fd() -> RawFd {
    OUTPUT_FD.load(Ordering::SeqCst)
}

/// Write one formatted line to the security log.
///
/// Lines look like `[ ERROR] src/foo.rs:42 (secureproc::foo) message`; the
/// module path stands in for the function name. Returns the number of bytes
/// written. Prefer the [`sec_err!`]/[`sec_warn!`]/[`sec_info!`]/
/// [`sec_debug!`] macros, which capture the call site.
///
/// [`sec_err!`]: crate::sec_err
/// [`sec_warn!`]: crate::sec_warn
/// [`sec_info!`]: crate::sec_info
/// [`sec_debug!`]: crate::sec_debug
pub fn emit(
    severity: Severity,
    file: &str,
    line: u32,
    module: &str,
    args: fmt::Arguments<'_>,
) -> Result<usize, LogError> {
    let entry = format!(
        "[{:>6}] {}:{} ({}) {}\n",
        severity.as_str(),
        file,
        line,
        module,
        args
    );
    write_exact(output_fd(), entry.as_bytes())?;
    Ok(entry.len())
}

/// Log at [`Severity::Error`] with the call site attached.
#[macro_export]
macro_rules! sec_err {
    ($($arg:tt)*) => {
        $crate::logging::emit(
            $crate::logging::Severity::Error,
            file!(),
            line!(),
            module_path!(),
            format_args!($($arg)*),
        )
    };
}

/// Log at [`Severity::Warning`] with the call site attached.
#[macro_export]
macro_rules! sec_warn {
    ($($arg:tt)*) => {
        $crate::logging::emit(
            $crate::logging::Severity::Warning,
            file!(),
            line!(),
            module_path!(),
            format_args!($($arg)*),
        )
    };
}

/// Log at [`Severity::Info`] with the call site attached.
#[macro_export]
macro_rules! sec_info {
    ($($arg:tt)*) => {
        $crate::logging::emit(
            $crate::logging::Severity::Info,
            file!(),
            line!(),
            module_path!(),
            format_args!($($arg)*),
        )
    };
}

/// Log at [`Severity::Debug`] with the call site attached.
#[macro_export]
macro_rules! sec_debug {
    ($($arg:tt)*) => {
        $crate::logging::emit(
            $crate::logging::Severity::Debug,
            file!(),
            line!(),
            module_path!(),
            format_args!($($arg)*),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use serial_test::serial;
    use std::fs;
    use std::os::unix::io::AsRawFd;

    #[test]
    #[serial]
    fn rejects_negative_descriptor_without_switching() {
        let before = output_fd();
        let err = redirect_output(-3).expect_err("negative fd must be rejected");
        assert!(matches!(err, LogError::InvalidFd(-3)));
        assert_eq!(output_fd(), before);
    }

    #[test]
    #[serial]
    fn redirect_returns_previous_descriptor() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let fd = file.as_file().as_raw_fd();

        let previous = redirect_output(fd).expect("redirect");
        let restored = redirect_output(previous).expect("restore");
        assert_eq!(restored, fd);
    }

    #[test]
    #[serial]
    fn emit_writes_prefixed_line_and_returns_length() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let previous = redirect_output(file.as_file().as_raw_fd()).expect("redirect");

        let written = emit(
            Severity::Warning,
            "src/x.rs",
            7,
            "secureproc::x",
            format_args!("count={}", 3),
        )
        .expect("emit");

        redirect_output(previous).expect("restore");

        let contents = fs::read_to_string(file.path()).expect("read back");
        assert_eq!(contents, "[  WARN] src/x.rs:7 (secureproc::x) count=3\n");
        assert_eq!(written, contents.len());
    }

    #[test]
    #[serial]
    fn macros_capture_the_call_site() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let previous = redirect_output(file.as_file().as_raw_fd()).expect("redirect");

        sec_info!("sanitized {} entries", 4).expect("emit");

        redirect_output(previous).expect("restore");

        let contents = fs::read_to_string(file.path()).expect("read back");
        assert!(contents.starts_with("[  INFO] src/logging.rs:"));
        assert!(contents.contains("(secureproc::logging::tests)"));
        assert!(contents.ends_with("sanitized 4 entries\n"));
    }

    #[test]
    fn severity_tags_fit_the_prefix_width() {
        let all = [
            Severity::Emergency,
            Severity::Alert,
            Severity::Critical,
            Severity::Error,
            Severity::Warning,
            Severity::Notice,
            Severity::Info,
            Severity::Debug,
        ];
        for severity in all {
            assert!(severity.as_str().len() <= 6, "{severity} tag too wide");
        }
    }

    #[test]
    fn severity_orders_most_severe_first() {
        assert!(Severity::Emergency < Severity::Debug);
        assert!(Severity::Error < Severity::Warning);
    }

    #[test]
    fn severity_maps_onto_log_levels() {
        assert_eq!(Severity::Critical.log_level(), log::Level::Error);
        assert_eq!(Severity::Warning.log_level(), log::Level::Warn);
        assert_eq!(Severity::Notice.log_level(), log::Level::Info);
        assert_eq!(Severity::Debug.log_level(), log::Level::Debug);
    }
}
