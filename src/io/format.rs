//! Nice qbasis output formatting.

use std::fmt;

use log;

const QBASIS_BANNER_LENGTH: usize = 83;

/// Logs an error to the `qbasis-output` logger.
macro_rules! qbasis_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "qbasis-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `qbasis-output` logger.
macro_rules! qbasis_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "qbasis-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `qbasis-output` logger.
macro_rules! qbasis_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "qbasis-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {qbasis_error, qbasis_output, qbasis_warn};

/// Logs a nicely formatted section title to the `qbasis-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(QBASIS_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    qbasis_output!("┌──{bar}──┐");
    qbasis_output!("│§ {title:^length$} §│");
    qbasis_output!("└──{bar}──┘");
}

/// Logs a nicely formatted subtitle to the `qbasis-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    qbasis_output!("{}", subtitle);
    qbasis_output!("{}", bar);
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging `qbasis` outputs nicely.
pub(crate) trait QBasisOutput: fmt::Debug + fmt::Display {
    /// Logs display output nicely.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            qbasis_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> QBasisOutput for T where T: fmt::Debug + fmt::Display {}
