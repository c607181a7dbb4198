// Output formatting helpers for CLI commands
// Everything goes to stderr so stdout stays machine-readable

use std::fmt::Display;

/// Print a status message: "  Status message"
pub fn status(action: &str, message: impl Display) {
    eprintln!("\x1b[1;36m{:>12}\x1b[0m {}", action, message);
}

/// Print a success message with checkmark
pub fn success(message: impl Display) {
    eprintln!("\x1b[1;32m  \u{2713}\x1b[0m {}", message);
}

/// Print a warning message
pub fn warning(message: impl Display) {
    eprintln!("\x1b[33m  !\x1b[0m {}", message);
}

/// Print a header line
pub fn header(message: impl Display) {
    eprintln!("\x1b[1m==> {}\x1b[0m", message);
}
