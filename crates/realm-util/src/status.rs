//! Aligned status lines on stderr.
//!
//! Command output goes to stdout; these lines narrate what a command did and
//! stay out of the way of piped JSON.

use std::io::Write;

use console::Style;

/// Print `label` right-aligned in bold green, then `message`.
pub fn status(label: &str, message: &str) {
    print_line(Style::new().green().bold(), label, message);
}

/// Bold yellow label for problems that do not fail the command.
pub fn status_warn(label: &str, message: &str) {
    print_line(Style::new().yellow().bold(), label, message);
}

fn print_line(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}
