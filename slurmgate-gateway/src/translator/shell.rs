//! POSIX shell quoting
//!
//! Runner names and labels come straight from the caller and end up inside
//! the job script, so every such value is quoted as one shell word.

/// Quotes `arg` as a single POSIX shell word
///
/// The value is wrapped in single quotes; each embedded single quote closes
/// the quote, emits an escaped quote and reopens it (`'` becomes `'\''`).
/// Nothing inside single quotes is special to the shell, so this holds for
/// any content without NUL bytes.
pub fn escape_shell_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('\'');
    for c in arg.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}
