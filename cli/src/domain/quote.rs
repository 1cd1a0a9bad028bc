//! Argument quoting for the remote shell and the transfer script.

/// Render `arg` as an escaped, double-quoted string literal.
///
/// This is NOT shell-safe: `$`, backticks and `!` keep their meaning inside
/// double quotes on the remote shell. Paths and arguments containing them
/// will be expanded remotely.
#[must_use]
pub fn quote(arg: &str) -> String {
    format!("{arg:?}")
}
