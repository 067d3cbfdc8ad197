//! Small string helpers shared by argument parsing.

/// Returns the last path component of `path`, handling both `/` and `\`
/// separators (a stripped-down binary might be invoked through either on a
/// given platform's shell).
pub fn last_name_from_path(path: &str) -> &str {
    let after_slash = match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    };
    match after_slash.rfind('\\') {
        Some(pos) => &after_slash[pos + 1..],
        None => after_slash,
    }
}

/// If `arg` is exactly `short` or `long`, or starts with `long` followed by
/// `=`, returns the associated value slice (consuming the next CLI token
/// for the bare-flag form is the caller's job; this only handles the
/// `--flag=value` spelling).
pub fn long_command_w_arg<'a>(arg: &'a str, long: &str) -> Option<&'a str> {
    let prefix = format!("{long}=");
    arg.strip_prefix(prefix.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unix_path() {
        assert_eq!(last_name_from_path("/usr/local/bin/bicos"), "bicos");
    }

    #[test]
    fn strips_windows_path() {
        assert_eq!(last_name_from_path(r"C:\tools\bicos.exe"), "bicos.exe");
    }

    #[test]
    fn no_separator_returns_whole_string() {
        assert_eq!(last_name_from_path("bicos"), "bicos");
    }

    #[test]
    fn long_command_with_equals_value() {
        assert_eq!(long_command_w_arg("--threshold=0.5", "--threshold"), Some("0.5"));
        assert_eq!(long_command_w_arg("--threshold", "--threshold"), None);
        assert_eq!(long_command_w_arg("--other=1", "--threshold"), None);
    }
}
