pub trait NormalizeString {
    /// Converts `\r\n` and lone `\r` to `\n` and guarantees a trailing `\n`.
    fn normalize(&self) -> String;
}

impl NormalizeString for str {
    fn normalize(&self) -> String {
        let mut out = String::with_capacity(self.len() + 1);
        let mut chars = self.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '\r' {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            } else {
                out.push(ch);
            }
        }

        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

impl NormalizeString for String {
    fn normalize(&self) -> String {
        self.as_str().normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_becomes_single_newline() {
        assert_eq!("".normalize(), "\n");
    }

    #[test]
    fn adds_trailing_newline_when_missing() {
        assert_eq!("{\n    \"a\": 1\n}".normalize(), "{\n    \"a\": 1\n}\n");
    }

    #[test]
    fn crlf_and_lone_cr_converted() {
        assert_eq!("a\r\nb\rc".normalize(), "a\nb\nc\n");
    }

    #[test]
    fn already_normalized_unchanged() {
        assert_eq!("a\nb\n".normalize(), "a\nb\n");
    }
}
