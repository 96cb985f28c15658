//! Quote-aware scanning helpers shared by the line parsers.

/// Byte offset of the first `target` at or after `from` that is not inside
/// a single- or double-quoted string. Unterminated quotes are plain text.
pub(crate) fn find_unquoted(s: &str, from: usize, target: char) -> Option<usize> {
    let mut i = from;
    while let Some(c) = s.get(i..).and_then(|rest| rest.chars().next()) {
        if c == target {
            return Some(i);
        }
        if c == '"' || c == '\'' {
            if let Some(close) = s[i + 1..].find(c) {
                i += close + 2;
                continue;
            }
        }
        i += c.len_utf8();
    }
    None
}

/// Advances `pos` past whitespace.
pub(crate) fn skip_whitespace(s: &str, pos: usize) -> usize {
    let rest = &s[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Character position of a byte offset, as reported in parse errors.
pub(crate) fn char_position(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_quoted_targets() {
        assert_eq!(find_unquoted(r#""a:b" : int"#, 0, ':'), Some(6));
        assert_eq!(find_unquoted("'x#' # c", 0, '#'), Some(5));
    }

    #[test]
    fn unterminated_quote_is_plain() {
        assert_eq!(find_unquoted("\"a:b", 0, ':'), Some(2));
    }

    #[test]
    fn missing_target() {
        assert_eq!(find_unquoted("abc", 0, ':'), None);
    }

    #[test]
    fn whitespace_and_positions() {
        assert_eq!(skip_whitespace("a   b", 1), 4);
        assert_eq!(char_position("éa", 2), 1);
    }
}
