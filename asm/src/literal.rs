// ----------------------------------------------------------------------------
// Literal expansion
//
// Drops `#` comments and replaces every quoted character with its decimal code.
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Double,
    Single,
    Comment,
}

pub fn expand(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut mode = Mode::Plain;

    for ch in source.chars() {
        match (mode, ch) {
            (Mode::Comment, '\n' | '\r') => {
                mode = Mode::Plain;
                out.push(ch);
            }
            (Mode::Comment, _) => {}
            (Mode::Plain, '#') => mode = Mode::Comment,
            (Mode::Plain, '"') => mode = Mode::Double,
            (Mode::Plain, '\'') => mode = Mode::Single,
            (Mode::Double, '"') | (Mode::Single, '\'') => mode = Mode::Plain,
            (Mode::Double | Mode::Single, _) => {
                out.push_str(&(ch as u32).to_string());
                out.push(' ');
            }
            (Mode::Plain, _) => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(expand("a b ?;\n"), "a b ?;\n");
    }

    #[test]
    fn test_comment_keeps_line_break() {
        assert_eq!(expand("a b # note\nc"), "a b \nc");
        assert_eq!(expand("x #cr\r\ny"), "x \r\ny");
        assert_eq!(expand("# only"), "");
    }

    #[test]
    fn test_double_quote() {
        assert_eq!(expand(". \"Hi\""), ". 72 105 ");
    }

    #[test]
    fn test_single_quote() {
        assert_eq!(expand("/print 'A'"), "/print 65 ");
    }

    #[test]
    fn test_other_quote_is_content() {
        assert_eq!(expand("\"'\""), "39 ");
        assert_eq!(expand("'\"'"), "34 ");
    }

    #[test]
    fn test_hash_inside_quote() {
        assert_eq!(expand("'#' x"), "35  x");
    }

    #[test]
    fn test_line_break_inside_quote() {
        assert_eq!(expand("\"a\nb\""), "97 10 98 ");
    }
}
