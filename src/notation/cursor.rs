use crate::error::NotationError;

/// Splits notation text into whitespace-separated sections.
///
/// Whitespace inside `[...]` (metadata, with `"` quoting), and inside `{...}` (comments and the
/// extra-rules object) does not end a section. The cursor only moves forward.
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub(crate) fn next_section(&mut self) -> Result<Option<&'a str>, NotationError> {
        let rest = &self.text[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        if self.pos >= self.text.len() {
            return Ok(None);
        }

        let start = self.pos;
        let mut braces = 0usize;
        let mut brackets = 0usize;
        let mut quoted = false;
        let mut end = self.text.len();

        for (i, c) in self.text[start..].char_indices() {
            if braces > 0 {
                match c {
                    '{' => braces += 1,
                    '}' => braces -= 1,
                    _ => {}
                }
                continue;
            }
            if quoted {
                if c == '"' {
                    quoted = false;
                }
                continue;
            }
            match c {
                '{' => braces += 1,
                '[' => brackets += 1,
                ']' if brackets > 0 => brackets -= 1,
                '"' if brackets > 0 => quoted = true,
                c if c.is_whitespace() && brackets == 0 => {
                    end = start + i;
                    break;
                }
                _ => {}
            }
        }

        let section = &self.text[start..end];
        if braces > 0 || brackets > 0 || quoted {
            return Err(NotationError::malformed("unterminated section", section));
        }
        self.pos = end;
        Ok(Some(section))
    }
}

/// Splits on `sep` outside braces.
pub(crate) fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                out.push(&s[last..i]);
                last = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&s[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_respect_quotes_and_braces() {
        let mut cur = Cursor::new(r#"  [Event "A B]"] w:b 1,2>1,4{[%clk 0:00:01.0] well played}|2,7>2,5 "#);
        assert_eq!(cur.next_section().unwrap(), Some(r#"[Event "A B]"]"#));
        assert_eq!(cur.next_section().unwrap(), Some("w:b"));
        assert_eq!(
            cur.next_section().unwrap(),
            Some("1,2>1,4{[%clk 0:00:01.0] well played}|2,7>2,5")
        );
        assert_eq!(cur.next_section().unwrap(), None);

        let mut bad = Cursor::new("1,2>1,4{never closed");
        assert!(bad.next_section().is_err());
    }

    #[test]
    fn split_ignores_separators_in_comments() {
        assert_eq!(
            split_top_level("a{x|y}|b", '|'),
            vec!["a{x|y}", "b"]
        );
    }
}
