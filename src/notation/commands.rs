//! Bracketed commands embedded in move comments: `[%<name> <value>]`.
//!
//! The only command understood today is the remaining-clock annotation `clk`, whose value is
//! `H:MM:SS.D`.

use crate::error::NotationError;

pub const CLOCK: &str = "clk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub value: String,
}

impl Command {
    /// Checks the name is known and the value well-formed for it.
    pub fn validate(&self) -> Result<(), NotationError> {
        match self.name.as_str() {
            CLOCK => clk_millis(&self.value).map(|_| ()),
            _ => Err(NotationError::InvalidCommand(self.name.clone())),
        }
    }

    pub fn render(&self) -> String {
        format!("[%{} {}]", self.name, self.value)
    }
}

/// Comment text with its commands pulled out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveComment {
    pub text: String,
    pub commands: Vec<Command>,
}

impl MoveComment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            commands: Vec::new(),
        }
    }

    /// Remaining clock in milliseconds, from the first `clk` command.
    pub fn clock_millis(&self) -> Option<i64> {
        self.commands
            .iter()
            .find(|c| c.name == CLOCK)
            .and_then(|c| clk_millis(&c.value).ok())
    }

    /// Body of the comment as written between braces: commands first, then the text.
    pub fn render(&self) -> Result<String, NotationError> {
        if self.text.contains(['{', '}']) {
            return Err(NotationError::malformed(
                "comment may not contain braces",
                self.text.clone(),
            ));
        }
        let mut parts = Vec::with_capacity(self.commands.len() + 1);
        for cmd in &self.commands {
            cmd.validate()?;
            parts.push(cmd.render());
        }
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        Ok(parts.join(" "))
    }
}

/// Splits a raw comment into commands and the remaining text.
///
/// Removing a command leaves its surrounding whitespace behind; runs of whitespace are
/// collapsed to a single space and the result is trimmed.
pub fn extract_commands(comment: &str) -> Result<MoveComment, NotationError> {
    let mut text = String::with_capacity(comment.len());
    let mut commands = Vec::new();
    let mut rest = comment;

    while let Some(open) = rest.find("[%") {
        text.push_str(&rest[..open]);
        let body_start = &rest[open + 2..];
        let close = body_start
            .find(']')
            .ok_or_else(|| NotationError::InvalidCommand(rest[open..].to_string()))?;
        let body = &body_start[..close];
        let (name, value) = body
            .split_once(' ')
            .ok_or_else(|| NotationError::InvalidCommand(format!("[%{body}]")))?;
        let cmd = Command {
            name: name.to_string(),
            value: value.to_string(),
        };
        cmd.validate()?;
        commands.push(cmd);
        text.push(' ');
        rest = &body_start[close + 1..];
    }
    text.push_str(rest);

    Ok(MoveComment {
        text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        commands,
    })
}

/// `H:MM:SS.D` for a remaining time, moved up to the next tenth-of-a-second boundary.
///
/// Zero and negative times render as `0:00:00.0`.
pub fn format_clock(millis: i64) -> String {
    if millis <= 0 {
        return "0:00:00.0".to_string();
    }
    let tenths = millis / 100 + 1;
    let hours = tenths / 36_000;
    let minutes = tenths / 600 % 60;
    let seconds = tenths / 10 % 60;
    let tenth = tenths % 10;
    format!("{hours}:{minutes:02}:{seconds:02}.{tenth}")
}

pub fn create_clk_command(millis: i64) -> Command {
    Command {
        name: CLOCK.to_string(),
        value: format_clock(millis),
    }
}

fn digits(s: &str, len: Option<usize>) -> Option<i64> {
    let ok = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && len.map_or(s.len() <= 9, |l| s.len() == l);
    if ok {
        s.parse().ok()
    } else {
        None
    }
}

/// Parses a `clk` value. Hours have one or more digits, minutes and seconds exactly two
/// (below 60), tenths exactly one.
pub fn clk_millis(value: &str) -> Result<i64, NotationError> {
    let err = || NotationError::InvalidClockFormat(value.to_string());
    let (h, rest) = value.split_once(':').ok_or_else(err)?;
    let (m, rest) = rest.split_once(':').ok_or_else(err)?;
    let (s, d) = rest.split_once('.').ok_or_else(err)?;

    let hours = digits(h, None).ok_or_else(err)?;
    let minutes = digits(m, Some(2)).filter(|&m| m < 60).ok_or_else(err)?;
    let seconds = digits(s, Some(2)).filter(|&s| s < 60).ok_or_else(err)?;
    let tenth = digits(d, Some(1)).ok_or_else(err)?;

    Ok(((hours * 60 + minutes) * 60 + seconds) * 1000 + tenth * 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_at_boundaries() {
        assert_eq!(format_clock(0), "0:00:00.0");
        assert_eq!(format_clock(-5), "0:00:00.0");
        assert_eq!(format_clock(1), "0:00:00.1");
        assert_eq!(format_clock(3_599_950), "1:00:00.0");
        assert_eq!(format_clock(117_300), "0:01:57.4");
    }

    #[test]
    fn clock_parse_is_strict() {
        assert_eq!(clk_millis("12:03:04.5"), Ok(43_384_500));
        for bad in ["1:2:03.4", "0:01:60.0", "0:01:57", "0:01:57.45", "a:01:57.4", " 0:01:57.4"] {
            assert_eq!(
                clk_millis(bad),
                Err(NotationError::InvalidClockFormat(bad.to_string())),
                "{bad}"
            );
        }
    }
}
