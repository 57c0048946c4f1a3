//! Letter-based date patterns
//!
//! Field formats use the familiar `yyyy-MM-dd HH:mm:ss` notation, where a run
//! of the same letter selects a calendar component. For numeric components the
//! run length is the minimum number of digits, so `DD` renders day 5 as `05`
//! and `SSSSSS` renders 7 ms as `000007`. Everything renders in UTC.
//!
//! | Letters | Meaning             | Example |
//! |---------|---------------------|---------|
//! | `yy` / `y` `yyyy` | year (two digits / padded) | `24` / `2024` |
//! | `M` `MM` `MMM` `MMMM` | month | `3` `03` `Mar` `March` |
//! | `d` `dd` | day of month       | `5` `05` |
//! | `D` `DDD` | day of year       | `65` `065` |
//! | `H` `HH` / `h` `hh` | hour (0-23 / 1-12) | `14` / `02` |
//! | `m` `mm` / `s` `ss` | minute / second | `07` / `09` |
//! | `S` `SSS` | milliseconds      | `7` `007` |
//! | `a` | AM/PM marker            | `PM` |
//! | `E` / `EEEE` | weekday        | `Tue` / `Tuesday` |
//! | `Z` / `X` | zone offset       | `+0000` / `Z` |
//!
//! Text between single quotes is copied verbatim and `''` is a literal quote.
//! Any other ASCII letter is rejected.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fmt::Write;
use thiserror::Error;

/// Why a pattern could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatePatternError {
    #[error("unsupported pattern letter '{0}'")]
    UnknownLetter(char),

    #[error("unterminated quote in pattern")]
    UnterminatedQuote,

    #[error("timestamp cannot be rendered with this pattern")]
    Render,
}

/// Numeric calendar component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Year,
    Month,
    Day,
    DayOfYear,
    Hour,
    Hour12,
    Minute,
    Second,
    Millis,
}

impl Component {
    fn value(self, timestamp: &DateTime<Utc>) -> i64 {
        match self {
            Component::Year => i64::from(timestamp.year()),
            Component::Month => i64::from(timestamp.month()),
            Component::Day => i64::from(timestamp.day()),
            Component::DayOfYear => i64::from(timestamp.ordinal()),
            Component::Hour => i64::from(timestamp.hour()),
            Component::Hour12 => i64::from(timestamp.hour12().1),
            Component::Minute => i64::from(timestamp.minute()),
            Component::Second => i64::from(timestamp.second()),
            Component::Millis => i64::from(timestamp.timestamp_subsec_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// Zero-padded to at least `width` digits
    Number { component: Component, width: usize },
    TwoDigitYear,
    /// Rendered by chrono from a strftime specifier
    Chrono(&'static str),
}

/// A parsed date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Parses a letter pattern such as `yyyy-MM-dd`
    ///
    /// # Errors
    ///
    /// Returns [`DatePatternError`] for unknown letters or unbalanced quotes.
    pub fn parse(pattern: &str) -> Result<Self, DatePatternError> {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    push_literal(&mut tokens, '\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            push_literal(&mut tokens, '\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    push_literal(&mut tokens, q);
                }
                if !closed {
                    return Err(DatePatternError::UnterminatedQuote);
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut tokens, c);
                continue;
            }

            let mut width = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                width += 1;
            }
            tokens.push(token(c, width)?);
        }

        Ok(Self { tokens })
    }

    /// Renders `timestamp` in UTC
    ///
    /// # Errors
    ///
    /// Returns [`DatePatternError::Render`] if chrono cannot render the value.
    pub fn format(&self, timestamp: &DateTime<Utc>) -> Result<String, DatePatternError> {
        let mut out = String::new();
        for token in &self.tokens {
            let written = match token {
                Token::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
                Token::Number { component, width } => {
                    write!(out, "{:0width$}", component.value(timestamp), width = *width)
                }
                Token::TwoDigitYear => write!(out, "{:02}", timestamp.year().rem_euclid(100)),
                Token::Chrono(specifier) => write!(out, "{}", timestamp.format(specifier)),
            };
            written.map_err(|_| DatePatternError::Render)?;
        }
        Ok(out)
    }
}

fn push_literal(tokens: &mut Vec<Token>, c: char) {
    match tokens.last_mut() {
        Some(Token::Literal(text)) => text.push(c),
        _ => tokens.push(Token::Literal(c.to_string())),
    }
}

fn token(letter: char, width: usize) -> Result<Token, DatePatternError> {
    let number = |component| Token::Number { component, width };
    let token = match (letter, width) {
        ('y', 2) => Token::TwoDigitYear,
        ('y', _) => number(Component::Year),
        ('M', 1 | 2) => number(Component::Month),
        ('M', 3) => Token::Chrono("%b"),
        ('M', _) => Token::Chrono("%B"),
        ('d', _) => number(Component::Day),
        ('D', _) => number(Component::DayOfYear),
        ('H', _) => number(Component::Hour),
        ('h', _) => number(Component::Hour12),
        ('m', _) => number(Component::Minute),
        ('s', _) => number(Component::Second),
        ('S', _) => number(Component::Millis),
        ('a', _) => Token::Chrono("%p"),
        ('E', 1..=3) => Token::Chrono("%a"),
        ('E', _) => Token::Chrono("%A"),
        ('Z', _) => Token::Chrono("%z"),
        // Always rendering UTC
        ('X', _) => Token::Literal("Z".to_string()),
        (other, _) => return Err(DatePatternError::UnknownLetter(other)),
    };
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap() + chrono::Duration::milliseconds(123)
    }

    fn early_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 3, 4, 5).unwrap() + chrono::Duration::milliseconds(7)
    }

    #[test_case("yyyy-MM-dd", "2024-03-05" ; "iso date")]
    #[test_case("dd/MM/yy", "05/03/24" ; "short year")]
    #[test_case("d.M.yyyy", "5.3.2024" ; "unpadded")]
    #[test_case("yyyy-MM-dd HH:mm:ss.SSS", "2024-03-05 14:07:09.123" ; "with millis")]
    #[test_case("hh:mm a", "02:07 PM" ; "twelve hour clock")]
    #[test_case("EEE, d MMM yyyy", "Tue, 5 Mar 2024" ; "short names")]
    #[test_case("EEEE MMMM", "Tuesday March" ; "long names")]
    #[test_case("yyyyMMdd'T'HHmmss", "20240305T140709" ; "quoted literal")]
    #[test_case("'week' ''yy", "week '24" ; "escaped quote")]
    #[test_case("D/DDD", "65/065" ; "day of year")]
    #[test_case("HH:mmX", "14:07Z" ; "utc designator")]
    #[test_case("Z", "+0000" ; "numeric offset")]
    #[test_case("100% yyyy", "100% 2024" ; "percent literal")]
    #[test_case("S", "123" ; "millis wider than run")]
    fn test_format(pattern: &str, expected: &str) {
        let pattern = DatePattern::parse(pattern).unwrap();
        assert_eq!(pattern.format(&sample()).unwrap(), expected);
    }

    #[test_case("D", "5" ; "day of year single")]
    #[test_case("DD", "05" ; "day of year double")]
    #[test_case("DDD", "005" ; "day of year triple")]
    #[test_case("S", "7" ; "millis single")]
    #[test_case("SSS", "007" ; "millis triple")]
    #[test_case("SSSSSS", "000007" ; "millis six")]
    #[test_case("y", "2024" ; "year single")]
    #[test_case("yyy", "2024" ; "year triple")]
    #[test_case("yyyyy", "02024" ; "year five")]
    #[test_case("M/MM", "1/01" ; "month numeric")]
    #[test_case("h hh HHH", "3 03 003" ; "hours")]
    #[test_case("m:ss", "4:05" ; "minute and second")]
    fn test_run_length_is_minimum_width(pattern: &str, expected: &str) {
        let pattern = DatePattern::parse(pattern).unwrap();
        assert_eq!(pattern.format(&early_morning()).unwrap(), expected);
    }

    #[test_case("yyyy-QQ", DatePatternError::UnknownLetter('Q') ; "unknown letter")]
    #[test_case("kk:mm", DatePatternError::UnknownLetter('k') ; "unsupported hour letter")]
    #[test_case("yyyy 'open", DatePatternError::UnterminatedQuote ; "open quote")]
    fn test_parse_errors(pattern: &str, expected: DatePatternError) {
        assert_eq!(DatePattern::parse(pattern).unwrap_err(), expected);
    }

    #[test]
    fn test_epoch() {
        let pattern = DatePattern::parse("yyyy-MM-dd").unwrap();
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(pattern.format(&epoch).unwrap(), "1970-01-01");
    }

    #[test]
    fn test_twelve_hour_midnight() {
        let pattern = DatePattern::parse("h a").unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(pattern.format(&midnight).unwrap(), "12 AM");
    }
}
