//! Operator confirmation

use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};

/// The only answer that lets a destructive run proceed.
pub const AFFIRMATIVE: &str = "yes";

/// Trait for the human-in-the-loop gate before deleting
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Ask `message`; `true` only for an affirmative answer
    async fn confirm(&self, message: &str) -> Result<bool>;
}

/// Case-insensitive match against [`AFFIRMATIVE`]. Only the line terminator
/// is stripped; any other surrounding text rejects the answer.
pub fn is_affirmative(answer: &str) -> bool {
    strip_line_ending(answer).eq_ignore_ascii_case(AFFIRMATIVE)
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Reads the answer from standard input
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

impl StdinConfirmer {
    pub fn new() -> Self {
        Self
    }

    /// Read one line; EOF yields an empty answer. Bytes that are not UTF-8
    /// are replaced rather than rejected, so they read as a refusal.
    fn read_answer<R: BufRead>(reader: &mut R) -> Result<String> {
        let mut input = Vec::new();
        reader.read_until(b'\n', &mut input)?;
        Ok(String::from_utf8_lossy(&input).into_owned())
    }
}

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, message: &str) -> Result<bool> {
        print!("{message} ({AFFIRMATIVE}/no): ");
        io::stdout().flush()?;

        let answer = Self::read_answer(&mut io::stdin().lock())?;
        tracing::debug!("Confirmation answer: {:?}", strip_line_ending(&answer));
        Ok(is_affirmative(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("YES\n"));
        assert!(is_affirmative("Yes\r\n"));

        assert!(!is_affirmative("y"));
        assert!(!is_affirmative("yes please"));
        assert!(!is_affirmative("  yes  "));
        assert!(!is_affirmative(" yes\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("\n"));
    }

    #[test]
    fn test_read_answer_takes_one_line() {
        let mut input = Cursor::new("yes\nno\n");
        assert_eq!(StdinConfirmer::read_answer(&mut input).unwrap(), "yes\n");
        assert_eq!(StdinConfirmer::read_answer(&mut input).unwrap(), "no\n");
    }

    #[test]
    fn test_read_answer_tolerates_invalid_utf8() {
        let mut input = Cursor::new(vec![0xff, b'\n']);
        let answer = StdinConfirmer::read_answer(&mut input).unwrap();
        assert_eq!(answer, "\u{fffd}\n");
        assert!(!is_affirmative(&answer));
    }

    #[test]
    fn test_read_answer_at_eof_is_not_affirmative() {
        let mut input = Cursor::new("");
        let answer = StdinConfirmer::read_answer(&mut input).unwrap();
        assert!(!is_affirmative(&answer));
    }
}
