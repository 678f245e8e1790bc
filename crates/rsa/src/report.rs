//! Console report of a run: the final listener table and best inferences.

use std::fmt;

use pragmatics_prob::{round_to, MAX_DIGITS};

use crate::model::UncertaintyResult;

/// Aligned text rendering of an [`UncertaintyResult`].
///
/// ```text
/// Lexica: 3
/// Final listener
/// ------------------------------------
///                  N       S       A
///   A scored  0.0000  0.7054  0.2946
/// ```
pub struct ListenerReport<'a> {
    result: &'a UncertaintyResult,
    digits: u32,
}

impl<'a> ListenerReport<'a> {
    /// `digits` is capped at [`MAX_DIGITS`].
    pub fn new(result: &'a UncertaintyResult, digits: u32) -> Self {
        Self {
            result,
            digits: digits.min(MAX_DIGITS),
        }
    }
}

impl fmt::Display for ListenerReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let digits = self.digits as usize;
        let value_width = digits + 2;

        let label_width = 2 + result
            .messages
            .iter()
            .chain(&result.states)
            .map(String::len)
            .chain(std::iter::once(value_width))
            .max()
            .unwrap_or(value_width);
        let cell_width = 2 + result
            .states
            .iter()
            .map(String::len)
            .chain(std::iter::once(value_width))
            .max()
            .unwrap_or(value_width);

        writeln!(f, "Lexica: {}", result.lexicon_count)?;
        writeln!(f, "Final listener")?;
        let columns = result.states.len().max(result.messages.len()) + 1;
        writeln!(f, "{}", "-".repeat(cell_width * columns))?;

        write!(f, "{:>width$}", "", width = label_width)?;
        for state in &result.states {
            write!(f, "{:>width$}", state, width = cell_width)?;
        }
        writeln!(f)?;

        for (message, row) in result.messages.iter().zip(&result.final_listener.m) {
            write!(f, "{:>width$}", message, width = label_width)?;
            for &x in row {
                write!(
                    f,
                    "{:>width$.prec$}",
                    round_to(x, self.digits),
                    width = cell_width,
                    prec = digits
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "Best inferences:")?;
        let best = result
            .best_inferences(self.digits)
            .map_err(|_| fmt::Error)?;
        for (message, states) in &best {
            let states: Vec<String> = states
                .iter()
                .map(|(state, value)| format!("{} ({:.prec$})", state, value, prec = digits))
                .collect();
            writeln!(f, "    {}: {}", message, states.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pragmatics_prob::Matrix;

    fn result() -> UncertaintyResult {
        UncertaintyResult {
            messages: vec!["some".into(), "NULL".into()],
            states: vec!["N".into(), "S".into()],
            final_listener: Matrix::new(vec![vec![0.25, 0.75], vec![0.5, 0.5]]).unwrap(),
            final_speaker: None,
            lexicon_count: 7,
        }
    }

    #[test]
    fn test_report_layout() {
        let text = result().report(2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Lexica: 7");
        assert_eq!(lines[1], "Final listener");
        // label width 2 + max(4, 4) = 6; cell width 2 + max(1, 4) = 6
        assert_eq!(lines[3], "           N     S");
        assert_eq!(lines[4], "  some  0.25  0.75");
        assert_eq!(lines[5], "  NULL  0.50  0.50");
        assert!(text.contains("    NULL: N (0.50), S (0.50)"));
        assert!(text.contains("    some: S (0.75)"));
    }

    #[test]
    fn test_report_caps_digits() {
        let text = result().report(400).to_string();
        assert!(!text.contains("NaN"));
        assert!(text.contains("  some  0.250000000000000  0.750000000000000"));
        assert!(text.contains("    some: S (0.750000000000000)"));
    }
}
