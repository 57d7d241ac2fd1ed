//! Streaming DIMACS CNF writer

use super::constraints::ClauseSink;
use crate::error::{EncodingError, Result};
use log::{debug, warn};
use std::io::Write;

/// Writes `p cnf` followed by clauses, one per line.
///
/// The header is written on construction; [`finish`](Self::finish) checks the
/// body against it.
pub struct DimacsWriter<W: Write> {
    out: W,
    declared_variables: usize,
    declared_clauses: usize,
    emitted_clauses: usize,
    max_variable: usize,
    line: String,
}

impl<W: Write> DimacsWriter<W> {
    pub fn new(out: W, variables: usize, clauses: usize) -> Result<Self> {
        Self::with_comments(out, variables, clauses, &[])
    }

    /// Like [`new`](Self::new) but emits `c` lines before the header
    pub fn with_comments(
        mut out: W,
        variables: usize,
        clauses: usize,
        comments: &[String],
    ) -> Result<Self> {
        for comment in comments {
            for line in comment.lines() {
                writeln!(out, "c {}", line)?;
            }
        }
        writeln!(out, "p cnf {} {}", variables, clauses)?;
        debug!("Wrote header: {} variables, {} clauses", variables, clauses);

        Ok(Self {
            out,
            declared_variables: variables,
            declared_clauses: clauses,
            emitted_clauses: 0,
            max_variable: 0,
            line: String::new(),
        })
    }

    pub fn emitted_clauses(&self) -> usize {
        self.emitted_clauses
    }

    pub fn max_variable(&self) -> usize {
        self.max_variable
    }

    /// Flush and verify that the body matched the header
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;

        if self.emitted_clauses != self.declared_clauses {
            return Err(EncodingError::CountMismatch {
                what: "clause count",
                declared: self.declared_clauses,
                emitted: self.emitted_clauses,
            });
        }
        if self.max_variable > self.declared_variables {
            return Err(EncodingError::CountMismatch {
                what: "variable count",
                declared: self.declared_variables,
                emitted: self.max_variable,
            });
        }
        if self.max_variable < self.declared_variables {
            debug!(
                "Variables {}..={} never occur in a clause",
                self.max_variable + 1,
                self.declared_variables
            );
        }

        Ok(self.out)
    }
}

impl<W: Write> ClauseSink for DimacsWriter<W> {
    fn add_clause(&mut self, literals: &[i32]) -> Result<()> {
        use std::fmt::Write as _;

        if literals.is_empty() {
            warn!("Emitting an empty clause; the formula is unsatisfiable");
        }

        self.line.clear();
        for &lit in literals {
            // writing into a String cannot fail
            let _ = write!(self.line, "{} ", lit);
            self.max_variable = self.max_variable.max(lit.unsigned_abs() as usize);
        }
        self.line.push_str("0\n");
        self.out.write_all(self.line.as_bytes())?;

        self.emitted_clauses += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(writer: DimacsWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_header_and_clauses() {
        let mut writer = DimacsWriter::new(Vec::new(), 3, 2).unwrap();
        writer.add_clause(&[1, -2]).unwrap();
        writer.add_clause(&[-3]).unwrap();
        assert_eq!(writer.emitted_clauses(), 2);
        assert_eq!(writer.max_variable(), 3);
        assert_eq!(written(writer), "p cnf 3 2\n1 -2 0\n-3 0\n");
    }

    #[test]
    fn test_comments_precede_header() {
        let comments = vec!["knight's tour".to_string(), "two\nlines".to_string()];
        let mut writer = DimacsWriter::with_comments(Vec::new(), 1, 1, &comments).unwrap();
        writer.add_clause(&[1]).unwrap();
        assert_eq!(written(writer), "c knight's tour\nc two\nc lines\np cnf 1 1\n1 0\n");
    }

    #[test]
    fn test_empty_clause() {
        let mut writer = DimacsWriter::new(Vec::new(), 0, 1).unwrap();
        writer.add_clause(&[]).unwrap();
        assert_eq!(written(writer), "p cnf 0 1\n0\n");
    }

    #[test]
    fn test_clause_count_mismatch() {
        let mut writer = DimacsWriter::new(Vec::new(), 2, 2).unwrap();
        writer.add_clause(&[1, 2]).unwrap();
        let err = writer.finish().unwrap_err();
        assert!(matches!(
            err,
            EncodingError::CountMismatch {
                declared: 2,
                emitted: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_variable_overflow() {
        let mut writer = DimacsWriter::new(Vec::new(), 2, 1).unwrap();
        writer.add_clause(&[1, -5]).unwrap();
        assert!(matches!(
            writer.finish(),
            Err(EncodingError::CountMismatch {
                what: "variable count",
                ..
            })
        ));
    }
}
