//! Line reading, field splitting and row parsing
//!
//! One splitter is used for the header and for data rows. Each physical
//! line (terminator `\n` or `\r\n` stripped) is one CSV record: fields are
//! separated by `,` and may be double-quoted, with `""` for a literal quote.

use std::io::{self, BufRead};

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use super::errors::RowFault;

/// Field separator for header and data rows
pub const FIELD_SEPARATOR: u8 = b',';

/// Splits one line into unquoted fields.
///
/// An empty line yields no fields.
pub fn split_fields(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(FIELD_SEPARATOR)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(str::to_string).collect())
}

/// One physical line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number
    pub number: usize,
    /// Line text without terminator; lossily decoded if not UTF-8
    pub content: String,
    pub valid_utf8: bool,
}

impl RawLine {
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }
}

/// Reads numbered lines from a byte stream.
pub struct LineReader<R: BufRead> {
    input: R,
    number: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            number: 0,
            buf: Vec::new(),
        }
    }

    /// Number of the last line returned
    pub fn lines_read(&self) -> usize {
        self.number
    }

    /// Returns the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<RawLine>> {
        self.buf.clear();
        if self.input.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        let (content, valid_utf8) = match std::str::from_utf8(&self.buf) {
            Ok(text) => (text.to_string(), true),
            Err(_) => (String::from_utf8_lossy(&self.buf).into_owned(), false),
        };

        Ok(Some(RawLine {
            number: self.number,
            content,
            valid_utf8,
        }))
    }
}

/// What to do with a row whose name field is empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyNamePolicy {
    /// Keep the row; the name is stored empty
    #[default]
    Accept,
    /// Treat the row as malformed
    Reject,
}

/// A data row split into typed fields
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub name: String,
    pub salary: f64,
}

/// Parses data rows into `(name, salary)`.
///
/// Leading whitespace in each field is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowParser {
    empty_names: EmptyNamePolicy,
}

impl RowParser {
    pub fn new(empty_names: EmptyNamePolicy) -> Self {
        Self { empty_names }
    }

    pub fn parse(&self, line: &str) -> Result<ParsedRow, RowFault> {
        let fields = split_fields(line).map_err(|e| RowFault::Unreadable(e.to_string()))?;
        let [name, salary] = fields.as_slice() else {
            return Err(RowFault::FieldCount {
                found: fields.len(),
            });
        };

        let name = name.trim_start();
        if name.is_empty() && self.empty_names == EmptyNamePolicy::Reject {
            return Err(RowFault::EmptyName);
        }

        let salary: f64 = salary
            .trim_start()
            .parse()
            .map_err(|_| RowFault::InvalidSalary)?;
        if !salary.is_finite() {
            return Err(RowFault::NonFiniteSalary);
        }

        Ok(ParsedRow {
            name: name.to_string(),
            salary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &[u8]) -> Vec<RawLine> {
        let mut reader = LineReader::new(input);
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_lines_numbered_from_one() {
        let lines = read_all(b"NAME,SALARY\nAlice,1\r\nBob,2");
        let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(lines[1].content, "Alice,1");
        assert_eq!(lines[2].content, "Bob,2");
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        assert_eq!(read_all(b"NAME,SALARY\n").len(), 1);
        assert!(read_all(b"").is_empty());
    }

    #[test]
    fn test_invalid_utf8_flagged() {
        let lines = read_all(b"Al\xffce,1\n");
        assert!(!lines[0].valid_utf8);
        assert!(lines[0].content.starts_with("Al"));
    }

    #[test]
    fn test_parse_ignores_leading_whitespace() {
        let row = RowParser::default().parse("  Alice, 50000.5").unwrap();
        assert_eq!(row.name, "Alice");
        assert_eq!(row.salary, 50000.5);
    }

    #[test]
    fn test_parse_negative_salary_is_not_a_fault() {
        let row = RowParser::default().parse("Bob,-100").unwrap();
        assert_eq!(row.salary, -100.0);
    }

    #[test]
    fn test_parse_faults() {
        let parser = RowParser::default();
        assert_eq!(
            parser.parse("Alice"),
            Err(RowFault::FieldCount { found: 1 })
        );
        assert_eq!(
            parser.parse("Alice,1,2"),
            Err(RowFault::FieldCount { found: 3 })
        );
        assert_eq!(parser.parse("Alice,notanumber"), Err(RowFault::InvalidSalary));
        assert_eq!(parser.parse("Alice,"), Err(RowFault::InvalidSalary));
        assert_eq!(parser.parse("Alice,100 "), Err(RowFault::InvalidSalary));
        assert_eq!(parser.parse("Alice,NaN"), Err(RowFault::NonFiniteSalary));
        assert_eq!(parser.parse("Alice,inf"), Err(RowFault::NonFiniteSalary));
    }

    #[test]
    fn test_split_unquotes_fields() {
        assert_eq!(split_fields("NAME,SALARY").unwrap(), vec!["NAME", "SALARY"]);
        assert_eq!(
            split_fields("\"NAME\",\"SALARY\"").unwrap(),
            vec!["NAME", "SALARY"]
        );
        assert_eq!(
            split_fields("\"Smith, John\",100").unwrap(),
            vec!["Smith, John", "100"]
        );
        assert_eq!(
            split_fields("\"O\"\"Brien\",5").unwrap(),
            vec!["O\"Brien", "5"]
        );
        assert!(split_fields("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let parser = RowParser::default();
        let row = parser.parse("\"Smith, John\",100").unwrap();
        assert_eq!(row.name, "Smith, John");
        assert_eq!(row.salary, 100.0);

        let row = parser.parse("\"O\"\"Brien\",\"2500.5\"").unwrap();
        assert_eq!(row.name, "O\"Brien");
        assert_eq!(row.salary, 2500.5);
    }

    #[test]
    fn test_empty_name_policy() {
        let row = RowParser::new(EmptyNamePolicy::Accept).parse(",10").unwrap();
        assert_eq!(row.name, "");
        assert_eq!(
            RowParser::new(EmptyNamePolicy::Reject).parse(" ,10"),
            Err(RowFault::EmptyName)
        );
    }
}
