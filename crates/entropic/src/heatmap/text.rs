//! Delimited-text matrix input.
//!
//! Matrices are written row-major, one row per line, with fields separated
//! by a delimiter (a comma unless configured otherwise):
//!
//! ```text
//! 1,0,0
//! 0,2,0
//! 0,0,3
//! ```

use crate::error::{Error, Result};

/// Options for reading a matrix from delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedTextOptions {
    /// Field delimiter (default: comma)
    delimiter: u8,
    /// Whether to trim whitespace around fields (default: true)
    trim: bool,
    /// Comment character (lines starting with this are ignored)
    comment: Option<u8>,
}

impl DelimitedTextOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            comment: None,
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether whitespace around fields is trimmed.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets a comment character.
    pub fn comment(mut self, comment: u8) -> Self {
        self.comment = Some(comment);
        self
    }

    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .comment(self.comment)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        builder
    }
}

impl Default for DelimitedTextOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse delimited text into rows of numbers.
///
/// Row lengths are not checked here; see [`super::HeatMap::from_rows`].
pub(crate) fn parse_rows(text: &str, options: &DelimitedTextOptions) -> Result<Vec<Vec<f64>>> {
    let mut reader = options.reader_builder().from_reader(text.as_bytes());
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row = record
            .iter()
            .enumerate()
            .map(|(column, field)| {
                field.parse::<f64>().map_err(|_| Error::Parse {
                    line,
                    column,
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Error::EmptyText);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let rows = parse_rows("1,0,0\n0,2,0\n0,0,3", &DelimitedTextOptions::default()).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 2.0, 0.0],
                vec![0.0, 0.0, 3.0]
            ]
        );
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let rows = parse_rows(" 1.5 , 2\n\n3, 4 \n", &DelimitedTextOptions::default()).unwrap();
        assert_eq!(rows, vec![vec![1.5, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_parse_custom_delimiter_and_comment() {
        let options = DelimitedTextOptions::new().delimiter(b';').comment(b'#');
        let rows = parse_rows("# plan\n1;2\n3;4", &options).unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = parse_rows("1,2\n3,x", &DelimitedTextOptions::default()).unwrap_err();
        match err {
            Error::Parse {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_untrimmed_whitespace_is_invalid() {
        let options = DelimitedTextOptions::new().trim(false);
        assert!(matches!(
            parse_rows("1, 2", &options),
            Err(Error::Parse { column: 1, .. })
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(matches!(
            parse_rows("", &DelimitedTextOptions::default()),
            Err(Error::EmptyText)
        ));
        assert!(matches!(
            parse_rows("\n\n", &DelimitedTextOptions::default()),
            Err(Error::EmptyText)
        ));
    }
}
