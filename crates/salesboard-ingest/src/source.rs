//! Row decoding for delimited-text tables, plain or gzip-compressed.
//!
//! [`Records`] is a lazy, single-pass iterator. Each item is either a fatal
//! [`IngestError`] (after which iteration ends) or a line number paired with
//! the row's own decode result. Underlying read failures, which is how a
//! corrupt or truncated gzip stream shows up, are always fatal. Anything
//! else wrong with a single record is a [`RowError::MalformedRow`].

use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use crate::error::{IngestError, RowError};

/// One decoded row and the line it started on.
pub type RowResult<T> = Result<(u64, Result<T, RowError>), IngestError>;

pub struct Records<R, T> {
    reader: csv::Reader<R>,
    headers: csv::StringRecord,
    source_name: String,
    done: bool,
    _row: PhantomData<fn() -> T>,
}

impl<R: Read, T: DeserializeOwned> Records<R, T> {
    /// Reads the header row and checks that every `required` column is present.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::SourceUnreadable`] if the header cannot be read,
    /// or [`IngestError::MissingColumn`] if a required column is absent.
    pub fn new(
        input: R,
        source_name: impl Into<String>,
        required: &[&'static str],
    ) -> Result<Self, IngestError> {
        let source_name = source_name.into();
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| IngestError::SourceUnreadable {
                source_name: source_name.clone(),
                reason: e.to_string(),
            })?
            .clone();

        for &column in required {
            if !headers.iter().any(|h| h == column) {
                return Err(IngestError::MissingColumn {
                    source_name,
                    column,
                });
            }
        }

        Ok(Self {
            reader,
            headers,
            source_name,
            done: false,
            _row: PhantomData,
        })
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for Records<R, T> {
    type Item = RowResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = csv::StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => {
                let line = record.position().map_or(0, csv::Position::line);
                let row = record
                    .deserialize::<T>(Some(&self.headers))
                    .map_err(|e| RowError::MalformedRow {
                        reason: e.to_string(),
                    });
                Some(Ok((line, row)))
            }
            Err(e) if e.is_io_error() => {
                self.done = true;
                Some(Err(IngestError::SourceUnreadable {
                    source_name: self.source_name.clone(),
                    reason: e.to_string(),
                }))
            }
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                Some(Ok((
                    line,
                    Err(RowError::MalformedRow {
                        reason: e.to_string(),
                    }),
                )))
            }
        }
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|e| IngestError::SourceUnreadable {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Opens an uncompressed table.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or its header is
/// unreadable or incomplete.
pub fn open_csv<T: DeserializeOwned>(
    path: &Path,
    required: &[&'static str],
) -> Result<Records<File, T>, IngestError> {
    Records::new(open(path)?, path.display().to_string(), required)
}

/// Opens a single-member gzip table.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, is not gzip, or its
/// header is unreadable or incomplete.
pub fn open_gzip_csv<T: DeserializeOwned>(
    path: &Path,
    required: &[&'static str],
) -> Result<Records<GzDecoder<File>, T>, IngestError> {
    Records::new(
        GzDecoder::new(open(path)?),
        path.display().to_string(),
        required,
    )
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: String,
        b: String,
    }

    fn records(input: &str) -> Result<Records<&[u8], Pair>, IngestError> {
        Records::new(input.as_bytes(), "<memory>", &["a", "b"])
    }

    #[test]
    fn yields_rows_with_line_numbers() {
        let rows: Vec<_> = records("a,b\n1,2\n3,4\n")
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 2);
        assert_eq!(
            rows[1].1,
            Ok(Pair {
                a: "3".into(),
                b: "4".into()
            })
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows: Vec<_> = records("z,b,a\nx,2,1\n")
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            rows[0].1,
            Ok(Pair {
                a: "1".into(),
                b: "2".into()
            })
        );
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = records("a,c\n1,2\n").err().expect("missing column");
        assert!(matches!(err, IngestError::MissingColumn { column: "b", .. }));
    }

    #[test]
    fn empty_input_is_missing_columns() {
        assert!(matches!(
            records("").err(),
            Some(IngestError::MissingColumn { .. })
        ));
    }

    #[test]
    fn short_row_is_skipped_and_reading_continues() {
        let rows: Vec<_> = records("a,b\n1\n3,4\n")
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[0].1, Err(RowError::MalformedRow { .. })));
        assert!(rows[1].1.is_ok());
    }

    #[test]
    fn open_missing_file_is_unreadable() {
        let err = open_csv::<Pair>(Path::new("/definitely/not/here.csv"), &["a"])
            .err()
            .expect("open should fail");
        assert!(matches!(err, IngestError::SourceUnreadable { .. }));
    }
}
