use crate::{Element, Matrix, SourceError};
use dnsmul_core::common::async_trait;
use dnsmul_core::common::bytes::Bytes;
use dnsmul_core::common::fs::File;
use dnsmul_core::common::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use std::fmt::{self, Debug, Formatter};
use std::io::Cursor;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Restartable text source of an `N×N` matrix, one row of whitespace-separated integers per
/// line. Every call to `open` starts again at the first row.
#[async_trait]
pub trait MatrixSource: Debug + Send + Sync {
    async fn open(&self) -> Result<MatrixRowReader, SourceError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct MatrixRowReader {
    lines: Lines<Box<dyn AsyncBufRead + Send + Unpin>>,
    row: usize,
    empty_row: Option<usize>,
}

impl Debug for MatrixRowReader {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let mut builder = formatter.debug_struct("MatrixRowReader");
        builder.field("row", &self.row);
        builder.finish()
    }
}

impl MatrixRowReader {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);

        Self {
            lines: reader.lines(),
            row: 0,
            empty_row: None,
        }
    }

    /// Parses the next row. Empty lines are accepted only after the last row.
    pub async fn next_row(&mut self) -> Result<Option<Vec<Element>>, SourceError> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                self.empty_row.get_or_insert(self.row);
                continue;
            }

            if let Some(row) = self.empty_row {
                return Err(SourceError::EmptyRow { row });
            }

            let row = self.row;
            let values = line
                .split_ascii_whitespace()
                .map(|token| {
                    token.parse::<Element>().map_err(|_| SourceError::InvalidToken {
                        row,
                        token: token.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            self.row += 1;

            return Ok(Some(values));
        }

        Ok(None)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct FileMatrixSource {
    path: PathBuf,
}

#[async_trait]
impl MatrixSource for FileMatrixSource {
    async fn open(&self) -> Result<MatrixRowReader, SourceError> {
        let file = File::open(&self.path)
            .await
            .map_err(|error| SourceError::Open {
                path: self.path.clone(),
                error,
            })?;

        Ok(MatrixRowReader::new(BufReader::new(file)))
    }
}

impl FileMatrixSource {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct MemoryMatrixSource {
    content: Bytes,
}

#[async_trait]
impl MatrixSource for MemoryMatrixSource {
    async fn open(&self) -> Result<MatrixRowReader, SourceError> {
        Ok(MatrixRowReader::new(Cursor::new(self.content.clone())))
    }
}

impl From<String> for MemoryMatrixSource {
    fn from(content: String) -> Self {
        Self::new(Bytes::from(content))
    }
}

impl From<&str> for MemoryMatrixSource {
    fn from(content: &str) -> Self {
        Self::new(Bytes::copy_from_slice(content.as_bytes()))
    }
}

impl From<&Matrix> for MemoryMatrixSource {
    fn from(matrix: &Matrix) -> Self {
        Self::from(matrix.to_string())
    }
}

impl MemoryMatrixSource {
    pub fn new(content: Bytes) -> Self {
        Self { content }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Number of integers on the first row, which every row must match.
pub async fn discover_matrix_size<S>(source: &S) -> Result<usize, SourceError>
where
    S: MatrixSource + ?Sized,
{
    match source.open().await?.next_row().await? {
        None => Err(SourceError::Empty),
        Some(row) if row.is_empty() => Err(SourceError::Empty),
        Some(row) => Ok(row.len()),
    }
}

/// Loads and validates a whole source.
pub async fn read_matrix<S>(source: &S) -> Result<Matrix, SourceError>
where
    S: MatrixSource + ?Sized,
{
    let mut reader = source.open().await?;
    let mut elements = Vec::new();
    let mut size = None;
    let mut rows = 0;

    while let Some(row) = reader.next_row().await? {
        let expected = *size.get_or_insert(row.len());

        if row.len() != expected {
            return Err(SourceError::RowLength {
                row: rows,
                expected,
                actual: row.len(),
            });
        }

        elements.extend(row);
        rows += 1;
    }

    let size = size.ok_or(SourceError::Empty)?;

    if rows != size {
        return Err(SourceError::RowCount {
            expected: size,
            actual: rows,
        });
    }

    Ok(Matrix::new(size, elements))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
