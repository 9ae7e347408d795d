use crate::Element;
use dnsmul_core::common::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use std::fmt::Write;
use std::io;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Appends `row` to `line` as single-space separated integers followed by a newline.
pub fn format_row(row: &[Element], line: &mut String) {
    for (index, value) in row.iter().enumerate() {
        if index > 0 {
            line.push(' ');
        }

        // Writing into a String cannot fail.
        let _ = write!(line, "{value}");
    }

    line.push('\n');
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Line-per-row sink for the assembled product.
#[derive(Debug)]
pub struct RowWriter<W>
where
    W: AsyncWrite + Unpin,
{
    writer: BufWriter<W>,
    line: String,
    rows_written: usize,
}

impl<W> RowWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            line: String::new(),
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub async fn write_row(&mut self, row: &[Element]) -> Result<(), io::Error> {
        self.line.clear();
        format_row(row, &mut self.line);

        self.writer.write_all(self.line.as_bytes()).await?;
        self.rows_written += 1;

        Ok(())
    }

    /// Flushes every written row and returns the underlying writer.
    pub async fn finish(mut self) -> Result<W, io::Error> {
        self.writer.flush().await?;

        Ok(self.writer.into_inner())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_row_separates_with_spaces() {
        let mut line = String::new();
        format_row(&[1, -2, 30], &mut line);

        assert_eq!(line, "1 -2 30\n");
    }

    #[tokio::test]
    async fn row_writer() {
        let mut writer = RowWriter::new(Vec::new());
        writer.write_row(&[1, 0]).await.unwrap();
        writer.write_row(&[0, 1]).await.unwrap();

        assert_eq!(writer.rows_written(), 2);
        assert_eq!(writer.finish().await.unwrap(), b"1 0\n0 1\n");
    }
}
