//! Byte-for-byte file comparison

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::Result;

/// Whether two files hold identical bytes.
///
/// Both files are streamed side by side and the comparison stops at the
/// first differing chunk, so a length mismatch is detected without reading
/// past the shorter file.
pub async fn are_files_equal(a: &Path, b: &Path) -> Result<bool> {
    let left = BufReader::new(File::open(a).await?);
    let right = BufReader::new(File::open(b).await?);
    streams_equal(left, right).await
}

async fn streams_equal<A, B>(mut left: A, mut right: B) -> Result<bool>
where
    A: AsyncBufRead + Unpin,
    B: AsyncBufRead + Unpin,
{
    loop {
        let left_buf = left.fill_buf().await?;
        let right_buf = right.fill_buf().await?;

        if left_buf.is_empty() || right_buf.is_empty() {
            return Ok(left_buf.is_empty() && right_buf.is_empty());
        }

        let n = left_buf.len().min(right_buf.len());
        if left_buf[..n] != right_buf[..n] {
            return Ok(false);
        }

        left.consume(n);
        right.consume(n);
    }
}
