//! Exact byte-for-byte file comparison.
//!
//! # Overview
//!
//! [`files_equal`] answers "do these two files hold identical bytes?".
//! A size mismatch is a definite "no" and returns early; any other case
//! streams both files in fixed-size chunks and compares them, so metadata
//! alone never decides equality.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::CompareError;

/// Chunk size used when streaming both files.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compare two files byte-for-byte.
///
/// # Errors
///
/// Returns [`CompareError`] naming the file that could not be opened or
/// read. The comparison stops at the first failure.
///
/// # Example
///
/// ```no_run
/// use dupfinder::scanner::files_equal;
/// use std::path::Path;
///
/// let same = files_equal(Path::new("a.txt"), Path::new("b.txt")).unwrap();
/// println!("identical: {}", same);
/// ```
pub fn files_equal(a: &Path, b: &Path) -> Result<bool, CompareError> {
    let file_a = open(a)?;
    let file_b = open(b)?;

    let len_a = file_a.metadata().map_err(|e| read_error(a, e))?.len();
    let len_b = file_b.metadata().map_err(|e| read_error(b, e))?.len();
    if len_a != len_b {
        log::trace!(
            "Size differs ({} vs {}): {} / {}",
            len_a,
            len_b,
            a.display(),
            b.display()
        );
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(CHUNK_SIZE, file_a);
    let mut reader_b = BufReader::with_capacity(CHUNK_SIZE, file_b);
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let n_a = fill(&mut reader_a, &mut buf_a).map_err(|e| read_error(a, e))?;
        let n_b = fill(&mut reader_b, &mut buf_b).map_err(|e| read_error(b, e))?;

        // Lengths can still diverge if a file changed after the size check
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

fn open(path: &Path) -> Result<File, CompareError> {
    File::open(path).map_err(|source| CompareError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_error(path: &Path, source: io::Error) -> CompareError {
    CompareError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Read until `buf` is full or the reader hits EOF.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
