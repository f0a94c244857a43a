//! File I/O primitives for the CLI.
//!
//! - [`open_src`] resolves a path to a `Box<dyn Read>`, treating `-` as stdin
//!   and rejecting directories.
//! - [`open_dst`] resolves a path to a `Box<dyn Write>`, treating `-` as
//!   stdout.
//!
//! Verbosity-gated diagnostics go to stderr through [`displaylevel!`].

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::displaylevel;

/// Sentinel accepted for standard input / standard output.
pub const STDIO_MARK: &str = "-";

#[inline]
fn is_stdio(s: &str) -> bool {
    s == STDIO_MARK
}

/// Opens a source for reading.
///
/// - `-` returns standard input.
/// - A directory yields an [`io::ErrorKind::InvalidInput`] error.
/// - Anything else is opened and wrapped in a [`BufReader`].
pub fn open_src(path: &str) -> io::Result<Box<dyn Read>> {
    if is_stdio(path) {
        displaylevel!(4, "Using stdin for input\n");
        return Ok(Box::new(io::stdin().lock()));
    }

    if Path::new(path).is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path}: is a directory"),
        ));
    }

    let f = File::open(path)?;
    displaylevel!(4, "Reading {}\n", path);
    Ok(Box::new(BufReader::new(f)))
}

/// Opens a destination for writing, creating or truncating regular files.
///
/// `-` returns standard output.
pub fn open_dst(path: &str) -> io::Result<Box<dyn Write>> {
    if is_stdio(path) {
        displaylevel!(4, "Using stdout for output\n");
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }

    if Path::new(path).is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path}: is a directory"),
        ));
    }

    let f = File::create(path)?;
    displaylevel!(4, "Writing {}\n", path);
    Ok(Box::new(BufWriter::new(f)))
}

/// Reads the whole source named by `path` into memory.
pub fn read_src(path: &str) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    open_src(path)?.read_to_end(&mut data)?;
    Ok(data)
}
