//! Decompression of the LZ4 legacy frame (magic `0x184C2102`).
//!
//! The legacy frame is a stream of size-prefixed LZ4 blocks, each decoding to
//! at most [`LEGACY_BLOCKSIZE`] bytes.  It is the container kernel images and
//! initramfs archives are compressed into.  A size header that exceeds
//! `compress_bound(LEGACY_BLOCKSIZE)` is not a block size: it is the magic
//! number of the next frame, handed back to the caller.
//!
//! # Threading
//!
//! With `workers > 1` compressed blocks are read in batches of
//! `workers * NB_BUFFSETS` (at most `LEGACY_MAX_BLOCKS_IN_FLIGHT`), decoded in
//! parallel via rayon with one scratch buffer per rayon job, then written in
//! order on the calling thread.  Otherwise one block is processed at a time.

use std::io::{self, Read, Write};

use rayon::prelude::*;

use crate::block::{compress_bound, decompress_safe, DecompressError};
use crate::config::{LEGACY_BLOCKSIZE, LEGACY_MAGICNUMBER, LEGACY_MAX_BLOCKS_IN_FLIGHT, NB_BUFFSETS};
use crate::displaylevel;

/// Byte length of the block-size header field in the legacy stream format.
const LEGACY_BLOCK_HEADER_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Largest legal compressed block; bigger header values are magic numbers.
fn legacy_compress_bound() -> usize {
    compress_bound(LEGACY_BLOCKSIZE)
}

/// Reads exactly `buf.len()` bytes, returning `Ok(false)` on a clean EOF
/// before the first byte and an error if EOF occurs mid-read.
fn read_exact_or_eof<R: Read>(src: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated legacy block header",
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Outcome of reading one block header.
enum Header {
    Block(usize),
    NextMagic(u32),
    Eof,
}

fn read_header<R: Read>(src: &mut R, bound: usize) -> io::Result<Header> {
    let mut header = [0u8; LEGACY_BLOCK_HEADER_SIZE];
    if !read_exact_or_eof(src, &mut header)? {
        return Ok(Header::Eof);
    }
    let block_size = u32::from_le_bytes(header);
    if block_size as usize > bound {
        return Ok(Header::NextMagic(block_size));
    }
    Ok(Header::Block(block_size as usize))
}

fn corrupted(e: DecompressError) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Decoding Failed! Corrupted input detected! ({e})"),
    )
}

/// Decodes `block` through the reusable `scratch` buffer, returning only the
/// decoded bytes.
fn decode_block(block: &[u8], scratch: &mut [u8]) -> io::Result<Vec<u8>> {
    let n = decompress_safe(block, scratch).map_err(corrupted)?;
    Ok(scratch[..n].to_vec())
}

/// Blocks read per parallel batch.
fn batch_len(workers: usize) -> usize {
    workers.saturating_mul(NB_BUFFSETS).clamp(1, LEGACY_MAX_BLOCKS_IN_FLIGHT)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decodes the blocks of one legacy frame from `src` into `dst`.
///
/// `src` must be positioned immediately after the frame's magic number.
///
/// Returns `(decoded_bytes, next_magic)`, where `next_magic` is `Some(magic)`
/// when the frame ended because another frame's magic number followed, or
/// `None` when it ended at clean EOF.
///
/// # Errors
///
/// Any I/O error, a block cut short by EOF, or a block that fails to decode
/// (`io::ErrorKind::InvalidData`).
pub fn decode_legacy_stream<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    workers: usize,
) -> io::Result<(u64, Option<u32>)> {
    if workers > 1 {
        decode_legacy_mt(src, dst, workers)
    } else {
        decode_legacy_st(src, dst)
    }
}

/// Decodes a whole legacy-compressed stream, including its leading magic
/// number and any legacy frames concatenated after the first.
///
/// Returns the total number of decoded bytes.  A following frame of any
/// other type is rejected with `io::ErrorKind::InvalidData`.
pub fn decode_legacy_frames<R: Read, W: Write>(src: &mut R, dst: &mut W, workers: usize) -> io::Result<u64> {
    let mut magic_buf = [0u8; 4];
    src.read_exact(&mut magic_buf)?;
    let mut magic = u32::from_le_bytes(magic_buf);
    let mut total: u64 = 0;

    loop {
        if magic != LEGACY_MAGICNUMBER {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unrecognized frame magic {magic:#010X} (expected legacy frame)"),
            ));
        }
        let (size, next) = decode_legacy_stream(src, dst, workers)?;
        total += size;
        displaylevel!(3, "legacy frame: {} bytes\n", size);
        match next {
            Some(m) => magic = m,
            None => break,
        }
    }
    dst.flush()?;
    Ok(total)
}

// ---------------------------------------------------------------------------
// Single-threaded path
// ---------------------------------------------------------------------------

fn decode_legacy_st<R: Read, W: Write>(src: &mut R, dst: &mut W) -> io::Result<(u64, Option<u32>)> {
    let bound = legacy_compress_bound();
    let mut in_buf = vec![0u8; bound];
    let mut dec_buf = vec![0u8; LEGACY_BLOCKSIZE];
    let mut stream_size: u64 = 0;

    loop {
        let block_len = match read_header(src, bound)? {
            Header::Eof => return Ok((stream_size, None)),
            Header::NextMagic(m) => return Ok((stream_size, Some(m))),
            Header::Block(len) => len,
        };

        src.read_exact(&mut in_buf[..block_len])?;
        let dec_n = decompress_safe(&in_buf[..block_len], &mut dec_buf).map_err(corrupted)?;
        displaylevel!(4, "block: {} -> {} bytes\n", block_len, dec_n);

        stream_size += dec_n as u64;
        dst.write_all(&dec_buf[..dec_n])?;
    }
}

// ---------------------------------------------------------------------------
// Multi-threaded path
// ---------------------------------------------------------------------------

/// Reads batches of compressed blocks, decodes each batch in parallel and
/// writes the results in stream order.  A decode error aborts before any of
/// its batch is written.
fn decode_legacy_mt<R: Read, W: Write>(src: &mut R, dst: &mut W, workers: usize) -> io::Result<(u64, Option<u32>)> {
    let bound = legacy_compress_bound();
    let per_batch = batch_len(workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(io::Error::other)?;
    let mut stream_size: u64 = 0;
    let mut next_magic: Option<u32> = None;

    loop {
        // ── Read a batch of compressed blocks ─────────────────────────────────
        let mut batch: Vec<Vec<u8>> = Vec::with_capacity(per_batch);
        let mut batch_done = false;

        while batch.len() < per_batch {
            match read_header(src, bound)? {
                Header::Eof => {
                    batch_done = true;
                    break;
                }
                Header::NextMagic(m) => {
                    next_magic = Some(m);
                    batch_done = true;
                    break;
                }
                Header::Block(len) => {
                    let mut block = vec![0u8; len];
                    src.read_exact(&mut block)?;
                    batch.push(block);
                }
            }
        }

        // ── Decompress batch in parallel ──────────────────────────────────────
        let results: Vec<io::Result<Vec<u8>>> = pool.install(|| {
            batch
                .par_iter()
                .map_init(|| vec![0u8; LEGACY_BLOCKSIZE], |scratch, block| decode_block(block, scratch))
                .collect()
        });
        displaylevel!(4, "batch: {} blocks\n", results.len());

        // ── Write results in order ────────────────────────────────────────────
        let decoded = results.into_iter().collect::<io::Result<Vec<_>>>()?;
        for block in decoded {
            stream_size += block.len() as u64;
            dst.write_all(&block)?;
        }

        if batch_done {
            return Ok((stream_size, next_magic));
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
