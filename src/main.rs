//! Binary entry point for the `lz4kd` command-line tool.
//!
//! # Control flow
//!
//! 1. [`Args`] is parsed with clap and resolved into a [`Plan`].
//! 2. A legacy stream is decoded straight from the source into the
//!    destination; a raw block is read whole, decoded with the selected entry
//!    point and written out.
//! 3. With `--xxh32`, the decoded bytes are hashed and compared.
//!
//! Exit code 0 on success, 1 on any failure (including bad usage).

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use xxhash_rust::xxh32::{xxh32, Xxh32};

use lz4kd::cli::args::{Args, BlockKind, Plan};
use lz4kd::cli::constants::{set_display_level, LOOP_MODE, PROGRAM_NAME};
use lz4kd::io::{decode_legacy_frames, open_dst, read_src};
use lz4kd::{
    decompress_fast, decompress_fast_using_dict, decompress_in_place, decompress_inplace_buffer_size,
    decompress_safe, decompress_safe_partial, decompress_safe_partial_using_dict,
    decompress_safe_using_dict, display, displaylevel,
};

/// Writer adapter hashing everything that passes through it.
struct HashingWriter<W> {
    inner: W,
    hasher: Xxh32,
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn verify_xxh32(expected: Option<u32>, actual: u32) -> Result<()> {
    match expected {
        Some(want) if want != actual => {
            bail!("xxh32 mismatch: expected {want:08x}, decoded data hashes to {actual:08x}")
        }
        Some(_) => {
            displaylevel!(3, "xxh32 {:08x} OK\n", actual);
            Ok(())
        }
        None => {
            displaylevel!(4, "xxh32 {:08x}\n", actual);
            Ok(())
        }
    }
}

fn run_legacy(args: &Args, workers: usize) -> Result<()> {
    let mut src = lz4kd::io::open_src(&args.input).with_context(|| format!("cannot open {}", args.input))?;
    let dst = open_dst(&args.output).with_context(|| format!("cannot create {}", args.output))?;
    let mut dst = HashingWriter { inner: dst, hasher: Xxh32::new(0) };

    displaylevel!(4, "decoding legacy stream with {} worker(s)\n", workers);
    let total = decode_legacy_frames(&mut src, &mut dst, workers)
        .with_context(|| format!("{}: legacy stream decoding failed", args.input))?;
    displaylevel!(2, "{}: decoded {} bytes\n", args.input, total);

    verify_xxh32(args.xxh32, dst.hasher.digest())
}

fn decode_block(input: &[u8], size: usize, kind: BlockKind, dict: Option<&[u8]>) -> Result<Vec<u8>> {
    let decoded = match kind {
        BlockKind::Safe => {
            let mut out = vec![0u8; size];
            let n = match dict {
                Some(d) => decompress_safe_using_dict(input, &mut out, d)?,
                None => decompress_safe(input, &mut out)?,
            };
            out.truncate(n);
            out
        }
        BlockKind::Partial(target) => {
            let mut out = vec![0u8; size];
            let n = match dict {
                Some(d) => decompress_safe_partial_using_dict(input, &mut out, target, d)?,
                None => decompress_safe_partial(input, &mut out, target)?,
            };
            out.truncate(n);
            out
        }
        BlockKind::Fast => {
            let mut out = vec![0u8; size];
            let consumed = match dict {
                Some(d) => decompress_fast_using_dict(input, &mut out, d)?,
                None => decompress_fast(input, &mut out)?,
            };
            displaylevel!(3, "block occupied {} of {} input bytes\n", consumed, input.len());
            if consumed != input.len() {
                displaylevel!(2, "warning: {} trailing input bytes ignored\n", input.len() - consumed);
            }
            out
        }
        BlockKind::InPlace => {
            let buf_len = decompress_inplace_buffer_size(size).max(input.len());
            let mut buf = vec![0u8; buf_len];
            buf[buf_len - input.len()..].copy_from_slice(input);
            let n = decompress_in_place(&mut buf, input.len(), size)?;
            buf.truncate(n);
            buf
        }
    };
    Ok(decoded)
}

fn run_block(args: &Args, size: usize, kind: BlockKind, dict_path: Option<&std::path::Path>) -> Result<()> {
    let input = read_src(&args.input).with_context(|| format!("cannot read {}", args.input))?;
    let dict = dict_path
        .map(|p| fs::read(p).with_context(|| format!("cannot read dictionary {}", p.display())))
        .transpose()?;

    displaylevel!(4, "{}: {} compressed bytes, {:?}\n", args.input, input.len(), kind);
    let decoded = decode_block(&input, size, kind, dict.as_deref())
        .with_context(|| format!("{}: block decoding failed", args.input))?;

    let mut dst = open_dst(&args.output).with_context(|| format!("cannot create {}", args.output))?;
    dst.write_all(&decoded)
        .and_then(|()| dst.flush())
        .with_context(|| format!("cannot write {}", args.output))?;
    displaylevel!(2, "{}: decoded {} bytes\n", args.input, decoded.len());

    verify_xxh32(args.xxh32, xxh32(&decoded, 0))
}

fn try_main(args: Args) -> Result<()> {
    set_display_level(args.display_level());
    displaylevel!(
        3,
        "*** {} v{} {}-bit, {} decode loop ***\n",
        PROGRAM_NAME,
        lz4kd::version_string(),
        std::mem::size_of::<*const ()>() * 8,
        LOOP_MODE
    );

    match args.plan().map_err(|e| anyhow!(e))? {
        Plan::Legacy { workers } => run_legacy(&args, workers),
        Plan::Block { size, kind, dict } => run_block(&args, size, kind, dict.as_deref()),
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display!("{}: {:#}\n", PROGRAM_NAME, err);
            ExitCode::from(1)
        }
    }
}
