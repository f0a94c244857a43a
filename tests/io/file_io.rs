// Source/destination helpers used by the binary.

use std::fs;
use std::io::{self, Read, Write};

use lz4kd::io::{open_dst, open_src, read_src, STDIO_MARK};
use tempfile::TempDir;

#[test]
fn stdio_mark_is_dash() {
    assert_eq!(STDIO_MARK, "-");
}

#[test]
fn open_dst_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.bin");
    fs::write(&path, vec![0xAAu8; 4096]).unwrap();

    let p = path.to_str().unwrap();
    let mut w = open_dst(p).unwrap();
    w.write_all(b"short").unwrap();
    w.flush().unwrap();
    drop(w);

    assert_eq!(fs::read(&path).unwrap(), b"short");
}

#[test]
fn open_src_streams_large_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.bin");
    let data = crate::common::mixed(1 << 20, 4);
    fs::write(&path, &data).unwrap();

    let mut r = open_src(path.to_str().unwrap()).unwrap();
    let mut got = Vec::new();
    r.read_to_end(&mut got).unwrap();
    assert!(got == data);
    assert!(read_src(path.to_str().unwrap()).unwrap() == data);
}

#[test]
fn directories_are_invalid_input() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().to_str().unwrap();
    assert_eq!(read_src(p).unwrap_err().kind(), io::ErrorKind::InvalidInput);
    assert_eq!(open_dst(p).err().map(|e| e.kind()), Some(io::ErrorKind::InvalidInput));
}
