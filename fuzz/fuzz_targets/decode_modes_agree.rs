#![no_main]
use libfuzzer_sys::fuzz_target;

// Whenever the full decoder accepts a block into a buffer of exactly its
// decoded size, the partial decoder must produce the same prefix at every
// stopping point tried, and the fast decoder must reproduce the output while
// consuming the whole input.
fuzz_target!(|data: &[u8]| {
    let mut probe = vec![0u8; 1 << 16];
    let Ok(n) = lz4kd::decompress_safe(data, &mut probe) else { return };
    let mut full = vec![0u8; n];
    if lz4kd::decompress_safe(data, &mut full) != Ok(n) {
        return;
    }
    let full = &full[..];

    for target in [0, 1, n / 3, n / 2, n.saturating_sub(1), n] {
        let mut dst = vec![0u8; n];
        let got = lz4kd::decompress_safe_partial(data, &mut dst, target);
        assert_eq!(got, Ok(target), "partial target {target}");
        assert_eq!(&dst[..target], &full[..target]);
    }

    let mut dst = vec![0u8; n];
    assert_eq!(lz4kd::decompress_fast(data, &mut dst), Ok(data.len()));
    assert_eq!(&dst[..], full);
});
