#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through every block entry point.
    // Err results are expected and fine; what we verify is no panics.

    // Zero-length output buffer.
    {
        let mut dst = vec![0u8; 0];
        let _ = lz4kd::decompress_safe(data, &mut dst);
        let _ = lz4kd::decompress_fast(data, &mut dst);
    }

    // 4 KiB output buffer: covers most real block sizes.
    {
        let mut dst = vec![0u8; 4096];
        let _ = lz4kd::decompress_safe(data, &mut dst);
        let _ = lz4kd::decompress_safe_partial(data, &mut dst, 1000);
        let _ = lz4kd::decompress_fast(data, &mut dst);
    }

    // The input's own tail as an external dictionary and as a prefix.
    if data.len() > 8 {
        let (block, dict) = data.split_at(data.len() / 2);
        let mut dst = vec![0u8; 4096];
        let _ = lz4kd::decompress_safe_using_dict(block, &mut dst, dict);
        let _ = lz4kd::decompress_fast_using_dict(block, &mut dst, dict);

        let mut buf = dict.to_vec();
        buf.resize(dict.len() + 4096, 0);
        let _ = lz4kd::decompress_safe_with_prefix(&mut buf, dict.len(), block);
    }

    // Large output buffer to stress the length-limit path.
    {
        // Cap at 1 MiB so tiny inputs that claim huge output don't OOM.
        let large = (data.len().saturating_mul(255)).min(1 << 20);
        let mut dst = vec![0u8; large];
        let _ = lz4kd::decompress_safe(data, &mut dst);
    }

    // In place, block resident at the tail.
    {
        let out_len = data.len().saturating_mul(4).min(1 << 16);
        let len = lz4kd::decompress_inplace_buffer_size(out_len).max(data.len());
        let mut buf = vec![0u8; len];
        buf[len - data.len()..].copy_from_slice(data);
        let _ = lz4kd::decompress_in_place(&mut buf, data.len(), out_len);
    }
});
