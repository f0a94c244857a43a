// config.rs: Compile-time configuration constants.
//
// Target selection for the decode loop happens in build.rs, which emits
// `cfg(fast_dec_loop)`; everything else the library and binary tune is a
// plain constant here.

// Whether the wide-stripe fast decode loop is compiled in.
// Set by build.rs on x86, x86_64 and aarch64 unless the `safe-loop-only`
// feature is enabled.  When false every sequence goes through the safe step.
pub const FAST_DEC_LOOP: bool = cfg!(fast_dec_loop);

// Magic number opening every legacy frame (little-endian on the wire).
pub const LEGACY_MAGICNUMBER: u32 = 0x184C_2102;

// Decoded size of every legacy-frame block but the last (8 MiB).
pub const LEGACY_BLOCKSIZE: usize = 8 << 20;

// Default number of worker threads for legacy-frame decoding.
// Can be overridden by the LZ4KD_NBWORKERS environment variable,
// or by the -T# command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 4;

// Upper bound accepted for -T#.
pub const NB_WORKERS_MAX: usize = 200;

// Blocks decoded per worker in one parallel batch.
pub const NB_BUFFSETS: usize = 4;

// Cap on compressed blocks held in one parallel batch, whatever the worker
// count.  Each may decode to LEGACY_BLOCKSIZE bytes (256 MiB in total).
pub const LEGACY_MAX_BLOCKS_IN_FLIGHT: usize = 32;
