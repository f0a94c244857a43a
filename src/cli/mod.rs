//! Command-line interface for the `lz4kd` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the shared `DISPLAY_LEVEL` atomic with its display macros. |
//! | [`args`]      | clap-derived `Args` and their validation into a `Plan`. |
//!
//! Typical call sequence: `Args::parse` → `Args::plan` → dispatch to the block API or the I/O layer.

pub mod args;
pub mod constants;
