//! LZ4 block decompression core engine.
//!
//! A single sequence grammar, decoded by two interchangeable steps:
//!   - [`Decoder::fast_sequence`]: taken while at least
//!     `FASTLOOP_SAFE_DISTANCE` bytes of output slack remain; copies in wide
//!     stripes and checks boundaries once per sequence
//!   - [`Decoder::safe_sequence`]: clamps every copy to the buffer ends and
//!     owns partial decoding and exact-termination rules
//!
//! When the fast step meets a sequence it cannot handle (escape length near
//! the end, small offset close to the boundary, match into an external
//! dictionary) it hands the half-decoded sequence to the safe step.  The
//! driver re-evaluates the slack before every token.
//!
//! # Security boundary
//!
//! Cursors are plain indices into caller-owned slices.  Every length decoded
//! from the stream is added to a cursor through [`Decoder::grow`] before it
//! bounds a copy, and every back-reference goes through [`Decoder::resolve`].
//! Malformed or truncated input yields a [`DecompressError`]; it must never
//! panic.

use core::cmp::min;

use super::copy::{
    copy_match_head, memcpy_using_offset, overlap_copy, wild_copy32, wild_copy8, wild_copy_from,
    wild_copy_within,
};
use super::error::{DecodeErrorKind, DecompressError};
use super::types::{
    read_le16, DecodeConfig, DictDirective, FASTLOOP_SAFE_DISTANCE, LASTLITERALS,
    MATCH_SAFEGUARD_DISTANCE, MFLIMIT, MINMATCH, ML_BITS, ML_MASK, RUN_MASK, WILDCOPYLENGTH,
};
use crate::config::FAST_DEC_LOOP;

const RUN_ESCAPE: usize = RUN_MASK as usize;
const ML_ESCAPE: usize = ML_MASK as usize;

// ─────────────────────────────────────────────────────────────────────────────
// Input sources
// ─────────────────────────────────────────────────────────────────────────────

/// Where the compressed bytes live.
///
/// The decoder reads tokens, lengths and literals through this seam so the
/// same loop serves a separate input slice and a block stored inside the
/// output buffer itself (in-place decompression).
pub trait Source {
    /// Compressed length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte at input position `at`; `at < self.len()`.
    fn byte(&self, window: &[u8], at: usize) -> u8;

    /// Little-endian offset field at `at`, if two bytes remain.
    fn le16(&self, window: &[u8], at: usize) -> Option<u16>;

    /// Exact copy of `len` literals to `window[dst..]`; correct even when the
    /// ranges overlap.
    fn copy_literals(&self, window: &mut [u8], at: usize, dst: usize, len: usize);

    /// Stripe copy of literals up to `end`, overshooting by less than `STRIPE`.
    fn wild_copy_literals<const STRIPE: usize>(&self, window: &mut [u8], at: usize, dst: usize, end: usize);
}

/// Compressed block in its own buffer.
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a>(pub &'a [u8]);

impl Source for SliceSource<'_> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn byte(&self, _window: &[u8], at: usize) -> u8 {
        self.0[at]
    }

    #[inline(always)]
    fn le16(&self, _window: &[u8], at: usize) -> Option<u16> {
        read_le16(self.0, at)
    }

    #[inline(always)]
    fn copy_literals(&self, window: &mut [u8], at: usize, dst: usize, len: usize) {
        window[dst..dst + len].copy_from_slice(&self.0[at..at + len]);
    }

    #[inline(always)]
    fn wild_copy_literals<const STRIPE: usize>(&self, window: &mut [u8], at: usize, dst: usize, end: usize) {
        wild_copy_from::<STRIPE>(self.0, at, window, dst, end);
    }
}

/// Compressed block stored at `window[base..base + len]`, ahead of the output.
#[derive(Clone, Copy, Debug)]
pub struct ResidentSource {
    pub base: usize,
    pub len: usize,
}

impl Source for ResidentSource {
    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn byte(&self, window: &[u8], at: usize) -> u8 {
        window[self.base + at]
    }

    #[inline(always)]
    fn le16(&self, window: &[u8], at: usize) -> Option<u16> {
        if at.checked_add(2)? > self.len {
            return None;
        }
        read_le16(window, self.base + at)
    }

    #[inline(always)]
    fn copy_literals(&self, window: &mut [u8], at: usize, dst: usize, len: usize) {
        let from = self.base + at;
        window.copy_within(from..from + len, dst);
    }

    #[inline(always)]
    fn wild_copy_literals<const STRIPE: usize>(&self, window: &mut [u8], at: usize, dst: usize, end: usize) {
        wild_copy_within::<STRIPE>(window, self.base + at, dst, end);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output window
// ─────────────────────────────────────────────────────────────────────────────

/// Output buffer plus the three indices that bound decoding.
///
/// `buf[low..start]` is prefix history, `buf[start..end]` receives output.
#[derive(Debug)]
pub struct OutputWindow<'a> {
    pub buf: &'a mut [u8],
    /// Earliest index a back-reference may resolve to.
    pub low: usize,
    /// First output index.
    pub start: usize,
    /// Exclusive output limit.
    pub end: usize,
}

impl<'a> OutputWindow<'a> {
    /// Whole buffer is output, no history.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let end = buf.len();
        Self { buf, low: 0, start: 0, end }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder state
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one decoded sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Flow {
    Next,
    Done,
}

/// Where a back-reference reads from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MatchSource {
    /// Index into the output window (`>= low`).
    Window(usize),
    /// Starts `back` bytes before the end of the external dictionary.
    Dict { back: usize },
}

struct Decoder<'a, S: Source> {
    src: S,
    ip: usize,
    iend: usize,
    out: &'a mut [u8],
    low: usize,
    start: usize,
    op: usize,
    oend: usize,
    dict: &'a [u8],
    cfg: DecodeConfig,
}

impl<S: Source> Decoder<'_, S> {
    #[inline(always)]
    fn error(&self, kind: DecodeErrorKind) -> DecompressError {
        DecompressError::new(kind, self.ip)
    }

    /// Overflow-checked `pos + len`.
    #[inline(always)]
    fn grow(&self, pos: usize, len: usize) -> Result<usize, DecompressError> {
        pos.checked_add(len)
            .ok_or_else(|| self.error(DecodeErrorKind::LengthOverflow))
    }

    #[inline(always)]
    fn read_token(&mut self) -> Result<u8, DecompressError> {
        if self.ip >= self.iend {
            return Err(self.error(DecodeErrorKind::TruncatedInput));
        }
        let token = self.src.byte(self.out, self.ip);
        self.ip += 1;
        Ok(token)
    }

    #[inline(always)]
    fn read_offset(&mut self) -> Result<usize, DecompressError> {
        let offset = self
            .src
            .le16(self.out, self.ip)
            .ok_or_else(|| self.error(DecodeErrorKind::TruncatedInput))?;
        self.ip += 2;
        Ok(offset as usize)
    }

    /// Reading limit for a literal-length extension.
    #[inline(always)]
    fn literal_limit(&self) -> usize {
        if self.cfg.end_on_input() {
            self.iend.saturating_sub(RUN_ESCAPE)
        } else {
            self.iend
        }
    }

    /// Reading limit for a match-length extension: leaves room for the
    /// trailing literals that must follow every match.
    #[inline(always)]
    fn match_limit(&self) -> usize {
        if self.cfg.end_on_input() {
            (self.iend + 1).saturating_sub(LASTLITERALS)
        } else {
            self.iend
        }
    }

    // ── read_variable_length ─────────────────────────────────────────────────

    /// Accumulate continuation bytes until one is below 255.
    ///
    /// `initial_check`: fail before reading anything when `ip >= limit`.
    /// Fails as soon as the cursor moves past `limit`.
    #[inline(always)]
    fn read_variable_length(&mut self, limit: usize, initial_check: bool) -> Result<usize, DecompressError> {
        if initial_check && self.ip >= limit {
            return Err(self.error(DecodeErrorKind::VarIntOverrun));
        }
        let mut length: usize = 0;
        loop {
            if self.ip >= self.iend {
                return Err(self.error(DecodeErrorKind::TruncatedInput));
            }
            let s = self.src.byte(self.out, self.ip);
            self.ip += 1;
            length = length
                .checked_add(s as usize)
                .ok_or_else(|| self.error(DecodeErrorKind::LengthOverflow))?;
            if self.ip > limit {
                return Err(self.error(DecodeErrorKind::VarIntOverrun));
            }
            if s != 255 {
                return Ok(length);
            }
        }
    }

    // ── offset / dictionary resolution ───────────────────────────────────────

    /// Turn a back-reference offset into a source location, rejecting zero
    /// and anything before `low - dict.len()`.
    #[inline(always)]
    fn resolve(&self, offset: usize) -> Result<MatchSource, DecompressError> {
        let history = self.op - self.low;
        if offset == 0 {
            return Err(self.error(DecodeErrorKind::OffsetOutOfBounds));
        }
        if offset <= history {
            return Ok(MatchSource::Window(self.op - offset));
        }
        let back = offset - history;
        if self.cfg.dict == DictDirective::UsingExtDict && back <= self.dict.len() {
            return Ok(MatchSource::Dict { back });
        }
        Err(self.error(DecodeErrorKind::OffsetOutOfBounds))
    }

    // ── driver ───────────────────────────────────────────────────────────────

    fn run(&mut self) -> Result<usize, DecompressError> {
        loop {
            let flow = if FAST_DEC_LOOP && self.oend - self.op >= FASTLOOP_SAFE_DISTANCE {
                self.fast_sequence()?
            } else {
                self.safe_sequence()?
            };
            if flow == Flow::Done {
                break;
            }
        }

        if self.cfg.end_on_input() {
            Ok(self.op - self.start)
        } else {
            Ok(self.ip)
        }
    }

    // ── fast loop ────────────────────────────────────────────────────────────

    /// Decode one sequence with stripe copies.
    ///
    /// Entry requires `oend - op >= FASTLOOP_SAFE_DISTANCE`; each copy below
    /// re-establishes the slack it needs or defers to the safe step.
    fn fast_sequence(&mut self) -> Result<Flow, DecompressError> {
        debug_assert!(self.oend - self.op >= FASTLOOP_SAFE_DISTANCE);
        let end_on_input = self.cfg.end_on_input();
        let token = self.read_token()?;
        let mut length = (token >> ML_BITS) as usize;

        // decode literal length
        if length == RUN_ESCAPE {
            length += self.read_variable_length(self.literal_limit(), end_on_input)?;
            let cpy = self.grow(self.op, length)?;
            let lit_end = self.grow(self.ip, length)?;

            if end_on_input {
                if cpy.saturating_add(32) > self.oend || lit_end.saturating_add(32) > self.iend {
                    return self.safe_sequence_from_literals(token, length);
                }
                self.src.wild_copy_literals::<32>(self.out, self.ip, self.op, cpy);
            } else {
                // No input bound to lean on: only 8-byte stripes.
                if cpy + WILDCOPYLENGTH > self.oend || lit_end.saturating_add(WILDCOPYLENGTH) > self.iend {
                    return self.safe_sequence_from_literals(token, length);
                }
                self.src.wild_copy_literals::<8>(self.out, self.ip, self.op, cpy);
            }
            self.ip = lit_end;
            self.op = cpy;
        } else {
            let cpy = self.op + length;
            if end_on_input {
                // max literals + offset + next token
                if self.ip + 16 + 1 > self.iend {
                    return self.safe_sequence_from_literals(token, length);
                }
                self.src.wild_copy_literals::<16>(self.out, self.ip, self.op, cpy);
            } else {
                if self.ip + 16 > self.iend {
                    return self.safe_sequence_from_literals(token, length);
                }
                self.src.wild_copy_literals::<8>(self.out, self.ip, self.op, cpy);
            }
            self.ip += length;
            self.op = cpy;
        }

        // get offset
        let offset = self.read_offset()?;
        let source = self.resolve(offset)?;

        // get match length
        let ml = (token & ML_MASK as u8) as usize;
        let mut length = ml;
        if ml == ML_ESCAPE {
            length += self.read_variable_length(self.match_limit(), false)?;
            self.grow(self.op, length)?;
        }
        length = self.grow(length, MINMATCH)?;

        if length.saturating_add(FASTLOOP_SAFE_DISTANCE) >= self.oend - self.op {
            return self.safe_match(offset, source, length);
        }

        let m = match source {
            MatchSource::Window(m) => m,
            // Split dictionary/prefix matches are the safe step's business.
            MatchSource::Dict { .. } => return self.safe_match(offset, source, length),
        };

        // Fastpath: non-escaped length, no overlap inside an 8-byte stripe.
        if ml != ML_ESCAPE && offset >= 8 {
            self.copy18(m);
            self.op += length;
            return Ok(Flow::Next);
        }

        let cpy = self.op + length;
        if offset < 16 {
            memcpy_using_offset(self.out, m, self.op, cpy, offset);
        } else {
            wild_copy32(self.out, m, self.op, cpy);
        }
        self.op = cpy; // wildcopy correction
        Ok(Flow::Next)
    }

    /// Copy 18 bytes of a match with offset >= 8 as three stripes.
    #[inline(always)]
    fn copy18(&mut self, m: usize) {
        let op = self.op;
        self.out.copy_within(m..m + 8, op);
        self.out.copy_within(m + 8..m + 16, op + 8);
        self.out.copy_within(m + 16..m + 18, op + 16);
    }

    // ── safe loop ────────────────────────────────────────────────────────────

    /// Whether the two-stage literal/match shortcut may run for this token.
    ///
    /// Literals of 0..14 bytes are copied as one 16-byte stripe (8 when
    /// bounded by output only), and a short match as 18 bytes; the combined
    /// room for both is checked once here.
    #[inline(always)]
    fn shortcut_applies(&self, length: usize) -> bool {
        if self.cfg.end_on_input() {
            // strictly less on input, to re-enter the loop with at least one byte
            length != RUN_ESCAPE && self.ip + 14 + 2 < self.iend && self.op + 14 + 18 <= self.oend
        } else {
            length <= 8 && self.ip + 8 + 2 <= self.iend && self.op + 8 + 18 <= self.oend
        }
    }

    /// Decode one sequence with every copy clamped to the buffer ends.
    fn safe_sequence(&mut self) -> Result<Flow, DecompressError> {
        let token = self.read_token()?;
        let mut length = (token >> ML_BITS) as usize;

        if self.shortcut_applies(length) {
            let cpy = self.op + length;
            if self.cfg.end_on_input() {
                self.src.wild_copy_literals::<16>(self.out, self.ip, self.op, cpy);
            } else {
                self.src.wild_copy_literals::<8>(self.out, self.ip, self.op, cpy);
            }
            self.ip += length;
            self.op = cpy;

            // Second stage: the match.  If it does not qualify the decoded
            // offset is handed straight to the general match path.
            let ml = (token & ML_MASK as u8) as usize;
            let offset = self.read_offset()?;
            if ml != ML_ESCAPE && offset >= 8 && offset <= self.op - self.low {
                self.copy18(self.op - offset);
                self.op += ml + MINMATCH;
                return Ok(Flow::Next);
            }
            return self.match_phase(ml, offset);
        }

        if length == RUN_ESCAPE {
            length += self.read_variable_length(self.literal_limit(), self.cfg.end_on_input())?;
            self.grow(self.op, length)?;
            self.grow(self.ip, length)?;
        }
        self.safe_sequence_from_literals(token, length)
    }

    /// Finish a sequence whose literal length is already decoded.
    fn safe_sequence_from_literals(&mut self, token: u8, length: usize) -> Result<Flow, DecompressError> {
        if self.safe_literals(token, length)? == Flow::Done {
            return Ok(Flow::Done);
        }
        let offset = self.read_offset()?;
        self.match_phase((token & ML_MASK as u8) as usize, offset)
    }

    /// Resolve the offset, decode the match length, copy the match.
    fn match_phase(&mut self, ml: usize, offset: usize) -> Result<Flow, DecompressError> {
        let source = self.resolve(offset)?;
        let mut length = ml;
        if ml == ML_ESCAPE {
            length += self.read_variable_length(self.match_limit(), false)?;
            self.grow(self.op, length)?;
        }
        length = self.grow(length, MINMATCH)?;
        self.safe_match(offset, source, length)
    }

    /// Copy `length` literals, honouring end-of-block and partial rules.
    fn safe_literals(&mut self, token: u8, length: usize) -> Result<Flow, DecompressError> {
        let partial = self.cfg.partial();
        let end_on_input = self.cfg.end_on_input();
        let cpy = self.grow(self.op, length)?;
        let lit_end = self.grow(self.ip, length)?;

        let near_end = if end_on_input {
            cpy.saturating_add(MFLIMIT) > self.oend
                || lit_end.saturating_add(2 + 1 + LASTLITERALS) > self.iend
        } else {
            cpy.saturating_add(WILDCOPYLENGTH) > self.oend
                || lit_end.saturating_add(WILDCOPYLENGTH) > self.iend
        };

        if !near_end {
            // may overwrite up to WILDCOPYLENGTH beyond cpy
            self.src.wild_copy_literals::<8>(self.out, self.ip, self.op, cpy);
            self.ip = lit_end;
            self.op = cpy;
            return Ok(Flow::Next);
        }

        let (mut cpy, mut length) = (cpy, length);
        if partial {
            // stop in the middle of the literal segment
            if cpy > self.oend {
                cpy = self.oend;
                length = self.oend - self.op;
            }
            if self.ip + length > self.iend {
                return Err(self.error(DecodeErrorKind::TruncatedInput));
            }
        } else if end_on_input {
            // input must be consumed exactly
            if lit_end != self.iend || cpy > self.oend {
                return Err(self.error(DecodeErrorKind::BadTermination));
            }
        } else {
            // block decoding must stop exactly at the expected size
            if cpy != self.oend {
                return Err(self.error(DecodeErrorKind::BadTermination));
            }
            if lit_end > self.iend {
                return Err(self.error(DecodeErrorKind::TruncatedInput));
            }
        }

        // Overlap-safe: in-place decoding reads literals from the output buffer.
        self.src.copy_literals(self.out, self.ip, self.op, length);
        self.ip += length;
        self.op += length;

        // Partial decoding ends once the output is full or no complete
        // sequence can follow.  With exactly an offset left, the match is
        // still taken when it alone reaches the target.
        if !partial || cpy == self.oend || self.ip + 2 > self.iend {
            return Ok(Flow::Done);
        }
        if self.ip + 2 == self.iend && !self.final_match_reaches_target(token) {
            return Ok(Flow::Done);
        }
        Ok(Flow::Next)
    }

    fn final_match_reaches_target(&self, token: u8) -> bool {
        let ml = (token & ML_MASK as u8) as usize;
        ml != ML_ESCAPE && self.op + ml + MINMATCH >= self.oend
    }

    /// Copy a match of `length` bytes (MINMATCH included).
    fn safe_match(&mut self, offset: usize, source: MatchSource, length: usize) -> Result<Flow, DecompressError> {
        match source {
            MatchSource::Window(m) => self.copy_from_window(m, offset, length),
            MatchSource::Dict { back } => self.copy_from_dict(back, length),
        }
    }

    fn copy_from_dict(&mut self, back: usize, length: usize) -> Result<Flow, DecompressError> {
        let mut length = length;
        if self.op.saturating_add(length).saturating_add(LASTLITERALS) > self.oend {
            if !self.cfg.partial() {
                return Err(self.error(DecodeErrorKind::LastLiteralsViolation));
            }
            length = min(length, self.oend - self.op);
        }

        let dict_end = self.dict.len();
        let op = self.op;
        if length <= back {
            // match fits entirely within the external dictionary
            let from = dict_end - back;
            self.out[op..op + length].copy_from_slice(&self.dict[from..from + length]);
            self.op += length;
        } else {
            // dictionary tail, then continue from the low bound
            let rest = length - back;
            self.out[op..op + back].copy_from_slice(&self.dict[dict_end - back..]);
            self.op += back;
            let op = self.op;
            if rest > op - self.low {
                overlap_copy(self.out, self.low, op, rest);
            } else {
                self.out.copy_within(self.low..self.low + rest, op);
            }
            self.op += rest;
        }

        if self.cfg.partial() && self.op == self.oend {
            return Ok(Flow::Done);
        }
        Ok(Flow::Next)
    }

    fn copy_from_window(&mut self, m: usize, offset: usize, length: usize) -> Result<Flow, DecompressError> {
        let oend = self.oend;
        let cpy = self.grow(self.op, length)?;

        // Partial decoding may ignore the end-of-block parsing restrictions.
        if self.cfg.partial() && cpy.saturating_add(MATCH_SAFEGUARD_DISTANCE) > oend {
            let mlen = min(length, oend - self.op);
            if m + mlen > self.op {
                overlap_copy(self.out, m, self.op, mlen);
            } else {
                self.out.copy_within(m..m + mlen, self.op);
            }
            self.op += mlen;
            if self.op == oend {
                return Ok(Flow::Done);
            }
            return Ok(Flow::Next);
        }

        // The last LASTLITERALS bytes of a block must be literals.
        if cpy.saturating_add(LASTLITERALS) > oend {
            return Err(self.error(DecodeErrorKind::LastLiteralsViolation));
        }

        let mut src = copy_match_head(self.out, m, self.op, offset);
        let mut op = self.op + 8;

        if cpy + MATCH_SAFEGUARD_DISTANCE > oend {
            let copy_limit = oend - (WILDCOPYLENGTH - 1);
            if op < copy_limit {
                wild_copy8(self.out, src, op, copy_limit);
                src += copy_limit - op;
                op = copy_limit;
            }
            while op < cpy {
                self.out[op] = self.out[src];
                op += 1;
                src += 1;
            }
        } else {
            self.out.copy_within(src..src + 8, op);
            if length > 16 {
                wild_copy8(self.out, src + 8, op + 8, cpy);
            }
        }

        self.op = cpy; // wildcopy correction
        Ok(Flow::Next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_generic
// ─────────────────────────────────────────────────────────────────────────────

/// Core LZ4 block decompression.
///
/// | Parameter | Meaning                                                       |
/// |-----------|---------------------------------------------------------------|
/// | `src`     | Compressed block ([`SliceSource`] or [`ResidentSource`])      |
/// | `window`  | Output buffer with its low bound, output start and limit      |
/// | `dict`    | External dictionary (only read with `UsingExtDict`)           |
/// | `cfg`     | End condition, partial flag and dictionary directive          |
///
/// With `EndCondition::OnInputSize` returns the number of bytes written;
/// with `EndCondition::OnOutputSize` returns the number of input bytes
/// consumed.
pub fn decompress_generic<S: Source>(
    src: S,
    window: OutputWindow<'_>,
    dict: &[u8],
    cfg: DecodeConfig,
) -> Result<usize, DecompressError> {
    let OutputWindow { buf, low, start, end } = window;
    let invalid = DecompressError::new(DecodeErrorKind::InvalidArgument, 0);

    if low > start || start > end || end > buf.len() {
        return Err(invalid);
    }
    if cfg.dict == DictDirective::NoDict && low != start {
        return Err(invalid);
    }
    let dict = if cfg.dict == DictDirective::UsingExtDict { dict } else { &[] };

    // Empty output buffer
    if end == start {
        if cfg.end_on_input() {
            if cfg.partial() {
                return Ok(0);
            }
            return if src.len() == 1 && src.byte(buf, 0) == 0 {
                Ok(0)
            } else {
                Err(DecompressError::new(DecodeErrorKind::EmptyOutput, 0))
            };
        }
        return if !src.is_empty() && src.byte(buf, 0) == 0 {
            Ok(1)
        } else {
            Err(DecompressError::new(DecodeErrorKind::EmptyOutput, 0))
        };
    }
    if src.is_empty() {
        return Err(DecompressError::new(DecodeErrorKind::TruncatedInput, 0));
    }

    let iend = src.len();
    let mut decoder = Decoder {
        src,
        ip: 0,
        iend,
        out: buf,
        low,
        start,
        op: start,
        oend: end,
        dict,
        cfg,
    };
    decoder.run()
}
