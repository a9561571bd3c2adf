//! Resumable, buffer-bounded conversion of a UTF-8 byte stream.
//!
//! A [`Transducer`] is fed arbitrary slices of input and output buffer. Each
//! call converts as many whole code points as fit and reports why it stopped:
//! the input ran out ([`Signal::Done`]), a code point is split across the end
//! of the input ([`Signal::NeedMoreInput`]), or the output buffer cannot take
//! the next emission ([`Signal::OutputBufferFull`]). A stopped step leaves the
//! transducer untouched, so the caller can drain output and call again with
//! the unconsumed input.
//!
//! Under ligature mode the transducer holds at most one half-width base kana
//! between steps (and between calls) until it knows whether a voicing mark
//! follows.

pub mod utf8;


use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use crate::rules::{is_voicing_mark, ConversionPlan};
use utf8::{decode_first, Decoded};

/// Why a [`Transducer::transduce`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// All input was consumed. At end of stream the pending base was flushed.
    Done,
    /// The input ends inside a code point; resend those bytes with more data.
    NeedMoreInput,
    /// The next emission does not fit in the remaining output buffer.
    OutputBufferFull,
}

/// Outcome of one [`Transducer::transduce`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes of `src` consumed.
    pub consumed: usize,
    /// Bytes written to the front of `dst`.
    pub written: usize,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransduceError {
    /// `position` is the offset of the bad sequence in `src`; `written` bytes
    /// converted before it are in `dst`.
    #[error("invalid UTF-8 sequence at byte {position}")]
    InvalidEncoding { position: usize, written: usize },
    #[error("stream already failed on invalid UTF-8")]
    Broken,
}

/// Code points produced by one step: a flushed base plus a mapped code
/// point that may split into base and mark.
type Emission = SmallVec<[char; 3]>;

/// Per-stream conversion state. Cheap to create; share the plan, not the
/// transducer.
#[derive(Debug, Clone)]
pub struct Transducer {
    plan: Arc<ConversionPlan>,
    pending: Option<char>,
    broken: bool,
}

impl Transducer {
    pub fn new(plan: Arc<ConversionPlan>) -> Self {
        Self {
            plan,
            pending: None,
            broken: false,
        }
    }

    /// Whether a half-width base is buffered awaiting a possible voicing mark.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget any buffered base and a previous encoding failure, so the
    /// transducer can start a new stream.
    pub fn reset(&mut self) {
        self.pending = None;
        self.broken = false;
    }

    /// Convert from `src` into `dst`.
    ///
    /// `at_eof` declares that no input follows `src`: an incomplete trailing
    /// sequence is then an encoding error, and a buffered base is flushed once
    /// `src` is exhausted.
    pub fn transduce(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        at_eof: bool,
    ) -> Result<Progress, TransduceError> {
        if self.broken {
            return Err(TransduceError::Broken);
        }

        let mut consumed = 0;
        let mut written = 0;
        let stop = |consumed, written, signal| {
            Ok(Progress {
                consumed,
                written,
                signal,
            })
        };

        while consumed < src.len() {
            let (c, len) = match decode_first(&src[consumed..]) {
                Decoded::Char(c, len) => (c, len),
                Decoded::Incomplete if !at_eof => {
                    return stop(consumed, written, Signal::NeedMoreInput);
                }
                Decoded::Incomplete | Decoded::Invalid => {
                    debug!(position = consumed, "invalid UTF-8");
                    self.broken = true;
                    return Err(TransduceError::InvalidEncoding {
                        position: consumed,
                        written,
                    });
                }
            };

            let (emission, pending) = self.step(c);
            let Some(n) = encode_into(&emission, &mut dst[written..]) else {
                return stop(consumed, written, Signal::OutputBufferFull);
            };
            self.pending = pending;
            written += n;
            consumed += len;
        }

        if at_eof {
            if let Some(base) = self.pending {
                let emission = self.flush(base);
                let Some(n) = encode_into(&emission, &mut dst[written..]) else {
                    return stop(consumed, written, Signal::OutputBufferFull);
                };
                self.pending = None;
                written += n;
            }
        }
        stop(consumed, written, Signal::Done)
    }

    /// Decide what `c` emits given the current pending base, and what the
    /// pending base becomes. Pure: state is only committed once the emission
    /// fits the output.
    fn step(&self, c: char) -> (Emission, Option<char>) {
        let mut emission = Emission::new();
        let Some(target) = self.plan.ligature() else {
            emission.extend(self.plan.map_char(c).chars());
            return (emission, None);
        };

        if is_voicing_mark(c) {
            match self.pending {
                Some(base) => match target.compose(base, c) {
                    Some(composed) => emission.push(composed),
                    None => {
                        emission.push(target.map_single(base));
                        emission.push(target.map_single(c));
                    }
                },
                None => emission.push(target.map_single(c)),
            }
            return (emission, None);
        }

        if let Some(base) = self.pending {
            emission.push(target.map_single(base));
        }
        if target.is_combinable(c) {
            return (emission, Some(c));
        }
        emission.extend(self.plan.map_char(c).chars());
        (emission, None)
    }

    fn flush(&self, base: char) -> Emission {
        let mut emission = Emission::new();
        match self.plan.ligature() {
            Some(target) => emission.push(target.map_single(base)),
            None => emission.extend(self.plan.map_char(base).chars()),
        }
        emission
    }
}

/// Encode every code point of `emission` into `dst`, or nothing at all if the
/// whole emission does not fit. Returns the number of bytes written.
fn encode_into(emission: &[char], dst: &mut [u8]) -> Option<usize> {
    let needed: usize = emission.iter().map(|c| c.len_utf8()).sum();
    if needed > dst.len() {
        return None;
    }
    let mut n = 0;
    for c in emission {
        n += c.encode_utf8(&mut dst[n..]).len();
    }
    Some(n)
}
