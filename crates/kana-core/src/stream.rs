//! `std::io::Write` adapter that converts everything written through it.

use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;

use crate::rules::ConversionPlan;
use crate::settings::settings;
use crate::transducer::{Signal, TransduceError, Transducer};

/// Converts bytes written to it and forwards the result to `inner`.
///
/// Writes may split code points anywhere; incomplete tails are carried to the
/// next write. A half-width base held for a possible voicing mark is only
/// released by [`KanaWriter::finish`], which must be called at end of input.
///
/// Output that `inner` refuses stays staged and is retried first on the next
/// call. A `write` that fails before `inner` took any of its output leaves
/// the converter as it was, so the same bytes can be written again.
pub struct KanaWriter<W: Write> {
    inner: W,
    transducer: Transducer,
    /// Unconverted input: an incomplete trailing code point, or input left
    /// over after `inner` refused output.
    input: Vec<u8>,
    out: Vec<u8>,
    /// Converted bytes in `out` not yet accepted by `inner`.
    staged: Range<usize>,
    /// Stream offset of `input[0]`, for error positions.
    offset: usize,
}

impl<W: Write> KanaWriter<W> {
    pub fn new(plan: Arc<ConversionPlan>, inner: W) -> Self {
        Self::with_capacity(plan, inner, settings().stream.output_chunk)
    }

    /// `capacity` is the output staging buffer size; values below what one
    /// step can emit are raised.
    pub fn with_capacity(plan: Arc<ConversionPlan>, inner: W, capacity: usize) -> Self {
        Self {
            inner,
            transducer: Transducer::new(plan),
            input: Vec::new(),
            out: vec![0u8; capacity.max(crate::settings::MIN_OUTPUT_CHUNK)],
            staged: 0..0,
            offset: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush the held base and any carried bytes, then return the inner writer.
    /// An incomplete code point left at the end is an `InvalidData` error.
    pub fn finish(mut self) -> io::Result<W> {
        self.catch_up(true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Hand staged output to `inner` and convert carried input until only an
    /// incomplete code point (or nothing) is left.
    fn catch_up(&mut self, at_eof: bool) -> io::Result<()> {
        loop {
            self.drain_out()?;
            if self.convert(at_eof)? != Signal::OutputBufferFull {
                return self.drain_out();
            }
        }
    }

    /// Convert carried input into the empty staging buffer and drop the
    /// consumed bytes. Output ahead of a bad sequence is still delivered.
    fn convert(&mut self, at_eof: bool) -> io::Result<Signal> {
        debug_assert!(self.staged.is_empty());
        let progress = match self.transducer.transduce(&self.input, &mut self.out, at_eof) {
            Ok(progress) => progress,
            Err(TransduceError::InvalidEncoding { position, written }) => {
                self.staged = 0..written;
                self.drain_out()?;
                let e = TransduceError::InvalidEncoding {
                    position: self.offset + position,
                    written,
                };
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        self.input.drain(..progress.consumed);
        self.offset += progress.consumed;
        self.staged = 0..progress.written;
        Ok(progress.signal)
    }

    fn drain_out(&mut self) -> io::Result<()> {
        while !self.staged.is_empty() {
            match self.inner.write(&self.out[self.staged.clone()]) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => self.staged.start += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        self.staged = 0..0;
        Ok(())
    }
}

impl<W: Write> Write for KanaWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.catch_up(false)?;
        let saved = (self.transducer.clone(), self.input.clone(), self.offset);

        self.input.extend_from_slice(buf);
        let mut signal = self.convert(false)?;
        if let Err(e) = self.drain_out() {
            if self.staged.start == 0 {
                // `inner` took none of it: give `buf` back.
                (self.transducer, self.input, self.offset) = saved;
                self.staged = 0..0;
                return Err(e);
            }
            return Ok(buf.len());
        }

        // `buf` is taken from here on. Anything `inner` refuses stays staged
        // and its error surfaces on the next call.
        while signal == Signal::OutputBufferFull {
            signal = self.convert(false)?;
            if self.drain_out().is_err() {
                break;
            }
        }
        Ok(buf.len())
    }

    /// Hands over staged output and flushes `inner`; the held base is kept.
    /// See [`KanaWriter::finish`].
    fn flush(&mut self) -> io::Result<()> {
        self.catch_up(false)?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek};

    use super::*;

    fn writer(mode: &str) -> KanaWriter<Vec<u8>> {
        KanaWriter::with_capacity(ConversionPlan::compile(mode).unwrap(), Vec::new(), 12)
    }

    /// Refuses its `fail_on`-th write call with `WouldBlock`.
    struct Flaky {
        data: Vec<u8>,
        calls: usize,
        fail_on: usize,
    }

    impl Flaky {
        fn new(fail_on: usize) -> Self {
            Self {
                data: Vec::new(),
                calls: 0,
                fail_on,
            }
        }
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn flaky_writer(mode: &str, fail_on: usize) -> KanaWriter<Flaky> {
        let plan = ConversionPlan::compile(mode).unwrap();
        KanaWriter::with_capacity(plan, Flaky::new(fail_on), 12)
    }

    #[test]
    fn byte_at_a_time() {
        let mut w = writer("KV");
        for b in "｢ﾎﾞｰﾙﾍﾟﾝ｣ｶ".as_bytes() {
            w.write_all(std::slice::from_ref(b)).unwrap();
        }
        // ｶ is held until finish.
        assert_eq!(String::from_utf8_lossy(w.get_ref()), "「ボールペン」");
        let out = w.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "「ボールペン」カ");
    }

    #[test]
    fn large_write_through_small_buffer() {
        let mut w = writer("k");
        let input = "ガギグ".repeat(50);
        w.write_all(input.as_bytes()).unwrap();
        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(out, "ｶﾞｷﾞｸﾞ".repeat(50));
    }

    #[test]
    fn invalid_data_reports_stream_offset() {
        let mut w = writer("K");
        w.write_all(b"abc").unwrap();
        let err = w.write_all(b"d\xFF").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("byte 4"), "{err}");
    }

    #[test]
    fn refused_write_can_be_retried() {
        let mut w = flaky_writer("KV", 1);
        let err = w.write("ｱｶ".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert!(w.get_ref().data.is_empty());

        w.write_all("ｱｶ".as_bytes()).unwrap();
        w.write_all("ﾞ".as_bytes()).unwrap();
        let out = w.finish().unwrap();
        assert_eq!(String::from_utf8(out.data).unwrap(), "アガ");
    }

    #[test]
    fn refused_tail_is_kept_for_next_call() {
        // The first 12 bytes of output go out; the rest is refused and kept.
        let mut w = flaky_writer("K", 2);
        assert_eq!(w.write("ｱｲｳｴｵ".as_bytes()).unwrap(), 15);
        assert_eq!(String::from_utf8_lossy(&w.get_ref().data), "アイウエ");

        w.write_all("ｶ".as_bytes()).unwrap();
        let out = w.finish().unwrap();
        assert_eq!(String::from_utf8(out.data).unwrap(), "アイウエオカ");
    }

    #[test]
    fn output_before_invalid_data_is_delivered() {
        let mut w = writer("K");
        let err = w.write_all(b"ab\xFF").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(w.get_ref().as_slice(), b"ab");
    }

    #[test]
    fn truncated_tail_fails_on_finish() {
        let mut w = writer("K");
        w.write_all(&"ｱ".as_bytes()[..2]).unwrap();
        let err = w.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn writes_into_file() {
        let mut file = tempfile::tempfile().unwrap();
        let mut w = KanaWriter::new(ConversionPlan::compile("rnsHV").unwrap(), &mut file);
        write!(w, "ﾃﾞｰﾀ　１２３ＡＢＣ").unwrap();
        w.finish().unwrap();

        file.rewind().unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        assert_eq!(out, "でーた 123ABC");
    }
}
