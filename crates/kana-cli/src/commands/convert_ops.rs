use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use kana_core::settings::settings;
use kana_core::unicode::ScriptCounts;
use kana_core::{convert, ConversionPlan, KanaWriter, ModeError};

use super::die;

#[derive(Debug, thiserror::Error)]
pub enum ConvertCmdError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Script counts of what went in and what came out of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub input: ScriptCounts,
    pub output: ScriptCounts,
}

/// Script counts over a byte stream that may be cut inside a code point.
#[derive(Default)]
struct Utf8Counter {
    /// Bytes of a code point not yet complete.
    tail: Vec<u8>,
    counts: ScriptCounts,
}

impl Utf8Counter {
    fn feed(&mut self, bytes: &[u8]) {
        self.tail.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.tail) {
            Ok(s) => s.len(),
            Err(e) => e.valid_up_to(),
        };
        if let Ok(s) = std::str::from_utf8(&self.tail[..valid]) {
            self.counts += ScriptCounts::of(s);
        }
        self.tail.drain(..valid);
    }
}

/// Passes writes through while counting what `inner` accepted.
struct CountingWriter<W: Write> {
    inner: W,
    counter: Utf8Counter,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.counter.feed(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Stream `reader` through `mode` into `writer`, reading `input_chunk` bytes
/// at a time.
pub fn convert_stream<R: Read, W: Write>(
    mode: &str,
    mut reader: R,
    writer: W,
    input_chunk: usize,
) -> Result<StreamStats, ConvertCmdError> {
    let plan = ConversionPlan::compile(mode)?;
    let counting = CountingWriter {
        inner: writer,
        counter: Utf8Counter::default(),
    };
    let mut kana = KanaWriter::new(plan, counting);
    let mut buf = vec![0u8; input_chunk.max(1)];
    let mut input = Utf8Counter::default();

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        kana.write_all(&buf[..n])?;
        input.feed(&buf[..n]);
    }

    let counting = kana.finish()?;
    Ok(StreamStats {
        input: input.counts,
        output: counting.counter.counts,
    })
}

fn open_input(path: Option<&str>) -> io::Result<Box<dyn Read>> {
    Ok(match path {
        Some(p) => Box::new(File::open(p)?),
        None => Box::new(io::stdin().lock()),
    })
}

pub fn convert_cmd(mode: Option<&str>, input: Option<&str>, stats: bool) {
    let s = settings();
    let mode = mode.unwrap_or(&s.convert.default_mode);
    let reader = die!(open_input(input), "Error opening input: {}");
    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());

    let result = die!(
        convert_stream(mode, reader, writer, s.stream.input_chunk),
        "Error: {}"
    );
    if stats {
        eprintln!(
            "chars: {} -> {}  width: {} -> {}  hankaku katakana: {} -> {}",
            result.input.chars,
            result.output.chars,
            result.input.width,
            result.output.width,
            result.input.hankaku_katakana,
            result.output.hankaku_katakana,
        );
    }
}

pub fn text_cmd(mode: &str, text: &str) {
    let out = die!(convert(text, mode), "Error: {}");
    println!("{out}");
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn stream_in_small_chunks() {
        let input = "｢ﾎﾞｰﾙﾍﾟﾝの芯の太さは､0.7mmです｡｣";
        let mut out = Vec::new();
        let stats = convert_stream("KV", Cursor::new(input), &mut out, 2).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "「ボールペンの芯の太さは、0.7mmです。」"
        );
        assert_eq!(stats.input.chars, input.chars().count());
        assert_eq!(stats.input.hankaku_katakana, 11);
        assert_eq!(stats.output.hankaku_katakana, 0);
        assert_eq!(stats.output.chars, stats.input.chars - 2);
    }

    #[test]
    fn stream_width_shrinks_under_rs() {
        let mut out = Vec::new();
        let stats =
            convert_stream("rs", Cursor::new("Ｔｈｅ　ｑｕｉｃｋ"), &mut out, 5).unwrap();
        assert_eq!(out, b"The quick");
        assert_eq!(stats.input.width, 18);
        assert_eq!(stats.output.width, 9);
    }

    #[test]
    fn stream_rejects_invalid_utf8() {
        let mut out = Vec::new();
        let err = convert_stream("K", Cursor::new(vec![b'a', 0xFF]), &mut out, 8).unwrap_err();
        assert!(matches!(err, ConvertCmdError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }

    #[test]
    fn stream_rejects_conflicting_mode() {
        let err = convert_stream("KH", Cursor::new("x"), Vec::new(), 8).unwrap_err();
        assert!(matches!(err, ConvertCmdError::Mode(_)));
        assert_eq!(err.to_string(), "must not combine 'K' and 'H' flags");
    }

    /// Accepts at most `max` bytes per write.
    struct Trickle {
        data: Vec<u8>,
        max: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.max);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_writes_are_still_counted() {
        let mut counting = CountingWriter {
            inner: Trickle {
                data: Vec::new(),
                max: 2,
            },
            counter: Utf8Counter::default(),
        };
        counting.write_all("ｶﾞｷﾞ".as_bytes()).unwrap();
        assert_eq!(counting.inner.data, "ｶﾞｷﾞ".as_bytes());
        assert_eq!(counting.counter.counts.chars, 4);
        assert_eq!(counting.counter.counts.hankaku_katakana, 4);
    }

    #[test]
    fn stream_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "ｶﾞｷﾞｸﾞ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let reader = open_input(Some(&path)).unwrap();
        let mut out = Vec::new();
        convert_stream("HV", reader, &mut out, 1).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "がぎぐ");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(open_input(path.to_str()).is_err());
    }
}
