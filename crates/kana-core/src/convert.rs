//! Whole-buffer conversion on top of the streaming transducer.

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::mode::ModeError;
use crate::rules::ConversionPlan;
use crate::settings::settings;
use crate::transducer::{Signal, TransduceError, Transducer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("invalid UTF-8 sequence at byte {position}")]
    InvalidEncoding { position: usize },
}

/// Convert `text` under `mode`.
pub fn convert(text: &str, mode: &str) -> Result<String, ConvertError> {
    convert_bytes(text.as_bytes(), mode)
}

/// Convert UTF-8 bytes under `mode`. Malformed input is reported with the
/// byte offset of the first bad sequence.
pub fn convert_bytes(input: &[u8], mode: &str) -> Result<String, ConvertError> {
    let plan = ConversionPlan::compile(mode)?;
    convert_with(&plan, input)
}

/// Convert with an already compiled plan.
pub fn convert_with(plan: &Arc<ConversionPlan>, input: &[u8]) -> Result<String, ConvertError> {
    let _span = debug_span!("convert", mode = %plan.mode(), len = input.len()).entered();
    let chunk = settings().stream.output_chunk;

    let mut transducer = Transducer::new(Arc::clone(plan));
    let mut out = vec![0u8; input.len() + chunk];
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let progress = transducer
            .transduce(&input[consumed..], &mut out[written..], true)
            .map_err(|e| match e {
                TransduceError::InvalidEncoding { position, .. } => ConvertError::InvalidEncoding {
                    position: consumed + position,
                },
                // A fresh transducer cannot already be broken.
                TransduceError::Broken => ConvertError::InvalidEncoding { position: consumed },
            })?;
        consumed += progress.consumed;
        written += progress.written;
        match progress.signal {
            Signal::Done => break,
            Signal::OutputBufferFull => {
                out.resize(out.len() + chunk, 0);
                debug!(capacity = out.len(), "grew output buffer");
            }
            // Unreachable with at_eof set; truncated input is an error instead.
            Signal::NeedMoreInput => {
                return Err(ConvertError::InvalidEncoding { position: consumed })
            }
        }
    }
    out.truncate(written);
    String::from_utf8(out).map_err(|e| ConvertError::InvalidEncoding {
        position: e.utf8_error().valid_up_to(),
    })
}
