pub mod convert;
pub mod mode;
pub mod rules;
pub mod settings;
pub mod stream;
pub mod transducer;
pub mod unicode;

pub use convert::{convert, convert_bytes, convert_with, ConvertError};
pub use mode::{Flag, ModeConfig, ModeError};
pub use rules::{ConversionPlan, LigatureTarget, Rule};
pub use stream::KanaWriter;
pub use transducer::{Progress, Signal, TransduceError, Transducer};
