pub mod config_ops;
pub mod convert_ops;
pub mod explain_ops;

/// Unwrap a `Result`, or print the formatted error to stderr and exit 1.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub(crate) use die;
