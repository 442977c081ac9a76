//! An optparse-style command line option parser.
//!
//! Options are declared up front with fluent setters, then an argument
//! vector is parsed against them. The result is a map from destination
//! names to typed values plus the leftover positional arguments.
//!
//! Long flags may be abbreviated to any unambiguous prefix, short flags
//! may be clustered (`-vqf value`) and may carry their value attached
//! (`-fvalue`, `--file=value`). A `--` token ends option scanning; every
//! token after it is passed through as a positional argument.
//!
//! # Example
//!
//! ```
//! use optparse::{Action, OptionParser};
//!
//! let mut parser = OptionParser::new().description("just an example");
//! parser.add_option(&["-f", "--file"])
//!       .dest("filename")
//!       .help("write report to FILE")
//!       .metavar("FILE");
//! parser.add_option(&["-q", "--quiet"])
//!       .action(Action::StoreFalse)
//!       .dest("verbose")
//!       .set_default("1")
//!       .help("don't print status messages to stdout");
//!
//! let values = parser.parse_args(["-f", "out.txt", "extra"])
//!                    .unwrap_or_else(|e| e.exit());
//! assert_eq!(values.get_str("filename"), "out.txt");
//! assert!(values.get_bool("verbose"));
//! assert_eq!(parser.args(), ["extra"]);
//! ```
//!
//! Parsed values can also be deserialized into a struct whose fields are
//! named after the destinations:
//!
//! ```
//! # use optparse::{Action, OptionParser};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Args {
//!     filename: String,
//!     verbose: bool,
//! }
//!
//! # let mut parser = OptionParser::new();
//! # parser.add_option(&["-f", "--file"]).dest("filename");
//! # parser.add_option(&["-q", "--quiet"])
//! #       .action(Action::StoreFalse).dest("verbose").set_default("1");
//! let values = parser.parse_args(["--file", "out.txt"]).unwrap();
//! let args: Args = values.deserialize().unwrap();
//! assert_eq!(args.filename, "out.txt");
//! assert!(args.verbose);
//! ```

#![deny(missing_docs)]

/// Print an error to stderr.
macro_rules! werr(
    ($($arg:tt)*) => ({
        use std::io::{Write, stderr};
        write!(&mut stderr(), $($arg)*).unwrap();
    })
);

pub use crate::errors::{Error, Result};
pub use crate::opt::{Action, Opt, Type};
pub use crate::parse::Registry;
pub use crate::parser::OptionParser;
pub use crate::values::{Deserializer, Value, Values};

mod errors;
mod opt;
mod parse;
mod parser;
mod values;
#[cfg(test)]
mod test;
