//! The one and only error type for this crate.

use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Write};
use std::result;

use serde::de;

/// Represents the different ways declaring or parsing options can fail.
///
/// In the common case you probably don't care why parsing has failed and
/// would rather just quit the program with a message. The `exit` method
/// does exactly that, and sets the exit code appropriately (no error for
/// a help or version request, an error code for everything else).
///
/// ### Example
///
/// ```no_run
/// use optparse::OptionParser;
///
/// let mut parser = OptionParser::new();
/// parser.add_option(&["-f", "--file"]);
///
/// let values = parser.parse_args(std::env::args().skip(1))
///                    .unwrap_or_else(|e| e.exit());
/// ```
#[derive(Debug)]
pub enum Error {
    /// A mistake in the option declarations themselves.
    ///
    /// This error can only be triggered by the programmer, i.e., the
    /// author of the declarations: a malformed flag string, an arity that
    /// contradicts the action, a choice type with no choices, or a
    /// `store_const` option with no constant. It is usually indicative of
    /// a bug in your program.
    Usage(String),

    /// A flag string was registered for a second option.
    Duplicate {
        /// The flag as it was declared, e.g. `--file`.
        flag: String,
    },

    /// An unrecognized short or long flag was supplied.
    Unknown {
        /// The flag as it appeared on the command line.
        flag: String,
        /// A declared long flag close enough to be a likely typo.
        suggestion: Option<String>,
    },

    /// An abbreviated long flag matched more than one declared flag.
    Ambiguous {
        /// The flag as it appeared on the command line.
        flag: String,
        /// Every declared long flag it is a prefix of, sorted.
        candidates: Vec<String>,
    },

    /// An option required more values than the command line had left.
    MissingArgument {
        /// The flag that consumes the values.
        flag: String,
        /// How many values the option requires per occurrence.
        expected: usize,
        /// How many values were actually available.
        found: usize,
    },

    /// A supplied value is not a member of the option's choice set.
    InvalidChoice {
        /// The flag the value was supplied to.
        flag: String,
        /// The offending value.
        value: String,
        /// The declared choice set.
        choices: Vec<String>,
    },

    /// An inline `=value` was supplied to an option that takes no values.
    UnexpectedArgument {
        /// The flag the value was supplied to.
        flag: String,
    },

    /// Deserializing parsed values into a caller type failed.
    Deserialize(String),

    /// A wrapped error plus the usage or help text to print under it.
    WithUsage(Box<Error>, String),

    /// Parsing stopped because a help option was supplied.
    Help,

    /// Parsing stopped because a version option was supplied.
    ///
    /// The version string is included as a payload.
    Version(String),
}

impl Error {
    /// Return whether this was a fatal error or not.
    ///
    /// Requests to print the help or version information are not fatal;
    /// everything else is.
    pub fn fatal(&self) -> bool {
        match self {
            Error::Help | Error::Version(..) => false,
            Error::WithUsage(ref b, _) => b.fatal(),
            _ => true,
        }
    }

    /// Print this error and immediately exit the program.
    ///
    /// If the error is non-fatal (`Help` or `Version`), then it is printed
    /// to stdout and the exit status will be `0`. Otherwise, the error is
    /// printed to stderr and the exit status will be `1`.
    pub fn exit(&self) -> ! {
        if self.fatal() {
            werr!("{}\n", self);
            ::std::process::exit(1)
        } else {
            let _ = writeln!(&mut io::stdout(), "{}", self);
            ::std::process::exit(0)
        }
    }
}

/// Short result type alias.
pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WithUsage(ref other, ref usage) => {
                let other = other.to_string();
                if other.is_empty() {
                    write!(f, "{}", usage)
                } else {
                    write!(f, "{}\n\n{}", other, usage)
                }
            }
            Error::Help => write!(f, ""),
            Error::Usage(ref s) | Error::Deserialize(ref s) | Error::Version(ref s) => {
                write!(f, "{}", s)
            }
            Error::Duplicate { ref flag } => {
                write!(f, "Flag '{}' is already registered.", flag)
            }
            Error::Unknown { ref flag, ref suggestion } => {
                write!(f, "Unknown flag: '{}'", flag)?;
                match suggestion {
                    Some(best) => write!(f, ". Did you mean '{}'?", best),
                    None => Ok(()),
                }
            }
            Error::Ambiguous { ref flag, ref candidates } => {
                let quoted: Vec<String> =
                    candidates.iter().map(|c| format!("'{}'", c)).collect();
                write!(f, "Ambiguous flag: '{}' could be {}.", flag, quoted.join(" or "))
            }
            Error::MissingArgument { ref flag, expected, found } => {
                write!(
                    f,
                    "Flag '{}' expects {} argument{}, but only {} {} given.",
                    flag,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    found,
                    if *found == 1 { "was" } else { "were" },
                )
            }
            Error::InvalidChoice { ref flag, ref value, ref choices } => {
                let quoted: Vec<String> =
                    choices.iter().map(|c| format!("'{}'", c)).collect();
                write!(
                    f,
                    "Invalid choice '{}' for flag '{}' (choose from {}).",
                    value,
                    flag,
                    quoted.join(", "),
                )
            }
            Error::UnexpectedArgument { ref flag } => {
                write!(f, "Flag '{}' does not take an argument.", flag)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::WithUsage(ref cause, _) => Some(&**cause),
            _ => None,
        }
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Deserialize(msg.to_string())
    }
}
