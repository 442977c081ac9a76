//! Option declarations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Error, Result};

static SHORT_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-[^-]$").unwrap());
static LONG_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--[[:word:]][-[:word:]]*$").unwrap());

/// What an occurrence of an option does to its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Store the occurrence's value; the last occurrence wins.
    Store,
    /// Store the declared constant, consuming no values.
    StoreConst,
    /// Store `true`.
    StoreTrue,
    /// Store `false`.
    StoreFalse,
    /// Append the occurrence's value; occurrences accumulate in order.
    Append,
    /// Count occurrences.
    Count,
    /// Stop parsing and report that help was requested.
    Help,
    /// Stop parsing and report that the version was requested.
    Version,
}

impl Action {
    /// Whether an occurrence consumes trailing values.
    pub fn takes_args(self) -> bool {
        matches!(self, Action::Store | Action::Append)
    }
}

/// The declared type of an option's values.
///
/// Only `Choice` is enforced while parsing. The other types are advisory:
/// conversion is deferred to the [`Value`](crate::Value) accessors and to
/// deserialization, where a malformed number is a best-effort zero or a
/// typed error respectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    /// An arbitrary string.
    Str,
    /// An integer.
    Int,
    /// A floating point number.
    Float,
    /// A boolean.
    Bool,
    /// One of a declared set of strings, validated while parsing.
    Choice,
}

enum FlagForm {
    Short(char),
    Long(String),
}

fn classify(flag: &str) -> Result<FlagForm> {
    if LONG_FORM.is_match(flag) {
        Ok(FlagForm::Long(flag[2..].to_string()))
    } else if flag.is_ascii() && SHORT_FORM.is_match(flag) {
        Ok(FlagForm::Short(flag.as_bytes()[1] as char))
    } else {
        Err(Error::Usage(format!(
            "Flag '{}' is not of the form '-x' or '--flag'.",
            flag
        )))
    }
}

/// A single declared option.
///
/// Created through [`OptionParser::add_option`](crate::OptionParser::add_option)
/// (or [`Opt::new`] plus [`Registry::register`](crate::Registry::register))
/// and configured with the chained setters:
///
/// ```
/// use optparse::{OptionParser, Type};
///
/// let mut parser = OptionParser::new();
/// parser.add_option(&["-l", "--level"])
///       .dest("level")
///       .typ(Type::Int)
///       .set_default("0")
///       .help("verbosity level");
/// ```
#[derive(Clone, Debug)]
pub struct Opt {
    pub(crate) shorts: Vec<char>,
    /// Long flag names, stored bare (without the leading dashes).
    pub(crate) longs: Vec<String>,
    pub(crate) action: Action,
    pub(crate) typ: Type,
    pub(crate) dest: String,
    pub(crate) default: Option<String>,
    pub(crate) constant: Option<String>,
    pub(crate) nargs: usize,
    pub(crate) choices: Vec<String>,
    pub(crate) help: String,
    pub(crate) metavar: Option<String>,
}

impl Opt {
    /// Create an option from its flag strings, e.g. `&["-f", "--file"]`.
    ///
    /// Every flag must be of the form `-x` (single ASCII character) or
    /// `--flag`; at least one flag is required.
    pub fn new(flags: &[&str]) -> Result<Opt> {
        let mut opt = Opt {
            shorts: vec![],
            longs: vec![],
            action: Action::Store,
            typ: Type::Str,
            dest: String::new(),
            default: None,
            constant: None,
            nargs: 1,
            choices: vec![],
            help: String::new(),
            metavar: None,
        };
        for flag in flags {
            match classify(flag)? {
                FlagForm::Short(c) => opt.shorts.push(c),
                FlagForm::Long(name) => opt.longs.push(name),
            }
        }
        if opt.shorts.is_empty() && opt.longs.is_empty() {
            return Err(Error::Usage("An option needs at least one flag.".into()));
        }
        Ok(opt)
    }

    /// Set the action. Actions that consume no values force the arity to
    /// zero; `Store` and `Append` restore an arity of one.
    pub fn action(&mut self, action: Action) -> &mut Opt {
        self.action = action;
        if action.takes_args() {
            if self.nargs == 0 {
                self.nargs = 1;
            }
        } else {
            self.nargs = 0;
        }
        self
    }

    /// Set the value type.
    pub fn typ(&mut self, typ: Type) -> &mut Opt {
        self.typ = typ;
        self
    }

    /// Set the destination name values are stored under.
    ///
    /// When never set, the destination is derived from the first long flag
    /// (dashes become underscores), or failing that the first short flag.
    pub fn dest(&mut self, dest: &str) -> &mut Opt {
        self.dest = dest.to_string();
        self
    }

    /// Set the default seeded into the value map before parsing.
    pub fn set_default(&mut self, default: &str) -> &mut Opt {
        self.default = Some(default.to_string());
        self
    }

    /// Set the number of values one occurrence consumes.
    pub fn nargs(&mut self, nargs: usize) -> &mut Opt {
        self.nargs = nargs;
        self
    }

    /// Set the constant stored by the `StoreConst` action.
    pub fn set_const(&mut self, constant: &str) -> &mut Opt {
        self.constant = Some(constant.to_string());
        self
    }

    /// Restrict values to the given set and set the type to `Choice`.
    pub fn choices(&mut self, choices: &[&str]) -> &mut Opt {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self.typ = Type::Choice;
        self
    }

    /// Set the help text shown for this option.
    pub fn help(&mut self, help: &str) -> &mut Opt {
        self.help = help.to_string();
        self
    }

    /// Set the placeholder used for this option's values in help output.
    ///
    /// Defaults to the destination name, upper-cased.
    pub fn metavar(&mut self, metavar: &str) -> &mut Opt {
        self.metavar = Some(metavar.to_string());
        self
    }

    /// The destination this option stores under (see [`Opt::dest`]).
    pub fn resolved_dest(&self) -> String {
        if !self.dest.is_empty() {
            self.dest.clone()
        } else if let Some(long) = self.longs.first() {
            long.replace('-', "_")
        } else {
            self.shorts[0].to_string()
        }
    }

    fn display_flag(&self) -> String {
        match self.longs.first() {
            Some(long) => format!("--{}", long),
            None => format!("-{}", self.shorts[0]),
        }
    }

    /// Check that the declaration is fully populated and internally
    /// consistent. Run for every registered option before parsing begins,
    /// since the chained setters may change an option after registration.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.action.takes_args() && self.nargs == 0 {
            return Err(Error::Usage(format!(
                "Flag '{}' must consume at least one value.",
                self.display_flag()
            )));
        }
        if !self.action.takes_args() && self.nargs != 0 {
            return Err(Error::Usage(format!(
                "Flag '{}' does not consume values, but has nargs {}.",
                self.display_flag(),
                self.nargs
            )));
        }
        if self.typ == Type::Choice && self.choices.is_empty() {
            return Err(Error::Usage(format!(
                "Flag '{}' is a choice option with no choices.",
                self.display_flag()
            )));
        }
        if self.action == Action::StoreConst && self.constant.is_none() {
            return Err(Error::Usage(format!(
                "Flag '{}' stores a constant, but none was set.",
                self.display_flag()
            )));
        }
        Ok(())
    }
}
