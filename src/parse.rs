//! The option registry and the token-walking parse engine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use strsim::levenshtein;

use crate::errors::{Error, Result};
use crate::opt::{Action, Opt, Type};
use crate::values::{Value, Values};

/// Split a long token into its bare name and optional inline value.
static LONG_EQUAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--(?P<name>[^=]+)(?:=(?P<value>.*))?$").unwrap());

/// Typos within this distance of a declared long flag get a suggestion.
const SUGGEST_DISTANCE: usize = 3;

/// The declared options plus the flag indexes used during parsing.
///
/// The registry is append-only while options are declared and read-only
/// while parsing, so it can be reused across any number of sequential
/// parse calls.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    opts: Vec<Opt>,
    shorts: HashMap<char, usize>,
    longs: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Register a declared option and return it for further configuration.
    ///
    /// Fails with [`Error::Duplicate`] if any of the option's flags is
    /// already registered, in which case the registry is left untouched.
    pub fn register(&mut self, opt: Opt) -> Result<&mut Opt> {
        for &c in &opt.shorts {
            if self.shorts.contains_key(&c) {
                return Err(Error::Duplicate { flag: format!("-{}", c) });
            }
        }
        for name in &opt.longs {
            if self.longs.contains_key(name) {
                return Err(Error::Duplicate { flag: format!("--{}", name) });
            }
        }
        let idx = self.opts.len();
        for &c in &opt.shorts {
            self.shorts.insert(c, idx);
        }
        for name in &opt.longs {
            self.longs.insert(name.clone(), idx);
        }
        self.opts.push(opt);
        Ok(&mut self.opts[idx])
    }

    /// Every registered option, in declaration order.
    pub fn opts(&self) -> &[Opt] {
        &self.opts
    }

    /// Exact lookup of a short flag character.
    pub fn lookup_short(&self, flag: char) -> Option<&Opt> {
        self.shorts.get(&flag).map(|&i| &self.opts[i])
    }

    /// Look up a bare long flag name, trying an exact match first and then
    /// an unambiguous abbreviation.
    ///
    /// A name that is a strict prefix of exactly one declared long flag
    /// resolves to that flag. A name matching several candidates fails
    /// with [`Error::Ambiguous`] listing them; a name matching none fails
    /// with [`Error::Unknown`], carrying the nearest declared flag when
    /// it is close enough to be a likely typo.
    pub fn lookup_long(&self, name: &str) -> Result<&Opt> {
        if let Some(&i) = self.longs.get(name) {
            return Ok(&self.opts[i]);
        }
        let mut candidates: Vec<&String> = self
            .longs
            .keys()
            .filter(|k| !name.is_empty() && k.starts_with(name))
            .collect();
        candidates.sort();
        match candidates.as_slice() {
            [] => Err(Error::Unknown {
                flag: format!("--{}", name),
                suggestion: self.suggest(name),
            }),
            [single] => Ok(&self.opts[self.longs[*single]]),
            _ => Err(Error::Ambiguous {
                flag: format!("--{}", name),
                candidates: candidates.iter().map(|c| format!("--{}", c)).collect(),
            }),
        }
    }

    pub(crate) fn has_short(&self, flag: char) -> bool {
        self.shorts.contains_key(&flag)
    }

    pub(crate) fn has_long(&self, name: &str) -> bool {
        self.longs.contains_key(name)
    }

    /// Nearest declared long flag, when close enough to be a likely typo.
    fn suggest(&self, name: &str) -> Option<String> {
        self.longs
            .keys()
            .map(|k| (levenshtein(name, k), k))
            .filter(|&(dist, _)| dist <= SUGGEST_DISTANCE)
            .min()
            .map(|(_, k)| format!("--{}", k))
    }

    /// Check that every declared option is fully populated before
    /// parsing begins.
    pub(crate) fn validate(&self) -> Result<()> {
        for opt in &self.opts {
            opt.validate()?;
        }
        Ok(())
    }
}

/// The token-walking state machine.
///
/// Walks the argument vector left to right, classifying each token as a
/// long option, a short option cluster, or a positional; consumes trailing
/// values according to the matched option's arity; validates and writes
/// each occurrence into the value map. The first failure aborts the whole
/// parse.
pub(crate) struct Engine<'a> {
    registry: &'a Registry,
    vals: &'a mut Values,
    version: Option<&'a str>,
    tokens: Vec<String>,
    curi: usize,
    leftover: Vec<String>,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        vals: &'a mut Values,
        version: Option<&'a str>,
        tokens: Vec<String>,
    ) -> Engine<'a> {
        Engine { registry, vals, version, tokens, curi: 0, leftover: vec![] }
    }

    /// Run the scan to completion, returning the leftover positionals.
    pub(crate) fn parse(mut self) -> Result<Vec<String>> {
        while !self.is_eof() {
            let token = self.cur().to_string();
            if token == "--" {
                // Everything after the marker is positional, verbatim.
                self.next();
                while !self.is_eof() {
                    let rest = self.cur().to_string();
                    self.leftover.push(rest);
                    self.next();
                }
            } else if token.len() > 2 && token.starts_with("--") {
                self.next();
                self.handle_long(&token)?;
            } else if token.len() >= 2 && token.starts_with('-') {
                self.next();
                self.handle_cluster(&token)?;
            } else {
                // Includes a bare `-`, the conventional stdin marker.
                self.leftover.push(token);
                self.next();
            }
        }
        Ok(self.leftover)
    }

    fn handle_long(&mut self, token: &str) -> Result<()> {
        let caps = LONG_EQUAL.captures(token).ok_or_else(|| Error::Unknown {
            flag: token.to_string(),
            suggestion: None,
        })?;
        let name = &caps["name"];
        let inline = caps.name("value").map(|m| m.as_str().to_string());
        let opt = self.registry.lookup_long(name)?;
        let flag = format!("--{}", name);
        if opt.action.takes_args() {
            let values = self.take_values(opt, &flag, inline)?;
            self.process(opt, &flag, values)
        } else if inline.is_some() {
            Err(Error::UnexpectedArgument { flag })
        } else {
            self.process(opt, &flag, vec![])
        }
    }

    fn handle_cluster(&mut self, token: &str) -> Result<()> {
        let rest = &token[1..];
        for (i, c) in rest.char_indices() {
            let opt = match self.registry.lookup_short(c) {
                Some(opt) => opt,
                None => {
                    return Err(Error::Unknown {
                        flag: format!("-{}", c),
                        suggestion: None,
                    })
                }
            };
            let flag = format!("-{}", c);
            if opt.action.takes_args() {
                // The unconsumed suffix, if any, is this option's attached
                // value; no further characters are read as flags.
                let after = &rest[i + c.len_utf8()..];
                let attached =
                    if after.is_empty() { None } else { Some(after.to_string()) };
                let values = self.take_values(opt, &flag, attached)?;
                return self.process(opt, &flag, values);
            }
            self.process(opt, &flag, vec![])?;
        }
        Ok(())
    }

    /// Collect the raw values one occurrence consumes: the inline or
    /// attached value fills the first slot, whole following tokens the
    /// rest.
    fn take_values(
        &mut self,
        opt: &Opt,
        flag: &str,
        inline: Option<String>,
    ) -> Result<Vec<String>> {
        let mut values = Vec::with_capacity(opt.nargs);
        if let Some(v) = inline {
            values.push(v);
        }
        while values.len() < opt.nargs {
            if self.is_eof() {
                return Err(Error::MissingArgument {
                    flag: flag.to_string(),
                    expected: opt.nargs,
                    found: values.len(),
                });
            }
            let value = self.cur().to_string();
            values.push(value);
            self.next();
        }
        Ok(values)
    }

    /// Validate the collected values and write the occurrence into the map.
    fn process(&mut self, opt: &Opt, flag: &str, values: Vec<String>) -> Result<()> {
        if opt.typ == Type::Choice {
            for value in &values {
                if !opt.choices.iter().any(|c| c == value) {
                    return Err(Error::InvalidChoice {
                        flag: flag.to_string(),
                        value: value.clone(),
                        choices: opt.choices.clone(),
                    });
                }
            }
        }
        let dest = opt.resolved_dest();
        match opt.action {
            Action::Store => {
                let mut values = values;
                let value = if values.len() == 1 {
                    Value::Plain(values.remove(0))
                } else {
                    Value::List(values)
                };
                self.vals.insert(&dest, value);
            }
            Action::Append => self.vals.append(&dest, values),
            Action::Count => self.vals.bump(&dest),
            Action::StoreTrue => self.vals.insert(&dest, Value::Switch(true)),
            Action::StoreFalse => self.vals.insert(&dest, Value::Switch(false)),
            Action::StoreConst => {
                let constant = opt.constant.clone().unwrap_or_default();
                self.vals.insert(&dest, Value::Plain(constant));
            }
            Action::Help => return Err(Error::Help),
            Action::Version => {
                return Err(Error::Version(
                    self.version.unwrap_or_default().to_string(),
                ))
            }
        }
        Ok(())
    }

    fn is_eof(&self) -> bool {
        self.curi == self.tokens.len()
    }

    fn next(&mut self) {
        if self.curi < self.tokens.len() {
            self.curi += 1;
        }
    }

    fn cur(&self) -> &str {
        &self.tokens[self.curi]
    }
}
