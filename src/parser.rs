//! The user-facing parser: option declaration, defaults and help text.

use std::io::{self, Write};

use crate::errors::{Error, Result};
use crate::opt::{Action, Opt};
use crate::parse::{Engine, Registry};
use crate::values::Values;

/// Column at which option help text starts in formatted help.
const OPTION_COLUMN: usize = 24;

/// Declares options, parses argument vectors against them, and formats
/// usage and help text.
///
/// Parser-level settings are chained at construction; options are added
/// afterwards and configured through the returned [`Opt`]:
///
/// ```
/// use optparse::OptionParser;
///
/// let mut parser = OptionParser::new()
///     .prog("report")
///     .version("%prog 1.0")
///     .description("Generate a report.");
/// parser.add_option(&["-o", "--output"]).metavar("FILE");
/// ```
///
/// Unless disabled, `-h/--help` and (when a version string is set)
/// `--version` options are registered automatically before parsing.
#[derive(Clone, Debug)]
pub struct OptionParser {
    registry: Registry,
    usage: String,
    version: Option<String>,
    description: String,
    prog: Option<String>,
    epilog: String,
    add_help_option: bool,
    add_version_option: bool,
    defaults: Vec<(String, String)>,
    leftover: Vec<String>,
}

impl OptionParser {
    /// Create a parser with no options and the default `%prog [options]`
    /// usage line.
    pub fn new() -> OptionParser {
        OptionParser {
            registry: Registry::new(),
            usage: "%prog [options]".to_string(),
            version: None,
            description: String::new(),
            prog: None,
            epilog: String::new(),
            add_help_option: true,
            add_version_option: true,
            defaults: vec![],
            leftover: vec![],
        }
    }

    /// Set the usage line; `%prog` expands to the program name.
    pub fn usage(mut self, usage: &str) -> OptionParser {
        self.usage = usage.to_string();
        self
    }

    /// Set the version string; `%prog` expands to the program name.
    ///
    /// Setting a version also enables the automatic `--version` option.
    pub fn version(mut self, version: &str) -> OptionParser {
        self.version = Some(version.to_string());
        self
    }

    /// Set the description printed between the usage line and the options.
    pub fn description(mut self, description: &str) -> OptionParser {
        self.description = description.to_string();
        self
    }

    /// Set the program name substituted for `%prog`.
    ///
    /// When unset, it is taken from the stripped zeroth element of
    /// [`parse_argv`](OptionParser::parse_argv), or from the process
    /// arguments as a last resort.
    pub fn prog(mut self, prog: &str) -> OptionParser {
        self.prog = Some(prog.to_string());
        self
    }

    /// Set the epilog printed after the option help.
    pub fn epilog(mut self, epilog: &str) -> OptionParser {
        self.epilog = epilog.to_string();
        self
    }

    /// Enable or disable the automatic `-h/--help` option.
    pub fn add_help_option(mut self, yes: bool) -> OptionParser {
        self.add_help_option = yes;
        self
    }

    /// Enable or disable the automatic `--version` option.
    pub fn add_version_option(mut self, yes: bool) -> OptionParser {
        self.add_version_option = yes;
        self
    }

    /// Seed a default for `dest`, overriding any option-level default.
    pub fn set_defaults(mut self, dest: &str, value: &str) -> OptionParser {
        self.defaults.push((dest.to_string(), value.to_string()));
        self
    }

    /// Declare an option from its flag strings and return it for
    /// configuration through the chained setters.
    ///
    /// # Panics
    ///
    /// Panics if a flag is malformed or already registered; declarations
    /// are written by the programmer, so this is a bug in the calling
    /// program. Use [`try_add_option`](OptionParser::try_add_option) to
    /// handle these errors instead.
    pub fn add_option(&mut self, flags: &[&str]) -> &mut Opt {
        let opt = match Opt::new(flags) {
            Ok(opt) => opt,
            Err(err) => panic!("{}", err),
        };
        match self.registry.register(opt) {
            Ok(opt) => opt,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible variant of [`add_option`](OptionParser::add_option).
    pub fn try_add_option(&mut self, flags: &[&str]) -> Result<&mut Opt> {
        self.registry.register(Opt::new(flags)?)
    }

    /// Parse a token sequence (program name already stripped).
    ///
    /// On success the parsed values are returned and the leftover
    /// positional arguments are readable via
    /// [`args`](OptionParser::args). On failure a single structured error
    /// is returned and any partially written values are discarded with
    /// the map.
    pub fn parse_args<I, S>(&mut self, args: I) -> Result<Values>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> =
            args.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.ensure_auto_options()?;
        self.registry.validate()?;
        let mut vals = Values::new();
        self.seed_defaults(&mut vals);
        let version = self.version.as_ref().map(|_| self.get_version());
        let engine =
            Engine::new(&self.registry, &mut vals, version.as_deref(), tokens);
        match engine.parse() {
            Ok(leftover) => {
                self.leftover = leftover;
                Ok(vals)
            }
            Err(Error::Help) => {
                Err(Error::WithUsage(Box::new(Error::Help), self.format_help()))
            }
            Err(err @ Error::Version(_)) => Err(err),
            Err(err) => Err(Error::WithUsage(Box::new(err), self.format_usage())),
        }
    }

    /// Parse a full `argv`-style array, stripping the zeroth element (the
    /// program path) and adopting it as the program name when none was
    /// set.
    pub fn parse_argv<I, S>(&mut self, argv: I) -> Result<Values>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut argv = argv.into_iter();
        if let Some(first) = argv.next() {
            if self.prog.is_none() {
                self.prog = Some(program_name(first.as_ref()));
            }
        }
        self.parse_args(argv)
    }

    /// The leftover positional arguments from the last parse.
    pub fn args(&self) -> &[String] {
        &self.leftover
    }

    /// The formatted usage line.
    pub fn format_usage(&self) -> String {
        format!("Usage: {}\n", self.expand(&self.usage))
    }

    /// The two-column option listing, in declaration order.
    pub fn format_option_help(&self) -> String {
        if self.registry.opts().is_empty() {
            return String::new();
        }
        let mut out = String::from("Options:\n");
        for opt in self.registry.opts() {
            let flags = format_flags(opt);
            if opt.help.is_empty() {
                out.push_str(&format!("  {}\n", flags));
            } else if 2 + flags.len() + 2 <= OPTION_COLUMN {
                out.push_str(&format!(
                    "  {:<width$}{}\n",
                    flags,
                    opt.help,
                    width = OPTION_COLUMN - 2
                ));
            } else {
                out.push_str(&format!(
                    "  {}\n{:indent$}{}\n",
                    flags,
                    "",
                    opt.help,
                    indent = OPTION_COLUMN
                ));
            }
        }
        out
    }

    /// The full help text: usage, description, options and epilog.
    pub fn format_help(&self) -> String {
        let mut out = self.format_usage();
        if !self.description.is_empty() {
            out.push('\n');
            out.push_str(&self.description);
            out.push('\n');
        }
        let opts = self.format_option_help();
        if !opts.is_empty() {
            out.push('\n');
            out.push_str(&opts);
        }
        if !self.epilog.is_empty() {
            out.push('\n');
            out.push_str(&self.epilog);
            out.push('\n');
        }
        out
    }

    /// The version string with `%prog` expanded, empty when unset.
    pub fn get_version(&self) -> String {
        self.expand(self.version.as_deref().unwrap_or(""))
    }

    /// Print the full help text to stdout.
    pub fn print_help(&self) {
        let _ = write!(io::stdout(), "{}", self.format_help());
    }

    /// Print the usage line to stdout.
    pub fn print_usage(&self) {
        let _ = write!(io::stdout(), "{}", self.format_usage());
    }

    /// Print the version to stdout.
    pub fn print_version(&self) {
        let _ = writeln!(io::stdout(), "{}", self.get_version());
    }

    /// Register the automatic help and version options, unless disabled
    /// or already declared by the caller.
    fn ensure_auto_options(&mut self) -> Result<()> {
        if self.add_help_option && !self.registry.has_long("help") {
            let mut flags: Vec<&str> = vec![];
            if !self.registry.has_short('h') {
                flags.push("-h");
            }
            flags.push("--help");
            self.registry
                .register(Opt::new(&flags)?)?
                .action(Action::Help)
                .help("show this help message and exit");
        }
        if self.add_version_option
            && self.version.is_some()
            && !self.registry.has_long("version")
        {
            self.registry
                .register(Opt::new(&["--version"])?)?
                .action(Action::Version)
                .help("show program's version number and exit");
        }
        Ok(())
    }

    fn seed_defaults(&self, vals: &mut Values) {
        for opt in self.registry.opts() {
            if let Some(default) = &opt.default {
                vals.seed(&opt.resolved_dest(), opt.action, default);
            }
        }
        for (dest, value) in &self.defaults {
            let action = self
                .registry
                .opts()
                .iter()
                .find(|o| o.resolved_dest() == *dest)
                .map_or(Action::Store, |o| o.action);
            vals.seed(dest, action, value);
        }
    }

    fn expand(&self, s: &str) -> String {
        let prog = match &self.prog {
            Some(prog) => prog.clone(),
            None => std::env::args()
                .next()
                .map(|p| program_name(&p))
                .unwrap_or_else(|| "prog".to_string()),
        };
        s.replace("%prog", &prog)
    }
}

impl Default for OptionParser {
    fn default() -> OptionParser {
        OptionParser::new()
    }
}

/// The flag column for one option row, e.g. `-f FILE, --file=FILE`.
fn format_flags(opt: &Opt) -> String {
    let metavar = opt
        .metavar
        .clone()
        .unwrap_or_else(|| opt.resolved_dest().to_uppercase());
    let mut parts = Vec::new();
    for &c in &opt.shorts {
        if opt.nargs > 0 {
            parts.push(format!("-{} {}", c, metavar));
        } else {
            parts.push(format!("-{}", c));
        }
    }
    for name in &opt.longs {
        if opt.nargs > 0 {
            parts.push(format!("--{}={}", name, metavar));
        } else {
            parts.push(format!("--{}", name));
        }
    }
    parts.join(", ")
}

fn program_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}
