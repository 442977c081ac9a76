use std::collections::HashMap;

use crate::{Action, Error, OptionParser, Value, Values};

/// The registry most scenario tests run against: a `store` option and a
/// `store_false` option with a default.
pub fn file_quiet_parser() -> OptionParser {
    let mut parser = OptionParser::new();
    parser.add_option(&["-f", "--file"])
          .dest("filename")
          .help("write report to FILE")
          .metavar("FILE");
    parser.add_option(&["-q", "--quiet"])
          .action(Action::StoreFalse)
          .dest("verbose")
          .set_default("1")
          .help("don't print status messages to stdout");
    parser
}

pub fn get_values(parser: &mut OptionParser, argv: &[&str]) -> Values {
    match parser.parse_args(argv.iter().copied()) {
        Ok(vals) => vals,
        Err(err) => panic!("{}", err),
    }
}

pub fn parse_err(parser: &mut OptionParser, argv: &[&str]) -> Error {
    match parser.parse_args(argv.iter().copied()) {
        Ok(vals) => panic!("expected an error, got {:?}", vals),
        Err(err) => err,
    }
}

/// Like `parse_err`, but with the usage wrapper peeled off.
pub fn user_error(parser: &mut OptionParser, argv: &[&str]) -> Error {
    match parse_err(parser, argv) {
        Error::WithUsage(inner, _) => *inner,
        err => err,
    }
}

pub fn map_from_alist(alist: Vec<(&str, Value)>) -> HashMap<String, Value> {
    alist.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub fn same_values(expected: &HashMap<String, Value>, got: &Values) {
    for (k, ve) in expected {
        match got.get(k) {
            None => panic!("EXPECTED has '{}' but GOT does not.", k),
            Some(vg) => {
                assert_eq!(ve, vg, "{}: EXPECTED != GOT", k)
            }
        }
    }
    for (k, vg) in &got.map {
        match expected.get(k) {
            None => panic!("GOT has '{}' but EXPECTED does not.", k),
            Some(ve) => {
                assert_eq!(vg, ve, "{}: GOT != EXPECTED", k)
            }
        }
    }
}

macro_rules! test_expect(
    ($name:ident, $parser:expr, $args:expr, $expected:expr) => (
        #[test]
        fn $name() {
            let mut parser = $parser;
            let vals = crate::test::get_values(&mut parser, $args);
            let expected = crate::test::map_from_alist($expected);
            crate::test::same_values(&expected, &vals);
        }
    );
);

macro_rules! test_user_error(
    ($name:ident, $parser:expr, $args:expr) => (
        #[test]
        fn $name() {
            let mut parser = $parser;
            crate::test::parse_err(&mut parser, $args);
        }
    );
);

mod deser;
mod testcases;
