use serde::Deserialize;

use crate::test::get_values;
use crate::{Action, Error, OptionParser, Type};

#[derive(Debug, Deserialize, PartialEq)]
enum Mode {
    Fast,
    Slow,
}

#[derive(Debug, Deserialize)]
struct Args {
    filename: String,
    verbose: bool,
    level: u32,
    include: Vec<String>,
    speed: f64,
    color: Option<String>,
    mode: Mode,
}

fn full_parser() -> OptionParser {
    let mut parser = OptionParser::new();
    parser.add_option(&["-f", "--file"]).dest("filename");
    parser.add_option(&["-v", "--verbose"]).action(Action::StoreTrue);
    parser.add_option(&["-l", "--level"]).action(Action::Count);
    parser.add_option(&["-i", "--include"]).action(Action::Append);
    parser.add_option(&["--speed"]).typ(Type::Float).set_default("10");
    parser.add_option(&["--color"]);
    parser.add_option(&["--mode"]).choices(&["fast", "slow"]);
    parser
}

#[test]
fn deserializes_into_a_struct() {
    let mut parser = full_parser();
    let vals = get_values(
        &mut parser,
        &["-f", "out.txt", "-lll", "-iA", "-iB", "--mode", "fast"],
    );
    let args: Args = vals.deserialize().unwrap();
    assert_eq!(args.filename, "out.txt");
    // An absent switch deserializes as false.
    assert!(!args.verbose);
    assert_eq!(args.level, 3);
    assert_eq!(args.include, ["A", "B"]);
    assert_eq!(args.speed, 10.0);
    assert_eq!(args.color, None);
    assert_eq!(args.mode, Mode::Fast);
}

#[test]
fn optional_field_is_some_when_supplied() {
    let mut parser = full_parser();
    let vals = get_values(
        &mut parser,
        &["-f", "x", "-l", "-iA", "--mode", "slow", "--color", "red"],
    );
    let args: Args = vals.deserialize().unwrap();
    assert_eq!(args.color, Some("red".to_string()));
    assert_eq!(args.mode, Mode::Slow);
}

#[test]
fn enum_variants_match_case_insensitively() {
    #[derive(Debug, Deserialize)]
    struct Only {
        mode: Mode,
    }
    let mut parser = OptionParser::new();
    parser.add_option(&["--mode"]);
    let vals = get_values(&mut parser, &["--mode", "FAST"]);
    let only: Only = vals.deserialize().unwrap();
    assert_eq!(only.mode, Mode::Fast);
}

#[test]
fn missing_value_for_a_required_field_names_it() {
    let mut parser = full_parser();
    let vals = get_values(&mut parser, &["-l", "--mode", "slow"]);
    match vals.deserialize::<Args>() {
        Err(Error::Deserialize(msg)) => assert!(msg.contains("filename")),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn malformed_number_is_a_typed_error() {
    #[derive(Debug, Deserialize)]
    struct Listen {
        port: u16,
    }
    let mut parser = OptionParser::new();
    parser.add_option(&["--port"]).typ(Type::Int);
    let vals = get_values(&mut parser, &["--port", "eighty"]);
    // The best-effort accessor stays permissive; the typed path does not.
    assert_eq!(vals.get_int("port"), 0);
    match vals.deserialize::<Listen>() {
        Err(Error::Deserialize(msg)) => assert!(msg.contains("eighty")),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn dashed_dest_matches_the_underscored_field() {
    #[derive(Debug, Deserialize)]
    struct Flags {
        no_color: bool,
    }
    let mut parser = OptionParser::new();
    parser.add_option(&["--no-color"]).action(Action::StoreTrue).dest("no-color");
    let vals = get_values(&mut parser, &["--no-color"]);
    let flags: Flags = vals.deserialize().unwrap();
    assert!(flags.no_color);
}

#[test]
fn counted_flags_deserialize_as_any_integer_width() {
    #[derive(Debug, Deserialize)]
    struct Verbosity {
        level: u8,
    }
    let mut parser = OptionParser::new();
    parser.add_option(&["-l"]).action(Action::Count).dest("level");
    let vals = get_values(&mut parser, &["-lll"]);
    let v: Verbosity = vals.deserialize().unwrap();
    assert_eq!(v.level, 3);
}
