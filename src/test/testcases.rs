use crate::test::{file_quiet_parser, get_values, user_error};
use crate::Value::{Counted, List, Plain, Switch};
use crate::{Action, Error, Opt, OptionParser, Registry};

test_expect!(defaults_seed_before_parsing, crate::test::file_quiet_parser(), &[],
    vec![("verbose", Switch(true))]);

test_expect!(quiet_long_flag, crate::test::file_quiet_parser(), &["--quiet"],
    vec![("verbose", Switch(false))]);

test_expect!(unique_prefix_with_inline_value, crate::test::file_quiet_parser(),
    &["--fil=out.txt"],
    vec![("filename", Plain("out.txt".to_string())), ("verbose", Switch(true))]);

test_user_error!(unknown_long_flag, crate::test::file_quiet_parser(), &["--unknown"]);

test_user_error!(unknown_short_flag, crate::test::file_quiet_parser(), &["-x"]);

#[test]
fn short_flags_with_value_and_leftover() {
    let mut parser = file_quiet_parser();
    let vals = get_values(&mut parser, &["-f", "out.txt", "-q", "extra"]);
    assert_eq!(vals.get_str("filename"), "out.txt");
    assert!(!vals.get_bool("verbose"));
    assert_eq!(parser.args(), ["extra"]);
}

#[test]
fn double_dash_stops_option_scanning() {
    let mut parser = file_quiet_parser();
    let vals = get_values(&mut parser, &["-f", "a", "--", "-q", "--file=x", "plain"]);
    assert_eq!(vals.get_str("filename"), "a");
    assert!(vals.get_bool("verbose"));
    assert_eq!(parser.args(), ["-q", "--file=x", "plain"]);
}

#[test]
fn bare_dash_is_positional() {
    let mut parser = file_quiet_parser();
    let vals = get_values(&mut parser, &["-", "-q"]);
    assert!(!vals.get_bool("verbose"));
    assert_eq!(parser.args(), ["-"]);
}

#[test]
fn options_and_positionals_interleave() {
    let mut parser = file_quiet_parser();
    let vals = get_values(&mut parser, &["a", "-q", "b", "--file", "x", "c"]);
    assert_eq!(vals.get_str("filename"), "x");
    assert!(!vals.get_bool("verbose"));
    assert_eq!(parser.args(), ["a", "b", "c"]);
}

#[test]
fn store_keeps_last_occurrence() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--flag"]);
    let vals = get_values(&mut parser, &["--flag=A", "--flag=B"]);
    assert_eq!(vals.get_str("flag"), "B");
}

#[test]
fn append_accumulates_in_order() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-i", "--include"]).action(Action::Append);
    let vals = get_values(&mut parser, &["--include=A", "--include", "B", "-iC"]);
    assert_eq!(vals.get("include"), Some(&List(vec![
        "A".to_string(), "B".to_string(), "C".to_string(),
    ])));
    assert_eq!(vals.get_vec("include"), ["A", "B", "C"]);
}

#[test]
fn cluster_of_flags_with_trailing_value() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-v"]).action(Action::StoreTrue).dest("verbose");
    parser.add_option(&["-q"]).action(Action::StoreTrue).dest("quick");
    parser.add_option(&["-f"]).dest("filename");
    let vals = get_values(&mut parser, &["-vqf", "value"]);
    assert!(vals.get_bool("verbose"));
    assert!(vals.get_bool("quick"));
    assert_eq!(vals.get_str("filename"), "value");
}

#[test]
fn attached_short_value_is_not_reinterpreted() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-f"]).dest("filename");
    parser.add_option(&["-v"]).action(Action::StoreTrue).dest("verbose");
    let vals = get_values(&mut parser, &["-fvalue"]);
    assert_eq!(vals.get_str("filename"), "value");
    assert!(!vals.get_bool("verbose"));
}

#[test]
fn count_accumulates_across_clusters_and_long_flags() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-v", "--verbose"]).action(Action::Count);
    let vals = get_values(&mut parser, &["-vvv", "--verbose"]);
    assert_eq!(vals.get("verbose"), Some(&Counted(4)));
    assert_eq!(vals.get_count("verbose"), 4);
}

#[test]
fn store_const_writes_the_constant() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--fast"])
          .action(Action::StoreConst)
          .set_const("10")
          .dest("speed");
    let vals = get_values(&mut parser, &["--fast"]);
    assert_eq!(vals.get_str("speed"), "10");
    assert_eq!(vals.get_int("speed"), 10);
}

#[test]
fn choice_accepts_a_member() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--color"]).choices(&["red", "green", "blue"]);
    let vals = get_values(&mut parser, &["--color=green"]);
    assert_eq!(vals.get_str("color"), "green");
}

#[test]
fn choice_rejects_non_members_case_sensitively() {
    for bad in ["violet", "RED"] {
        let mut parser = OptionParser::new();
        parser.add_option(&["--color"]).choices(&["red", "green", "blue"]);
        match user_error(&mut parser, &["--color", bad]) {
            Error::InvalidChoice { flag, value, choices } => {
                assert_eq!(flag, "--color");
                assert_eq!(value, bad);
                assert_eq!(choices, ["red", "green", "blue"]);
            }
            err => panic!("unexpected error: {:?}", err),
        }
    }
}

#[test]
fn nargs_consumes_multiple_values() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--point"]).nargs(2);
    let vals = get_values(&mut parser, &["--point", "3", "4", "rest"]);
    assert_eq!(vals.get("point"), Some(&List(vec!["3".to_string(), "4".to_string()])));
    assert_eq!(parser.args(), ["rest"]);
}

#[test]
fn inline_value_fills_the_first_slot() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--point"]).nargs(2);
    let vals = get_values(&mut parser, &["--point=3", "4"]);
    assert_eq!(vals.get_vec("point"), ["3", "4"]);
}

#[test]
fn unique_abbreviation_matches_full_flag() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--import"]).action(Action::StoreTrue);
    parser.add_option(&["--include"]).action(Action::StoreTrue);
    let vals = get_values(&mut parser, &["--imp"]);
    assert!(vals.get_bool("import"));
    assert!(!vals.get_bool("include"));
}

#[test]
fn exact_match_beats_prefix() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--in"]).action(Action::StoreTrue);
    parser.add_option(&["--include"]).action(Action::StoreTrue);
    let vals = get_values(&mut parser, &["--in"]);
    assert!(vals.get_bool("in"));
    assert!(!vals.get_bool("include"));
}

#[test]
fn ambiguous_abbreviation_lists_candidates() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--import"]).action(Action::StoreTrue);
    parser.add_option(&["--include"]).action(Action::StoreTrue);
    match user_error(&mut parser, &["--i"]) {
        Error::Ambiguous { flag, candidates } => {
            assert_eq!(flag, "--i");
            assert_eq!(candidates, ["--import", "--include"]);
        }
        err => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn set_defaults_overrides_option_defaults() {
    let mut parser = OptionParser::new().set_defaults("level", "5");
    parser.add_option(&["--level"]).set_default("3");
    let vals = get_values(&mut parser, &[]);
    assert!(vals.is_set("level"));
    assert_eq!(vals.get_int("level"), 5);
}

#[test]
fn dest_derives_from_the_first_long_flag() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-n", "--no-color"]).action(Action::StoreTrue);
    let vals = get_values(&mut parser, &["-n"]);
    assert!(vals.get_bool("no_color"));
}

#[test]
fn best_effort_accessors_default_on_failure() {
    let mut parser = OptionParser::new();
    parser.add_option(&["--port"]);
    let vals = get_values(&mut parser, &["--port", "eighty"]);
    assert!(vals.is_set("port"));
    assert_eq!(vals.get_int("port"), 0);
    assert_eq!(vals.get_float("port"), 0.0);
    assert_eq!(vals.get_count("port"), 0);
    assert!(!vals.get_bool("port"));
    assert_eq!(vals.get_vec("port"), ["eighty"]);
    assert!(!vals.is_set("missing"));
    assert_eq!(vals.get_str("missing"), "");
}

#[test]
fn duplicate_registration_is_all_or_nothing() {
    let mut registry = Registry::new();
    registry.register(Opt::new(&["--file"]).unwrap()).unwrap();
    let err = registry.register(Opt::new(&["-f", "--file"]).unwrap()).unwrap_err();
    match err {
        Error::Duplicate { flag } => assert_eq!(flag, "--file"),
        err => panic!("unexpected error: {:?}", err),
    }
    // The free flag of the rejected option must not have been inserted.
    assert!(registry.lookup_short('f').is_none());
    assert_eq!(registry.opts().len(), 1);
}

#[test]
fn registry_lookups_resolve_both_flag_forms() {
    let mut registry = Registry::new();
    let opt = Opt::new(&["-a", "--archive"]).unwrap();
    registry.register(opt).unwrap();
    assert!(registry.lookup_short('a').is_some());
    assert!(registry.lookup_long("archive").is_ok());
    assert!(registry.lookup_long("arch").is_ok());
    assert!(registry.lookup_long("archives").is_err());
}

#[test]
fn usage_substitutes_prog() {
    let parser = OptionParser::new().prog("example").usage("%prog [options] FILE");
    assert_eq!(parser.format_usage(), "Usage: example [options] FILE\n");
}

#[test]
fn version_substitutes_prog() {
    let parser = OptionParser::new().prog("example").version("%prog 0.3");
    assert_eq!(parser.get_version(), "example 0.3");
}

#[test]
fn help_columns_align_and_long_rows_break() {
    let mut parser = OptionParser::new().prog("example");
    parser.add_option(&["-f", "--file"])
          .dest("filename")
          .metavar("FILE")
          .help("write report to FILE");
    parser.add_option(&["--really-long-option-name"])
          .action(Action::StoreTrue)
          .help("breaks onto its own line");
    let help = parser.format_option_help();
    assert!(help.starts_with("Options:\n"));
    assert!(help.contains("  -f FILE, --file=FILE  write report to FILE\n"));
    assert!(help.contains(&format!(
        "  --really-long-option-name\n{:24}breaks onto its own line\n",
        ""
    )));
}

#[test]
fn metavar_defaults_to_the_upper_cased_dest() {
    let mut parser = OptionParser::new();
    parser.add_option(&["-o", "--output"]);
    let help = parser.format_option_help();
    assert!(help.contains("-o OUTPUT, --output=OUTPUT"));
}

#[test]
fn parse_argv_strips_the_program_name_and_adopts_prog() {
    let mut parser = file_quiet_parser();
    let vals = parser.parse_argv(["/usr/bin/report", "-f", "x"]).unwrap();
    assert_eq!(vals.get_str("filename"), "x");
    assert_eq!(parser.format_usage(), "Usage: report [options]\n");
}

#[test]
fn registry_is_reusable_across_parses() {
    let mut parser = file_quiet_parser();
    let first = get_values(&mut parser, &["-q"]);
    assert!(!first.get_bool("verbose"));
    let second = get_values(&mut parser, &["one", "two"]);
    assert!(second.get_bool("verbose"));
    assert_eq!(parser.args(), ["one", "two"]);
}
