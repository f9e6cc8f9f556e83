// tests/fix_tests.rs

use indoc::indoc;
use pretty_assertions::assert_eq;
use velafix::fix::{FixConfig, Fixer, Outcome, fix};
use velafix::parser::parse_file;
use velafix::printer::format_file;

/// Fixtures are written with four spaces per level; the printer uses tabs.
fn tabs(text: &str) -> String {
    text.lines()
        .map(|line| {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            format!("{}{}", "\t".repeat(spaces / 4), &line[spaces - spaces % 4..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fix_with(fixer: &Fixer, source: &str) -> String {
    let mut file = parse_file(source).unwrap();
    fixer.fix_file(&mut file);
    format_file(&file)
}

/// Fixes `input`, compares with `expected`, then checks that a second
/// round of parse, fix and print changes nothing.
fn check_with(fixer: &Fixer, input: &str, expected: &str) {
    let output = fix_with(fixer, input);
    assert_eq!(output.trim(), tabs(expected).trim());

    let again = fix_with(fixer, &output);
    assert_eq!(again, output, "second pass changed the output");
}

fn check(input: &str, expected: &str) {
    check_with(&Fixer::default(), input, expected);
}

// ============================================================================
// Fix table
// ============================================================================

#[test]
fn test_simple() {
    check(
        indoc! {r#"
            x: 212343
            parameter: _
            y: {
                for k, v in parameter.p {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            x:         212343
            parameter: _
            y: {
                for k, v in *parameter.p | {} {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_deep() {
    check(
        indoc! {r#"
            {
                for k, v in parameter.p.q {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            {
                for k, v in *parameter.p.q | {} {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_several() {
    check(
        indoc! {r#"
            {
                for k, v in parameter.p {
                    "\(k)": v
                }
                for k, v in parameter.q {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            {
                for k, v in *parameter.p | {} {
                    "\(k)": v
                }
                for k, v in *parameter.q | {} {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_other_elements() {
    check(
        indoc! {r#"
            {
                for k, v in parameter.p {
                    "\(k)": v
                }
                x: "foo"
                y: {
                    for k, v in parameter.p {
                        "\(k)": v
                    }
                }
                for k, v in other.x {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            {
                for k, v in *parameter.p | {} {
                    "\(k)": v
                }
                x: "foo"
                y: {
                    for k, v in *parameter.p | {} {
                        "\(k)": v
                    }
                }
                for k, v in other.x {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_comments() {
    check(
        indoc! {r#"
            // comment0
            {
                // comment1
                // comment2
                for k, v in parameter.p {
                    "\(k)": v
                }

                // comment3
                x: "foo" // comment 4

                // comment5
                y: {
                    for k, v in parameter.p {
                        "\(k)": v
                    }
                }
                // comment 6
                for k, v in other.x {
                    "\(k)": v // comment 7
                }
            }
        "#},
        indoc! {r#"
            // comment0
            {
                // comment1
                // comment2
                for k, v in *parameter.p | {} {
                    "\(k)": v
                }

                // comment3
                x: "foo" // comment 4

                // comment5
                y: {
                    for k, v in *parameter.p | {} {
                        "\(k)": v
                    }
                }
                // comment 6
                for k, v in other.x {
                    "\(k)": v // comment 7
                }
            }
        "#},
    );
}

#[test]
fn test_comprehension_in_comprehension() {
    check(
        indoc! {r#"
            {
                foo: {
                    for k, v in parameter.p {
                        if v.something {
                            "\(k)": v
                        }
                    }
                }
            }
        "#},
        indoc! {r#"
            {
                foo: {
                    for k, v in *parameter.p | {} {
                        if v.something {
                            "\(k)": v
                        }
                    }
                }
            }
        "#},
    );
}

#[test]
fn test_file_level() {
    check(
        indoc! {r#"
            import "strings"

            for k, v in parameter.p {
                if v.something {
                    "\(k)": strings.X(v)
                }
            }
        "#},
        indoc! {r#"
            import "strings"

            for k, v in *parameter.p | {} {
                if v.something {
                    "\(k)": strings.X(v)
                }
            }
        "#},
    );
}

#[test]
fn test_if_guarded() {
    let input = indoc! {r#"
        foo: {
            if parameter.p != _|_ for k, v in parameter.p {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_if_guarded_no_match() {
    check(
        indoc! {r#"
            foo: {
                if parameter.p != _|_ for k, v in parameter.q {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            foo: {
                if parameter.p != _|_ for k, v in *parameter.q | {} {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_if_guarded_several_guards() {
    let input = indoc! {r#"
        foo: {
            if parameter.a != _|_ if parameter.b != _|_ for k, v in parameter.a {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_using_index() {
    check(
        indoc! {r#"
            foo: {
                for k, v in parameter["p"] {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            foo: {
                for k, v in *parameter["p"] | {} {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_guard_using_index() {
    let input = indoc! {r#"
        foo: {
            if parameter["p"] != _|_ for k, v in parameter.p {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

// ============================================================================
// Further properties
// ============================================================================

#[test]
fn test_guard_using_selector_for_index_source() {
    let input = indoc! {r#"
        foo: {
            if parameter.p != _|_ for k, v in parameter["p"] {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_conjunction_guard() {
    let input = indoc! {r#"
        foo: {
            if parameter.enabled && parameter.p != _|_ for k, v in parameter.p {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_guard_after_for_does_not_count() {
    check(
        indoc! {r#"
            foo: {
                for k, v in parameter.p if parameter.p != _|_ {
                    "\(k)": v
                }
            }
        "#},
        indoc! {r#"
            foo: {
                for k, v in *parameter.p | {} if parameter.p != _|_ {
                    "\(k)": v
                }
            }
        "#},
    );
}

#[test]
fn test_nested_two_levels() {
    check(
        indoc! {r#"
            outputs: {
                service: {
                    spec: {
                        for k, v in parameter.ports {
                            "\(k)": v
                        }
                    }
                }
            }
        "#},
        indoc! {r#"
            outputs: {
                service: {
                    spec: {
                        for k, v in *parameter.ports | {} {
                            "\(k)": v
                        }
                    }
                }
            }
        "#},
    );
}

#[test]
fn test_list_comprehension() {
    check(
        indoc! {r#"
            items: [for x in parameter.list {x}]
            containers: [
                for c in parameter.sidecars {
                    name: c.name
                },
            ]
        "#},
        indoc! {r#"
            items: [for x in *parameter.list | {} {x}]
            containers: [
                for c in *parameter.sidecars | {} {
                    name: c.name
                },
            ]
        "#},
    );
}

#[test]
fn test_let_clause_is_kept() {
    check(
        indoc! {r#"
            labels: {
                for k, v in parameter.labels let name = "app-\(k)" {
                    (name): v
                }
            }
        "#},
        indoc! {r#"
            labels: {
                for k, v in *parameter.labels | {} let name = "app-\(k)" {
                    (name): v
                }
            }
        "#},
    );
}

#[test]
fn test_non_path_sources_untouched() {
    let input = indoc! {r#"
        a: {
            for k, v in strings.Split(parameter.s, ",") {
                "\(k)": v
            }
        }
        b: {
            for k, v in parameter.lists[0] {
                "\(k)": v
            }
        }
        c: {
            for k, v in parameter["\(name)"] {
                "\(k)": v
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_other_root_untouched_at_depth() {
    let input = indoc! {r#"
        a: {
            b: {
                for k, v in context.output.labels {
                    "\(k)": v
                }
            }
        }
    "#};
    check(input, input);
}

#[test]
fn test_custom_binding() {
    let fixer = Fixer::new(FixConfig::with_binding("context"));
    check_with(
        &fixer,
        indoc! {r#"
            for k, v in context.output {
                "\(k)": v
            }
            for k, v in parameter.p {
                "\(k)": v
            }
        "#},
        indoc! {r#"
            for k, v in *context.output | {} {
                "\(k)": v
            }
            for k, v in parameter.p {
                "\(k)": v
            }
        "#},
    );
}

#[test]
fn test_unrelated_content_unchanged() {
    check(
        indoc! {r#"
            package main

            import (
                "strings"
            )

            // The template
            template: {
                name:     parameter.name // inline
                replicas: *1 | int

                for k, v in parameter.env {
                    "\(k)": strings.ToLower(v)
                }
            }
        "#},
        indoc! {r#"
            package main

            import (
                "strings"
            )

            // The template
            template: {
                name:     parameter.name // inline
                replicas: *1 | int

                for k, v in *parameter.env | {} {
                    "\(k)": strings.ToLower(v)
                }
            }
        "#},
    );
}

#[test]
fn test_end_of_line_comments_stay_in_place() {
    check(
        indoc! {r#"
            y: { // note
                for k, v in parameter.p { // iterate
                    "\(k)": v
                }
                if parameter.q != _|_ // guard
                for k, v in parameter.q {
                    "\(k)": v
                }
                l: [ // items
                    for v in parameter.l {v},
                ]
            }
        "#},
        indoc! {r#"
            y: { // note
                for k, v in *parameter.p | {} { // iterate
                    "\(k)": v
                }
                if parameter.q != _|_ // guard
                for k, v in parameter.q {
                    "\(k)": v
                }
                l: [ // items
                    for v in *parameter.l | {} {v},
                ]
            }
        "#},
    );
}

#[test]
fn test_aliases_and_raw_strings_are_kept() {
    check(
        indoc! {r##"
            X=labels: {
                for k, v in parameter.labels {
                    "\(k)": #"raw "\(v)""#
                }
            }
        "##},
        indoc! {r##"
            X=labels: {
                for k, v in *parameter.labels | {} {
                    "\(k)": #"raw "\(v)""#
                }
            }
        "##},
    );
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_report_contents() {
    let mut file = parse_file(indoc! {r#"
        a: {
            for k, v in parameter.p {
                "\(k)": v
            }
        }
        b: {
            if parameter["q"] != _|_ for k, v in parameter.q {
                "\(k)": v
            }
        }
        c: {
            for k, v in other["my-key"] {
                "\(k)": v
            }
        }
        d: {
            for k, v in f(parameter.p) {
                "\(k)": v
            }
        }
    "#})
    .unwrap();

    let report = Fixer::default().fix_file(&mut file);

    let outcomes: Vec<Outcome> = report.findings.iter().map(|f| f.outcome).collect();
    assert_eq!(
        outcomes,
        vec![Outcome::Rewritten, Outcome::Guarded, Outcome::OtherRoot]
    );

    let paths: Vec<String> = report.findings.iter().map(|f| f.path.to_string()).collect();
    assert_eq!(paths, vec!["parameter.p", "parameter.q", r#"other["my-key"]"#]);

    let lines: Vec<usize> = report
        .findings
        .iter()
        .filter_map(|f| f.pos.map(|p| p.line))
        .collect();
    assert_eq!(lines, vec![2, 7, 12]);

    assert_eq!(report.rewritten(), 1);
    assert_eq!(report.guarded(), 1);
    assert_eq!(report.other_roots().count(), 1);
    assert!(!report.is_unchanged());
}

#[test]
fn test_second_pass_reports_nothing_to_rewrite() {
    let mut file = parse_file("for k, v in parameter.p {}\n").unwrap();
    let fixer = Fixer::default();
    assert_eq!(fixer.fix_file(&mut file).rewritten(), 1);

    let report = fixer.fix_file(&mut file);
    assert!(report.is_unchanged());
    assert!(report.findings.is_empty());
}

#[test]
fn test_file_without_comprehensions() {
    let file = parse_file("a: 1\nb: {c: parameter.x}\n").unwrap();
    assert_eq!(fix(file.clone()), file);

    let mut copy = file.clone();
    assert!(Fixer::default().fix_file(&mut copy).findings.is_empty());
}
