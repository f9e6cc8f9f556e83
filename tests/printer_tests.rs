// tests/printer_tests.rs

use indoc::indoc;
use pretty_assertions::assert_eq;
use velafix::ast::{Comment, Decl, DeclKind, Expr, Field, File, Label, StructLit};
use velafix::fix::default_to_empty;
use velafix::parser::parse_file;
use velafix::printer::{format_expr, format_file};

fn format(source: &str) -> String {
    format_file(&parse_file(source).unwrap())
}

/// Formatting formatted text gives the same text back.
fn assert_fixpoint(source: &str) {
    let once = format(source);
    let twice = format(&once);
    assert_eq!(twice, once);
}

// ============================================================================
// Alignment
// ============================================================================

#[test]
fn test_aligns_consecutive_fields() {
    assert_eq!(
        format("a: 1\nlonger: 2\n\nc: 3\nd: {\n\te: 1\n}\n"),
        "a:      1\nlonger: 2\n\nc: 3\nd: {\n\te: 1\n}\n"
    );
}

#[test]
fn test_normalizes_spacing() {
    assert_eq!(format("a:1\nb:   {x:2,y:3}\n"), "a: 1\nb: {x: 2, y: 3}\n");
}

#[test]
fn test_markers_count_towards_label_width() {
    assert_eq!(
        format("name!: string\nport?: int\nlabels: {}\n"),
        "name!:  string\nport?:  int\nlabels: {}\n"
    );
}

#[test]
fn test_comment_breaks_alignment() {
    assert_eq!(
        format("a: 1\n// about b\nlonger: 2\n"),
        "a: 1\n// about b\nlonger: 2\n"
    );
}

#[test]
fn test_trailing_comment_keeps_alignment() {
    assert_eq!(
        format("a: 1 // one\nlonger: 2\n"),
        "a:      1 // one\nlonger: 2\n"
    );
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_multiline_list_gets_trailing_commas() {
    assert_eq!(format("l: [\n\t1,\n\t2\n]\n"), "l: [\n\t1,\n\t2,\n]\n");
}

#[test]
fn test_single_line_list_stays() {
    assert_eq!(format("l: [1,2,  3]\n"), "l: [1, 2, 3]\n");
}

#[test]
fn test_blank_lines_collapse() {
    assert_eq!(format("a: 1\n\n\n\nb: 2\n"), "a: 1\n\nb: 2\n");
}

#[test]
fn test_no_blank_line_after_open_brace() {
    assert_eq!(format("x: {\n\n\ta: 1\n}\n"), "x: {\n\ta: 1\n}\n");
}

#[test]
fn test_leading_blank_lines_dropped() {
    assert_eq!(format("\n\n// c\na: 1\n"), "// c\na: 1\n");
}

#[test]
fn test_struct_with_only_comments() {
    assert_eq!(format("x: {\n\t// only\n}\n"), "x: {\n\t// only\n}\n");
}

#[test]
fn test_reindents_with_tabs() {
    assert_eq!(
        format("x: {\n  y: {\n        z: 1\n  }\n}\n"),
        "x: {\n\ty: {\n\t\tz: 1\n\t}\n}\n"
    );
}

#[test]
fn test_shorthand_fields() {
    assert_eq!(
        format("a: b: c: 1\nlabels: [string]: string\n"),
        "a:      b: c: 1\nlabels: [string]: string\n"
    );
}

#[test]
fn test_comments_after_open_brackets() {
    let source = "x: { // nothing yet\n}\ny: [ // ports\n\t80,\n]\nz: {a: 1} // inline\n";
    assert_eq!(format(source), source);
}

#[test]
fn test_comments_after_clauses() {
    let source = "s: {\n\tif a != _|_ // guard\n\t// why\n\tfor v in a {v}\n}\n";
    assert_eq!(format(source), source);
}

#[test]
fn test_aliases_and_raw_strings() {
    assert_eq!(
        format("X=foo: #\"a\\b\"#\nbar: 1\n"),
        "X=foo: #\"a\\b\"#\nbar:   1\n"
    );
}

#[test]
fn test_clause_commas_dropped() {
    assert_eq!(
        format("if a != _|_, for x in a {x}\n"),
        "if a != _|_ for x in a {x}\n"
    );
}

#[test]
fn test_imports() {
    assert_eq!(
        format("import \"strings\"\nimport (\n  s \"strings\"\n)\n"),
        "import \"strings\"\nimport (\n\ts \"strings\"\n)\n"
    );
}

#[test]
fn test_attributes_and_multiline_strings() {
    let source = "name: string @go(Name)\ntext: \"\"\"\n\tline\n\t\"\"\"\n";
    assert_eq!(format(source), source);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_synthesized_default_prints_compactly() {
    let expr = default_to_empty(Expr::Ident("parameter".to_string()));
    assert_eq!(format_expr(&expr), "*parameter | {}");
    assert_eq!(format_expr(&Expr::Struct(StructLit::empty())), "{}");
}

#[test]
fn test_tree_built_in_code() {
    let mut decl = Decl::new(DeclKind::Field(Field {
        alias: None,
        label: Label::Ident("a".to_string()),
        marker: None,
        value: default_to_empty(Expr::Ident("parameter".to_string())),
        attrs: vec![],
    }));
    decl.comments.leading.push(Comment::new("// built"));
    let file = File {
        decls: vec![decl],
        trailing_comments: vec![Comment::new("// end")],
    };

    assert_eq!(format_file(&file), "// built\na: *parameter | {}\n// end\n");
}

#[test]
fn test_operators_and_calls() {
    assert_eq!(
        format("x: *1|int\ny: strings.Join( [a,b] , \",\")\nz: !a&&b\n"),
        "x: *1 | int\ny: strings.Join([a, b], \",\")\nz: !a && b\n"
    );
}

#[test]
fn test_parens_are_kept() {
    assert_eq!(format("x: (a + b) * c\n"), "x: (a + b) * c\n");
}

// ============================================================================
// Fixpoint
// ============================================================================

#[test]
fn test_fixpoint_on_component_template() {
    assert_fixpoint(indoc! {r#"
        package app

        import (
            "strings"
        )

        // Component template
        template: {
            output: {
                apiVersion: "apps/v1"
                kind: "Deployment"
                spec: {
                    replicas: *1 | int
                    selector: matchLabels: app: context.name
                    template: spec: containers: [{
                        name: context.name
                        image: parameter.image
                        if parameter.cmd != _|_ {
                            command: parameter.cmd
                        }
                        env: [for k, v in *parameter.env | {} {name: k, value: strings.ToUpper(v)}]
                    }]
                }
            }
            #Config: {
                name!: string
                port?: >=0 & <65536 // tcp
                labels: [string]: string
                ...
            }

            parameter: {
                env: [...{name: string, value: string}]
            }
        }
    "#});
}
