use pretty_assertions::assert_eq;
use sentex_syntax::ast::{BinaryOp, ExprKind, LiteralValue, LogicalOp};
use sentex_syntax::{ErrorCategory, Options, Span, parse, visit};

fn parse_default(source: &str) -> sentex_syntax::Expr {
    parse(source, &Options::default()).unwrap()
}

fn render(source: &str) -> String {
    parse_default(source).to_string()
}

#[test]
fn test_precedence() {
    assert_eq!(render("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(render("(1 + 2) * 3"), "((1 + 2) * 3)");
    assert_eq!(render("a || b && c"), "(a || (b && c))");
    assert_eq!(render("a == b < c"), "(a == (b < c))");
    assert_eq!(render("a ?? b || c"), "(a ?? (b || c))");
    assert_eq!(render("-a.b"), "(-a.b)");
    assert_eq!(render("!a == b"), "((!a) == b)");
}

#[test]
fn test_left_associativity() {
    assert_eq!(render("10 - 4 - 3"), "((10 - 4) - 3)");
    assert_eq!(render("a ?? b ?? c"), "((a ?? b) ?? c)");
    assert_eq!(render("8 / 4 % 3"), "((8 / 4) % 3)");
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(render("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    assert_eq!(render("a ? b ? c : d : e"), "(a ? (b ? c : d) : e)");
}

#[test]
fn test_postfix_chains() {
    let expr = parse_default("fmt(items[0].name)(1)");
    assert_eq!(expr.to_string(), "fmt(items[0].name)(1)");
    match &expr.kind {
        ExprKind::Call { callee, arguments } => {
            assert_eq!(arguments.len(), 1);
            assert!(matches!(callee.kind, ExprKind::Call { .. }));
        }
        other => panic!("Expected Call, got {other:?}"),
    }
}

#[test]
fn test_member_shapes() {
    let expr = parse_default("a.b");
    match &expr.kind {
        ExprKind::Member {
            property, computed, ..
        } => {
            assert!(!*computed);
            assert_eq!(property.as_identifier(), Some("b"));
        }
        other => panic!("Expected Member, got {other:?}"),
    }

    let expr = parse_default("a['b']");
    assert!(matches!(expr.kind, ExprKind::Member { computed: true, .. }));
}

#[test]
fn test_literals() {
    let expr = parse_default("'it\\'s'");
    match &expr.kind {
        ExprKind::Literal { value, raw } => {
            assert_eq!(*value, LiteralValue::String("it's".into()));
            assert_eq!(raw.as_str(), "'it\\'s'");
        }
        other => panic!("Expected Literal, got {other:?}"),
    }

    assert!(matches!(
        parse_default("null").kind,
        ExprKind::Literal {
            value: LiteralValue::Null,
            ..
        }
    ));
    assert!(matches!(
        parse_default("1.5e2").kind,
        ExprKind::Literal {
            value: LiteralValue::Number(n),
            ..
        } if n == 150.0
    ));
    // `undefined` is an ordinary identifier.
    assert_eq!(parse_default("undefined").as_identifier(), Some("undefined"));
}

#[test]
fn test_parentheses_are_unwrapped() {
    let expr = parse_default("((a))");
    assert_eq!(expr.as_identifier(), Some("a"));
    assert_eq!(expr.span, Span::new(2, 3));
}

#[test]
fn test_array_and_object_literals() {
    assert_eq!(render("[1, 2, 3,]"), "[1, 2, 3]");
    assert_eq!(render("[]"), "[]");
    assert_eq!(render("{a: 1, 'b': 2, 3: c,}"), "{a: 1, \"b\": 2, 3: c}");

    let expr = parse_default("{ name, total: 1 }");
    match &expr.kind {
        ExprKind::Object(props) => {
            assert_eq!(props.len(), 2);
            assert!(props[0].shorthand);
            assert_eq!(props[0].value.as_identifier(), Some("name"));
            assert_eq!(props[1].key_name().as_deref(), Some("total"));
        }
        other => panic!("Expected Object, got {other:?}"),
    }
}

#[test]
fn test_spans() {
    let expr = parse_default("price * qty");
    assert_eq!(expr.span, Span::new(0, 11));
    if let ExprKind::Binary { op, left, right } = &expr.kind {
        assert_eq!(*op, BinaryOp::Mul);
        assert_eq!(left.span, Span::new(0, 5));
        assert_eq!(right.span, Span::new(8, 11));
    } else {
        panic!("Expected Binary");
    }

    assert_eq!(parse_default("f(a, b)").span, Span::new(0, 7));
    assert_eq!(parse_default("a[0]").span, Span::new(0, 4));
}

#[test]
fn test_logical_nodes() {
    let expr = parse_default("a && b");
    assert!(matches!(
        expr.kind,
        ExprKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn test_syntax_errors() {
    let cases = [
        ("a * * b", "unexpected token '*'", 5),
        ("1 +", "unexpected end of input", 4),
        ("a b", "unexpected token identifier 'b' after end of expression", 3),
        ("a ? b", "expected ':' in conditional expression", 6),
        ("(a", "expected ')' to close parenthesized expression", 3),
        ("a.'x'", "expected property name after '.'", 3),
        ("[1,,2]", "empty elements are not supported", 4),
        ("{a: 1 b: 2}", "expected ',' or '}' in object literal", 7),
        ("f(1 2)", "expected ')' to close argument list", 5),
        ("+a", "unexpected token '+'", 1),
    ];

    for (source, message, column) in cases {
        let err = parse(source, &Options::default()).unwrap_err();
        assert_eq!(err.category, ErrorCategory::Syntax, "{source}");
        assert!(
            err.message.contains(message),
            "{source}: {} does not contain {message}",
            err.message
        );
        assert_eq!(err.column, Some(column), "{source}");
    }
}

#[test]
fn test_forbidden_globals_rejected_at_parse_time() {
    for source in ["process.env", "eval('1')", "this", "x + globalThis", "{ window }"] {
        let err = parse(source, &Options::default()).unwrap_err();
        assert_eq!(err.category, ErrorCategory::Security, "{source}");
        assert!(err.has_position());
    }

    let allowed = Options::default().with_allow_global_identifiers(true);
    assert!(parse("process.env", &allowed).is_ok());
}

#[test]
fn test_dangerous_keys_rejected_at_parse_time() {
    for source in [
        "a.__proto__",
        "a.Constructor",
        "a['prototype']",
        "{ __proto__: 1 }",
        "{ 'constructor': 1 }",
        "constructor",
    ] {
        let err = parse(source, &Options::default()).unwrap_err();
        assert_eq!(err.category, ErrorCategory::Security, "{source}");
    }

    let err = parse("user.__proto__", &Options::default()).unwrap_err();
    assert_eq!(err.column, Some(6));
    assert_eq!(err.message, "access to property '__proto__' is not allowed");

    let relaxed = Options::default().with_reject_dangerous_keys(false);
    assert!(parse("a.__proto__", &relaxed).is_ok());
}

#[test]
fn test_source_length_limit() {
    let options = Options::default().with_max_source_length(5);
    assert!(parse("1 + 2", &options).is_ok());

    let err = parse("1 + 23", &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);
    assert!(!err.has_position());

    // Rejected before tokenizing, so the bad character is never seen.
    let err = parse("######", &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);
}

#[test]
fn test_depth_limit_on_nesting() {
    let options = Options::default().with_max_ast_depth(3);
    assert!(parse("[[1]]", &options).is_ok());

    let err = parse("[[[1]]]", &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);
    assert!(err.message.contains("maximum depth of 3"));
    assert_eq!(err.column, Some(4));
}

#[test]
fn test_depth_limit_on_long_chains() -> anyhow::Result<()> {
    let options = Options::default().with_max_ast_depth(10);
    let source = vec!["1"; 20].join(" + ");
    let err = parse(&source, &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);
    // Stops at the operand after the tenth '+', not at the end of the chain.
    assert_eq!(err.index, Some(source.match_indices('+').nth(9).map_or(0, |(i, _)| i + 2)));

    let source = vec!["1"; 10].join(" + ");
    let expr = parse(&source, &options)?;
    assert_eq!(visit::max_depth(&expr), 10);

    let source = format!("a{}", ".b".repeat(9));
    assert_eq!(visit::max_depth(&parse(&source, &options)?), 10);
    let source = format!("a{}", ".b".repeat(10));
    assert!(parse(&source, &options).is_err());
    Ok(())
}

#[test]
fn test_deep_parens_fail_without_overflowing() {
    let options = Options::untrusted();
    let source = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    let err = parse(&source, &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);

    let source = format!("{}x", "-".repeat(5_000));
    let err = parse(&source, &options).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ResourceLimit);
}

#[test]
fn test_tree_queries() {
    let expr = parse_default("len(user.name) > min ? { name, size: items[i] } : fallback");
    assert_eq!(
        visit::identifiers(&expr),
        vec!["user", "min", "name", "items", "i", "fallback"]
    );
    assert_eq!(visit::called_functions(&expr), vec!["len"]);
}
