use proptest::prelude::*;
use sentex_syntax::{ErrorCategory, Options, parse, tokenize, visit};

const ALPHABET: &str = "ab1.()[]{},:?!-+*/%<>=&|'\" \n_$";

fn expression_like() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET.chars().collect::<Vec<_>>()), 0..64)
        .prop_map(|chars| chars.into_iter().collect::<String>())
}

proptest! {
    #[test]
    fn tokenizer_never_panics(source in "\\PC{0,128}") {
        let _ = tokenize(&source);
    }

    #[test]
    fn parser_never_panics(source in expression_like()) {
        let _ = parse(&source, &Options::default());
    }

    #[test]
    fn errors_point_inside_the_source(source in expression_like()) {
        if let Err(diag) = parse(&source, &Options::default()) {
            if let Some(index) = diag.index {
                prop_assert!(index <= source.len());
                prop_assert!(diag.line.is_some_and(|line| line >= 1));
                prop_assert!(diag.column.is_some_and(|column| column >= 1));
                prop_assert!(!diag.snippet.is_empty());
            }
        }
    }

    #[test]
    fn depth_limit_is_always_respected(source in expression_like(), max in 1usize..6) {
        let options = Options::default().with_max_ast_depth(max);
        match parse(&source, &options) {
            Ok(expr) => prop_assert!(visit::max_depth(&expr) <= max),
            Err(diag) => prop_assert!(matches!(
                diag.category,
                ErrorCategory::Syntax | ErrorCategory::Security | ErrorCategory::ResourceLimit
            )),
        }
    }
}
