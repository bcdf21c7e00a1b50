use anyhow::Result;
use sentex_syntax::lexer::{TokenKind, Tokenizer, tokenize};
use sentex_syntax::{ErrorCategory, Options, parse};

#[test]
fn test_tokenizer_is_lazy() -> Result<()> {
    // The bad character is only reached on the third call.
    let mut tokenizer = Tokenizer::new("a + #");
    assert_eq!(tokenizer.next_token()?.text, "a");
    assert_eq!(tokenizer.next_token()?.text, "+");
    let err = tokenizer.next_token().unwrap_err();
    assert_eq!(err.category, ErrorCategory::Syntax);
    assert_eq!(err.index, Some(4));
    Ok(())
}

#[test]
fn test_end_token_repeats() -> Result<()> {
    let mut tokenizer = Tokenizer::new("  ");
    for _ in 0..3 {
        let token = tokenizer.next_token()?;
        assert!(token.is_end());
        assert_eq!(token.start, 2);
    }
    Ok(())
}

#[test]
fn test_expression_tokens() -> Result<()> {
    let tokens = tokenize("user.premium ? price * 0.9 : items[0] ?? 'none'")?;
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Punctuation,
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Number,
            TokenKind::Punctuation,
            TokenKind::Operator,
            TokenKind::String,
            TokenKind::End,
        ]
    );
    assert_eq!(tokens[13].text, "none");
    Ok(())
}

#[test]
fn test_greedy_two_char_operators() -> Result<()> {
    let tokens = tokenize("a<=b>=c!=d==e")?;
    let ops: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.text.as_ref())
        .collect();
    assert_eq!(ops, vec!["<=", ">=", "!=", "=="]);
    Ok(())
}

#[test]
fn test_token_spans_cover_source_text() -> Result<()> {
    let source = "len(name) >= 3";
    for token in tokenize(source)? {
        if !token.is_end() && token.kind != TokenKind::String {
            assert_eq!(&source[token.start..token.end], token.text);
        }
    }
    Ok(())
}

#[test]
fn test_multiline_error_position() {
    let err = tokenize("a +\n  b @ c").unwrap_err();
    assert_eq!(err.line, Some(2));
    assert_eq!(err.column, Some(5));
    assert!(err.message.contains("'@'"));
    assert_eq!(err.snippet, "  b @ c\n    ^ unexpected character '@' at offset 8");
}

#[test]
fn test_bare_dot_is_punctuation_not_number() -> Result<()> {
    let tokens = tokenize("a.b")?;
    assert_eq!(tokens[1].kind, TokenKind::Punctuation);

    let tokens = tokenize(".25")?;
    assert_eq!(tokens[0].kind, TokenKind::Number);
    Ok(())
}

#[test]
fn test_fraction_needs_a_digit_after_the_dot() -> Result<()> {
    // `1.` is the number 1 followed by a member-access dot.
    let tokens = tokenize("1.")?;
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Punctuation, TokenKind::End]);
    assert_eq!(tokens[0].text, "1");

    let err = parse("1.", &Options::default()).unwrap_err();
    assert_eq!(err.category, ErrorCategory::Syntax);
    assert_eq!(err.column, Some(3));

    // `1.e5` reads property `e5` of the number 1.
    let tokens = tokenize("1.e5")?;
    assert_eq!(tokens[0].text, "1");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].text, "e5");
    assert_eq!(parse("1.e5", &Options::default())?.to_string(), "1.e5");

    assert_eq!(tokenize("1.5e2")?[0].text, "1.5e2");
    Ok(())
}
