use crate::error::{Diagnostic, Span};
use std::borrow::Cow;
use std::fmt;

const TWO_CHAR_OPERATORS: [&str; 7] = ["&&", "||", "??", "==", "!=", "<=", ">="];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    End,
    Identifier,
    Number,
    String,
    Operator,
    Punctuation,
}

/// A lexical token. `text` is the decoded value for strings and the raw
/// source slice for everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: Cow<'src, str>,
    pub start: usize,
    pub end: usize,
}

impl<'src> Token<'src> {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    pub fn display_name(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Number => format!("number {}", self.text),
            TokenKind::String => format!("string \"{}\"", self.text),
            TokenKind::Operator | TokenKind::Punctuation => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "<end>"),
            TokenKind::String => write!(f, "{:?}", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Lazy tokenizer. Each call to [`Tokenizer::next_token`] produces one token;
/// once the input is exhausted every further call returns the end token.
#[derive(Debug, Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Result<Token<'src>, Diagnostic> {
        self.skip_trivia()?;

        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(self.token(TokenKind::End, start, start));
        };

        match ch {
            '0'..='9' => self.scan_number(start),
            '.' if self.peek_byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) => {
                self.scan_number(start)
            }
            '"' | '\'' => self.scan_string(start, ch),
            c if is_ident_start(c) => Ok(self.scan_identifier(start)),
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | '.' | ':' => {
                self.pos += 1;
                Ok(self.token(TokenKind::Punctuation, start, self.pos))
            }
            _ => {
                let source = self.source;
                let rest = &source[start..];
                if let Some(op) = TWO_CHAR_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                    self.pos += op.len();
                    return Ok(self.token(TokenKind::Operator, start, self.pos));
                }

                match ch {
                    '+' | '-' | '*' | '/' | '%' | '!' | '<' | '>' => {
                        self.pos += 1;
                        Ok(self.token(TokenKind::Operator, start, self.pos))
                    }
                    '?' => {
                        self.pos += 1;
                        Ok(self.token(TokenKind::Punctuation, start, self.pos))
                    }
                    _ => Err(Diagnostic::syntax(format!(
                        "unexpected character '{ch}' at offset {start}"
                    ))
                    .at(self.source, start, 1)),
                }
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'src> {
        Token {
            kind,
            text: Cow::Borrowed(&self.source[start..end]),
            start,
            end,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(offset).copied()
    }

    fn skip_trivia(&mut self) -> Result<(), Diagnostic> {
        let source = self.source;
        loop {
            let rest = &source[self.pos..];
            if let Some(ch) = rest.chars().next()
                && ch.is_whitespace()
            {
                self.pos += ch.len_utf8();
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(close) => self.pos += close + 4,
                    None => {
                        return Err(Diagnostic::syntax("unterminated block comment")
                            .at(source, self.pos, 2));
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> Result<Token<'src>, Diagnostic> {
        let bytes = self.source.as_bytes();
        let digits = |mut i: usize| {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            i
        };

        let mut end = digits(start);
        if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            end = digits(end + 1);
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if !bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                return Err(Diagnostic::syntax(format!(
                    "malformed number '{}': exponent has no digits",
                    &self.source[start..exp]
                ))
                .at(self.source, start, exp - start));
            }
            end = digits(exp);
        }

        if let Some(c) = self.source[end..].chars().next()
            && is_ident_continue(c)
        {
            let bad_end = end + c.len_utf8();
            return Err(Diagnostic::syntax(format!(
                "invalid number '{}'",
                &self.source[start..bad_end]
            ))
            .at(self.source, start, bad_end - start));
        }

        self.pos = end;
        Ok(self.token(TokenKind::Number, start, end))
    }

    fn scan_string(&mut self, start: usize, quote: char) -> Result<Token<'src>, Diagnostic> {
        let source = self.source;
        let body_start = start + 1;
        let mut decoded: Option<String> = None;
        let mut chars = source[body_start..].char_indices();

        while let Some((offset, ch)) = chars.next() {
            let at = body_start + offset;
            if ch == quote {
                self.pos = at + 1;
                let text = match decoded {
                    Some(owned) => Cow::Owned(owned),
                    None => Cow::Borrowed(&source[body_start..at]),
                };
                return Ok(Token {
                    kind: TokenKind::String,
                    text,
                    start,
                    end: self.pos,
                });
            }

            if ch == '\\' {
                let buf = decoded.get_or_insert_with(|| source[body_start..at].to_string());
                match chars.next() {
                    Some((_, escaped)) => buf.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => other,
                    }),
                    None => break,
                }
            } else if let Some(buf) = decoded.as_mut() {
                buf.push(ch);
            }
        }

        Err(Diagnostic::syntax("unterminated string literal").at(source, start, 1))
    }

    fn scan_identifier(&mut self, start: usize) -> Token<'src> {
        let source = self.source;
        let rest = &source[start..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos = start + len;
        self.token(TokenKind::Identifier, start, self.pos)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenizes the whole input. The returned vector ends with the end token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, Diagnostic> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::with_capacity(source.len() / 4 + 1);

    loop {
        let token = tokenizer.next_token()?;
        let done = token.is_end();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
