//! # Sentex Syntax
//!
//! Tokenizer, parser, syntax tree and diagnostics for the sentex expression
//! language.
//!
//! ## Overview
//!
//! - **Lexer**: lazily turns source text into tokens
//! - **Parser**: recursive descent with one token of lookahead, enforcing
//!   the sandbox rules and structural limits in [`Options`]
//! - **AST**: the fixed set of node shapes the evaluator consumes
//! - **Visit**: iterative traversal and tree queries
//! - **Diagnostics**: categorized errors with line, column and a snippet
//!
//! ## Architecture
//!
//! ```text
//! Source
//!     ↓
//! Tokenizer (next_token)
//!     ↓
//! Parser (parse)
//!     ↓
//! Expr (AST)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sentex_syntax::{parse, ExprKind, Options};
//!
//! let expr = parse("user.premium ? price * 0.9 : price", &Options::default())
//!     .expect("valid expression");
//! assert!(matches!(expr.kind, ExprKind::Conditional { .. }));
//! assert_eq!(expr.to_string(), "(user.premium ? (price * 0.9) : price)");
//! ```
//!
//! ## Grammar Overview
//!
//! Lowest to highest precedence:
//!
//! ```text
//! conditional     a ? b : c          right-associative
//! nullish         a ?? b
//! logical or      a || b
//! logical and     a && b
//! equality        == !=
//! relational      < <= > >=
//! additive        + -
//! multiplicative  * / %
//! unary           -a  !a
//! postfix         a.b  a[b]  f(x)
//! primary         literals, identifiers, (...), [...], {...}
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`Diagnostic`]:
//!
//! ```rust
//! use sentex_syntax::{parse, ErrorCategory, Options};
//!
//! let err = parse("a * * b", &Options::default()).unwrap_err();
//! assert_eq!(err.category, ErrorCategory::Syntax);
//! assert_eq!(err.column, Some(5));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod sandbox;
pub mod visit;

pub use ast::*;
pub use error::{Diagnostic, ErrorCategory, Span};
pub use lexer::{Token, TokenKind, Tokenizer, tokenize};
pub use options::{DEFAULT_DANGEROUS_KEYS, Options};
pub use parser::{Parser, parse};
pub use visit::{NodeRef, Walk, walk};
