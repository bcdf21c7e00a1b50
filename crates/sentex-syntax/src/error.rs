//! Diagnostics shared by the tokenizer, the parser and the evaluator.
//!
//! Every failure in the pipeline is a [`Diagnostic`]: a category, a message
//! and, when the offending source offset is known, a 1-based line/column and
//! a two-line snippet ready for display.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Byte range into the expression source, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset + 1,
        }
    }

    pub fn merge(&self, other: &Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// The failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or unexpected input text.
    Syntax,
    /// Coercion failures, division by zero, bad member access, failing calls.
    Runtime,
    /// Forbidden globals, dangerous property names, disallowed constructs.
    Security,
    /// Source length, nesting depth or operation ceiling exceeded.
    ResourceLimit,
    /// The evaluator met a tree shape the parser never produces.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Runtime => "runtime",
            ErrorCategory::Security => "security",
            ErrorCategory::ResourceLimit => "resource-limit",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// A structured error raised while compiling or evaluating an expression.
///
/// Build one with a category constructor and attach a position with
/// [`Diagnostic::at`] or [`Diagnostic::at_span`]:
///
/// ```rust
/// use sentex_syntax::{Diagnostic, ErrorCategory, Span};
///
/// let source = "price * * qty";
/// let diag = Diagnostic::syntax("unexpected token '*'").at_span(source, Span::new(8, 9));
///
/// assert_eq!(diag.category, ErrorCategory::Syntax);
/// assert_eq!(diag.line, Some(1));
/// assert_eq!(diag.column, Some(9));
/// assert_eq!(diag.snippet, "price * * qty\n        ^ unexpected token '*'");
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub category: ErrorCategory,
    pub message: String,
    /// 0-based byte offset into the source.
    pub index: Option<usize>,
    /// 1-based line number.
    pub line: Option<usize>,
    /// 1-based column, counted in characters.
    pub column: Option<usize>,
    /// Offending source line followed by a caret line; empty without a position.
    pub snippet: String,
    pub note: Option<String>,
    cause: Option<Cause>,
}

impl Diagnostic {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            index: None,
            line: None,
            column: None,
            snippet: String::new(),
            note: None,
            cause: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Syntax, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Runtime, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Security, message)
    }

    pub fn resource_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ResourceLimit, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }

    /// Attaches a source position and derives line, column and snippet.
    ///
    /// `span_len` is the number of characters to underline; it is clamped to
    /// the end of the offending line and is at least one.
    pub fn at(mut self, source: &str, index: usize, span_len: usize) -> Self {
        let mut index = index.min(source.len());
        while !source.is_char_boundary(index) {
            index -= 1;
        }

        let bytes = source.as_bytes();
        let mut line = 1;
        let mut line_start = 0;
        for (i, b) in bytes[..index].iter().enumerate() {
            match b {
                b'\n' => {
                    line += 1;
                    line_start = i + 1;
                }
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                    line += 1;
                    line_start = i + 1;
                }
                _ => {}
            }
        }

        let line_end = source[line_start..]
            .find(['\n', '\r'])
            .map_or(source.len(), |i| line_start + i);
        let line_text = &source[line_start..line_end];
        let before = &source[line_start..index.max(line_start).min(line_end)];
        let column = before.chars().count() + 1;

        let indent: String = before
            .chars()
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let available = line_text.chars().count().saturating_sub(column - 1);
        let carets = "^".repeat(span_len.min(available).max(1));

        self.index = Some(index);
        self.line = Some(line);
        self.column = Some(column);
        self.snippet = format!("{line_text}\n{indent}{carets} {}", self.message);
        self
    }

    /// Like [`Diagnostic::at`], underlining the characters covered by `span`.
    pub fn at_span(self, source: &str, span: Span) -> Self {
        let start = span.start.min(source.len());
        let end = span.end.clamp(start, source.len());
        let len = source
            .get(start..end)
            .map_or(span.len(), |text| text.chars().count());
        self.at(source, start, len)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Records the error that caused this diagnostic; exposed through
    /// [`Error::source`].
    pub fn with_cause(mut self, cause: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        self.cause = Some(Arc::from(cause.into()));
        self
    }

    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn has_position(&self) -> bool {
        self.index.is_some()
    }

    /// Multi-line plain-text report: header, location, snippet and note.
    pub fn format_error(&self) -> String {
        let mut output = format!("error[{}]: {}\n", self.category, self.message);

        if let (Some(line), Some(column)) = (self.line, self.column) {
            let width = line.to_string().len();
            output.push_str(&format!("{:width$}--> line {line}:{column}\n", ""));
            output.push_str(&format!("{:width$} |\n", ""));

            let mut parts = self.snippet.splitn(2, '\n');
            if let Some(text) = parts.next() {
                output.push_str(&format!("{line:>width$} | {text}\n"));
            }
            if let Some(carets) = parts.next() {
                output.push_str(&format!("{:width$} | {carets}\n", ""));
            }
        }

        if let Some(note) = &self.note {
            output.push_str(&format!("  = note: {note}\n"));
        }
        if let Some(cause) = &self.cause {
            output.push_str(&format!("  = caused by: {cause}\n"));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.category, self.message)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " (line {line}, column {column})")?;
        }
        Ok(())
    }
}

impl Error for Diagnostic {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}
