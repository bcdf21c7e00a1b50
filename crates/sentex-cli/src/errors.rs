use colored::*;
use sentex::{Diagnostic, ErrorCategory};
use std::fmt;

/// A diagnostic prepared for the terminal, with optional hints.
pub struct EnhancedError {
    pub message: String,
    pub category: Option<ErrorCategory>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub snippet: Option<String>,
    pub note: Option<String>,
    pub cause: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: None,
            line: None,
            column: None,
            snippet: None,
            note: None,
            cause: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Display the error with colored output and context
    pub fn display(&self) {
        let header = match self.category {
            Some(category) => format!("{category} error:"),
            None => "error:".to_string(),
        };
        eprintln!("{} {}", header.red().bold(), self.message.bold());

        if let (Some(line), Some(column)) = (self.line, self.column) {
            eprintln!("  {} <expression>:{}:{}", "-->".blue().bold(), line, column);
        }

        if let (Some(snippet), Some(line)) = (&self.snippet, self.line) {
            eprintln!();
            self.display_snippet(snippet, line);
        }

        if let Some(note) = &self.note {
            eprintln!("{} {}", "note:".cyan().bold(), note);
        }
        if let Some(cause) = &self.cause {
            eprintln!("{} {}", "caused by:".yellow().bold(), cause);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!();
            eprintln!("{} {}", "suggestion:".green().bold(), suggestion);
        }
        if let Some(help) = &self.help {
            eprintln!();
            eprintln!("{} {}", "help:".cyan().bold(), help);
        }
    }

    fn display_snippet(&self, snippet: &str, line: usize) {
        let width = line.to_string().len();
        let mut parts = snippet.splitn(2, '\n');
        if let Some(text) = parts.next() {
            eprintln!(
                "{:>width$} {} {}",
                line.to_string().blue().bold(),
                "|".blue().bold(),
                text
            );
        }
        if let Some(carets) = parts.next() {
            eprintln!("{:>width$} {} {}", "", "|".blue().bold(), carets.red().bold());
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

impl From<&Diagnostic> for EnhancedError {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            message: diag.message.clone(),
            category: Some(diag.category),
            line: diag.line,
            column: diag.column,
            snippet: (!diag.snippet.is_empty()).then(|| diag.snippet.clone()),
            note: diag.note.clone(),
            cause: diag.cause().map(|cause| cause.to_string()),
            suggestion: None,
            help: None,
        }
    }
}

/// Convert a diagnostic to an EnhancedError with suggestions
pub fn enhance_diagnostic(diag: &Diagnostic) -> EnhancedError {
    let enhanced = EnhancedError::from(diag);
    let message = diag.message.as_str();

    match diag.category {
        ErrorCategory::Security if message.contains("global") => enhanced
            .with_suggestion("Pass the value in the context under another name")
            .with_help("Use --config with allow_global_identifiers = true to lift this rule"),
        ErrorCategory::Security if message.contains("registered functions") => enhanced
            .with_suggestion("Call functions by their registered name, e.g. len(x)")
            .with_help("Run 'sentex functions' to list the available functions"),
        ErrorCategory::Security => enhanced
            .with_help("Property names such as __proto__ and constructor are blocked"),
        ErrorCategory::Runtime if message.starts_with("unknown function") => {
            enhanced.with_help("Run 'sentex functions' to list the available functions")
        }
        ErrorCategory::Runtime if message.contains("to a number") => enhanced
            .with_suggestion("'+' only adds numbers; use concat(a, b) to join strings"),
        ErrorCategory::Runtime if message.starts_with("cannot read property") => enhanced
            .with_suggestion("Guard the access with ?? or a conditional, e.g. (user ?? {}).name"),
        ErrorCategory::ResourceLimit => enhanced
            .with_help("Limits come from --untrusted, .sentex.toml and SENTEX_MAX_* variables"),
        _ => enhanced,
    }
}

/// Convert anyhow::Error to EnhancedError, unwrapping diagnostics.
pub fn enhance_error(err: &anyhow::Error) -> EnhancedError {
    match err.downcast_ref::<Diagnostic>() {
        Some(diag) => enhance_diagnostic(diag),
        None => EnhancedError::new(format!("{err:#}")),
    }
}
