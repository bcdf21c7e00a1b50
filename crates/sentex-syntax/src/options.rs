//! Resolved options shared by the parser and the evaluator.

use rustc_hash::FxHashSet;

/// Property names blocked by default: prototype-chain accessors.
pub const DEFAULT_DANGEROUS_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Limits and sandbox switches for compiling and evaluating expressions.
///
/// # Defaults
///
/// | Setting | Default |
/// |---------|---------|
/// | `max_source_length` | `None` (unlimited) |
/// | `max_ast_depth` | `None` (unlimited) |
/// | `max_eval_operations` | `None` (unlimited) |
/// | dangerous keys | `__proto__`, `constructor`, `prototype` |
/// | `reject_dangerous_keys` | `true` |
/// | `allow_global_identifiers` | `false` |
///
/// Hosts evaluating user-supplied text should start from
/// [`Options::untrusted`], which caps every limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Maximum source length in bytes, checked before tokenizing.
    pub max_source_length: Option<usize>,
    /// Maximum nesting depth of the syntax tree.
    pub max_ast_depth: Option<usize>,
    /// Maximum number of nodes visited by one evaluation.
    pub max_eval_operations: Option<u64>,
    /// Reject access to any of the dangerous keys.
    pub reject_dangerous_keys: bool,
    /// Let identifiers such as `process` or `window` resolve against the context.
    pub allow_global_identifiers: bool,
    dangerous_keys: FxHashSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_source_length: None,
            max_ast_depth: None,
            max_eval_operations: None,
            reject_dangerous_keys: true,
            allow_global_identifiers: false,
            dangerous_keys: DEFAULT_DANGEROUS_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus finite limits: 10 000 source bytes, depth 64 and
    /// 100 000 evaluation operations.
    pub fn untrusted() -> Self {
        Self::default()
            .with_max_source_length(10_000)
            .with_max_ast_depth(64)
            .with_max_eval_operations(100_000)
    }

    pub fn with_max_source_length(mut self, max: usize) -> Self {
        self.max_source_length = Some(max);
        self
    }

    pub fn with_max_ast_depth(mut self, max: usize) -> Self {
        self.max_ast_depth = Some(max);
        self
    }

    pub fn with_max_eval_operations(mut self, max: u64) -> Self {
        self.max_eval_operations = Some(max);
        self
    }

    /// Replaces the dangerous-key set. Keys are matched case-insensitively.
    pub fn with_dangerous_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dangerous_keys = keys
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn with_reject_dangerous_keys(mut self, reject: bool) -> Self {
        self.reject_dangerous_keys = reject;
        self
    }

    pub fn with_allow_global_identifiers(mut self, allow: bool) -> Self {
        self.allow_global_identifiers = allow;
        self
    }

    /// The configured dangerous keys, lower-cased, in no particular order.
    pub fn dangerous_keys(&self) -> impl Iterator<Item = &str> {
        self.dangerous_keys.iter().map(String::as_str)
    }

    /// Returns `true` when `key` must be rejected under these options.
    pub fn is_dangerous_key(&self, key: &str) -> bool {
        self.reject_dangerous_keys
            && !self.dangerous_keys.is_empty()
            && self.dangerous_keys.contains(&key.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_block_prototype_accessors() {
        let options = Options::default();
        assert!(options.is_dangerous_key("__proto__"));
        assert!(options.is_dangerous_key("Constructor"));
        assert!(options.is_dangerous_key("PROTOTYPE"));
        assert!(!options.is_dangerous_key("name"));
        assert_eq!(options.max_ast_depth, None);
    }

    #[test]
    fn rejection_can_be_disabled() {
        let options = Options::default().with_reject_dangerous_keys(false);
        assert!(!options.is_dangerous_key("__proto__"));
    }

    #[test]
    fn custom_keys_are_lowercased() {
        let options = Options::default().with_dangerous_keys(["Secret"]);
        assert!(options.is_dangerous_key("SECRET"));
        assert!(!options.is_dangerous_key("__proto__"));
        assert_eq!(options.dangerous_keys().collect::<Vec<_>>(), vec!["secret"]);
    }

    #[test]
    fn untrusted_preset_caps_everything() {
        let options = Options::untrusted();
        assert_eq!(options.max_source_length, Some(10_000));
        assert_eq!(options.max_ast_depth, Some(64));
        assert_eq!(options.max_eval_operations, Some(100_000));
        assert!(options.reject_dangerous_keys);
    }
}
