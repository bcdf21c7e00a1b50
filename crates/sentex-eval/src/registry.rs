use crate::value::Value;
use rustc_hash::FxHashMap;
use sentex_syntax::Diagnostic;
use std::fmt;
use std::sync::Arc;

/// A host-provided callable. Arguments arrive evaluated, left to right.
///
/// Returning an error built from a [`Diagnostic`] propagates that diagnostic
/// unchanged; any other error is reported as a runtime failure of the call
/// with the original error as its cause.
pub type HostFunction = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Immutable name-to-function table.
///
/// [`FunctionRegistry::register`] returns a new registry and leaves `self`
/// untouched, so a snapshot held by a compiled expression never changes.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: Arc<FxHashMap<String, HostFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this registry with `name` bound to `function`,
    /// replacing any earlier binding of the same name.
    pub fn register<F>(&self, name: impl Into<String>, function: F) -> Result<Self, Diagnostic>
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Diagnostic::runtime("function name must not be empty"));
        }

        let mut functions = (*self.functions).clone();
        functions.insert(name, Arc::new(function));
        Ok(Self {
            functions: Arc::new(functions),
        })
    }

    pub fn get(&self, name: &str) -> Option<&HostFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
