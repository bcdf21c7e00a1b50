use crate::error::Span;
use std::fmt;

/// A node of the expression tree. Trees are immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `raw` is the literal's source text.
    Literal { value: LiteralValue, raw: String },
    Identifier(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    NullishCoalesce {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `object.name` has `computed == false` and an [`ExprKind::Identifier`]
    /// property; `object[expr]` has `computed == true`.
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
}

/// One `key: value` entry of an object literal.
///
/// The key is an identifier, string or number literal. Shorthand `{ a }`
/// is stored as key `a` with value `Identifier("a")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
    pub shorthand: bool,
    pub span: Span,
}

impl Property {
    /// The key as an object field name. Number keys use their canonical
    /// numeric rendering, so `{1.50: x}` has the key `"1.5"`.
    pub fn key_name(&self) -> Option<String> {
        match &self.key.kind {
            ExprKind::Identifier(name) => Some(name.clone()),
            ExprKind::Literal {
                value: LiteralValue::String(s),
                ..
            } => Some(s.clone()),
            ExprKind::Literal {
                value: LiteralValue::Number(n),
                ..
            } => Some(format_number(*n)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(UnaryOp::Neg),
            "!" => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            _ => return None,
        })
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(LogicalOp::And),
            "||" => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Short node-type name used in diagnostics and tree dumps.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal { .. } => "Literal",
            ExprKind::Identifier(_) => "Identifier",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Logical { .. } => "Logical",
            ExprKind::NullishCoalesce { .. } => "NullishCoalesce",
            ExprKind::Conditional { .. } => "Conditional",
            ExprKind::Member { .. } => "Member",
            ExprKind::Call { .. } => "Call",
            ExprKind::Array(_) => "Array",
            ExprKind::Object(_) => "Object",
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// Frees the tree with an explicit stack. Left-deep chains built without a
/// depth limit would otherwise recurse once per level.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach_children(&mut expr.kind, &mut pending);
        }
    }
}

fn detach_children(kind: &mut ExprKind, out: &mut Vec<Expr>) {
    fn take(slot: &mut Expr) -> Expr {
        std::mem::replace(slot, Expr::new(ExprKind::Array(Vec::new()), Span::default()))
    }

    match kind {
        ExprKind::Literal { .. } | ExprKind::Identifier(_) => {}
        ExprKind::Unary { operand, .. } => out.push(take(operand)),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Logical { left, right, .. }
        | ExprKind::NullishCoalesce { left, right } => {
            out.push(take(left));
            out.push(take(right));
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            out.push(take(test));
            out.push(take(consequent));
            out.push(take(alternate));
        }
        ExprKind::Member {
            object, property, ..
        } => {
            out.push(take(object));
            out.push(take(property));
        }
        ExprKind::Call { callee, arguments } => {
            out.push(take(callee));
            out.append(arguments);
        }
        ExprKind::Array(elements) => out.append(elements),
        ExprKind::Object(properties) => {
            for prop in properties.drain(..) {
                out.push(prop.key);
                out.push(prop.value);
            }
        }
    }
}

/// Renders a number the way the expression language prints it: integral
/// values without a fraction, `NaN`, `Infinity` and `-Infinity` by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => f.write_str(&format_number(*n)),
            LiteralValue::String(s) => write!(f, "{s:?}"),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

/// Prints the tree back as fully parenthesized source. Used by the CLI
/// `ast` command and handy in test failure output.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal { value, .. } => write!(f, "{value}"),
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Unary { op, operand } => write!(f, "({}{operand})", op.as_str()),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_str())
            }
            ExprKind::Logical { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_str())
            }
            ExprKind::NullishCoalesce { left, right } => write!(f, "({left} ?? {right})"),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "({test} ? {consequent} : {alternate})"),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                if *computed {
                    write!(f, "{object}[{property}]")
                } else {
                    write!(f, "{object}.{property}")
                }
            }
            ExprKind::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            ExprKind::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            ExprKind::Object(properties) => {
                f.write_str("{")?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if prop.shorthand {
                        write!(f, "{}", prop.key)?;
                    } else {
                        write!(f, "{}: {}", prop.key, prop.value)?;
                    }
                }
                f.write_str("}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
