//! Read-only traversal over a parsed tree.
//!
//! [`walk`] is iterative, so arbitrarily deep trees can be inspected without
//! growing the call stack.

use crate::ast::{Expr, ExprKind, Property};
use crate::error::Span;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// A borrowed tree node: an expression or an object-literal property.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Expr(&'a Expr),
    Property(&'a Property),
}

impl<'a> NodeRef<'a> {
    pub fn span(&self) -> Span {
        match self {
            NodeRef::Expr(expr) => expr.span,
            NodeRef::Property(prop) => prop.span,
        }
    }

    pub fn as_expr(&self) -> Option<&'a Expr> {
        match self {
            NodeRef::Expr(expr) => Some(expr),
            NodeRef::Property(_) => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> SmallVec<[NodeRef<'a>; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeRef::Property(prop) => {
                out.push(NodeRef::Expr(&prop.key));
                if !prop.shorthand {
                    out.push(NodeRef::Expr(&prop.value));
                }
            }
            NodeRef::Expr(expr) => match &expr.kind {
                ExprKind::Literal { .. } | ExprKind::Identifier(_) => {}
                ExprKind::Unary { operand, .. } => out.push(NodeRef::Expr(operand)),
                ExprKind::Binary { left, right, .. }
                | ExprKind::Logical { left, right, .. }
                | ExprKind::NullishCoalesce { left, right } => {
                    out.push(NodeRef::Expr(left));
                    out.push(NodeRef::Expr(right));
                }
                ExprKind::Conditional {
                    test,
                    consequent,
                    alternate,
                } => {
                    out.push(NodeRef::Expr(test));
                    out.push(NodeRef::Expr(consequent));
                    out.push(NodeRef::Expr(alternate));
                }
                ExprKind::Member {
                    object, property, ..
                } => {
                    out.push(NodeRef::Expr(object));
                    out.push(NodeRef::Expr(property));
                }
                ExprKind::Call { callee, arguments } => {
                    out.push(NodeRef::Expr(callee));
                    out.extend(arguments.iter().map(NodeRef::Expr));
                }
                ExprKind::Array(elements) => out.extend(elements.iter().map(NodeRef::Expr)),
                ExprKind::Object(properties) => {
                    out.extend(properties.iter().map(NodeRef::Property))
                }
            },
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
    Stop,
}

/// Pre-order traversal. The callback receives each node with its depth,
/// the root being at depth 1. A property shares the depth of its object.
pub fn walk<'a, F>(root: &'a Expr, mut visit: F)
where
    F: FnMut(NodeRef<'a>, usize) -> Walk,
{
    let mut stack: SmallVec<[(NodeRef<'a>, usize); 32]> = SmallVec::new();
    stack.push((NodeRef::Expr(root), 1));

    while let Some((node, depth)) = stack.pop() {
        match visit(node, depth) {
            Walk::Stop => return,
            Walk::SkipChildren => continue,
            Walk::Continue => {}
        }
        let children = node.children();
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, child_depth(child, depth))),
        );
    }
}

/// Height of the tree counting expression nodes only; a lone literal has
/// depth 1. Object properties do not add a level.
pub fn max_depth(root: &Expr) -> usize {
    deepest(root).0
}

/// Like [`max_depth`], also returning the span of a deepest node.
pub fn deepest(root: &Expr) -> (usize, Span) {
    let mut stack: SmallVec<[(NodeRef<'_>, usize); 32]> = SmallVec::new();
    stack.push((NodeRef::Expr(root), 1));
    let mut best = (1, root.span);

    while let Some((node, depth)) = stack.pop() {
        if depth > best.0 {
            best = (depth, node.span());
        }
        for child in node.children() {
            stack.push((child, child_depth(child, depth)));
        }
    }
    best
}

fn child_depth(child: NodeRef<'_>, parent_depth: usize) -> usize {
    match child {
        NodeRef::Property(_) => parent_depth,
        NodeRef::Expr(_) => parent_depth + 1,
    }
}

pub fn node_count(root: &Expr) -> usize {
    let mut count = 0;
    walk(root, |_, _| {
        count += 1;
        Walk::Continue
    });
    count
}

/// Names read from the evaluation context, in first-appearance order.
///
/// Property names after `.` and non-shorthand object keys are not context
/// reads and are skipped; so are callee names.
pub fn identifiers(root: &Expr) -> Vec<String> {
    let mut skip: FxHashSet<*const Expr> = FxHashSet::default();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out = Vec::new();

    walk(root, |node, _| {
        match node {
            NodeRef::Property(prop) => {
                if !prop.shorthand {
                    skip.insert(&prop.key as *const Expr);
                }
            }
            NodeRef::Expr(expr) => {
                if skip.contains(&(expr as *const Expr)) {
                    return Walk::Continue;
                }
                match &expr.kind {
                    ExprKind::Member {
                        property,
                        computed: false,
                        ..
                    } => {
                        skip.insert(property.as_ref() as *const Expr);
                    }
                    ExprKind::Call { callee, .. } => {
                        skip.insert(callee.as_ref() as *const Expr);
                    }
                    ExprKind::Identifier(name) => {
                        if seen.insert(name) {
                            out.push(name.clone());
                        }
                    }
                    _ => {}
                }
            }
        }
        Walk::Continue
    });
    out
}

/// Names of directly called functions, in first-appearance order.
pub fn called_functions(root: &Expr) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out = Vec::new();
    walk(root, |node, _| {
        if let Some(ExprKind::Call { callee, .. }) = node.as_expr().map(|e| &e.kind)
            && let Some(name) = callee.as_identifier()
            && seen.insert(name)
        {
            out.push(name.to_string());
        }
        Walk::Continue
    });
    out
}
