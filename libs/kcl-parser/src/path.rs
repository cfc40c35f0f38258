//! # Path Resolver
//!
//! Bidirectional mapping between structural addresses into a [`Program`]
//! and source ranges.
//!
//! A [`NodePath`] is the walk from the root to a node: named field steps
//! (`body`, `init`, `arguments`, …) and index steps into ordered sequences.
//! Paths are opaque to callers; they serialize as a JSON array such as
//! `["body", 0, "init", "stages", 1, "arguments", 0]`.
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::{parse_source, path_of, range_of, Span};
//!
//! let source = "const x = line([1, 2], y)";
//! let program = parse_source(source).unwrap();
//!
//! // Offset 19 sits on the literal `2`.
//! let path = path_of(&program, 19).unwrap();
//! assert_eq!(path.to_string(), "body[0].init.arguments[0].elements[1]");
//! assert_eq!(range_of(&program, &path).unwrap(), Span::new(19, 20));
//! ```
//!
//! All operations are pure. A path that no longer fits the tree fails with
//! [`PathError::StaleStep`] instead of resolving to another node.

use crate::ast::{BodyItem, CallExpression, Expr, Identifier, MemberProperty, ObjectProperty, Program};
use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// PATH TYPES
// =============================================================================

/// Named child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Body,
    Name,
    Init,
    Expression,
    Argument,
    Left,
    Right,
    Callee,
    Arguments,
    Head,
    Stages,
    Elements,
    Properties,
    Key,
    Value,
    Object,
    Property,
    Params,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Name => "name",
            Self::Init => "init",
            Self::Expression => "expression",
            Self::Argument => "argument",
            Self::Left => "left",
            Self::Right => "right",
            Self::Callee => "callee",
            Self::Arguments => "arguments",
            Self::Head => "head",
            Self::Stages => "stages",
            Self::Elements => "elements",
            Self::Properties => "properties",
            Self::Key => "key",
            Self::Value => "value",
            Self::Object => "object",
            Self::Property => "property",
            Self::Params => "params",
        }
    }
}

/// One address step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    Field(Field),
    Index(usize),
}

/// Address of a node, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    /// The root program.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path extended by one field step.
    pub fn field(mut self, field: Field) -> Self {
        self.0.push(PathStep::Field(field));
        self
    }

    /// Path extended by one index step.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathStep::Index(index));
        self
    }
}

impl From<Vec<PathStep>> for NodePath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Field(field) if i == 0 => f.write_str(field.as_str())?,
                PathStep::Field(field) => write!(f, ".{}", field.as_str())?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Errors from path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The offset lies outside the program text.
    #[error("offset {offset} is outside the program (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// Step `depth` names a field or index the tree does not have.
    #[error("path step {depth} does not exist in the current tree")]
    StaleStep { depth: usize },

    /// The path ends on a sequence rather than a node.
    #[error("path ends on a sequence, not a node")]
    NotANode,

    /// No node spans exactly the requested range.
    #[error("no node spans {}..{}", span.start(), span.end())]
    NoMatchingNode { span: Span },
}

// =============================================================================
// NODE REFERENCES
// =============================================================================

/// Borrowed reference to any addressable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    BodyItem(&'a BodyItem),
    Expr(&'a Expr),
    Identifier(&'a Identifier),
    /// A pipe stage's call.
    Call(&'a CallExpression),
    Property(&'a ObjectProperty),
}

impl Spanned for NodeRef<'_> {
    fn span(&self) -> Span {
        match self {
            Self::Program(program) => program.span,
            Self::BodyItem(item) => item.span(),
            Self::Expr(expr) => expr.span(),
            Self::Identifier(ident) => ident.span,
            Self::Call(call) => call.span,
            Self::Property(property) => property.span,
        }
    }
}

/// What a field step lands on.
enum Slot<'a> {
    Node(NodeRef<'a>),
    Seq(Vec<NodeRef<'a>>),
}

fn body_items(items: &[BodyItem]) -> Slot<'_> {
    Slot::Seq(items.iter().map(NodeRef::BodyItem).collect())
}

fn exprs(items: &[Expr]) -> Slot<'_> {
    Slot::Seq(items.iter().map(NodeRef::Expr).collect())
}

fn call_fields(call: &CallExpression, field: Field) -> Option<Slot<'_>> {
    match field {
        Field::Callee => Some(Slot::Node(NodeRef::Identifier(&call.callee))),
        Field::Arguments => Some(exprs(&call.arguments)),
        _ => None,
    }
}

impl<'a> NodeRef<'a> {
    /// Child fields in source order.
    fn fields(&self) -> &'static [Field] {
        match self {
            Self::Program(_) => &[Field::Body],
            Self::BodyItem(BodyItem::VariableDeclaration(_)) => &[Field::Name, Field::Init],
            Self::BodyItem(BodyItem::ExpressionStatement(_)) => &[Field::Expression],
            Self::BodyItem(BodyItem::ReturnStatement(_)) => &[Field::Argument],
            Self::Expr(expr) => match expr {
                Expr::Literal(_) | Expr::Identifier(_) | Expr::PipeSubstitution(_) => &[],
                Expr::BinaryExpression(_) => &[Field::Left, Field::Right],
                Expr::UnaryExpression(_) => &[Field::Argument],
                Expr::CallExpression(_) => &[Field::Callee, Field::Arguments],
                Expr::PipeExpression(_) => &[Field::Head, Field::Stages],
                Expr::ArrayExpression(_) => &[Field::Elements],
                Expr::ObjectExpression(_) => &[Field::Properties],
                Expr::MemberExpression(_) => &[Field::Object, Field::Property],
                Expr::FunctionExpression(_) => &[Field::Params, Field::Body],
            },
            Self::Identifier(_) => &[],
            Self::Call(_) => &[Field::Callee, Field::Arguments],
            Self::Property(_) => &[Field::Key, Field::Value],
        }
    }

    /// Resolve one field step.
    fn field(&self, field: Field) -> Option<Slot<'a>> {
        match *self {
            Self::Program(program) => match field {
                Field::Body => Some(body_items(&program.body)),
                _ => None,
            },
            Self::BodyItem(item) => match (item, field) {
                (BodyItem::VariableDeclaration(decl), Field::Name) => {
                    Some(Slot::Node(NodeRef::Identifier(&decl.name)))
                }
                (BodyItem::VariableDeclaration(decl), Field::Init) => {
                    Some(Slot::Node(NodeRef::Expr(&decl.init)))
                }
                (BodyItem::ExpressionStatement(stmt), Field::Expression) => {
                    Some(Slot::Node(NodeRef::Expr(&stmt.expression)))
                }
                (BodyItem::ReturnStatement(stmt), Field::Argument) => {
                    Some(Slot::Node(NodeRef::Expr(&stmt.argument)))
                }
                _ => None,
            },
            Self::Expr(expr) => match (expr, field) {
                (Expr::BinaryExpression(b), Field::Left) => Some(Slot::Node(NodeRef::Expr(&b.left))),
                (Expr::BinaryExpression(b), Field::Right) => Some(Slot::Node(NodeRef::Expr(&b.right))),
                (Expr::UnaryExpression(u), Field::Argument) => {
                    Some(Slot::Node(NodeRef::Expr(&u.argument)))
                }
                (Expr::CallExpression(call), _) => call_fields(call, field),
                (Expr::PipeExpression(pipe), Field::Head) => Some(Slot::Node(NodeRef::Expr(&pipe.head))),
                (Expr::PipeExpression(pipe), Field::Stages) => Some(Slot::Seq(
                    pipe.stages.iter().map(|stage| NodeRef::Call(&stage.call)).collect(),
                )),
                (Expr::ArrayExpression(array), Field::Elements) => Some(exprs(&array.elements)),
                (Expr::ObjectExpression(object), Field::Properties) => Some(Slot::Seq(
                    object.properties.iter().map(NodeRef::Property).collect(),
                )),
                (Expr::MemberExpression(member), Field::Object) => {
                    Some(Slot::Node(NodeRef::Expr(&member.object)))
                }
                (Expr::MemberExpression(member), Field::Property) => {
                    Some(Slot::Node(match &member.property {
                        MemberProperty::Identifier(ident) => NodeRef::Identifier(ident),
                        MemberProperty::Computed(index) => NodeRef::Expr(index),
                    }))
                }
                (Expr::FunctionExpression(function), Field::Params) => Some(Slot::Seq(
                    function.params.iter().map(NodeRef::Identifier).collect(),
                )),
                (Expr::FunctionExpression(function), Field::Body) => {
                    Some(body_items(&function.body.body))
                }
                _ => None,
            },
            Self::Identifier(_) => None,
            Self::Call(call) => call_fields(call, field),
            Self::Property(property) => match field {
                Field::Key => Some(Slot::Node(NodeRef::Identifier(&property.key))),
                Field::Value => Some(Slot::Node(NodeRef::Expr(&property.value))),
                _ => None,
            },
        }
    }

    /// Direct children paired with the steps that reach them.
    fn children(&self) -> Vec<(Vec<PathStep>, NodeRef<'a>)> {
        let mut children = Vec::new();
        for &field in self.fields() {
            match self.field(field) {
                Some(Slot::Node(node)) => children.push((vec![PathStep::Field(field)], node)),
                Some(Slot::Seq(nodes)) => {
                    for (i, node) in nodes.into_iter().enumerate() {
                        children.push((vec![PathStep::Field(field), PathStep::Index(i)], node));
                    }
                }
                None => {}
            }
        }
        children
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Resolve `path` to the node it addresses.
pub fn node_at<'a>(program: &'a Program, path: &NodePath) -> Result<NodeRef<'a>, PathError> {
    let mut slot = Slot::Node(NodeRef::Program(program));
    for (depth, step) in path.steps().iter().enumerate() {
        slot = match (slot, step) {
            (Slot::Node(node), PathStep::Field(field)) => {
                node.field(*field).ok_or(PathError::StaleStep { depth })?
            }
            (Slot::Seq(mut nodes), PathStep::Index(index)) if *index < nodes.len() => {
                Slot::Node(nodes.swap_remove(*index))
            }
            _ => return Err(PathError::StaleStep { depth }),
        };
    }
    match slot {
        Slot::Node(node) => Ok(node),
        Slot::Seq(_) => Err(PathError::NotANode),
    }
}

/// Source range of the node at `path`.
pub fn range_of(program: &Program, path: &NodePath) -> Result<Span, PathError> {
    node_at(program, path).map(|node| node.span())
}

/// Path to the innermost node whose range contains `offset`.
///
/// ## Errors
///
/// [`PathError::OffsetOutOfRange`] when `offset` is not inside the program.
pub fn path_of(program: &Program, offset: usize) -> Result<NodePath, PathError> {
    if !program.span.contains(offset) {
        return Err(PathError::OffsetOutOfRange {
            offset,
            len: program.span.end(),
        });
    }

    let mut path = NodePath::root();
    let mut node = NodeRef::Program(program);
    'descend: loop {
        for (steps, child) in node.children() {
            if child.span().contains(offset) {
                path.0.extend(steps);
                node = child;
                continue 'descend;
            }
        }
        return Ok(path);
    }
}

/// Path to the deepest node whose range is exactly `span`.
///
/// Used to re-locate a node after the tree has been regenerated.
pub fn path_of_range(program: &Program, span: Span) -> Result<NodePath, PathError> {
    let mut path = NodePath::root();
    let mut node = NodeRef::Program(program);
    let mut found = (program.span == span).then(NodePath::root);
    'descend: loop {
        for (steps, child) in node.children() {
            if child.span().encloses(&span) {
                path.0.extend(steps);
                node = child;
                if node.span() == span {
                    found = Some(path.clone());
                }
                continue 'descend;
            }
        }
        return found.ok_or(PathError::NoMatchingNode { span });
    }
}

/// Every node of the program with its path, in pre-order.
pub fn descendants(program: &Program) -> Vec<(NodePath, NodeRef<'_>)> {
    let mut out = Vec::new();
    let mut stack = vec![(NodePath::root(), NodeRef::Program(program))];
    while let Some((path, node)) = stack.pop() {
        for (steps, child) in node.children().into_iter().rev() {
            let mut child_path = path.clone();
            child_path.0.extend(steps);
            stack.push((child_path, child));
        }
        out.push((path, node));
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
