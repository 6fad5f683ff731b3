//! Scope tree nodes
//!
//! A [`Node`] is one entry of the scope tree: an empty scope marker, a
//! variable with its storage, or a function. Links are arena indices
//! ([`NodeId`]) into [`ScopeTree`](super::scope_tree::ScopeTree).

use super::value::{DataType, Value};
use crate::lexer::Position;

/// Index of a node in the scope tree arena
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct Node {
    /// The previous declaration in this scope, or the owner of the scope if
    /// this node starts it.
    pub parent: Option<NodeId>,
    /// The next declaration in the same scope.
    pub sibling: Option<NodeId>,
    /// The first node of a nested scope.
    pub child: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            sibling: None,
            child: None,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Scope marker, or a released arena slot
    Empty,
    Variable(Variable),
    Function(Function),
}

impl NodeData {
    /// Declared name, if the node declares anything.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeData::Empty => None,
            NodeData::Variable(var) => Some(&var.name),
            NodeData::Function(func) => Some(&func.name),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            NodeData::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            NodeData::Function(func) => Some(func),
            _ => None,
        }
    }
}

/// A variable and its storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub data_type: DataType,
    pub initialized: bool,
    /// Always of kind `data_type`
    pub value: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            initialized: false,
            value: data_type.zero(),
        }
    }
}

/// A `void` function: its parameters are the first `param_count` variables of
/// the scope under the function node, and its body starts at `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub param_count: usize,
    pub body: Position,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_count: 0,
            body: Position::default(),
        }
    }
}
