//! Scope tree: symbol table and variable storage in one structure
//!
//! Declarations in a scope form a chain of [`Node`]s linked through
//! `sibling`; the first node of a nested scope hangs off its owner's `child`
//! link and is always an empty marker. Every node's `parent` is the node
//! before it in the chain (or the owner, for a marker), so walking `parent`
//! links from the current node visits exactly the declarations visible at
//! that point, innermost first.
//!
//! ```text
//! root ── int g ── void f ── void main
//!                   │          │
//!                 marker     marker ── {block} ── ...
//!                   │                     │
//!                 int p                marker ── int x
//! ```
//!
//! # Implementation
//!
//! Nodes live in an index arena with a free list. Leaving a block releases
//! its whole nested scope, and each function call works on a copy of the
//! callee's parameter scope that is removed again when the call returns.
//!
//! While interpretation is disabled every value-producing operation still
//! performs its type checks but returns the zero value of the result type
//! and leaves storage untouched. Initialization tracking is static, so it is
//! updated in both modes.

use super::node::{Function, Node, NodeData, NodeId, Variable};
use super::value::{check_cast, BinaryOp, DataType, UnaryOp, Value};
use crate::interpreter::errors::ErrorKind;
use crate::lexer::Position;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct ScopeTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    current: NodeId,
    interpreting: bool,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a tree holding only the global scope's root marker.
    pub fn new() -> Self {
        ScopeTree {
            nodes: vec![Node::new(NodeData::Empty)],
            free: Vec::new(),
            root: 0,
            current: 0,
            interpreting: true,
        }
    }

    /// The most recently added declaration, or the marker of a scope that
    /// has none yet.
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn set_current(&mut self, node: NodeId) {
        self.current = node;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_interpreting(&self) -> bool {
        self.interpreting
    }

    pub fn set_interpreting(&mut self, interpreting: bool) {
        self.interpreting = interpreting;
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    fn alloc(&mut self, data: NodeData) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Node::new(data);
                id
            }
            None => {
                self.nodes.push(Node::new(data));
                self.nodes.len() - 1
            }
        }
    }

    /// Inserts a node right after the current one and makes it current.
    fn append(&mut self, data: NodeData) -> NodeId {
        let id = self.alloc(data);
        let prev = self.current;
        let next = self.nodes[prev].sibling.replace(id);

        self.nodes[id].parent = Some(prev);
        self.nodes[id].sibling = next;
        if let Some(next) = next {
            self.nodes[next].parent = Some(id);
        }

        self.current = id;
        id
    }

    /// Starts a nested scope under the current node: adds an empty marker
    /// as its child and makes the marker current.
    pub fn open_scope(&mut self) -> NodeId {
        let owner = self.current;
        self.delete_subtree(owner);

        let marker = self.alloc(NodeData::Empty);
        self.nodes[marker].parent = Some(owner);
        self.nodes[owner].child = Some(marker);
        self.current = marker;
        marker
    }

    /// Adds an anonymous block after the current node and opens its scope.
    /// Returns the block node to hand back to [`leave_block`](Self::leave_block).
    pub fn enter_block(&mut self) -> NodeId {
        let block = self.append(NodeData::Empty);
        self.open_scope();
        trace!(block, "enter scope");
        block
    }

    /// Releases a block opened by [`enter_block`](Self::enter_block) along
    /// with everything declared in it. The node before the block becomes
    /// current.
    pub fn leave_block(&mut self, block: NodeId) {
        trace!(block, "leave scope");
        self.current = self.remove(block);
    }

    /// Releases `node`'s nested scope.
    pub fn delete_subtree(&mut self, node: NodeId) {
        if let Some(child) = self.nodes[node].child.take() {
            self.release(child);
        }
    }

    /// Unlinks `node` from its chain, releases it with its nested scope, and
    /// returns the node that preceded it.
    fn remove(&mut self, node: NodeId) -> NodeId {
        let prev = self.nodes[node].parent.unwrap_or(self.root);
        let next = self.nodes[node].sibling.take();

        if self.nodes[prev].child == Some(node) {
            self.nodes[prev].child = next;
        } else {
            self.nodes[prev].sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next].parent = Some(prev);
        }

        self.release(node);
        prev
    }

    /// Returns `start`, the rest of its chain and everything nested below
    /// them to the free list.
    fn release(&mut self, start: NodeId) {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let node = std::mem::replace(&mut self.nodes[id], Node::new(NodeData::Empty));
            pending.extend(node.child);
            pending.extend(node.sibling);
            self.free.push(id);
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    pub fn declare_variable(
        &mut self,
        name: &str,
        data_type: DataType,
    ) -> Result<NodeId, ErrorKind> {
        self.ensure_unique(name)?;
        Ok(self.append(NodeData::Variable(Variable::new(name, data_type))))
    }

    /// Declares a function and opens its parameter scope.
    pub fn declare_function(&mut self, name: &str) -> Result<NodeId, ErrorKind> {
        self.ensure_unique(name)?;
        let func = self.append(NodeData::Function(Function::new(name)));
        self.open_scope();
        Ok(func)
    }

    /// Declares the next parameter of `func`. Parameters count as
    /// initialized since every call binds them.
    pub fn declare_param(
        &mut self,
        func: NodeId,
        name: &str,
        data_type: DataType,
    ) -> Result<NodeId, ErrorKind> {
        let param = self.declare_variable(name, data_type)?;
        if let NodeData::Variable(var) = &mut self.nodes[param].data {
            var.initialized = true;
        }
        if let NodeData::Function(f) = &mut self.nodes[func].data {
            f.param_count += 1;
        }
        Ok(param)
    }

    pub fn set_function_body(&mut self, func: NodeId, body: Position) {
        if let NodeData::Function(f) = &mut self.nodes[func].data {
            f.body = body;
        }
    }

    fn ensure_unique(&self, name: &str) -> Result<(), ErrorKind> {
        if self.is_unique_in_scope(name) {
            Ok(())
        } else {
            Err(ErrorKind::RedefinedIdentifier(name.to_string()))
        }
    }

    /// True if no declaration in the current scope up to the current node
    /// is called `name`. Enclosing scopes are not searched, which is what
    /// allows shadowing.
    pub fn is_unique_in_scope(&self, name: &str) -> bool {
        let mut id = self.current;
        loop {
            if self.nodes[id].data.name() == Some(name) {
                return false;
            }
            match self.nodes[id].parent {
                // stop at the marker that starts this scope
                Some(parent) if self.nodes[parent].child != Some(id) => id = parent,
                _ => return true,
            }
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Innermost visible declaration called `name`.
    pub fn resolve(&self, name: &str) -> Result<NodeId, ErrorKind> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            if self.nodes[id].data.name() == Some(name) {
                return Ok(id);
            }
            cursor = self.nodes[id].parent;
        }
        Err(ErrorKind::UndefinedIdentifier(name.to_string()))
    }

    pub fn resolve_variable(&self, name: &str) -> Result<NodeId, ErrorKind> {
        let id = self.resolve(name)?;
        self.variable(id)?;
        Ok(id)
    }

    pub fn resolve_function(&self, name: &str) -> Result<NodeId, ErrorKind> {
        let id = self.resolve(name)?;
        self.function(id)?;
        Ok(id)
    }

    /// Kind-checked access to a variable node.
    pub fn variable(&self, id: NodeId) -> Result<&Variable, ErrorKind> {
        match &self.nodes[id].data {
            NodeData::Variable(var) => Ok(var),
            NodeData::Function(func) => {
                Err(ErrorKind::UsingFunctionAsVariable(func.name.clone()))
            }
            NodeData::Empty => Err(ErrorKind::UndefinedIdentifier(String::new())),
        }
    }

    /// Kind-checked access to a function node.
    pub fn function(&self, id: NodeId) -> Result<&Function, ErrorKind> {
        match &self.nodes[id].data {
            NodeData::Function(func) => Ok(func),
            NodeData::Variable(var) => {
                Err(ErrorKind::UsingVariableAsFunction(var.name.clone()))
            }
            NodeData::Empty => Err(ErrorKind::UndefinedIdentifier(String::new())),
        }
    }

    fn variable_mut(&mut self, id: NodeId) -> Result<&mut Variable, ErrorKind> {
        match &mut self.nodes[id].data {
            NodeData::Variable(var) => Ok(var),
            NodeData::Function(func) => {
                Err(ErrorKind::UsingFunctionAsVariable(func.name.clone()))
            }
            NodeData::Empty => Err(ErrorKind::UndefinedIdentifier(String::new())),
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub fn read(&self, id: NodeId) -> Result<Value, ErrorKind> {
        let var = self.variable(id)?;
        if !var.initialized {
            return Err(ErrorKind::UninitializedVariable(var.name.clone()));
        }
        Ok(if self.interpreting {
            var.value
        } else {
            var.data_type.zero()
        })
    }

    /// Stores `value` converted to the variable's type and returns what was
    /// stored.
    pub fn assign(&mut self, id: NodeId, value: Value) -> Result<Value, ErrorKind> {
        let data_type = self.variable(id)?.data_type;
        let converted = self.cast(value, data_type)?;
        let interpreting = self.interpreting;

        let var = self.variable_mut(id)?;
        var.initialized = true;
        if interpreting {
            var.value = converted;
        }
        Ok(converted)
    }

    /// Applies `++`/`--` to a variable, returning its value before and after.
    pub fn step_variable(
        &mut self,
        id: NodeId,
        op: UnaryOp,
    ) -> Result<(Value, Value), ErrorKind> {
        let before = self.read(id)?;
        if !self.interpreting {
            return Ok((before, before));
        }
        let after = before.unary_op(op)?;
        self.variable_mut(id)?.value = after;
        Ok((before, after))
    }

    pub fn cast(&self, value: Value, to: DataType) -> Result<Value, ErrorKind> {
        if self.interpreting {
            value.cast(to)
        } else {
            check_cast(value.data_type(), to)?;
            Ok(to.zero())
        }
    }

    pub fn binary_op(
        &self,
        left: Value,
        right: Value,
        op: BinaryOp,
    ) -> Result<Value, ErrorKind> {
        if self.interpreting {
            left.binary_op(right, op)
        } else {
            let result = op.result_type(left.data_type(), right.data_type())?;
            Ok(result.zero())
        }
    }

    pub fn unary_op(&self, op: UnaryOp, value: Value) -> Result<Value, ErrorKind> {
        let result = value.unary_op(op)?;
        Ok(if self.interpreting {
            result
        } else {
            result.data_type().zero()
        })
    }

    // ------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------

    /// Parameter nodes of `func`, in declaration order.
    fn params(&self, func: NodeId) -> Vec<NodeId> {
        let count = self.nodes[func].data.as_function().map_or(0, |f| f.param_count);
        let mut params = Vec::with_capacity(count);
        let mut cursor = self.nodes[func].child.and_then(|m| self.nodes[m].sibling);
        while let Some(id) = cursor {
            if params.len() == count {
                break;
            }
            if self.nodes[id].data.as_variable().is_some() {
                params.push(id);
            }
            cursor = self.nodes[id].sibling;
        }
        params
    }

    pub fn param_types(&self, func: NodeId) -> Vec<DataType> {
        self.params(func)
            .into_iter()
            .filter_map(|id| self.variable(id).ok().map(|v| v.data_type))
            .collect()
    }

    /// Copies `func` together with its parameter scope and splices the copy
    /// in right after it. Body locals are not copied; they are created
    /// fresh when the body runs.
    pub fn clone_function_definition(&mut self, func: NodeId) -> NodeId {
        let data = self.nodes[func].data.clone();
        let copy = self.alloc(data);

        let marker = self.alloc(NodeData::Empty);
        self.nodes[marker].parent = Some(copy);
        self.nodes[copy].child = Some(marker);

        let mut prev = marker;
        for param in self.params(func) {
            let data = self.nodes[param].data.clone();
            let id = self.alloc(data);
            self.nodes[id].parent = Some(prev);
            self.nodes[prev].sibling = Some(id);
            prev = id;
        }

        let next = self.nodes[func].sibling.replace(copy);
        self.nodes[copy].parent = Some(func);
        self.nodes[copy].sibling = next;
        if let Some(next) = next {
            self.nodes[next].parent = Some(copy);
        }
        copy
    }

    /// Unsplices and releases a copy made by
    /// [`clone_function_definition`](Self::clone_function_definition).
    pub fn delete_function_clone(&mut self, clone: NodeId) {
        self.remove(clone);
    }

    /// Stores call arguments into the parameters of `func` (a clone) and
    /// returns the last parameter node, or the parameter scope's marker if
    /// there are none.
    pub fn bind_params(
        &mut self,
        func: NodeId,
        args: &[Value],
    ) -> Result<NodeId, ErrorKind> {
        let mut last = self.nodes[func].child.unwrap_or(func);
        for (param, arg) in self.params(func).into_iter().zip(args) {
            let var = self.variable_mut(param)?;
            var.value = arg.cast(var.data_type)?;
            var.initialized = true;
            last = param;
        }
        Ok(last)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Current value of the variable `name` as seen from the current node.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        let id = self.resolve(name).ok()?;
        self.variable(id).ok().map(|var| var.value)
    }

    /// Global variables in declaration order.
    pub fn globals(&self) -> Vec<&Variable> {
        let mut globals = Vec::new();
        let mut cursor = self.nodes[self.root].sibling;
        while let Some(id) = cursor {
            globals.extend(self.nodes[id].data.as_variable());
            cursor = self.nodes[id].sibling;
        }
        globals
    }

    fn write_chain(
        &self,
        f: &mut fmt::Formatter<'_>,
        first: NodeId,
        depth: usize,
    ) -> fmt::Result {
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            write!(f, "{:indent$}", "", indent = depth * 2)?;
            match &node.data {
                NodeData::Empty => writeln!(f, "{{}}")?,
                NodeData::Variable(var) if var.initialized => {
                    writeln!(f, "{} {} = {}", var.data_type, var.name, var.value)?
                }
                NodeData::Variable(var) => {
                    writeln!(f, "{} {} (uninitialized)", var.data_type, var.name)?
                }
                NodeData::Function(func) => {
                    writeln!(f, "void {}/{}", func.name, func.param_count)?
                }
            }
            if let Some(child) = node.child {
                self.write_chain(f, child, depth + 1)?;
            }
            cursor = node.sibling;
        }
        Ok(())
    }
}

impl fmt::Display for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_chain(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redefinition_in_same_scope() {
        let mut tree = ScopeTree::new();
        tree.declare_variable("a", DataType::Int).unwrap();
        assert_eq!(
            tree.declare_variable("a", DataType::Long),
            Err(ErrorKind::RedefinedIdentifier("a".to_string()))
        );
    }

    #[test]
    fn test_shadowing_in_nested_block() {
        let mut tree = ScopeTree::new();
        let outer = tree.declare_variable("a", DataType::Int).unwrap();

        let block = tree.enter_block();
        let inner = tree.declare_variable("a", DataType::Long).unwrap();
        assert_eq!(tree.resolve("a"), Ok(inner));

        tree.leave_block(block);
        assert_eq!(tree.current(), outer);
        assert_eq!(tree.resolve("a"), Ok(outer));
    }

    #[test]
    fn test_resolution_climbs_enclosing_scopes() {
        let mut tree = ScopeTree::new();
        tree.declare_variable("g", DataType::Int).unwrap();
        let func = tree.declare_function("f").unwrap();
        tree.declare_param(func, "p", DataType::Long).unwrap();
        tree.enter_block();

        assert!(tree.resolve_variable("g").is_ok());
        assert!(tree.resolve_variable("p").is_ok());
        assert_eq!(tree.resolve_function("f"), Ok(func));
        assert_eq!(
            tree.resolve("missing"),
            Err(ErrorKind::UndefinedIdentifier("missing".to_string()))
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let mut tree = ScopeTree::new();
        tree.declare_variable("v", DataType::Int).unwrap();
        tree.declare_function("f").unwrap();

        assert_eq!(
            tree.resolve_variable("f"),
            Err(ErrorKind::UsingFunctionAsVariable("f".to_string()))
        );
        assert_eq!(
            tree.resolve_function("v"),
            Err(ErrorKind::UsingVariableAsFunction("v".to_string()))
        );
    }

    #[test]
    fn test_assign_casts_to_declared_type() {
        let mut tree = ScopeTree::new();
        let res = tree.declare_variable("res", DataType::Long).unwrap();
        assert_eq!(tree.read(res), Err(ErrorKind::UninitializedVariable("res".into())));

        tree.assign(res, Value::Int(12)).unwrap();
        assert_eq!(tree.read(res), Ok(Value::Long(12)));
        assert!(tree.assign(res, Value::Void).is_err());
    }

    #[test]
    fn test_disabled_interpretation_checks_without_storing() {
        let mut tree = ScopeTree::new();
        let a = tree.declare_variable("a", DataType::Int).unwrap();
        tree.assign(a, Value::Int(5)).unwrap();

        tree.set_interpreting(false);
        let b = tree.declare_variable("b", DataType::Int).unwrap();
        tree.assign(b, Value::Int(7)).unwrap();
        assert_eq!(tree.read(a), Ok(Value::Int(0)));
        assert_eq!(
            tree.binary_op(Value::Int(1), Value::Int(0), BinaryOp::Div),
            Ok(Value::Int(0))
        );
        assert!(tree.binary_op(Value::Int(1), Value::Void, BinaryOp::Add).is_err());
        tree.step_variable(a, UnaryOp::Increment).unwrap();

        tree.set_interpreting(true);
        assert_eq!(tree.read(a), Ok(Value::Int(5)));
        // initialization is tracked even when nothing is stored
        assert_eq!(tree.read(b), Ok(Value::Int(0)));
    }

    #[test]
    fn test_step_variable() {
        let mut tree = ScopeTree::new();
        let i = tree.declare_variable("i", DataType::Long).unwrap();
        tree.assign(i, Value::Int(1)).unwrap();
        assert_eq!(
            tree.step_variable(i, UnaryOp::Increment),
            Ok((Value::Long(1), Value::Long(2)))
        );
        assert_eq!(tree.value_of("i"), Some(Value::Long(2)));
    }

    #[test]
    fn test_function_clone_lifecycle() {
        let mut tree = ScopeTree::new();
        let func = tree.declare_function("f").unwrap();
        tree.declare_param(func, "a", DataType::Int).unwrap();
        tree.declare_param(func, "b", DataType::Long).unwrap();
        tree.set_current(func);
        let after = tree.declare_variable("after", DataType::Int).unwrap();
        let live = tree.len();

        assert_eq!(tree.param_types(func), vec![DataType::Int, DataType::Long]);

        let clone = tree.clone_function_definition(func);
        assert_eq!(tree.node(func).sibling, Some(clone));
        assert_eq!(tree.node(after).parent, Some(clone));

        let last = tree.bind_params(clone, &[Value::Long(3), Value::Int(4)]).unwrap();
        tree.set_current(last);
        assert_eq!(tree.value_of("a"), Some(Value::Int(3)));
        assert_eq!(tree.value_of("b"), Some(Value::Long(4)));

        tree.delete_function_clone(clone);
        assert_eq!(tree.node(func).sibling, Some(after));
        assert_eq!(tree.node(after).parent, Some(func));
        assert_eq!(tree.len(), live);
    }

    #[test]
    fn test_globals_and_display() {
        let mut tree = ScopeTree::new();
        let a = tree.declare_variable("a", DataType::Int).unwrap();
        tree.assign(a, Value::Int(1)).unwrap();
        let f = tree.declare_function("f").unwrap();
        tree.set_current(f);
        tree.declare_variable("b", DataType::Long).unwrap();

        let names: Vec<&str> =
            tree.globals().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            tree.to_string(),
            "{}\nint a = 1\nvoid f/0\n  {}\nlong b (uninitialized)\n"
        );
    }
}
