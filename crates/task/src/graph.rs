//! Work graph arena
//!
//! Task nodes live in a [`WorkGraph`] and are addressed by [`TaskId`]
//! handles. Each node carries three ordered successor lists, one per edge
//! kind. The planner prunes `should_successors` while breaking cycles, so
//! that list is the only one exposed mutably inside the crate.

use std::cmp::Ordering;
use std::fmt;

/// Stable handle of a task node inside its [`WorkGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of ordering edge between two task nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The successor must complete first; never removed
    Dependency,
    /// Ordering-only constraint that cannot be violated
    MustRunAfter,
    /// Soft ordering preference, dropped when it closes a cycle
    ShouldRunAfter,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [
        EdgeKind::Dependency,
        EdgeKind::MustRunAfter,
        EdgeKind::ShouldRunAfter,
    ];

    /// Whether the planner refuses to drop edges of this kind
    pub fn is_hard(self) -> bool {
        !matches!(self, EdgeKind::ShouldRunAfter)
    }
}

/// An ordered `(from, to)` pair of task nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub from: TaskId,
    pub to: TaskId,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(from: TaskId, to: TaskId, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}

/// The unit of work a node stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    identity_path: String,
}

impl WorkItem {
    pub fn new(identity_path: impl Into<String>) -> Self {
        Self {
            identity_path: identity_path.into(),
        }
    }

    /// Stable human readable identifier, e.g. `:app:compileJava`
    pub fn identity_path(&self) -> &str {
        &self.identity_path
    }
}

/// A task node taking part in planning
///
/// Successor lists keep declaration order and hold each node at most once.
/// `should_successors` may shrink during planning; removal happens while no
/// iterator over the list is alive, the planner copies the list first.
#[derive(Debug, Clone)]
pub struct TaskNode {
    id: TaskId,
    task: WorkItem,
    include_in_graph: bool,
    dependency_successors: Vec<TaskId>,
    must_successors: Vec<TaskId>,
    should_successors: Vec<TaskId>,
}

impl TaskNode {
    fn new(id: TaskId, task: WorkItem) -> Self {
        Self {
            id,
            task,
            include_in_graph: true,
            dependency_successors: Vec::new(),
            must_successors: Vec::new(),
            should_successors: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn task(&self) -> &WorkItem {
        &self.task
    }

    pub fn identity_path(&self) -> &str {
        self.task.identity_path()
    }

    /// `false` means the node is dormant and never planned
    pub fn is_include_in_graph(&self) -> bool {
        self.include_in_graph
    }

    pub fn dependency_successors(&self) -> &[TaskId] {
        &self.dependency_successors
    }

    pub fn must_successors(&self) -> &[TaskId] {
        &self.must_successors
    }

    pub fn should_successors(&self) -> &[TaskId] {
        &self.should_successors
    }

    pub fn successors(&self, kind: EdgeKind) -> &[TaskId] {
        match kind {
            EdgeKind::Dependency => &self.dependency_successors,
            EdgeKind::MustRunAfter => &self.must_successors,
            EdgeKind::ShouldRunAfter => &self.should_successors,
        }
    }

    /// Dependency, must and should successors, each list reversed.
    ///
    /// Pushing these onto a LIFO work stack pops them back in declaration
    /// order.
    pub fn descending_successors(&self) -> impl Iterator<Item = (TaskId, EdgeKind)> + '_ {
        self.dependency_successors
            .iter()
            .rev()
            .map(|id| (*id, EdgeKind::Dependency))
            .chain(
                self.must_successors
                    .iter()
                    .rev()
                    .map(|id| (*id, EdgeKind::MustRunAfter)),
            )
            .chain(
                self.should_successors
                    .iter()
                    .rev()
                    .map(|id| (*id, EdgeKind::ShouldRunAfter)),
            )
    }

    /// Successors over edges the planner never drops, in declaration order
    pub fn hard_successors(&self) -> impl DoubleEndedIterator<Item = TaskId> + '_ {
        EdgeKind::ALL
            .into_iter()
            .filter(|kind| kind.is_hard())
            .flat_map(move |kind| self.successors(kind).iter().copied())
    }

    /// Whether `other` is a dependency or must-run-after successor
    pub fn has_hard_successor(&self, other: TaskId) -> bool {
        self.hard_successors().any(|successor| successor == other)
    }

    pub(crate) fn remove_should_successor(&mut self, successor: TaskId) -> bool {
        let before = self.should_successors.len();
        self.should_successors.retain(|id| *id != successor);
        before != self.should_successors.len()
    }

    pub(crate) fn retain_should_successors(&mut self, keep: impl FnMut(&TaskId) -> bool) {
        self.should_successors.retain(keep);
    }

    fn successors_mut(&mut self, kind: EdgeKind) -> &mut Vec<TaskId> {
        match kind {
            EdgeKind::Dependency => &mut self.dependency_successors,
            EdgeKind::MustRunAfter => &mut self.must_successors,
            EdgeKind::ShouldRunAfter => &mut self.should_successors,
        }
    }
}

/// Arena owning every task node plus the ordered entry tasks
#[derive(Debug, Clone, Default)]
pub struct WorkGraph {
    nodes: Vec<TaskNode>,
    entry_tasks: Vec<TaskId>,
}

impl WorkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for the work item at `identity_path`
    pub fn add_task(&mut self, identity_path: impl Into<String>) -> TaskId {
        let id = TaskId(self.nodes.len());
        self.nodes.push(TaskNode::new(id, WorkItem::new(identity_path)));
        id
    }

    /// Register `task` as a DFS root; entries are planned in insertion order
    pub fn add_entry_task(&mut self, task: TaskId) {
        if !self.entry_tasks.contains(&task) {
            self.entry_tasks.push(task);
        }
    }

    pub fn entry_tasks(&self) -> &[TaskId] {
        &self.entry_tasks
    }

    /// `successor` must complete before `task`
    pub fn add_dependency(&mut self, task: TaskId, successor: TaskId) {
        self.add_successor(task, successor, EdgeKind::Dependency);
    }

    /// `task` must run after `successor` whenever both are scheduled
    pub fn add_must_run_after(&mut self, task: TaskId, successor: TaskId) {
        self.add_successor(task, successor, EdgeKind::MustRunAfter);
    }

    /// `task` should run after `successor` unless that closes a cycle
    pub fn add_should_run_after(&mut self, task: TaskId, successor: TaskId) {
        self.add_successor(task, successor, EdgeKind::ShouldRunAfter);
    }

    pub fn add_successor(&mut self, task: TaskId, successor: TaskId, kind: EdgeKind) {
        let successors = self.node_mut(task).successors_mut(kind);
        if !successors.contains(&successor) {
            successors.push(successor);
        }
    }

    pub fn set_include_in_graph(&mut self, task: TaskId, include: bool) {
        self.node_mut(task).include_in_graph = include;
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// When `task` was issued by a different graph.
    pub fn node(&self, task: TaskId) -> &TaskNode {
        &self.nodes[task.0]
    }

    pub(crate) fn node_mut(&mut self, task: TaskId) -> &mut TaskNode {
        &mut self.nodes[task.0]
    }

    pub fn get(&self, task: TaskId) -> Option<&TaskNode> {
        self.nodes.get(task.0)
    }

    pub fn is_included(&self, task: TaskId) -> bool {
        self.node(task).include_in_graph
    }

    pub fn identity_path(&self, task: TaskId) -> &str {
        self.node(task).identity_path()
    }

    /// Find a node by identity path
    pub fn find(&self, identity_path: &str) -> Option<TaskId> {
        self.nodes
            .iter()
            .find(|node| node.identity_path() == identity_path)
            .map(TaskNode::id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.iter()
    }

    /// Natural node order: identity path, then handle
    pub fn natural_cmp(&self, a: TaskId, b: TaskId) -> Ordering {
        self.identity_path(a)
            .cmp(self.identity_path(b))
            .then_with(|| a.cmp(&b))
    }
}
