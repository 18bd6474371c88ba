//! Execution planning
//!
//! [`ExecutionPlan`] turns a [`WorkGraph`] into a linear order in two passes:
//!
//! 1. **Cycle breaking** walks the graph depth first and drops
//!    should-run-after edges that close a cycle, backtracking whatever was
//!    planned below the node that owned the dropped edge.
//! 2. **Linearization** walks the pruned graph again, commits one edge per
//!    followed successor and numbers nodes in post order.
//!
//! Afterwards the plan answers which nodes are ready to run and is updated
//! through [`ExecutionPlan::finished_executing`] as the executor reports
//! completions.

mod cycles;
mod linearize;
mod readiness;

use crate::config::PlannerConfig;
use crate::graph::{GraphEdge, TaskId, WorkGraph};
use crate::render::{DirectedGraphRenderer, GraphNodeRenderer, IdentityPathRenderer};
use crate::walker::CycleWalker;
use cycles::CycleBreaker;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use workplan_core::{Error, Result, CYCLE_REPORT_HEADER};
use workplan_utils::tracing::planning_span;

/// Why a planning pass stopped early
#[derive(Debug)]
enum Interrupt {
    /// A cycle with no removable edge; carries the nodes seen on it
    OrderingCycle { participants: Vec<TaskId> },
    RemovalLimit { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanState {
    Pending,
    Determined,
    Failed,
}

/// Linear execution plan over a work graph plus live readiness tracking
pub struct ExecutionPlan {
    graph: WorkGraph,
    config: PlannerConfig,
    node_renderer: Box<dyn GraphNodeRenderer>,
    state: PlanState,
    /// Planned nodes in index order
    nodes: Vec<TaskId>,
    node_index: HashMap<TaskId, usize>,
    incoming: IndexMap<TaskId, IndexSet<GraphEdge>>,
    outgoing: IndexMap<TaskId, IndexSet<GraphEdge>>,
    ready_to_execute: Vec<TaskId>,
    finished: HashSet<TaskId>,
    removed_should_edges: usize,
}

impl ExecutionPlan {
    pub fn new(graph: WorkGraph) -> Self {
        Self::with_config(graph, PlannerConfig::default())
    }

    pub fn with_config(graph: WorkGraph, config: PlannerConfig) -> Self {
        Self {
            graph,
            config,
            node_renderer: Box::new(IdentityPathRenderer),
            state: PlanState::Pending,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            incoming: IndexMap::new(),
            outgoing: IndexMap::new(),
            ready_to_execute: Vec::new(),
            finished: HashSet::new(),
            removed_should_edges: 0,
        }
    }

    /// Replace the renderer used for node labels in cycle reports
    pub fn with_node_renderer(mut self, renderer: impl GraphNodeRenderer + 'static) -> Self {
        self.node_renderer = Box::new(renderer);
        self
    }

    /// Finalize the plan. May be called once.
    ///
    /// Should-run-after successors that close a cycle are removed from the
    /// graph for good. Fails with [`Error::OrderingCycle`] when a cycle made
    /// only of dependency and must-run-after edges remains.
    pub fn determine_execution_plan(&mut self) -> Result<()> {
        if self.state != PlanState::Pending {
            return Err(Error::PlanAlreadyDetermined);
        }
        let _span = planning_span(self.graph.entry_tasks().len()).entered();
        self.state = PlanState::Failed;

        self.removed_should_edges =
            CycleBreaker::new(&mut self.graph, self.config.max_should_edge_removals)
                .run()
                .map_err(|interrupt| self.planning_error(interrupt))?;

        self.linearize()
            .map_err(|interrupt| self.planning_error(interrupt))?;

        self.state = PlanState::Determined;
        debug!(
            planned = self.nodes.len(),
            ready = self.ready_to_execute.len(),
            removed_should_edges = self.removed_should_edges,
            "Determined execution plan"
        );
        Ok(())
    }

    /// Planned nodes whose committed dependencies have all finished, in
    /// planned order
    pub fn ready_to_execute(&self) -> &[TaskId] {
        &self.ready_to_execute
    }

    /// Every planned node in planned order
    pub fn execution_order(&self) -> &[TaskId] {
        &self.nodes
    }

    pub fn index_of(&self, node: TaskId) -> Option<usize> {
        self.node_index.get(&node).copied()
    }

    pub fn contains(&self, node: TaskId) -> bool {
        self.node_index.contains_key(&node)
    }

    /// Committed edges pointing at `node`, i.e. from nodes waiting on it
    pub fn incoming(&self, node: TaskId) -> impl Iterator<Item = &GraphEdge> {
        self.incoming.get(&node).into_iter().flatten()
    }

    /// Committed edges leaving `node` that are not yet satisfied
    pub fn outgoing(&self, node: TaskId) -> impl Iterator<Item = &GraphEdge> {
        self.outgoing.get(&node).into_iter().flatten()
    }

    /// Whether any committed edge is still waiting for a completion
    pub fn has_pending_edges(&self) -> bool {
        !self.incoming.is_empty() || !self.outgoing.is_empty()
    }

    /// Number of should-run-after edges dropped to break cycles
    pub fn removed_should_edges(&self) -> usize {
        self.removed_should_edges
    }

    pub fn graph(&self) -> &WorkGraph {
        &self.graph
    }

    pub fn into_graph(self) -> WorkGraph {
        self.graph
    }

    fn planning_error(&self, interrupt: Interrupt) -> Error {
        match interrupt {
            Interrupt::OrderingCycle { participants } => {
                let error = self.ordering_cycle_error(participants);
                debug!(%error, "Execution planning failed");
                error
            }
            Interrupt::RemovalLimit { limit } => Error::cycle_break_limit(limit),
        }
    }

    /// Render the first hard cycle reachable from the entry tasks, falling
    /// back to the nodes the planner was visiting when the walker finds none.
    fn ordering_cycle_error(&self, participants: Vec<TaskId>) -> Error {
        let graph = &self.graph;
        let mut walker = CycleWalker::new(graph);
        walker.add(graph.entry_tasks().iter().copied());

        let mut first_cycle = walker
            .find_cycles()
            .into_iter()
            .next()
            .unwrap_or(participants);
        first_cycle.sort_by(|a, b| graph.natural_cmp(*a, *b));
        first_cycle.dedup();

        let mut rendering = String::from(CYCLE_REPORT_HEADER);
        rendering.push('\n');
        if let Some(&root) = first_cycle.first() {
            let renderer = DirectedGraphRenderer::new(graph, self.node_renderer.as_ref(), |node| {
                first_cycle
                    .iter()
                    .copied()
                    .filter(|dependency| graph.node(node).has_hard_successor(*dependency))
                    .collect()
            });
            renderer.render_to(root, &mut rendering);
        }
        Error::ordering_cycle(rendering.trim_end())
    }

    fn is_ready_to_execute(&self, node: TaskId) -> bool {
        !self.outgoing.contains_key(&node)
    }

    fn sort_ready_to_execute(&mut self) {
        let node_index = &self.node_index;
        self.ready_to_execute
            .sort_by_key(|node| node_index.get(node).copied().unwrap_or(usize::MAX));
    }
}
