//! Cycle detection over hard ordering edges
//!
//! Collects every node that sits on at least one cycle reachable from the
//! entry tasks through dependency and must-run-after edges. Should-run-after
//! edges are ignored; by the time a cycle is reported they have either been
//! pruned or were never part of the problem.

use crate::graph::{TaskId, WorkGraph};
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// Walks the hard edges of a [`WorkGraph`] from a set of start nodes
pub struct CycleWalker<'g> {
    graph: &'g WorkGraph,
    start: Vec<TaskId>,
}

impl<'g> CycleWalker<'g> {
    pub fn new(graph: &'g WorkGraph) -> Self {
        Self {
            graph,
            start: Vec::new(),
        }
    }

    /// Add start nodes; dormant nodes are skipped
    pub fn add(&mut self, tasks: impl IntoIterator<Item = TaskId>) -> &mut Self {
        self.start.extend(tasks);
        self
    }

    /// Every strongly connected component that forms a cycle, in discovery
    /// order. Self loops count as one-node cycles.
    pub fn find_cycles(&self) -> Vec<Vec<TaskId>> {
        let dag = self.reachable_graph();

        tarjan_scc(&dag)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => dag.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| component.into_iter().map(|index| dag[index]).collect())
            .collect()
    }

    /// Build the petgraph view of every included node reachable through
    /// hard edges, discovered depth first from the start nodes.
    fn reachable_graph(&self) -> DiGraph<TaskId, ()> {
        let mut dag = DiGraph::new();
        let mut indices: IndexMap<TaskId, NodeIndex> = IndexMap::new();
        let mut pending: Vec<TaskId> = self.start.iter().rev().copied().collect();

        while let Some(task) = pending.pop() {
            if indices.contains_key(&task) || !self.graph.is_included(task) {
                continue;
            }
            indices.insert(task, dag.add_node(task));
            pending.extend(self.hard_successors(task).rev());
        }

        for (&task, &from) in &indices {
            for successor in self.hard_successors(task) {
                if let Some(&to) = indices.get(&successor) {
                    dag.update_edge(from, to, ());
                }
            }
        }

        dag
    }

    fn hard_successors(&self, task: TaskId) -> impl DoubleEndedIterator<Item = TaskId> + 'g {
        let graph = self.graph;
        graph.node(task).hard_successors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut cycle: Vec<TaskId>) -> Vec<TaskId> {
        cycle.sort();
        cycle
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let mut graph = WorkGraph::new();
        let a = graph.add_task(":a");
        let b = graph.add_task(":b");
        graph.add_dependency(a, b);

        let mut walker = CycleWalker::new(&graph);
        walker.add([a]);
        assert!(walker.find_cycles().is_empty());
    }

    #[test]
    fn test_finds_dependency_and_must_cycle() {
        let mut graph = WorkGraph::new();
        let a = graph.add_task(":a");
        let b = graph.add_task(":b");
        let c = graph.add_task(":c");
        graph.add_dependency(a, b);
        graph.add_must_run_after(b, c);
        graph.add_dependency(c, a);

        let mut walker = CycleWalker::new(&graph);
        walker.add([a]);
        let cycles = walker.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(sorted(cycles[0].clone()), vec![a, b, c]);
    }

    #[test]
    fn test_ignores_should_edges_and_unreachable_nodes() {
        let mut graph = WorkGraph::new();
        let a = graph.add_task(":a");
        let b = graph.add_task(":b");
        let x = graph.add_task(":x");
        let y = graph.add_task(":y");
        graph.add_dependency(a, b);
        graph.add_should_run_after(b, a);
        graph.add_dependency(x, y);
        graph.add_dependency(y, x);

        let mut walker = CycleWalker::new(&graph);
        walker.add([a]);
        assert!(walker.find_cycles().is_empty());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = WorkGraph::new();
        let a = graph.add_task(":a");
        graph.add_dependency(a, a);

        let mut walker = CycleWalker::new(&graph);
        walker.add([a]);
        assert_eq!(walker.find_cycles(), vec![vec![a]]);
    }
}
