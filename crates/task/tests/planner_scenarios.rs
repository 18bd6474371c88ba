use rstest::rstest;
use workplan_core::Error;
use workplan_task::{
    EdgeKind, ExecutionPlan, GraphNodeRenderer, PlannerConfig, Style, StyledTextOutput, TaskId,
    WorkGraph,
};

fn planned_paths(plan: &ExecutionPlan, nodes: &[TaskId]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| plan.graph().identity_path(*node).to_string())
        .collect()
}

fn diamond() -> (WorkGraph, [TaskId; 4]) {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    let c = graph.add_task(":c");
    let d = graph.add_task(":d");
    graph.add_dependency(a, b);
    graph.add_dependency(a, c);
    graph.add_dependency(b, d);
    graph.add_dependency(c, d);
    graph.add_entry_task(a);
    (graph, [a, b, c, d])
}

#[test]
fn test_diamond_is_planned_in_declaration_order() {
    let (graph, _) = diamond();
    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(
        planned_paths(&plan, plan.execution_order()),
        vec![":d", ":b", ":c", ":a"]
    );
    assert_eq!(planned_paths(&plan, plan.ready_to_execute()), vec![":d"]);
    assert_eq!(plan.removed_should_edges(), 0);
}

#[test]
fn test_readiness_evolves_with_completions() {
    let (graph, [a, b, c, d]) = diamond();
    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(plan.ready_to_execute(), &[d]);

    plan.finished_executing(d).unwrap();
    assert_eq!(plan.ready_to_execute(), &[b, c]);

    plan.finished_executing(b).unwrap();
    assert_eq!(plan.ready_to_execute(), &[c]);

    plan.finished_executing(c).unwrap();
    assert_eq!(plan.ready_to_execute(), &[a]);

    plan.finished_executing(a).unwrap();
    assert!(plan.ready_to_execute().is_empty());
    assert!(!plan.has_pending_edges());
    assert!(plan.is_finished());
}

#[test]
fn test_completion_out_of_ready_order_is_tracked() {
    let (graph, [a, b, c, d]) = diamond();
    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    plan.finished_executing(d).unwrap();
    plan.finished_executing(c).unwrap();
    assert_eq!(plan.ready_to_execute(), &[b]);
    assert_eq!(plan.outgoing(a).count(), 1);

    plan.finished_executing(b).unwrap();
    assert_eq!(plan.ready_to_execute(), &[a]);
}

#[test]
fn test_pure_should_cycle_is_broken() {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    graph.add_should_run_after(a, b);
    graph.add_should_run_after(b, a);
    graph.add_entry_task(a);

    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(plan.execution_order(), &[b, a]);
    assert_eq!(plan.graph().node(a).should_successors(), &[b]);
    assert!(plan.graph().node(b).should_successors().is_empty());

    let edges: Vec<_> = plan.outgoing(a).collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to, b);
    assert_eq!(edges[0].kind, EdgeKind::ShouldRunAfter);
}

#[test]
fn test_should_edge_yields_to_must_run_after() {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    graph.add_must_run_after(a, b);
    graph.add_should_run_after(b, a);
    graph.add_entry_task(a);

    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(plan.execution_order(), &[b, a]);
    assert!(plan.graph().node(b).should_successors().is_empty());
    assert_eq!(plan.graph().node(a).must_successors(), &[b]);
}

#[test]
fn test_dependency_cycle_is_reported() {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    graph.add_dependency(a, b);
    graph.add_dependency(b, a);
    graph.add_entry_task(a);

    let mut plan = ExecutionPlan::new(graph);
    let error = plan.determine_execution_plan().unwrap_err();

    assert!(error.is_ordering_cycle());
    assert_eq!(
        error.to_string(),
        "Circular dependency between the following tasks:\n\
         :a\n\
         \\--- :b\n     \\--- :a (*)"
    );
}

#[test]
fn test_should_edge_closing_dependency_chain_is_dropped_and_search_rewinds() {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    let c = graph.add_task(":c");
    graph.add_should_run_after(a, b);
    graph.add_dependency(b, c);
    graph.add_dependency(c, a);
    graph.add_entry_task(a);
    graph.add_entry_task(b);

    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(plan.removed_should_edges(), 1);
    assert!(plan.graph().node(a).should_successors().is_empty());
    assert_eq!(plan.execution_order(), &[a, c, b]);
    assert_eq!(plan.ready_to_execute(), &[a]);
}

#[test]
fn test_should_edge_off_every_cycle_survives_rewinds() {
    let mut graph = WorkGraph::new();
    let x = graph.add_task(":x");
    let y = graph.add_task(":y");
    let p = graph.add_task(":p");
    let f = graph.add_task(":f");
    let t = graph.add_task(":t");
    let g = graph.add_task(":g");
    graph.add_should_run_after(x, y);
    graph.add_dependency(y, p);
    graph.add_should_run_after(p, f);
    graph.add_dependency(p, g);
    graph.add_should_run_after(f, t);
    graph.add_dependency(t, f);
    graph.add_dependency(g, x);
    graph.add_entry_task(x);

    let mut plan = ExecutionPlan::new(graph);
    plan.determine_execution_plan().unwrap();

    assert_eq!(plan.removed_should_edges(), 2);
    assert!(plan.graph().node(f).should_successors().is_empty());
    assert!(plan.graph().node(x).should_successors().is_empty());
    assert_eq!(plan.graph().node(p).should_successors(), &[f]);
    assert_eq!(plan.execution_order(), &[x]);
}

#[test]
fn test_hard_cycle_behind_should_edge_is_not_masked() {
    let mut graph = WorkGraph::new();
    let x = graph.add_task(":x");
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    graph.add_should_run_after(x, a);
    graph.add_dependency(a, b);
    graph.add_must_run_after(b, a);
    graph.add_entry_task(x);

    let mut plan = ExecutionPlan::new(graph);
    let error = plan.determine_execution_plan().unwrap_err();

    let message = error.to_string();
    assert!(message.starts_with("Circular dependency between the following tasks:\n:a\n"));
    assert!(message.contains(":b"));
    assert!(!message.contains(":x"));
}

#[rstest]
#[case(None, true)]
#[case(Some(2), true)]
#[case(Some(1), false)]
fn test_should_edge_removal_limit(#[case] limit: Option<usize>, #[case] succeeds: bool) {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":a");
    let b = graph.add_task(":b");
    let c = graph.add_task(":c");
    let d = graph.add_task(":d");
    graph.add_should_run_after(a, b);
    graph.add_dependency(b, a);
    graph.add_should_run_after(c, d);
    graph.add_must_run_after(d, c);
    graph.add_entry_task(a);
    graph.add_entry_task(c);

    let config = PlannerConfig {
        max_should_edge_removals: limit,
    };
    let mut plan = ExecutionPlan::with_config(graph, config);
    let result = plan.determine_execution_plan();

    if succeeds {
        result.unwrap();
        assert_eq!(plan.removed_should_edges(), 2);
        assert_eq!(plan.execution_order(), &[a, c]);
    } else {
        assert!(matches!(result, Err(Error::CycleBreakLimit { limit: 1 })));
    }
}

struct BracketRenderer;

impl GraphNodeRenderer for BracketRenderer {
    fn render_to(&self, graph: &WorkGraph, node: TaskId, output: &mut dyn StyledTextOutput) {
        output.text(Style::Normal, "task '");
        output.text(Style::Identifier, graph.identity_path(node));
        output.text(Style::Normal, "'");
    }
}

#[test]
fn test_cycle_report_uses_custom_renderer() {
    let mut graph = WorkGraph::new();
    let a = graph.add_task(":app:compile");
    let b = graph.add_task(":app:generate");
    graph.add_must_run_after(a, b);
    graph.add_dependency(b, a);
    graph.add_entry_task(b);

    let mut plan = ExecutionPlan::new(graph).with_node_renderer(BracketRenderer);
    let error = plan.determine_execution_plan().unwrap_err();

    assert_eq!(
        error.to_string(),
        "Circular dependency between the following tasks:\n\
         task ':app:compile'\n\
         \\--- task ':app:generate'\n     \\--- task ':app:compile' (*)"
    );
}
