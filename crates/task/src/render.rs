//! Text rendering of task graphs
//!
//! A [`DirectedGraphRenderer`] draws the subgraph reachable from a root as an
//! indented tree:
//!
//! ```text
//! :a
//! \--- :b
//!      \--- :a (*)
//! ```
//!
//! `(*)` marks a node that has already been drawn. How each node is labelled
//! is up to a pluggable [`GraphNodeRenderer`].

use crate::graph::{TaskId, WorkGraph};
use crossterm::style::Stylize;
use std::collections::HashSet;

/// Semantic style of a text fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Identifier,
}

/// Sink for styled text
pub trait StyledTextOutput {
    fn text(&mut self, style: Style, text: &str);

    fn println(&mut self) {
        self.text(Style::Normal, "\n");
    }
}

/// Plain output drops styling
impl StyledTextOutput for String {
    fn text(&mut self, _style: Style, text: &str) {
        self.push_str(text);
    }
}

/// Output that highlights identifiers with ANSI escapes
#[derive(Debug, Default)]
pub struct AnsiTextOutput {
    buffer: String,
}

impl AnsiTextOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl StyledTextOutput for AnsiTextOutput {
    fn text(&mut self, style: Style, text: &str) {
        match style {
            Style::Normal => self.buffer.push_str(text),
            Style::Identifier => self.buffer.push_str(&text.bold().to_string()),
        }
    }
}

/// Writes the label of a single node
pub trait GraphNodeRenderer {
    fn render_to(&self, graph: &WorkGraph, node: TaskId, output: &mut dyn StyledTextOutput);
}

/// Labels a node with its identity path in identifier style
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPathRenderer;

impl GraphNodeRenderer for IdentityPathRenderer {
    fn render_to(&self, graph: &WorkGraph, node: TaskId, output: &mut dyn StyledTextOutput) {
        output.text(Style::Identifier, graph.identity_path(node));
    }
}

/// Renders the graph described by `children` as a tree below a root
pub struct DirectedGraphRenderer<'a, F> {
    graph: &'a WorkGraph,
    node_renderer: &'a dyn GraphNodeRenderer,
    children: F,
}

impl<'a, F> DirectedGraphRenderer<'a, F>
where
    F: Fn(TaskId) -> Vec<TaskId>,
{
    pub fn new(graph: &'a WorkGraph, node_renderer: &'a dyn GraphNodeRenderer, children: F) -> Self {
        Self {
            graph,
            node_renderer,
            children,
        }
    }

    /// Render the tree rooted at `root`, one node per line
    pub fn render_to(&self, root: TaskId, output: &mut dyn StyledTextOutput) {
        let mut rendered = HashSet::new();
        self.render_node(root, "", None, &mut rendered, output);
    }

    /// `last_child` is `None` for the root, otherwise whether this node closes
    /// its sibling list.
    fn render_node(
        &self,
        node: TaskId,
        prefix: &str,
        last_child: Option<bool>,
        rendered: &mut HashSet<TaskId>,
        output: &mut dyn StyledTextOutput,
    ) {
        let already_seen = !rendered.insert(node);

        let child_prefix = match last_child {
            None => String::new(),
            Some(last) => {
                output.text(Style::Normal, prefix);
                output.text(Style::Normal, if last { "\\--- " } else { "+--- " });
                format!("{prefix}{}", if last { "     " } else { "|    " })
            }
        };
        self.node_renderer.render_to(self.graph, node, output);
        if already_seen {
            output.text(Style::Normal, " (*)");
        }
        output.println();

        if already_seen {
            return;
        }
        let children = (self.children)(node);
        let count = children.len();
        for (position, child) in children.into_iter().enumerate() {
            self.render_node(
                child,
                &child_prefix,
                Some(position + 1 == count),
                rendered,
                output,
            );
        }
    }
}
