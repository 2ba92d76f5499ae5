use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::dfa::Dfa;

pub const INITIAL_FILL: &str = "green";
pub const ACCEPTING_FILL: &str = "red";

/// A state as drawn in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateNode {
    pub name: String,
    pub initial: bool,
    pub accepting: bool,
}

impl StateNode {
    /// Initial styling is applied before accepting styling, so a state that
    /// is both is filled with [`ACCEPTING_FILL`].
    pub fn fill_color(&self) -> Option<&'static str> {
        let mut fill = None;
        if self.initial {
            fill = Some(INITIAL_FILL);
        }
        if self.accepting {
            fill = Some(ACCEPTING_FILL);
        }
        fill
    }

    pub fn dot_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![];
        if self.accepting {
            attrs.push(("shape", "doublecircle".to_string()));
        }
        if let Some(fill) = self.fill_color() {
            attrs.push(("style", "filled".to_string()));
            attrs.push(("fillcolor", fill.to_string()));
        }
        attrs
    }
}

/// Node/edge view of an automaton, one node per state and one labeled edge
/// per transition entry. Parallel edges between the same two states are kept
/// apart.
#[derive(Debug, Clone)]
pub struct AutomatonGraph {
    pub graph: DiGraph<StateNode, String>,
    initial: Option<NodeIndex>,
}

impl AutomatonGraph {
    /// Builds the graph for `dfa`. Transitions whose endpoints are not
    /// declared states have no node to attach to and are left out.
    pub fn build(dfa: &Dfa) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut initial = None;

        for state in dfa.states() {
            let node = graph.add_node(StateNode {
                name: state.clone(),
                initial: state == dfa.initial_state(),
                accepting: dfa.is_final(state),
            });
            if state == dfa.initial_state() {
                initial = Some(node);
            }
            nodes.insert(state.as_str(), node);
        }

        for (from, symbol, to) in dfa.edges() {
            match (nodes.get(from), nodes.get(to)) {
                (Some(&source), Some(&target)) => {
                    graph.add_edge(source, target, symbol.to_string());
                }
                _ => tracing::warn!(
                    "Skipping transition {} -{}-> {} with an undeclared endpoint",
                    from,
                    symbol,
                    to
                ),
            }
        }

        AutomatonGraph { graph, initial }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn initial(&self) -> Option<&StateNode> {
        self.initial.map(|node| &self.graph[node])
    }

    pub fn node(&self, name: &str) -> Option<&StateNode> {
        self.graph.node_weights().find(|node| node.name == name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StateNode> {
        self.graph.node_weights()
    }

    /// All edges as `(source, label, target)`, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                edge.weight().as_str(),
                self.graph[edge.target()].name.as_str(),
            )
        })
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph automaton {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape = circle];\n");

        let start = self.start_marker_ident();
        if self.initial.is_some() {
            dot.push_str(&format!("{start} [shape=point, label=\"\"];\n"));
        }

        for node in self.graph.node_weights() {
            let attrs = node.dot_attributes();
            if attrs.is_empty() {
                dot.push_str(&format!("{};\n", quote_ident(&node.name)));
            } else {
                dot.push_str(&format!(
                    "{} [{}];\n",
                    quote_ident(&node.name),
                    attrs
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, quote_ident(v)))
                        .join(", ")
                ));
            }
        }

        if let Some(initial) = self.initial {
            dot.push_str(&format!(
                "{start} -> {};\n",
                quote_ident(&self.graph[initial].name)
            ));
        }

        for edge in self.graph.edge_references() {
            dot.push_str(&format!(
                "{} -> {} [label={}];\n",
                quote_ident(&self.graph[edge.source()].name),
                quote_ident(&self.graph[edge.target()].name),
                quote_ident(edge.weight())
            ));
        }

        dot.push_str("}\n");

        dot
    }

    /// Identifier of the invisible node the start arrow comes from. Picked so
    /// that it cannot clash with a state name.
    fn start_marker_ident(&self) -> String {
        let mut ident = "__start".to_string();
        while self.node(&ident).is_some() {
            ident.push('_');
        }
        ident
    }
}

impl Dfa {
    pub fn to_graph(&self) -> AutomatonGraph {
        AutomatonGraph::build(self)
    }
}

/// Quotes a DOT identifier, escaping `"` and `\`.
fn quote_ident(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
