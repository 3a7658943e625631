//! Graphviz DOT renderer.
//!
//! Produces a left-to-right digraph with one styled node per resource and one
//! edge per reference. Emission order follows the graph's map iteration
//! order, so rendering the same `Graph` always yields the same bytes.
//!
//! Edge targets that were never reported as a resource still get an edge;
//! Graphviz draws them as plain, unstyled nodes.

use std::fmt::Write;

use crate::config::RenderConfig;
use crate::graph::{Graph, NodeKind};

/// Render with the default configuration.
pub fn render_dot(graph: &Graph) -> String {
    DotRenderer::default().render(graph)
}

#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    config: RenderConfig,
}

impl DotRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, graph: &Graph) -> String {
        let cfg = &self.config;
        let mut out = String::with_capacity(256 + graph.node_count() * 160);

        out.push_str(&format!("digraph {} {{\n", quote_id(&cfg.graph_name)));
        out.push_str(&format!("\trankdir={};\n", cfg.rankdir));

        for kind in NodeKind::ALL {
            let color = quote(cfg.palette.color(kind));
            for (name, id) in graph.nodes(kind) {
                // Writing to a String cannot fail.
                let _ = writeln!(
                    out,
                    "\t{} [color={color}, fillcolor={color}, fontcolor=white, fontname={}, label={}, shape=box, style=\"filled,rounded\"];",
                    quote(name),
                    quote(&cfg.font),
                    quote(id),
                );
            }
        }

        for (src, dst) in graph.edges() {
            let _ = writeln!(
                out,
                "\t{} -> {} [arrowsize={}, penwidth={}];",
                quote(src),
                quote(dst),
                cfg.edge_arrowsize,
                cfg.edge_penwidth,
            );
        }

        out.push_str("}\n");
        out
    }
}

/// Wrap a name in double quotes, escaping what DOT requires.
pub fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            '\n' => q.push_str("\\n"),
            _ => q.push(c),
        }
    }
    q.push('"');
    q
}

fn quote_id(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        quote(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn sample() -> Graph {
        let mut b = GraphBuilder::new();
        b.add_node(NodeKind::Listener, "L1");
        b.add_node(NodeKind::RouteTable, "R1");
        b.add_node(NodeKind::Cluster, "C1");
        b.add_listener_route("L1", "R1");
        b.add_route_cluster("R1", "C1");
        b.build()
    }

    #[test]
    fn empty_graph_is_header_and_footer() {
        assert_eq!(render_dot(&Graph::default()), "digraph G {\n\trankdir=LR;\n}\n");
    }

    #[test]
    fn renders_styled_nodes_and_edges() {
        let dot = render_dot(&sample());
        let expected = concat!(
            "digraph G {\n",
            "\trankdir=LR;\n",
            "\t\"L1\" [color=\"#4285F4\", fillcolor=\"#4285F4\", fontcolor=white, fontname=\"Roboto\", label=\"LDS0\", shape=box, style=\"filled,rounded\"];\n",
            "\t\"R1\" [color=\"#FBBC04\", fillcolor=\"#FBBC04\", fontcolor=white, fontname=\"Roboto\", label=\"RDS0\", shape=box, style=\"filled,rounded\"];\n",
            "\t\"C1\" [color=\"#34A853\", fillcolor=\"#34A853\", fontcolor=white, fontname=\"Roboto\", label=\"CDS0\", shape=box, style=\"filled,rounded\"];\n",
            "\t\"L1\" -> \"R1\" [arrowsize=0.3, penwidth=0.3];\n",
            "\t\"R1\" -> \"C1\" [arrowsize=0.3, penwidth=0.3];\n",
            "}\n",
        );
        assert_eq!(dot, expected);
    }

    #[test]
    fn rendering_is_idempotent() {
        let g = sample();
        assert_eq!(render_dot(&g), render_dot(&g));
    }

    #[test]
    fn names_with_special_characters_are_quoted() {
        assert_eq!(quote("outbound|80||svc.ns"), "\"outbound|80||svc.ns\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn dangling_target_has_edge_but_no_declaration() {
        let mut b = GraphBuilder::new();
        b.add_node(NodeKind::RouteTable, "R");
        b.add_route_cluster("R", "ghost");
        let dot = render_dot(&b.build());
        assert!(dot.contains("\t\"R\" -> \"ghost\" [arrowsize=0.3, penwidth=0.3];\n"));
        assert!(!dot.lines().any(|l| l.starts_with("\t\"ghost\" [")));
    }

    #[test]
    fn custom_graph_name_is_quoted_when_needed() {
        let mut cfg = RenderConfig::default();
        cfg.graph_name = "my graph".to_string();
        let dot = DotRenderer::new(cfg).render(&Graph::default());
        assert!(dot.starts_with("digraph \"my graph\" {\n"));
    }
}
