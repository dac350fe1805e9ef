//! Graphviz DOT export.

use std::collections::HashMap;

use odpkit_owl::Iri;

use crate::graph::SdGraph;

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `g` as a DOT digraph.
///
/// Subclass edges are solid arrows labeled `is-a`; property edges have no
/// arrowhead and carry the property short name. Literal nodes are dashed
/// ellipses.
pub fn render_dot(g: &SdGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph sdont {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\"];\n\n");

    let mut id_by_iri: HashMap<&Iri, String> = HashMap::new();
    for (i, n) in g.nodes().enumerate() {
        let id = format!("n{i}");
        let mut attrs = vec![
            format!("label=\"{}\"", dot_escape(n.short_name())),
            format!("tooltip=\"{}\"", dot_escape(n.iri().as_str())),
        ];
        if n.is_literal() {
            attrs.push("shape=ellipse".to_string());
            attrs.push("style=dashed".to_string());
        }
        out.push_str(&format!("  {id} [{}];\n", attrs.join(", ")));
        id_by_iri.insert(n.iri(), id);
    }

    if g.edge_count() > 0 {
        out.push('\n');
    }
    for e in g.edges() {
        let (Some(src), Some(dst)) = (id_by_iri.get(e.source().iri()), id_by_iri.get(e.target().iri()))
        else {
            continue;
        };
        let attrs = if e.is_directed() {
            "label=\"is-a\"".to_string()
        } else {
            format!(
                "label=\"{}\", dir=none",
                dot_escape(e.label().iri.short_form())
            )
        };
        out.push_str(&format!("  {src} -> {dst} [{attrs}];\n"));
    }

    out.push_str("}\n");
    out
}
