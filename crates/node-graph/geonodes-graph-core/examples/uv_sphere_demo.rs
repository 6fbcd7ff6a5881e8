//! Evaluates a small graph loaded from JSON and prints what it produced.
//!
//! Run with `RUST_LOG=info` to see node diagnostics as they are merged.

use anyhow::{anyhow, Context, Result};
use geonodes_graph_core::{evaluate_all, GraphRuntime, GraphSpec};

const GRAPH: &str = r#"{
    "nodes": [
        { "id": "sphere", "type": "mesh_primitive_uv_sphere",
          "values": { "Segments": 32, "Rings": 16, "Radius": 1.5 } },
        { "id": "small", "type": "mesh_primitive_uv_sphere", "values": { "Segments": 2 } },
        { "id": "fill", "type": "attribute_fill",
          "settings": { "data_type": "color", "domain": "face" },
          "values": { "Attribute": "tint", "Value_002": [1.0, 0.5, 0.0, 1.0] },
          "inputs": { "Geometry": { "node_id": "sphere", "output_key": "Mesh" } } },
        { "id": "out", "type": "group_output",
          "inputs": { "Geometry": { "node_id": "fill" } } }
    ]
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let spec = GraphSpec::from_json(GRAPH).context("parsing graph")?;
    let mut rt = GraphRuntime::default();
    evaluate_all(&mut rt, &spec).context("evaluating graph")?;

    let result = rt
        .geometry_output("out", "Geometry")
        .ok_or_else(|| anyhow!("graph produced no geometry"))?;
    let mesh = result
        .get_mesh_for_read()
        .ok_or_else(|| anyhow!("graph produced no mesh"))?;
    mesh.validate().context("validating mesh")?;

    println!(
        "mesh: {} vertices, {} edges, {} faces, {} corners",
        mesh.verts_num(),
        mesh.edges_num(),
        mesh.faces_num(),
        mesh.corners_num()
    );
    for (name, attribute) in mesh.attributes().iter() {
        println!(
            "  {name}: {} on {} ({} values)",
            attribute.data.data_type(),
            attribute.domain,
            attribute.data.len()
        );
    }
    if let Some((min, max)) = result.compute_boundbox_without_instances() {
        println!("bounds: {min:?} .. {max:?}");
    }

    for warning in rt.log.warnings() {
        println!("[{:?}] {}: {}", warning.severity, warning.node_id, warning.message);
    }
    Ok(())
}
