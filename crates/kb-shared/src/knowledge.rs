//! The knowledge graph endpoints return graph data whose shape is owned by the
//! server, so it is passed through as JSON

pub type GraphData = serde_json::Value;
