use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Video selection payload. Only `id` matters to the checkpoint cache; the
/// rest (title, source URL, kind, ...) is client metadata relayed verbatim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoInfo {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}
