use serde::{Deserialize, Serialize};

/// One sense of a pronunciation, as stored in the `definitions` column.
///
/// `def` always holds the resolved text: the explicit definition, or the
/// joined quotes, or the joined links, whichever was first non-blank at
/// ingestion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    #[serde(rename = "type")]
    pub def_type: Option<String>,
    pub def: String,
    pub example: Option<Vec<String>>,
    pub quote: Option<Vec<String>>,
    pub link: Option<Vec<String>>,
}

pub fn encode_definitions(definitions: &[Definition]) -> Option<String> {
    serde_json::to_string(definitions)
        .map_err(|e| log::error!("Failed to encode definitions: {}", e))
        .ok()
}

/// Unknown keys are ignored and a column that does not decode reads as empty.
pub fn decode_definitions(raw: Option<&str>) -> Vec<Definition> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Definition>>(raw) {
        Ok(definitions) => definitions,
        Err(e) => {
            log::debug!("Ignoring undecodable definitions column: {}", e);
            Vec::new()
        }
    }
}
