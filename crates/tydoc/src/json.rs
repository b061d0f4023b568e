use chrono::Utc;
use serde::Serialize;

use crate::{error::Result, model::Documentation};

/// JSON representation of the documentation model including metadata.
pub fn to_json(doc: &Documentation, pretty: bool) -> Result<String> {
    let payload = JsonPayload {
        version: env!("CARGO_PKG_VERSION"),
        generated_at: Utc::now().to_rfc3339(),
        documentation: doc,
    };

    let text = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    Ok(text)
}

/// Pretty-printed [`to_json`].
pub fn render_json(doc: &Documentation) -> Result<String> {
    to_json(doc, true)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPayload<'a> {
    version: &'static str,
    generated_at: String,
    documentation: &'a Documentation,
}
