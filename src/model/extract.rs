//! Defensive extraction of answer text from a generation response.
//!
//! Response shape drifts between model families, so extraction probes an
//! ordered list of known locations over a generic parsed structure rather
//! than deserializing into a rigid type. First non-empty match wins.

use serde_json::Value;

/// Standard generateContent shape.
fn probe_candidate_parts(v: &Value) -> Option<&str> {
    v.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Some model families flatten `content` into an array.
fn probe_flattened_content(v: &Value) -> Option<&str> {
    v.get("candidates")?
        .get(0)?
        .get("content")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Legacy `output` shape.
fn probe_output(v: &Value) -> Option<&str> {
    v.get("output")?
        .get(0)?
        .get("content")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Try the known locations of the answer text, in order.
pub fn extract_text(data: &Value) -> Option<String> {
    let probes: [fn(&Value) -> Option<&str>; 3] = [
        probe_candidate_parts,
        probe_flattened_content,
        probe_output,
    ];

    probes
        .iter()
        .find_map(|probe| probe(data).filter(|text| !text.is_empty()))
        .map(String::from)
}

/// Block reason reported by the provider's prompt feedback, if any.
pub fn block_reason(data: &Value) -> Option<&str> {
    data.get("promptFeedback")?.get("blockReason")?.as_str()
}
