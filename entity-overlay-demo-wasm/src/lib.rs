use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

mod legend;

pub use legend::{Legend, LegendEntry};

use entity_overlay::{resolve_overlaps, Domain, NerResponse};

// Set up panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Result of rendering one service response.
///
/// Exactly one of `html` and `error` is set. A failed render is never
/// reported as an empty result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Entities rendered (after overlap resolution)
    pub entity_count: usize,
    pub domain: String,
}

/// Render the JSON body returned by the NER endpoint.
///
/// `domain` picks the color table ("financial", anything else is medical).
/// With `dedupe`, overlapping entities are dropped before rendering instead
/// of failing the call.
#[wasm_bindgen]
pub fn render_entities(response_json: &str, domain: &str, dedupe: bool) -> JsValue {
    let result = render_entities_internal(response_json, domain, dedupe);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn render_entities_internal(response_json: &str, domain: &str, dedupe: bool) -> RenderResponse {
    let domain = Domain::from_name(domain);
    let failed = |message: String| RenderResponse {
        html: None,
        error: Some(message),
        entity_count: 0,
        domain: domain.name().to_string(),
    };

    let mut response = match NerResponse::from_json(response_json) {
        Ok(response) => response,
        Err(err) => return failed(err.to_string()),
    };
    if dedupe {
        response.entities = resolve_overlaps(response.entities);
    }

    match response.render(domain.color_table()) {
        Ok(annotated) => RenderResponse {
            html: Some(annotated.to_html()),
            error: None,
            entity_count: response.entities.len(),
            domain: domain.name().to_string(),
        },
        Err(err) => failed(err.to_string()),
    }
}

/// Labels and colors of the given domain, for a legend.
#[wasm_bindgen]
pub fn domain_legend(domain: &str) -> JsValue {
    let result = legend::legend(Domain::from_name(domain));
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}
