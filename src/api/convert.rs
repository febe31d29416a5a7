//! MEI conversion entry points for JavaScript

use wasm_bindgen::prelude::*;

use crate::converters::mei::{convert_mei_to_cypher as convert_mei, ConversionResult, ConversionSettings};

use super::helpers::js_error;

fn run(source_name: &str, mei: &str, settings: ConversionSettings) -> Result<ConversionResult, JsValue> {
    wasm_log!("  settings: {:?}", settings);
    let result = convert_mei(source_name, mei, Some(settings))
        .map_err(|e| js_error("Conversion error", e))?;

    wasm_info!("  {}: {} statements", result.dump_id, result.statement_count);
    for warning in &result.warnings {
        wasm_warn!("  {}", warning.message);
    }
    Ok(result)
}

/// Convert an MEI document and return the Cypher dump.
#[wasm_bindgen(js_name = convertMeiToCypher)]
pub fn convert_mei_to_cypher(source_name: String, mei: String, verbose: bool) -> Result<String, JsValue> {
    wasm_info!("convertMeiToCypher called for {}", source_name);

    let settings = ConversionSettings {
        verbose,
        ..ConversionSettings::default()
    };
    Ok(run(&source_name, &mei, settings)?.cypher)
}

/// Convert an MEI document and return the whole result (dump, id, warnings)
/// as JSON.
///
/// `settings_json` is an optional JSON `ConversionSettings` object.
#[wasm_bindgen(js_name = convertMeiToCypherReport)]
pub fn convert_mei_to_cypher_report(
    source_name: String,
    mei: String,
    settings_json: Option<String>,
) -> Result<String, JsValue> {
    wasm_info!("convertMeiToCypherReport called for {}", source_name);

    let settings: ConversionSettings = match settings_json {
        Some(json) => serde_json::from_str(&json).map_err(|e| js_error("Settings parse error", e))?,
        None => ConversionSettings::default(),
    };

    let result = run(&source_name, &mei, settings)?;
    serde_json::to_string(&result).map_err(|e| js_error("Result serialization error", e))
}
