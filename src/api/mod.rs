//! WASM API
//!
//! JavaScript-facing conversion functions.
//!
//! # Module Structure
//!
//! - `helpers`: Console logging macros and error conversion
//! - `convert`: `convertMeiToCypher` and `convertMeiToCypherReport`

#[macro_use]
pub mod helpers;
pub mod convert;

use wasm_bindgen::prelude::*;

pub use convert::{convert_mei_to_cypher, convert_mei_to_cypher_report};

/// Installs the panic hook and the console logger when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Info).is_err() {
        wasm_warn!("console logger was already installed");
    }

    wasm_info!("musypher WASM module initialized");
}
