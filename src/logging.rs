//! Browser logging setup.

use wasm_bindgen::prelude::*;

/// Module start hook: installs the console logger at `Info`.
#[wasm_bindgen(start)]
pub fn start() {
    init_logging(log::Level::Info);
}

/// Route `log` records to the browser console and install the panic hook.
///
/// Safe to call more than once; later calls keep the first logger.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
    log::debug!("gridview logger at {level}");
}
