// Exports a function, but not the plugin entry point.
#[no_mangle]
pub extern "C" fn pluma_plugin_entry_v0() -> u32 {
    0
}
