use std::ffi::c_void;

#[no_mangle]
pub extern "C" fn pluma_plugin_entry() -> *const c_void {
    std::ptr::null()
}
