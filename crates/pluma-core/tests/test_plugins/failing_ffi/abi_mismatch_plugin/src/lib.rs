use std::ffi::c_char;

// Same shape as the host's header, with an ABI version it will never accept.
#[repr(C)]
pub struct Header {
    abi_version: u32,
    core_version: *const c_char,
}

unsafe impl Sync for Header {}

static HEADER: Header = Header {
    abi_version: 9999,
    core_version: b"0.1.0\0".as_ptr() as *const c_char,
};

#[no_mangle]
pub extern "C" fn pluma_plugin_entry() -> *const Header {
    &HEADER
}
