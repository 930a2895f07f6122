//! Arabic Glyphs DLL
//!
//! C ABI bridge for host applications (document generators, label printers)
//! that need Arabic text pre-shaped into presentation forms.

use arabic_glyphs::Engine;
use log::error;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

const OK: c_int = 0;
const ERR_ARGUMENT: c_int = -1;
const ERR_SHAPING: c_int = -2;

/// Create an engine over the builtin shaping table.
///
/// Returns null when the table cannot be loaded. Release with
/// [`arabic_glyphs_cleanup`].
#[no_mangle]
pub extern "C" fn arabic_glyphs_init() -> *mut c_void {
    match Engine::new() {
        Ok(engine) => Box::into_raw(Box::new(engine)) as *mut c_void,
        Err(e) => {
            error!("Engine initialization failed: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Release an engine created by [`arabic_glyphs_init`].
#[no_mangle]
pub extern "C" fn arabic_glyphs_cleanup(context: *mut c_void) {
    if !context.is_null() {
        unsafe {
            let _ = Box::from_raw(context as *mut Engine);
        }
    }
}

/// Shape one line of UTF-8 text.
///
/// On success `*out` receives a string owned by the caller, to be released
/// with [`arabic_glyphs_free_string`].
#[no_mangle]
pub extern "C" fn arabic_glyphs_shape(
    context: *const c_void,
    text: *const c_char,
    out: *mut *mut c_char,
) -> c_int {
    let Some((engine, text)) = (unsafe { read_arguments(context, text, out) }) else {
        return ERR_ARGUMENT;
    };

    match engine.shape_to_glyphs(text) {
        Ok(shaped) => unsafe { write_output(shaped, out) },
        Err(e) => {
            error!("Shaping failed: {}", e);
            ERR_SHAPING
        }
    }
}

/// Soft-wrap UTF-8 text at `max_chars_per_line`, lines joined by `\n`.
///
/// A width of 0 uses the engine's configured `max_chars_per_line`.
#[no_mangle]
pub extern "C" fn arabic_glyphs_wrap(
    context: *const c_void,
    text: *const c_char,
    max_chars_per_line: usize,
    out: *mut *mut c_char,
) -> c_int {
    let Some((engine, text)) = (unsafe { read_arguments(context, text, out) }) else {
        return ERR_ARGUMENT;
    };

    let lines = match max_chars_per_line {
        0 => engine.wrap_lines(text),
        max => arabic_glyphs::wrap_lines(text, max),
    };
    unsafe { write_output(lines.join("\n"), out) }
}

/// Free a string returned through an `out` parameter.
#[no_mangle]
pub extern "C" fn arabic_glyphs_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

unsafe fn read_arguments<'a>(
    context: *const c_void,
    text: *const c_char,
    out: *mut *mut c_char,
) -> Option<(&'a Engine, &'a str)> {
    if context.is_null() || text.is_null() || out.is_null() {
        return None;
    }
    let engine = &*(context as *const Engine);
    match CStr::from_ptr(text).to_str() {
        Ok(text) => Some((engine, text)),
        Err(e) => {
            error!("Input is not valid UTF-8: {}", e);
            None
        }
    }
}

unsafe fn write_output(text: String, out: *mut *mut c_char) -> c_int {
    match CString::new(text) {
        Ok(c_string) => {
            *out = c_string.into_raw();
            OK
        }
        Err(e) => {
            error!("Output contains an interior NUL: {}", e);
            ERR_SHAPING
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn call_shape(context: *const c_void, text: &str) -> (c_int, Option<String>) {
        let input = CString::new(text).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = arabic_glyphs_shape(context, input.as_ptr(), &mut out);
        if out.is_null() {
            return (code, None);
        }
        let shaped = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        arabic_glyphs_free_string(out);
        (code, Some(shaped))
    }

    #[test]
    fn init_shape_cleanup() {
        let context = arabic_glyphs_init();
        assert!(!context.is_null());

        let (code, shaped) = call_shape(context, "يرجى التواصل على");
        assert_eq!(code, OK);
        assert_eq!(shaped.as_deref(), Some("ﻰﻠﻋ ﻞﺻاﻮﺘﻟا ﻰﺟﺮﻳ"));

        arabic_glyphs_cleanup(context);
    }

    #[test]
    fn shaping_errors_are_reported() {
        let context = arabic_glyphs_init();
        let (code, shaped) = call_shape(context, "\u{06BA}");
        assert_eq!(code, ERR_SHAPING);
        assert!(shaped.is_none());
        arabic_glyphs_cleanup(context);
    }

    #[test]
    fn null_arguments_are_rejected() {
        let mut out: *mut c_char = ptr::null_mut();
        let input = CString::new("x").unwrap();
        assert_eq!(arabic_glyphs_shape(ptr::null(), input.as_ptr(), &mut out), ERR_ARGUMENT);

        let context = arabic_glyphs_init();
        assert_eq!(arabic_glyphs_shape(context, ptr::null(), &mut out), ERR_ARGUMENT);
        assert_eq!(arabic_glyphs_shape(context, input.as_ptr(), ptr::null_mut()), ERR_ARGUMENT);
        arabic_glyphs_cleanup(context);

        arabic_glyphs_cleanup(ptr::null_mut());
        arabic_glyphs_free_string(ptr::null_mut());
    }

    fn call_wrap(context: *const c_void, text: &str, max: usize) -> String {
        let input = CString::new(text).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        assert_eq!(arabic_glyphs_wrap(context, input.as_ptr(), max, &mut out), OK);
        let wrapped = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        arabic_glyphs_free_string(out);
        wrapped
    }

    #[test]
    fn wrap_joins_lines() {
        let context = arabic_glyphs_init();
        assert_eq!(call_wrap(context, "aaa bbb ccc", 5), "aaa\nbbb\nccc");
        arabic_glyphs_cleanup(context);
    }

    #[test]
    fn zero_width_wraps_with_engine_options() {
        let mut engine = Engine::new().unwrap();
        engine.options_mut().max_chars_per_line = 3;
        let context = Box::into_raw(Box::new(engine)) as *mut c_void;
        assert_eq!(call_wrap(context, "aaa bbb", 0), "aaa\nbbb");
        arabic_glyphs_cleanup(context);

        let context = arabic_glyphs_init();
        assert_eq!(call_wrap(context, "aaa bbb", 0), "aaa bbb");
        arabic_glyphs_cleanup(context);
    }
}
