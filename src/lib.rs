//! fretlib — interactive guitar fretboard diagrams with animated string bends.
//!
//! Renders a six-string fretboard (label column, frets, inlays, notes) as SVG,
//! highlights scale positions or individual notes, and animates half- and
//! whole-tone bends driven by an external playback clock.
//!
//! # Example
//! ```
//! use fretlib::{FretboardConfig, FretboardController, HostBridge};
//!
//! let mut fretboard = FretboardController::new(FretboardConfig::default()).unwrap();
//! fretboard.load_scale("C Major Pentatonic").unwrap();
//! fretboard.highlight_positions(&["pos5"]);
//! fretboard.handle_bend_request(2, 7, 2);
//! fretboard.tick(150.0);
//! let svg = fretboard.render_svg();
//! assert!(svg.contains(r#"id="string-2""#));
//! ```

pub mod error;
pub mod model;
pub mod tuning;
pub mod pitch;
pub mod config;
pub mod renderer;
pub mod board;
pub mod highlight;
pub mod animation;
pub mod bridge;

#[cfg(target_os = "android")]
pub mod android;

pub use animation::{Animator, BendPlan, Phase, TimingCurve};
pub use board::{BoardState, GlyphTable};
pub use bridge::{FretboardController, HostBridge};
pub use config::{BendConfig, FretboardConfig};
pub use error::{FretError, Result};
pub use highlight::{HighlightReport, Selector};
pub use model::*;
pub use renderer::geometry::{FretboardGeometry, GridLayout, Point};
pub use renderer::render_board_to_svg;
pub use tuning::{builtin_scales, scale_by_name, standard_tuning};

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and other native hosts
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

unsafe fn controller<'a>(handle: *mut FretboardController) -> Option<&'a mut FretboardController> {
    unsafe { handle.as_mut() }
}

/// Create a fretboard. `config_json` may be null for the defaults.
/// Returns null if the configuration is invalid. Free with `fretlib_controller_free`.
///
/// # Safety
/// `config_json` must be null or a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn fretlib_controller_new(config_json: *const c_char) -> *mut FretboardController {
    let created = match unsafe { c_str(config_json) } {
        Some(json) => FretboardController::from_json(json),
        None if config_json.is_null() => FretboardController::new(FretboardConfig::default()),
        None => Err(FretError::MalformedInput("config is not valid UTF-8".into())),
    };
    match created {
        Ok(c) => Box::into_raw(Box::new(c)),
        Err(e) => {
            log::error!("fretlib_controller_new failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must come from `fretlib_controller_new` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn fretlib_controller_free(handle: *mut FretboardController) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}

/// # Safety
/// `handle` must be a live controller; `json` a valid C string or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_load_scale_pattern(handle: *mut FretboardController, json: *const c_char) {
    if let (Some(c), Some(json)) = unsafe { (controller(handle), c_str(json)) } {
        c.load_scale_pattern(json);
    }
}

/// # Safety
/// `handle` must be a live controller; `string_name` a valid C string or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_highlight_note(
    handle: *mut FretboardController,
    string_name: *const c_char,
    fret: i64,
) {
    if let (Some(c), Some(name)) = unsafe { (controller(handle), c_str(string_name)) } {
        c.highlight_note(name, fret);
    }
}

/// # Safety
/// `handle` must be a live controller; `json` a valid C string or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_highlight_notes(handle: *mut FretboardController, json: *const c_char) {
    if let (Some(c), Some(json)) = unsafe { (controller(handle), c_str(json)) } {
        c.highlight_notes(json);
    }
}

/// # Safety
/// `handle` must be a live controller or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_clear_note_highlights(handle: *mut FretboardController) {
    if let Some(c) = unsafe { controller(handle) } {
        c.clear_note_highlights();
    }
}

/// # Safety
/// `handle` must be a live controller or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_handle_bend_request(
    handle: *mut FretboardController,
    string_index: i64,
    fret: i64,
    halftones: i64,
) {
    if let Some(c) = unsafe { controller(handle) } {
        c.handle_bend_request(string_index, fret, halftones);
    }
}

/// Advance animations to `now_ms`. Returns true while a bend is running.
///
/// # Safety
/// `handle` must be a live controller or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_tick(handle: *mut FretboardController, now_ms: f64) -> bool {
    match unsafe { controller(handle) } {
        Some(c) => c.tick(now_ms),
        None => false,
    }
}

/// Current board as SVG. The caller must free the string with `fretlib_free_string`.
///
/// # Safety
/// `handle` must be a live controller or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_render_svg(handle: *mut FretboardController) -> *mut c_char {
    match unsafe { controller(handle) } {
        Some(c) => CString::new(c.render_svg()).unwrap_or_default().into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by fretlib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a fretlib function, or null.
#[no_mangle]
pub unsafe extern "C" fn fretlib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
