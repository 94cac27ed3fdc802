//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge. The Kotlin side
//! keeps the controller as an opaque `Long` handle.

use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jdouble, jint, jlong, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;

use crate::bridge::{FretboardController, HostBridge};
use crate::config::FretboardConfig;

fn controller<'a>(handle: jlong) -> Option<&'a mut FretboardController> {
    // Handles are only ever produced by `create` below.
    unsafe { (handle as *mut FretboardController).as_mut() }
}

fn read_string(env: &mut JNIEnv, s: &JString) -> Option<String> {
    if s.is_null() {
        return None;
    }
    env.get_string(s).ok().map(|s| s.into())
}

/// Called from Kotlin as:
///   external fun create(configJson: String?): Long
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_create(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
) -> jlong {
    let created = match read_string(&mut env, &config_json) {
        Some(json) => FretboardController::from_json(&json),
        None => FretboardController::new(FretboardConfig::default()),
    };
    match created {
        Ok(c) => Box::into_raw(Box::new(c)) as jlong,
        Err(e) => {
            log::error!("Fretboard.create failed: {e}");
            0
        }
    }
}

/// external fun destroy(handle: Long)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_destroy(_env: JNIEnv, _class: JClass, handle: jlong) {
    if handle != 0 {
        unsafe {
            let _ = Box::from_raw(handle as *mut FretboardController);
        }
    }
}

/// external fun loadScalePattern(handle: Long, json: String)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_loadScalePattern(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    json: JString,
) {
    if let (Some(c), Some(json)) = (controller(handle), read_string(&mut env, &json)) {
        c.load_scale_pattern(&json);
    }
}

/// external fun highlightNote(handle: Long, stringName: String, fret: Int)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_highlightNote(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    string_name: JString,
    fret: jint,
) {
    if let (Some(c), Some(name)) = (controller(handle), read_string(&mut env, &string_name)) {
        c.highlight_note(&name, fret as i64);
    }
}

/// external fun highlightNotes(handle: Long, json: String)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_highlightNotes(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    json: JString,
) {
    if let (Some(c), Some(json)) = (controller(handle), read_string(&mut env, &json)) {
        c.highlight_notes(&json);
    }
}

/// external fun clearNoteHighlights(handle: Long)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_clearNoteHighlights(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if let Some(c) = controller(handle) {
        c.clear_note_highlights();
    }
}

/// external fun handleBendRequest(handle: Long, stringIndex: Int, fret: Int, halftones: Int)
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_handleBendRequest(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    string_index: jint,
    fret: jint,
    halftones: jint,
) {
    if let Some(c) = controller(handle) {
        c.handle_bend_request(string_index as i64, fret as i64, halftones as i64);
    }
}

/// external fun tick(handle: Long, nowMs: Double): Boolean
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_tick(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    now_ms: jdouble,
) -> jboolean {
    match controller(handle) {
        Some(c) if c.tick(now_ms) => JNI_TRUE,
        _ => JNI_FALSE,
    }
}

/// external fun renderSvg(handle: Long): String?
#[no_mangle]
pub extern "system" fn Java_com_fretlib_app_Fretboard_renderSvg(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    let Some(c) = controller(handle) else {
        return std::ptr::null_mut();
    };
    match env.new_string(c.render_svg()) {
        Ok(js) => js.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}
