//! FFI bindings for Sleepin
//!
//! This module provides C-compatible functions for calling the engine from the
//! mobile host. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `sleepin_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{advice_json, score_json, trend_json, GrowthTracker};
use crate::types::{GrowthState, TaskDifficulty};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Caller must free the result with `sleepin_free_string`
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn result_to_cstr<E: std::fmt::Display>(result: Result<String, E>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score a night. Takes the input JSON and returns the score result JSON.
///
/// # Safety
/// - `input_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
/// - Returns NULL on error; call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_calculate_score(input_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(input_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    result_to_cstr(score_json(&json_str))
}

/// Select advice for a score and a stored sleep record (JSON).
///
/// # Safety
/// - `record_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
/// - Returns NULL on error; call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_generate_advice(
    score: u32,
    record_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(record_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid record string pointer");
            return ptr::null_mut();
        }
    };

    result_to_cstr(advice_json(score, &json_str))
}

/// Classify a JSON array of recent scores (most recent first).
///
/// # Safety
/// - `scores_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
/// - Returns NULL on error; call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_trend_message(scores_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(scores_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid scores string pointer");
            return ptr::null_mut();
        }
    };

    result_to_cstr(trend_json(&json_str))
}

// ============================================================================
// Growth Tracker API
// ============================================================================

/// Opaque handle to a GrowthTracker. Not safe to share between threads.
pub struct GrowthTrackerHandle {
    tracker: GrowthTracker,
}

/// Create a tracker starting at `initial_points`.
///
/// # Safety
/// - Returns a pointer to a newly allocated tracker.
/// - Must be freed with `sleepin_tracker_free`.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_new(initial_points: u32) -> *mut GrowthTrackerHandle {
    clear_last_error();

    let tracker = GrowthTracker::from_state(GrowthState::from_points(initial_points));
    Box::into_raw(Box::new(GrowthTrackerHandle { tracker }))
}

/// Free a tracker.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `sleepin_tracker_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_free(tracker: *mut GrowthTrackerHandle) {
    if !tracker.is_null() {
        drop(Box::from_raw(tracker));
    }
}

/// Record a completed task and return the new growth state as JSON.
///
/// `difficulty` of 0 or below means "not set" and counts as level 1.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `sleepin_tracker_new`.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
/// - Returns NULL on error; call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_complete_task(
    tracker: *mut GrowthTrackerHandle,
    difficulty: i32,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }

    let difficulty = if difficulty <= 0 {
        None
    } else {
        match TaskDifficulty::new(i64::from(difficulty)) {
            Ok(d) => Some(d),
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    let handle = &mut *tracker;
    let state = handle.tracker.complete_task(difficulty);
    result_to_cstr(serde_json::to_string(&state))
}

/// Return the variant to display as JSON (`quality`, `stage`, `file_name`).
///
/// A negative `score` means no score is available.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `sleepin_tracker_new`.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_variant(
    tracker: *const GrowthTrackerHandle,
    score: i32,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }

    let handle = &*tracker;
    let score = u32::try_from(score).ok();
    let variant = handle.tracker.variant(score);
    let payload = serde_json::json!({
        "quality": variant.quality,
        "stage": variant.stage,
        "file_name": variant.file_name(),
    });
    result_to_cstr(serde_json::to_string(&payload))
}

/// Save tracker state to JSON.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `sleepin_tracker_new`.
/// - Returns a newly allocated string that must be freed with `sleepin_free_string`.
/// - Returns NULL on error; call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_save_state(
    tracker: *const GrowthTrackerHandle,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }

    let handle = &*tracker;
    result_to_cstr(handle.tracker.save_state())
}

/// Load tracker state from JSON.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `sleepin_tracker_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `sleepin_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sleepin_tracker_load_state(
    tracker: *mut GrowthTrackerHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return -1;
    }

    let handle = &mut *tracker;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.tracker.load_state(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Sleepin functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Sleepin function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn sleepin_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Sleepin function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn sleepin_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn sleepin_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
