//! FFI bindings for Synheart Focus
//!
//! This module provides C-compatible functions for calling Focus from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `focus_free_string`.
//!
//! A NULL result with a NULL `focus_last_error` means the frame was invalid and
//! produced no metrics; a NULL result with an error set means the call failed.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::encoder::FeedbackEncoder;
use crate::error::ComputeError;
use crate::pipeline::{compute_frame_metrics, TrackingSession};
use crate::schema::parse_frame_json;
use crate::types::FrameMetrics;

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

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Parse an optional config JSON pointer; NULL selects the defaults
unsafe fn config_from_ptr(config_json: *const c_char) -> Result<EngineConfig, ComputeError> {
    if config_json.is_null() {
        return Ok(EngineConfig::default());
    }
    match cstr_to_string(config_json) {
        Some(json) => EngineConfig::from_json(&json),
        None => Err(ComputeError::ParseError(
            "Config string is not valid UTF-8".to_string(),
        )),
    }
}

fn metrics_to_cstr(metrics: &FrameMetrics) -> *mut c_char {
    match serde_json::to_string(metrics) {
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

/// Compute metrics for one frame with no history.
///
/// # Safety
/// - `frame_json` must be a valid null-terminated C string.
/// - `config_json` may be NULL to use the default configuration.
/// - Returns a newly allocated string that must be freed with `focus_free_string`.
/// - Returns NULL for an invalid frame (no error set) or on error (call `focus_last_error`).
#[no_mangle]
pub unsafe extern "C" fn focus_compute_frame(
    frame_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let frame_str = match cstr_to_string(frame_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid frame string pointer");
            return ptr::null_mut();
        }
    };

    let config = match config_from_ptr(config_json) {
        Ok(c) => c,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match parse_frame_json(&frame_str) {
        Ok(record) => match compute_frame_metrics(&record.landmarks, &config) {
            Some(metrics) => metrics_to_cstr(&metrics),
            None => ptr::null_mut(),
        },
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Build the speech feedback request body for a metrics record.
///
/// # Safety
/// - `metrics_json` must be a valid null-terminated C string holding a metrics record.
/// - `locale` may be NULL, which selects English.
/// - Returns a newly allocated string that must be freed with `focus_free_string`.
/// - Returns NULL on error; call `focus_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn focus_feedback_request(
    metrics_json: *const c_char,
    locale: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let metrics_str = match cstr_to_string(metrics_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid metrics string pointer");
            return ptr::null_mut();
        }
    };
    let locale_str = cstr_to_string(locale).unwrap_or_default();

    let metrics: FrameMetrics = match serde_json::from_str(&metrics_str) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(&ComputeError::JsonError(e).to_string());
            return ptr::null_mut();
        }
    };

    match FeedbackEncoder::new().encode_to_json(&metrics, &locale_str) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Session API
// ============================================================================

/// Opaque handle to a TrackingSession
pub struct FocusSessionHandle {
    session: TrackingSession,
}

/// Create a new tracking session.
///
/// # Safety
/// - `config_json` may be NULL to use the default configuration.
/// - Returns a pointer to a newly allocated session; free with `focus_session_free`.
/// - Returns NULL if the configuration is invalid; call `focus_last_error`.
#[no_mangle]
pub unsafe extern "C" fn focus_session_new(config_json: *const c_char) -> *mut FocusSessionHandle {
    clear_last_error();

    let session = match config_from_ptr(config_json).and_then(TrackingSession::with_config) {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    Box::into_raw(Box::new(FocusSessionHandle { session }))
}

/// Free a tracking session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn focus_session_free(session: *mut FocusSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Process one frame with a tracking session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - `frame_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `focus_free_string`.
/// - Returns NULL for an invalid frame (no error set) or on error (call `focus_last_error`).
#[no_mangle]
pub unsafe extern "C" fn focus_session_process(
    session: *mut FocusSessionHandle,
    frame_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }
    let handle = &mut *session;

    let frame_str = match cstr_to_string(frame_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid frame string pointer");
            return ptr::null_mut();
        }
    };

    match handle.session.process_json(&frame_str) {
        Ok(Some(metrics)) => metrics_to_cstr(&metrics),
        Ok(None) => ptr::null_mut(),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Number of frames currently held in the session's rolling history.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - Returns -1 for a NULL session.
#[no_mangle]
pub unsafe extern "C" fn focus_session_history_len(session: *const FocusSessionHandle) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }
    i32::try_from((*session).session.history().len()).unwrap_or(i32::MAX)
}

/// Clear the session's rolling history and aggregates.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - Returns 0 on success, -1 for a NULL session.
#[no_mangle]
pub unsafe extern "C" fn focus_session_reset(session: *mut FocusSessionHandle) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }
    (*session).session.reset();
    0
}

/// Summarize every frame the session has processed.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - Returns a newly allocated string that must be freed with `focus_free_string`.
/// - Returns NULL with no error set when no frame has been processed yet.
#[no_mangle]
pub unsafe extern "C" fn focus_session_summary(session: *const FocusSessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    match (*session).session.summary() {
        Some(summary) => match serde_json::to_string(&summary) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        None => ptr::null_mut(),
    }
}

/// Save the session's rolling history to JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - Returns a newly allocated string that must be freed with `focus_free_string`.
/// - Returns NULL on error; call `focus_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn focus_session_save_history(
    session: *const FocusSessionHandle,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    match (*session).session.save_history() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load the session's rolling history from JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `focus_session_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, -1 on error; call `focus_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn focus_session_load_history(
    session: *mut FocusSessionHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }
    let handle = &mut *session;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.session.load_history(&json_str) {
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

/// Free a string returned by Focus functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Focus function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn focus_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Focus function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn focus_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Focus library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn focus_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FrameBuilder;

    fn frame_json() -> CString {
        let landmarks = FrameBuilder::new().build();
        CString::new(serde_json::to_string(&landmarks).unwrap()).unwrap()
    }

    unsafe fn take_string(ptr: *mut c_char) -> String {
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        focus_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_compute_frame() {
        let frame = frame_json();
        unsafe {
            let result = focus_compute_frame(frame.as_ptr(), ptr::null());
            assert!(!result.is_null());

            let json = take_string(result);
            assert!(json.contains("\"gazeDirection\":\"center\""));
            assert!(json.contains("compositeCognitiveIndex"));
        }
    }

    #[test]
    fn test_ffi_invalid_frame_is_not_an_error() {
        let short = CString::new("[]").unwrap();
        unsafe {
            let result = focus_compute_frame(short.as_ptr(), ptr::null());
            assert!(result.is_null());
            assert!(focus_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_session_lifecycle() {
        let frame = frame_json();
        unsafe {
            let session = focus_session_new(ptr::null());
            assert!(!session.is_null());
            assert!(focus_session_summary(session).is_null());

            for _ in 0..3 {
                let result = focus_session_process(session, frame.as_ptr());
                assert!(!result.is_null());
                focus_free_string(result);
            }
            assert_eq!(focus_session_history_len(session), 3);

            let summary = take_string(focus_session_summary(session));
            assert!(summary.contains("\"frames\":3"));

            let saved = focus_session_save_history(session);
            assert!(!saved.is_null());

            let session2 = focus_session_new(ptr::null());
            assert_eq!(focus_session_load_history(session2, saved), 0);
            assert_eq!(focus_session_history_len(session2), 3);
            focus_free_string(saved);

            assert_eq!(focus_session_reset(session), 0);
            assert_eq!(focus_session_history_len(session), 0);

            focus_session_free(session);
            focus_session_free(session2);
        }
    }

    #[test]
    fn test_ffi_session_config() {
        let config = CString::new(r#"{"history_capacity": 2}"#).unwrap();
        let bad = CString::new(r#"{"history_capacity": 0}"#).unwrap();
        let frame = frame_json();
        unsafe {
            let session = focus_session_new(config.as_ptr());
            assert!(!session.is_null());
            for _ in 0..5 {
                focus_free_string(focus_session_process(session, frame.as_ptr()));
            }
            assert_eq!(focus_session_history_len(session), 2);
            focus_session_free(session);

            assert!(focus_session_new(bad.as_ptr()).is_null());
            assert!(!focus_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_rejects_oversized_capacity_and_bad_history() {
        let huge = CString::new(r#"{"history_capacity": 100000000000000}"#).unwrap();
        let bad_history =
            CString::new(r#"{"blink_values":[7.0],"attention_values":[50,50,50],"capacity":30}"#)
                .unwrap();
        unsafe {
            assert!(focus_session_new(huge.as_ptr()).is_null());
            assert!(!focus_last_error().is_null());

            let session = focus_session_new(ptr::null());
            assert_eq!(focus_session_load_history(session, bad_history.as_ptr()), -1);
            assert!(!focus_last_error().is_null());
            assert_eq!(focus_session_history_len(session), 0);
            focus_session_free(session);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not json").unwrap();
        unsafe {
            let session = focus_session_new(ptr::null());
            let result = focus_session_process(session, invalid.as_ptr());
            assert!(result.is_null());

            let error = focus_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            assert!(focus_session_process(ptr::null_mut(), invalid.as_ptr()).is_null());
            assert_eq!(focus_session_history_len(ptr::null()), -1);
            focus_session_free(session);
        }
    }

    #[test]
    fn test_ffi_feedback_request() {
        let frame = frame_json();
        let locale = CString::new("es-MX").unwrap();
        unsafe {
            let metrics = focus_compute_frame(frame.as_ptr(), ptr::null());
            let request = focus_feedback_request(metrics, locale.as_ptr());
            focus_free_string(metrics);

            let json = take_string(request);
            assert!(json.contains("\"language\":\"es\""));
            assert!(json.contains("Direction: CENTER"));
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = focus_version();
            assert!(!version.is_null());
            assert!(!CStr::from_ptr(version).to_str().unwrap().is_empty());
        }
    }
}
