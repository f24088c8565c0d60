#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for turning `$ref` pointers into component names.
//!
//! These utilities never fetch external documents; only references into the
//! current document are followed.

use percent_encoding::percent_decode_str;

/// Takes the final segment of a slash-delimited pointer as a component name.
///
/// `#/components/schemas/User` and `./models.yaml#/User` both yield `User`.
pub fn last_segment_name(ref_str: &str) -> Option<String> {
    let segment = ref_str.rsplit('/').next()?;
    let name = decode_pointer_segment(segment.trim_start_matches('#'));
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` if the reference is not local to the current document.
pub(crate) fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
