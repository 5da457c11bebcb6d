//! Text-input element detection for quill.
//!
//! Pure domain logic - no I/O, no platform dependencies. Given the metadata
//! of a focused UI element, decide whether it looks like a text-input field.
//!
//! The classifier is deliberately permissive: it ORs several individually
//! weak heuristics and has no exclusion rules, favoring false positives over
//! missed detections. A stray indicator is a minor annoyance; a missed text
//! field makes the whole product invisible.

use serde::{Deserialize, Serialize};

/// Metadata of a focused UI element, as reported by the observation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Structural role tag (e.g. "android.widget.EditText", "TextArea").
    pub role: String,

    /// Whether the observation layer flags the element as editable.
    pub is_editable: bool,

    /// Accessibility content description, possibly empty.
    pub description: String,

    /// Current visible text of the element, possibly empty.
    pub text: String,
}

/// Role-tag fragments that identify editable-widget families.
///
/// Matched case-insensitively as substrings of the role tag.
pub const EDITABLE_ROLE_FRAGMENTS: &[&str] = &[
    "edittext",
    "edit_text",
    "input",
    "field",
    "textarea",
    "webview",
    "autocomplete",
    "searchview",
    "searchbox",
];

/// Content-description fragments that hint at a text-entry affordance.
pub const INPUT_HINT_FRAGMENTS: &[&str] = &["input", "text", "type", "enter", "search"];

/// Upper bound (exclusive) on text length for the "looks like typed content"
/// heuristic. Anything this long or longer is treated as a static label.
///
/// Tunable, but do not tighten it: short non-empty text is intentionally
/// enough on its own to classify an element as a text input.
pub const MAX_TYPED_TEXT_LEN: usize = 1000;

/// Decide whether a focused element represents a text-input field.
///
/// Returns true if ANY of the following holds:
/// - the role tag contains a fragment from [`EDITABLE_ROLE_FRAGMENTS`]
/// - the element is flagged editable
/// - the content description contains a fragment from [`INPUT_HINT_FRAGMENTS`]
/// - the element has non-empty text shorter than [`MAX_TYPED_TEXT_LEN`] chars
pub fn is_text_input(info: &ElementInfo) -> bool {
    if info.is_editable {
        return true;
    }

    let role = info.role.to_lowercase();
    if EDITABLE_ROLE_FRAGMENTS.iter().any(|f| role.contains(f)) {
        return true;
    }

    let description = info.description.to_lowercase();
    if !description.is_empty() && INPUT_HINT_FRAGMENTS.iter().any(|f| description.contains(f)) {
        return true;
    }

    let text_len = info.text.chars().count();
    text_len > 0 && text_len < MAX_TYPED_TEXT_LEN
}
