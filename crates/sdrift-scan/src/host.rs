//! # Host-Environment Vocabulary
//!
//! Members that belong to the runtime rather than to the data schema.
//! A root variable named like an interaction/request event shares its name
//! with the host's event object, so `event.preventDefault()` or
//! `e.parameter.page` must not be read as schema accesses.

/// Root names conventionally bound to a host event object.
pub const EVENT_ROOTS: &[&str] = &["event", "e", "evt"];

/// First segments that denote host event members, never schema fields.
pub const EVENT_MEMBERS: &[&str] = &[
    // DOM events
    "preventDefault",
    "stopPropagation",
    "stopImmediatePropagation",
    "currentTarget",
    "target",
    "relatedTarget",
    "key",
    "code",
    "keyCode",
    "which",
    "type",
    "detail",
    "defaultPrevented",
    "isTrusted",
    "timeStamp",
    "clientX",
    "clientY",
    "pageX",
    "pageY",
    "button",
    "buttons",
    "shiftKey",
    "ctrlKey",
    "altKey",
    "metaKey",
    "dataTransfer",
    // web-app request events
    "parameter",
    "parameters",
    "pathInfo",
    "queryString",
    "contentLength",
    "postData",
];

/// Trailing members of built-in arrays and strings.
pub const BUILTIN_TRAILING_MEMBERS: &[&str] = &["length"];

/// Host members excluded for `root`, empty for ordinary data roots.
pub fn host_members(root: &str) -> &'static [&'static str] {
    if EVENT_ROOTS.contains(&root) {
        EVENT_MEMBERS
    } else {
        &[]
    }
}

/// True if `root.first_segment` names a host member.
pub fn is_host_member(root: &str, first_segment: &str) -> bool {
    host_members(root).contains(&first_segment)
}
