//! Demo visit endpoint.
//!
//! Every request, whatever its method, counts one visit under
//! `[counter_name, path, service_addr]` and gets `Hello, "<path>"` back. The
//! path is percent-decoded first; the greeting appends the raw query and is
//! HTML-escaped and quoted.

use std::borrow::Cow;
use std::fmt::Write;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn visit(State(state): State<AppState>, uri: Uri) -> Response {
    let path = decode_path(uri.path());
    let path: &str = &path;
    let cfg = state.cfg();

    // A failed count never fails the visit.
    if let Err(e) = state
        .prom()
        .incr(&cfg.metrics.counter_name, &[path, cfg.server.service_addr.as_str()])
    {
        tracing::warn!(code = e.code().as_str(), error = %e, path, "visit not counted");
    }

    let shown = match uri.query() {
        Some(q) => Cow::Owned(format!("{path}?{q}")),
        None => Cow::Borrowed(path),
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        greeting(&shown),
    )
        .into_response()
}

/// Percent-decode a request path. Malformed escapes are kept as written and
/// invalid UTF-8 is replaced.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(raw.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(raw),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// `Hello, "<escaped>"` for a request target.
pub fn greeting(target: &str) -> String {
    format!("Hello, {}", quote(&escape_html(target)))
}

/// Escape `& ' < > "` as HTML entities.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap in double quotes, backslash-escaping quotes, backslashes and control characters.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && (c as u32) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
