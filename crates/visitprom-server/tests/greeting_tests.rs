#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use visitprom_server::visit::{decode_path, escape_html, greeting, quote};

#[test]
fn escapes_html_significant_characters() {
    assert_eq!(
        escape_html(r#"<script>alert("x & 'y'")</script>"#),
        "&lt;script&gt;alert(&#34;x &amp; &#39;y&#39;&#34;)&lt;/script&gt;"
    );
    assert_eq!(escape_html("/plain/path"), "/plain/path");
}

#[test]
fn quotes_with_backslash_escapes() {
    assert_eq!(quote("/a"), r#""/a""#);
    assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    assert_eq!(quote("tab\there\n"), r#""tab\there\n""#);
    assert_eq!(quote("\u{1}"), r#""\x01""#);
    assert_eq!(quote("é"), "\"é\"");
}

#[test]
fn greeting_never_contains_raw_markup() {
    let g = greeting("/visit?<b>");
    assert_eq!(g, r#"Hello, "/visit?&lt;b&gt;""#);
    assert!(!g.contains('<'));
}

#[test]
fn decodes_percent_escapes() {
    assert_eq!(decode_path("/a%20b%3Cx%3E"), "/a b<x>");
    assert_eq!(decode_path("/caf%C3%A9"), "/café");
    assert_eq!(decode_path("/plain"), "/plain");
}

#[test]
fn malformed_escapes_are_kept() {
    assert_eq!(decode_path("/100%zz"), "/100%zz");
    assert_eq!(decode_path("/%FF"), "/\u{FFFD}");
}
