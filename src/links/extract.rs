// ABOUTME: Finds link-bearing attributes in markup without a full HTML parser.
// ABOUTME: Reports each reference with the byte span of its value for in-place rewriting.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<([a-z][a-z0-9]*)\b([^>]*)>").expect("tag pattern is valid")
});

static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern is valid")
});

/// `meta` tags only count when their `property` names one of these.
const META_URL_PROPERTIES: [&str; 3] = ["og:image", "og:url", "twitter:image"];

/// A URL-valued attribute found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub tag: String,
    pub attr: &'static str,
    pub value: String,
    /// Byte range of `value` inside the scanned text.
    pub span: Range<usize>,
}

/// Attribute that carries a link for `tag`, if `tag` is one we check.
fn link_attr(tag: &str) -> Option<&'static str> {
    match tag {
        "a" | "link" => Some("href"),
        "script" | "img" | "source" | "iframe" => Some("src"),
        "meta" => Some("content"),
        _ => None,
    }
}

/// Every checked reference in `text`, in document order. Empty values are skipped.
pub fn references(text: &str) -> Vec<Reference> {
    let mut found = Vec::new();

    for tag in TAG.captures_iter(text) {
        let (Some(name), Some(attrs)) = (tag.get(1), tag.get(2)) else {
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        let Some(wanted) = link_attr(&name) else {
            continue;
        };

        let mut value = None;
        let mut property = None;
        for attr in ATTR.captures_iter(attrs.as_str()) {
            let Some(key) = attr.get(1) else { continue };
            let Some(val) = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4)) else {
                continue;
            };
            let key = key.as_str().to_ascii_lowercase();
            let absolute = attrs.start() + val.start()..attrs.start() + val.end();

            if key == wanted && value.is_none() {
                value = Some((val.as_str().to_string(), absolute));
            } else if key == "property" {
                property = Some(val.as_str().to_string());
            }
        }

        if name == "meta"
            && !property
                .as_deref()
                .is_some_and(|p| META_URL_PROPERTIES.contains(&p))
        {
            continue;
        }

        if let Some((value, span)) = value
            && !value.is_empty()
        {
            found.push(Reference {
                tag: name,
                attr: wanted,
                value,
                span,
            });
        }
    }

    found
}
