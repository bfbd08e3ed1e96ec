//! Plain text of marked-up entry descriptions.
//!
//! Feed descriptions are HTML fragments, often entity-escaped a second time.
//! Filters match the readable text only: comments are dropped, and so is
//! everything inside the elements in [`STRIPPED_ELEMENTS`], so tag names,
//! attributes and link targets never match a pattern.

use scraper::{Html, Node};
use std::borrow::Cow;

/// Elements removed together with their content.
pub const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "img", "a", "video", "audio", "iframe", "input",
];

/// Text content of an HTML fragment.
///
/// Input without markup or entities is returned as is. A fragment that is
/// entirely entity-escaped (`&lt;p&gt;...`) is decoded first and then
/// cleaned like regular markup.
///
/// # Example
/// ```rust
/// use feed_filter::matcher::plain_text;
///
/// let text = plain_text(r#"<p>Nice <a href="https://ads.example">click</a></p><!-- SC_OFF -->"#);
/// assert_eq!(text, "Nice ");
/// ```
pub fn plain_text(raw: &str) -> Cow<'_, str> {
    let has_markup = raw.contains('<');
    if !has_markup && !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    if has_markup {
        return Cow::Owned(fragment_text(raw));
    }

    let decoded = fragment_text(raw);
    if decoded.contains('<') {
        Cow::Owned(fragment_text(&decoded))
    } else {
        Cow::Owned(decoded)
    }
}

fn fragment_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut text = String::with_capacity(raw.len());

    for node in fragment.tree.root().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let stripped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| STRIPPED_ELEMENTS.contains(&element.name()))
        });
        if !stripped {
            text.push_str(chunk);
        }
    }

    text
}
