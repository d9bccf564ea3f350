//! Turn a located range back into text.

use super::locator::SectionRange;

/// Slice `range` out of `text`.
///
/// Without `include_heading`, the heading line of a titled section is dropped
/// (everything up to and including the first `\n`). A titled section with no
/// line break after its heading renders as an empty string. The intro has no
/// heading and is always returned as is.
pub fn render(text: &str, range: SectionRange, include_heading: bool) -> &str {
    let body = text.get(range.offset..range.end()).unwrap_or_default();
    if include_heading || range.depth == 0 {
        return body;
    }
    match body.find('\n') {
        Some(pos) => &body[pos + 1..],
        None => "",
    }
}
