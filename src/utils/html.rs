use std::collections::HashSet;

use ammonia::Builder;

/// Reduces user-supplied display text to plain text.
///
/// Every tag is stripped; `<script>` and `<style>` lose their content too.
/// The result is plain text, not markup: `&` and `<` come back as written,
/// so clients must escape it when rendering.
pub fn clean_text(input: &str) -> String {
    let sanitized = Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string();
    unescape_text(&sanitized).trim().to_string()
}

/// Reverses the entity escaping the serializer applies to text nodes.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
fn unescape_text(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(clean_text("<b>Lin</b> Wei"), "Lin Wei");
    }

    #[test]
    fn drops_script_content() {
        assert_eq!(clean_text("mei<script>steal()</script>"), "mei");
    }

    #[test]
    fn plain_names_are_untouched() {
        assert_eq!(clean_text("  zhang_san  "), "zhang_san");
        assert_eq!(clean_text("苏绣传人"), "苏绣传人");
    }

    #[test]
    fn ampersands_and_angle_brackets_survive() {
        assert_eq!(clean_text("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(clean_text("a<3b"), "a<3b");
        assert_eq!(clean_text("x > y"), "x > y");
    }

    #[test]
    fn escaped_entity_text_is_not_double_decoded() {
        assert_eq!(unescape_text("&amp;lt;"), "&lt;");
    }
}
