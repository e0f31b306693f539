/// Escape user-supplied text for embedding in a generated HTML document.
///
/// Reports show comments verbatim, so nothing is interpreted as markup:
/// every character that could open a tag or attribute is entity-encoded.
pub fn escape_text(input: &str) -> String {
    ammonia::clean_text(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_neutralized() {
        let escaped = escape_text("<script>alert('x')</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(escaped.contains("&lt;script&gt;"));
    }
}
