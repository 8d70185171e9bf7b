use std::borrow::Cow;

/// Decodes HTML character references (`&amp;`, `&copy;`, `&#39;`, ...) into the characters they name.
///
/// A non-breaking space becomes a plain space so it still separates words when
/// wrapping. Text without any `&` is returned borrowed.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    match html_escape::decode_html_entities(text) {
        Cow::Borrowed(unchanged) => Cow::Borrowed(unchanged),
        Cow::Owned(decoded) if decoded.contains('\u{a0}') => {
            Cow::Owned(decoded.replace('\u{a0}', " "))
        }
        Cow::Owned(decoded) => Cow::Owned(decoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(decode_entities("Hello"), Cow::Borrowed("Hello")));
    }

    #[test]
    fn decodes_markup_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&lt;b&gt; &quot;x&quot; &#39;y&#39;"), "<b> \"x\" 'y'");
    }

    #[test]
    fn decodes_symbol_entities() {
        assert_eq!(
            decode_entities("&copy; &reg; &trade; &euro; &pound; &yen; &cent;"),
            "© ® ™ € £ ¥ ¢"
        );
        assert_eq!(
            decode_entities("&sect;&para;&middot;&hellip;&ndash;&mdash;"),
            "§¶·…–—"
        );
    }

    #[test]
    fn nbsp_becomes_a_word_separator() {
        assert_eq!(decode_entities("a&nbsp;b"), "a b");
        assert_eq!(decode_entities("a&nbsp;b").split_whitespace().count(), 2);
    }

    #[test]
    fn bare_ampersand_is_kept() {
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
    }
}
