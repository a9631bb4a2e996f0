/// Escaping for Telegram's HTML parse mode.
///
/// Only `&`, `<` and `>` are special; everything else is sent as-is.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_plain() {
        assert_eq!(escape_html("hello world"), "hello world");
        assert_eq!(escape_html("temp42_17@yandex.com"), "temp42_17@yandex.com");
    }

    #[test]
    fn test_escape_html_special() {
        assert_eq!(escape_html("a < b"), "a &lt; b");
        assert_eq!(escape_html("a > b"), "a &gt; b");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_html_ampersand_first() {
        // Escaping must not double-escape the entities it produces.
        assert_eq!(escape_html("<&>"), "&lt;&amp;&gt;");
    }
}
