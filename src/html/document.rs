//! Typed access to parsed HTML.

use scraper::{Html, Selector};

/// Read-only view of an HTML document.
///
/// Link extraction only needs attribute values of a given tag, so this is the
/// whole surface it depends on.
pub trait HtmlDocument {
    /// Values of `attribute` on every `tag` element that carries it, in
    /// document order.
    fn attribute_values(&self, tag: &str, attribute: &str) -> Vec<String>;

    /// Value of `attribute` on the first `tag` element that carries it.
    fn first_attribute_value(&self, tag: &str, attribute: &str) -> Option<String> {
        self.attribute_values(tag, attribute).into_iter().next()
    }
}

/// An HTML document parsed with `scraper`.
pub struct ParsedHtml {
    html: Html,
}

impl ParsedHtml {
    /// Parse a full HTML document. Parsing is lenient and never fails.
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }
}

impl HtmlDocument for ParsedHtml {
    fn attribute_values(&self, tag: &str, attribute: &str) -> Vec<String> {
        let selector = match Selector::parse(&format!("{}[{}]", tag, attribute)) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::debug!("Invalid selector {}[{}]: {:?}", tag, attribute, e);
                return Vec::new();
            }
        };

        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr(attribute))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_values_in_document_order() {
        let doc = ParsedHtml::parse(
            r#"<html><body>
            <a href="one.pdf">1</a>
            <a name="no-href">skip</a>
            <p><a href="two.pdf">2</a></p>
            </body></html>"#,
        );

        assert_eq!(doc.attribute_values("a", "href"), vec!["one.pdf", "two.pdf"]);
    }

    #[test]
    fn test_first_attribute_value() {
        let doc = ParsedHtml::parse(
            r#"<html><head><base href="http://x.com/docs/"><base href="http://y.com/"></head></html>"#,
        );

        assert_eq!(
            doc.first_attribute_value("base", "href").as_deref(),
            Some("http://x.com/docs/")
        );
        assert_eq!(doc.first_attribute_value("link", "href"), None);
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let doc = ParsedHtml::parse(r#"<a href="broken.pdf">unclosed <div><a href=other.pdf>"#);
        assert_eq!(doc.attribute_values("a", "href").len(), 2);
    }
}
