use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::error::CrawlError;

/// How a container is found inside a page or inside another container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Class(String),
    Tag(String),
}

impl Locator {
    fn css(&self) -> String {
        match self {
            // attribute form so ids starting with a digit stay valid CSS
            Locator::Id(id) => format!("[id=\"{id}\"]"),
            Locator::Class(class) => format!(".{class}"),
            Locator::Tag(tag) => tag.clone(),
        }
    }

    fn selector(&self) -> Result<Selector, CrawlError> {
        Selector::parse(&self.css()).map_err(|_| CrawlError::InvalidSelector {
            selector: self.to_string(),
        })
    }

    fn not_found(&self) -> CrawlError {
        CrawlError::ContainerNotFound {
            selector: self.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{id}"),
            Locator::Class(class) => write!(f, ".{class}"),
            Locator::Tag(tag) => write!(f, "<{tag}>"),
        }
    }
}

/// A parsed, read-only HTML document.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// First element in the document matching `locator`.
    pub fn locate(&self, locator: &Locator) -> Result<ElementRef<'_>, CrawlError> {
        let selector = locator.selector()?;
        self.html
            .select(&selector)
            .next()
            .ok_or_else(|| locator.not_found())
    }

    /// First descendant of `parent` matching `locator`.
    pub fn locate_within<'a>(
        &self,
        parent: ElementRef<'a>,
        locator: &Locator,
    ) -> Result<ElementRef<'a>, CrawlError> {
        let selector = locator.selector()?;
        parent
            .select(&selector)
            .next()
            .ok_or_else(|| locator.not_found())
    }
}

/// The next element after `element` on the same level that carries `class`.
pub fn next_sibling_with_class<'a>(
    element: ElementRef<'a>,
    class: &str,
) -> Result<ElementRef<'a>, CrawlError> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().classes().any(|c| c == class))
        .ok_or_else(|| CrawlError::ContainerNotFound {
            selector: format!("next sibling of {} with .{class}", describe(element)),
        })
}

fn describe(element: ElementRef) -> String {
    match element.value().id() {
        Some(id) => format!("#{id}"),
        None => format!("<{}>", element.value().name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_manipulators::extract_text;

    const PAGE: &str = r#"
        <html><body>
          <div id="c100" class="frame frame--type-textpic">
            <h2>Überschrift</h2>
            <p>Erster Block</p>
          </div>
          <div class="frame frame--type-text">Dazwischen</div>
          <div class="frame frame--type-textpic"><p>Zweiter Block</p></div>
          <div class="frame frame--type-textpic"><p>Dritter Block</p></div>
        </body></html>
    "#;

    #[test]
    fn test_locate_by_id_and_tag() {
        let page = Page::parse(PAGE);
        let container = page.locate(&Locator::Id("c100".to_string())).unwrap();
        let headline = page
            .locate_within(container, &Locator::Tag("h2".to_string()))
            .unwrap();
        assert_eq!(extract_text(headline), "Überschrift");
    }

    #[test]
    fn test_locate_by_class_returns_first() {
        let page = Page::parse(PAGE);
        let first = page
            .locate(&Locator::Class("frame--type-textpic".to_string()))
            .unwrap();
        assert_eq!(first.value().id(), Some("c100"));
    }

    #[test]
    fn test_missing_container_names_selector() {
        let page = Page::parse(PAGE);
        match page.locate(&Locator::Id("c999".to_string())) {
            Err(CrawlError::ContainerNotFound { selector }) => assert_eq!(selector, "#c999"),
            other => panic!("expected ContainerNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_next_sibling_skips_other_classes() {
        let page = Page::parse(PAGE);
        let container = page.locate(&Locator::Id("c100".to_string())).unwrap();
        let sibling = next_sibling_with_class(container, "frame--type-textpic").unwrap();
        assert_eq!(extract_text(sibling), "Zweiter Block");
    }

    #[test]
    fn test_next_sibling_missing() {
        let page = Page::parse(PAGE);
        let container = page.locate(&Locator::Id("c100".to_string())).unwrap();
        let err = next_sibling_with_class(container, "frame--type-video").unwrap_err();
        assert!(matches!(err, CrawlError::ContainerNotFound { .. }));
        assert!(err.to_string().contains("#c100"));
    }
}
