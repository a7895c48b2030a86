// src/core/html.rs
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;

pub static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
pub static TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector"));

/// `table` + space-separated class list → `table.a.b.c`.
pub fn class_selector(tag: &str, classes: &str) -> Result<Selector, String> {
    let mut css = s!(tag);
    for class in classes.split_whitespace() {
        css.push('.');
        css.push_str(class);
    }
    Selector::parse(&css).map_err(|e| e.to_string())
}

/// Direct element children with the given tag name (case-insensitive).
/// Nested tables never leak rows or cells into the parent this way.
pub fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name().eq_ignore_ascii_case(tag))
}

/// All descendant text, whitespace collapsed and trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    normalize_ws(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn class_selector_requires_every_class() {
        let doc = Html::parse_document(
            r#"<table class="table striped"><tr><td>a</td></tr></table>
               <table class="table table-success striped"><tr><td>b</td></tr></table>"#,
        );
        let sel = class_selector("table", "table  table-success").unwrap();
        let hit = doc.select(&sel).next().unwrap();
        assert_eq!(text_of(hit), "b");
    }

    #[test]
    fn class_selector_rejects_bad_identifiers() {
        assert!(class_selector("table", "9lives").is_err());
    }

    #[test]
    fn child_elements_skips_nested_rows() {
        let doc = Html::parse_document(
            "<table><tbody><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr></tbody></table>",
        );
        let table = doc.select(&TABLE).next().unwrap();
        let tbody = child_elements(table, "tbody").next().unwrap();
        let rows: Vec<_> = child_elements(tbody, "tr").collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(table.select(&TR).count(), 2);
    }

    #[test]
    fn text_of_collapses_whitespace() {
        let doc = Html::parse_document("<table><tr><td>\n  Hong \t <b>Kong</b>\n</td></tr></table>");
        let td = doc.select(&Selector::parse("td").unwrap()).next().unwrap();
        assert_eq!(text_of(td), "Hong Kong");
    }
}
