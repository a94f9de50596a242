//! Typed accessors over parsed pages.
//!
//! Every structural expectation on a page goes through these helpers so a
//! missing element, a missing attribute or an unparseable number surfaces as
//! one `ExtractError` variant instead of ad hoc checks at each call site.

use std::str::FromStr;

use scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, Result};

/// Compiles a CSS selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// Parses a field value, reporting the field name on failure.
pub fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ExtractError::invalid(field, value))
}

/// A scraped identifier used as an output file name.
///
/// Empty values and values with a path separator or `..` are rejected.
pub fn file_stem(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.contains(['/', '\\']) || value.contains("..") {
        return Err(ExtractError::invalid(field, value));
    }
    Ok(value.to_string())
}

/// Root element of a document, the scope for page-level lookups.
pub fn root(document: &Html) -> ElementRef<'_> {
    document.root_element()
}

pub trait ElementExt<'a> {
    /// First descendant matching `css`, if any.
    fn find(&self, css: &str) -> Result<Option<ElementRef<'a>>>;

    /// First descendant matching `css`, or `MissingElement`.
    fn require(&self, css: &str) -> Result<ElementRef<'a>>;

    /// Every descendant matching `css`, in document order.
    fn find_all(&self, css: &str) -> Result<Vec<ElementRef<'a>>>;

    /// Attribute value, or `MissingAttribute`.
    fn require_attr(&self, name: &str) -> Result<&'a str>;

    fn attr_opt(&self, name: &str) -> Option<&'a str>;

    /// Attribute parsed into `T`; missing and malformed values are both errors.
    fn attr_parse<T: FromStr>(&self, name: &str) -> Result<T>;

    /// Non-empty text nodes with surrounding whitespace removed.
    fn stripped_strings(&self) -> Vec<String>;

    /// Concatenated text content.
    fn text_content(&self) -> String;

    /// `href` of every link below this element.
    fn hrefs(&self) -> Result<Vec<String>>;

    fn describe(&self) -> String;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn find(&self, css: &str) -> Result<Option<ElementRef<'a>>> {
        let sel = selector(css)?;
        Ok(self.select(&sel).next())
    }

    fn require(&self, css: &str) -> Result<ElementRef<'a>> {
        self.find(css)?.ok_or_else(|| ExtractError::missing(css))
    }

    fn find_all(&self, css: &str) -> Result<Vec<ElementRef<'a>>> {
        let sel = selector(css)?;
        Ok(self.select(&sel).collect())
    }

    fn require_attr(&self, name: &str) -> Result<&'a str> {
        self.attr_opt(name)
            .ok_or_else(|| ExtractError::MissingAttribute {
                element: self.describe(),
                attribute: name.to_string(),
            })
    }

    fn attr_opt(&self, name: &str) -> Option<&'a str> {
        let element: &'a scraper::node::Element = self.value();
        element.attr(name)
    }

    fn attr_parse<T: FromStr>(&self, name: &str) -> Result<T> {
        parse_field(name, self.require_attr(name)?)
    }

    fn stripped_strings(&self) -> Vec<String> {
        self.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn hrefs(&self) -> Result<Vec<String>> {
        Ok(self
            .find_all("a[href]")?
            .into_iter()
            .filter_map(|a| a.attr_opt("href"))
            .map(str::to_string)
            .collect())
    }

    fn describe(&self) -> String {
        let element = self.value();
        match element.classes().next() {
            Some(class) => format!("{}.{}", element.name(), class),
            None => element.name().to_string(),
        }
    }
}

/// Rows of the table carrying `class`, minus `headers` leading rows.
///
/// The table, at least one row, and enough rows to drop the headers are all
/// required.
pub fn table_rows<'a>(
    scope: ElementRef<'a>,
    class: &str,
    headers: usize,
) -> Result<Vec<ElementRef<'a>>> {
    let table = scope.require(&format!(".{}", class))?;
    let mut rows = table.find_all("tr")?;
    if rows.is_empty() {
        return Err(ExtractError::missing(&format!(".{} tr", class)));
    }
    if headers > rows.len() {
        return Err(ExtractError::invalid(
            &format!(".{} header rows", class),
            &rows.len().to_string(),
        ));
    }
    Ok(rows.split_off(headers))
}
