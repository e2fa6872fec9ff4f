//! Skin document preparation
//!
//! DuiLib skins pull shared colors and fonts from a separate `style.xml`.
//! User files usually leave that include out, so the renderer would draw an
//! unstyled window; one is injected as the first child of the root before
//! the document is handed over.

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::Result;

/// Name of the injected include element
pub const INCLUDE_ELEMENT: &str = "Include";

/// Attribute naming the include target
pub const INCLUDE_SOURCE_ATTR: &str = "source";

/// Stylesheet the renderer needs for visually meaningful output
pub const STYLE_SOURCE: &str = "style.xml";

/// Parse `xml`, insert `<Include source="style.xml"/>` as the first child of
/// the root element and return the re-serialized document.
///
/// Malformed input fails with [`crate::Error::Parse`]; no recovery is
/// attempted, the XML library's parser is authoritative.
pub fn inject_style_include(xml: &str) -> Result<String> {
    let mut root = Element::parse(xml.as_bytes())?;

    let mut include = Element::new(INCLUDE_ELEMENT);
    include
        .attributes
        .insert(INCLUDE_SOURCE_ATTR.to_string(), STYLE_SOURCE.to_string());

    // First child, ahead of whatever the skin already declares.
    root.children.insert(0, XMLNode::Element(include));

    // The renderer reads a bare fragment from stdin; no declaration.
    let config = EmitterConfig::new().write_document_declaration(false);
    let mut out = Vec::new();
    root.write_with_config(&mut out, config)?;
    Ok(String::from_utf8(out)?)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::Error;

    fn first_child_element(xml: &str) -> Element {
        let root = Element::parse(xml.as_bytes()).expect("output should re-parse");
        root.children
            .iter()
            .find_map(|node| match node {
                XMLNode::Element(el) => Some(el.clone()),
                _ => None,
            })
            .expect("root should have a child element")
    }

    #[test]
    fn include_is_first_child_of_empty_root() {
        let out = inject_style_include("<Window/>").expect("well-formed input");

        assert!(out.starts_with("<Window"));
        let first = first_child_element(&out);
        assert_eq!(first.name, INCLUDE_ELEMENT);
        assert_eq!(
            first.attributes.get(INCLUDE_SOURCE_ATTR).map(String::as_str),
            Some(STYLE_SOURCE)
        );
    }

    #[test]
    fn include_precedes_existing_children() {
        let out = inject_style_include(
            r#"<Window size="640,480"><VerticalLayout><Button name="ok"/></VerticalLayout></Window>"#,
        )
        .expect("well-formed input");

        let root = Element::parse(out.as_bytes()).expect("output should re-parse");
        let names: Vec<&str> = root
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Element(el) => Some(el.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec![INCLUDE_ELEMENT, "VerticalLayout"]);
    }

    #[test]
    fn root_attributes_survive_the_round_trip() {
        let out = inject_style_include(r#"<Window size="640,480"/>"#).expect("well-formed input");

        let root = Element::parse(out.as_bytes()).expect("output should re-parse");
        assert_eq!(root.name, "Window");
        assert_eq!(root.attributes.get("size").map(String::as_str), Some("640,480"));
    }

    #[test]
    fn no_xml_declaration_in_output() {
        let out = inject_style_include("<Window/>").expect("well-formed input");
        assert!(!out.contains("<?xml"));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = inject_style_include("<Window><unclosed></Window>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
