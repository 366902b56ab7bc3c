//! Argument extraction from template reference elements

use markup5ever_rcdom::Handle;

use crate::expr::{EvalError, Scope};
use crate::html::{self, MarkupError};

/// A named value passed to a fragment
///
/// The name is the child element's tag name; the value is its inner markup,
/// kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: String,
}

/// Read the direct child elements of a reference element as arguments
///
/// Order follows the children's document order. An element without child
/// elements has no arguments.
pub fn extract_arguments(element: &Handle) -> Result<Vec<Argument>, MarkupError> {
    html::child_elements(element)
        .iter()
        .filter_map(|child| html::tag_name(child).map(|name| (name, child)))
        .map(|(name, child)| {
            Ok(Argument {
                name,
                value: html::inner_html(child)?,
            })
        })
        .collect()
}

/// Bind arguments into a fresh scope; a later duplicate name wins
pub fn bind_arguments(arguments: &[Argument]) -> Result<Scope, EvalError> {
    let mut scope = Scope::new();
    for arg in arguments {
        if scope.contains(&arg.name) {
            tracing::debug!(name = %arg.name, "duplicate template argument, later value wins");
        }
        scope.bind(&arg.name, arg.value.as_str())?;
    }
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Document;
    use pretty_assertions::assert_eq;

    fn first_tmpl(doc: &Document) -> Handle {
        doc.elements_by_tag_name("tmpl")[0].clone()
    }

    #[test]
    fn test_extracts_in_document_order() {
        let doc = Document::parse(
            r#"<tmpl src="card.tmpl"><heading>Hi</heading><content><b>bold</b> text</content></tmpl>"#,
        )
        .unwrap();
        let args = extract_arguments(&first_tmpl(&doc)).unwrap();
        assert_eq!(
            args,
            vec![
                Argument {
                    name: "heading".to_string(),
                    value: "Hi".to_string()
                },
                Argument {
                    name: "content".to_string(),
                    value: "<b>bold</b> text".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_no_children_means_no_arguments() {
        let doc = Document::parse(r#"<tmpl src="x.tmpl">just text</tmpl>"#).unwrap();
        assert!(extract_arguments(&first_tmpl(&doc)).unwrap().is_empty());
    }

    #[test]
    fn test_only_direct_children() {
        let doc = Document::parse(r#"<tmpl src="x"><outer><inner>1</inner></outer></tmpl>"#)
            .unwrap();
        let args = extract_arguments(&first_tmpl(&doc)).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].name, "outer");
        assert_eq!(args[0].value, "<inner>1</inner>");
    }

    #[test]
    fn test_argument_names_are_lowercase() {
        let doc = Document::parse(r#"<tmpl src="x.tmpl"><firstName>Ada</firstName></tmpl>"#)
            .unwrap();
        let args = extract_arguments(&first_tmpl(&doc)).unwrap();
        assert_eq!(args[0].name, "firstname");
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let args = vec![
            Argument {
                name: "name".to_string(),
                value: "first".to_string(),
            },
            Argument {
                name: "name".to_string(),
                value: "second".to_string(),
            },
        ];
        let scope = bind_arguments(&args).unwrap();
        assert_eq!(scope.get("name"), Some("second"));
    }

    #[test]
    fn test_custom_element_name_is_rejected() {
        let args = vec![Argument {
            name: "first-name".to_string(),
            value: "Ada".to_string(),
        }];
        assert!(matches!(
            bind_arguments(&args),
            Err(EvalError::InvalidName { .. })
        ));
    }
}
