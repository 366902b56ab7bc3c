//! Template resolution - expands reference elements into fragment markup

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use markup5ever_rcdom::Handle;

use crate::config::BundleConfig;
use crate::error::ExpansionError;
use crate::expr;
use crate::html::{self, Document};
use crate::report::Reporter;

use super::arguments::{bind_arguments, extract_arguments};
use super::loader::{load_fragment, FragmentSource};

/// Outcome of expanding one reference element: fragment markup or the reason it failed
pub type ExpansionResult = Result<String, ExpansionError>;

/// Context for template resolution
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Directory that `src` paths are resolved against (the document's directory)
    pub base_dir: PathBuf,
    /// Tag name of reference elements
    pub tag: String,
    /// Attribute holding the fragment path
    pub src_attribute: String,
    /// Maximum nesting depth of expansions, unbounded when `None`
    pub max_depth: Option<usize>,
}

impl ResolutionContext {
    /// Create a context with default tag and attribute names
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(base_dir, &BundleConfig::default())
    }

    /// Create a context using the names and limits from a bundle configuration
    pub fn from_config(base_dir: impl Into<PathBuf>, config: &BundleConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            tag: config.tag.clone(),
            src_attribute: config.src_attribute.clone(),
            max_depth: config.max_depth,
        }
    }
}

/// Summary of a successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Number of reference elements replaced, nested ones included
    pub expanded: usize,
}

/// A reference element waiting to be expanded
struct Pending {
    element: Handle,
    /// 0 for elements of the source document, +1 per expansion that produced it
    depth: usize,
}

/// Expands every template reference element of a document in place
pub struct Resolver<'a> {
    ctx: ResolutionContext,
    source: &'a dyn FragmentSource,
    reporter: &'a dyn Reporter,
}

impl<'a> Resolver<'a> {
    pub fn new(
        ctx: ResolutionContext,
        source: &'a dyn FragmentSource,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            ctx,
            source,
            reporter,
        }
    }

    /// Resolve all reference elements, including ones introduced by expansions
    ///
    /// Elements are processed from a work queue seeded in document order.
    /// Reference elements inside freshly inserted markup go to the front of the
    /// queue, so nested output is resolved before later siblings. A failing
    /// element is left untouched and the rest are still attempted; successful
    /// replacements are kept even when the overall result is an error.
    pub fn resolve(&self, doc: &Document) -> Result<Resolution, Vec<ExpansionError>> {
        let mut queue: VecDeque<Pending> = doc
            .elements_by_tag_name(&self.ctx.tag)
            .into_iter()
            .map(|element| Pending { element, depth: 0 })
            .collect();

        let mut errors = Vec::new();
        let mut index = 0;
        let mut expanded = 0;

        while let Some(Pending { element, depth }) = queue.pop_front() {
            // Consumed as argument markup by an enclosing expansion
            if !html::is_attached(&element) {
                continue;
            }
            index += 1;

            match self.expand_at_depth(&element, index, depth) {
                Ok(nodes) => match self.splice(&element, nodes) {
                    Some(nested) => {
                        for found in nested.into_iter().rev() {
                            queue.push_front(Pending {
                                element: found,
                                depth: depth + 1,
                            });
                        }
                        expanded += 1;
                    }
                    None => tracing::debug!(index, "template element left the tree before splicing"),
                },
                Err(err) => {
                    self.reporter.expansion_failed(&err);
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            Ok(Resolution { expanded })
        } else {
            Err(errors)
        }
    }

    fn expand_at_depth(
        &self,
        element: &Handle,
        index: usize,
        depth: usize,
    ) -> Result<Vec<Handle>, ExpansionError> {
        if let Some(limit) = self.ctx.max_depth {
            if depth > limit {
                return Err(ExpansionError::DepthExceeded { index, limit });
            }
        }

        let (path, markup) = self.expand_element(element, index)?;
        html::parse_fragment_nodes(&markup)
            .map_err(|error| ExpansionError::FragmentMarkup { path, error })
    }

    /// Put expansion output in place of `element`
    ///
    /// Returns the reference elements found in the inserted nodes, or `None`
    /// when `element` has no parent to splice into.
    fn splice(&self, element: &Handle, nodes: Vec<Handle>) -> Option<Vec<Handle>> {
        let nested: Vec<Handle> = nodes
            .iter()
            .flat_map(|node| html::elements_by_tag_name(node, &self.ctx.tag))
            .collect();
        html::replace_with_children(element, nodes).then_some(nested)
    }

    /// Evaluate one reference element to markup without touching the tree
    pub fn expand(&self, element: &Handle, index: usize) -> ExpansionResult {
        self.expand_element(element, index).map(|(_, markup)| markup)
    }

    fn expand_element(
        &self,
        element: &Handle,
        index: usize,
    ) -> Result<(PathBuf, String), ExpansionError> {
        let src = html::attribute(element, &self.ctx.src_attribute).ok_or_else(|| {
            ExpansionError::MissingSourceAttribute {
                index,
                attribute: self.ctx.src_attribute.clone(),
            }
        })?;

        let (path, fragment) = load_fragment(&src, self.base_dir(), self.source)?;
        self.reporter.fragment_loaded(&path);

        let arguments = extract_arguments(element).map_err(|error| {
            ExpansionError::FragmentMarkup {
                path: path.clone(),
                error,
            }
        })?;

        let evaluated = bind_arguments(&arguments).and_then(|scope| expr::evaluate(&fragment, &scope));
        match evaluated {
            Ok(markup) => Ok((path, markup)),
            Err(error) => Err(ExpansionError::Evaluation {
                path,
                error,
                fragment,
            }),
        }
    }

    fn base_dir(&self) -> &Path {
        &self.ctx.base_dir
    }
}
