//! Template references and their expansion
//!
//! A template reference is an element (by default `<tmpl>`) whose `src`
//! attribute names a fragment file relative to the document. Its direct child
//! elements are arguments: the child's tag name is bound to its inner markup
//! while the fragment is evaluated.
//!
//! # Example
//!
//! ```text
//! <!-- page.html -->
//! <tmpl src="greet.tmpl"><name>World</name></tmpl>
//!
//! <!-- greet.tmpl -->
//! `<p>Hello, ${name}!</p>`
//! ```
//!
//! Bundling `page.html` replaces the reference with `<p>Hello, World!</p>`.

mod arguments;
mod loader;
mod resolver;

pub use arguments::{bind_arguments, extract_arguments, Argument};
pub use loader::{load_fragment, resolve_fragment_path, DiskSource, FragmentSource, MemorySource};
pub use resolver::{ExpansionResult, Resolution, ResolutionContext, Resolver};
