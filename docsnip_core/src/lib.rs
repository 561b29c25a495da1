//! `docsnip_core` generates the Markdown snippets a documentation site needs
//! to talk about a source repository: links into the API documentation,
//! embedded images and videos, and fenced excerpts of source files with deep
//! links to the hosted copy of the same lines.
//!
//! ## Processing Pipeline
//!
//! ```text
//! identifier (`pi.actor.Actor` or `actor/Demo`)
//!   → Resolver (project registry, source layout, existence check)
//!   → Source (file split into 1-indexed lines, cached per build)
//!   → Excerpt (line selection, boundary validation)
//!   → Links / Media (Markdown and HTML fragments)
//!   → Engine (macros exposed to minijinja page templates)
//!   → Site (render every page of the docs directory)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Loads `docsnip.toml` with the project registry, repository layout, URLs and labels.
//! - [`resolver`]: Maps class paths and demo paths to files and validates that they exist.
//! - [`excerpt`]: Selects and validates line ranges and renders them as fenced code blocks.
//! - [`links`]: Links to API documentation pages and deep links into the hosted repository.
//! - [`site`]: Discovers, renders, writes and checks the pages of a docs directory.
//!
//! ## Template Macros
//!
//! Every page is a [`minijinja`](https://docs.rs/minijinja) template. The
//! following functions are available, taking positional or keyword
//! arguments:
//!
//! ```markdown
//! Every {{ class('pi.actor.Actor') }} lives in {{ package('pi.actor') }}.
//!
//! {{ code('actor/ActorDemo', start_line=10, end_line=20) }}
//!
//! {{ image('logo/logo.png', caption='The logo') }}
//! ```
//!
//! A reference to a missing class, file or asset fails the whole build
//! instead of producing a dead link.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsnip_core::Macros;
//! use docsnip_core::site::render_site;
//! use docsnip_core::site::write_pages;
//! use std::path::Path;
//!
//! let macros = Macros::load(Path::new(".")).unwrap();
//! let rendered = render_site(&macros).unwrap();
//! let written = write_pages(&rendered).unwrap();
//! println!("{written} page(s) updated");
//! ```

pub use config::DocsnipConfig;
pub use engine::*;
pub use error::*;
pub use excerpt::CodeSample;
pub use excerpt::LineSelection;
pub use links::LineAnchor;
pub use resolver::ProjectRegistry;
pub use resolver::SourceResolver;
pub use source::SourceCache;
pub use source::SourceFile;

mod args;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod excerpt;
pub mod links;
mod media;
pub mod resolver;
pub mod site;
mod source;

#[cfg(test)]
mod __fixtures;
