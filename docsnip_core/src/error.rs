use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Which end of a selection an [`SnippetError::EmptyBoundaryLine`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
	Start,
	End,
}

impl std::fmt::Display for Boundary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Start => f.write_str("start"),
			Self::End => f.write_str("end"),
		}
	}
}

/// Errors raised while resolving a reference or cutting an excerpt.
///
/// These are the failures a documentation author causes with a broken macro
/// call. They are cheap to clone so they can cross the template engine
/// boundary and be reported unchanged.
#[derive(Debug, Clone, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnippetError {
	#[error("unknown project `{project}` in identifier `{identifier}`")]
	#[diagnostic(
		code(docsnip::unknown_project),
		help("register the project under `[projects]` in docsnip.toml")
	)]
	UnknownProject { identifier: String, project: String },

	#[error("the class path `{identifier}` has no corresponding source file in `{}`", .path.display())]
	#[diagnostic(
		code(docsnip::missing_source_file),
		help("check the spelling of the class path or move the reference to the new location")
	)]
	MissingSourceFile { identifier: String, path: PathBuf },

	#[error("the asset `{0}` doesn't exist")]
	#[diagnostic(code(docsnip::missing_asset))]
	MissingAsset(String),

	#[error("the file `{0}` doesn't exist")]
	#[diagnostic(code(docsnip::missing_repo_file))]
	MissingRepoFile(String),

	#[error("conflicting selection: {0}")]
	#[diagnostic(
		code(docsnip::conflicting_selection),
		help("use either `line`, `start_line`/`end_line`, `lines` or `from_import`")
	)]
	ConflictingSelection(String),

	#[error("{boundary} line {line} of `{}` is an empty line", .path.display())]
	#[diagnostic(
		code(docsnip::empty_boundary_line),
		help("excerpts may not start or end on a blank line; adjust the line numbers")
	)]
	EmptyBoundaryLine {
		path: PathBuf,
		boundary: Boundary,
		line: usize,
	},

	#[error("line {line} is out of range for `{}` ({total} lines)", .path.display())]
	#[diagnostic(code(docsnip::line_out_of_range))]
	LineOutOfRange {
		path: PathBuf,
		line: usize,
		total: usize,
	},

	#[error("start line {start} is after end line {end}")]
	#[diagnostic(code(docsnip::invalid_range))]
	InvalidRange { start: usize, end: usize },

	#[error("invalid identifier `{0}`")]
	#[diagnostic(
		code(docsnip::invalid_identifier),
		help("use a dotted class path like `pi.actor.Actor` or a path like `actor/Demo.java`")
	)]
	InvalidIdentifier(String),

	#[error("failed to read `{}`: {reason}", .path.display())]
	#[diagnostic(code(docsnip::read_source))]
	ReadSource { path: PathBuf, reason: String },

	#[error("invalid arguments for `{name}`: {reason}")]
	#[diagnostic(code(docsnip::invalid_arguments))]
	InvalidArguments { name: String, reason: String },
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocsnipError {
	#[error(transparent)]
	#[diagnostic(code(docsnip::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docsnip::config_parse),
		help("check that docsnip.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Snippet(#[from] SnippetError),

	#[error("macro failed in `{page}` at line {line}: {source}")]
	#[diagnostic(code(docsnip::macro_failed))]
	Macro {
		page: String,
		line: usize,
		source: SnippetError,
	},

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(docsnip::template_render))]
	TemplateRender(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(code(docsnip::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("symlink cycle detected at `{path}`")]
	#[diagnostic(
		code(docsnip::symlink_cycle),
		help("remove the circular symlink or add the path to `site.exclude`")
	)]
	SymlinkCycle { path: String },
}

impl DocsnipError {
	/// The reference error behind this error, if it was caused by a broken
	/// macro call.
	pub fn snippet(&self) -> Option<&SnippetError> {
		match self {
			Self::Snippet(error) | Self::Macro { source: error, .. } => Some(error),
			_ => None,
		}
	}
}

pub type SnippetResult<T> = Result<T, SnippetError>;
pub type DocsnipResult<T> = Result<T, DocsnipError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
