use std::path::PathBuf;

use crate::Boundary;
use crate::SnippetError;
use crate::SnippetResult;
use crate::links::LineAnchor;
use crate::source::SourceFile;

/// Which lines of a source file an excerpt shows.
///
/// Exactly one mode is active. Line numbers are 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineSelection {
	/// The whole file.
	#[default]
	Whole,
	/// A range where a missing bound extends to the start or end of the file.
	Range {
		start: Option<usize>,
		end: Option<usize>,
	},
	/// A single line.
	Line(usize),
	/// From the first import statement to the end of the file.
	FromFirstImport,
}

impl LineSelection {
	/// Build a selection from macro style options where `0` means unset.
	///
	/// `line` takes precedence over `start_line` and `end_line`.
	/// `from_import` cannot be combined with any of them.
	pub fn from_options(
		start_line: usize,
		end_line: usize,
		line: usize,
		from_import: bool,
	) -> SnippetResult<Self> {
		if from_import && (start_line > 0 || end_line > 0 || line > 0) {
			return Err(SnippetError::ConflictingSelection(
				"`from_import` is an exclusive option".to_string(),
			));
		}

		if from_import {
			return Ok(Self::FromFirstImport);
		}

		if line > 0 {
			return Ok(Self::Line(line));
		}

		Ok(Self::range(start_line, end_line))
	}

	/// A range from optional `0`-means-unset bounds.
	pub fn range(start_line: usize, end_line: usize) -> Self {
		let start = (start_line > 0).then_some(start_line);
		let end = (end_line > 0).then_some(end_line);
		if start.is_none() && end.is_none() {
			Self::Whole
		} else {
			Self::Range { start, end }
		}
	}
}

/// A validated slice of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSample {
	/// Path of the source file relative to the repository root.
	pub path: PathBuf,
	/// First line shown, always at least 1.
	pub start_line: usize,
	/// Last line shown, the line count of the file when the selection was
	/// open-ended.
	pub end_line: usize,
	/// Start bound as requested, before open ends were filled in.
	pub requested_start: Option<usize>,
	/// End bound as requested, before open ends were filled in.
	pub requested_end: Option<usize>,
	pub lines: Vec<String>,
}

impl CodeSample {
	/// The selected lines joined with newlines.
	pub fn code(&self) -> String {
		self.lines.join("\n")
	}

	/// Number of selected lines.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// A fenced code block numbered like the source file.
	pub fn fenced_code_block(&self, language: &str) -> String {
		fenced_code_block(&self.code(), language, self.start_line)
	}

	/// The line anchor a deep link to this sample should carry. A whole-file
	/// excerpt links to the file itself, an open start is anchored at line 1.
	pub fn anchor(&self) -> LineAnchor {
		let start = self
			.requested_start
			.or_else(|| self.requested_end.map(|_| self.start_line));

		LineAnchor::Range {
			start,
			end: self.requested_end,
		}
	}
}

/// Cut `selection` out of `file`.
///
/// The end bound is validated before the start bound. A bound landing on an
/// empty line is rejected since it usually means the line numbers are off by
/// one.
pub fn select(
	file: &SourceFile,
	selection: LineSelection,
	import_marker: &str,
) -> SnippetResult<CodeSample> {
	let total = file.len();
	let (start, end) = match selection {
		LineSelection::Whole => (None, None),
		LineSelection::Range { start, end } => (start, end),
		LineSelection::Line(line) => (Some(line), Some(line)),
		LineSelection::FromFirstImport => (Some(file.first_import_line(import_marker)), None),
	};

	for bound in [start, end].into_iter().flatten() {
		if bound == 0 || bound > total {
			return Err(SnippetError::LineOutOfRange {
				path: file.path.clone(),
				line: bound,
				total,
			});
		}
	}

	if let (Some(start), Some(end)) = (start, end) {
		if start > end {
			return Err(SnippetError::InvalidRange { start, end });
		}
	}

	if let Some(end) = end {
		if file.lines[end - 1].is_empty() {
			return Err(SnippetError::EmptyBoundaryLine {
				path: file.path.clone(),
				boundary: Boundary::End,
				line: end,
			});
		}
	}

	if let Some(start) = start {
		if file.lines[start - 1].is_empty() {
			return Err(SnippetError::EmptyBoundaryLine {
				path: file.path.clone(),
				boundary: Boundary::Start,
				line: start,
			});
		}
	}

	let start_line = start.unwrap_or(1);
	let end_line = end.unwrap_or(total);
	tracing::debug!(
		path = %file.path.display(),
		start_line,
		end_line,
		"selected lines"
	);

	Ok(CodeSample {
		path: file.path.clone(),
		start_line,
		end_line,
		requested_start: start,
		requested_end: end,
		lines: file.lines[start_line - 1..end_line].to_vec(),
	})
}

/// Wrap `code` in a fence tagged with `language`. A positive `start_line`
/// adds a `linenums` attribute so rendered line numbers match the file.
pub fn fenced_code_block(code: &str, language: &str, start_line: usize) -> String {
	let linenums = if start_line > 0 {
		format!(" linenums=\"{start_line}\"")
	} else {
		String::new()
	};

	format!("``` {language}{linenums}\n{code}\n```")
}
