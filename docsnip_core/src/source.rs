use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use crate::SnippetError;
use crate::SnippetResult;

/// A source file split into lines.
///
/// Line numbers passed to and returned from this type are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	/// Path relative to the repository root.
	pub path: PathBuf,
	pub lines: Vec<String>,
}

impl SourceFile {
	pub fn new(path: impl Into<PathBuf>, content: &str) -> Self {
		Self {
			path: path.into(),
			lines: content.lines().map(ToString::to_string).collect(),
		}
	}

	/// Read `relative` below `root`.
	pub fn read(root: &Path, relative: &Path) -> SnippetResult<Self> {
		let content = std::fs::read_to_string(root.join(relative)).map_err(|e| {
			SnippetError::ReadSource {
				path: relative.to_path_buf(),
				reason: e.to_string(),
			}
		})?;

		Ok(Self::new(relative, &content))
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// The 1-indexed line `number`, if it exists.
	pub fn line(&self, number: usize) -> Option<&str> {
		number
			.checked_sub(1)
			.and_then(|index| self.lines.get(index))
			.map(String::as_str)
	}

	/// The 1-indexed number of the first line starting with `marker`, or one
	/// past the last line when there is none.
	pub fn first_import_line(&self, marker: &str) -> usize {
		self.lines
			.iter()
			.position(|line| line.starts_with(marker))
			.map_or(self.lines.len() + 1, |index| index + 1)
	}
}

/// Read-through cache of source files keyed by their repository-relative
/// path.
///
/// Sources are treated as immutable while a site is rendered, so entries are
/// never invalidated. Create a new cache for every build.
#[derive(Debug)]
pub struct SourceCache {
	root: PathBuf,
	files: Mutex<HashMap<PathBuf, Arc<SourceFile>>>,
}

impl SourceCache {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			files: Mutex::new(HashMap::new()),
		}
	}

	/// Return the cached file or read it from disk.
	pub fn get(&self, relative: &Path) -> SnippetResult<Arc<SourceFile>> {
		if let Some(file) = self.lock().get(relative) {
			tracing::trace!(path = %relative.display(), "source cache hit");
			return Ok(Arc::clone(file));
		}

		let file = Arc::new(SourceFile::read(&self.root, relative)?);
		self.lock()
			.insert(relative.to_path_buf(), Arc::clone(&file));

		Ok(file)
	}

	/// Number of cached files.
	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<SourceFile>>> {
		// A poisoned map still only holds fully read files.
		self.files
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
	}
}
