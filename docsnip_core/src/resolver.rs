//! Mapping of symbolic identifiers to files in a multi-project source tree.
//!
//! A dotted class path such as `pi.actor.Actor` is resolved through the
//! [`ProjectRegistry`]: the first segment selects the project, the remaining
//! segments become directories below the project's source root. Types (final
//! segment starting with an uppercase letter) get the source file extension,
//! packages stay directories.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use crate::SnippetError;
use crate::SnippetResult;
use crate::config::DocsnipConfig;
use crate::config::LayoutConfig;

/// Immutable lookup table from project key to subproject directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRegistry {
	projects: BTreeMap<String, PathBuf>,
}

impl ProjectRegistry {
	pub fn new<K, V>(projects: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<PathBuf>,
	{
		Self {
			projects: projects
				.into_iter()
				.map(|(key, dir)| (key.into(), dir.into()))
				.collect(),
		}
	}

	/// The subproject directory registered for `key`.
	pub fn get(&self, key: &str) -> Option<&Path> {
		self.projects.get(key).map(PathBuf::as_path)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.projects.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.projects.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.projects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.projects.is_empty()
	}
}

/// Resolves class paths, excerpt paths, assets and repository files against
/// a repository checkout.
///
/// All returned paths are relative to the repository root so they can be
/// used for deep links as well as for reading the file.
#[derive(Debug, Clone)]
pub struct SourceResolver {
	root: PathBuf,
	registry: ProjectRegistry,
	layout: LayoutConfig,
	extension: String,
}

impl SourceResolver {
	pub fn new(
		root: impl Into<PathBuf>,
		registry: ProjectRegistry,
		layout: LayoutConfig,
		extension: impl Into<String>,
	) -> Self {
		Self {
			root: root.into(),
			registry,
			layout,
			extension: extension.into(),
		}
	}

	/// Build a resolver from a loaded configuration.
	pub fn from_config(root: impl Into<PathBuf>, config: &DocsnipConfig) -> Self {
		Self::new(
			root,
			ProjectRegistry::new(config.projects.clone()),
			config.layout.clone(),
			config.source.extension.clone(),
		)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn registry(&self) -> &ProjectRegistry {
		&self.registry
	}

	pub fn extension(&self) -> &str {
		&self.extension
	}

	/// Absolute location of a repository-relative path.
	pub fn absolute(&self, relative: &Path) -> PathBuf {
		self.root.join(relative)
	}

	/// Resolve a class or package path such as `pi.actor.Actor` (or
	/// `pi/actor/Actor.java`) to its location in the source tree.
	///
	/// When `check` is set the file (or package directory) must exist.
	pub fn resolve_class_path(&self, identifier: &str, check: bool) -> SnippetResult<PathBuf> {
		let normalized = self.strip_extension(&identifier.replace('/', "."));
		let segments: Vec<&str> = normalized.split('.').collect();
		if segments.iter().any(|segment| segment.is_empty()) {
			return Err(SnippetError::InvalidIdentifier(identifier.to_string()));
		}

		let (Some(&project), Some(&class_name)) = (segments.first(), segments.last()) else {
			return Err(SnippetError::InvalidIdentifier(identifier.to_string()));
		};

		let Some(project_dir) = self.registry.get(project) else {
			return Err(SnippetError::UnknownProject {
				identifier: identifier.to_string(),
				project: project.to_string(),
			});
		};

		let mut path = self
			.layout
			.subprojects
			.join(project_dir)
			.join(&self.layout.source_root);
		for segment in &segments[..segments.len() - 1] {
			path.push(segment);
		}

		if is_type_name(class_name) {
			path.push(format!("{class_name}.{}", self.extension));
		} else {
			path.push(class_name);
		}

		tracing::debug!(identifier, path = %path.display(), "resolved class path");

		if check && !self.absolute(&path).exists() {
			return Err(SnippetError::MissingSourceFile {
				identifier: identifier.to_string(),
				path,
			});
		}

		Ok(path)
	}

	/// Resolve the path argument of an excerpt.
	///
	/// Identifiers without a `/` are class paths. Anything else is a path
	/// relative to the demo root, with the source extension appended when
	/// missing. The resolved file must exist.
	pub fn resolve_source(&self, identifier: &str) -> SnippetResult<PathBuf> {
		if identifier.contains('/') {
			self.resolve_demo_path(identifier)
		} else {
			self.resolve_class_path(identifier, true)
		}
	}

	/// Resolve a path relative to the demo root, e.g. `actor/Demo` to
	/// `subprojects/demos/src/main/java/demos/actor/Demo.java`. The file must
	/// exist.
	pub fn resolve_demo_path(&self, relpath: &str) -> SnippetResult<PathBuf> {
		let path = self.layout.demo_root.join(self.with_extension(relpath));
		tracing::debug!(relpath, path = %path.display(), "resolved demo path");

		if !self.absolute(&path).is_file() {
			return Err(SnippetError::MissingSourceFile {
				identifier: relpath.to_string(),
				path,
			});
		}

		Ok(path)
	}

	/// The slash separated form of a class path used in API documentation
	/// URLs, e.g. `pi/actor/Actor`.
	///
	/// When `check` is set the class path must resolve to an existing file.
	/// Foreign classes (e.g. `java.awt.Color`) are passed with `check` unset.
	pub fn class_url_path(&self, identifier: &str, check: bool) -> SnippetResult<String> {
		if check {
			self.resolve_class_path(identifier, true)?;
		}

		Ok(self.strip_extension(&identifier.replace('/', ".")).replace('.', "/"))
	}

	/// The path of an excerpt file relative to the demo root, with the source
	/// extension appended when missing.
	pub fn with_extension(&self, path: &str) -> String {
		let suffix = format!(".{}", self.extension);
		if path.ends_with(&suffix) {
			path.to_string()
		} else {
			format!("{path}{suffix}")
		}
	}

	/// Fail unless `relpath` is a file inside the asset directory.
	pub fn check_asset(&self, relpath: &str) -> SnippetResult<()> {
		if self.absolute(&self.layout.assets).join(relpath).is_file() {
			Ok(())
		} else {
			Err(SnippetError::MissingAsset(relpath.to_string()))
		}
	}

	/// Fail unless `relpath` is a file relative to the repository root.
	pub fn check_repo_path(&self, relpath: &str) -> SnippetResult<()> {
		if self.root.join(relpath).is_file() {
			Ok(())
		} else {
			Err(SnippetError::MissingRepoFile(relpath.to_string()))
		}
	}

	fn strip_extension(&self, identifier: &str) -> String {
		let suffix = format!(".{}", self.extension);
		identifier
			.strip_suffix(&suffix)
			.unwrap_or(identifier)
			.to_string()
	}
}

/// Types are written with a leading uppercase letter, packages are not.
fn is_type_name(segment: &str) -> bool {
	segment.chars().next().is_some_and(char::is_uppercase)
}

/// Render a relative path with forward slashes for use in URLs.
pub fn to_url_path(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}
