use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::DocsnipError;
use crate::DocsnipResult;
use crate::config::DocsnipConfig;
use crate::engine::Macros;
use crate::resolver::to_url_path;

/// A page template found in the docs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
	/// Absolute path of the template.
	pub source: PathBuf,
	/// Path relative to the docs directory, shared by template and output.
	pub relative: PathBuf,
	/// Absolute path the rendered page is written to.
	pub output: PathBuf,
}

impl Page {
	/// Name used for the page in error messages.
	pub fn name(&self) -> String {
		to_url_path(&self.relative)
	}
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
	pub page: Page,
	pub content: String,
}

/// Result of rendering every page of a site.
#[derive(Debug, Default)]
pub struct RenderResult {
	pub pages: Vec<RenderedPage>,
}

/// A rendered page whose output on disk is missing or out of date.
#[derive(Debug)]
pub struct StaleEntry {
	pub page: Page,
	/// Content currently on disk, `None` when the output does not exist.
	pub current_content: Option<String>,
	pub expected_content: String,
}

/// Result of checking the rendered output of a site.
#[derive(Debug, Default)]
pub struct CheckResult {
	/// Number of pages that were rendered and compared.
	pub checked: usize,
	pub stale: Vec<StaleEntry>,
}

impl CheckResult {
	/// Returns true if every output is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty()
	}
}

/// Collect the page templates below `site.docs_dir`, sorted by path.
///
/// Hidden directories, the output directory, files ignored by the
/// repository's `.gitignore` and files matching `site.exclude` are skipped.
/// Only files matching `site.include` are returned.
pub fn collect_pages(root: &Path, config: &DocsnipConfig) -> DocsnipResult<Vec<Page>> {
	let docs_dir = root.join(&config.site.docs_dir);
	let out_dir = root.join(&config.site.out_dir);
	let include_set = build_glob_set(&config.site.include)?;
	let gitignore = build_gitignore(root);
	let exclude = build_exclude_matcher(&docs_dir, &config.site.exclude)?;

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	let walker = Walker {
		docs_dir: &docs_dir,
		out_dir: &out_dir,
		include_set: &include_set,
		gitignore: &gitignore,
		exclude: &exclude,
	};
	walker.walk(&docs_dir, &mut files, &mut visited_dirs)?;
	files.sort();

	Ok(files
		.into_iter()
		.filter_map(|source| {
			let relative = source.strip_prefix(&docs_dir).ok()?.to_path_buf();
			let output = out_dir.join(&relative);
			Some(Page {
				source,
				relative,
				output,
			})
		})
		.collect())
}

struct Walker<'a> {
	docs_dir: &'a Path,
	out_dir: &'a Path,
	include_set: &'a GlobSet,
	gitignore: &'a Gitignore,
	exclude: &'a Gitignore,
}

impl Walker<'_> {
	fn walk(
		&self,
		dir: &Path,
		files: &mut Vec<PathBuf>,
		visited_dirs: &mut HashSet<PathBuf>,
	) -> DocsnipResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !visited_dirs.insert(canonical) {
			return Err(DocsnipError::SymlinkCycle {
				path: dir.display().to_string(),
			});
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if path
				.file_name()
				.and_then(|n| n.to_str())
				.is_some_and(|name| name.starts_with('.'))
			{
				continue;
			}

			let is_dir = path.is_dir();
			if is_dir && path == self.out_dir {
				continue;
			}

			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.exclude.matched(&path, is_dir).is_ignore()
			{
				tracing::debug!(path = %path.display(), "skipping ignored path");
				continue;
			}

			if is_dir {
				self.walk(&path, files, visited_dirs)?;
			} else if path
				.strip_prefix(self.docs_dir)
				.is_ok_and(|relative| self.include_set.is_match(relative))
			{
				files.push(path);
			}
		}

		Ok(())
	}
}

/// Render every page of the site. The first failing page aborts the build.
pub fn render_site(macros: &Macros) -> DocsnipResult<RenderResult> {
	let root = macros.resolver().root();
	let pages = collect_pages(root, macros.config())?;
	let mut result = RenderResult::default();

	for page in pages {
		let template = std::fs::read_to_string(&page.source)?;
		let content = macros.render_page(&page.name(), &template)?;
		tracing::debug!(page = %page.name(), "rendered page");
		result.pages.push(RenderedPage { page, content });
	}

	Ok(result)
}

/// Write rendered pages to their output paths. Returns the number of files
/// whose content changed.
pub fn write_pages(result: &RenderResult) -> DocsnipResult<usize> {
	let mut written = 0;

	for rendered in &result.pages {
		let output = &rendered.page.output;
		if std::fs::read_to_string(output).is_ok_and(|current| current == rendered.content) {
			continue;
		}

		if let Some(parent) = output.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(output, &rendered.content)?;
		tracing::info!(page = %rendered.page.name(), "wrote page");
		written += 1;
	}

	Ok(written)
}

/// Render the site and compare it with the output on disk.
pub fn check_site(macros: &Macros) -> DocsnipResult<CheckResult> {
	let result = render_site(macros)?;
	let mut check = CheckResult {
		checked: result.pages.len(),
		stale: Vec::new(),
	};

	for rendered in result.pages {
		let current_content = std::fs::read_to_string(&rendered.page.output).ok();
		if current_content.as_deref() != Some(rendered.content.as_str()) {
			check.stale.push(StaleEntry {
				page: rendered.page,
				current_content,
				expected_content: rendered.content,
			});
		}
	}

	Ok(check)
}

fn build_glob_set(patterns: &[String]) -> DocsnipResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			DocsnipError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		DocsnipError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the `site.exclude` patterns, relative to
/// the docs directory.
fn build_exclude_matcher(docs_dir: &Path, patterns: &[String]) -> DocsnipResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(docs_dir);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DocsnipError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		DocsnipError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the repository's `.gitignore` file (if
/// any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(error) = builder.add(gitignore_path) {
			tracing::warn!(%error, "failed to read .gitignore");
		}
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}
