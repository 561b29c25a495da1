use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DocsnipError;
use crate::DocsnipResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"docsnip.toml",
	".docsnip.toml",
	".config/docsnip.toml",
];

/// Configuration loaded from a `docsnip.toml` file.
///
/// Every section is optional. Missing values fall back to the layout of the
/// engine-pi repository.
///
/// ```toml
/// [projects]
/// pi = "engine"
/// demos = "demos"
///
/// [layout]
/// subprojects = "subprojects"
/// source_root = "src/main/java"
/// demo_root = "subprojects/demos/src/main/java/demos"
/// assets = "assets"
///
/// [source]
/// language = "java"
/// extension = "java"
/// import_marker = "import "
/// revision = "main"
///
/// [urls]
/// javadoc = "https://engine-pi.github.io/javadocs"
/// repository = "https://github.com/engine-pi/engine-pi"
///
/// [site]
/// docs_dir = "docs"
/// out_dir = "site"
/// include = ["**/*.md"]
/// exclude = ["drafts/"]
///
/// [extra]
/// version = "0.40.0"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DocsnipConfig {
	/// Map of the first segment of a class path (the project key) to the
	/// directory of its subproject, relative to `layout.subprojects`.
	#[serde(default = "default_projects")]
	pub projects: BTreeMap<String, PathBuf>,
	/// Where sources, demos and assets live inside the repository.
	#[serde(default)]
	pub layout: LayoutConfig,
	/// Language conventions of the referenced source files.
	#[serde(default)]
	pub source: SourceConfig,
	/// Base URLs that generated links point at.
	#[serde(default)]
	pub urls: UrlConfig,
	/// Human readable text inserted by some macros.
	#[serde(default)]
	pub labels: LabelConfig,
	/// Which pages are rendered and where the output goes.
	#[serde(default)]
	pub site: SiteConfig,
	/// Additional variables made available to every page.
	#[serde(default)]
	pub extra: BTreeMap<String, toml::Value>,
}

impl Default for DocsnipConfig {
	fn default() -> Self {
		Self {
			projects: default_projects(),
			layout: LayoutConfig::default(),
			source: SourceConfig::default(),
			urls: UrlConfig::default(),
			labels: LabelConfig::default(),
			site: SiteConfig::default(),
			extra: BTreeMap::new(),
		}
	}
}

fn default_projects() -> BTreeMap<String, PathBuf> {
	[
		("pi", "engine"),
		("demos", "demos"),
		("blockly_robot", "games/blockly-robot"),
		("tetris", "games/tetris"),
		("pacman", "games/pacman"),
		("cli", "cli"),
	]
	.into_iter()
	.map(|(key, dir)| (key.to_string(), PathBuf::from(dir)))
	.collect()
}

/// Repository layout, all paths relative to the repository root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Directory containing one directory per registered project.
	pub subprojects: PathBuf,
	/// Source directory inside each project.
	pub source_root: PathBuf,
	/// Root for slash-style excerpt paths such as `actor/Demo.java`.
	pub demo_root: PathBuf,
	/// Directory holding images and videos.
	pub assets: PathBuf,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			subprojects: PathBuf::from("subprojects"),
			source_root: PathBuf::from("src/main/java"),
			demo_root: PathBuf::from("subprojects/demos/src/main/java/demos"),
			assets: PathBuf::from("assets"),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
	/// Info string of generated code fences.
	pub language: String,
	/// File extension of source files, without the dot.
	pub extension: String,
	/// Prefix marking an import statement.
	pub import_marker: String,
	/// Default branch or commit for deep links.
	pub revision: String,
}

impl Default for SourceConfig {
	fn default() -> Self {
		Self {
			language: "java".to_string(),
			extension: "java".to_string(),
			import_marker: "import ".to_string(),
			revision: "main".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
	/// Generated API documentation of the repository.
	pub javadoc: String,
	/// API documentation of the language's standard library.
	pub java_api: String,
	/// Hosted repository, `blob/{revision}/{path}` is appended.
	pub repository: String,
	/// Raw file access to the repository's default branch.
	pub raw_repository: String,
	/// Raw file access to the asset repository.
	pub assets: String,
}

impl Default for UrlConfig {
	fn default() -> Self {
		Self {
			javadoc: "https://engine-pi.github.io/javadocs".to_string(),
			java_api: "https://docs.oracle.com/en/java/javase/17/docs/api".to_string(),
			repository: "https://github.com/engine-pi/engine-pi".to_string(),
			raw_repository: "https://raw.githubusercontent.com/engine-pi/engine-pi/refs/heads/main"
				.to_string(),
			assets: "https://raw.githubusercontent.com/engine-pi/assets/refs/heads/main".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
	/// Text in front of the deep link under a code excerpt.
	pub source_link: String,
	/// Heading of the `methods` list, followed by the class link.
	pub methods_heading: String,
	/// Body of the admonition inserted by `contribute`.
	pub contribute: String,
}

impl Default for LabelConfig {
	fn default() -> Self {
		Self {
			source_link: "Zum Java-Code".to_string(),
			methods_heading: "Methoden in der Klasse".to_string(),
			contribute: "Diese Hilfeseite hat leider noch keinen Inhalt. Hilf mit und fülle diese \
			             Seite mit Inhalt."
				.to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
	/// Directory containing the page templates.
	pub docs_dir: PathBuf,
	/// Directory the rendered pages are written to.
	pub out_dir: PathBuf,
	/// Glob patterns, relative to `docs_dir`, selecting the pages to render.
	pub include: Vec<String>,
	/// Gitignore-style patterns, relative to `docs_dir`, for pages to skip.
	pub exclude: Vec<String>,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			docs_dir: PathBuf::from("docs"),
			out_dir: PathBuf::from("site"),
			include: vec!["**/*.md".to_string()],
			exclude: Vec::new(),
		}
	}
}

impl DocsnipConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> DocsnipResult<Option<DocsnipConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Load the discovered config or fall back to the defaults.
	pub fn load_or_default(root: &Path) -> DocsnipResult<DocsnipConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> DocsnipResult<DocsnipConfig> {
		toml::from_str(content).map_err(|e| DocsnipError::ConfigParse(e.to_string()))
	}
}
