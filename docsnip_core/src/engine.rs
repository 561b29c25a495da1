use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::ErrorKind;
use minijinja::UndefinedBehavior;
use minijinja::Value;
use minijinja::value::Rest;

use crate::DocsnipError;
use crate::DocsnipResult;
use crate::SnippetError;
use crate::SnippetResult;
use crate::args::MacroArgs;
use crate::config::DocsnipConfig;
use crate::excerpt::CodeSample;
use crate::excerpt::LineSelection;
use crate::excerpt::select;
use crate::links;
use crate::links::LineAnchor;
use crate::media;
use crate::resolver::SourceResolver;
use crate::resolver::to_url_path;
use crate::source::SourceCache;

/// The documentation macros bound to one repository checkout.
///
/// Cloning is cheap, all clones share the resolver and the source cache.
#[derive(Debug, Clone)]
pub struct Macros {
	inner: Arc<MacroContext>,
}

#[derive(Debug)]
struct MacroContext {
	config: DocsnipConfig,
	resolver: SourceResolver,
	cache: SourceCache,
}

impl Macros {
	pub fn new(root: impl Into<PathBuf>, config: DocsnipConfig) -> Self {
		let root = root.into();
		let resolver = SourceResolver::from_config(root.clone(), &config);
		let cache = SourceCache::new(root);

		Self {
			inner: Arc::new(MacroContext {
				config,
				resolver,
				cache,
			}),
		}
	}

	/// Load the config discovered at `root` (or the defaults) and bind the
	/// macros to it.
	pub fn load(root: &Path) -> DocsnipResult<Self> {
		let config = DocsnipConfig::load_or_default(root)?;
		Ok(Self::new(root, config))
	}

	pub fn config(&self) -> &DocsnipConfig {
		&self.inner.config
	}

	pub fn resolver(&self) -> &SourceResolver {
		&self.inner.resolver
	}

	pub fn cache(&self) -> &SourceCache {
		&self.inner.cache
	}

	/// `{{ class('pi.actor.Actor') }}`
	pub fn class(&self, class_path: &str, link_title: Option<&str>) -> SnippetResult<String> {
		let class_path = class_path.replace('/', ".");
		let url_path = self.resolver().class_url_path(&class_path, true)?;
		let title = link_title.unwrap_or_else(|| links::class_name(&class_path));

		Ok(links::class_link(
			&self.config().urls.javadoc,
			&url_path,
			title,
		))
	}

	/// `{{ java_class('java.awt.Color') }}`, never checked against the
	/// source tree.
	pub fn java_class(
		&self,
		class_path: &str,
		link_title: Option<&str>,
		module: &str,
	) -> SnippetResult<String> {
		let url_path = self.resolver().class_url_path(class_path, false)?;
		let title = link_title.unwrap_or_else(|| links::class_name(class_path));

		Ok(links::java_class_link(
			&self.config().urls.java_api,
			module,
			&url_path,
			title,
		))
	}

	/// `{{ package('pi.actor') }}`
	pub fn package(&self, package_path: &str, link_title: Option<&str>) -> SnippetResult<String> {
		let url_path = self.resolver().class_url_path(package_path, true)?;
		let title = link_title.unwrap_or(package_path);

		Ok(links::package_link(
			&self.config().urls.javadoc,
			&url_path,
			title,
		))
	}

	/// `{{ method('pi.actor.Actor', 'color(java.awt.Color)') }}`
	pub fn method(
		&self,
		class_path: &str,
		method: &str,
		link_title: Option<&str>,
	) -> SnippetResult<String> {
		let url_path = self.resolver().class_url_path(class_path, true)?;
		let title = link_title.unwrap_or(method);

		Ok(links::member_link(
			&self.config().urls.javadoc,
			&url_path,
			method,
			title,
		))
	}

	/// A heading linking the class followed by a list of method links.
	pub fn methods(&self, class_path: &str, methods: &[String]) -> SnippetResult<String> {
		let class_link = self.class(class_path, None)?;
		let method_links = methods
			.iter()
			.map(|method| self.method(class_path, method, None))
			.collect::<SnippetResult<Vec<_>>>()?;

		Ok(links::methods_list(
			&self.config().labels.methods_heading,
			&class_link,
			&method_links,
		))
	}

	/// `{{ attribute('pi.Resources', 'colors') }}`, titled with the class name
	/// unless a title is given.
	pub fn attribute(
		&self,
		class_path: &str,
		attribute: &str,
		link_title: Option<&str>,
	) -> SnippetResult<String> {
		let url_path = self.resolver().class_url_path(class_path, true)?;
		let title = link_title.unwrap_or_else(|| links::class_name(class_path));

		Ok(links::member_link(
			&self.config().urls.javadoc,
			&url_path,
			attribute,
			title,
		))
	}

	/// Deep link to a demo file relative to the demo root.
	pub fn demo(&self, relpath: &str, blob: &str, anchor: &LineAnchor) -> SnippetResult<String> {
		let path = self.resolver().resolve_demo_path(relpath)?;
		let url = links::code_url(
			&self.config().urls.repository,
			&to_url_path(&path),
			blob,
			anchor,
		);
		let display = format!("demos/{}", self.resolver().with_extension(relpath));

		Ok(links::source_link(
			&self.config().labels.source_link,
			&display,
			&url,
		))
	}

	pub fn image(&self, relpath: &str, caption: Option<&str>) -> SnippetResult<String> {
		self.resolver().check_asset(relpath)?;
		Ok(media::image(&self.config().urls.assets, relpath, caption))
	}

	pub fn video(&self, relpath: &str, caption: Option<&str>) -> SnippetResult<String> {
		self.resolver().check_asset(relpath)?;
		Ok(media::video(&self.config().urls.assets, relpath, caption))
	}

	pub fn contribute(&self) -> String {
		media::contribute(&self.config().labels.contribute)
	}

	/// Link to a file of the repository, e.g. `docs/index.md`.
	pub fn repo_link(&self, relpath: &str, link_title: Option<&str>) -> SnippetResult<String> {
		self.resolver().check_repo_path(relpath)?;
		Ok(links::repo_link(
			&self.config().urls.repository,
			relpath,
			link_title.unwrap_or(relpath),
		))
	}

	/// Embed `docs/drawio/{basename}.drawio`, which must exist.
	pub fn drawio(&self, basename: &str) -> SnippetResult<String> {
		self.resolver()
			.check_repo_path(&format!("docs/drawio/{basename}.drawio"))?;
		Ok(media::drawio(&self.config().urls.raw_repository, basename))
	}

	/// Resolve `path` (class path or demo path) and cut `selection` out of it.
	pub fn code_sample(&self, path: &str, selection: LineSelection) -> SnippetResult<CodeSample> {
		let relative = self.resolver().resolve_source(path)?;
		let file = self.cache().get(&relative)?;
		select(&file, selection, &self.config().source.import_marker)
	}

	/// A fenced excerpt of `path`, followed by a deep link to the same lines
	/// at `blob` when `link` is set.
	pub fn code(
		&self,
		path: &str,
		selection: LineSelection,
		link: bool,
		blob: &str,
	) -> SnippetResult<String> {
		let sample = self.code_sample(path, selection)?;
		let mut output = sample.fenced_code_block(&self.config().source.language);

		if link {
			let relpath = to_url_path(&sample.path);
			let url = links::code_url(
				&self.config().urls.repository,
				&relpath,
				blob,
				&sample.anchor(),
			);
			output.push('\n');
			output.push_str(&links::source_link(
				&self.config().labels.source_link,
				&relpath,
				&url,
			));
		}

		Ok(output)
	}

	/// A single line of `path` without a deep link.
	pub fn line(&self, path: &str, line: usize) -> SnippetResult<String> {
		let revision = &self.config().source.revision;
		self.code(path, LineSelection::Line(line), false, revision)
	}

	/// Register every macro as a function on `env`.
	pub fn register(&self, env: &mut Environment<'_>) {
		self.add(env, "class", &["class_path", "link_title"], |m, a| {
			m.class(
				&a.required_str("class_path")?,
				a.optional_str("link_title")?.as_deref(),
			)
		});
		self.add(
			env,
			"java_class",
			&["class_path", "link_title", "module"],
			|m, a| {
				m.java_class(
					&a.required_str("class_path")?,
					a.optional_str("link_title")?.as_deref(),
					&a.str_or("module", "java.base")?,
				)
			},
		);
		self.add(env, "package", &["package_path", "link_title"], |m, a| {
			m.package(
				&a.required_str("package_path")?,
				a.optional_str("link_title")?.as_deref(),
			)
		});
		self.add(
			env,
			"method",
			&["class_path", "method", "link_title"],
			|m, a| {
				m.method(
					&a.required_str("class_path")?,
					&a.required_str("method")?,
					a.optional_str("link_title")?.as_deref(),
				)
			},
		);
		self.add(env, "methods", &["class_path", "methods"], |m, a| {
			m.methods(&a.required_str("class_path")?, &a.str_list("methods")?)
		});
		self.add(
			env,
			"attribute",
			&["class_path", "attribute", "link_title"],
			|m, a| {
				m.attribute(
					&a.required_str("class_path")?,
					&a.required_str("attribute")?,
					a.optional_str("link_title")?.as_deref(),
				)
			},
		);
		self.add(
			env,
			"demo",
			&["relpath", "blob", "lines", "start_line", "end_line"],
			|m, a| {
				let anchor = LineAnchor::from_options(
					a.optional_str("lines")?.as_deref(),
					a.number("start_line")?,
					a.number("end_line")?,
				)?;
				m.demo(
					&a.required_str("relpath")?,
					&a.str_or("blob", &m.config().source.revision)?,
					&anchor,
				)
			},
		);
		self.add(env, "image", &["relpath", "caption"], |m, a| {
			m.image(
				&a.required_str("relpath")?,
				a.optional_str("caption")?.as_deref(),
			)
		});
		self.add(env, "video", &["relpath", "caption"], |m, a| {
			m.video(
				&a.required_str("relpath")?,
				a.optional_str("caption")?.as_deref(),
			)
		});
		self.add(env, "contribute", &[], |m, _| Ok(m.contribute()));
		self.add(env, "repo_link", &["relpath", "link_title"], |m, a| {
			m.repo_link(
				&a.required_str("relpath")?,
				a.optional_str("link_title")?.as_deref(),
			)
		});
		self.add(
			env,
			"code",
			&[
				"path",
				"start_line",
				"end_line",
				"line",
				"link",
				"from_import",
				"blob",
			],
			|m, a| {
				let selection = LineSelection::from_options(
					a.number("start_line")?,
					a.number("end_line")?,
					a.number("line")?,
					a.flag("from_import", false)?,
				)?;
				m.code(
					&a.required_str("path")?,
					selection,
					a.flag("link", true)?,
					&a.str_or("blob", &m.config().source.revision)?,
				)
			},
		);
		self.add(env, "line", &["relpath", "line"], |m, a| {
			m.line(&a.required_str("relpath")?, a.required_number("line")?)
		});
		self.add(env, "drawio", &["basename"], |m, a| {
			m.drawio(&a.required_str("basename")?)
		});
	}

	fn add<F>(
		&self,
		env: &mut Environment<'_>,
		name: &'static str,
		params: &'static [&'static str],
		f: F,
	) where
		F: Fn(&Macros, &MacroArgs) -> SnippetResult<String> + Send + Sync + 'static,
	{
		let macros = self.clone();
		env.add_function(
			name,
			move |args: Rest<Value>| -> Result<String, minijinja::Error> {
				MacroArgs::bind(name, params, &args)
					.and_then(|bound| f(&macros, &bound))
					.map_err(into_template_error)
			},
		);
	}

	/// Render a single page. `name` is used in error messages.
	///
	/// Undefined variables are errors and the first failing macro aborts the
	/// page, so a broken reference never makes it into the output.
	pub fn render_page(&self, name: &str, content: &str) -> DocsnipResult<String> {
		let mut env = Environment::new();
		env.set_keep_trailing_newline(true);
		env.set_undefined_behavior(UndefinedBehavior::Strict);
		env.set_auto_escape_callback(|_| AutoEscape::None);
		self.register(&mut env);

		env.add_template(name, content)
			.map_err(|e| page_error(name, &e))?;
		let template = env.get_template(name).map_err(|e| page_error(name, &e))?;
		let ctx = Value::from_serialize(&self.config().extra);

		template.render(ctx).map_err(|e| page_error(name, &e))
	}
}

fn into_template_error(error: SnippetError) -> minijinja::Error {
	minijinja::Error::new(ErrorKind::InvalidOperation, error.to_string()).with_source(error)
}

/// Recover the macro failure behind a template error, if there is one.
fn page_error(page: &str, error: &minijinja::Error) -> DocsnipError {
	let mut source = std::error::Error::source(error);
	while let Some(inner) = source {
		if let Some(snippet) = inner.downcast_ref::<SnippetError>() {
			return DocsnipError::Macro {
				page: page.to_string(),
				line: error.line().unwrap_or_default(),
				source: snippet.clone(),
			};
		}
		source = inner.source();
	}

	DocsnipError::TemplateRender(format!("{page}: {error}"))
}
