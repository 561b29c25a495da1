//! Markdown links to API documentation and to hosted source files.

use crate::SnippetError;
use crate::SnippetResult;

/// Icon shortcode placed in front of links into the project's own API docs.
pub const JAVA_ICON: &str = ":fontawesome-brands-java:";

/// Line fragment of a deep link into a hosted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAnchor {
	/// A fragment given verbatim, e.g. `L10-L20` or `#L3`.
	Fragment(String),
	/// A range built from line numbers. The end is only used together with a
	/// start.
	Range {
		start: Option<usize>,
		end: Option<usize>,
	},
}

impl Default for LineAnchor {
	fn default() -> Self {
		Self::Range {
			start: None,
			end: None,
		}
	}
}

impl LineAnchor {
	/// Build an anchor from macro style options where `0` means unset.
	/// A verbatim `lines` fragment cannot be mixed with line numbers.
	pub fn from_options(lines: Option<&str>, start_line: usize, end_line: usize) -> SnippetResult<Self> {
		match lines {
			Some(_) if start_line > 0 || end_line > 0 => {
				Err(SnippetError::ConflictingSelection(
					"use `lines` or `start_line` and `end_line`".to_string(),
				))
			}
			Some(lines) => Ok(Self::Fragment(lines.to_string())),
			None => {
				Ok(Self::Range {
					start: (start_line > 0).then_some(start_line),
					end: (end_line > 0).then_some(end_line),
				})
			}
		}
	}

	/// The URL fragment including the leading `#`, or an empty string.
	pub fn fragment(&self) -> String {
		let lines = match self {
			Self::Fragment(lines) => lines.clone(),
			Self::Range {
				start: Some(start),
				end,
			} => {
				match end {
					Some(end) => format!("L{start}-L{end}"),
					None => format!("L{start}"),
				}
			}
			Self::Range { start: None, .. } => String::new(),
		};

		if lines.is_empty() || lines.starts_with('#') {
			lines
		} else {
			format!("#{lines}")
		}
	}
}

/// URL of `relpath` in the hosted repository at `revision`.
pub fn code_url(repository: &str, relpath: &str, revision: &str, anchor: &LineAnchor) -> String {
	format!(
		"{}/blob/{revision}/{relpath}{}",
		repository.trim_end_matches('/'),
		anchor.fragment()
	)
}

/// The small deep link printed below an excerpt.
pub fn source_link(label: &str, display: &str, url: &str) -> String {
	format!("<small>{label}: [{display}]({url})</small>")
}

/// The simple name of a class path, `Actor` for `pi.actor.Actor`.
pub fn class_name(class_path: &str) -> &str {
	class_path.rsplit(['.', '/']).next().unwrap_or(class_path)
}

/// Link to the API page of a class, `url_path` like `pi/actor/Actor`.
pub fn class_link(javadoc: &str, url_path: &str, title: &str) -> String {
	format!(
		"{JAVA_ICON}[{title}]({}/{url_path}.html)",
		javadoc.trim_end_matches('/')
	)
}

/// Link to the API page of a class from a foreign library such as the
/// standard library. `module` is the module the class belongs to.
pub fn java_class_link(java_api: &str, module: &str, url_path: &str, title: &str) -> String {
	format!(
		"[{title}]({}/{module}/{url_path}.html)",
		java_api.trim_end_matches('/')
	)
}

/// Link to the summary page of a package.
pub fn package_link(javadoc: &str, url_path: &str, title: &str) -> String {
	format!(
		"{JAVA_ICON}[{title}]({}/{url_path}/package-summary.html)",
		javadoc.trim_end_matches('/')
	)
}

/// Link to a member of a class: a method signature like
/// `color(java.awt.Color)` or a field name.
pub fn member_link(javadoc: &str, url_path: &str, member: &str, title: &str) -> String {
	format!(
		"{JAVA_ICON}[{title}]({}/{url_path}.html#{member})",
		javadoc.trim_end_matches('/')
	)
}

/// A bold heading naming the class followed by one bullet per method link.
pub fn methods_list(heading: &str, class_link: &str, method_links: &[String]) -> String {
	let mut output = format!("__{heading} {class_link}:__\n\n");
	for link in method_links {
		output.push_str("- ");
		output.push_str(link);
		output.push('\n');
	}

	output
}

/// Link to a file on the default branch of the hosted repository.
pub fn repo_link(repository: &str, relpath: &str, title: &str) -> String {
	format!(
		"[{title}]({}/blob/main/{relpath})",
		repository.trim_end_matches('/')
	)
}
