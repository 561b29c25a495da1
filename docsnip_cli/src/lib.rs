use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render documentation pages that reference a source repository.",
	long_about = "docsnip renders Markdown pages containing template macros into plain Markdown \
	              for a static site generator.\n\nMacros link classes to the API documentation, \
	              embed images and videos, and quote line ranges of source files with a deep \
	              link to the hosted copy. A reference to a missing class, file or asset fails \
	              the build.\n\nQuick start:\n  docsnip init     Create a docsnip.toml\n  docsnip \
	              render   Render the docs directory\n  docsnip check    Verify the rendered \
	              pages are up to date"
)]
pub struct DocsnipCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the repository root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize docsnip in a repository by creating a `docsnip.toml`.
	///
	/// The file lists every option with its default value. If a config file
	/// already exists this command is a no-op and exits successfully.
	Init,
	/// Render every page of the docs directory into the output directory.
	///
	/// Pages are minijinja templates. Every macro reference is resolved
	/// against the repository and the first broken reference aborts the
	/// build without writing anything.
	Render {
		/// Render the pages and list the files that would change without
		/// writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch the repository and render again whenever a file changes.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check that the rendered pages in the output directory are up to date.
	///
	/// Exits with status code 1 if any page is missing or outdated. Ideal for
	/// CI pipelines to catch documentation that references moved or deleted
	/// code.
	Check {
		/// Show a unified diff for each stale page.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print a fenced excerpt of a source file, as the `code` macro would.
	Excerpt {
		/// Class path such as `pi.actor.Actor` or demo path such as
		/// `actor/ActorDemo`.
		#[arg(value_name = "PATH")]
		identifier: String,

		/// First line of the excerpt, 1-indexed.
		#[arg(long, default_value_t = 0)]
		start_line: usize,

		/// Last line of the excerpt, inclusive.
		#[arg(long, default_value_t = 0)]
		end_line: usize,

		/// Show a single line. Takes precedence over the range.
		#[arg(long, default_value_t = 0)]
		line: usize,

		/// Start at the first import statement and run to the end of the
		/// file.
		#[arg(long, default_value_t = false)]
		from_import: bool,

		/// Omit the deep link below the excerpt.
		#[arg(long, default_value_t = false)]
		no_link: bool,

		/// Revision the deep link points at. Defaults to `source.revision`.
		#[arg(long)]
		blob: Option<String>,
	},
	/// Print the repository-relative file a class path resolves to.
	Resolve {
		/// Class or package path such as `pi.actor.Actor`.
		class_path: String,

		/// Do not require the file to exist.
		#[arg(long, default_value_t = false)]
		no_check: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each stale entry includes
	/// the page, its output path and whether the output exists.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` annotations for
	/// every stale page.
	Github,
}
