use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use docsnip_cli::Commands;
use docsnip_cli::DocsnipCli;
use docsnip_cli::OutputFormat;
use docsnip_core::DocsnipConfig;
use docsnip_core::DocsnipError;
use docsnip_core::LineSelection;
use docsnip_core::Macros;
use docsnip_core::SnippetError;
use docsnip_core::resolver::to_url_path;
use docsnip_core::site::CheckResult;
use docsnip_core::site::check_site;
use docsnip_core::site::render_site;
use docsnip_core::site::write_pages;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

const LOG_ENV: &str = "DOCSNIP_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocsnipCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Render { dry_run, watch }) => run_render(&args, *dry_run, *watch),
		Some(Commands::Check { diff, format }) => run_check(&args, *diff, *format),
		Some(Commands::Excerpt {
			identifier,
			start_line,
			end_line,
			line,
			from_import,
			no_link,
			blob,
		}) => {
			run_excerpt(
				&args,
				identifier,
				[*start_line, *end_line, *line],
				*from_import,
				!*no_link,
				blob.as_deref(),
			)
		}
		Some(Commands::Resolve {
			class_path,
			no_check,
		}) => run_resolve(&args, class_path, !*no_check),
		None => {
			eprintln!("No subcommand specified. Run `docsnip --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		report_error(e);
		process::exit(2);
	}
}

/// Log to stderr. `DOCSNIP_LOG` takes an `EnvFilter` directive and wins over
/// `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

/// Render library errors through miette for error codes and help text.
fn report_error(e: Box<dyn std::error::Error>) {
	let e = match e.downcast::<DocsnipError>() {
		Ok(error) => {
			let report: miette::Report = (*error).into();
			eprintln!("{report:?}");
			return;
		}
		Err(e) => e,
	};

	match e.downcast::<SnippetError>() {
		Ok(error) => {
			let report: miette::Report = (*error).into();
			eprintln!("{report:?}");
		}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn resolve_root(args: &DocsnipCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_macros(args: &DocsnipCli) -> Result<Macros, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let macros = Macros::load(&root)?;

	if args.verbose {
		let config_path = DocsnipConfig::resolve_path(&root)
			.map_or_else(|| "defaults".to_string(), |path| make_relative(&path, &root));
		println!(
			"Loaded config: {config_path} ({} project(s))",
			macros.resolver().registry().len()
		);
	}

	Ok(macros)
}

fn run_init(args: &DocsnipCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = DocsnipConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("docsnip.toml");
	let sample_config = "# docsnip configuration. Sections left out keep their defaults.\n\n# Project \
	                     key (first segment of a class path) -> directory below \
	                     `layout.subprojects`.\n[projects]\npi = \"engine\"\ndemos = \
	                     \"demos\"\n\n[layout]\nsubprojects = \"subprojects\"\nsource_root = \
	                     \"src/main/java\"\ndemo_root = \
	                     \"subprojects/demos/src/main/java/demos\"\nassets = \
	                     \"assets\"\n\n[source]\nlanguage = \"java\"\nextension = \
	                     \"java\"\nimport_marker = \"import \"\nrevision = \"main\"\n\n# \
	                     [urls]\n# javadoc = \"https://engine-pi.github.io/javadocs\"\n# \
	                     repository = \"https://github.com/engine-pi/engine-pi\"\n\n[site]\ndocs_dir \
	                     = \"docs\"\nout_dir = \"site\"\n\n# Variables available in every \
	                     page.\n# [extra]\n# version = \"1.0.0\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Register your projects under [projects]");
	println!("  2. Reference code in your pages:");
	println!("     {{{{ class('pi.actor.Actor') }}}}");
	println!("     {{{{ code('actor/ActorDemo', start_line=10, end_line=20) }}}}");
	println!("  3. Run `docsnip render` to render the pages");

	Ok(())
}

fn run_render(
	args: &DocsnipCli,
	dry_run: bool,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	run_render_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	let root = resolve_root(args);
	let out_dir = DocsnipConfig::load_or_default(&root)?.site.out_dir;
	watch_files(&root, &out_dir, || {
		println!("\nFile change detected, rendering...");
		if let Err(e) = run_render_once(args, false) {
			report_error(e);
		}
	})
}

fn run_render_once(args: &DocsnipCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let macros = load_macros(args)?;

	if dry_run {
		let check = check_site(&macros)?;
		if check.is_ok() {
			println!("All pages are already up to date.");
			return Ok(());
		}

		println!("Dry run: would write {} page(s):", check.stale.len());
		for entry in &check.stale {
			println!("  {}", make_relative(&entry.page.output, &root));
		}
		return Ok(());
	}

	let result = render_site(&macros)?;
	let written = write_pages(&result)?;

	if written == 0 {
		println!("All pages are already up to date.");
	} else {
		println!(
			"Rendered {} page(s), {written} file(s) updated.",
			result.pages.len()
		);
	}

	if args.verbose {
		for rendered in &result.pages {
			println!("  {}", make_relative(&rendered.page.output, &root));
		}
	}

	Ok(())
}

fn run_check(
	args: &DocsnipCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let macros = load_macros(args)?;
	let result = check_site(&macros)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => {
				let output = serde_json::json!({
					"ok": true,
					"checked": result.checked,
					"stale": [],
				});
				println!("{output}");
			}
			OutputFormat::Github => {
				println!("All pages are up to date.");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: all {} page(s) are up to date.",
					result.checked
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale_entries: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"page": entry.page.name(),
						"source": make_relative(&entry.page.source, &root),
						"output": make_relative(&entry.page.output, &root),
						"missing": entry.current_content.is_none(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"checked": result.checked,
				"stale": stale_entries,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for entry in &result.stale {
				let source = make_relative(&entry.page.source, &root);
				println!(
					"::warning file={source},line=1::Rendered page `{}` is out of date",
					make_relative(&entry.page.output, &root)
				);
			}
			eprintln!("{}", check_summary(&result));
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("{}", colored!("Stale pages:", bold));
			for entry in &result.stale {
				let status = if entry.current_content.is_some() {
					colored!("outdated", yellow)
				} else {
					colored!("missing", red)
				};
				eprintln!(
					"  {} -> {} [{status}]",
					entry.page.name(),
					make_relative(&entry.page.output, &root)
				);

				if show_diff {
					print_diff(
						entry.current_content.as_deref().unwrap_or_default(),
						&entry.expected_content,
					);
				}
			}

			eprintln!();
			eprintln!("{}", check_summary(&result));
		}
	}

	process::exit(1);
}

fn check_summary(result: &CheckResult) -> String {
	format!(
		"{} of {} page(s) are out of date. Run `docsnip render` to fix.",
		result.stale.len(),
		result.checked
	)
}

fn run_excerpt(
	args: &DocsnipCli,
	identifier: &str,
	[start_line, end_line, line]: [usize; 3],
	from_import: bool,
	link: bool,
	blob: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let macros = load_macros(args)?;
	let selection = LineSelection::from_options(start_line, end_line, line, from_import)?;
	let blob = blob.unwrap_or(&macros.config().source.revision);

	let output = macros.code(identifier, selection, link, blob)?;
	println!("{output}");

	Ok(())
}

fn run_resolve(
	args: &DocsnipCli,
	class_path: &str,
	check: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let macros = load_macros(args)?;
	let path = macros.resolver().resolve_class_path(class_path, check)?;
	println!("{}", to_url_path(&path));

	Ok(())
}

/// Call `on_change` for every batch of file changes below `root`, ignoring
/// changes inside the output directory.
fn watch_files(
	root: &Path,
	out_dir: &Path,
	mut on_change: impl FnMut(),
) -> Result<(), Box<dyn std::error::Error>> {
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = std::fs::canonicalize(root)?;
	let out_dir = root.join(out_dir);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				let is_change = matches!(
					event.kind,
					notify::EventKind::Modify(_)
						| notify::EventKind::Create(_)
						| notify::EventKind::Remove(_)
				);
				if is_change && !event.paths.iter().all(|path| path.starts_with(&out_dir)) {
					tracing::debug!(paths = ?event.paths, "file change");
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		on_change();
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	to_url_path(path.strip_prefix(root).unwrap_or(path))
}
