use std::path::Path;

use tempfile::TempDir;

use crate::DocsnipConfig;
use crate::Macros;

pub(crate) const ACTOR_JAVA: &str = "package pi.actor;

import java.awt.Color;
import java.util.List;

/**
 * Base class of everything on screen.
 */
public class Actor {
    private Color color;

    public void color(Color color) {
        this.color = color;
    }
}
";

/// First import on line 5, blank lines at 2 and 6.
pub(crate) const IMPORT_DEMO_JAVA: &str = "package demos;

// Shows how a game
// is started.
import pi.Game;

public class ImportDemo {
}
";

pub(crate) const NO_IMPORT_JAVA: &str = "package demos;

public class NoImport {
}
";

/// `line N` for every line from 1 to `count`.
pub(crate) fn numbered_lines(count: usize) -> String {
	(1..=count).map(|n| format!("line {n}\n")).collect()
}

pub(crate) fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap();
	}
	std::fs::write(path, content).unwrap();
}

/// A temporary checkout laid out like the engine-pi repository.
pub(crate) fn repo() -> TempDir {
	let tmp = tempfile::tempdir().unwrap();
	let root = tmp.path();

	write(
		root,
		"subprojects/engine/src/main/java/pi/actor/Actor.java",
		ACTOR_JAVA,
	);
	write(
		root,
		"subprojects/engine/src/main/java/pi/Resources.java",
		"package pi;\n\npublic class Resources {\n}\n",
	);
	write(
		root,
		"subprojects/demos/src/main/java/demos/basics/Counting.java",
		&numbered_lines(30),
	);
	write(
		root,
		"subprojects/demos/src/main/java/demos/actor/ImportDemo.java",
		IMPORT_DEMO_JAVA,
	);
	write(
		root,
		"subprojects/demos/src/main/java/demos/basics/NoImport.java",
		NO_IMPORT_JAVA,
	);
	write(root, "assets/logo/logo.png", "png");
	write(root, "assets/videos/intro.mp4", "mp4");
	write(root, "docs/drawio/readme.md", "# Diagrams\n");
	write(root, "docs/drawio/architecture.drawio", "<mxfile/>\n");

	tmp
}

/// Macros with the default configuration bound to `root`.
pub(crate) fn macros(root: &Path) -> Macros {
	Macros::new(root, DocsnipConfig::default())
}
