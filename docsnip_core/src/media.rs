//! Embeds for images, videos and diagrams plus small page fragments.

/// Wrap `content` in a `<figure>` with a caption. Without a caption the
/// content is returned unchanged.
pub fn caption(content: &str, caption: Option<&str>) -> String {
	let Some(caption) = caption else {
		return content.to_string();
	};

	format!(
		"<figure>\n    <p>{content}</p>\n    <figcaption>\n        <p>{caption}</p>\n    </figcaption>\n</figure>\n"
	)
}

pub fn image(assets_url: &str, relpath: &str, caption_text: Option<&str>) -> String {
	let src = asset_url(assets_url, relpath);
	caption(&format!("<img src=\"{src}\">"), caption_text)
}

/// An autoplaying, looping MP4 with a download link for browsers without
/// video support.
pub fn video(assets_url: &str, relpath: &str, caption_text: Option<&str>) -> String {
	let src = asset_url(assets_url, relpath);
	let content = format!(
		"<video autoplay loop>\n    <source src=\"{src}\" type=\"video/mp4\" />\n    Download \
		 the\n    <a href=\"{src}\">MP4</a>\n    video.\n</video>\n"
	);

	caption(&content, caption_text)
}

/// Image embed of `docs/drawio/{basename}.drawio` from the repository.
pub fn drawio(raw_repository: &str, basename: &str) -> String {
	format!(
		"![]({}/docs/drawio/{basename}.drawio)",
		raw_repository.trim_end_matches('/')
	)
}

/// Warning admonition for pages that still lack content.
pub fn contribute(text: &str) -> String {
	format!("!!! warning\n\n    {text}\n")
}

fn asset_url(assets_url: &str, relpath: &str) -> String {
	format!("{}/{relpath}", assets_url.trim_end_matches('/'))
}
