use std::collections::BTreeSet;

/// Page size the backend itself falls back to.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Server-side filtering for a graph load. Values are normalized on the way in,
/// so two configs compare equal exactly when they request the same pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
	batch_size: u32,
	skip_extensions: BTreeSet<String>,
	skip_directories: BTreeSet<String>,
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			batch_size: DEFAULT_BATCH_SIZE,
			skip_extensions: BTreeSet::new(),
			skip_directories: BTreeSet::new(),
		}
	}
}

impl FilterConfig {
	pub fn new<E, D>(batch_size: u32, extensions: E, directories: D) -> Self
	where
		E: IntoIterator,
		E::Item: AsRef<str>,
		D: IntoIterator,
		D::Item: AsRef<str>,
	{
		Self {
			batch_size: batch_size.max(1),
			skip_extensions: extensions
				.into_iter()
				.filter_map(|e| normalize_extension(e.as_ref()))
				.collect(),
			skip_directories: directories
				.into_iter()
				.filter_map(|d| normalize_directory(d.as_ref()))
				.collect(),
		}
	}

	/// Build from free-form comma separated input, e.g. `"md, .TXT"`.
	pub fn parse(batch_size: u32, extensions: &str, directories: &str) -> Self {
		Self::new(batch_size, extensions.split(','), directories.split(','))
	}

	pub fn batch_size(&self) -> u32 {
		self.batch_size
	}

	pub fn skip_extensions(&self) -> &BTreeSet<String> {
		&self.skip_extensions
	}

	pub fn skip_directories(&self) -> &BTreeSet<String> {
		&self.skip_directories
	}

	pub fn extensions_csv(&self) -> String {
		join(&self.skip_extensions)
	}

	pub fn directories_csv(&self) -> String {
		join(&self.skip_directories)
	}
}

fn join(set: &BTreeSet<String>) -> String {
	set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// `"MD"` and `".md"` both become `".md"`.
pub fn normalize_extension(raw: &str) -> Option<String> {
	let trimmed = raw.trim().trim_start_matches('.');
	if trimmed.is_empty() {
		return None;
	}
	Some(format!(".{}", trimmed.to_lowercase()))
}

pub fn normalize_directory(raw: &str) -> Option<String> {
	let trimmed = raw.trim().trim_matches('/');
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}
