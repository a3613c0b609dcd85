//! Output filename derivation.

use std::path::Path;

/// Fallback stem when the input name has none.
const DEFAULT_STEM: &str = "output";

/// Derive the `.txt` name for a converted file from the original file name.
///
/// Directory components are dropped and the last extension is replaced.
///
/// ```rust
/// use audio_to_hex::export::suggested_filename;
///
/// assert_eq!(suggested_filename("song.mp3"), "song.txt");
/// assert_eq!(suggested_filename("/music/live.set.flac"), "live.set.txt");
/// assert_eq!(suggested_filename("README"), "README.txt");
/// assert_eq!(suggested_filename(""), "output.txt");
/// ```
pub fn suggested_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());

    format!("{stem}.txt")
}
