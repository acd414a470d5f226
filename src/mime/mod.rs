// Content-type detection for uploaded files

use std::path::Path;

/// Strategy for guessing the MIME type of a file on disk
///
/// Selected once at startup; implementations must be pure with respect to
/// the path so uploads stay deterministic
pub trait MimeGuesser: Send + Sync {
    fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Portable extension-based lookup, the default strategy on every platform
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionGuesser;

impl MimeGuesser for ExtensionGuesser {
    fn mime_type(&self, path: &Path) -> Option<String> {
        mime_guess::from_path(path).first().map(|m| m.to_string())
    }
}

/// The guesser used when none is supplied explicitly
pub fn default_guesser() -> Box<dyn MimeGuesser> {
    Box::new(ExtensionGuesser)
}
