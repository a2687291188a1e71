use crate::error::FontError;
use fontdue::{Font, FontSettings};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Fonts available to the rasterizer, keyed by family name.
///
/// Unknown families resolve to the bundled fallback, so drawing never fails
/// for lack of a font.
#[derive(Clone)]
pub struct FontBook {
    families: HashMap<String, Arc<Font>>,
    fallback: Arc<Font>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.families.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FontBook").field("families", &names).finish()
    }
}

fn parse(bytes: &[u8]) -> Result<Font, FontError> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(FontError::Parse)
}

impl FontBook {
    /// A book holding only the font bundled with egui.
    pub fn builtin() -> Result<Self, FontError> {
        Ok(Self {
            families: HashMap::new(),
            fallback: Arc::new(parse(epaint_default_fonts::UBUNTU_LIGHT)?),
        })
    }

    /// The builtin book plus `path` registered under `family`, if it loads.
    ///
    /// A missing or broken font file is logged and skipped.
    pub fn with_font_file(family: &str, path: Option<&Path>) -> Result<Self, FontError> {
        let mut book = Self::builtin()?;
        if let Some(path) = path {
            match book.register_file(family, path) {
                Ok(()) => log::info!("Loaded font '{}' from {}", family, path.display()),
                Err(e) => log::warn!("Using the bundled font for '{}': {}", family, e),
            }
        }
        Ok(book)
    }

    pub fn register(&mut self, family: impl Into<String>, bytes: &[u8]) -> Result<(), FontError> {
        let font = parse(bytes)?;
        self.families.insert(family.into(), Arc::new(font));
        Ok(())
    }

    pub fn register_file(&mut self, family: &str, path: &Path) -> Result<(), FontError> {
        let bytes = std::fs::read(path)?;
        self.register(family, &bytes)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// The font for `family`, or the fallback.
    pub fn resolve(&self, family: &str) -> &Font {
        self.families.get(family).map_or(&self.fallback, |font| font.as_ref())
    }

    pub fn fallback(&self) -> &Font {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::text::measure;

    #[test]
    fn unknown_family_falls_back() {
        let book = FontBook::builtin().unwrap();
        assert!(!book.contains("Inter"));
        assert!(measure(book.resolve("Inter"), "abc", 14.0) > 0.0);
    }

    #[test]
    fn broken_font_file_is_rejected() {
        let mut book = FontBook::builtin().unwrap();
        assert!(matches!(book.register("Bad", b"not a font"), Err(FontError::Parse(_))));
        assert!(!book.contains("Bad"));
    }

    #[test]
    fn missing_font_file_keeps_builtin() {
        let book = FontBook::with_font_file("Inter", Some(Path::new("/no/such/font.ttf"))).unwrap();
        assert!(!book.contains("Inter"));
    }
}
