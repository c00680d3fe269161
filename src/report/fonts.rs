// Font family loading for the PDF writer. genpdf needs the four TTF styles of one family on disk.

use genpdf::fonts::{self, FontData, FontFamily};
use std::path::{Path, PathBuf};

const FONT_STYLES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

/// `<dir>/<family>-<Style>.ttf` for every style genpdf loads.
pub fn required_font_files(dir: &Path, family: &str) -> Vec<PathBuf> {
    FONT_STYLES
        .iter()
        .map(|style| dir.join(format!("{}-{}.ttf", family, style)))
        .collect()
}

pub fn missing_font_files(dir: &Path, family: &str) -> Vec<PathBuf> {
    required_font_files(dir, family)
        .into_iter()
        .filter(|path| !path.is_file())
        .collect()
}

pub fn load_font_family(dir: &Path, family: &str) -> anyhow::Result<FontFamily<FontData>> {
    anyhow::ensure!(
        dir.is_dir(),
        "font directory {} not found (report.font_dir)",
        dir.display()
    );
    let missing = missing_font_files(dir, family);
    anyhow::ensure!(
        missing.is_empty(),
        "missing font files: {}",
        missing
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    fonts::from_files(dir, family, None).map_err(|e| {
        anyhow::anyhow!(
            "loading font family '{}' from {}: {}",
            family,
            dir.display(),
            e
        )
    })
}
