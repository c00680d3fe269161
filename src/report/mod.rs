// Report rendering: section layout (render), block model (layout), PDF output (pdf, fonts)

pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod render;

use std::path::Path;

pub use layout::{Block, BoxContent, Paragraph, ReportDocument};
pub use pdf::PdfWriter;
pub use render::ReportRenderer;

/// Persists a laid-out report. Errors here are fatal for the run.
pub trait DocumentWriter {
    fn save(&self, document: &ReportDocument, path: &Path) -> anyhow::Result<()>;
}
