// PDF backend: ReportDocument blocks -> genpdf elements -> file.

use genpdf::elements::{
    Break, FrameCellDecorator, Image, PageBreak, Paragraph as PdfParagraph, StyledElement,
    TableLayout,
};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Element, PaperSize, Scale, SimplePageDecorator};
use image::GenericImageView;
use std::path::Path;
use tracing::{info, warn};

use super::DocumentWriter;
use super::fonts::load_font_family;
use super::layout::{Block, BoxContent, Paragraph, ReportDocument};
use super::render::NO_DATA;
use crate::config::ReportConfig;

const MARGIN_MM: i32 = 10;
const BOX_PADDING_MM: i32 = 2;
const HEADING_FONT_SIZE: u8 = 22;
/// genpdf places images at 300 dpi unless told otherwise.
const IMAGE_DPI: f64 = 300.0;
const CHART_WIDTH_IN: f64 = 6.0;
const CHART_HEIGHT_IN: f64 = 1.7;

pub struct PdfWriter {
    fonts: FontFamily<FontData>,
}

impl PdfWriter {
    /// Loads the configured font family up front so a missing font fails before any AWS call.
    pub fn new(config: &ReportConfig) -> anyhow::Result<Self> {
        Ok(Self {
            fonts: load_font_family(&config.font_dir, &config.font_family)?,
        })
    }

    fn build(&self, document: &ReportDocument) -> anyhow::Result<genpdf::Document> {
        let mut doc = genpdf::Document::new(self.fonts.clone());
        doc.set_title(document.title());
        doc.set_paper_size(PaperSize::A4);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM);
        doc.set_page_decorator(decorator);

        for block in document.blocks() {
            match block {
                Block::Heading(text) => doc.push(
                    PdfParagraph::new(text.clone())
                        .aligned(Alignment::Center)
                        .styled(Style::new().bold().with_font_size(HEADING_FONT_SIZE)),
                ),
                Block::Paragraph(p) => doc.push(paragraph(p)),
                Block::BorderedBox(content) => doc.push(bordered_box(content)?),
                Block::Spacer => doc.push(Break::new(1)),
                Block::PageBreak => doc.push(PageBreak::new()),
            }
        }
        Ok(doc)
    }
}

impl DocumentWriter for PdfWriter {
    fn save(&self, document: &ReportDocument, path: &Path) -> anyhow::Result<()> {
        let doc = self.build(document)?;
        doc.render_to_file(path)
            .map_err(|e| anyhow::anyhow!("writing {}: {}", path.display(), e))?;
        info!(path = %path.display(), "report saved");
        Ok(())
    }
}

fn paragraph(p: &Paragraph) -> StyledElement<PdfParagraph> {
    let mut style = Style::new();
    if p.bold {
        style = style.bold();
    }
    if let Some(size) = p.font_size {
        style = style.with_font_size(size);
    }
    let mut para = PdfParagraph::new(p.text.clone());
    if p.centered {
        para.set_alignment(Alignment::Center);
    }
    para.styled(style)
}

fn bold_centered(text: &str) -> StyledElement<PdfParagraph> {
    PdfParagraph::new(text.to_string())
        .aligned(Alignment::Center)
        .styled(Style::new().bold())
}

/// Single-cell framed table holding bold text or a chart scaled to the fixed display size.
/// A chart that cannot be decoded is shown as "NO DATA".
fn bordered_box(content: &BoxContent) -> anyhow::Result<TableLayout> {
    let mut table = TableLayout::new(vec![1]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    let row = table.row();
    let pushed = match content {
        BoxContent::Text(text) => row.element(bold_centered(text).padded(BOX_PADDING_MM)).push(),
        BoxContent::Image(path) => match chart_image(path) {
            Ok(image) => row.element(image.padded(BOX_PADDING_MM)).push(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chart image unreadable");
                row.element(bold_centered(NO_DATA).padded(BOX_PADDING_MM)).push()
            }
        },
    };
    pushed.map_err(|e| anyhow::anyhow!("laying out bordered box: {}", e))?;
    Ok(table)
}

fn chart_image(path: &Path) -> anyhow::Result<Image> {
    let decoded = image::open(path)
        .map_err(|e| anyhow::anyhow!("decoding {}: {}", path.display(), e))?;
    let (px_width, px_height) = decoded.dimensions();
    anyhow::ensure!(
        px_width > 0 && px_height > 0,
        "{} has no pixels",
        path.display()
    );
    // genpdf rejects alpha channels; CloudWatch PNGs carry one.
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut image = Image::from_dynamic_image(rgb)
        .map_err(|e| anyhow::anyhow!("embedding {}: {}", path.display(), e))?;
    image.set_alignment(Alignment::Center);
    image.set_scale(Scale::new(
        CHART_WIDTH_IN * IMAGE_DPI / f64::from(px_width),
        CHART_HEIGHT_IN * IMAGE_DPI / f64::from(px_height),
    ));
    Ok(image)
}
