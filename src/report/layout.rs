//! Backend-independent description of the report.
//!
//! The renderer only ever appends [`Block`]s to a [`ReportDocument`]; the PDF writer turns them
//! into `genpdf` elements. Keeping the two apart lets the section logic be checked without fonts
//! or a PDF parser.

use std::path::PathBuf;

/// Content of a single bordered, centered box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxContent {
    /// Bold centered text, e.g. "STOPPED".
    Text(String),
    /// A cached chart image, scaled to the fixed chart display size.
    Image(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub bold: bool,
    pub font_size: Option<u8>,
    pub centered: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            font_size: None,
            centered: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn sized(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Centered document title.
    Heading(String),
    Paragraph(Paragraph),
    BorderedBox(BoxContent),
    /// One empty line.
    Spacer,
    PageBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDocument {
    title: String,
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.push(Block::Heading(text.into()));
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) {
        self.push(Block::Paragraph(paragraph));
    }

    /// A bordered box followed by an empty line.
    pub fn bordered_box(&mut self, content: BoxContent) {
        self.push(Block::BorderedBox(content));
        self.push(Block::Spacer);
    }

    pub fn page_break(&mut self) {
        self.push(Block::PageBreak);
    }

    pub fn bordered_boxes(&self) -> impl Iterator<Item = &BoxContent> {
        self.blocks.iter().filter_map(|b| match b {
            Block::BorderedBox(content) => Some(content),
            _ => None,
        })
    }

    /// Paths of every chart image referenced by the document.
    pub fn chart_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.bordered_boxes().filter_map(|c| match c {
            BoxContent::Image(path) => Some(path),
            BoxContent::Text(_) => None,
        })
    }
}
