//! PDF encoder backed by `lopdf`.
//!
//! Pages are A4 portrait set in the standard Helvetica faces, so no font files
//! are embedded. Text is encoded as WinAnsi; characters outside Latin-1 print as `?`.

use crate::error::{AppError, AppResult};
use crate::projection::{has_headers, Column, Projection};
use crate::render::DocumentRenderer;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::mem;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Lays projected data out as a bordered table or a borderless two-column list.
#[derive(Debug, Clone)]
pub struct PrintRenderer {
    /// Page width and height in points.
    pub page_size: (i64, i64),
    /// Margin on every side, in points.
    pub margin: i64,
    /// Font size in points.
    pub font_size: i64,
    /// Distance between baselines, in points.
    pub line_height: i64,
    /// Inner cell padding, in points.
    pub padding: i64,
}

impl Default for PrintRenderer {
    fn default() -> Self {
        Self {
            page_size: (595, 842),
            margin: 36,
            font_size: 9,
            line_height: 11,
            padding: 3,
        }
    }
}

impl DocumentRenderer for PrintRenderer {
    fn render(&self, columns: &[Column], projection: &Projection) -> AppResult<Vec<u8>> {
        let mut pager = Pager::new(self);
        match projection {
            Projection::Table(rows) => {
                let widths = self.equal_widths(columns.len());
                let header: Option<Vec<String>> = has_headers(columns)
                    .then(|| columns.iter().map(|c| c.header.clone()).collect());

                if let Some(header) = &header {
                    self.draw_row(&mut pager, &widths, header, BOLD, true);
                }
                for row in rows {
                    let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                    if !pager.fits(self.row_height(&widths, &cells)) {
                        pager.break_page();
                        if let Some(header) = &header {
                            self.draw_row(&mut pager, &widths, header, BOLD, true);
                        }
                    }
                    self.draw_row(&mut pager, &widths, &cells, REGULAR, true);
                }
            }
            Projection::List(entries) => {
                let usable = self.usable_width();
                let widths = [usable * 2 / 5, usable - usable * 2 / 5];
                for entry in entries {
                    let cells = [entry.label.clone(), entry.value.to_string()];
                    if !pager.fits(self.row_height(&widths, &cells)) {
                        pager.break_page();
                    }
                    self.draw_list_entry(&mut pager, &widths, &cells);
                }
            }
        }
        self.encode(pager.finish())
    }
}

impl PrintRenderer {
    fn usable_width(&self) -> i64 {
        self.page_size.0 - 2 * self.margin
    }

    fn usable_height(&self) -> i64 {
        self.page_size.1 - 2 * self.margin
    }

    fn equal_widths(&self, count: usize) -> Vec<i64> {
        if count == 0 {
            return Vec::new();
        }
        vec![self.usable_width() / count as i64; count]
    }

    /// Splits `text` into printable lines clipped to `width`.
    fn fit_lines(&self, text: &str, width: i64) -> Vec<String> {
        // Helvetica averages about half an em per glyph.
        let max_chars = ((width - 2 * self.padding) * 2 / self.font_size.max(1)).max(1) as usize;
        let max_lines = ((self.usable_height() - 2 * self.padding) / self.line_height).max(1) as usize;
        text.split('\n')
            .take(max_lines)
            .map(|line| line.chars().take(max_chars).collect())
            .collect()
    }

    fn row_height<S: AsRef<str>>(&self, widths: &[i64], cells: &[S]) -> i64 {
        let lines = widths
            .iter()
            .zip(cells)
            .map(|(w, c)| self.fit_lines(c.as_ref(), *w).len())
            .max()
            .unwrap_or(1)
            .max(1);
        lines as i64 * self.line_height + 2 * self.padding
    }

    fn draw_row<S: AsRef<str>>(
        &self,
        pager: &mut Pager<'_>,
        widths: &[i64],
        cells: &[S],
        font: &str,
        bordered: bool,
    ) {
        let height = self.row_height(widths, cells);
        let top = pager.cursor;
        let mut x = self.margin;
        for (width, cell) in widths.iter().zip(cells) {
            if bordered {
                pager.rect(x, top - height, *width, height);
            }
            for (i, line) in self.fit_lines(cell.as_ref(), *width).iter().enumerate() {
                let baseline = top - self.padding - self.font_size - i as i64 * self.line_height;
                pager.text(font, self.font_size, x + self.padding, baseline, line);
            }
            x += width;
        }
        pager.cursor -= height;
    }

    fn draw_list_entry(&self, pager: &mut Pager<'_>, widths: &[i64; 2], cells: &[String; 2]) {
        let height = self.row_height(widths, cells);
        let top = pager.cursor;
        let mut x = self.margin;
        for ((width, cell), font) in widths.iter().zip(cells).zip([BOLD, REGULAR]) {
            for (i, line) in self.fit_lines(cell, *width).iter().enumerate() {
                let baseline = top - self.padding - self.font_size - i as i64 * self.line_height;
                pager.text(font, self.font_size, x + self.padding, baseline, line);
            }
            x += width;
        }
        pager.cursor -= height;
    }

    fn encode(&self, pages: Vec<Vec<Operation>>) -> AppResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| AppError::Render(format!("pdf: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(self.page_size.0),
                Object::Integer(self.page_size.1),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| AppError::Render(format!("pdf: {}", e)))?;
        Ok(buffer)
    }
}

/// Accumulates content-stream operations page by page.
struct Pager<'r> {
    renderer: &'r PrintRenderer,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    cursor: i64,
}

impl<'r> Pager<'r> {
    fn new(renderer: &'r PrintRenderer) -> Self {
        Self {
            renderer,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: renderer.page_size.1 - renderer.margin,
        }
    }

    /// True when a block of `height` fits above the bottom margin, or the page is still empty.
    fn fits(&self, height: i64) -> bool {
        self.ops.is_empty() || self.cursor - height >= self.renderer.margin
    }

    fn break_page(&mut self) {
        self.pages.push(mem::take(&mut self.ops));
        self.cursor = self.renderer.page_size.1 - self.renderer.margin;
    }

    fn text(&mut self, font: &str, size: i64, x: i64, y: i64, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![Object::Integer(x), Object::Integer(y)],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn rect(&mut self, x: i64, y: i64, width: i64, height: i64) {
        self.ops.push(Operation::new(
            "re",
            vec![
                Object::Integer(x),
                Object::Integer(y),
                Object::Integer(width),
                Object::Integer(height),
            ],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

/// Latin-1 bytes; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Cell, Entry};

    fn is_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(b"%PDF-")
    }

    #[test]
    fn test_table_document() {
        let columns = vec![Column::new("id", "ID"), Column::new("name", "Name")];
        let projection = Projection::Table(vec![vec![Cell::from(1usize), Cell::from("A")]]);
        let bytes = PrintRenderer::default()
            .render(&columns, &projection)
            .unwrap();
        assert!(is_pdf(&bytes));
    }

    #[test]
    fn test_list_document() {
        let columns = vec![Column::new("title", ""), Column::new("value", "")];
        let projection = Projection::List(vec![
            Entry::new("Name", "Zoë"),
            Entry::new("City", "東京"),
            Entry::blank(),
        ]);
        let bytes = PrintRenderer::default()
            .render(&columns, &projection)
            .unwrap();
        assert!(is_pdf(&bytes));
    }

    #[test]
    fn test_empty_projection_still_has_a_page() {
        let bytes = PrintRenderer::default()
            .render(&[], &Projection::Table(Vec::new()))
            .unwrap();
        assert!(is_pdf(&bytes));
    }

    #[test]
    fn test_long_tables_paginate() {
        let renderer = PrintRenderer::default();
        let columns = vec![Column::new("id", "ID")];
        let rows: Vec<_> = (0..200).map(|i| vec![Cell::from(i as usize)]).collect();

        let mut pager = Pager::new(&renderer);
        let widths = renderer.equal_widths(1);
        for row in &rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            if !pager.fits(renderer.row_height(&widths, &cells)) {
                pager.break_page();
            }
            renderer.draw_row(&mut pager, &widths, &cells, REGULAR, true);
        }
        assert!(pager.finish().len() > 1);

        let bytes = renderer
            .render(&columns, &Projection::Table(rows))
            .unwrap();
        assert!(is_pdf(&bytes));
    }

    #[test]
    fn test_fit_lines_clips() {
        let renderer = PrintRenderer::default();
        let lines = renderer.fit_lines("abcdefghijklmnopqrstuvwxyz\nsecond", 30);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].len() < 26);
        assert_eq!(lines[1], "second");
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("é\tx€"), vec![0xE9, b' ', b'x', b'?']);
    }
}
