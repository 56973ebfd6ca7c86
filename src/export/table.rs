//! Paginated table layout
//!
//! Lays rows out in five fixed columns across as many pages as needed. Units
//! are millimetres with the origin at the top-left corner of the page.
//!
//! Every page draws the column headers on the same baseline, so each page
//! holds [`PageConfig::rows_per_page`] rows. The report title sits above the
//! headers on the first page only, and the generation footer is stamped on
//! the last page only.
//!
//! Cell values are never truncated or wrapped; a value wider than its column
//! runs into the next one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::row::{ExportRow, COLUMNS, PLACEHOLDER};

/// Title drawn on the first page
pub const REPORT_TITLE: &str = "Tasks Report";

/// Label in the first cell of the synthetic row used for empty reports
pub const NO_DATA: &str = "No data";

/// Page geometry for the table layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,

    /// Absolute x positions of the five columns
    pub column_offsets: [f64; 5],

    /// Vertical pitch between body rows
    pub row_height: f64,

    /// Distance from the top margin to the title baseline
    pub title_offset: f64,
    /// Distance from the title baseline to the header baseline
    pub header_gap: f64,
    /// Distance from the header baseline to the separator
    pub separator_gap: f64,
    /// Distance from the separator to the first body baseline
    pub content_gap: f64,
    /// Distance from the bottom edge to the footer baseline
    pub footer_offset: f64,

    pub title_font_size: f64,
    pub header_font_size: f64,
    pub body_font_size: f64,
    pub footer_font_size: f64,

    /// Separator gray level, 0 (black) to 255 (white)
    pub separator_gray: u8,
}

impl Default for PageConfig {
    /// Landscape A4
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin: 14.0,
            column_offsets: [14.0, 99.0, 169.0, 209.0, 249.0],
            row_height: 8.0,
            title_offset: 10.0,
            header_gap: 10.0,
            separator_gap: 8.0,
            content_gap: 6.0,
            footer_offset: 6.0,
            title_font_size: 14.0,
            header_font_size: 11.0,
            body_font_size: 11.0,
            footer_font_size: 9.0,
            separator_gray: 200,
        }
    }
}

impl PageConfig {
    pub fn title_baseline(&self) -> f64 {
        self.margin + self.title_offset
    }

    pub fn header_baseline(&self) -> f64 {
        self.title_baseline() + self.header_gap
    }

    pub fn separator_y(&self) -> f64 {
        self.header_baseline() + self.separator_gap
    }

    pub fn first_row_baseline(&self) -> f64 {
        self.separator_y() + self.content_gap
    }

    /// Lowest baseline a body row may start on
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin
    }

    pub fn footer_baseline(&self) -> f64 {
        self.page_height - self.footer_offset
    }

    /// Number of body rows that fit on one page (at least one)
    pub fn rows_per_page(&self) -> usize {
        let span = self.bottom_limit() - self.first_row_baseline();
        if span < 0.0 || self.row_height <= 0.0 {
            return 1;
        }
        (span / self.row_height).floor() as usize + 1
    }

    /// Returns a description of the first problem found, if any
    pub fn validate(&self) -> Result<(), String> {
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err("page dimensions must be positive".to_string());
        }
        if self.margin < 0.0
            || self.margin * 2.0 >= self.page_width
            || self.margin * 2.0 >= self.page_height
        {
            return Err(format!("margin {} does not fit the page", self.margin));
        }
        if self.row_height <= 0.0 {
            return Err(format!("row_height must be positive, got {}", self.row_height));
        }
        if self.first_row_baseline() > self.bottom_limit() {
            return Err("header block leaves no room for body rows".to_string());
        }
        if self
            .column_offsets
            .windows(2)
            .any(|pair| pair[1] <= pair[0])
        {
            return Err("column_offsets must be strictly increasing".to_string());
        }
        if self.column_offsets[0] < 0.0 || self.column_offsets[4] >= self.page_width {
            return Err("column_offsets must lie on the page".to_string());
        }
        let sizes = [
            self.title_font_size,
            self.header_font_size,
            self.body_font_size,
            self.footer_font_size,
        ];
        if sizes.iter().any(|s| *s <= 0.0) {
            return Err("font sizes must be positive".to_string());
        }
        Ok(())
    }
}

/// A drawing instruction on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Element {
    /// Left-aligned text whose baseline sits at `y`
    Text {
        x: f64,
        y: f64,
        size: f64,
        content: String,
    },
    /// Horizontal or vertical rule
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        gray: u8,
    },
}

/// One page of drawing instructions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    fn text(&mut self, x: f64, y: f64, size: f64, content: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            content: content.into(),
        });
    }

    /// All text runs on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { content, .. } => Some(content.as_str()),
            Element::Line { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Texts drawn on the given baseline, in drawing order
    pub fn line_at(&self, baseline: f64) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { y, content, .. } if (*y - baseline).abs() < 1e-6 => {
                    Some(content.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Line { .. }))
            .count()
    }
}

/// A laid-out multi-page document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Cursor state while laying out pages
struct Layout<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    cursor: f64,
}

impl<'a> Layout<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            cursor: 0.0,
        }
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Opens a page and draws its header block
    fn start_page(&mut self) {
        let first = self.pages.is_empty();
        self.pages.push(Page::default());
        let config = self.config;
        let page = self.current();

        if first {
            page.text(
                config.margin,
                config.title_baseline(),
                config.title_font_size,
                REPORT_TITLE,
            );
        }

        for (x, header) in config.column_offsets.iter().zip(COLUMNS) {
            page.text(*x, config.header_baseline(), config.header_font_size, header);
        }

        let y = config.separator_y();
        page.elements.push(Element::Line {
            x1: config.margin,
            y1: y,
            x2: config.page_width - config.margin,
            y2: y,
            gray: config.separator_gray,
        });

        self.cursor = config.first_row_baseline();
    }

    fn emit_row(&mut self, cells: &[String; 5]) {
        if self.cursor > self.config.bottom_limit() {
            debug!(
                "Page break before row at y={:.1} (limit {:.1})",
                self.cursor,
                self.config.bottom_limit()
            );
            self.start_page();
        }

        let config = self.config;
        let y = self.cursor;
        let page = self.current();
        for (x, cell) in config.column_offsets.iter().zip(cells) {
            page.text(*x, y, config.body_font_size, cell.as_str());
        }
        self.cursor += config.row_height;
    }

    fn finalize(mut self, generated_at: &str) -> Document {
        let config = self.config;
        self.current().text(
            config.margin,
            config.footer_baseline(),
            config.footer_font_size,
            format!("Generated: {}", generated_at),
        );

        Document {
            width: config.page_width,
            height: config.page_height,
            pages: self.pages,
        }
    }
}

/// Lays out rows as a paginated table
///
/// An empty slice renders a single `No data` row so the document always has
/// a visible body. `generated_at` is stamped in the footer of the last page.
pub fn render_paginated_table(
    rows: &[ExportRow],
    config: &PageConfig,
    generated_at: &str,
) -> Document {
    let mut layout = Layout::new(config);
    layout.start_page();

    if rows.is_empty() {
        let empty = [NO_DATA, PLACEHOLDER, PLACEHOLDER, PLACEHOLDER, PLACEHOLDER].map(String::from);
        layout.emit_row(&empty);
    } else {
        for row in rows {
            layout.emit_row(&row.display_cells());
        }
    }

    let document = layout.finalize(generated_at);
    debug!(
        "Laid out {} rows on {} pages ({} per page)",
        rows.len(),
        document.page_count(),
        config.rows_per_page()
    );
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayLocale, TaskRecord};

    const STAMP: &str = "1/2/2025, 3:04:05 PM";

    fn rows(count: usize) -> Vec<ExportRow> {
        (1..=count)
            .map(|i| {
                ExportRow::from_task(
                    &TaskRecord::new(format!("Task {}", i)),
                    &DisplayLocale::default(),
                )
            })
            .collect()
    }

    /// Ten rows per page: first row at 48, limit at 120
    fn ten_per_page() -> PageConfig {
        PageConfig {
            page_height: 134.0,
            ..PageConfig::default()
        }
    }

    fn body_titles(doc: &Document) -> Vec<Vec<String>> {
        doc.pages
            .iter()
            .map(|page| {
                page.elements
                    .iter()
                    .filter_map(|e| match e {
                        Element::Text { x, content, .. }
                            if *x == 14.0 && content.starts_with("Task ") =>
                        {
                            Some(content.clone())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn default_layout_geometry() {
        let config = PageConfig::default();
        assert_eq!(config.title_baseline(), 24.0);
        assert_eq!(config.header_baseline(), 34.0);
        assert_eq!(config.separator_y(), 42.0);
        assert_eq!(config.first_row_baseline(), 48.0);
        assert_eq!(config.bottom_limit(), 196.0);
        assert_eq!(config.rows_per_page(), 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_rows_render_single_placeholder_row() {
        let doc = render_paginated_table(&[], &PageConfig::default(), STAMP);

        assert_eq!(doc.page_count(), 1);
        assert_eq!(
            doc.pages[0].line_at(48.0),
            vec!["No data", "-", "-", "-", "-"]
        );
        assert!(doc.pages[0].line_at(56.0).is_empty());
    }

    #[test]
    fn headers_at_fixed_offsets() {
        let doc = render_paginated_table(&rows(1), &PageConfig::default(), STAMP);
        let page = &doc.pages[0];

        assert_eq!(page.line_at(34.0), COLUMNS.to_vec());
        let header_xs: Vec<f64> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { x, y, .. } if *y == 34.0 => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(header_xs, vec![14.0, 99.0, 169.0, 209.0, 249.0]);
        assert_eq!(page.line_count(), 1);
    }

    #[test]
    fn exactly_one_page_at_capacity() {
        let config = ten_per_page();
        assert_eq!(config.rows_per_page(), 10);

        let doc = render_paginated_table(&rows(10), &config, STAMP);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn overflow_starts_second_page_with_headers_but_no_title() {
        let doc = render_paginated_table(&rows(11), &ten_per_page(), STAMP);

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].contains_text(REPORT_TITLE));
        assert!(!doc.pages[1].contains_text(REPORT_TITLE));

        assert_eq!(doc.pages[1].line_at(34.0), COLUMNS.to_vec());
        assert_eq!(doc.pages[1].line_count(), 1);
        assert_eq!(doc.pages[1].line_at(48.0)[0], "Task 11");
    }

    #[test]
    fn pages_are_ceil_of_rows_over_capacity() {
        let doc = render_paginated_table(&rows(37), &ten_per_page(), STAMP);
        assert_eq!(doc.page_count(), 4);

        let per_page: Vec<usize> = body_titles(&doc).iter().map(Vec::len).collect();
        assert_eq!(per_page, vec![10, 10, 10, 7]);
    }

    #[test]
    fn rows_keep_order_across_pages() {
        let doc = render_paginated_table(&rows(25), &ten_per_page(), STAMP);
        let flat: Vec<String> = body_titles(&doc).into_iter().flatten().collect();
        let expected: Vec<String> = (1..=25).map(|i| format!("Task {}", i)).collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn footer_only_on_last_page() {
        let doc = render_paginated_table(&rows(21), &ten_per_page(), STAMP);
        let footer = format!("Generated: {}", STAMP);

        assert_eq!(doc.page_count(), 3);
        assert!(!doc.pages[0].contains_text(&footer));
        assert!(!doc.pages[1].contains_text(&footer));
        assert!(doc.pages[2].contains_text(&footer));
        assert_eq!(doc.pages[2].line_at(128.0), vec![footer.as_str()]);
    }

    #[test]
    fn long_values_are_not_truncated() {
        let long = "x".repeat(300);
        let row = ExportRow::from_task(&TaskRecord::new(long.clone()), &DisplayLocale::default());

        let doc = render_paginated_table(&[row], &PageConfig::default(), STAMP);
        assert!(doc.pages[0].contains_text(&long));
        // the next column still starts at its own offset
        assert!(doc.pages[0].elements.iter().any(|e| matches!(
            e,
            Element::Text { x, y, content, .. } if *x == 99.0 && *y == 48.0 && content == "-"
        )));
    }

    #[test]
    fn page_without_body_room_is_invalid() {
        let config = PageConfig {
            page_height: 40.0,
            ..PageConfig::default()
        };
        assert_eq!(config.rows_per_page(), 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_layouts() {
        let unordered = PageConfig {
            column_offsets: [14.0, 99.0, 90.0, 209.0, 249.0],
            ..PageConfig::default()
        };
        assert!(unordered.validate().is_err());

        let flat = PageConfig {
            row_height: 0.0,
            ..PageConfig::default()
        };
        assert!(flat.validate().is_err());

        let off_page = PageConfig {
            column_offsets: [14.0, 99.0, 169.0, 209.0, 304.0],
            ..PageConfig::default()
        };
        assert!(off_page.validate().is_err());
    }
}
