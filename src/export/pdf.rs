//! Minimal PDF encoding for laid-out documents
//!
//! Emits PDF 1.4 with a single built-in Helvetica font in WinAnsi encoding.
//! Characters outside Latin-1 are replaced with `?`.

use super::table::{Document, Element};

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Object numbers of the fixed objects
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT: usize = 3;

/// Encodes a document as PDF bytes
pub fn encode_pdf(document: &Document) -> Vec<u8> {
    let width = document.width * MM_TO_PT;
    let height = document.height * MM_TO_PT;

    // page i uses objects (4 + 2i, 5 + 2i)
    let page_obj = |i: usize| FONT + 1 + 2 * i;

    let mut objects: Vec<Vec<u8>> = Vec::new();

    objects.push(
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES).into_bytes(),
    );

    let kids: Vec<String> = (0..document.pages.len())
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            document.pages.len()
        )
        .into_bytes(),
    );

    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    for (i, page) in document.pages.iter().enumerate() {
        objects.push(
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES,
                num(width),
                num(height),
                FONT,
                page_obj(i) + 1
            )
            .into_bytes(),
        );

        let content = page_content(&page.elements, height);
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + CATALOG).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            CATALOG,
            xref_start
        )
        .as_bytes(),
    );

    out
}

/// Content stream for one page; flips y to PDF's bottom-left origin
fn page_content(elements: &[Element], page_height: f64) -> Vec<u8> {
    let mut out = Vec::new();

    for element in elements {
        match element {
            Element::Text {
                x,
                y,
                size,
                content,
            } => {
                out.extend_from_slice(
                    format!(
                        "BT /F1 {} Tf {} {} Td (",
                        num(*size),
                        num(x * MM_TO_PT),
                        num(page_height - y * MM_TO_PT)
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(&encode_text(content));
                out.extend_from_slice(b") Tj ET\n");
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                gray,
            } => {
                out.extend_from_slice(
                    format!(
                        "{} G 0.5 w {} {} m {} {} l S\n",
                        num(f64::from(*gray) / 255.0),
                        num(x1 * MM_TO_PT),
                        num(page_height - y1 * MM_TO_PT),
                        num(x2 * MM_TO_PT),
                        num(page_height - y2 * MM_TO_PT)
                    )
                    .as_bytes(),
                );
            }
        }
    }

    out
}

/// Encodes text as the body of a PDF literal string
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            c if c.is_control() => out.push(b' '),
            c if (c as u32) < 0x100 => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Formats a coordinate with two decimals, trimming trailing zeros
fn num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
