// src/pdf.rs
//! Minimal PDF writer for laid-out pages.
//!
//! Emits PDF 1.4 with the standard Type1 Helvetica faces, one content stream
//! per page and a classic xref table. Only what the layout engine produces is
//! supported: positioned text runs and horizontal rules.

use crate::layout::engine::{Element, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::layout::fonts::Face;

const FACES: [Face; 3] = [Face::Regular, Face::Bold, Face::Oblique];

/// Escape a string for a PDF literal string object
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if (c as u32) < 0x20 => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Encode to WinAnsi-ish bytes; anything outside latin-1 becomes '?'
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut stream: Vec<u8> = Vec::new();

    for element in &page.elements {
        match element {
            Element::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                let header = format!(
                    "BT\n/{} {:.2} Tf\n{:.3} {:.3} {:.3} rg\n1 0 0 1 {:.2} {:.2} Tm\n(",
                    face.resource(),
                    size,
                    color.0,
                    color.1,
                    color.2,
                    x,
                    y
                );
                stream.extend_from_slice(header.as_bytes());
                stream.extend_from_slice(&encode_text(&escape_text(text)));
                stream.extend_from_slice(b") Tj\nET\n");
            }
            Element::Rule { x, y, width, color } => {
                let rect = format!(
                    "{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} 0.75 re f\n",
                    color.0, color.1, color.2, x, y, width
                );
                stream.extend_from_slice(rect.as_bytes());
            }
        }
    }

    stream
}

/// Serialize laid-out pages into a complete PDF file
pub fn render(pages: &[Page]) -> Vec<u8> {
    // Object layout: 1 catalog, 2 page tree, 3..5 fonts,
    // then (page, content) pairs.
    let font_base = 3;
    let first_page_obj = font_base + FACES.len();
    let object_count = first_page_obj + pages.len() * 2 - 1;

    let mut buf: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::with_capacity(object_count + 1);

    buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let begin_obj = |buf: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize| {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    };

    // Catalog
    begin_obj(&mut buf, &mut offsets, 1);
    buf.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    // Page tree
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_obj + i * 2))
        .collect();
    begin_obj(&mut buf, &mut offsets, 2);
    buf.extend_from_slice(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            pages.len()
        )
        .as_bytes(),
    );

    // Fonts
    for (i, face) in FACES.iter().enumerate() {
        begin_obj(&mut buf, &mut offsets, font_base + i);
        buf.extend_from_slice(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
                face.base_font()
            )
            .as_bytes(),
        );
    }

    let font_resources: Vec<String> = FACES
        .iter()
        .enumerate()
        .map(|(i, face)| format!("/{} {} 0 R", face.resource(), font_base + i))
        .collect();
    let resources = format!("<< /Font << {} >> >>", font_resources.join(" "));

    // Pages and their content streams
    for (i, page) in pages.iter().enumerate() {
        let page_obj = first_page_obj + i * 2;
        let content_obj = page_obj + 1;

        begin_obj(&mut buf, &mut offsets, page_obj);
        buf.extend_from_slice(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources {} /Contents {} 0 R >>\nendobj\n",
                PAGE_WIDTH, PAGE_HEIGHT, resources, content_obj
            )
            .as_bytes(),
        );

        let stream = content_stream(page);
        begin_obj(&mut buf, &mut offsets, content_obj);
        buf.extend_from_slice(format!("<< /Length {} >>\nstream\n", stream.len()).as_bytes());
        buf.extend_from_slice(&stream);
        buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    // Xref table and trailer
    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            xref_offset
        )
        .as_bytes(),
    );

    buf
}
