// src/layout/engine.rs
//! The export pass: measure text, wrap it to the column, order sections by
//! visibility and paginate everything across fixed-size A4 pages.

use crate::layout::fonts::{self, Face};
use crate::layout::template::Template;
use crate::types::{CoverLetterDocument, ResumeDocument};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const BULLET: &str = "•  ";
const BULLET_INDENT: f32 = 14.0;

#[derive(Debug, Clone)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: (f32, f32, f32),
        text: String,
    },
    Rule {
        x: f32,
        y: f32,
        width: f32,
        color: (f32, f32, f32),
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone)]
struct Line {
    face: Face,
    size: f32,
    color: (f32, f32, f32),
    indent: f32,
    text: String,
    rule_after: bool,
}

/// A run of lines placed together; `keep_lines` lines must fit on the current
/// page or the whole block starts on the next one (headings stay with their
/// first content line).
#[derive(Debug, Clone)]
struct Block {
    spacing_before: f32,
    keep_lines: usize,
    lines: Vec<Line>,
}

pub struct LayoutEngine {
    template: Template,
}

impl LayoutEngine {
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    fn column_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * self.template.margin_pt
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.template.line_height
    }

    /// Greedy word wrap against the real glyph widths
    fn wrap(&self, face: Face, size: f32, max_width: f32, text: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if fonts::text_width(face, size, &candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // A single word wider than the column gets hard-split
            if fonts::text_width(face, size, word) > max_width {
                let mut piece = String::new();
                for c in word.chars() {
                    piece.push(c);
                    if fonts::text_width(face, size, &piece) > max_width && piece.len() > 1 {
                        piece.pop();
                        lines.push(std::mem::take(&mut piece));
                        piece.push(c);
                    }
                }
                current = piece;
            } else {
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn wrapped_lines(
        &self,
        face: Face,
        size: f32,
        color: (f32, f32, f32),
        indent: f32,
        text: &str,
    ) -> Vec<Line> {
        self.wrap(face, size, self.column_width() - indent, text)
            .into_iter()
            .map(|text| Line {
                face,
                size,
                color,
                indent,
                text,
                rule_after: false,
            })
            .collect()
    }

    fn header_blocks(&self, doc: &ResumeDocument) -> Vec<Block> {
        let t = &self.template;
        let mut blocks = Vec::new();
        let black = (0.0, 0.0, 0.0);

        let mut header_lines = Vec::new();
        if !doc.contact.name.is_empty() {
            header_lines.extend(self.wrapped_lines(
                Face::Bold,
                t.name_size,
                t.accent,
                0.0,
                &doc.contact.name,
            ));
        }
        if !doc.contact.headline.is_empty() {
            header_lines.extend(self.wrapped_lines(
                Face::Oblique,
                t.base_size + 1.0,
                black,
                0.0,
                &doc.contact.headline,
            ));
        }
        let contact_line = doc.contact.summary_line();
        if !contact_line.is_empty() {
            header_lines.extend(self.wrapped_lines(
                Face::Regular,
                t.base_size,
                black,
                0.0,
                &contact_line,
            ));
        }

        for field in doc.visible_custom_fields() {
            let text = if field.title.is_empty() {
                field.content.clone()
            } else {
                format!("{}: {}", field.title, field.content)
            };
            if text.is_empty() {
                continue;
            }
            let face = if field.is_link {
                Face::Oblique
            } else {
                Face::Regular
            };
            header_lines.extend(self.wrapped_lines(face, t.base_size, black, 0.0, &text));
        }

        if let Some(last) = header_lines.last_mut() {
            last.rule_after = true;
        }
        if !header_lines.is_empty() {
            blocks.push(Block {
                spacing_before: 0.0,
                keep_lines: 1,
                lines: header_lines,
            });
        }

        blocks
    }

    fn resume_blocks(&self, doc: &ResumeDocument) -> Vec<Block> {
        let t = &self.template;
        let black = (0.0, 0.0, 0.0);
        let mut blocks = self.header_blocks(doc);

        for section in &doc.sections {
            let title = if section.title.is_empty() {
                "Untitled section"
            } else {
                &section.title
            };

            let mut heading_lines =
                self.wrapped_lines(Face::Bold, t.heading_size, t.accent, 0.0, title);
            if t.section_rule {
                if let Some(last) = heading_lines.last_mut() {
                    last.rule_after = true;
                }
            }

            let mut section_lines = heading_lines;
            let heading_count = section_lines.len();

            for (key, values) in section.ordered_entries() {
                if !key.is_empty() {
                    section_lines.extend(self.wrapped_lines(
                        Face::Bold,
                        t.base_size,
                        black,
                        0.0,
                        key,
                    ));
                }
                for value in values {
                    if value.is_empty() {
                        continue;
                    }
                    let mut bullet_lines = self.wrapped_lines(
                        Face::Regular,
                        t.base_size,
                        black,
                        BULLET_INDENT,
                        value,
                    );
                    if let Some(first) = bullet_lines.first_mut() {
                        first.text = format!("{}{}", BULLET, first.text);
                        first.indent = 0.0;
                    }
                    section_lines.extend(bullet_lines);
                }
            }

            // Heading plus at least one content line stay together
            let keep = (heading_count + 1).min(section_lines.len());
            blocks.push(Block {
                spacing_before: t.heading_size,
                keep_lines: keep,
                lines: section_lines,
            });
        }

        blocks
    }

    fn cover_letter_blocks(&self, doc: &CoverLetterDocument) -> Vec<Block> {
        let t = &self.template;
        let black = (0.0, 0.0, 0.0);
        let mut blocks = self.header_blocks(&ResumeDocument {
            contact: doc.contact.clone(),
            ..Default::default()
        });

        let mut address_lines = Vec::new();
        for part in [&doc.recipient, &doc.company] {
            if !part.is_empty() {
                address_lines.extend(self.wrapped_lines(
                    Face::Regular,
                    t.base_size,
                    black,
                    0.0,
                    part,
                ));
            }
        }
        if !address_lines.is_empty() {
            blocks.push(Block {
                spacing_before: t.base_size * 2.0,
                keep_lines: address_lines.len(),
                lines: address_lines,
            });
        }

        if !doc.greeting.is_empty() {
            blocks.push(Block {
                spacing_before: t.base_size * 1.5,
                keep_lines: 1,
                lines: self.wrapped_lines(Face::Regular, t.base_size, black, 0.0, &doc.greeting),
            });
        }

        for paragraph in &doc.paragraphs {
            if paragraph.is_empty() {
                continue;
            }
            blocks.push(Block {
                spacing_before: t.base_size,
                keep_lines: 1,
                lines: self.wrapped_lines(Face::Regular, t.base_size, black, 0.0, paragraph),
            });
        }

        let mut sign_off = Vec::new();
        for part in [&doc.closing, &doc.signature] {
            if !part.is_empty() {
                sign_off.extend(self.wrapped_lines(Face::Regular, t.base_size, black, 0.0, part));
            }
        }
        if !sign_off.is_empty() {
            blocks.push(Block {
                spacing_before: t.base_size * 1.5,
                keep_lines: sign_off.len(),
                lines: sign_off,
            });
        }

        blocks
    }

    fn paginate(&self, blocks: Vec<Block>) -> Vec<Page> {
        let margin = self.template.margin_pt;
        let bottom = margin;
        let top = PAGE_HEIGHT - margin;

        let mut pages = vec![Page::default()];
        let mut y = top;

        for block in blocks {
            let keep_height: f32 = block
                .lines
                .iter()
                .take(block.keep_lines.max(1))
                .map(|line| self.line_height(line.size))
                .sum();

            let at_top = (y - top).abs() < f32::EPSILON;
            if !at_top && y - block.spacing_before - keep_height < bottom {
                pages.push(Page::default());
                y = top;
            } else if !at_top {
                y -= block.spacing_before;
            }

            for line in block.lines {
                let line_h = self.line_height(line.size);
                if y - line_h < bottom {
                    pages.push(Page::default());
                    y = top;
                }
                y -= line_h;

                let page = pages.last_mut().expect("at least one page");
                let rule_after = line.rule_after;
                let rule_y = y - 3.0;
                page.elements.push(Element::Text {
                    x: margin + line.indent,
                    y,
                    face: line.face,
                    size: line.size,
                    color: line.color,
                    text: line.text,
                });
                if rule_after {
                    page.elements.push(Element::Rule {
                        x: margin,
                        y: rule_y,
                        width: self.column_width(),
                        color: self.template.accent,
                    });
                    y -= 6.0;
                }
            }
        }

        pages
    }

    /// Lay a resume out across pages. Never fails: missing content just
    /// produces a sparse (possibly empty) page.
    pub fn paginate_resume(&self, doc: &ResumeDocument) -> Vec<Page> {
        self.paginate(self.resume_blocks(doc))
    }

    pub fn paginate_cover_letter(&self, doc: &CoverLetterDocument) -> Vec<Page> {
        self.paginate(self.cover_letter_blocks(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::template::TemplateRegistry;
    use crate::types::{ContactInfo, CustomField, Section};

    fn engine() -> LayoutEngine {
        let registry = TemplateRegistry::new();
        LayoutEngine::new(registry.resolve(None).clone())
    }

    fn sample_doc() -> ResumeDocument {
        let mut section = Section {
            id: "exp".to_string(),
            title: "Experience".to_string(),
            content: Default::default(),
        };
        section.content.insert(
            "Acme Corp — Engineer".to_string(),
            vec![
                "Built the billing pipeline".to_string(),
                "Cut export latency in half".to_string(),
            ],
        );

        ResumeDocument {
            id: "doc-1".to_string(),
            contact: ContactInfo {
                name: "Ada Lovelace".to_string(),
                headline: "Software Engineer".to_string(),
                email: "ada@example.com".to_string(),
                ..Default::default()
            },
            custom: Default::default(),
            sections: vec![section],
        }
    }

    #[test]
    fn test_empty_document_yields_one_page() {
        let pages = engine().paginate_resume(&ResumeDocument::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].elements.is_empty());
    }

    #[test]
    fn test_sample_document_lays_out_on_one_page() {
        let pages = engine().paginate_resume(&sample_doc());
        assert_eq!(pages.len(), 1);

        let texts: Vec<&str> = pages[0]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                Element::Rule { .. } => None,
            })
            .collect();
        assert!(texts.contains(&"Ada Lovelace"));
        assert!(texts.contains(&"Experience"));
        assert!(texts.iter().any(|t| t.starts_with(BULLET)));
    }

    #[test]
    fn test_hidden_custom_fields_are_skipped() {
        let mut doc = sample_doc();
        doc.custom.insert(
            "x".to_string(),
            CustomField {
                id: "x".to_string(),
                title: "Secret".to_string(),
                content: "do not render".to_string(),
                visible: false,
                is_link: false,
            },
        );

        let pages = engine().paginate_resume(&doc);
        let all_text: String = pages
            .iter()
            .flat_map(|p| &p.elements)
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.clone()),
                Element::Rule { .. } => None,
            })
            .collect();
        assert!(!all_text.contains("Secret"));
    }

    #[test]
    fn test_long_content_breaks_onto_more_pages() {
        let mut doc = sample_doc();
        for i in 0..40 {
            let mut section = Section {
                id: format!("s{}", i),
                title: format!("Section {}", i),
                content: Default::default(),
            };
            section.content.insert(
                "Role".to_string(),
                vec!["A reasonably long bullet describing the work done there".to_string(); 4],
            );
            doc.sections.push(section);
        }

        let pages = engine().paginate_resume(&doc);
        assert!(pages.len() > 1);

        // Everything must sit inside the page box
        for page in &pages {
            for element in &page.elements {
                let y = match element {
                    Element::Text { y, .. } => *y,
                    Element::Rule { y, .. } => *y,
                };
                assert!(y >= 0.0 && y <= PAGE_HEIGHT);
            }
        }
    }

    #[test]
    fn test_wrap_respects_column_width() {
        let engine = engine();
        let text = "one two three four five six seven eight nine ten ".repeat(5);
        let lines = engine.wrap(Face::Regular, 10.0, 200.0, &text);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(fonts::text_width(Face::Regular, 10.0, line) <= 200.0);
        }
    }

    #[test]
    fn test_wrap_hard_splits_overlong_word() {
        let engine = engine();
        let word = "a".repeat(400);
        let lines = engine.wrap(Face::Regular, 10.0, 100.0, &word);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(fonts::text_width(Face::Regular, 10.0, line) <= 100.0 + 10.0);
        }
    }

    #[test]
    fn test_cover_letter_layout() {
        let doc = CoverLetterDocument {
            contact: ContactInfo {
                name: "Ada Lovelace".to_string(),
                ..Default::default()
            },
            recipient: "Hiring Team".to_string(),
            company: "Acme Corp".to_string(),
            greeting: "Dear Hiring Team,".to_string(),
            paragraphs: vec!["I am writing to apply.".to_string()],
            closing: "Kind regards,".to_string(),
            signature: "Ada".to_string(),
            ..Default::default()
        };

        let pages = engine().paginate_cover_letter(&doc);
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].elements.is_empty());
    }
}
