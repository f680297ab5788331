// src/layout/fonts.rs
//! Width metrics for the standard Helvetica faces (AFM units, 1000/em).
//! These are the 14 built-in PDF fonts, so no font file is embedded.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Oblique,
}

impl Face {
    /// PostScript base-font name used in the PDF font dictionary
    pub fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
        }
    }

    /// Resource name inside content streams
    pub fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
        }
    }
}

// Helvetica widths for ASCII 0x20..=0x7E
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

// Helvetica-Bold widths for ASCII 0x20..=0x7E
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // A..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, // a..z
    389, 280, 389, 584, // {..~
];

const FALLBACK_WIDTH: u16 = 600;

/// Glyph advance in thousandths of an em
pub fn char_width(face: Face, c: char) -> u16 {
    let table = match face {
        Face::Bold => &HELVETICA_BOLD,
        // The oblique face shares regular metrics
        Face::Regular | Face::Oblique => &HELVETICA,
    };

    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Advance width of `text` at `size` points
pub fn text_width(face: Face, size: f32, text: &str) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(face, c))).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width(Face::Regular, ' '), 278);
        assert_eq!(char_width(Face::Regular, 'W'), 944);
        assert_eq!(char_width(Face::Regular, 'i'), 222);
        assert_eq!(char_width(Face::Bold, 'i'), 278);
        assert_eq!(char_width(Face::Regular, '~'), 584);
    }

    #[test]
    fn test_non_ascii_falls_back() {
        assert_eq!(char_width(Face::Regular, 'é'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let at_10 = text_width(Face::Regular, 10.0, "Hello");
        let at_20 = text_width(Face::Regular, 20.0, "Hello");
        assert!((at_20 - 2.0 * at_10).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let regular = text_width(Face::Regular, 12.0, "skills");
        let bold = text_width(Face::Bold, 12.0, "skills");
        assert!(bold > regular);
    }
}
