//! Positioned glyph collection.
//!
//! [`GlyphCollector`] plugs into [`pdf_extract::output_doc`] as an
//! [`OutputDev`] and records every character together with its bounding box
//! in top-left page coordinates (y grows downwards), one [`PageGlyphs`] per
//! page.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

/// An axis-aligned bounding box in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    /// Horizontal midpoint.
    #[must_use]
    pub fn h_center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical midpoint.
    #[must_use]
    pub fn v_center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether the two boxes share any area or border segment.
    ///
    /// Boxes touching at a single corner point do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let width = self.x1.min(other.x1) - self.x0.max(other.x0);
        let height = self.bottom.min(other.bottom) - self.top.max(other.top);
        width >= 0.0 && height >= 0.0 && width + height > 0.0
    }

    /// Whether the centre of `inner` lies inside this box (right and bottom
    /// borders exclusive).
    #[must_use]
    pub fn contains_center_of(&self, inner: &Self) -> bool {
        let (cx, cy) = (inner.h_center(), inner.v_center());
        self.x0 <= cx && cx < self.x1 && self.top <= cy && cy < self.bottom
    }
}

/// A single rendered character.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub bbox: BBox,
}

impl Glyph {
    /// Creates a glyph from its text and box edges.
    #[must_use]
    pub fn new(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            text: text.to_owned(),
            bbox: BBox {
                x0,
                top,
                x1,
                bottom,
            },
        }
    }

    /// Whether this glyph is a space, tab, or other blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Every glyph on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGlyphs {
    /// One-based page number.
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub glyphs: Vec<Glyph>,
}

/// [`OutputDev`] that records glyph positions instead of rendering text.
#[derive(Debug, Default)]
pub struct GlyphCollector {
    pages: Vec<PageGlyphs>,
    current: Option<PageGlyphs>,
}

impl GlyphCollector {
    /// Consumes the collector and returns the finished pages.
    #[must_use]
    pub fn into_pages(mut self) -> Vec<PageGlyphs> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.pages
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.current = Some(PageGlyphs {
            page_number: page_num,
            width: media_box.urx - media_box.llx,
            height: media_box.ury - media_box.lly,
            glyphs: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let Some(page) = self.current.as_mut() else {
            return Ok(());
        };
        if char.is_empty() {
            return Ok(());
        }

        // Scale the font size by the text rendering matrix, as the plain
        // text renderer does.
        let scaled_x = font_size.mul_add(trm.m11, font_size * trm.m21);
        let scaled_y = font_size.mul_add(trm.m12, font_size * trm.m22);
        let size = (scaled_x * scaled_y).abs().sqrt();

        let x0 = trm.m31;
        let baseline = page.height - trm.m32;

        page.glyphs.push(Glyph::new(
            char,
            x0,
            baseline - size,
            width.mul_add(size, x0),
            baseline,
        ));
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x0: f64, top: f64, x1: f64, bottom: f64) -> BBox {
        BBox {
            x0,
            top,
            x1,
            bottom,
        }
    }

    #[test]
    fn boxes_sharing_an_edge_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(10.0, 0.0, 20.0, 10.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn boxes_touching_at_a_corner_do_not_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(10.0, 10.0, 20.0, 20.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(30.0, 0.0, 40.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn center_containment_excludes_far_edges() {
        let cell = bbox(0.0, 0.0, 10.0, 10.0);
        assert!(cell.contains_center_of(&bbox(2.0, 2.0, 4.0, 4.0)));
        assert!(!cell.contains_center_of(&bbox(9.0, 2.0, 11.0, 4.0)));
        assert!(!cell.contains_center_of(&bbox(2.0, 9.0, 4.0, 11.0)));
    }

    #[test]
    fn union_covers_both() {
        let u = bbox(0.0, 5.0, 10.0, 10.0).union(&bbox(5.0, 0.0, 20.0, 8.0));
        assert_eq!(u, bbox(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn collector_flushes_pages() {
        let mut collector = GlyphCollector::default();
        let media_box = MediaBox {
            llx: 0.0,
            lly: 0.0,
            urx: 612.0,
            ury: 792.0,
        };
        collector.begin_page(1, &media_box, None).unwrap();
        collector.end_page().unwrap();
        collector.begin_page(2, &media_box, None).unwrap();

        let pages = collector.into_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert!((pages[1].height - 792.0).abs() < f64::EPSILON);
    }
}
