//! Grouping glyphs into words and lines.
//!
//! Glyphs are clustered into lines by their top coordinate, sorted left to
//! right within each line, and joined into words until a blank glyph or a
//! horizontal gap wider than `x_tolerance` separates them.

use crate::glyphs::{BBox, Glyph};

/// Tolerances used when grouping glyphs into words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between two glyphs of the same word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between glyphs on the same line.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A run of adjacent glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

impl Word {
    fn start(glyph: &Glyph) -> Self {
        Self {
            text: glyph.text.clone(),
            bbox: glyph.bbox,
        }
    }

    fn push(&mut self, glyph: &Glyph) {
        self.text.push_str(&glyph.text);
        self.bbox = self.bbox.union(&glyph.bbox);
    }
}

/// Groups values into clusters of neighbours no further than `tolerance`
/// apart, returning indices into `values`.
///
/// Clusters are returned in ascending value order; indices within a cluster
/// are in ascending value order too.
#[must_use]
pub fn cluster_values(values: &[f64], tolerance: f64) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut last = f64::NEG_INFINITY;

    for idx in order {
        let value = values[idx];
        match clusters.last_mut() {
            Some(cluster) if value <= last + tolerance => cluster.push(idx),
            _ => clusters.push(vec![idx]),
        }
        last = value;
    }

    clusters
}

/// Groups `glyphs` into words.
#[must_use]
pub fn extract_words(glyphs: &[Glyph], options: &WordOptions) -> Vec<Word> {
    let tops: Vec<f64> = glyphs.iter().map(|g| g.bbox.top).collect();
    let mut words = Vec::new();

    for mut line in cluster_values(&tops, options.y_tolerance) {
        line.sort_by(|&a, &b| glyphs[a].bbox.x0.total_cmp(&glyphs[b].bbox.x0));

        let mut current: Option<Word> = None;

        for idx in line {
            let glyph = &glyphs[idx];

            if glyph.is_blank() {
                words.extend(current.take());
                continue;
            }

            current = match current.take() {
                Some(mut word)
                    if glyph.bbox.x0 <= word.bbox.x1 + options.x_tolerance
                        && glyph.bbox.x0 >= word.bbox.x0 =>
                {
                    word.push(glyph);
                    Some(word)
                }
                Some(word) => {
                    words.push(word);
                    Some(Word::start(glyph))
                }
                None => Some(Word::start(glyph)),
            };
        }

        words.extend(current);
    }

    words
}

/// Renders words as text: words on the same line joined by a space, lines
/// joined by a newline, top to bottom.
#[must_use]
pub fn words_to_text(words: &[Word], y_tolerance: f64) -> String {
    let tops: Vec<f64> = words.iter().map(|w| w.bbox.top).collect();

    cluster_values(&tops, y_tolerance)
        .into_iter()
        .map(|mut line| {
            line.sort_by(|&a, &b| words[a].bbox.x0.total_cmp(&words[b].bbox.x0));
            line.iter()
                .map(|&i| words[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
