//! Table detection from text alignment.
//!
//! Pages without ruling lines still lay their tables out on a grid: words in
//! the same column share a left edge, right edge, or centre, and words in the
//! same row share a top. This module turns those alignments into synthetic
//! edges, snaps and joins the edges, intersects them, and reads the smallest
//! rectangles bounded by connected intersections as table cells.
//!
//! Cells sharing a corner belong to the same table. Each table is returned as
//! rows of optional cell text, `None` marking a grid position no cell covers.

use std::collections::{BTreeMap, BTreeSet};

use crate::TableSettings;
use crate::glyphs::{BBox, Glyph};
use crate::words::{Word, WordOptions, cluster_values, extract_words, words_to_text};

/// Edge orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A horizontal (`top == bottom`) or vertical (`x0 == x1`) segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub orientation: Orientation,
}

impl Edge {
    const fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        Self {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Orientation::Vertical,
        }
    }

    const fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Orientation::Horizontal,
        }
    }

    /// Coordinate the edge sits on: `x0` for vertical, `top` for horizontal.
    const fn position(&self) -> f64 {
        match self.orientation {
            Orientation::Vertical => self.x0,
            Orientation::Horizontal => self.top,
        }
    }

    /// `(start, end)` along the edge's own axis.
    const fn span(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (self.top, self.bottom),
            Orientation::Horizontal => (self.x0, self.x1),
        }
    }

    fn length(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }

    fn with_position(self, position: f64) -> Self {
        match self.orientation {
            Orientation::Vertical => Self::vertical(position, self.top, self.bottom),
            Orientation::Horizontal => Self::horizontal(position, self.x0, self.x1),
        }
    }

    fn with_span(self, start: f64, end: f64) -> Self {
        match self.orientation {
            Orientation::Vertical => Self::vertical(self.x0, start, end),
            Orientation::Horizontal => Self::horizontal(self.top, start, end),
        }
    }
}

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Bounding box of all cells.
    pub bbox: BBox,
    /// Rows top to bottom; each row has one entry per distinct cell column.
    pub rows: Vec<Vec<Option<String>>>,
}

fn bbox_of<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> Option<BBox> {
    boxes.into_iter().fold(None, |acc: Option<BBox>, b| {
        Some(acc.map_or(*b, |a| a.union(b)))
    })
}

/// Vertical edges implied by word alignment.
///
/// Words are clustered by left edge, right edge, and centre. Clusters with
/// at least `min_words` words are considered largest first; a cluster whose
/// extent overlaps one already kept is dropped. One edge is placed at the
/// left of each kept cluster plus a closing edge at the right-most extent,
/// all spanning the kept clusters' full height.
#[must_use]
pub fn words_to_vertical_edges(words: &[Word], min_words: usize) -> Vec<Edge> {
    let by_x0: Vec<f64> = words.iter().map(|w| w.bbox.x0).collect();
    let by_x1: Vec<f64> = words.iter().map(|w| w.bbox.x1).collect();
    let by_center: Vec<f64> = words.iter().map(|w| w.bbox.h_center()).collect();

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for values in [&by_x0, &by_x1, &by_center] {
        clusters.extend(cluster_values(values, 1.0));
    }
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));

    let mut condensed: Vec<BBox> = Vec::new();
    for cluster in clusters.iter().filter(|c| c.len() >= min_words) {
        let Some(bbox) = bbox_of(cluster.iter().map(|&i| &words[i].bbox)) else {
            continue;
        };
        if !condensed.iter().any(|kept| kept.overlaps(&bbox)) {
            condensed.push(bbox);
        }
    }

    let Some(extent) = bbox_of(&condensed) else {
        return Vec::new();
    };

    condensed.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    condensed
        .iter()
        .map(|b| Edge::vertical(b.x0, extent.top, extent.bottom))
        .chain(std::iter::once(Edge::vertical(
            extent.x1,
            extent.top,
            extent.bottom,
        )))
        .collect()
}

/// Horizontal edges implied by word alignment.
///
/// Words are clustered by top. Every cluster with at least `min_words` words
/// contributes an edge along its top and one along its bottom, each spanning
/// the full horizontal extent of all such clusters.
#[must_use]
pub fn words_to_horizontal_edges(words: &[Word], min_words: usize) -> Vec<Edge> {
    let tops: Vec<f64> = words.iter().map(|w| w.bbox.top).collect();

    let rows: Vec<BBox> = cluster_values(&tops, 1.0)
        .into_iter()
        .filter(|c| c.len() >= min_words)
        .filter_map(|c| bbox_of(c.iter().map(|&i| &words[i].bbox)))
        .collect();

    let Some(extent) = bbox_of(&rows) else {
        return Vec::new();
    };

    rows.iter()
        .flat_map(|r| {
            [
                Edge::horizontal(r.top, extent.x0, extent.x1),
                Edge::horizontal(r.bottom, extent.x0, extent.x1),
            ]
        })
        .collect()
}

/// Moves edges of one orientation whose positions lie within `tolerance`
/// of each other onto their mean position.
fn snap_edges(edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    let positions: Vec<f64> = edges.iter().map(Edge::position).collect();
    let mut snapped = Vec::with_capacity(edges.len());

    for cluster in cluster_values(&positions, tolerance) {
        #[allow(clippy::cast_precision_loss)]
        let mean = cluster.iter().map(|&i| positions[i]).sum::<f64>() / cluster.len() as f64;
        snapped.extend(cluster.iter().map(|&i| edges[i].with_position(mean)));
    }

    snapped
}

/// Merges collinear edges whose spans overlap or are separated by at most
/// `tolerance`.
fn join_edges(edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    let mut by_position: BTreeMap<u64, Vec<Edge>> = BTreeMap::new();
    for edge in edges {
        by_position
            .entry(ordered_bits(edge.position()))
            .or_default()
            .push(edge);
    }

    let mut joined = Vec::new();
    for mut group in by_position.into_values() {
        group.sort_by(|a, b| a.span().0.total_cmp(&b.span().0));

        let mut iter = group.into_iter();
        let Some(mut current) = iter.next() else {
            continue;
        };
        for edge in iter {
            let (start, end) = edge.span();
            let (cur_start, cur_end) = current.span();
            if start <= cur_end + tolerance {
                current = current.with_span(cur_start, cur_end.max(end));
            } else {
                joined.push(current);
                current = edge;
            }
        }
        joined.push(current);
    }

    joined
}

/// Maps an `f64` to bits whose unsigned order matches numeric order.
const fn ordered_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits >> 63 == 0 {
        bits | (1 << 63)
    } else {
        !bits
    }
}

/// Snaps, joins, and length-filters both edge sets.
fn merge_edges(
    vertical: Vec<Edge>,
    horizontal: Vec<Edge>,
    settings: &TableSettings,
) -> (Vec<Edge>, Vec<Edge>) {
    let process = |edges: Vec<Edge>, snap: f64, join: f64| -> Vec<Edge> {
        join_edges(snap_edges(edges, snap), join)
            .into_iter()
            .filter(|e| e.length() >= settings.edge_min_length)
            .collect()
    };

    (
        process(vertical, settings.snap_x_tolerance, settings.join_x_tolerance),
        process(
            horizontal,
            settings.snap_y_tolerance,
            settings.join_y_tolerance,
        ),
    )
}

/// A point where at least one vertical and one horizontal edge cross.
#[derive(Debug, Default)]
struct Crossing {
    vertical: BTreeSet<usize>,
    horizontal: BTreeSet<usize>,
}

/// Intersection points keyed by ordered `(x, y)` bits; iteration order is
/// ascending x, then ascending y.
type Crossings = BTreeMap<(u64, u64), Crossing>;

fn find_crossings(vertical: &[Edge], horizontal: &[Edge], settings: &TableSettings) -> Crossings {
    let mut crossings = Crossings::new();
    let (x_tol, y_tol) = (
        settings.intersection_x_tolerance,
        settings.intersection_y_tolerance,
    );

    for (vi, v) in vertical.iter().enumerate() {
        for (hi, h) in horizontal.iter().enumerate() {
            if v.top <= h.top + y_tol
                && v.bottom >= h.top - y_tol
                && v.x0 >= h.x0 - x_tol
                && v.x0 <= h.x1 + x_tol
            {
                let crossing = crossings
                    .entry((ordered_bits(v.x0), ordered_bits(h.top)))
                    .or_default();
                crossing.vertical.insert(vi);
                crossing.horizontal.insert(hi);
            }
        }
    }

    crossings
}

fn edge_connects(crossings: &Crossings, a: (u64, u64), b: (u64, u64)) -> bool {
    let (Some(ca), Some(cb)) = (crossings.get(&a), crossings.get(&b)) else {
        return false;
    };
    (a.0 == b.0 && !ca.vertical.is_disjoint(&cb.vertical))
        || (a.1 == b.1 && !ca.horizontal.is_disjoint(&cb.horizontal))
}

/// For each crossing, the smallest cell that has it as its top-left corner.
fn crossings_to_cells(crossings: &Crossings) -> Vec<BBox> {
    let points: Vec<(u64, u64)> = crossings.keys().copied().collect();
    let mut cells = Vec::new();

    for (i, &pt) in points.iter().enumerate() {
        let rest = &points[i + 1..];
        let below = rest.iter().filter(|p| p.0 == pt.0);
        let right: Vec<&(u64, u64)> = rest.iter().filter(|p| p.1 == pt.1).collect();

        'search: for &below_pt in below {
            if !edge_connects(crossings, pt, below_pt) {
                continue;
            }
            for &&right_pt in &right {
                if !edge_connects(crossings, pt, right_pt) {
                    continue;
                }
                let corner = (right_pt.0, below_pt.1);
                if crossings.contains_key(&corner)
                    && edge_connects(crossings, corner, right_pt)
                    && edge_connects(crossings, corner, below_pt)
                {
                    cells.push(BBox {
                        x0: from_ordered_bits(pt.0),
                        top: from_ordered_bits(pt.1),
                        x1: from_ordered_bits(corner.0),
                        bottom: from_ordered_bits(corner.1),
                    });
                    break 'search;
                }
            }
        }
    }

    cells
}

const fn from_ordered_bits(bits: u64) -> f64 {
    if bits >> 63 == 1 {
        f64::from_bits(bits & !(1 << 63))
    } else {
        f64::from_bits(!bits)
    }
}

fn corners(cell: &BBox) -> [(u64, u64); 4] {
    let (x0, x1) = (ordered_bits(cell.x0), ordered_bits(cell.x1));
    let (top, bottom) = (ordered_bits(cell.top), ordered_bits(cell.bottom));
    [(x0, top), (x0, bottom), (x1, top), (x1, bottom)]
}

/// Groups cells that share corners into tables, dropping single-cell
/// groups, ordered by their top-most then left-most cell.
fn cells_to_groups(cells: Vec<BBox>) -> Vec<Vec<BBox>> {
    let mut remaining = cells;
    let mut groups: Vec<Vec<BBox>> = Vec::new();

    while !remaining.is_empty() {
        let mut group_corners: BTreeSet<(u64, u64)> = BTreeSet::new();
        let mut group: Vec<BBox> = Vec::new();

        loop {
            let before = group.len();
            let mut i = 0;
            while i < remaining.len() {
                let cell_corners = corners(&remaining[i]);
                if group.is_empty() || cell_corners.iter().any(|c| group_corners.contains(c)) {
                    group_corners.extend(cell_corners);
                    group.push(remaining.remove(i));
                } else {
                    i += 1;
                }
            }
            if group.len() == before {
                break;
            }
        }

        groups.push(group);
    }

    let key = |group: &Vec<BBox>| {
        group
            .iter()
            .map(|c| (c.top, c.x0))
            .fold((f64::INFINITY, f64::INFINITY), |min, k| {
                if k.0 < min.0 || (k.0.total_cmp(&min.0).is_eq() && k.1 < min.1) {
                    k
                } else {
                    min
                }
            })
    };
    groups.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        ka.0.total_cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
    });
    groups.retain(|g| g.len() > 1);
    groups
}

/// Text of the glyphs whose centres fall inside `cell`.
fn cell_text(cell: &BBox, glyphs: &[Glyph], options: &WordOptions) -> String {
    let inside: Vec<Glyph> = glyphs
        .iter()
        .filter(|g| cell.contains_center_of(&g.bbox))
        .cloned()
        .collect();
    words_to_text(&extract_words(&inside, options), options.y_tolerance)
}

/// Lays a group of cells out as rows and reads each cell's text.
fn group_to_table(cells: &[BBox], glyphs: &[Glyph], options: &WordOptions) -> Option<Table> {
    let bbox = bbox_of(cells)?;

    let columns: BTreeSet<u64> = cells.iter().map(|c| ordered_bits(c.x0)).collect();
    let mut rows: BTreeMap<u64, BTreeMap<u64, &BBox>> = BTreeMap::new();
    for cell in cells {
        rows.entry(ordered_bits(cell.top))
            .or_default()
            .insert(ordered_bits(cell.x0), cell);
    }

    let rows = rows
        .into_values()
        .map(|row| {
            columns
                .iter()
                .map(|x| row.get(x).map(|cell| cell_text(cell, glyphs, options)))
                .collect()
        })
        .collect();

    Some(Table { bbox, rows })
}

/// Finds every table on a page.
#[must_use]
pub fn find_tables(glyphs: &[Glyph], settings: &TableSettings) -> Vec<Table> {
    let words = extract_words(glyphs, &settings.word_options);

    let vertical = words_to_vertical_edges(&words, settings.min_words_vertical);
    let horizontal = words_to_horizontal_edges(&words, settings.min_words_horizontal);
    let (vertical, horizontal) = merge_edges(vertical, horizontal, settings);

    log::trace!(
        "{} word(s), {} vertical and {} horizontal edge(s)",
        words.len(),
        vertical.len(),
        horizontal.len()
    );

    let crossings = find_crossings(&vertical, &horizontal, settings);
    let cells = crossings_to_cells(&crossings);

    cells_to_groups(cells)
        .iter()
        .filter_map(|group| group_to_table(group, glyphs, &settings.word_options))
        .collect()
}
