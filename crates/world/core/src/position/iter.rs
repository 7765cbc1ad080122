//! Lazy iterators over neighborhoods, rings and rectangles of a room.
use core::iter::FusedIterator;

use arrayvec::ArrayVec;

use crate::config::GridConfig;
use crate::direction::Direction;

use super::edges::Edges;
use super::local::LocalPosition;

/// In-room neighbors of a cell, driven by a precomputed direction table.
#[derive(Clone, Debug)]
pub struct Neighbors {
    origin: LocalPosition,
    directions: core::slice::Iter<'static, Direction>,
}

impl Neighbors {
    pub(crate) fn new(origin: LocalPosition, directions: &'static [Direction]) -> Self {
        Self {
            origin,
            directions: directions.iter(),
        }
    }
}

impl Iterator for Neighbors {
    type Item = LocalPosition;

    fn next(&mut self) -> Option<LocalPosition> {
        // Tables only hold directions that stay in the room, so this never skips.
        self.directions
            .by_ref()
            .find_map(|&direction| self.origin.in_direction(direction))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.directions.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Neighbors {}
impl FusedIterator for Neighbors {}

/// Ring of cells at an exact Chebyshev distance, clipped to the room.
///
/// The full ring is the perimeter of a `(2r + 1)` square walked clockwise from
/// its top-left corner: `2r` steps along each of the top, right, bottom and
/// left sides, `8r` cells in total. Clipping is resolved once at
/// construction into a single `begin..end` span of that walk; the span may
/// run past `8r` when the valid arc wraps through the starting corner.
#[derive(Clone, Debug)]
pub struct WithRange {
    x: i32,
    y: i32,
    range: i32,
    index: i32,
    end: i32,
    clipped: Edges,
}

impl WithRange {
    pub(crate) fn new(origin: LocalPosition, range: u32) -> Self {
        let x = i32::from(origin.x());
        let y = i32::from(origin.y());

        if range == 0 {
            // A zero perimeter has no walk; yield the origin itself.
            return Self {
                x,
                y,
                range: 0,
                index: 0,
                end: 1,
                clipped: Edges::empty(),
            };
        }
        if range >= u32::from(GridConfig::ROOM_SIZE) {
            return Self {
                x,
                y,
                range: 0,
                index: 0,
                end: 0,
                clipped: Edges::all(),
            };
        }

        let r = range as i32;
        let side = 2 * r;
        let max = i32::from(GridConfig::ROOM_MAX);

        // Valid part of each side of the walk, as offsets along that side.
        let mut spans: ArrayVec<(i32, i32), 4> = ArrayVec::new();
        let mut clipped = Edges::empty();
        let mut push_span = |start: i32, low: i32, high: i32| {
            let low = low.max(0);
            let high = high.min(side);
            if low < high {
                spans.push((start + low, start + high));
            }
        };

        // Top: (x - r + j, y - r)
        if y - r < 0 {
            clipped |= Edges::TOP;
        } else {
            push_span(0, r - x, max + 1 - x + r);
        }
        // Right: (x + r, y - r + j)
        if x + r > max {
            clipped |= Edges::RIGHT;
        } else {
            push_span(side, r - y, max + 1 - y + r);
        }
        // Bottom: (x + r - j, y + r)
        if y + r > max {
            clipped |= Edges::BOTTOM;
        } else {
            push_span(2 * side, x + r - max, x + r + 1);
        }
        // Left: (x - r, y + r - j)
        if x - r < 0 {
            clipped |= Edges::LEFT;
        } else {
            push_span(3 * side, y + r - max, y + r + 1);
        }

        let (index, end) = merge_spans(&spans, 8 * r);
        Self {
            x,
            y,
            range: r,
            index,
            end,
            clipped,
        }
    }

    /// Sides of the ring's square that fall outside the room.
    pub fn clipped(&self) -> Edges {
        self.clipped
    }

    fn cell_at(&self, index: i32) -> LocalPosition {
        let (dx, dy) = if self.range == 0 {
            (0, 0)
        } else {
            perimeter_offset(self.range, index)
        };
        let x = self.x + dx;
        let y = self.y + dy;
        debug_assert!((0..=49).contains(&x) && (0..=49).contains(&y));
        LocalPosition::raw(x as u8, y as u8)
    }
}

/// Joins per-side spans into the one contiguous arc they always form.
///
/// Adjacent spans are concatenated; an arc that runs through the end of the
/// walk and restarts at index 0 is rotated so its start comes first and its
/// end is expressed past `perimeter`.
fn merge_spans(spans: &[(i32, i32)], perimeter: i32) -> (i32, i32) {
    let mut arcs: ArrayVec<(i32, i32), 4> = ArrayVec::new();
    for &(begin, end) in spans {
        match arcs.last_mut() {
            Some(last) if last.1 == begin => last.1 = end,
            _ => arcs.push((begin, end)),
        }
    }

    if arcs.len() > 1 {
        let first = arcs[0];
        let last = arcs[arcs.len() - 1];
        if first.0 == 0 && last.1 == perimeter {
            arcs[0] = (last.0, first.1 + perimeter);
            arcs.pop();
        }
    }
    debug_assert!(arcs.len() <= 1, "ring clipped into {} arcs", arcs.len());
    arcs.first().copied().unwrap_or((0, 0))
}

/// Offset from the ring's center of step `index` of the perimeter walk.
fn perimeter_offset(range: i32, index: i32) -> (i32, i32) {
    let side = 2 * range;
    let step = index.rem_euclid(4 * side);
    let along = step % side;
    match step / side {
        0 => (along - range, -range),
        1 => (range, along - range),
        2 => (range - along, range),
        _ => (-range, range - along),
    }
}

impl Iterator for WithRange {
    type Item = LocalPosition;

    fn next(&mut self) -> Option<LocalPosition> {
        if self.index >= self.end {
            return None;
        }
        let cell = self.cell_at(self.index);
        self.index += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.index).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WithRange {}
impl FusedIterator for WithRange {}

/// Inclusive rectangle of cells, yielded row by row (x varies fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Area {
    left: u8,
    top: u8,
    width: u32,
    height: u32,
    index: u32,
    end: u32,
}

impl Area {
    /// Builds the rectangle `left..=right` × `top..=bottom`; inverted bounds
    /// give an empty area.
    pub(crate) fn from_bounds(left: u8, top: u8, right: u8, bottom: u8) -> Self {
        if right < left || bottom < top {
            return Self {
                left,
                top,
                width: 0,
                height: 0,
                index: 0,
                end: 0,
            };
        }
        let width = u32::from(right - left) + 1;
        let height = u32::from(bottom - top) + 1;
        Self {
            left,
            top,
            width,
            height,
            index: 0,
            end: width * height,
        }
    }

    fn cell_at(&self, index: u32) -> LocalPosition {
        LocalPosition::raw(
            self.left + (index % self.width) as u8,
            self.top + (index / self.width) as u8,
        )
    }

    /// Whether `position` lies inside the rectangle, regardless of how far
    /// the iteration has advanced.
    pub fn contains(&self, position: LocalPosition) -> bool {
        let x = u32::from(position.x());
        let y = u32::from(position.y());
        let left = u32::from(self.left);
        let top = u32::from(self.top);
        (left..left + self.width).contains(&x) && (top..top + self.height).contains(&y)
    }
}

impl Iterator for Area {
    type Item = LocalPosition;

    fn next(&mut self) -> Option<LocalPosition> {
        if self.index >= self.end {
            return None;
        }
        let cell = self.cell_at(self.index);
        self.index += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Area {
    fn next_back(&mut self) -> Option<LocalPosition> {
        if self.index >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.cell_at(self.end))
    }
}

impl ExactSizeIterator for Area {}
impl FusedIterator for Area {}
