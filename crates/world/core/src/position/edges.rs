use bitflags::bitflags;

use crate::config::GridConfig;
use crate::direction::Direction;

bitflags! {
    /// Room borders touched (for a cell) or crossed (for a ring) on each side.
    ///
    /// A cell can touch at most two borders, one per axis; a ring larger than
    /// the room can cross all four.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Edges: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const TOP    = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

// Neighbor direction tables, one per border class.
const INTERIOR: [Direction; 8] = [
    Direction::TopLeft,
    Direction::Top,
    Direction::TopRight,
    Direction::Right,
    Direction::BottomRight,
    Direction::Bottom,
    Direction::BottomLeft,
    Direction::Left,
];
const TOP_LEFT: [Direction; 3] = [Direction::Right, Direction::BottomRight, Direction::Bottom];
const BOTTOM_LEFT: [Direction; 3] = [Direction::Top, Direction::TopRight, Direction::Right];
const TOP_RIGHT: [Direction; 3] = [Direction::Bottom, Direction::BottomLeft, Direction::Left];
const BOTTOM_RIGHT: [Direction; 3] = [Direction::TopLeft, Direction::Top, Direction::Left];
const LEFT: [Direction; 5] = [
    Direction::Top,
    Direction::TopRight,
    Direction::Right,
    Direction::BottomRight,
    Direction::Bottom,
];
const RIGHT: [Direction; 5] = [
    Direction::TopLeft,
    Direction::Top,
    Direction::Bottom,
    Direction::BottomLeft,
    Direction::Left,
];
const TOP: [Direction; 5] = [
    Direction::Right,
    Direction::BottomRight,
    Direction::Bottom,
    Direction::BottomLeft,
    Direction::Left,
];
const BOTTOM: [Direction; 5] = [
    Direction::TopLeft,
    Direction::Top,
    Direction::TopRight,
    Direction::Right,
    Direction::Left,
];

impl Edges {
    /// Classifies a cell's axes against `0` and `49`.
    pub const fn of_cell(x: u8, y: u8) -> Self {
        let mut edges = Self::empty();
        if x == 0 {
            edges = edges.union(Self::LEFT);
        } else if x == GridConfig::ROOM_MAX {
            edges = edges.union(Self::RIGHT);
        }
        if y == 0 {
            edges = edges.union(Self::TOP);
        } else if y == GridConfig::ROOM_MAX {
            edges = edges.union(Self::BOTTOM);
        }
        edges
    }

    /// Directions that stay inside the room from a cell touching these borders.
    ///
    /// Only the nine classes produced by [`Edges::of_cell`] are meaningful;
    /// other combinations cannot be touched by a single cell and yield no
    /// directions.
    pub fn neighbor_directions(self) -> &'static [Direction] {
        const TOP_LEFT_CORNER: u8 = Edges::TOP.bits() | Edges::LEFT.bits();
        const TOP_RIGHT_CORNER: u8 = Edges::TOP.bits() | Edges::RIGHT.bits();
        const BOTTOM_LEFT_CORNER: u8 = Edges::BOTTOM.bits() | Edges::LEFT.bits();
        const BOTTOM_RIGHT_CORNER: u8 = Edges::BOTTOM.bits() | Edges::RIGHT.bits();

        match self.bits() {
            0 => &INTERIOR,
            TOP_LEFT_CORNER => &TOP_LEFT,
            TOP_RIGHT_CORNER => &TOP_RIGHT,
            BOTTOM_LEFT_CORNER => &BOTTOM_LEFT,
            BOTTOM_RIGHT_CORNER => &BOTTOM_RIGHT,
            bits if bits == Edges::LEFT.bits() => &LEFT,
            bits if bits == Edges::RIGHT.bits() => &RIGHT,
            bits if bits == Edges::TOP.bits() => &TOP,
            bits if bits == Edges::BOTTOM.bits() => &BOTTOM,
            _ => &[],
        }
    }

    /// Number of borders in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_corners_and_sides() {
        assert_eq!(Edges::of_cell(0, 0), Edges::LEFT | Edges::TOP);
        assert_eq!(Edges::of_cell(49, 49), Edges::RIGHT | Edges::BOTTOM);
        assert_eq!(Edges::of_cell(0, 25), Edges::LEFT);
        assert_eq!(Edges::of_cell(25, 49), Edges::BOTTOM);
        assert_eq!(Edges::of_cell(25, 25), Edges::empty());
    }

    #[test]
    fn direction_tables_match_border_class() {
        for x in [0u8, 1, 25, 48, 49] {
            for y in [0u8, 1, 25, 48, 49] {
                let edges = Edges::of_cell(x, y);
                let expected = match edges.count() {
                    0 => 8,
                    1 => 5,
                    _ => 3,
                };
                let directions = edges.neighbor_directions();
                assert_eq!(directions.len(), expected, "cell ({x}, {y})");

                for direction in directions {
                    let (dx, dy) = direction.offset();
                    let nx = i32::from(x) + dx;
                    let ny = i32::from(y) + dy;
                    assert!((0..50).contains(&nx) && (0..50).contains(&ny));
                }
            }
        }
    }

    #[test]
    fn impossible_combinations_have_no_neighbors() {
        assert!((Edges::LEFT | Edges::RIGHT).neighbor_directions().is_empty());
        assert!(Edges::all().neighbor_directions().is_empty());
    }
}
