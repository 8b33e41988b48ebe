//! # Movement Directions
//!
//! Eight compass directions indexed clockwise from south:
//!
//! ```text
//! 3  4  5
//! 2     6
//! 1  0  7
//! ```

/// One of the eight neighbour directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// `(0, +1)`
    South = 0,
    /// `(-1, +1)`
    SouthWest = 1,
    /// `(-1, 0)`
    West = 2,
    /// `(-1, -1)`
    NorthWest = 3,
    /// `(0, -1)`
    North = 4,
    /// `(+1, -1)`
    NorthEast = 5,
    /// `(+1, 0)`
    East = 6,
    /// `(+1, +1)`
    SouthEast = 7,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 8] = [
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
    ];

    /// Returns the direction for an index, wrapping modulo 8.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    /// Index in `0..8`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Tile offset for one step.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
        }
    }

    /// Returns true for the four diagonal directions.
    #[inline]
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) & 1 == 1
    }

    /// The two orthogonal moves that pass beside this diagonal.
    ///
    /// A hard obstacle on a diagonal neighbour seals these. Empty for
    /// orthogonal directions.
    #[inline]
    #[must_use]
    pub const fn flanking(self) -> DirectionSet {
        match self {
            Self::SouthWest => DirectionSet::EMPTY.with(Self::South).with(Self::West),
            Self::NorthWest => DirectionSet::EMPTY.with(Self::West).with(Self::North),
            Self::NorthEast => DirectionSet::EMPTY.with(Self::North).with(Self::East),
            Self::SouthEast => DirectionSet::EMPTY.with(Self::South).with(Self::East),
            _ => DirectionSet::EMPTY,
        }
    }

    /// Buckets a tile-space delta into the nearest 45° sector.
    ///
    /// A zero delta maps to [`Direction::South`].
    #[must_use]
    pub fn toward(dx: f64, dy: f64) -> Self {
        if dx == 0.0 && dy == 0.0 {
            return Self::South;
        }
        let deg = dy.atan2(dx).to_degrees();
        if (-22.5..22.5).contains(&deg) {
            Self::East
        } else if (22.5..67.5).contains(&deg) {
            Self::SouthEast
        } else if (67.5..112.5).contains(&deg) {
            Self::South
        } else if (112.5..157.5).contains(&deg) {
            Self::SouthWest
        } else if deg >= 157.5 || deg < -157.5 {
            Self::West
        } else if (-157.5..-112.5).contains(&deg) {
            Self::NorthWest
        } else if (-112.5..-67.5).contains(&deg) {
            Self::North
        } else {
            Self::NorthEast
        }
    }
}

/// A set of allowed directions packed into one byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// No directions.
    pub const EMPTY: Self = Self(0);
    /// All eight directions.
    pub const ALL: Self = Self(0xFF);

    /// Builds the set of directions available to an actor that can face
    /// `count` directions.
    ///
    /// - `1` → south only
    /// - `2` → south and north
    /// - `4` → the four orthogonals
    /// - `8` or more → all
    /// - anything else → directions with index below `count`
    #[must_use]
    pub const fn from_move_count(count: i32) -> Self {
        match count {
            1 => Self::EMPTY.with(Direction::South),
            2 => Self::EMPTY.with(Direction::South).with(Direction::North),
            4 => Self::EMPTY
                .with(Direction::South)
                .with(Direction::West)
                .with(Direction::North)
                .with(Direction::East),
            n if n >= 8 => Self::ALL,
            n if n <= 0 => Self::EMPTY,
            n => Self((1u8 << n) - 1),
        }
    }

    /// Raw bitmask, bit `i` set for direction index `i`.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns a copy with `dir` added.
    #[inline]
    #[must_use]
    pub const fn with(self, dir: Direction) -> Self {
        Self(self.0 | (1 << dir as u8))
    }

    /// Returns true if `dir` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & (1 << dir as u8) != 0
    }

    /// Set union.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Directions in both sets.
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Directions in `self` but not in `other`.
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Iterates contained directions in index order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}
