use std::fmt;
use std::ops::{Add, Sub};

/// Absolute block position in the world. Also used as a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(&self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn above(&self) -> Self {
        self.offset(0, 1, 0)
    }

    pub const fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
