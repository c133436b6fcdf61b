use super::position::Position;

/// Dimensions of the growth neighborhood: 3 wide, 4 tall, 3 deep.
pub const NEIGHBORHOOD_SIZE: Position = Position::new(3, 4, 3);

/// Local offset of the block that triggered a neighborhood query.
pub const NEIGHBORHOOD_CENTER: Position = Position::new(1, 1, 1);

/// Inclusive axis-aligned box between two corners.
///
/// Cells are addressed by local offsets from `from`, flattened x-major, then
/// y, then z: `offset = (lx * size_y + ly) * size_z + lz`. Every producer of
/// a [`NeighborhoodSample`](super::sample::NeighborhoodSample) must lay its
/// blocks out in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxShape {
    from: Position,
    to: Position,
}

impl BoxShape {
    /// Box spanning both corners (in any order), inclusive.
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            from: Position::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            to: Position::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// The growth neighborhood of `center`: one layer below, the center
    /// layer and two above, padded by one cell in each horizontal direction.
    pub fn around(center: Position) -> Self {
        let from = center - NEIGHBORHOOD_CENTER;
        let to = from + NEIGHBORHOOD_SIZE - Position::new(1, 1, 1);
        Self { from, to }
    }

    pub const fn from(&self) -> Position {
        self.from
    }

    pub const fn to(&self) -> Position {
        self.to
    }

    /// Cells per axis.
    pub const fn size(&self) -> Position {
        Position::new(
            self.to.x - self.from.x + 1,
            self.to.y - self.from.y + 1,
            self.to.z - self.from.z + 1,
        )
    }

    pub const fn volume(&self) -> usize {
        let size = self.size();
        (size.x * size.y * size.z) as usize
    }

    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.from.x
            && pos.x <= self.to.x
            && pos.y >= self.from.y
            && pos.y <= self.to.y
            && pos.z >= self.from.z
            && pos.z <= self.to.z
    }

    /// Linear offset of a local coordinate, or `None` outside the box.
    pub const fn index(&self, local: Position) -> Option<usize> {
        let size = self.size();
        if local.x < 0
            || local.y < 0
            || local.z < 0
            || local.x >= size.x
            || local.y >= size.y
            || local.z >= size.z
        {
            return None;
        }
        Some(((local.x * size.y + local.y) * size.z + local.z) as usize)
    }

    /// All absolute positions in flattening order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let from = self.from;
        let size = self.size();
        (0..size.x).flat_map(move |lx| {
            (0..size.y).flat_map(move |ly| (0..size.z).map(move |lz| from.offset(lx, ly, lz)))
        })
    }
}
