//! # Entity Records

use bytemuck::{Pod, Zeroable};

/// Public snapshot of one stored entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialEntity {
    /// Caller-assigned id.
    pub id: u32,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Collision radius.
    pub radius: f32,
    /// Faction tag.
    pub group: u32,
}

/// One entry of a batched position update.
///
/// `#[repr(C)]` so hosts can hand over a raw byte buffer through
/// `bytemuck::cast_slice`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PositionUpdate {
    /// Entity to move.
    pub id: u32,
    /// New centre X.
    pub x: f32,
    /// New centre Y.
    pub y: f32,
}

impl PositionUpdate {
    /// Creates an update.
    #[inline]
    #[must_use]
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Bucket key: integer cell coordinates.
pub(crate) type CellKey = (i32, i32);

/// Stored entity plus its position inside its bucket.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntityRecord {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub group: u32,
    pub cell: CellKey,
    pub bucket_pos: usize,
}

impl EntityRecord {
    #[inline]
    pub fn snapshot(&self) -> SpatialEntity {
        SpatialEntity {
            id: self.id,
            x: self.x,
            y: self.y,
            radius: self.radius,
            group: self.group,
        }
    }
}
