//! # Spatial Hash
//!
//! Dense entity storage plus a bucket per occupied cell.
//!
//! ## Layout
//!
//! - `entities`: dense `Vec` of records, swap-removed on delete
//! - `slots`: id → index into `entities`
//! - `buckets`: cell → indices into `entities`
//!
//! Every record remembers where it sits in its bucket, so insert, remove and
//! relocate are O(1) regardless of how crowded a cell is. A bucket is dropped
//! as soon as its last entity leaves, so `buckets` only holds occupied cells.

use std::collections::HashMap;

use kiln_core::geometry::circle_overlap;

use crate::config::SpatialConfig;
use crate::entity::{CellKey, EntityRecord, PositionUpdate, SpatialEntity};

/// Uniform-grid spatial hash over circles.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    entities: Vec<EntityRecord>,
    slots: HashMap<u32, usize>,
    buckets: HashMap<CellKey, Vec<usize>>,
    /// Largest radius stored since the last `clear`/`compact`.
    max_radius: f32,
}

impl SpatialHash {
    /// Creates an empty hash. `cell_size` is clamped to at least 1.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self::with_config(SpatialConfig {
            cell_size,
            ..SpatialConfig::default()
        })
    }

    /// Creates an empty hash from a config.
    #[must_use]
    pub fn with_config(config: SpatialConfig) -> Self {
        let cell_size = if config.cell_size.is_finite() {
            config.cell_size.max(1.0)
        } else {
            SpatialConfig::default().cell_size
        };
        Self {
            cell_size,
            entities: Vec::with_capacity(config.initial_capacity),
            slots: HashMap::with_capacity(config.initial_capacity),
            buckets: HashMap::new(),
            max_radius: 0.0,
        }
    }

    /// Bucket edge length.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of stored entities.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true if `id` is stored.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.slots.contains_key(&id)
    }

    /// Returns a snapshot of the entity with `id`.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<SpatialEntity> {
        self.slots.get(&id).map(|&slot| self.entities[slot].snapshot())
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Cell containing a world position.
    #[inline]
    fn cell_of(&self, x: f32, y: f32) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Inserts an entity or overwrites the existing record with the same id.
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-assigned id
    /// * `x`, `y` - Centre
    /// * `radius` - Collision radius
    /// * `group` - Faction tag
    pub fn upsert(&mut self, id: u32, x: f32, y: f32, radius: f32, group: u32) {
        self.max_radius = self.max_radius.max(radius);
        if let Some(&slot) = self.slots.get(&id) {
            let record = &mut self.entities[slot];
            record.radius = radius;
            record.group = group;
            self.relocate(slot, x, y);
            return;
        }

        let slot = self.entities.len();
        let cell = self.cell_of(x, y);
        self.entities.push(EntityRecord {
            id,
            x,
            y,
            radius,
            group,
            cell,
            bucket_pos: 0,
        });
        self.slots.insert(id, slot);
        self.attach(slot);
    }

    /// Removes an entity. Returns false if the id was unknown.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        self.detach(slot);

        let last = self.entities.len() - 1;
        self.entities.swap_remove(slot);
        if slot != last {
            let moved = self.entities[slot];
            self.slots.insert(moved.id, slot);
            if let Some(bucket) = self.buckets.get_mut(&moved.cell) {
                bucket[moved.bucket_pos] = slot;
            }
        }
        true
    }

    /// Moves many entities at once. Unknown ids are skipped.
    pub fn batch_update_positions(&mut self, updates: &[PositionUpdate]) {
        for update in updates {
            if let Some(&slot) = self.slots.get(&update.id) {
                self.relocate(slot, update.x, update.y);
            }
        }
    }

    /// Moves many entities from an interleaved `[id, x, y, ...]` array.
    ///
    /// Ids travel as `f32` and are exact up to 2^24. A trailing partial
    /// triple is ignored, as are unknown ids.
    pub fn batch_update_positions_flat(&mut self, flat: &[f32]) {
        for chunk in flat.chunks_exact(3) {
            let id = chunk[0] as u32;
            if let Some(&slot) = self.slots.get(&id) {
                self.relocate(slot, chunk[1], chunk[2]);
            }
        }
    }

    /// Removes every entity and bucket.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.slots.clear();
        self.buckets.clear();
        self.max_radius = 0.0;
    }

    /// Releases spare bucket storage and recomputes the scan margin from the
    /// entities still stored.
    pub fn compact(&mut self) {
        let before = self.buckets.capacity();
        self.buckets.shrink_to_fit();
        for bucket in self.buckets.values_mut() {
            bucket.shrink_to_fit();
        }
        self.max_radius = self
            .entities
            .iter()
            .fold(0.0f32, |acc, e| acc.max(e.radius));
        tracing::debug!(
            capacity_before = before,
            capacity_after = self.buckets.capacity(),
            max_radius = self.max_radius,
            "compacted spatial hash"
        );
    }

    fn relocate(&mut self, slot: usize, x: f32, y: f32) {
        let cell = self.cell_of(x, y);
        let record = &mut self.entities[slot];
        record.x = x;
        record.y = y;
        if record.cell != cell {
            self.detach(slot);
            self.entities[slot].cell = cell;
            self.attach(slot);
        }
    }

    fn attach(&mut self, slot: usize) {
        let record = &mut self.entities[slot];
        let bucket = self.buckets.entry(record.cell).or_default();
        record.bucket_pos = bucket.len();
        bucket.push(slot);
    }

    fn detach(&mut self, slot: usize) {
        let EntityRecord {
            cell, bucket_pos, ..
        } = self.entities[slot];
        let Some(bucket) = self.buckets.get_mut(&cell) else {
            return;
        };
        bucket.swap_remove(bucket_pos);
        if let Some(&moved) = bucket.get(bucket_pos) {
            self.entities[moved].bucket_pos = bucket_pos;
        } else if bucket.is_empty() {
            self.buckets.remove(&cell);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Ids whose centre lies in the cell containing `(x, y)`, ascending.
    #[must_use]
    pub fn query_at(&self, x: f32, y: f32) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_at_into(x, y, &mut out);
        out
    }

    /// [`Self::query_at`] into caller storage. `out` is cleared first.
    pub fn query_at_into(&self, x: f32, y: f32, out: &mut Vec<u32>) {
        self.collect_cell(x, y, out, |_| true);
    }

    /// Ids in the cell at `(x, y)` whose group equals `group`, ascending.
    #[must_use]
    pub fn query_at_by_group(&self, x: f32, y: f32, group: u32) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_at_by_group_into(x, y, group, &mut out);
        out
    }

    /// [`Self::query_at_by_group`] into caller storage.
    pub fn query_at_by_group_into(&self, x: f32, y: f32, group: u32, out: &mut Vec<u32>) {
        self.collect_cell(x, y, out, |e| e.group == group);
    }

    /// Ids in the cell at `(x, y)` whose group differs from `group`, ascending.
    #[must_use]
    pub fn query_at_excluding_group(&self, x: f32, y: f32, group: u32) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_at_excluding_group_into(x, y, group, &mut out);
        out
    }

    /// [`Self::query_at_excluding_group`] into caller storage.
    pub fn query_at_excluding_group_into(&self, x: f32, y: f32, group: u32, out: &mut Vec<u32>) {
        self.collect_cell(x, y, out, |e| e.group != group);
    }

    /// Ids whose circle touches the query circle, ascending.
    #[must_use]
    pub fn query_radius(&self, x: f32, y: f32, radius: f32) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_radius_into(x, y, radius, &mut out);
        out
    }

    /// [`Self::query_radius`] into caller storage.
    pub fn query_radius_into(&self, x: f32, y: f32, radius: f32, out: &mut Vec<u32>) {
        out.clear();
        self.for_each_near(x, y, radius + self.max_radius, |e| {
            if circle_overlap(x, y, radius, e.x, e.y, e.radius) {
                out.push(e.id);
            }
        });
        out.sort_unstable();
    }

    /// Every overlapping pair as `(lower id, higher id)`, each pair once, sorted.
    #[must_use]
    pub fn detect_all_collisions(&self) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        for a in &self.entities {
            self.for_each_near(a.x, a.y, a.radius + self.max_radius, |b| {
                if b.id > a.id && circle_overlap(a.x, a.y, a.radius, b.x, b.y, b.radius) {
                    pairs.push((a.id, b.id));
                }
            });
        }
        pairs.sort_unstable();
        pairs
    }

    /// Ids overlapping the entity `id`, ascending. Empty for unknown ids.
    #[must_use]
    pub fn detect_collisions_for(&self, id: u32) -> Vec<u32> {
        let Some(&slot) = self.slots.get(&id) else {
            return Vec::new();
        };
        let a = self.entities[slot];
        let mut out = Vec::new();
        self.for_each_near(a.x, a.y, a.radius + self.max_radius, |b| {
            if b.id != a.id && circle_overlap(a.x, a.y, a.radius, b.x, b.y, b.radius) {
                out.push(b.id);
            }
        });
        out.sort_unstable();
        out
    }

    fn collect_cell(
        &self,
        x: f32,
        y: f32,
        out: &mut Vec<u32>,
        keep: impl Fn(&EntityRecord) -> bool,
    ) {
        out.clear();
        if let Some(bucket) = self.buckets.get(&self.cell_of(x, y)) {
            out.extend(
                bucket
                    .iter()
                    .map(|&slot| &self.entities[slot])
                    .filter(|e| keep(*e))
                    .map(|e| e.id),
            );
        }
        out.sort_unstable();
    }

    /// Visits every entity whose centre lies in a cell touched by the square
    /// `[x - reach, x + reach] × [y - reach, y + reach]`.
    ///
    /// Falls back to a linear scan when the square covers more cells than
    /// there are buckets.
    fn for_each_near(&self, x: f32, y: f32, reach: f32, mut visit: impl FnMut(&EntityRecord)) {
        if reach < 0.0 || reach.is_nan() {
            return;
        }
        let (min_x, min_y) = self.cell_of(x - reach, y - reach);
        let (max_x, max_y) = self.cell_of(x + reach, y + reach);
        let span = (i64::from(max_x) - i64::from(min_x) + 1) * (i64::from(max_y) - i64::from(min_y) + 1);

        if span > self.buckets.len() as i64 {
            for (&(cx, cy), bucket) in &self.buckets {
                if (min_x..=max_x).contains(&cx) && (min_y..=max_y).contains(&cy) {
                    for &slot in bucket {
                        visit(&self.entities[slot]);
                    }
                }
            }
            return;
        }

        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                if let Some(bucket) = self.buckets.get(&(cx, cy)) {
                    for &slot in bucket {
                        visit(&self.entities[slot]);
                    }
                }
            }
        }
    }
}
