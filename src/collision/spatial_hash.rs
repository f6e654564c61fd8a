// Uniform spatial hash for broadphase collision queries.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::collision::aabb::AABB;
use crate::collision::dispatch;
use crate::collision::layers::LayerMask;
use crate::collision::result::RaycastHit;
use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;
use crate::shapes::world_shape::{WorldCircle, WorldPolygon, WorldShape};
use crate::shapes::{Collider, ColliderHandle, ColliderSet};

/// Packs a cell coordinate pair into one map key.
#[inline]
fn cell_key(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

#[inline]
fn unpack_key(key: u64) -> (i32, i32) {
    ((key >> 32) as u32 as i32, key as u32 as i32)
}

fn has_nan(bounds: &AABB) -> bool {
    [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y]
        .iter()
        .any(|v| v.is_nan())
}

/// An unbounded uniform grid mapping cells to the colliders whose bounds overlap them.
///
/// The hash stores handles only. It is never told when a collider moves: callers
/// remove a collider before changing its bounds and add it again afterwards
/// (or go through [`CollisionWorld`](crate::world::CollisionWorld), which does this).
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f64,
    inv_cell_size: f64,
    cells: HashMap<u64, Vec<ColliderHandle>>,
}

impl SpatialHash {
    /// Creates an empty hash.
    ///
    /// # Arguments
    /// * `cell_size` - Width and height of one cell; must be positive and finite.
    pub fn new(cell_size: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CollisionError::invalid(format!(
                "cell size must be positive, got {cell_size}"
            )));
        }
        debug!("Creating SpatialHash: cell_size={}", cell_size);
        Ok(SpatialHash {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // --- Helper Methods ---

    /// Converts a world position to cell coordinates.
    #[inline]
    pub fn cell_coords(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x * self.inv_cell_size).floor() as i32,
            (point.y * self.inv_cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range `(min_x, min_y, max_x, max_y)` covered by `bounds`.
    /// Coordinates past the `i32` range saturate.
    fn cell_range(&self, bounds: &AABB) -> (i32, i32, i32, i32) {
        let (min_x, min_y) = self.cell_coords(bounds.min);
        let (max_x, max_y) = self.cell_coords(bounds.max);
        (min_x, min_y, max_x, max_y)
    }

    /// Like [`cell_range`](Self::cell_range), but `None` unless every corner maps to a real cell.
    fn exact_cell_range(&self, bounds: &AABB) -> Option<(i32, i32, i32, i32)> {
        let fits = |v: f64| {
            let cell = (v * self.inv_cell_size).floor();
            cell.is_finite() && cell >= i32::MIN as f64 && cell <= i32::MAX as f64
        };
        [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y]
            .into_iter()
            .all(fits)
            .then(|| self.cell_range(bounds))
    }

    /// Keys of the occupied cells inside `range`.
    ///
    /// Wide ranges scan the occupied cells instead of walking every coordinate,
    /// so the cost never exceeds the size of the map.
    fn occupied_keys_in(&self, (min_x, min_y, max_x, max_y): (i32, i32, i32, i32)) -> Vec<u64> {
        let columns = (max_x as i64 - min_x as i64 + 1).max(0) as u128;
        let rows = (max_y as i64 - min_y as i64 + 1).max(0) as u128;
        if columns * rows <= self.cells.len() as u128 {
            let mut keys = Vec::new();
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    let key = cell_key(x, y);
                    if self.cells.contains_key(&key) {
                        keys.push(key);
                    }
                }
            }
            keys
        } else {
            self.cells
                .keys()
                .copied()
                .filter(|key| {
                    let (x, y) = unpack_key(*key);
                    (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y)
                })
                .collect()
        }
    }

    /// Handles stored in cell `(x, y)`.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&[ColliderHandle]> {
        self.cells.get(&cell_key(x, y)).map(Vec::as_slice)
    }

    /// Coordinates of every non-empty cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.keys().map(|key| unpack_key(*key))
    }

    // --- Membership ---

    /// Inserts `handle` into every cell overlapped by the collider's current bounds.
    ///
    /// Adding the same handle twice without a removal in between duplicates its membership.
    /// Bounds that are not finite or fall outside the addressable grid are rejected.
    pub fn add(&mut self, handle: ColliderHandle, collider: &Collider) -> Result<()> {
        let bounds = collider.bounds();
        let (min_x, min_y, max_x, max_y) = self.exact_cell_range(&bounds).ok_or_else(|| {
            CollisionError::invalid(format!("collider bounds {:?} lie outside the grid", bounds))
        })?;
        trace!(
            "add {:?}: cells ({}, {})..=({}, {})",
            handle,
            min_x,
            min_y,
            max_x,
            max_y
        );
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.cells.entry(cell_key(x, y)).or_default().push(handle);
            }
        }
        Ok(())
    }

    /// Removes one membership of `handle` from each cell overlapped by the collider's current bounds.
    ///
    /// Bounds with a NaN coordinate say nothing about where the collider is
    /// indexed, so every cell is scanned instead.
    pub fn remove(&mut self, handle: ColliderHandle, collider: &Collider) {
        let bounds = collider.bounds();
        if has_nan(&bounds) {
            self.remove_with_brute_force(handle);
            return;
        }
        let range = self.cell_range(&bounds);
        trace!("remove {:?}: cells {:?}", handle, range);
        for key in self.occupied_keys_in(range) {
            if let Some(cell) = self.cells.get_mut(&key) {
                if let Some(index) = cell.iter().position(|h| *h == handle) {
                    cell.remove(index);
                }
                if cell.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Removes every membership of `handle` by scanning all cells.
    ///
    /// Use when the collider was mutated without being removed first, so its
    /// current bounds no longer describe where it is indexed.
    pub fn remove_with_brute_force(&mut self, handle: ColliderHandle) {
        let before = self.cells.len();
        for cell in self.cells.values_mut() {
            cell.retain(|h| *h != handle);
        }
        self.cells.retain(|_, cell| !cell.is_empty());
        debug!(
            "brute force removal of {:?} scanned {} cells",
            handle, before
        );
    }

    /// Drops every cell.
    pub fn clear(&mut self) {
        debug!("Clearing SpatialHash ({} cells)", self.cells.len());
        self.cells.clear();
    }

    // --- Broadphase ---

    /// Every indexed handle.
    pub fn all(&self, results: &mut HashSet<ColliderHandle>) {
        for cell in self.cells.values() {
            results.extend(cell.iter().copied());
        }
    }

    /// Every indexed handle accepted by `predicate`.
    pub fn all_filtered<F>(&self, results: &mut HashSet<ColliderHandle>, mut predicate: F)
    where
        F: FnMut(ColliderHandle) -> bool,
    {
        for cell in self.cells.values() {
            for handle in cell {
                if predicate(*handle) {
                    results.insert(*handle);
                }
            }
        }
    }

    /// Handles in the cell containing `point`.
    pub fn broadphase_point(&self, point: Vec2, results: &mut HashSet<ColliderHandle>) {
        let (x, y) = self.cell_coords(point);
        if let Some(cell) = self.cell_at(x, y) {
            results.extend(cell.iter().copied());
        }
    }

    /// Handles in every cell overlapped by `rect`. A superset of the exact answer.
    pub fn broadphase_rect(&self, rect: &AABB, results: &mut HashSet<ColliderHandle>) {
        if has_nan(rect) {
            return;
        }
        for key in self.occupied_keys_in(self.cell_range(rect)) {
            if let Some(cell) = self.cells.get(&key) {
                results.extend(cell.iter().copied());
            }
        }
    }

    /// Handles sharing a cell with the collider's current bounds.
    pub fn broadphase_shape(&self, collider: &Collider, results: &mut HashSet<ColliderHandle>) {
        self.broadphase_rect(&collider.bounds(), results);
    }

    // --- Exact queries ---

    /// Cells visited by the segment `start -> end`, in traversal order.
    fn cells_along_segment(&self, start: Vec2, end: Vec2) -> Vec<(i32, i32)> {
        let (mut x, mut y) = self.cell_coords(start);
        let (last_x, last_y) = self.cell_coords(end);
        let direction = end - start;

        let step = |current: i32, last: i32, d: f64| -> i32 {
            if current == last {
                0
            } else if d > 0.0 {
                1
            } else {
                -1
            }
        };
        let step_x = step(x, last_x, direction.x);
        let step_y = step(y, last_y, direction.y);

        // parametric distance to the first boundary crossing, then per cell
        let boundary = |cell: i32, step: i32| (cell + step.max(0)) as f64 * self.cell_size;
        let mut t_max_x = if step_x != 0 {
            (boundary(x, step_x) - start.x) / direction.x
        } else {
            f64::INFINITY
        };
        let mut t_max_y = if step_y != 0 {
            (boundary(y, step_y) - start.y) / direction.y
        } else {
            f64::INFINITY
        };
        let t_delta_x = if step_x != 0 {
            self.cell_size / direction.x.abs()
        } else {
            f64::INFINITY
        };
        let t_delta_y = if step_y != 0 {
            self.cell_size / direction.y.abs()
        } else {
            f64::INFINITY
        };

        let mut visited = vec![(x, y)];
        while x != last_x || y != last_y {
            if t_max_x < t_max_y {
                if x != last_x {
                    x += step_x;
                }
                t_max_x += t_delta_x;
            } else {
                if y != last_y {
                    y += step_y;
                }
                t_max_y += t_delta_y;
            }
            visited.push((x, y));
        }
        visited
    }

    /// Casts the segment through the grid and appends every hit to `hits`, nearest first.
    ///
    /// Each candidate is tested once. Colliders whose membership does not intersect
    /// `layer_mask` are skipped. Returns the number of hits appended.
    pub fn linecast(
        &self,
        start: Vec2,
        end: Vec2,
        colliders: &ColliderSet,
        layer_mask: LayerMask,
        hits: &mut Vec<RaycastHit>,
    ) -> Result<usize> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CollisionError::invalid("linecast endpoints must be finite"));
        }

        // a segment crossing more cells than are occupied just visits the occupied ones
        let bounds = AABB::new(start, end);
        let keys: Vec<u64> = match self.exact_cell_range(&bounds) {
            Some((min_x, min_y, max_x, max_y))
                if (max_x as i64 - min_x as i64) + (max_y as i64 - min_y as i64) < self.cells.len() as i64 =>
            {
                self.cells_along_segment(start, end)
                    .into_iter()
                    .map(|(x, y)| cell_key(x, y))
                    .collect()
            }
            _ => self.occupied_keys_in(self.cell_range(&bounds)),
        };

        let mut checked: HashSet<ColliderHandle> = HashSet::new();
        let mut found = Vec::new();
        for key in keys {
            let Some(cell) = self.cells.get(&key) else {
                continue;
            };
            for handle in cell {
                if !checked.insert(*handle) {
                    continue;
                }
                let Some(collider) = colliders.get(*handle) else {
                    trace!("linecast skipped dangling handle {:?}", handle);
                    continue;
                };
                if !collider.layers().membership.intersects(layer_mask) {
                    continue;
                }
                if collider.bounds().segment_intersects(start, end).is_none() {
                    continue;
                }
                if let Some(mut hit) = collider.collides_with_line(start, end) {
                    hit.collider = Some(*handle);
                    found.push(hit);
                }
            }
        }

        found.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        let count = found.len();
        hits.extend(found);
        Ok(count)
    }

    /// Collects colliders whose exact shape overlaps the circle. Returns the number appended.
    pub fn overlap_circle(
        &self,
        center: Vec2,
        radius: f64,
        colliders: &ColliderSet,
        layer_mask: LayerMask,
        results: &mut Vec<ColliderHandle>,
    ) -> Result<usize> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(CollisionError::invalid(format!(
                "overlap radius must be non-negative, got {radius}"
            )));
        }
        let probe = WorldShape::Circle(WorldCircle { center, radius });
        let bounds = AABB::from_center_half_extent(center, radius);
        Ok(self.overlap_exact(&probe, &bounds, colliders, layer_mask, results))
    }

    /// Collects colliders whose exact shape overlaps `rect`. Returns the number appended.
    pub fn overlap_rectangle(
        &self,
        rect: &AABB,
        colliders: &ColliderSet,
        layer_mask: LayerMask,
        results: &mut Vec<ColliderHandle>,
    ) -> usize {
        let probe = WorldShape::Polygon(WorldPolygon::from_rect(rect));
        self.overlap_exact(&probe, rect, colliders, layer_mask, results)
    }

    fn overlap_exact(
        &self,
        probe: &WorldShape,
        bounds: &AABB,
        colliders: &ColliderSet,
        layer_mask: LayerMask,
        results: &mut Vec<ColliderHandle>,
    ) -> usize {
        let mut candidates = HashSet::new();
        self.broadphase_rect(bounds, &mut candidates);

        let before = results.len();
        for handle in candidates {
            let Some(collider) = colliders.get(handle) else {
                trace!("overlap skipped dangling handle {:?}", handle);
                continue;
            };
            if collider.layers().membership.intersects(layer_mask)
                && dispatch::overlaps(collider.world_shape(), probe)
            {
                results.push(handle);
            }
        }
        results.len() - before
    }

    /// Potential pairs: handles sharing at least one cell, each unordered pair once.
    pub fn potential_pairs(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut seen: HashSet<(ColliderHandle, ColliderHandle)> = HashSet::new();
        let mut pairs = Vec::new();
        for cell in self.cells.values() {
            if cell.len() < 2 {
                continue;
            }
            for i in 0..cell.len() {
                for j in (i + 1)..cell.len() {
                    let (a, b) = (cell[i], cell[j]);
                    if a == b {
                        continue;
                    }
                    let pair = if a < b { (a, b) } else { (b, a) };
                    if seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
        }
        pairs
    }
}
