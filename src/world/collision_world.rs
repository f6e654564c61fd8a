use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::collision::aabb::AABB;
use crate::collision::layers::LayerMask;
use crate::collision::result::{CollisionResult, RaycastHit, ShapeHit};
use crate::collision::spatial_hash::SpatialHash;
use crate::error::{CollisionError, Result};
use crate::math::{Transform, Vec2};
use crate::shapes::{Collider, ColliderHandle, ColliderSet};

use super::config::CollisionConfig;
use super::events::ColliderEvent;

fn unknown(handle: ColliderHandle) -> CollisionError {
    CollisionError::UnknownCollider(format!("{:?}", handle))
}

/// Query and bookkeeping front end over a [`SpatialHash`].
///
/// Colliders live in a caller-owned [`ColliderSet`]; the world only indexes
/// their handles. Every query runs the broadphase first and then the exact
/// narrow-phase test on the survivors. Optional filters see the query object,
/// the candidate handle and the candidate collider, and run before the exact test.
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    hash: SpatialHash,
    // scratch set reused by every query
    candidates: HashSet<ColliderHandle>,
}

impl CollisionWorld {
    /// Creates a new, empty world whose grid cells are `cell_size` wide.
    pub fn new(cell_size: f64) -> Result<Self> {
        Ok(Self {
            hash: SpatialHash::new(cell_size)?,
            candidates: HashSet::new(),
        })
    }

    pub fn from_config(config: &CollisionConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.cell_size)
    }

    pub fn spatial_hash(&self) -> &SpatialHash {
        &self.hash
    }

    /// Drains the scratch set in a stable order.
    fn take_candidates(&mut self) -> Vec<ColliderHandle> {
        let mut ordered: Vec<ColliderHandle> = self.candidates.drain().collect();
        ordered.sort_unstable();
        ordered
    }

    // --- Membership ---

    pub fn add(&mut self, colliders: &ColliderSet, handle: ColliderHandle) -> Result<()> {
        let collider = colliders.get(handle).ok_or_else(|| unknown(handle))?;
        self.hash.add(handle, collider)
    }

    pub fn remove(&mut self, colliders: &ColliderSet, handle: ColliderHandle) -> Result<()> {
        let collider = colliders.get(handle).ok_or_else(|| unknown(handle))?;
        self.hash.remove(handle, collider);
        Ok(())
    }

    /// Removes `handle` from every cell, whether or not it is still in the set.
    pub fn remove_with_brute_force(&mut self, handle: ColliderHandle) {
        self.hash.remove_with_brute_force(handle);
    }

    pub fn clear(&mut self) {
        self.hash.clear();
        self.candidates.clear();
    }

    /// Every indexed handle, sorted.
    pub fn all(&mut self) -> Vec<ColliderHandle> {
        self.candidates.clear();
        self.hash.all(&mut self.candidates);
        self.take_candidates()
    }

    /// Applies an entity lifecycle event.
    ///
    /// Added and Enabled index the collider. Removed and Disabled drop it; if the
    /// entity already deleted it from the set, every cell is scanned instead.
    /// Changed drops the old collider, then indexes the new one.
    pub fn apply_event(&mut self, colliders: &ColliderSet, event: ColliderEvent) -> Result<()> {
        trace!("apply_event {:?}", event);
        match event {
            ColliderEvent::Added(handle) | ColliderEvent::Enabled(handle) => self.add(colliders, handle),
            ColliderEvent::Removed(handle) | ColliderEvent::Disabled(handle) => {
                self.forget(colliders, handle);
                Ok(())
            }
            ColliderEvent::Changed { old, new } => {
                self.forget(colliders, old);
                self.add(colliders, new)
            }
        }
    }

    fn forget(&mut self, colliders: &ColliderSet, handle: ColliderHandle) {
        match colliders.get(handle) {
            Some(collider) => self.hash.remove(handle, collider),
            None => self.hash.remove_with_brute_force(handle),
        }
    }

    // --- Point queries ---

    pub fn collides_with_any_point(&mut self, colliders: &ColliderSet, point: Vec2) -> bool {
        self.collides_with_any_point_filtered(colliders, point, |_, _, _| true)
    }

    pub fn collides_with_any_point_filtered<F>(&mut self, colliders: &ColliderSet, point: Vec2, filter: F) -> bool
    where
        F: FnMut(&Vec2, ColliderHandle, &Collider) -> bool,
    {
        self.first_at_point_filtered(colliders, point, filter).is_some()
    }

    /// Every collider the point is inside, with the contact seen from the point.
    pub fn collisions_at_point(&mut self, colliders: &ColliderSet, point: Vec2) -> Vec<(ColliderHandle, CollisionResult)> {
        self.collisions_at_point_filtered(colliders, point, |_, _, _| true)
    }

    pub fn collisions_at_point_filtered<F>(
        &mut self,
        colliders: &ColliderSet,
        point: Vec2,
        mut filter: F,
    ) -> Vec<(ColliderHandle, CollisionResult)>
    where
        F: FnMut(&Vec2, ColliderHandle, &Collider) -> bool,
    {
        self.candidates.clear();
        self.hash.broadphase_point(point, &mut self.candidates);

        let mut results = Vec::new();
        for handle in self.take_candidates() {
            let Some(collider) = resolve(colliders, handle) else {
                continue;
            };
            if !filter(&point, handle, collider) {
                continue;
            }
            if let Some(result) = collider.collides_with_point(point) {
                results.push((handle, result.inverted()));
            }
        }
        results
    }

    pub fn first_at_point(&mut self, colliders: &ColliderSet, point: Vec2) -> Option<ColliderHandle> {
        self.first_at_point_filtered(colliders, point, |_, _, _| true)
    }

    pub fn first_at_point_filtered<F>(&mut self, colliders: &ColliderSet, point: Vec2, mut filter: F) -> Option<ColliderHandle>
    where
        F: FnMut(&Vec2, ColliderHandle, &Collider) -> bool,
    {
        self.candidates.clear();
        self.hash.broadphase_point(point, &mut self.candidates);

        self.take_candidates().into_iter().find(|handle| {
            resolve(colliders, *handle)
                .map_or(false, |collider| filter(&point, *handle, collider) && collider.overlaps_point(point))
        })
    }

    // --- Rectangle queries ---

    pub fn collides_with_any_rect(&mut self, colliders: &ColliderSet, rect: &AABB) -> bool {
        self.collides_with_any_rect_filtered(colliders, rect, |_, _, _| true)
    }

    pub fn collides_with_any_rect_filtered<F>(&mut self, colliders: &ColliderSet, rect: &AABB, filter: F) -> bool
    where
        F: FnMut(&AABB, ColliderHandle, &Collider) -> bool,
    {
        self.first_in_rect_filtered(colliders, rect, filter).is_some()
    }

    /// Every collider overlapping `rect`, with the contact seen from the rectangle.
    pub fn collisions_in_rect(&mut self, colliders: &ColliderSet, rect: &AABB) -> Vec<(ColliderHandle, CollisionResult)> {
        self.collisions_in_rect_filtered(colliders, rect, |_, _, _| true)
    }

    pub fn collisions_in_rect_filtered<F>(
        &mut self,
        colliders: &ColliderSet,
        rect: &AABB,
        mut filter: F,
    ) -> Vec<(ColliderHandle, CollisionResult)>
    where
        F: FnMut(&AABB, ColliderHandle, &Collider) -> bool,
    {
        self.candidates.clear();
        self.hash.broadphase_rect(rect, &mut self.candidates);

        let mut results = Vec::new();
        for handle in self.take_candidates() {
            let Some(collider) = resolve(colliders, handle) else {
                continue;
            };
            if !filter(rect, handle, collider) {
                continue;
            }
            if let Some(result) = collider.collides_with_rect(rect) {
                results.push((handle, result.inverted()));
            }
        }
        results
    }

    pub fn first_in_rect(&mut self, colliders: &ColliderSet, rect: &AABB) -> Option<ColliderHandle> {
        self.first_in_rect_filtered(colliders, rect, |_, _, _| true)
    }

    pub fn first_in_rect_filtered<F>(&mut self, colliders: &ColliderSet, rect: &AABB, mut filter: F) -> Option<ColliderHandle>
    where
        F: FnMut(&AABB, ColliderHandle, &Collider) -> bool,
    {
        self.candidates.clear();
        self.hash.broadphase_rect(rect, &mut self.candidates);

        self.take_candidates().into_iter().find(|handle| {
            resolve(colliders, *handle)
                .map_or(false, |collider| filter(rect, *handle, collider) && collider.overlaps_rect(rect))
        })
    }

    // --- Shape queries ---

    /// Candidates sharing a cell with `handle`'s bounds, excluding itself and
    /// anything whose layers do not interact with it.
    fn shape_candidates<'a>(
        &mut self,
        colliders: &'a ColliderSet,
        handle: ColliderHandle,
    ) -> Result<(&'a Collider, Vec<(ColliderHandle, &'a Collider)>)> {
        let query = colliders.get(handle).ok_or_else(|| unknown(handle))?;
        self.candidates.clear();
        self.hash.broadphase_shape(query, &mut self.candidates);

        let survivors = self
            .take_candidates()
            .into_iter()
            .filter(|candidate| *candidate != handle)
            .filter_map(|candidate| resolve(colliders, candidate).map(|collider| (candidate, collider)))
            .filter(|(_, collider)| query.layers().interacts_with(&collider.layers()))
            .collect();
        Ok((query, survivors))
    }

    pub fn collides_with_any(&mut self, colliders: &ColliderSet, handle: ColliderHandle) -> Result<bool> {
        self.collides_with_any_filtered(colliders, handle, |_, _, _| true)
    }

    pub fn collides_with_any_filtered<F>(&mut self, colliders: &ColliderSet, handle: ColliderHandle, filter: F) -> Result<bool>
    where
        F: FnMut(&Collider, ColliderHandle, &Collider) -> bool,
    {
        Ok(self.first_collision_filtered(colliders, handle, filter)?.is_some())
    }

    /// Every collider overlapping `handle`. The contacts are seen from `handle`:
    /// subtracting a minimum translation vector from its position separates that pair.
    pub fn collisions(&mut self, colliders: &ColliderSet, handle: ColliderHandle) -> Result<Vec<(ColliderHandle, ShapeHit)>> {
        self.collisions_filtered(colliders, handle, |_, _, _| true)
    }

    pub fn collisions_filtered<F>(
        &mut self,
        colliders: &ColliderSet,
        handle: ColliderHandle,
        mut filter: F,
    ) -> Result<Vec<(ColliderHandle, ShapeHit)>>
    where
        F: FnMut(&Collider, ColliderHandle, &Collider) -> bool,
    {
        let (query, survivors) = self.shape_candidates(colliders, handle)?;
        Ok(survivors
            .into_iter()
            .filter(|(candidate, collider)| filter(query, *candidate, *collider))
            .filter_map(|(candidate, collider)| query.collides_with_shape(collider).map(|hit| (candidate, hit)))
            .collect())
    }

    pub fn first_collision(&mut self, colliders: &ColliderSet, handle: ColliderHandle) -> Result<Option<ColliderHandle>> {
        self.first_collision_filtered(colliders, handle, |_, _, _| true)
    }

    pub fn first_collision_filtered<F>(
        &mut self,
        colliders: &ColliderSet,
        handle: ColliderHandle,
        mut filter: F,
    ) -> Result<Option<ColliderHandle>>
    where
        F: FnMut(&Collider, ColliderHandle, &Collider) -> bool,
    {
        let (query, survivors) = self.shape_candidates(colliders, handle)?;
        Ok(survivors
            .into_iter()
            .find(|(candidate, collider)| filter(query, *candidate, *collider) && query.overlaps(*collider))
            .map(|(candidate, _)| candidate))
    }

    /// Every overlapping pair among indexed colliders whose layers interact, each pair once.
    /// The contact is seen from the first handle of the pair.
    pub fn collision_pairs(&self, colliders: &ColliderSet) -> Vec<(ColliderHandle, ColliderHandle, ShapeHit)> {
        let mut pairs = self.hash.potential_pairs();
        pairs.sort_unstable();

        let mut contacts = Vec::new();
        for (a, b) in pairs {
            let (Some(first), Some(second)) = (resolve(colliders, a), resolve(colliders, b)) else {
                continue;
            };
            if !first.layers().interacts_with(&second.layers()) {
                continue;
            }
            if let Some(hit) = first.collides_with_shape(second) {
                contacts.push((a, b, hit));
            }
        }
        debug!("collision_pairs: {} contacts", contacts.len());
        contacts
    }

    // --- Casts and exact overlaps ---

    /// All hits along the segment, nearest first.
    pub fn linecast_all(
        &self,
        colliders: &ColliderSet,
        start: Vec2,
        end: Vec2,
        layer_mask: LayerMask,
    ) -> Result<Vec<RaycastHit>> {
        let mut hits = Vec::new();
        self.hash
            .linecast(start, end, colliders, layer_mask, &mut hits)
            .map_err(|e| {
                warn!("linecast from {:?} to {:?} failed: {}", start, end, e);
                e
            })?;
        Ok(hits)
    }

    /// Nearest hit along the segment.
    pub fn linecast(
        &self,
        colliders: &ColliderSet,
        start: Vec2,
        end: Vec2,
        layer_mask: LayerMask,
    ) -> Result<Option<RaycastHit>> {
        Ok(self.linecast_all(colliders, start, end, layer_mask)?.into_iter().next())
    }

    pub fn overlap_circle(
        &self,
        colliders: &ColliderSet,
        center: Vec2,
        radius: f64,
        layer_mask: LayerMask,
    ) -> Result<Vec<ColliderHandle>> {
        let mut results = Vec::new();
        self.hash
            .overlap_circle(center, radius, colliders, layer_mask, &mut results)?;
        results.sort_unstable();
        Ok(results)
    }

    pub fn overlap_rectangle(&self, colliders: &ColliderSet, rect: &AABB, layer_mask: LayerMask) -> Vec<ColliderHandle> {
        let mut results = Vec::new();
        self.hash.overlap_rectangle(rect, colliders, layer_mask, &mut results);
        results.sort_unstable();
        results
    }

    // --- Mutation helpers ---

    /// Removes the collider, mutates it and indexes it again, even when the mutation fails.
    /// A mutation that leaves the bounds outside the grid leaves the collider unindexed.
    fn reindex<F>(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Collider) -> Result<()>,
    {
        let collider = colliders.get_mut(handle).ok_or_else(|| unknown(handle))?;
        self.hash.remove(handle, collider);
        let outcome = mutate(collider);
        let indexed = self.hash.add(handle, collider);
        outcome.and(indexed)
    }

    pub fn move_by(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, delta: Vec2) -> Result<()> {
        self.reindex(colliders, handle, |collider| {
            collider.translate(delta);
            Ok(())
        })
    }

    pub fn set_position(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, position: Vec2) -> Result<()> {
        self.reindex(colliders, handle, |collider| {
            collider.set_position(position);
            Ok(())
        })
    }

    /// Rotating a circle or point never changes its bounds, so those are updated in place.
    pub fn rotate(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, delta: f64) -> Result<()> {
        let collider = colliders.get_mut(handle).ok_or_else(|| unknown(handle))?;
        if !collider.rotation_affects_geometry() {
            collider.rotate(delta);
            return Ok(());
        }
        self.reindex(colliders, handle, |collider| {
            collider.rotate(delta);
            Ok(())
        })
    }

    pub fn set_rotation(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, rotation: f64) -> Result<()> {
        let collider = colliders.get_mut(handle).ok_or_else(|| unknown(handle))?;
        if !collider.rotation_affects_geometry() {
            collider.set_rotation(rotation);
            return Ok(());
        }
        self.reindex(colliders, handle, |collider| {
            collider.set_rotation(rotation);
            Ok(())
        })
    }

    pub fn set_scale(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, scale: f64) -> Result<()> {
        self.reindex(colliders, handle, |collider| collider.set_scale(scale))
    }

    /// Translates and rotates in one re-index.
    pub fn move_transform(
        &mut self,
        colliders: &mut ColliderSet,
        handle: ColliderHandle,
        delta_position: Vec2,
        delta_rotation: f64,
    ) -> Result<()> {
        self.reindex(colliders, handle, |collider| {
            collider.translate(delta_position);
            collider.rotate(delta_rotation);
            Ok(())
        })
    }

    pub fn set_transform(&mut self, colliders: &mut ColliderSet, handle: ColliderHandle, transform: Transform) -> Result<()> {
        self.reindex(colliders, handle, |collider| collider.set_transform(transform))
    }
}

fn resolve(colliders: &ColliderSet, handle: ColliderHandle) -> Option<&Collider> {
    let collider = colliders.get(handle);
    if collider.is_none() {
        trace!("skipping dangling handle {:?}", handle);
    }
    collider
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::layers::CollisionLayers;
    use crate::shapes::Shape;
    use approx::assert_abs_diff_eq;

    fn setup() -> (CollisionWorld, ColliderSet) {
        let _ = env_logger::builder().is_test(true).try_init();
        (CollisionWorld::new(10.0).unwrap(), ColliderSet::with_key())
    }

    fn spawn(world: &mut CollisionWorld, colliders: &mut ColliderSet, collider: Collider) -> ColliderHandle {
        let handle = colliders.insert(collider);
        world.add(colliders, handle).unwrap();
        handle
    }

    fn square(x: f64, y: f64, size: f64) -> Collider {
        Collider::new(Shape::rect(size, size).unwrap()).with_position(Vec2::new(x, y))
    }

    fn ball(x: f64, y: f64, radius: f64) -> Collider {
        Collider::new(Shape::circle(radius).unwrap()).with_position(Vec2::new(x, y))
    }

    #[test]
    fn test_empty_world_queries() {
        let (mut world, colliders) = setup();
        assert!(!world.collides_with_any_point(&colliders, Vec2::ZERO));
        assert!(world.collisions_in_rect(&colliders, &AABB::new(Vec2::ZERO, Vec2::new(50.0, 50.0))).is_empty());
        assert!(world.first_in_rect(&colliders, &AABB::new(Vec2::ZERO, Vec2::new(50.0, 50.0))).is_none());
        assert!(world.all().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_cell_size() {
        assert!(matches!(CollisionWorld::new(0.0), Err(CollisionError::InvalidArgument(_))));
        assert!(CollisionWorld::from_config(&CollisionConfig { cell_size: -1.0 }).is_err());
        assert!(CollisionWorld::from_config(&CollisionConfig::default()).is_ok());
    }

    #[test]
    fn test_unknown_handle_errors() {
        let (mut world, mut colliders) = setup();
        let handle = colliders.insert(ball(0.0, 0.0, 1.0));
        colliders.remove(handle);
        assert!(matches!(world.add(&colliders, handle), Err(CollisionError::UnknownCollider(_))));
        assert!(matches!(world.collisions(&colliders, handle), Err(CollisionError::UnknownCollider(_))));
        assert!(world.move_by(&mut colliders, handle, Vec2::ONE).is_err());
    }

    #[test]
    fn test_point_queries() {
        let (mut world, mut colliders) = setup();
        let wall = spawn(&mut world, &mut colliders, square(0.0, 0.0, 10.0));

        assert!(world.collides_with_any_point(&colliders, Vec2::new(5.0, 5.0)));
        assert_eq!(world.first_at_point(&colliders, Vec2::new(5.0, 5.0)), Some(wall));
        assert!(!world.collides_with_any_point(&colliders, Vec2::new(15.0, 5.0)));

        let hits = world.collisions_at_point(&colliders, Vec2::new(9.0, 5.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, wall);
        // seen from the point: subtracting the MTV moves it onto the wall's border
        assert_abs_diff_eq!(hits[0].1.minimum_translation_vector, Vec2::new(-1.0, 0.0), epsilon = 1e-9);

        let rejected = world.collides_with_any_point_filtered(&colliders, Vec2::new(5.0, 5.0), |_, h, _| h != wall);
        assert!(!rejected);
    }

    #[test]
    fn test_rect_queries() {
        let (mut world, mut colliders) = setup();
        let a = spawn(&mut world, &mut colliders, ball(5.0, 5.0, 2.0));
        let b = spawn(&mut world, &mut colliders, square(20.0, 0.0, 5.0));
        let _far = spawn(&mut world, &mut colliders, ball(200.0, 200.0, 2.0));

        let rect = AABB::new(Vec2::new(0.0, 0.0), Vec2::new(22.0, 10.0));
        let hits = world.collisions_in_rect(&colliders, &rect);
        let handles: Vec<ColliderHandle> = hits.iter().map(|(h, _)| *h).collect();
        assert_eq!(handles.len(), 2);
        assert!(handles.contains(&a));
        assert!(handles.contains(&b));

        let only_circles = world.collisions_in_rect_filtered(&colliders, &rect, |_, _, c| c.kind() == crate::shapes::ShapeKind::Circle);
        assert_eq!(only_circles.len(), 1);
        assert_eq!(only_circles[0].0, a);
        assert!(world.collides_with_any_rect(&colliders, &rect));
    }

    #[test]
    fn test_shape_queries_skip_self_and_layers() {
        let (mut world, mut colliders) = setup();
        let player = spawn(
            &mut world,
            &mut colliders,
            ball(0.0, 0.0, 5.0).with_layers(CollisionLayers::new(LayerMask::PLAYER, LayerMask::ENEMY)),
        );
        let enemy = spawn(
            &mut world,
            &mut colliders,
            ball(7.0, 0.0, 5.0).with_layers(CollisionLayers::new(LayerMask::ENEMY, LayerMask::PLAYER)),
        );
        let _friend = spawn(
            &mut world,
            &mut colliders,
            ball(-7.0, 0.0, 5.0).with_layers(CollisionLayers::new(LayerMask::PLAYER, LayerMask::ENEMY)),
        );

        let hits = world.collisions(&colliders, player).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, enemy);
        assert_abs_diff_eq!(hits[0].1.result.minimum_translation_vector, Vec2::new(3.0, 0.0), epsilon = 1e-9);

        assert_eq!(world.first_collision(&colliders, player).unwrap(), Some(enemy));
        assert!(!world.collides_with_any_filtered(&colliders, player, |_, h, _| h != enemy).unwrap());
    }

    #[test]
    fn test_move_helpers_reindex() {
        let (mut world, mut colliders) = setup();
        let mover = spawn(&mut world, &mut colliders, square(0.0, 0.0, 5.0));

        world.move_by(&mut colliders, mover, Vec2::new(100.0, 0.0)).unwrap();
        assert!(world.first_at_point(&colliders, Vec2::new(2.0, 2.0)).is_none());
        assert_eq!(world.first_at_point(&colliders, Vec2::new(102.0, 2.0)), Some(mover));
        assert_eq!(world.spatial_hash().cell_count(), 1);

        world.set_position(&mut colliders, mover, Vec2::new(-50.0, -50.0)).unwrap();
        assert_eq!(world.first_at_point(&colliders, Vec2::new(-48.0, -48.0)), Some(mover));
        assert_eq!(world.all(), vec![mover]);

        world.set_scale(&mut colliders, mover, 4.0).unwrap();
        assert_eq!(world.first_at_point(&colliders, Vec2::new(-40.0, -40.0)), Some(mover));

        // a rejected scale leaves the collider indexed where it was
        assert!(world.set_scale(&mut colliders, mover, 0.0).is_err());
        assert_eq!(world.first_at_point(&colliders, Vec2::new(-40.0, -40.0)), Some(mover));
    }

    #[test]
    fn test_rotate_circle_in_place() {
        let (mut world, mut colliders) = setup();
        let round = spawn(&mut world, &mut colliders, ball(5.0, 5.0, 2.0));
        let _ = colliders[round].bounds();

        world.rotate(&mut colliders, round, 1.0).unwrap();
        assert!(!colliders[round].is_dirty());
        assert_eq!(colliders[round].rotation(), 1.0);
    }

    #[test]
    fn test_rotate_box_reindexes() {
        let (mut world, mut colliders) = setup();
        let plank = spawn(
            &mut world,
            &mut colliders,
            Collider::new(Shape::rect(40.0, 2.0).unwrap()).with_position(Vec2::new(0.0, 0.0)),
        );
        world.set_rotation(&mut colliders, plank, std::f64::consts::FRAC_PI_2).unwrap();
        // now a vertical plank centered on (20, 1)
        assert_eq!(world.first_at_point(&colliders, Vec2::new(20.0, 15.0)), Some(plank));
        assert!(world.first_at_point(&colliders, Vec2::new(2.0, 1.0)).is_none());

        world.move_transform(&mut colliders, plank, Vec2::new(10.0, 0.0), -std::f64::consts::FRAC_PI_2).unwrap();
        assert_eq!(world.first_at_point(&colliders, Vec2::new(40.0, 1.0)), Some(plank));

        world.set_transform(&mut colliders, plank, Transform::new(Vec2::new(100.0, 100.0), 0.0)).unwrap();
        assert_eq!(world.first_at_point(&colliders, Vec2::new(101.0, 101.0)), Some(plank));
    }

    #[test]
    fn test_events() {
        let (mut world, mut colliders) = setup();
        let a = colliders.insert(ball(5.0, 5.0, 2.0));
        let b = colliders.insert(square(30.0, 30.0, 4.0));

        world.apply_event(&colliders, ColliderEvent::Added(a)).unwrap();
        assert_eq!(world.all(), vec![a]);

        world.apply_event(&colliders, ColliderEvent::Disabled(a)).unwrap();
        assert!(world.all().is_empty());

        world.apply_event(&colliders, ColliderEvent::Enabled(a)).unwrap();
        world.apply_event(&colliders, ColliderEvent::Changed { old: a, new: b }).unwrap();
        assert_eq!(world.all(), vec![b]);

        colliders.remove(b);
        world.apply_event(&colliders, ColliderEvent::Removed(b)).unwrap();
        assert!(world.all().is_empty());
    }

    #[test]
    fn test_collision_pairs() {
        let (mut world, mut colliders) = setup();
        let a = spawn(&mut world, &mut colliders, ball(0.0, 0.0, 5.0));
        let b = spawn(&mut world, &mut colliders, ball(7.0, 0.0, 5.0));
        let _c = spawn(&mut world, &mut colliders, ball(40.0, 0.0, 5.0));
        // shares cells with `a` but does not touch it
        let _d = spawn(&mut world, &mut colliders, square(-9.0, -9.0, 2.0));

        let pairs = world.collision_pairs(&colliders);
        assert_eq!(pairs.len(), 1);
        let (x, y, hit) = pairs[0];
        assert!((x, y) == (a, b) || (x, y) == (b, a));
        assert_abs_diff_eq!(hit.result.depth(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linecast_first_hit() {
        let (mut world, mut colliders) = setup();
        let near = spawn(&mut world, &mut colliders, square(10.0, 0.0, 4.0));
        let _far = spawn(&mut world, &mut colliders, square(30.0, 0.0, 4.0));

        let hit = world
            .linecast(&colliders, Vec2::new(0.0, 2.0), Vec2::new(50.0, 2.0), LayerMask::ALL)
            .unwrap()
            .unwrap();
        assert_eq!(hit.collider, Some(near));
        assert_abs_diff_eq!(hit.distance, 10.0, epsilon = 1e-9);

        let all = world
            .linecast_all(&colliders, Vec2::new(0.0, 2.0), Vec2::new(50.0, 2.0), LayerMask::ALL)
            .unwrap();
        assert_eq!(all.len(), 2);

        let miss = world
            .linecast(&colliders, Vec2::new(0.0, 20.0), Vec2::new(50.0, 20.0), LayerMask::ALL)
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_linecast_past_a_bare_point_still_reaches_the_wall() {
        let (mut world, mut colliders) = setup();
        let wall = spawn(
            &mut world,
            &mut colliders,
            Collider::new(Shape::rect(5.0, 10.0).unwrap()).with_position(Vec2::new(20.0, 0.0)),
        );
        let dot = spawn(&mut world, &mut colliders, Collider::new(Shape::point()).with_position(Vec2::new(5.0, 5.0)));

        // crosses the point's 1x1 bounds without touching the point
        let hit = world
            .linecast(&colliders, Vec2::new(0.0, 5.4), Vec2::new(30.0, 5.4), LayerMask::ALL)
            .unwrap()
            .unwrap();
        assert_eq!(hit.collider, Some(wall));
        assert_abs_diff_eq!(hit.distance, 20.0, epsilon = 1e-9);

        let hits = world
            .linecast_all(&colliders, Vec2::new(0.0, 5.0), Vec2::new(30.0, 5.0), LayerMask::ALL)
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].collider, Some(dot));
        assert_abs_diff_eq!(hits[0].fraction, 5.0 / 30.0, epsilon = 1e-9);
        assert_eq!(hits[1].collider, Some(wall));
    }

    #[test]
    fn test_move_outside_grid_is_rejected() {
        let (mut world, mut colliders) = setup();
        let body = spawn(&mut world, &mut colliders, ball(5.0, 5.0, 2.0));

        let result = world.set_position(&mut colliders, body, Vec2::new(f64::INFINITY, 0.0));
        assert!(matches!(result, Err(CollisionError::InvalidArgument(_))));
        assert!(world.all().is_empty());

        world.set_position(&mut colliders, body, Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(world.all(), vec![body]);
    }
}
