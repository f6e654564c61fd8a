use slotmap::{new_key_type, SlotMap};

use crate::collision::aabb::AABB;
use crate::collision::dispatch;
use crate::collision::layers::CollisionLayers;
use crate::collision::result::{CollisionResult, RaycastHit, ShapeHit};
use crate::error::{CollisionError, Result};
use crate::math::{Transform, Vec2};

use super::derived::Derived;
use super::world_shape::{Geometry, WorldLine, WorldPolygon, WorldShape};
use super::{Shape, ShapeKind};

new_key_type! {
    /// Stable, non-owning reference to a collider stored in a [`ColliderSet`].
    pub struct ColliderHandle;
}

/// Caller-owned storage for colliders. The spatial index only ever stores handles into it.
pub type ColliderSet = SlotMap<ColliderHandle, Collider>;

/// A shape placed in the world.
///
/// Transform setters only mark the derived geometry dirty; bounds and
/// world-space vertices are rebuilt on the next read. A collider registered in
/// a [`SpatialHash`](crate::collision::SpatialHash) must be removed before any
/// change that moves its bounds and added again afterwards, or use the
/// [`CollisionWorld`](crate::world::CollisionWorld) helpers that do so.
#[derive(Debug, Clone)]
pub struct Collider {
    shape: Shape,
    transform: Transform,
    layers: CollisionLayers,
    geometry: Derived<Geometry>,
}

impl Collider {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            transform: Transform::identity(),
            layers: CollisionLayers::default(),
            geometry: Derived::new(),
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Result<Self> {
        self.set_scale(scale)?;
        Ok(self)
    }

    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn rotation(&self) -> f64 {
        self.transform.rotation
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn layers(&self) -> CollisionLayers {
        self.layers
    }

    pub fn set_layers(&mut self, layers: CollisionLayers) {
        self.layers = layers;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
        self.geometry.invalidate();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.transform.position + delta);
    }

    /// Rotation is stored for every shape but only changes the geometry of
    /// lines, boxes and polygons.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.transform.rotation = rotation;
        if self.rotation_affects_geometry() {
            self.geometry.invalidate();
        }
    }

    pub fn rotate(&mut self, delta: f64) {
        self.set_rotation(self.transform.rotation + delta);
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        validate_scale(scale)?;
        self.transform.scale = scale;
        self.geometry.invalidate();
        Ok(())
    }

    /// Replaces position, rotation and scale at once. Nothing changes if the scale is invalid.
    pub fn set_transform(&mut self, transform: Transform) -> Result<()> {
        validate_scale(transform.scale)?;
        self.transform = transform;
        self.geometry.invalidate();
        Ok(())
    }

    /// Whether rotating this collider can move its bounds.
    pub fn rotation_affects_geometry(&self) -> bool {
        !matches!(self.shape, Shape::Circle(_) | Shape::Point)
    }

    /// True when a transform change has not been folded into the cached geometry yet.
    pub fn is_dirty(&self) -> bool {
        self.geometry.is_dirty()
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry
            .get_or_compute(|| Geometry::compute(&self.shape, &self.transform))
    }

    pub fn world_shape(&self) -> &WorldShape {
        &self.geometry().shape
    }

    pub fn bounds(&self) -> AABB {
        self.geometry().bounds
    }

    /// Cheap boolean overlap test.
    pub fn overlaps(&self, other: &Collider) -> bool {
        dispatch::overlaps(self.world_shape(), other.world_shape())
    }

    /// Detailed test. The minimum translation vector points from `self` into
    /// `other`: subtract it from `self`'s position to separate the two.
    pub fn collides_with_shape(&self, other: &Collider) -> Option<ShapeHit> {
        dispatch::collide(self.world_shape(), other.world_shape())
    }

    pub fn overlaps_rect(&self, rect: &AABB) -> bool {
        let other = WorldShape::Polygon(WorldPolygon::from_rect(rect));
        dispatch::overlaps(self.world_shape(), &other)
    }

    pub fn collides_with_rect(&self, rect: &AABB) -> Option<CollisionResult> {
        let other = WorldShape::Polygon(WorldPolygon::from_rect(rect));
        dispatch::collide(self.world_shape(), &other).map(|hit| hit.result)
    }

    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        let other = WorldShape::Line(WorldLine::new(start, end));
        dispatch::overlaps(self.world_shape(), &other)
    }

    /// Casts the segment `start -> end` against this collider and reports the first hit.
    pub fn collides_with_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        dispatch::cast_segment(&WorldLine::new(start, end), self.world_shape())
    }

    /// Strict: a point on the boundary of an area shape is touching, not overlapping.
    pub fn overlaps_point(&self, point: Vec2) -> bool {
        dispatch::overlaps(self.world_shape(), &WorldShape::Point(point))
    }

    pub fn collides_with_point(&self, point: Vec2) -> Option<CollisionResult> {
        dispatch::collide(self.world_shape(), &WorldShape::Point(point)).map(|hit| hit.result)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        dispatch::contains_point(self.world_shape(), point)
    }
}

fn validate_scale(scale: f64) -> Result<()> {
    if !scale.is_finite() || scale <= Transform::MIN_SCALE {
        return Err(CollisionError::invalid(format!(
            "scale must be greater than {}, got {scale}",
            Transform::MIN_SCALE
        )));
    }
    Ok(())
}
