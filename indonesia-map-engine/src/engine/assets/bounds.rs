use bevy::math::{Affine3A, Vec3A};
use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// World-space bounding box of the loaded base map.
///
/// Inserted once the base map meshes have bounds and replaced wholesale when
/// the map reloads, so `resource_changed::<MapBounds>` is the signal to
/// re-project markers.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl MapBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Calculate center point for camera targeting.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Union of mesh-local boxes after placing each with its world transform.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn from_mesh_boxes<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Affine3A, Aabb)>,
    {
        union_of_boxes(boxes).map(|(min, max)| Self::new(min, max))
    }
}

/// Corner-wise union of transformed boxes as `(min, max)`.
pub fn union_of_boxes<I>(boxes: I) -> Option<(Vec3, Vec3)>
where
    I: IntoIterator<Item = (Affine3A, Aabb)>,
{
    let mut min = Vec3A::splat(f32::INFINITY);
    let mut max = Vec3A::splat(f32::NEG_INFINITY);
    let mut any = false;

    for (affine, aabb) in boxes {
        for corner in aabb_corners(&aabb) {
            let world = affine.transform_point3a(corner);
            min = min.min(world);
            max = max.max(world);
        }
        any = true;
    }

    any.then(|| (min.into(), max.into()))
}

fn aabb_corners(aabb: &Aabb) -> [Vec3A; 8] {
    let c = aabb.center;
    let h = aabb.half_extents;
    [
        c + Vec3A::new(-h.x, -h.y, -h.z),
        c + Vec3A::new(h.x, -h.y, -h.z),
        c + Vec3A::new(-h.x, h.y, -h.z),
        c + Vec3A::new(h.x, h.y, -h.z),
        c + Vec3A::new(-h.x, -h.y, h.z),
        c + Vec3A::new(h.x, -h.y, h.z),
        c + Vec3A::new(-h.x, h.y, h.z),
        c + Vec3A::new(h.x, h.y, h.z),
    ]
}
