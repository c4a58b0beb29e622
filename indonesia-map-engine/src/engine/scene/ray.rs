use bevy::prelude::*;

/// Ray against a box of `size` centred on `xf`'s origin and rotated with it.
///
/// Returns the distance along `dir` to the first hit in front of `origin`.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let to_local = xf.affine().inverse();
    let local_origin = to_local.transform_point3(origin);
    let local_dir = to_local.transform_vector3(dir);
    let half = size * 0.5;
    ray_aabb_hit_t(local_origin, local_dir, -half, half)
}

/// Slab-method ray/AABB intersection.
pub fn ray_aabb_hit_t(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (origin[axis], dir[axis]);
        if d == 0.0 {
            // Parallel to this slab: miss unless already between its planes.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
