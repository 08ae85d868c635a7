use glam::{UVec2, Vec2};
use rollphys_core::{Scalar, Vec3};

/// Regular grid heightfield. Heights are in world units; the grid origin is
/// world (0,0) and extends along +x/+z. Coordinates outside the grid clamp
/// to the border cells.
#[derive(Clone, Debug)]
pub struct HeightField {
    pub dims: UVec2,     // nx, nz (columns in x, rows in z)
    pub cell: Vec2,      // sx, sz (world units per cell)
    pub heights: Vec<Scalar>,
    pub min_y: Scalar,
    pub max_y: Scalar,
}

impl HeightField {
    pub fn from_heights(dims: UVec2, cell: Vec2, heights: Vec<Scalar>) -> Self {
        assert_eq!((dims.x as usize) * (dims.y as usize), heights.len());
        let (mut min_y, mut max_y) = (Scalar::INFINITY, Scalar::NEG_INFINITY);
        for &h in &heights { min_y = min_y.min(h); max_y = max_y.max(h); }
        Self { dims, cell, heights, min_y, max_y }
    }

    /// Sample a height function over the grid, world (x,z) per vertex.
    pub fn from_fn<F: Fn(Scalar, Scalar) -> Scalar>(dims: UVec2, cell: Vec2, f: F) -> Self {
        let mut heights = Vec::with_capacity((dims.x * dims.y) as usize);
        for z in 0..dims.y {
            for x in 0..dims.x {
                heights.push(f(x as Scalar * cell.x, z as Scalar * cell.y));
            }
        }
        Self::from_heights(dims, cell, heights)
    }

    #[inline] fn idx(&self, x: i32, z: i32) -> usize {
        (x as usize) + (z as usize) * (self.dims.x as usize)
    }
    #[inline] fn h(&self, x: i32, z: i32) -> Scalar { self.heights[self.idx(x, z)] }

    /// Bilinear height at world (x,z).
    pub fn sample_height(&self, x: Scalar, z: Scalar) -> Scalar {
        let nx = self.dims.x as i32; let nz = self.dims.y as i32;
        let fx = (x / self.cell.x).clamp(0.0, (nx - 1) as Scalar - 1e-5);
        let fz = (z / self.cell.y).clamp(0.0, (nz - 1) as Scalar - 1e-5);
        let x0 = fx.floor() as i32; let x1 = (x0 + 1).min(nx - 1);
        let z0 = fz.floor() as i32; let z1 = (z0 + 1).min(nz - 1);
        let tx = fx - x0 as Scalar;  let tz = fz - z0 as Scalar;

        let a = self.h(x0, z0) * (1.0 - tx) + self.h(x1, z0) * tx;
        let b = self.h(x0, z1) * (1.0 - tx) + self.h(x1, z1) * tx;
        a * (1.0 - tz) + b * tz
    }

    /// Signed clearance of a world point above the field surface.
    #[inline]
    pub fn clearance(&self, p: Vec3) -> Scalar {
        p.y - self.sample_height(p.x, p.z)
    }

    /// March a ray against the surface. `dir` unit length. Returns the hit
    /// distance, `None` past `max_dist`. An origin already at or below the
    /// surface hits at distance zero.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<Scalar> {
        if origin.y > self.max_y && dir.y >= 0.0 {
            return None;
        }
        if self.clearance(origin) <= 0.0 {
            return Some(0.0);
        }
        let step = (0.5 * self.cell.x.min(self.cell.y)).max(1.0e-3);
        let mut t_prev = 0.0;
        let mut t = step.min(max_dist);
        loop {
            if self.clearance(origin + dir * t) <= 0.0 {
                // bisect the crossing down to sub-millimetre
                let (mut lo, mut hi) = (t_prev, t);
                for _ in 0..24 {
                    let mid = 0.5 * (lo + hi);
                    if self.clearance(origin + dir * mid) <= 0.0 { hi = mid; } else { lo = mid; }
                }
                return Some(0.5 * (lo + hi));
            }
            if t >= max_dist {
                return None;
            }
            t_prev = t;
            t = (t + step).min(max_dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollphys_core::vec3;

    fn flat(y: Scalar) -> HeightField {
        HeightField::from_fn(UVec2::new(16, 16), Vec2::new(0.5, 0.5), |_, _| y)
    }

    #[test] fn straight_down_measures_clearance() {
        let hf = flat(0.0);
        let d = hf.raycast(vec3(2.0, 0.4, 2.0), vec3(0.0, -1.0, 0.0), 2.0).unwrap();
        assert!((d - 0.4).abs() < 1e-4);
    }

    #[test] fn out_of_range_misses() {
        let hf = flat(0.0);
        assert!(hf.raycast(vec3(2.0, 3.0, 2.0), vec3(0.0, -1.0, 0.0), 2.0).is_none());
        // pointing away from a surface entirely below the origin
        assert!(hf.raycast(vec3(2.0, 0.4, 2.0), vec3(0.0, 1.0, 0.0), 2.0).is_none());
    }

    #[test] fn ramp_heights_interpolate() {
        let hf = HeightField::from_fn(UVec2::new(32, 32), Vec2::new(0.25, 0.25), |_, z| 0.2 * z);
        assert!((hf.sample_height(1.0, 3.0) - 0.6).abs() < 1e-5);
        assert!((hf.sample_height(1.0, 3.1) - 0.62).abs() < 1e-5);
    }

    #[test] fn slanted_ray_hits_ramp() {
        let hf = HeightField::from_fn(UVec2::new(32, 32), Vec2::new(0.25, 0.25), |_, z| 0.2 * z);
        let origin = vec3(2.0, 1.0, 2.0);
        let dir = vec3(0.0, -2.0, 1.0).normalize();
        let d = hf.raycast(origin, dir, 2.0).unwrap();
        // analytic intersection with y = 0.2 z
        assert!((d - 0.60984).abs() < 1e-3);
    }
}
