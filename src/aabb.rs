use crate::geometry::{Fp, Ray, Vec3f, EPS, FP_INF, FP_NEG_INF};

#[derive(Clone, Debug)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb {
            min: Vec3f::new(FP_INF, FP_INF, FP_INF),
            max: Vec3f::new(FP_NEG_INF, FP_NEG_INF, FP_NEG_INF),
        }
    }
}

impl Aabb {
    // normalizes corner ordering and pads any zero-thickness axis, so a slab
    // test against a flat rectangle's box never degenerates to always-false
    pub fn new(a: Vec3f, b: Vec3f) -> Aabb {
        let mut min = a.inf(&b);
        let mut max = a.sup(&b);
        for axis in 0..3 {
            if max[axis] - min[axis] < EPS {
                min[axis] -= 0.001;
                max[axis] += 0.001;
            }
        }
        Aabb { min, max }
    }

    // slab test restricted to the caller's [t_min, t_max] window. An
    // inv_direction component of 0 is the axis-parallel sentinel: the ray
    // never enters or leaves that slab, so it hits only if the origin
    // already lies inside it.
    pub fn hit(&self, ray: &Ray, t_min: Fp, t_max: Fp) -> bool {
        let mut lo = t_min;
        let mut hi = t_max;
        for axis in 0..3 {
            let inv = ray.inv_direction[axis];
            if inv == 0.0 {
                if ray.origin[axis] < self.min[axis] || ray.origin[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }
            let t1 = (self.min[axis] - ray.origin[axis]) * inv;
            let t2 = (self.max[axis] - ray.origin[axis]) * inv;
            lo = Fp::max(lo, Fp::min(t1, t2));
            hi = Fp::min(hi, Fp::max(t1, t2));
        }
        if hi < 0.0 {
            return false;
        }
        lo <= hi
    }

    pub fn surrounding(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn contains_point(&self, point: &Vec3f) -> bool {
        for axis in 0..3 {
            if point[axis] < self.min[axis] - EPS || point[axis] > self.max[axis] + EPS {
                return false;
            }
        }
        true
    }
}
