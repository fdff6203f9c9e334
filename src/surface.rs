use rand::Rng;

use crate::aabb::Aabb;
use crate::geometry::{face_normal, to_radians, Fp, Hit, Ray, Vec3f, FP_INF, FP_NEG_INF};
use crate::material::Material;

/// The capability seam every concrete surface (and the BVH wrapping them)
/// implements: nearest-hit query within a t window, plus world-space bounds.
pub trait Hittable {
    fn hit(&self, ray: &Ray, t_min: Fp, t_max: Fp) -> Option<Hit<'_>>;
    fn bounding(&self) -> Option<Aabb>;
}

#[derive(Clone, Debug)]
pub enum Surface {
    Sphere {
        origin: Vec3f,
        radius: Fp,
        material: Material,
    },
    RectXy {
        x0: Fp,
        x1: Fp,
        y0: Fp,
        y1: Fp,
        z: Fp,
        material: Material,
    },
    RectXz {
        x0: Fp,
        x1: Fp,
        z0: Fp,
        z1: Fp,
        y: Fp,
        material: Material,
    },
    RectYz {
        y0: Fp,
        y1: Fp,
        z0: Fp,
        z1: Fp,
        x: Fp,
        material: Material,
    },
    Box {
        min: Vec3f,
        max: Vec3f,
        rotation: Fp,
        sin_theta: Fp,
        cos_theta: Fp,
        sides: Vec<Surface>,
    },
}

impl Surface {
    pub fn sphere(origin: Vec3f, radius: Fp, material: Material) -> Surface {
        Surface::Sphere {
            origin,
            radius,
            material,
        }
    }

    // the rect constructors accept their corner pairs in either order
    pub fn rect_xy(x0: Fp, x1: Fp, y0: Fp, y1: Fp, z: Fp, material: Material) -> Surface {
        Surface::RectXy {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
            z,
            material,
        }
    }

    pub fn rect_xz(x0: Fp, x1: Fp, z0: Fp, z1: Fp, y: Fp, material: Material) -> Surface {
        Surface::RectXz {
            x0: x0.min(x1),
            x1: x0.max(x1),
            z0: z0.min(z1),
            z1: z0.max(z1),
            y,
            material,
        }
    }

    pub fn rect_yz(y0: Fp, y1: Fp, z0: Fp, z1: Fp, x: Fp, material: Material) -> Surface {
        Surface::RectYz {
            y0: y0.min(y1),
            y1: y0.max(y1),
            z0: z0.min(z1),
            z1: z0.max(z1),
            x,
            material,
        }
    }

    // a box is six axis-aligned rectangle sides sharing one material, with
    // an optional rotation about the Y axis through the box centre
    pub fn rotated_box(p0: Vec3f, p1: Vec3f, y_rotation: Fp, material: Material) -> Surface {
        let min = p0.inf(&p1);
        let max = p0.sup(&p1);
        let radians = to_radians(y_rotation);
        let sides = vec![
            Surface::rect_xy(min.x, max.x, min.y, max.y, max.z, material.clone()),
            Surface::rect_xy(min.x, max.x, min.y, max.y, min.z, material.clone()),
            Surface::rect_xz(min.x, max.x, min.z, max.z, max.y, material.clone()),
            Surface::rect_xz(min.x, max.x, min.z, max.z, min.y, material.clone()),
            Surface::rect_yz(min.y, max.y, min.z, max.z, max.x, material.clone()),
            Surface::rect_yz(min.y, max.y, min.z, max.z, min.x, material),
        ];
        Surface::Box {
            min,
            max,
            rotation: y_rotation,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            sides,
        }
    }

    // geometric centre, used to order surfaces during BVH construction
    pub fn origin(&self) -> Vec3f {
        match self {
            Surface::Sphere { origin, .. } => *origin,
            Surface::RectXy { x0, x1, y0, y1, z, .. } => {
                Vec3f::new((x0 + x1) / 2.0, (y0 + y1) / 2.0, *z)
            }
            Surface::RectXz { x0, x1, z0, z1, y, .. } => {
                Vec3f::new((x0 + x1) / 2.0, *y, (z0 + z1) / 2.0)
            }
            Surface::RectYz { y0, y1, z0, z1, x, .. } => {
                Vec3f::new(*x, (y0 + y1) / 2.0, (z0 + z1) / 2.0)
            }
            Surface::Box { min, max, .. } => (min + max) / 2.0,
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Surface::Sphere { material, .. } => material,
            Surface::RectXy { material, .. } => material,
            Surface::RectXz { material, .. } => material,
            Surface::RectYz { material, .. } => material,
            // all six sides share one material
            Surface::Box { sides, .. } => sides[0].material(),
        }
    }

    // footprint used as the denominator scale in the light-sampling pdf:
    // the sphere's radius, or the rectangle's area
    pub fn light_radius(&self) -> Fp {
        match self {
            Surface::Sphere { radius, .. } => *radius,
            Surface::RectXy { x0, x1, y0, y1, .. } => (x1 - x0) * (y1 - y0),
            Surface::RectXz { x0, x1, z0, z1, .. } => (x1 - x0) * (z1 - z0),
            Surface::RectYz { y0, y1, z0, z1, .. } => (y1 - y0) * (z1 - z0),
            Surface::Box { min, max, .. } => {
                let d = max - min;
                2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
            }
        }
    }

    // uniformly sampled point on the surface, for next-event estimation
    pub fn sample_point(&self, rng: &mut impl Rng) -> Vec3f {
        match self {
            Surface::Sphere { origin, radius, .. } => {
                origin + crate::sampling::random_unit_vector(rng) * *radius
            }
            // interpolation form rather than gen_range: a zero-extent axis
            // is an empty range, which gen_range refuses to sample
            Surface::RectXy { x0, x1, y0, y1, z, .. } => Vec3f::new(
                x0 + rng.gen::<Fp>() * (x1 - x0),
                y0 + rng.gen::<Fp>() * (y1 - y0),
                *z,
            ),
            Surface::RectXz { x0, x1, z0, z1, y, .. } => Vec3f::new(
                x0 + rng.gen::<Fp>() * (x1 - x0),
                *y,
                z0 + rng.gen::<Fp>() * (z1 - z0),
            ),
            Surface::RectYz { y0, y1, z0, z1, x, .. } => Vec3f::new(
                *x,
                y0 + rng.gen::<Fp>() * (y1 - y0),
                z0 + rng.gen::<Fp>() * (z1 - z0),
            ),
            Surface::Box { sides, .. } => {
                let side = rng.gen_range(0..sides.len());
                sides[side].sample_point(rng)
            }
        }
    }
}

impl Hittable for Surface {
    fn hit(&self, ray: &Ray, t_min: Fp, t_max: Fp) -> Option<Hit<'_>> {
        match self {
            Surface::Sphere {
                origin,
                radius,
                material,
            } => hit_sphere(ray, t_min, t_max, origin, *radius, material),
            Surface::RectXy {
                x0,
                x1,
                y0,
                y1,
                z,
                material,
            } => {
                let t = (z - ray.origin.z) * axis_recip(ray, 2)?;
                if !(t_min..=t_max).contains(&t) {
                    return None;
                }
                let x = ray.origin.x + t * ray.direction.x;
                let y = ray.origin.y + t * ray.direction.y;
                if x < *x0 || x > *x1 || y < *y0 || y > *y1 {
                    return None;
                }
                let (normal, front_face) = face_normal(ray, Vec3f::new(0.0, 0.0, 1.0));
                Some(Hit {
                    t,
                    point: ray.at(t),
                    normal,
                    front_face,
                    material,
                    u: (x - x0) / (x1 - x0),
                    v: (y - y0) / (y1 - y0),
                })
            }
            Surface::RectXz {
                x0,
                x1,
                z0,
                z1,
                y,
                material,
            } => {
                let t = (y - ray.origin.y) * axis_recip(ray, 1)?;
                if !(t_min..=t_max).contains(&t) {
                    return None;
                }
                let x = ray.origin.x + t * ray.direction.x;
                let z = ray.origin.z + t * ray.direction.z;
                if x < *x0 || x > *x1 || z < *z0 || z > *z1 {
                    return None;
                }
                let (normal, front_face) = face_normal(ray, Vec3f::new(0.0, 1.0, 0.0));
                Some(Hit {
                    t,
                    point: ray.at(t),
                    normal,
                    front_face,
                    material,
                    u: (x - x0) / (x1 - x0),
                    v: (z - z0) / (z1 - z0),
                })
            }
            Surface::RectYz {
                y0,
                y1,
                z0,
                z1,
                x,
                material,
            } => {
                let t = (x - ray.origin.x) * axis_recip(ray, 0)?;
                if !(t_min..=t_max).contains(&t) {
                    return None;
                }
                let z = ray.origin.z + t * ray.direction.z;
                let y = ray.origin.y + t * ray.direction.y;
                if z < *z0 || z > *z1 || y < *y0 || y > *y1 {
                    return None;
                }
                let (normal, front_face) = face_normal(ray, Vec3f::new(1.0, 0.0, 0.0));
                Some(Hit {
                    t,
                    point: ray.at(t),
                    normal,
                    front_face,
                    material,
                    u: (z - z0) / (z1 - z0),
                    v: (y - y0) / (y1 - y0),
                })
            }
            Surface::Box {
                min,
                max,
                rotation,
                sin_theta,
                cos_theta,
                sides,
            } => {
                let center = (min + max) / 2.0;
                // intersect in box-local space: rotate the ray by -rotation
                // about the box centre, then undo on the way out
                let local_ray = if *rotation == 0.0 {
                    ray.clone()
                } else {
                    Ray::new(
                        center + rotate_y(&(ray.origin - center), *sin_theta, *cos_theta),
                        rotate_y(&ray.direction, *sin_theta, *cos_theta),
                    )
                };
                let mut t_max = t_max;
                let mut nearest = None;
                for side in sides {
                    if let Some(hit) = side.hit(&local_ray, t_min, t_max) {
                        t_max = hit.t;
                        nearest = Some(hit);
                    }
                }
                let mut hit = nearest?;
                if *rotation != 0.0 {
                    hit.point = center + rotate_y(&(hit.point - center), -sin_theta, *cos_theta);
                    hit.normal = rotate_y(&hit.normal, -sin_theta, *cos_theta);
                }
                Some(hit)
            }
        }
    }

    fn bounding(&self) -> Option<Aabb> {
        match self {
            Surface::Sphere { origin, radius, .. } => {
                let extent = Vec3f::new(*radius, *radius, *radius);
                Some(Aabb::new(origin - extent, origin + extent))
            }
            Surface::RectXy { x0, x1, y0, y1, z, .. } => Some(Aabb::new(
                Vec3f::new(*x0, *y0, *z),
                Vec3f::new(*x1, *y1, *z),
            )),
            Surface::RectXz { x0, x1, z0, z1, y, .. } => Some(Aabb::new(
                Vec3f::new(*x0, *y, *z0),
                Vec3f::new(*x1, *y, *z1),
            )),
            Surface::RectYz { y0, y1, z0, z1, x, .. } => Some(Aabb::new(
                Vec3f::new(*x, *y0, *z0),
                Vec3f::new(*x, *y1, *z1),
            )),
            Surface::Box {
                min,
                max,
                sin_theta,
                cos_theta,
                ..
            } => {
                let center = (min + max) / 2.0;
                let mut lo = Vec3f::new(FP_INF, FP_INF, FP_INF);
                let mut hi = Vec3f::new(FP_NEG_INF, FP_NEG_INF, FP_NEG_INF);
                // rotate all eight corners about the box centre and rebound
                for i in 0..2 {
                    for j in 0..2 {
                        for k in 0..2 {
                            let corner = Vec3f::new(
                                if i == 0 { min.x } else { max.x },
                                if j == 0 { min.y } else { max.y },
                                if k == 0 { min.z } else { max.z },
                            );
                            let rotated =
                                center + rotate_y(&(corner - center), -sin_theta, *cos_theta);
                            lo = lo.inf(&rotated);
                            hi = hi.sup(&rotated);
                        }
                    }
                }
                Some(Aabb::new(lo, hi))
            }
        }
    }
}

// reciprocal of one direction component, with the 0/0 plane-parallel case
// reported as no-hit rather than a NaN leaking into range tests
fn axis_recip(ray: &Ray, axis: usize) -> Option<Fp> {
    let d = ray.direction[axis];
    if d == 0.0 {
        None
    } else {
        Some(1.0 / d)
    }
}

// rotation in the XZ plane; negate sin_theta to invert
fn rotate_y(v: &Vec3f, sin_theta: Fp, cos_theta: Fp) -> Vec3f {
    Vec3f::new(
        cos_theta * v.x - sin_theta * v.z,
        v.y,
        sin_theta * v.x + cos_theta * v.z,
    )
}

fn hit_sphere<'a>(
    ray: &Ray,
    t_min: Fp,
    t_max: Fp,
    origin: &Vec3f,
    radius: Fp,
    material: &'a Material,
) -> Option<Hit<'a>> {
    let offset = ray.origin - origin;
    let a = ray.direction.norm_squared();
    let half_b = offset.dot(&ray.direction);
    let c = offset.norm_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();

    // nearest root within the t window, or the far one if the near root
    // falls outside it
    let mut root = (-half_b - sqrt_disc) / a;
    if root < t_min || root > t_max {
        root = (-half_b + sqrt_disc) / a;
        if root < t_min || root > t_max {
            return None;
        }
    }

    let point = ray.at(root);
    let outward_normal = (point - origin) / radius;
    let (normal, front_face) = face_normal(ray, outward_normal);

    let (mut u, mut v) = (0.0, 0.0);
    if material.needs_uv() {
        let pi = std::f64::consts::PI;
        let theta = Fp::acos((-outward_normal.y).clamp(-1.0, 1.0));
        let phi = Fp::atan2(-outward_normal.z, outward_normal.x) + pi;
        u = phi / (2.0 * pi);
        v = theta / pi;
    }

    Some(Hit {
        t: root,
        point,
        normal,
        front_face,
        material,
        u,
        v,
    })
}
