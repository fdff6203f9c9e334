use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::geometry::{Fp, Vec3f};

// uniform direction on the unit sphere, via a normalized Gaussian triple
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3f {
    let normal_distr = Normal::new(0.0, 1.0).unwrap();
    Vec3f::new(
        normal_distr.sample(rng),
        normal_distr.sample(rng),
        normal_distr.sample(rng),
    )
    .normalize()
}

// rejection-sampled point strictly inside the unit sphere
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3f {
    loop {
        let p = Vec3f::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

// lambertian-ish scatter target: the oriented normal nudged by a random
// interior point; falls back to the normal itself for the degenerate case
pub fn lambertian_direction(normal: &Vec3f, rng: &mut impl Rng) -> Vec3f {
    let direction = normal + random_in_unit_sphere(rng);
    if direction.norm_squared() < 1e-12 {
        *normal
    } else {
        direction
    }
}

// perturbs a unit normal by a roughness²-scaled random offset; roughness 0
// leaves it untouched so ideal mirrors stay exact
pub fn perturb_normal(normal: &Vec3f, roughness: Fp, rng: &mut impl Rng) -> Vec3f {
    if roughness == 0.0 {
        return *normal;
    }
    (normal + random_in_unit_sphere(rng) * roughness * roughness).normalize()
}

// importance-sampling weight for aiming at a light's sampled surface point:
// squared distance over projected solid-angle-ish footprint
pub fn light_pdf(hit_point: &Vec3f, normal: &Vec3f, light_point: &Vec3f, light_radius: Fp) -> Fp {
    let to_light = light_point - hit_point;
    let distance_squared = to_light.norm_squared();
    if distance_squared < 1e-12 || light_radius <= 0.0 {
        return 0.0;
    }
    let cosine = to_light.normalize().dot(normal);
    if cosine <= 0.0 {
        return 0.0;
    }
    distance_squared / (cosine * light_radius)
}
