use std::sync::Arc;

use rand::Rng;

use crate::bvh::BvhTree;
use crate::geometry::{
    clamp_vector, mix_colours, reflect, reflectance, refract, Fp, Hit, Ray, Vec3f, FP_INF,
    SHADOW_ACNE_EPS,
};
use crate::material::MaterialKind;
use crate::sampling::{lambertian_direction, light_pdf, perturb_normal};
use crate::surface::{Hittable, Surface};
use crate::texture::ImageTexture;

// generous, non-physical radiance ceiling that keeps pdf-divided samples
// from blowing out single pixels while still allowing HDR emission
static MAX_RADIANCE: Fp = 4880.0;

// Schlick ratio used for the clear-coat and non-metal Fresnel lobes
static DIELECTRIC_RATIO: Fp = 1.0 / 1.5;

/// Colour returned when a ray escapes the scene.
#[derive(Clone, Debug)]
pub enum Sky {
    Gradient { top: Vec3f, bottom: Vec3f },
    Flat(Vec3f),
    Skybox(Arc<ImageTexture>),
}

impl Sky {
    pub fn colour(&self, direction: &Vec3f) -> Vec3f {
        match self {
            Sky::Gradient { top, bottom } => {
                let t = 0.5 * (direction.y + 1.0);
                bottom + (top - bottom) * t
            }
            Sky::Flat(colour) => *colour,
            Sky::Skybox(texture) => {
                let pi = std::f64::consts::PI;
                let theta = Fp::acos((-direction.y).clamp(-1.0, 1.0));
                let phi = Fp::atan2(-direction.z, direction.x) + pi;
                texture.get_pixel(phi / (2.0 * pi), theta / pi)
            }
        }
    }
}

// material parameters after texture resolution at the hit point
struct ShadingPoint {
    albedo: Vec3f,
    roughness: Fp,
    metalness: Fp,
    normal: Vec3f,
}

/// Recursive light-transport estimator: returns a single radiance sample
/// for the given ray. The caller owns accumulation and display mapping.
pub fn intersect_world<R: Rng>(
    ray: &Ray,
    world: &BvhTree,
    t_min: Fp,
    t_max: Fp,
    depth: i32,
    lights: &[Surface],
    sky: &Sky,
    rng: &mut R,
) -> Vec3f {
    // out of bounces: the path is absorbed
    if depth < 1 {
        return Vec3f::zeros();
    }
    let hit = match world.hit(ray, t_min, t_max) {
        Some(hit) => hit,
        None => return sky.colour(&ray.direction),
    };
    let point = resolve_shading_point(&hit);

    match &hit.material.kind {
        MaterialKind::Diffuse => {
            let (incoming, pdf) = diffuse_bounce(&hit, &point.normal, world, depth, lights, sky, rng);
            clamp_vector(
                &(mix_colours(&point.albedo, &(incoming * 0.5)) / pdf),
                0.0,
                MAX_RADIANCE,
            )
        }
        MaterialKind::Reflective { roughness } => {
            let normal = perturb_normal(&point.normal, *roughness, rng);
            let scattered = Ray::new(hit.point, reflect(&ray.direction, &normal));
            // an ideal mirror loses no energy, so no 0.5 attenuation here
            let incoming = intersect_world(
                &scattered,
                world,
                SHADOW_ACNE_EPS,
                FP_INF,
                depth - 1,
                lights,
                sky,
                rng,
            );
            mix_colours(&point.albedo, &incoming)
        }
        MaterialKind::Emissive { brightness } => point.albedo * *brightness,
        MaterialKind::Refractive { roughness, ior } => {
            let ratio = if hit.front_face { 1.0 / ior } else { *ior };
            let normal = perturb_normal(&point.normal, *roughness, rng);
            let scattered = Ray::new(
                hit.point,
                refraction_direction(&ray.direction, &normal, ratio, rng),
            );
            let incoming = intersect_world(
                &scattered,
                world,
                SHADOW_ACNE_EPS,
                FP_INF,
                depth - 1,
                lights,
                sky,
                rng,
            );
            mix_colours(&point.albedo, &incoming)
        }
        MaterialKind::Polished { roughness } => {
            let (incoming, pdf) = diffuse_bounce(&hit, &point.normal, world, depth, lights, sky, rng);
            let mut colour = mix_colours(&point.albedo, &(incoming * 0.5));
            let cos_theta = Fp::min((-ray.direction).dot(&point.normal), 1.0);
            if reflectance(cos_theta, DIELECTRIC_RATIO) > rng.gen() {
                let normal = perturb_normal(&point.normal, *roughness, rng);
                let scattered = Ray::new(hit.point, reflect(&ray.direction, &normal));
                colour += intersect_world(
                    &scattered,
                    world,
                    SHADOW_ACNE_EPS,
                    FP_INF,
                    depth - 1,
                    lights,
                    sky,
                    rng,
                );
            }
            clamp_vector(&(colour / pdf), 0.0, MAX_RADIANCE)
        }
        MaterialKind::Pbr { .. } => {
            let normal = perturb_normal(&point.normal, point.roughness, rng);
            let scattered = Ray::new(hit.point, reflect(&ray.direction, &normal));
            let reflection = intersect_world(
                &scattered,
                world,
                SHADOW_ACNE_EPS,
                FP_INF,
                depth - 1,
                lights,
                sky,
                rng,
            );
            let (incoming, pdf) = diffuse_bounce(&hit, &point.normal, world, depth, lights, sky, rng);
            let diffuse = clamp_vector(
                &(mix_colours(&point.albedo, &(incoming * 0.5)) / pdf),
                0.0,
                MAX_RADIANCE,
            );
            // metal lobe is tinted by the albedo, dielectric lobe is not
            let mut colour = diffuse * (1.0 - point.metalness)
                + mix_colours(&point.albedo, &reflection) * point.metalness;
            let cos_theta = Fp::min((-ray.direction).dot(&point.normal), 1.0);
            if reflectance(cos_theta, DIELECTRIC_RATIO) > rng.gen() {
                colour += reflection * (1.0 - point.metalness);
            }
            clamp_vector(&colour, 0.0, MAX_RADIANCE)
        }
    }
}

// picks the outgoing direction at a refractive boundary: total internal
// reflection forces the mirror branch, otherwise the Schlick term chooses
// reflect vs refract stochastically
pub fn refraction_direction<R: Rng>(
    direction: &Vec3f,
    normal: &Vec3f,
    ratio: Fp,
    rng: &mut R,
) -> Vec3f {
    let cos_theta = Fp::min((-direction).dot(normal), 1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let cannot_refract = ratio * sin_theta > 1.0;
    if cannot_refract || reflectance(cos_theta, ratio) > rng.gen() {
        reflect(direction, normal)
    } else {
        refract(direction, normal, ratio)
    }
}

// lambertian scatter with stochastic next-event estimation: half the time
// (per sample) the bounce is redirected at a random light's surface point,
// and the returned pdf unbiases that choice
fn diffuse_bounce<R: Rng>(
    hit: &Hit<'_>,
    normal: &Vec3f,
    world: &BvhTree,
    depth: i32,
    lights: &[Surface],
    sky: &Sky,
    rng: &mut R,
) -> (Vec3f, Fp) {
    let mut target = lambertian_direction(normal, rng);
    let mut pdf = 1.0;
    if !lights.is_empty() && rng.gen_bool(0.5) {
        let light = &lights[rng.gen_range(0..lights.len())];
        let light_point = light.sample_point(rng);
        let weight = light_pdf(&hit.point, normal, &light_point, light.light_radius());
        // lights behind the surface keep the ordinary lambertian target
        if weight > 0.0 {
            target = light_point - hit.point;
            pdf = weight;
        }
    }
    let scattered = Ray::new(hit.point, target);
    let incoming = intersect_world(
        &scattered,
        world,
        SHADOW_ACNE_EPS,
        FP_INF,
        depth - 1,
        lights,
        sky,
        rng,
    );
    (incoming, pdf)
}

fn resolve_shading_point(hit: &Hit<'_>) -> ShadingPoint {
    let material = hit.material;
    let u = hit.u * material.tiling_x;
    let v = hit.v * material.tiling_y;

    let mut albedo = material.colour;
    if let Some(noise) = &material.noise {
        albedo *= noise.get(u, v);
    }

    match &material.kind {
        MaterialKind::Pbr {
            roughness,
            metalness,
            diffuse_tex,
            roughness_tex,
            normal_tex,
            metal_tex,
        } => {
            if let Some(texture) = diffuse_tex {
                albedo = mix_colours(&albedo, &texture.get_pixel(u, v));
            }
            let roughness = match roughness_tex {
                Some(texture) => texture.get_pixel(u, v).x,
                None => *roughness,
            };
            let metalness = match metal_tex {
                Some(texture) => texture.get_pixel(u, v).x,
                None => *metalness,
            };
            let normal = match normal_tex {
                Some(texture) => apply_normal_map(&hit.normal, &texture.get_pixel(u, v)),
                None => hit.normal,
            };
            ShadingPoint {
                albedo,
                roughness,
                metalness,
                normal,
            }
        }
        MaterialKind::Reflective { roughness }
        | MaterialKind::Refractive { roughness, .. }
        | MaterialKind::Polished { roughness } => ShadingPoint {
            albedo,
            roughness: *roughness,
            metalness: 0.0,
            normal: hit.normal,
        },
        _ => ShadingPoint {
            albedo,
            roughness: 0.0,
            metalness: 0.0,
            normal: hit.normal,
        },
    }
}

// remaps a tangent-space normal sample through an ad-hoc orthonormal basis
// around the geometric normal
fn apply_normal_map(normal: &Vec3f, sample: &Vec3f) -> Vec3f {
    let tangent_space = sample * 2.0 - Vec3f::new(1.0, 1.0, 1.0);
    let helper = if normal.x.abs() > 0.9 {
        Vec3f::new(0.0, 1.0, 0.0)
    } else {
        Vec3f::new(1.0, 0.0, 0.0)
    };
    let tangent = normal.cross(&helper).normalize();
    let bitangent = normal.cross(&tangent);
    (tangent * tangent_space.x + bitangent * tangent_space.y + normal * tangent_space.z).normalize()
}
