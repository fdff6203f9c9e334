use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::aabb::Aabb;
use crate::bvh::create_bvh_tree;
use crate::camera::Camera;
use crate::geometry::{reflect, refract, Fp, Ray, Vec3f, FP_INF};
use crate::integrator::{intersect_world, refraction_direction, Sky};
use crate::material::{Material, MaterialKind};
use crate::sampling::{light_pdf, random_unit_vector};
use crate::scene::parse_file_content;
use crate::surface::{Hittable, Surface};
use crate::texture::{ImageTexture, Perlin};

static TEST_EPS: Fp = 1e-9;

fn test_rng() -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(0xdeadbeef)
}

fn white_diffuse() -> Material {
    Material::diffuse(Vec3f::new(1.0, 1.0, 1.0))
}

fn black_sky() -> Sky {
    Sky::Flat(Vec3f::zeros())
}

#[test]
fn sphere_hit_round_trip() {
    // aiming at the centre from distance d must enter at t = d - r with a
    // unit normal opposing the ray
    let sphere = Surface::sphere(Vec3f::new(0.0, 0.0, -60.0), 20.0, white_diffuse());
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    let hit = sphere.hit(&ray, 0.0, FP_INF).unwrap();
    assert!((hit.t - 40.0).abs() < TEST_EPS);
    assert!((hit.point - Vec3f::new(0.0, 0.0, -40.0)).norm() < TEST_EPS);
    assert!((hit.normal - Vec3f::new(0.0, 0.0, 1.0)).norm() < TEST_EPS);
    assert!((hit.normal.norm() - 1.0).abs() < TEST_EPS);
    assert!((hit.normal + ray.direction).norm() < TEST_EPS);
    assert!(hit.front_face);
}

#[test]
fn sphere_hit_from_inside_takes_far_root() {
    let sphere = Surface::sphere(Vec3f::zeros(), 5.0, white_diffuse());
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(1.0, 0.0, 0.0));
    let hit = sphere.hit(&ray, 0.001, FP_INF).unwrap();
    assert!((hit.t - 5.0).abs() < TEST_EPS);
    // inside hit: the oriented normal opposes the ray, geometric one did not
    assert!(!hit.front_face);
    assert!(hit.normal.dot(&ray.direction) < 0.0);
}

#[test]
fn rect_hit_center_uv() {
    let rect = Surface::rect_xy(-2.0, 2.0, -1.0, 1.0, -5.0, white_diffuse());
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    let hit = rect.hit(&ray, 0.0, FP_INF).unwrap();
    assert!((hit.t - 5.0).abs() < TEST_EPS);
    assert!((hit.u - 0.5).abs() < TEST_EPS);
    assert!((hit.v - 0.5).abs() < TEST_EPS);
    assert!((hit.normal - Vec3f::new(0.0, 0.0, 1.0)).norm() < TEST_EPS);
}

#[test]
fn rect_parallel_ray_never_hits() {
    let rect = Surface::rect_xy(-2.0, 2.0, -1.0, 1.0, -5.0, white_diffuse());
    // in-plane ray: the 0/0 division case must be a clean miss
    let in_plane = Ray::new(Vec3f::new(0.0, 0.0, -5.0), Vec3f::new(1.0, 0.0, 0.0));
    assert!(rect.hit(&in_plane, 0.0, FP_INF).is_none());
    // off-plane parallel ray misses through the ±inf t
    let off_plane = Ray::new(Vec3f::zeros(), Vec3f::new(1.0, 0.0, 0.0));
    assert!(rect.hit(&off_plane, 0.0, FP_INF).is_none());
}

#[test]
fn axis_aligned_box_hit() {
    let cube = Surface::rotated_box(
        Vec3f::new(-1.0, -1.0, -1.0),
        Vec3f::new(1.0, 1.0, 1.0),
        0.0,
        white_diffuse(),
    );
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 10.0), Vec3f::new(0.0, 0.0, -1.0));
    let hit = cube.hit(&ray, 0.0, FP_INF).unwrap();
    assert!((hit.t - 9.0).abs() < TEST_EPS);
    assert!((hit.normal - Vec3f::new(0.0, 0.0, 1.0)).norm() < TEST_EPS);
}

#[test]
fn rotated_box_hit_stays_in_bounds() {
    let cube = Surface::rotated_box(
        Vec3f::new(-1.0, -1.0, -1.0),
        Vec3f::new(1.0, 1.0, 1.0),
        30.0,
        white_diffuse(),
    );
    let bounds = cube.bounding().unwrap();
    let ray = Ray::new(Vec3f::new(0.1, 0.2, 10.0), Vec3f::new(0.0, 0.0, -1.0));
    let hit = cube.hit(&ray, 0.0, FP_INF).unwrap();
    // rotation widens the slab in x/z, never past the corner diagonal
    assert!(hit.t < 10.0 - 1.0 + TEST_EPS);
    assert!(hit.t > 10.0 - 2.0f64.sqrt() - TEST_EPS);
    assert!(bounds.contains_point(&hit.point));
    assert!(hit.normal.dot(&ray.direction) < 0.0);
    assert!((hit.normal.norm() - 1.0).abs() < 1e-6);
}

#[test]
fn hit_points_stay_inside_own_bounding_box() {
    let mut rng = test_rng();
    let surfaces = vec![
        Surface::sphere(Vec3f::new(3.0, -2.0, -20.0), 4.0, white_diffuse()),
        Surface::rect_xz(-10.0, 10.0, -30.0, -10.0, -5.0, white_diffuse()),
        Surface::rotated_box(
            Vec3f::new(-4.0, -4.0, -25.0),
            Vec3f::new(2.0, 1.0, -15.0),
            55.0,
            white_diffuse(),
        ),
    ];
    for surface in &surfaces {
        let bounds = surface.bounding().unwrap();
        for _ in 0..500 {
            let origin = Vec3f::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(5.0..15.0),
            );
            let target = Vec3f::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-28.0..-12.0),
            );
            let ray = Ray::new(origin, target - origin);
            if let Some(hit) = surface.hit(&ray, 0.0, FP_INF) {
                assert!(bounds.contains_point(&hit.point));
            }
        }
    }
}

#[test]
fn normal_always_opposes_incoming_ray() {
    let mut rng = test_rng();
    let sphere = Surface::sphere(Vec3f::new(0.0, 0.0, -20.0), 6.0, white_diffuse());
    for _ in 0..1000 {
        let origin = Vec3f::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-40.0..5.0),
        );
        let ray = Ray::new(origin, random_unit_vector(&mut rng));
        if let Some(hit) = sphere.hit(&ray, 0.001, FP_INF) {
            assert!(hit.normal.dot(&ray.direction) < 0.0);
            // front_face reports whether the geometric normal already agreed
            let outward = (hit.point - Vec3f::new(0.0, 0.0, -20.0)).normalize();
            assert_eq!(hit.front_face, outward.dot(&ray.direction) < 0.0);
        }
    }
}

#[test]
fn aabb_slab_test() {
    let bounds = Aabb::new(Vec3f::zeros(), Vec3f::new(1.0, 1.0, 1.0));
    let toward = Ray::new(Vec3f::new(-5.0, 0.5, 0.5), Vec3f::new(1.0, 0.0, 0.0));
    assert!(bounds.hit(&toward, 0.0, FP_INF));
    // caller-supplied window must be honoured: the box starts at t = 4
    assert!(!bounds.hit(&toward, 0.0, 1.0));
    let away = Ray::new(Vec3f::new(-5.0, 0.5, 0.5), Vec3f::new(-1.0, 0.0, 0.0));
    assert!(!bounds.hit(&away, 0.0, FP_INF));
    // parallel to the y and z slabs with the origin above the box: the 0
    // reciprocal sentinel must reject, not skip the axis
    let miss = Ray::new(Vec3f::new(-5.0, 3.0, 0.5), Vec3f::new(1.0, 0.0, 0.0));
    assert!(!bounds.hit(&miss, 0.0, FP_INF));
    let miss_z = Ray::new(Vec3f::new(0.5, 0.5, 4.0), Vec3f::new(0.0, 1.0, 0.0));
    assert!(!bounds.hit(&miss_z, 0.0, FP_INF));
    // axis-parallel ray with the origin inside the slab still hits
    let parallel = Ray::new(Vec3f::new(0.5, 0.5, -5.0), Vec3f::new(0.0, 0.0, 1.0));
    assert!(bounds.hit(&parallel, 0.0, FP_INF));
}

#[test]
fn aabb_surrounding_merges_component_wise() {
    let a = Aabb::new(Vec3f::new(-1.0, 0.0, 2.0), Vec3f::new(1.0, 3.0, 4.0));
    let b = Aabb::new(Vec3f::new(0.0, -2.0, 3.0), Vec3f::new(2.0, 1.0, 5.0));
    let merged = a.surrounding(&b);
    assert!((merged.min - Vec3f::new(-1.0, -2.0, 2.0)).norm() < 0.01);
    assert!((merged.max - Vec3f::new(2.0, 3.0, 5.0)).norm() < 0.01);
}

#[test]
fn degenerate_rect_bounds_are_padded() {
    let rect = Surface::rect_xy(-2.0, 2.0, -1.0, 1.0, -5.0, white_diffuse());
    let bounds = rect.bounding().unwrap();
    assert!(bounds.max.z > bounds.min.z);
    // a ray toward the rectangle face must still pass the slab test
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    assert!(bounds.hit(&ray, 0.0, FP_INF));
}

fn brute_force_hit<'a>(
    surfaces: &'a [Surface],
    ray: &Ray,
    t_min: Fp,
    t_max: Fp,
) -> Option<crate::geometry::Hit<'a>> {
    let mut nearest = None;
    let mut closest = t_max;
    for surface in surfaces {
        if let Some(hit) = surface.hit(ray, t_min, closest) {
            closest = hit.t;
            nearest = Some(hit);
        }
    }
    nearest
}

#[test]
fn bvh_matches_brute_force() {
    let mut rng = test_rng();
    let mut surfaces = vec![];
    for _ in 0..30 {
        surfaces.push(Surface::sphere(
            Vec3f::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            ),
            rng.gen_range(1.0..8.0),
            white_diffuse(),
        ));
    }
    let tree = create_bvh_tree(surfaces);
    for _ in 0..500 {
        let origin = Vec3f::new(
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
        );
        let ray = Ray::new(origin, random_unit_vector(&mut rng));
        let bvh_hit = tree.hit(&ray, 0.001, FP_INF);
        let brute_hit = brute_force_hit(tree.surfaces(), &ray, 0.001, FP_INF);
        match (&bvh_hit, &brute_hit) {
            (Some(a), Some(b)) => assert!((a.t - b.t).abs() < TEST_EPS),
            (None, None) => {}
            _ => panic!("BVH and brute force disagree on whether the ray hit"),
        }
    }
}

#[test]
fn bvh_five_disjoint_spheres() {
    let mut surfaces = vec![];
    for i in 0..5 {
        let x = -40.0 + 20.0 * i as Fp;
        surfaces.push(Surface::sphere(Vec3f::new(x, 0.0, 0.0), 5.0, white_diffuse()));
    }
    let tree = create_bvh_tree(surfaces);
    // this ray can only intersect the sphere at x = 20
    let ray = Ray::new(Vec3f::new(20.0, 0.0, 50.0), Vec3f::new(0.0, 0.0, -1.0));
    let hit = tree.hit(&ray, 0.0, FP_INF).unwrap();
    assert!((hit.t - 45.0).abs() < TEST_EPS);
    assert!((hit.point - Vec3f::new(20.0, 0.0, 5.0)).norm() < TEST_EPS);
    let brute_hit = brute_force_hit(tree.surfaces(), &ray, 0.0, FP_INF).unwrap();
    assert!((hit.t - brute_hit.t).abs() < TEST_EPS);
}

#[test]
fn empty_bvh_never_hits() {
    let tree = create_bvh_tree(vec![]);
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    assert!(tree.hit(&ray, 0.0, FP_INF).is_none());
    assert!(tree.bounding().is_none());
}

#[test]
fn mirror_reflection_law() {
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    let incident = Vec3f::new(1.0, 0.0, -1.0).normalize();
    let reflected = reflect(&incident, &normal);
    // equal angles on both sides of the normal
    assert!(((-incident).dot(&normal) - reflected.dot(&normal)).abs() < TEST_EPS);
    // reflected direction stays in the incident/normal plane
    assert!(reflected.dot(&incident.cross(&normal)).abs() < TEST_EPS);
    assert!((reflected - Vec3f::new(1.0, 0.0, 1.0).normalize()).norm() < TEST_EPS);
}

#[test]
fn refraction_follows_snell() {
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    let incident = Vec3f::new(1.0, 0.0, -1.0).normalize();
    let ratio = 1.0 / 1.52;
    let refracted = refract(&incident, &normal, ratio);
    let sin_incident = incident.cross(&normal).norm();
    let sin_refracted = refracted.normalize().cross(&normal).norm();
    assert!((sin_refracted - ratio * sin_incident).abs() < 1e-6);
}

#[test]
fn total_internal_reflection_always_mirrors() {
    // grazing exit from inside glass (ior 1.52): ratio * sin > 1, so every
    // stochastic draw must take the mirror branch
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    let sin_theta: Fp = 0.9;
    let incident = Vec3f::new(sin_theta, 0.0, -(1.0 - sin_theta * sin_theta).sqrt());
    let ratio = 1.52;
    assert!(ratio * sin_theta > 1.0);
    let mut rng = test_rng();
    for _ in 0..100 {
        let out = refraction_direction(&incident, &normal, ratio, &mut rng);
        assert!((out - reflect(&incident, &normal)).norm() < TEST_EPS);
        assert!(((-incident).dot(&normal) - out.dot(&normal)).abs() < TEST_EPS);
    }
}

#[test]
fn depth_exhaustion_returns_black() {
    let tree = create_bvh_tree(vec![Surface::sphere(
        Vec3f::new(0.0, 0.0, -10.0),
        3.0,
        white_diffuse(),
    )]);
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    let mut rng = test_rng();
    let colour = intersect_world(&ray, &tree, 0.0, FP_INF, 0, &[], &black_sky(), &mut rng);
    assert_eq!(colour, Vec3f::zeros());
}

#[test]
fn miss_returns_sky_term() {
    let tree = create_bvh_tree(vec![]);
    let sky = Sky::Gradient {
        top: Vec3f::new(0.5, 0.7, 1.0),
        bottom: Vec3f::new(1.0, 1.0, 1.0),
    };
    let mut rng = test_rng();
    let up = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 1.0, 0.0));
    let colour = intersect_world(&up, &tree, 0.0, FP_INF, 5, &[], &sky, &mut rng);
    assert!((colour - Vec3f::new(0.5, 0.7, 1.0)).norm() < TEST_EPS);
    let down = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, -1.0, 0.0));
    let colour = intersect_world(&down, &tree, 0.0, FP_INF, 5, &[], &sky, &mut rng);
    assert!((colour - Vec3f::new(1.0, 1.0, 1.0)).norm() < TEST_EPS);
}

#[test]
fn sky_terms_are_non_negative() {
    let sky = Sky::Gradient {
        top: Vec3f::new(0.5, 0.7, 1.0),
        bottom: Vec3f::new(1.0, 1.0, 1.0),
    };
    let mut rng = test_rng();
    for _ in 0..1000 {
        let colour = sky.colour(&random_unit_vector(&mut rng));
        assert!(colour.x >= 0.0 && colour.y >= 0.0 && colour.z >= 0.0);
    }
}

#[test]
fn emissive_hit_is_terminal() {
    let tree = create_bvh_tree(vec![Surface::sphere(
        Vec3f::new(0.0, 0.0, -10.0),
        3.0,
        Material::emissive(Vec3f::new(1.0, 0.8, 0.6), 5.0),
    )]);
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
    let mut rng = test_rng();
    let colour = intersect_world(&ray, &tree, 0.0, FP_INF, 4, &[], &black_sky(), &mut rng);
    assert!((colour - Vec3f::new(5.0, 4.0, 3.0)).norm() < TEST_EPS);
}

#[test]
fn integrator_output_is_bounded() {
    // closed box with a bright light and every stochastic material kind:
    // samples must stay within [0, 4880] on each channel
    let mut surfaces = vec![
        Surface::rect_xz(-10.0, 10.0, -10.0, 10.0, -5.0, white_diffuse()),
        Surface::rect_xz(-3.0, 3.0, -3.0, 3.0, 5.0, Material::emissive(Vec3f::new(1.0, 1.0, 1.0), 20.0)),
        Surface::sphere(Vec3f::new(-3.0, -3.0, 0.0), 1.5, Material::reflective(Vec3f::new(0.9, 0.9, 0.9), 0.1)),
        Surface::sphere(Vec3f::new(0.0, -3.0, 0.0), 1.5, Material::refractive(Vec3f::new(1.0, 1.0, 1.0), 0.0, 1.52)),
        Surface::sphere(Vec3f::new(3.0, -3.0, 0.0), 1.5, Material::polished(Vec3f::new(0.7, 0.2, 0.2), 0.05)),
        Surface::sphere(Vec3f::new(0.0, -3.0, 3.0), 1.2, Material::new(
            Vec3f::new(0.8, 0.6, 0.4),
            MaterialKind::Pbr {
                roughness: 0.3,
                metalness: 0.6,
                diffuse_tex: None,
                roughness_tex: None,
                normal_tex: None,
                metal_tex: None,
            },
        )),
    ];
    let light = surfaces[1].clone();
    surfaces.push(Surface::rotated_box(
        Vec3f::new(-1.0, -5.0, -2.0),
        Vec3f::new(1.0, -2.0, 2.0),
        25.0,
        white_diffuse(),
    ));
    let tree = create_bvh_tree(surfaces);
    let lights = vec![light];
    let sky = black_sky();
    let mut rng = test_rng();
    for _ in 0..200 {
        let origin = Vec3f::new(0.0, 0.0, 8.0);
        let target = Vec3f::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-2.0..2.0),
        );
        let ray = Ray::new(origin, target - origin);
        let colour = intersect_world(&ray, &tree, 0.0, FP_INF, 6, &lights, &sky, &mut rng);
        for channel in 0..3 {
            assert!(colour[channel] >= 0.0);
            assert!(colour[channel] <= 4880.0);
        }
    }
}

#[test]
fn pbr_metal_texture_drives_the_blend() {
    // fully metallic map with a solid green diffuse map: a mirror-smooth
    // metal shows the emissive wall behind the camera, tinted by the
    // resolved albedo and nothing else
    let metal_tex = Arc::new(ImageTexture::new(image::RgbImage::from_pixel(
        2,
        2,
        image::Rgb([255, 255, 255]),
    )));
    let diffuse_tex = Arc::new(ImageTexture::new(image::RgbImage::from_pixel(
        2,
        2,
        image::Rgb([0, 255, 0]),
    )));
    let material = Material::new(
        Vec3f::new(1.0, 1.0, 1.0),
        MaterialKind::Pbr {
            roughness: 0.0,
            metalness: 0.0,
            diffuse_tex: Some(diffuse_tex),
            roughness_tex: None,
            normal_tex: None,
            metal_tex: Some(metal_tex),
        },
    );
    let tree = create_bvh_tree(vec![
        Surface::sphere(Vec3f::zeros(), 1.0, material),
        Surface::rect_xy(
            -20.0,
            20.0,
            -20.0,
            20.0,
            10.0,
            Material::emissive(Vec3f::new(1.0, 1.0, 1.0), 8.0),
        ),
    ]);
    let ray = Ray::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
    let mut rng = test_rng();
    let colour = intersect_world(&ray, &tree, 0.0, FP_INF, 4, &[], &black_sky(), &mut rng);
    assert!((colour - Vec3f::new(0.0, 8.0, 0.0)).norm() < TEST_EPS);
}

#[test]
fn light_pdf_is_zero_behind_the_surface() {
    let hit_point = Vec3f::zeros();
    let normal = Vec3f::new(0.0, 0.0, 1.0);
    let in_front = light_pdf(&hit_point, &normal, &Vec3f::new(0.0, 0.0, 10.0), 5.0);
    assert!((in_front - 100.0 / 5.0).abs() < TEST_EPS);
    let behind = light_pdf(&hit_point, &normal, &Vec3f::new(0.0, 0.0, -10.0), 5.0);
    assert_eq!(behind, 0.0);
}

#[test]
fn light_sample_points_lie_on_the_light() {
    let mut rng = test_rng();
    let sphere = Surface::sphere(Vec3f::new(1.0, 2.0, 3.0), 4.0, white_diffuse());
    for _ in 0..200 {
        let point = sphere.sample_point(&mut rng);
        assert!(((point - Vec3f::new(1.0, 2.0, 3.0)).norm() - 4.0).abs() < TEST_EPS);
    }
    let rect = Surface::rect_xz(-2.0, 2.0, 5.0, 9.0, 1.0, white_diffuse());
    for _ in 0..200 {
        let point = rect.sample_point(&mut rng);
        assert!(point.x >= -2.0 && point.x <= 2.0);
        assert!(point.z >= 5.0 && point.z <= 9.0);
        assert_eq!(point.y, 1.0);
    }
}

#[test]
fn reversed_rect_bounds_behave_like_ascending_ones() {
    let mut rng = test_rng();
    // corner pairs given in descending order are normalized on construction
    let rect = Surface::rect_xz(5.0, -5.0, 9.0, 5.0, 1.0, white_diffuse());
    assert!(rect.light_radius() > 0.0);
    for _ in 0..200 {
        let point = rect.sample_point(&mut rng);
        assert!(point.x >= -5.0 && point.x <= 5.0);
        assert!(point.z >= 5.0 && point.z <= 9.0);
        assert_eq!(point.y, 1.0);
    }
    let ray = Ray::new(Vec3f::new(0.0, 10.0, 7.0), Vec3f::new(0.0, -1.0, 0.0));
    assert!(rect.hit(&ray, 0.0, FP_INF).is_some());
    // a zero-extent axis collapses to that coordinate instead of panicking
    let sliver = Surface::rect_xy(2.0, 2.0, -1.0, 1.0, 0.0, white_diffuse());
    let point = sliver.sample_point(&mut rng);
    assert_eq!(point.x, 2.0);
    assert!(point.y >= -1.0 && point.y <= 1.0);
}

#[test]
fn perlin_is_deterministic_and_bounded() {
    let mut rng = test_rng();
    let noise = Perlin::new(16, &mut rng);
    for i in 0..100 {
        for j in 0..100 {
            let value = noise.get(i as Fp * 0.13, j as Fp * 0.17);
            assert!((0.0..=1.0).contains(&value));
        }
    }
    // grid addressing wraps, so shifting by the grid resolution repeats
    assert!((noise.get(0.3, 0.4) - noise.get(16.3, 0.4)).abs() < TEST_EPS);
    assert!((noise.get(0.3, 0.4) - noise.get(0.3, 16.4)).abs() < TEST_EPS);
}

#[test]
fn image_texture_wraps_and_interpolates() {
    let mut raw = vec![0u8; 2 * 2 * 3];
    // left column red, right column blue
    raw[0] = 255;
    raw[6] = 255;
    raw[3 + 2] = 255;
    raw[9 + 2] = 255;
    let texture = ImageTexture::new(image::RgbImage::from_raw(2, 2, raw).unwrap());
    let left = texture.get_pixel(0.0, 0.0);
    assert!((left - Vec3f::new(1.0, 0.0, 0.0)).norm() < TEST_EPS);
    // u addressing is modulo the image width
    let wrapped = texture.get_pixel(1.25, 0.0);
    let unwrapped = texture.get_pixel(0.25, 0.0);
    assert!((wrapped - unwrapped).norm() < TEST_EPS);
    // halfway between columns blends the two
    let middle = texture.get_pixel(0.25, 0.0);
    assert!((middle.x - 0.5).abs() < TEST_EPS);
    assert!((middle.z - 0.5).abs() < TEST_EPS);
}

#[test]
fn camera_center_ray_points_at_target() {
    let camera = Camera::new(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0), 90.0, 1.0);
    let ray = camera.cast_ray(0.5, 0.5);
    assert!((ray.direction - Vec3f::new(0.0, 0.0, -1.0)).norm() < TEST_EPS);
    assert!((ray.direction.norm() - 1.0).abs() < TEST_EPS);
}

#[test]
fn camera_survives_straight_down_view() {
    // view direction collinear with world up must not degenerate the basis
    let camera = Camera::new(Vec3f::new(0.0, 10.0, 0.0), Vec3f::zeros(), 90.0, 1.0);
    let ray = camera.cast_ray(0.5, 0.5);
    assert!((ray.direction - Vec3f::new(0.0, -1.0, 0.0)).norm() < TEST_EPS);
    assert!((ray.direction.norm() - 1.0).abs() < TEST_EPS);
}

#[test]
fn parse_scene_description() {
    let description = vec![
        "DIMENSIONS 320 240",
        "SAMPLES 4",
        "RAY_DEPTH 6",
        "SKY_COLOR 0 0 0",
        "CAMERA_POSITION 0 5 20",
        "CAMERA_TARGET 0 0 0",
        "CAMERA_FOV 45",
        "",
        "NEW_SPHERE 0 0 -10 3",
        "COLOR 0.8 0.2 0.2",
        "MATERIAL reflective",
        "ROUGHNESS 0.25",
        "NEW_RECT_XZ -5 5 -5 5 9.9",
        "COLOR 1 1 1",
        "MATERIAL emissive",
        "BRIGHTNESS 15",
        "NEW_BOX -1 -1 -1 1 1 1 45",
        "MATERIAL diffuse",
    ];
    let scene = parse_file_content(description);
    assert_eq!(scene.width, 320);
    assert_eq!(scene.height, 240);
    assert_eq!(scene.samples, 4);
    assert_eq!(scene.ray_depth, 6);
    assert_eq!(scene.world.surfaces().len(), 3);
    assert_eq!(scene.lights.len(), 1);
    assert!(scene.lights[0].material().is_emissive());
}

#[test]
fn ray_reciprocal_direction_uses_zero_sentinel() {
    let ray = Ray::new(Vec3f::zeros(), Vec3f::new(0.0, 1.0, 0.0));
    assert_eq!(ray.inv_direction.x, 0.0);
    assert!((ray.inv_direction.y - 1.0).abs() < TEST_EPS);
    assert_eq!(ray.inv_direction.z, 0.0);
}
