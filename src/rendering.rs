use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::geometry::{Fp, Vec3f, FP_INF};
use crate::integrator::intersect_world;
use crate::scene::Scene;

// base seed for the per-(pass, scanline) generators; fixed so a render of
// the same scene reproduces the same image
static RENDER_SEED: u64 = 0x00c0ffee;

/// Renders the scene progressively: one full-frame sample pass at a time,
/// averaged into an accumulation buffer, then gamma-mapped to 8-bit RGB.
/// Rows are independent, so each pass fans out across the rayon pool with
/// a private seeded RNG per scanline.
pub fn render_scene(scene: &Scene) -> Vec<u8> {
    let width = scene.width as usize;
    let height = scene.height as usize;
    let mut accumulation = vec![Vec3f::zeros(); width * height];

    let progress = ProgressBar::new(scene.samples as u64);
    for pass in 0..scene.samples {
        accumulation
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let seed = RENDER_SEED ^ ((pass as u64) << 32 | y as u64);
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                for (x, pixel) in row.iter_mut().enumerate() {
                    let u = (x as Fp + rng.gen::<Fp>()) / scene.width as Fp;
                    let v = 1.0 - (y as Fp + rng.gen::<Fp>()) / scene.height as Fp;
                    let ray = scene.camera.cast_ray(u, v);
                    *pixel += intersect_world(
                        &ray,
                        &scene.world,
                        0.0,
                        FP_INF,
                        scene.ray_depth,
                        &scene.lights,
                        &scene.sky,
                        &mut rng,
                    );
                }
            });
        progress.inc(1);
    }
    progress.finish();

    // running mean, then gamma 2 and quantization; the integrator itself
    // returns linear radiance
    let scale = 1.0 / scene.samples as Fp;
    let mut result = Vec::with_capacity(width * height * 3);
    for colour in &accumulation {
        for channel in 0..3 {
            let value = (colour[channel] * scale).max(0.0).sqrt();
            result.push((value.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }
    result
}
