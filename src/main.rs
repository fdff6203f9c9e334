mod aabb;
mod bvh;
mod camera;
mod geometry;
mod integrator;
mod material;
mod rendering;
mod sampling;
mod scene;
mod surface;
#[cfg(test)]
mod tests;
mod texture;

extern crate nalgebra as na;

use crate::rendering::render_scene;
use crate::scene::{parse_file_content, Scene};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <scene file> <output png> [output ppm]", args[0]);
        std::process::exit(1);
    }
    let file_string = fs::read_to_string(&args[1]).expect("Failed opening scene file");
    let file_lines = file_string
        .split('\n')
        .map(|x| x.trim())
        .collect::<Vec<&str>>();
    let scene = parse_file_content(file_lines);

    let start = Instant::now();
    let rendered_scene = render_scene(&scene);
    log::info!("rendered in {:.2}s", start.elapsed().as_secs_f64());

    dump_rendered_to_png(&scene, &rendered_scene, &args[2]);
    if args.len() >= 4 {
        let mut out_file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&args[3])
            .expect("Failed opening ppm output");
        dump_rendered_to_ppm(&scene, &rendered_scene, &mut out_file);
    }
}

fn dump_rendered_to_png(scene: &Scene, rendered_scene: &[u8], png_path: &str) {
    let mut img = RgbImage::new(scene.width as u32, scene.height as u32);
    for x in 0..scene.width {
        for y in 0..scene.height {
            for i in 0..3 {
                img.get_pixel_mut(x as u32, y as u32).0[i] =
                    rendered_scene[(y * scene.width * 3 + x * 3) as usize + i];
            }
        }
    }
    img.save_with_format(png_path, ImageFormat::Png)
        .expect("Failed writing png");
}

fn dump_rendered_to_ppm(scene: &Scene, rendered_scene: &[u8], out_file: &mut File) {
    out_file.write_all(b"P6\n").unwrap();
    out_file
        .write_all(format!("{} {}\n", scene.width, scene.height).as_bytes())
        .unwrap();
    out_file.write_all(b"255\n").unwrap();
    out_file.write_all(rendered_scene).unwrap();
}
