use std::sync::Arc;

use na::Vector3;

use crate::bvh::{create_bvh_tree, BvhTree};
use crate::camera::Camera;
use crate::geometry::{Fp, Vec3f};
use crate::integrator::Sky;
use crate::material::{Material, MaterialKind};
use crate::surface::Surface;
use crate::texture::{ImageTexture, Perlin};

/// Everything a render needs, built once from a scene description file.
/// The BVH indexes a snapshot of the surfaces; the geometry is immutable
/// for the lifetime of the scene.
#[derive(Debug)]
pub struct Scene {
    pub width: i32,
    pub height: i32,
    pub samples: i32,
    pub ray_depth: i32,
    pub camera: Camera,
    pub sky: Sky,
    pub world: BvhTree,
    pub lights: Vec<Surface>,
}

enum PendingShape {
    Sphere { origin: Vec3f, radius: Fp },
    RectXy { x0: Fp, x1: Fp, y0: Fp, y1: Fp, z: Fp },
    RectXz { x0: Fp, x1: Fp, z0: Fp, z1: Fp, y: Fp },
    RectYz { y0: Fp, y1: Fp, z0: Fp, z1: Fp, x: Fp },
    Box { min: Vec3f, max: Vec3f, rotation: Fp },
}

// accumulates one surface block of the description file until the next
// NEW_* command (or end of file) seals it
struct PendingSurface {
    shape: PendingShape,
    colour: Vec3f,
    kind: String,
    roughness: Fp,
    ior: Fp,
    brightness: Fp,
    metalness: Fp,
    noise: Option<Arc<Perlin>>,
    diffuse_tex: Option<Arc<ImageTexture>>,
    roughness_tex: Option<Arc<ImageTexture>>,
    normal_tex: Option<Arc<ImageTexture>>,
    metal_tex: Option<Arc<ImageTexture>>,
    tiling_x: Fp,
    tiling_y: Fp,
}

impl PendingSurface {
    fn new(shape: PendingShape) -> PendingSurface {
        PendingSurface {
            shape,
            colour: Vec3f::new(1.0, 1.0, 1.0),
            kind: "DIFFUSE".to_string(),
            roughness: 0.0,
            ior: 1.5,
            brightness: 1.0,
            metalness: 0.0,
            noise: None,
            diffuse_tex: None,
            roughness_tex: None,
            normal_tex: None,
            metal_tex: None,
            tiling_x: 1.0,
            tiling_y: 1.0,
        }
    }

    fn build(self) -> Surface {
        let kind = match self.kind.as_str() {
            "DIFFUSE" => MaterialKind::Diffuse,
            "REFLECTIVE" => MaterialKind::Reflective {
                roughness: self.roughness,
            },
            "EMISSIVE" => MaterialKind::Emissive {
                brightness: self.brightness,
            },
            "REFRACTIVE" => MaterialKind::Refractive {
                roughness: self.roughness,
                ior: self.ior,
            },
            "POLISHED" => MaterialKind::Polished {
                roughness: self.roughness,
            },
            "PBR" => MaterialKind::Pbr {
                roughness: self.roughness,
                metalness: self.metalness,
                diffuse_tex: self.diffuse_tex,
                roughness_tex: self.roughness_tex,
                normal_tex: self.normal_tex,
                metal_tex: self.metal_tex,
            },
            other => panic!("Unknown material kind: {}", other),
        };
        let mut material = Material::new(self.colour, kind);
        material.noise = self.noise;
        material.tiling_x = self.tiling_x;
        material.tiling_y = self.tiling_y;
        match self.shape {
            PendingShape::Sphere { origin, radius } => Surface::sphere(origin, radius, material),
            PendingShape::RectXy { x0, x1, y0, y1, z } => {
                Surface::rect_xy(x0, x1, y0, y1, z, material)
            }
            PendingShape::RectXz { x0, x1, z0, z1, y } => {
                Surface::rect_xz(x0, x1, z0, z1, y, material)
            }
            PendingShape::RectYz { y0, y1, z0, z1, x } => {
                Surface::rect_yz(y0, y1, z0, z1, x, material)
            }
            PendingShape::Box { min, max, rotation } => {
                Surface::rotated_box(min, max, rotation, material)
            }
        }
    }
}

fn load_texture(path: &str) -> Arc<ImageTexture> {
    let image = image::open(path)
        .unwrap_or_else(|err| panic!("Failed opening texture {}: {}", path, err))
        .to_rgb8();
    Arc::new(ImageTexture::new(image))
}

pub fn parse_file_content(content: Vec<&str>) -> Scene {
    let mut width = 640;
    let mut height = 480;
    let mut samples = 32;
    let mut ray_depth = 8;
    let mut camera_position = Vec3f::new(0.0, 0.0, 0.0);
    let mut camera_target = Vec3f::new(0.0, 0.0, -1.0);
    let mut camera_fov = 60.0;
    let mut sky = Sky::Gradient {
        top: Vec3f::new(0.5, 0.7, 1.0),
        bottom: Vec3f::new(1.0, 1.0, 1.0),
    };

    let mut surfaces: Vec<Surface> = vec![];
    let mut current_surface: Option<PendingSurface> = None;

    for line in content {
        let tokens: Vec<String> = line.split_whitespace().map(|x| x.to_string()).collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue;
        }

        let get_scalar = |index: usize| -> Fp { tokens[index].parse().unwrap() };
        let get_vector = |index: usize| -> Vec3f {
            Vector3::new(
                tokens[index].parse().unwrap(),
                tokens[index + 1].parse().unwrap(),
                tokens[index + 2].parse().unwrap(),
            )
        };

        match tokens[0].as_str() {
            "DIMENSIONS" => {
                width = tokens[1].parse().unwrap();
                height = tokens[2].parse().unwrap();
            }
            "SAMPLES" => {
                samples = tokens[1].parse().unwrap();
            }
            "RAY_DEPTH" => {
                ray_depth = tokens[1].parse().unwrap();
            }
            "CAMERA_POSITION" => {
                camera_position = get_vector(1);
            }
            "CAMERA_TARGET" => {
                camera_target = get_vector(1);
            }
            "CAMERA_FOV" => {
                camera_fov = get_scalar(1);
            }
            "SKY_GRADIENT" => {
                sky = Sky::Gradient {
                    top: get_vector(1),
                    bottom: get_vector(4),
                };
            }
            "SKY_COLOR" => {
                sky = Sky::Flat(get_vector(1));
            }
            "SKYBOX" => {
                sky = Sky::Skybox(load_texture(&tokens[1]));
            }
            "NEW_SPHERE" => {
                if let Some(finished) = current_surface.take() {
                    surfaces.push(finished.build());
                }
                current_surface = Some(PendingSurface::new(PendingShape::Sphere {
                    origin: get_vector(1),
                    radius: get_scalar(4),
                }));
            }
            "NEW_RECT_XY" => {
                if let Some(finished) = current_surface.take() {
                    surfaces.push(finished.build());
                }
                current_surface = Some(PendingSurface::new(PendingShape::RectXy {
                    x0: get_scalar(1),
                    x1: get_scalar(2),
                    y0: get_scalar(3),
                    y1: get_scalar(4),
                    z: get_scalar(5),
                }));
            }
            "NEW_RECT_XZ" => {
                if let Some(finished) = current_surface.take() {
                    surfaces.push(finished.build());
                }
                current_surface = Some(PendingSurface::new(PendingShape::RectXz {
                    x0: get_scalar(1),
                    x1: get_scalar(2),
                    z0: get_scalar(3),
                    z1: get_scalar(4),
                    y: get_scalar(5),
                }));
            }
            "NEW_RECT_YZ" => {
                if let Some(finished) = current_surface.take() {
                    surfaces.push(finished.build());
                }
                current_surface = Some(PendingSurface::new(PendingShape::RectYz {
                    y0: get_scalar(1),
                    y1: get_scalar(2),
                    z0: get_scalar(3),
                    z1: get_scalar(4),
                    x: get_scalar(5),
                }));
            }
            "NEW_BOX" => {
                if let Some(finished) = current_surface.take() {
                    surfaces.push(finished.build());
                }
                current_surface = Some(PendingSurface::new(PendingShape::Box {
                    min: get_vector(1),
                    max: get_vector(4),
                    rotation: get_scalar(7),
                }));
            }
            "COLOR" => {
                current_surface.as_mut().unwrap().colour = get_vector(1);
            }
            "MATERIAL" => {
                current_surface.as_mut().unwrap().kind = tokens[1].to_uppercase();
            }
            "ROUGHNESS" => {
                current_surface.as_mut().unwrap().roughness = get_scalar(1);
            }
            "IOR" => {
                current_surface.as_mut().unwrap().ior = get_scalar(1);
            }
            "BRIGHTNESS" => {
                current_surface.as_mut().unwrap().brightness = get_scalar(1);
            }
            "TILING" => {
                let pending = current_surface.as_mut().unwrap();
                pending.tiling_x = get_scalar(1);
                pending.tiling_y = get_scalar(2);
            }
            "METALNESS" => {
                current_surface.as_mut().unwrap().metalness = get_scalar(1);
            }
            "NOISE" => {
                let nodes = tokens[1].parse().unwrap();
                current_surface.as_mut().unwrap().noise =
                    Some(Arc::new(Perlin::new(nodes, &mut rand::thread_rng())));
            }
            "DIFFUSE_TEX" => {
                current_surface.as_mut().unwrap().diffuse_tex = Some(load_texture(&tokens[1]));
            }
            "ROUGHNESS_TEX" => {
                current_surface.as_mut().unwrap().roughness_tex = Some(load_texture(&tokens[1]));
            }
            "NORMAL_TEX" => {
                current_surface.as_mut().unwrap().normal_tex = Some(load_texture(&tokens[1]));
            }
            "METAL_TEX" => {
                current_surface.as_mut().unwrap().metal_tex = Some(load_texture(&tokens[1]));
            }
            _ => {
                // ignore unknown command
            }
        }
    }
    if let Some(finished) = current_surface.take() {
        surfaces.push(finished.build());
    }

    // emissive surfaces double as next-event-estimation targets
    let lights: Vec<Surface> = surfaces
        .iter()
        .filter(|surface| surface.material().is_emissive())
        .cloned()
        .collect();
    log::info!(
        "parsed scene: {} surfaces, {} lights, {}x{} at {} samples",
        surfaces.len(),
        lights.len(),
        width,
        height,
        samples
    );

    let camera = Camera::new(
        camera_position,
        camera_target,
        camera_fov,
        width as Fp / height as Fp,
    );
    Scene {
        width,
        height,
        samples,
        ray_depth,
        camera,
        sky,
        world: create_bvh_tree(surfaces),
        lights,
    }
}
