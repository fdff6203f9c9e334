use std::sync::Arc;

use crate::geometry::{Fp, Vec3f};
use crate::texture::{ImageTexture, Perlin};

#[derive(Clone, Debug)]
pub enum MaterialKind {
    Diffuse,
    Reflective {
        roughness: Fp,
    },
    // terminal emitter; carries no scatter parameters
    Emissive {
        brightness: Fp,
    },
    Refractive {
        roughness: Fp,
        ior: Fp,
    },
    // diffuse base with a stochastic clear-coat reflection lobe
    Polished {
        roughness: Fp,
    },
    Pbr {
        roughness: Fp,
        metalness: Fp,
        diffuse_tex: Option<Arc<ImageTexture>>,
        roughness_tex: Option<Arc<ImageTexture>>,
        normal_tex: Option<Arc<ImageTexture>>,
        metal_tex: Option<Arc<ImageTexture>>,
    },
}

#[derive(Clone, Debug)]
pub struct Material {
    // base albedo, shared by every variant; radiance-scale, not clamped
    pub colour: Vec3f,
    pub kind: MaterialKind,
    // optional procedural modulation of the albedo
    pub noise: Option<Arc<Perlin>>,
    pub tiling_x: Fp,
    pub tiling_y: Fp,
}

impl Material {
    pub fn new(colour: Vec3f, kind: MaterialKind) -> Material {
        Material {
            colour,
            kind,
            noise: None,
            tiling_x: 1.0,
            tiling_y: 1.0,
        }
    }

    pub fn diffuse(colour: Vec3f) -> Material {
        Material::new(colour, MaterialKind::Diffuse)
    }

    pub fn reflective(colour: Vec3f, roughness: Fp) -> Material {
        Material::new(colour, MaterialKind::Reflective { roughness })
    }

    pub fn emissive(colour: Vec3f, brightness: Fp) -> Material {
        Material::new(colour, MaterialKind::Emissive { brightness })
    }

    pub fn refractive(colour: Vec3f, roughness: Fp, ior: Fp) -> Material {
        Material::new(colour, MaterialKind::Refractive { roughness, ior })
    }

    pub fn polished(colour: Vec3f, roughness: Fp) -> Material {
        Material::new(colour, MaterialKind::Polished { roughness })
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self.kind, MaterialKind::Emissive { .. })
    }

    // surfaces only compute UVs when something will read them
    pub fn needs_uv(&self) -> bool {
        if self.noise.is_some() {
            return true;
        }
        match &self.kind {
            MaterialKind::Pbr {
                diffuse_tex,
                roughness_tex,
                normal_tex,
                metal_tex,
                ..
            } => {
                diffuse_tex.is_some()
                    || roughness_tex.is_some()
                    || normal_tex.is_some()
                    || metal_tex.is_some()
            }
            _ => false,
        }
    }
}
