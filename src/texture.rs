use crate::geometry::{Fp, Vec3f};
use image::RgbImage;
use rand::Rng;

// linear interpolator shared by both samplers
fn interpolate(val: Fp, a: Fp, b: Fp) -> Fp {
    a + val * (b - a)
}

/// Image-backed texture sampled by UV with wraparound addressing and
/// bilinear filtering. Channel values come back in [0, 1].
#[derive(Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    data: RgbImage,
}

impl ImageTexture {
    pub fn new(image: RgbImage) -> ImageTexture {
        ImageTexture {
            width: image.width(),
            height: image.height(),
            data: image,
        }
    }

    pub fn get_pixel(&self, u: Fp, v: Fp) -> Vec3f {
        let ul = (u * self.width as Fp).rem_euclid(self.width as Fp);
        let vl = (v * self.height as Fp).rem_euclid(self.height as Fp);
        let x = ul.floor() as u32;
        let y = vl.floor() as u32;
        // neighbour indices wrap to the opposite edge
        let x1 = if x + 1 > self.width - 1 { 0 } else { x + 1 };
        let y1 = if y + 1 > self.height - 1 { 0 } else { y + 1 };

        let ix = ul - x as Fp;
        let iy = vl - y as Fp;

        let texel = |x: u32, y: u32, channel: usize| self.data.get_pixel(x, y).0[channel] as Fp;
        let mut channels = [0.0; 3];
        for (channel, value) in channels.iter_mut().enumerate() {
            let left = interpolate(iy, texel(x, y, channel), texel(x, y1, channel));
            let right = interpolate(iy, texel(x1, y, channel), texel(x1, y1, channel));
            *value = interpolate(ix, left, right) / 255.0;
        }
        Vec3f::new(channels[0], channels[1], channels[2])
    }
}

/// 2D gradient noise over a fixed grid of random unit gradients, sampled
/// with wraparound and smoothstep-faded interpolation. Returns values
/// in [0, 1].
#[derive(Debug)]
pub struct Perlin {
    nodes: usize,
    grid: Vec<(Fp, Fp)>,
}

impl Perlin {
    pub fn new(nodes: usize, rng: &mut impl Rng) -> Perlin {
        let mut grid = Vec::with_capacity(nodes * nodes);
        for _ in 0..nodes * nodes {
            let theta: Fp = rng.gen_range(0.0..std::f64::consts::TAU);
            grid.push((theta.cos(), theta.sin()));
        }
        Perlin { nodes, grid }
    }

    pub fn get(&self, x: Fp, y: Fp) -> Fp {
        let x = x.abs();
        let y = y.abs();
        let x0 = x.floor();
        let y0 = y.floor();

        let top_left = self.dot_grid(x, y, x0, y0);
        let top_right = self.dot_grid(x, y, x0 + 1.0, y0);
        let bottom_left = self.dot_grid(x, y, x0, y0 + 1.0);
        let bottom_right = self.dot_grid(x, y, x0 + 1.0, y0 + 1.0);

        let fx = fade(x - x0);
        let fy = fade(y - y0);
        let v1 = interpolate(fy, top_left, bottom_left);
        let v2 = interpolate(fy, top_right, bottom_right);
        let intensity = interpolate(fx, v1, v2);

        // gradient dot products live in roughly [-1, 1]; remap for colour use
        ((intensity + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    fn dot_grid(&self, x: Fp, y: Fp, grid_x: Fp, grid_y: Fp) -> Fp {
        let gx = (grid_x as usize) % self.nodes;
        let gy = (grid_y as usize) % self.nodes;
        let gradient = self.grid[gy * self.nodes + gx];
        let (dx, dy) = (x - grid_x, y - grid_y);
        dx * gradient.0 + dy * gradient.1
    }
}

// smoothstep fade so cell boundaries have zero derivative
fn fade(t: Fp) -> Fp {
    t * t * (3.0 - 2.0 * t)
}
