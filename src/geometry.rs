use na::Vector3;

pub type Fp = f64;
pub type Vec3f = Vector3<Fp>;

pub static EPS: Fp = 0.00001;
pub static FP_INF: Fp = Fp::INFINITY;
pub static FP_NEG_INF: Fp = Fp::NEG_INFINITY;

// t_min used on every recursive bounce to avoid self-intersection
pub static SHADOW_ACNE_EPS: Fp = 0.001;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
    // reciprocal of the direction, with 0 standing in for axis-parallel
    // components. A 0 here means "no bound on this axis" for slab tests,
    // never a value to divide with.
    pub inv_direction: Vec3f,
}

impl Ray {
    pub fn new(origin: Vec3f, direction: Vec3f) -> Ray {
        let direction = direction.normalize();
        let recip = |d: Fp| if d == 0.0 { 0.0 } else { 1.0 / d };
        Ray {
            origin,
            direction,
            inv_direction: Vec3f::new(recip(direction.x), recip(direction.y), recip(direction.z)),
        }
    }

    pub fn at(&self, t: Fp) -> Vec3f {
        self.origin + self.direction * t
    }
}

// everything the integrator needs to know about the nearest intersection;
// built per test and consumed immediately, never stored
#[derive(Clone)]
pub struct Hit<'a> {
    pub t: Fp,
    pub point: Vec3f,
    pub normal: Vec3f,
    pub front_face: bool,
    pub material: &'a crate::material::Material,
    pub u: Fp,
    pub v: Fp,
}

// orients an outward normal against the incoming ray, reporting whether the
// geometric normal already opposed it
pub fn face_normal(ray: &Ray, outward_normal: Vec3f) -> (Vec3f, bool) {
    if ray.direction.dot(&outward_normal) < 0.0 {
        (outward_normal, true)
    } else {
        (-outward_normal, false)
    }
}

pub fn reflect(vec: &Vec3f, normal: &Vec3f) -> Vec3f {
    vec - normal * (normal.dot(vec) * 2.0)
}

// Snell refraction of a unit direction for the given ratio of indices
pub fn refract(direction: &Vec3f, normal: &Vec3f, ratio: Fp) -> Vec3f {
    let cos_theta = Fp::min((-direction).dot(normal), 1.0);
    let out_perp = (direction + normal * cos_theta) * ratio;
    let out_parallel = normal * (-(1.0 - out_perp.norm_squared()).abs().sqrt());
    out_perp + out_parallel
}

// Schlick's approximation of Fresnel reflectance
pub fn reflectance(cos_theta: Fp, ratio: Fp) -> Fp {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

// component-wise colour product
pub fn mix_colours(a: &Vec3f, b: &Vec3f) -> Vec3f {
    a.component_mul(b)
}

pub fn clamp_vector(vec: &Vec3f, min: Fp, max: Fp) -> Vec3f {
    Vec3f::new(
        vec.x.clamp(min, max),
        vec.y.clamp(min, max),
        vec.z.clamp(min, max),
    )
}

pub fn to_radians(degrees: Fp) -> Fp {
    degrees * (std::f64::consts::PI / 180.0)
}
