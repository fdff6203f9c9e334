use std::cmp::Ordering;

use crate::aabb::Aabb;
use crate::geometry::{Fp, Hit, Ray};
use crate::surface::{Hittable, Surface};

#[derive(Debug)]
struct BvhNode {
    bounds: Aabb,
    left_child_index: usize,
    right_child_index: usize,
    content_start: usize,
    content_length: usize,
}

static NO_CHILD: usize = usize::MAX;

/// Binary hierarchy over a surface list, stored as a flat node arena.
/// Built once per scene snapshot; mutating surface geometry afterwards
/// leaves the bounds stale, so any change requires a rebuild.
#[derive(Debug, Default)]
pub struct BvhTree {
    nodes: Vec<BvhNode>,
    surfaces: Vec<Surface>,
    root: usize,
}

pub fn create_bvh_tree(mut surfaces: Vec<Surface>) -> BvhTree {
    let mut nodes = vec![];
    let length = surfaces.len();
    let root = if length == 0 {
        // degenerate tree; hit() reports a miss without touching nodes
        0
    } else {
        create_bvh_node(&mut nodes, &mut surfaces, 0, length)
    };
    log::info!(
        "built BVH over {} surfaces ({} nodes)",
        length,
        nodes.len()
    );
    BvhTree {
        nodes,
        surfaces,
        root,
    }
}

fn create_bvh_node(
    nodes: &mut Vec<BvhNode>,
    surfaces: &mut Vec<Surface>,
    start: usize,
    length: usize,
) -> usize {
    let bounds = calculate_bounds(&surfaces[start..start + length]);
    // leaves hold one or two surfaces directly
    if length <= 2 {
        nodes.push(BvhNode {
            bounds,
            left_child_index: NO_CHILD,
            right_child_index: NO_CHILD,
            content_start: start,
            content_length: length,
        });
        return nodes.len() - 1;
    }

    // median split along the widest axis: order by surface centre and cut
    // the list in half
    let axis = widest_axis(&bounds);
    surfaces[start..start + length].sort_unstable_by(|a, b| {
        a.origin()[axis]
            .partial_cmp(&b.origin()[axis])
            .unwrap_or(Ordering::Equal)
    });
    let mid = length / 2;
    let left_child = create_bvh_node(nodes, surfaces, start, mid);
    let right_child = create_bvh_node(nodes, surfaces, start + mid, length - mid);
    let bounds = nodes[left_child]
        .bounds
        .surrounding(&nodes[right_child].bounds);
    nodes.push(BvhNode {
        bounds,
        left_child_index: left_child,
        right_child_index: right_child,
        content_start: start,
        content_length: length,
    });
    nodes.len() - 1
}

fn widest_axis(bounds: &Aabb) -> usize {
    let diff = bounds.max - bounds.min;
    if diff.x >= diff.y && diff.x >= diff.z {
        0
    } else if diff.y >= diff.z {
        1
    } else {
        2
    }
}

fn calculate_bounds(slice: &[Surface]) -> Aabb {
    let mut result = <Aabb as Default>::default();
    for surface in slice {
        if let Some(bounds) = surface.bounding() {
            result = result.surrounding(&bounds);
        }
    }
    result
}

impl BvhTree {
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    fn hit_node(&self, index: usize, ray: &Ray, t_min: Fp, mut t_max: Fp) -> Option<Hit<'_>> {
        let node = &self.nodes[index];
        if !node.bounds.hit(ray, t_min, t_max) {
            return None;
        }
        if node.left_child_index == NO_CHILD {
            let mut nearest = None;
            let content =
                &self.surfaces[node.content_start..node.content_start + node.content_length];
            for surface in content {
                if let Some(hit) = surface.hit(ray, t_min, t_max) {
                    t_max = hit.t;
                    nearest = Some(hit);
                }
            }
            nearest
        } else {
            let mut nearest = self.hit_node(node.left_child_index, ray, t_min, t_max);
            if let Some(hit) = &nearest {
                // the second child may only return a strictly closer hit
                t_max = hit.t;
            }
            if let Some(hit) = self.hit_node(node.right_child_index, ray, t_min, t_max) {
                nearest = Some(hit);
            }
            nearest
        }
    }
}

impl Hittable for BvhTree {
    fn hit(&self, ray: &Ray, t_min: Fp, t_max: Fp) -> Option<Hit<'_>> {
        if self.nodes.is_empty() {
            return None;
        }
        self.hit_node(self.root, ray, t_min, t_max)
    }

    fn bounding(&self) -> Option<Aabb> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(self.nodes[self.root].bounds.clone())
        }
    }
}
