use glam::DVec3;
use rstar::{primitives::GeomWithData, RTree};

use crate::part::Particle;

type TreeNode = GeomWithData<[f64; 3], usize>;

/// Fixed-radius neighbour lookup over the real particles followed by their ghosts.
///
/// Indices below `real_count` refer to real particles, the others to
/// `ghosts[index - real_count]`.
pub struct NeighbourSearch {
    tree: RTree<TreeNode>,
    real_count: usize,
}

impl NeighbourSearch {
    pub fn build(real: &[Particle], ghosts: &[Particle]) -> Self {
        let tree_objects = real
            .iter()
            .chain(ghosts.iter())
            .enumerate()
            .map(|(idx, part)| TreeNode::new(part.position.to_array(), idx))
            .collect::<Vec<_>>();
        Self {
            tree: RTree::bulk_load(tree_objects),
            real_count: real.len(),
        }
    }

    pub fn real_count(&self) -> usize {
        self.real_count
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of all particles within `radius` of `loc`, the query site included.
    pub fn within(&self, loc: DVec3, radius: f64) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_within_distance(loc.to_array(), radius * radius)
            .map(|node| node.data)
    }
}
