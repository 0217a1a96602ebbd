use tracing::debug;

use crate::hash_table::{HashVertexStore, VertexStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisNeighbors {
    pub up: Option<u32>,
    pub down: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Lattice {
    pub(crate) dims: usize,
    pub(crate) points: usize,
    pub(crate) vertices: usize,
    pub(crate) corners: Vec<u32>,
    pub(crate) corner_weights: Vec<f32>,
    pub(crate) neighbors: Vec<AxisNeighbors>,
}

impl Lattice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn corners(&self) -> &[u32] {
        &self.corners
    }

    pub fn corner_weights(&self) -> &[f32] {
        &self.corner_weights
    }

    pub fn neighbors(&self) -> &[AxisNeighbors] {
        &self.neighbors
    }

    pub fn build(features: &[f32], dims: usize) -> Self {
        let points = if dims > 0 { features.len() / dims } else { 0 };
        let mut store = HashVertexStore::with_capacity(dims, points * (dims + 1));
        Self::build_with(features, dims, &mut store)
    }

    pub fn build_with<S: VertexStore>(features: &[f32], dims: usize, store: &mut S) -> Self {
        debug_assert!(dims >= 1);
        debug_assert!(features.len() % dims == 0);
        debug_assert!(store.is_empty());

        let axes = dims + 1;
        let points = features.len() / dims;
        let mut corners = vec![0u32; points * axes];
        let mut corner_weights = vec![0.0f32; points * axes];

        // canonical simplex offsets, one row per remainder
        let mut canonical = vec![0i16; axes * axes];
        for i in 0..axes {
            for j in 0..(axes - i) {
                canonical[i * axes + j] = i as i16;
            }
            for j in (axes - i)..axes {
                canonical[i * axes + j] = i as i16 - axes as i16;
            }
        }

        let inv_std_dev = (2.0f32 / 3.0).sqrt() * axes as f32;
        let scale: Vec<f32> = (0..dims)
            .map(|i| inv_std_dev / (((i + 2) * (i + 1)) as f32).sqrt())
            .collect();

        let down_factor = 1.0 / axes as f32;
        let up_factor = axes as f32;

        let mut elevated = vec![0.0f32; axes];
        let mut rem0 = vec![0.0f32; axes];
        let mut rank = vec![0i32; axes];
        let mut barycentric = vec![0.0f32; dims + 2];
        let mut key = vec![0i16; dims];

        for (point, feature) in features.chunks_exact(dims).enumerate() {
            // embed onto the hyperplane sum(x) = 0 via cumulative sums
            let mut sum = 0.0f32;
            for j in (1..=dims).rev() {
                let cf = feature[j - 1] * scale[j - 1];
                elevated[j] = sum - j as f32 * cf;
                sum += cf;
            }
            elevated[0] = sum;

            // nearest 0-colored lattice point, tracking how far the
            // rounding landed off the plane
            let mut plane_sum = 0i32;
            for i in 0..axes {
                let rounded = (elevated[i] * down_factor).round() as i32;
                rem0[i] = rounded as f32 * up_factor;
                plane_sum += rounded;
            }

            // rank[i] = position of coordinate i in the sorted residuals
            rank.fill(0);
            for i in 0..dims {
                let di = elevated[i] - rem0[i];
                for j in (i + 1)..axes {
                    if di < elevated[j] - rem0[j] {
                        rank[i] += 1;
                    } else {
                        rank[j] += 1;
                    }
                }
            }

            for i in 0..axes {
                rank[i] += plane_sum;
                if rank[i] < 0 {
                    rank[i] += axes as i32;
                    rem0[i] += up_factor;
                } else if rank[i] > dims as i32 {
                    rank[i] -= axes as i32;
                    rem0[i] -= up_factor;
                }
            }

            barycentric.fill(0.0);
            for i in 0..axes {
                let v = (elevated[i] - rem0[i]) * down_factor;
                barycentric[dims - rank[i] as usize] += v;
                barycentric[dims - rank[i] as usize + 1] -= v;
            }
            barycentric[0] += 1.0 + barycentric[dims + 1];

            // keys omit the redundant last coordinate
            for remainder in 0..axes {
                for i in 0..dims {
                    key[i] = rem0[i] as i16 + canonical[remainder * axes + rank[i] as usize];
                }
                corners[point * axes + remainder] = store.find_or_insert(&key);
                corner_weights[point * axes + remainder] = barycentric[remainder];
            }
        }

        let vertices = store.len();
        let mut neighbors = vec![AxisNeighbors::default(); axes * vertices];
        let mut up_key = vec![0i16; dims];
        let mut down_key = vec![0i16; dims];
        for axis in 0..axes {
            for vertex in 0..vertices {
                let vertex_key = store.key(vertex as u32);
                for k in 0..dims {
                    up_key[k] = vertex_key[k] - 1;
                    down_key[k] = vertex_key[k] + 1;
                }
                // on the last axis the shift lands entirely on the
                // implicit coordinate
                if axis < dims {
                    up_key[axis] = vertex_key[axis] + dims as i16;
                    down_key[axis] = vertex_key[axis] - dims as i16;
                }
                neighbors[axis * vertices + vertex] = AxisNeighbors {
                    up: store.find(&up_key),
                    down: store.find(&down_key),
                };
            }
        }

        debug!(
            "built permutohedral lattice: {} points, {} vertices, {} dims",
            points, vertices, dims
        );

        Self {
            dims,
            points,
            vertices,
            corners,
            corner_weights,
            neighbors,
        }
    }
}
