use std::ops::Range;

use crate::lattice::Lattice;
use crate::parallel;

impl Lattice {
    pub fn filter(&self, values: &[f32], value_size: usize) -> Vec<f32> {
        self.filter_range(values, value_size, 0..self.points, 0..self.points)
    }

    pub fn filter_range(
        &self,
        values: &[f32],
        value_size: usize,
        input: Range<usize>,
        output: Range<usize>,
    ) -> Vec<f32> {
        debug_assert!(input.end <= self.points);
        debug_assert!(output.end <= self.points);
        debug_assert_eq!(values.len(), input.len() * value_size);

        if output.is_empty() {
            return Vec::new();
        }

        let axes = self.dims + 1;

        // vertex slots are shifted by one: slot 0 and slot M+1 stay zero
        // and absorb reads through absent neighbors
        let mut current = vec![0.0f32; (self.vertices + 2) * value_size];
        let mut next = current.clone();

        for (i, point) in input.enumerate() {
            let value = &values[i * value_size..(i + 1) * value_size];
            for j in 0..axes {
                let slot = (self.corners[point * axes + j] as usize + 1) * value_size;
                let weight = self.corner_weights[point * axes + j];
                for (k, v) in value.iter().enumerate() {
                    current[slot + k] += weight * v;
                }
            }
        }

        for axis in 0..axes {
            for vertex in 0..self.vertices {
                let pair = self.neighbors[axis * self.vertices + vertex];
                let up = slot_of(pair.up) * value_size;
                let down = slot_of(pair.down) * value_size;
                let base = (vertex + 1) * value_size;
                for k in 0..value_size {
                    next[base + k] =
                        current[base + k] + 0.5 * (current[up + k] + current[down + k]);
                }
            }
            std::mem::swap(&mut current, &mut next);
        }

        let alpha = 1.0 / (1.0 + 2.0f32.powi(-(self.dims as i32)));

        let mut out = vec![0.0f32; output.len() * value_size];
        for (i, point) in output.enumerate() {
            for j in 0..axes {
                let slot = (self.corners[point * axes + j] as usize + 1) * value_size;
                let weight = self.corner_weights[point * axes + j];
                for k in 0..value_size {
                    out[i * value_size + k] += weight * alpha * current[slot + k];
                }
            }
        }
        out
    }

    pub fn normalizer(&self) -> Vec<f32> {
        let ones = vec![1.0f32; self.points];
        self.filter(&ones, 1)
    }

    pub fn filter_normalized(&self, values: &[f32], value_size: usize) -> Vec<f32> {
        let norm = self.normalizer();
        let mut out = self.filter(values, value_size);
        for (point, value) in out.chunks_exact_mut(value_size).enumerate() {
            let inv = 1.0 / (norm[point] + 1e-20);
            for v in value {
                *v *= inv;
            }
        }
        out
    }

    pub fn filter_scalar(&self, values: &[f32]) -> Vec<f32> {
        self.filter_normalized(values, 1)
    }

    pub fn filter_vec2(&self, values: &[[f32; 2]]) -> Vec<[f32; 2]> {
        self.filter_array(values)
    }

    pub fn filter_vec3(&self, values: &[[f32; 3]]) -> Vec<[f32; 3]> {
        self.filter_array(values)
    }

    pub fn filter_vec4(&self, values: &[[f32; 4]]) -> Vec<[f32; 4]> {
        self.filter_array(values)
    }

    fn filter_array<const W: usize>(&self, values: &[[f32; W]]) -> Vec<[f32; W]>
    where
        [f32; W]: bytemuck::Pod,
    {
        let filtered = self.filter_normalized(bytemuck::cast_slice(values), W);
        let mut out = vec![[0.0f32; W]; values.len()];
        bytemuck::cast_slice_mut::<[f32; W], f32>(&mut out).copy_from_slice(&filtered);
        out
    }
}

pub fn filter_channels(lattice: &Lattice, channels: &mut [Vec<f32>]) {
    parallel::for_each_indexed_mut(channels, |_, channel| {
        *channel = lattice.filter_normalized(channel, 1);
    });
}

fn slot_of(neighbor: Option<u32>) -> usize {
    match neighbor {
        Some(vertex) => vertex as usize + 1,
        None => 0,
    }
}
