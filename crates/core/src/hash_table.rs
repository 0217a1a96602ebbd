use std::collections::HashMap;

pub trait VertexStore {
    fn find_or_insert(&mut self, key: &[i16]) -> u32;
    fn find(&self, key: &[i16]) -> Option<u32>;
    fn len(&self) -> usize;
    fn key(&self, index: u32) -> &[i16];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct HashVertexStore {
    key_size: usize,
    indices: HashMap<Vec<i16>, u32>,
    keys: Vec<i16>,
}

impl HashVertexStore {
    pub fn new(key_size: usize) -> Self {
        Self {
            key_size,
            indices: HashMap::new(),
            keys: Vec::new(),
        }
    }

    pub fn with_capacity(key_size: usize, capacity: usize) -> Self {
        Self {
            key_size,
            indices: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity * key_size),
        }
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }
}

impl VertexStore for HashVertexStore {
    fn find_or_insert(&mut self, key: &[i16]) -> u32 {
        debug_assert_eq!(key.len(), self.key_size);
        if let Some(&index) = self.indices.get(key) {
            return index;
        }
        let index = self.indices.len() as u32;
        self.indices.insert(key.to_vec(), index);
        self.keys.extend_from_slice(key);
        index
    }

    fn find(&self, key: &[i16]) -> Option<u32> {
        debug_assert_eq!(key.len(), self.key_size);
        self.indices.get(key).copied()
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn key(&self, index: u32) -> &[i16] {
        let start = index as usize * self.key_size;
        &self.keys[start..start + self.key_size]
    }
}
