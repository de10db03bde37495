use bytemuck::Pod;

/// Append-only vertex storage with a fixed capacity.
///
/// The storage is allocated once at construction and never grows. Pushing
/// past capacity panics: overflowing a frame batch is a caller bug, and
/// silently dropping or reallocating would hide it.
#[derive(Debug)]
pub struct VertexBatch<V> {
    vertices: Vec<V>,
    capacity: usize,
}

impl<V: Pod> VertexBatch<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "vertex batch capacity must be non-zero");
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one vertex.
    ///
    /// # Panics
    /// If the batch is already full.
    #[inline]
    pub fn push(&mut self, v: V) {
        assert!(
            self.vertices.len() < self.capacity,
            "vertex batch overflow: capacity is {} vertices",
            self.capacity
        );
        self.vertices.push(v);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.vertices
    }

    /// Vertex bytes in `[0, len)`, ready for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Resets the cursor. Keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LineVertex;

    #[test]
    fn push_until_full() {
        let mut batch = VertexBatch::<LineVertex>::with_capacity(2);
        batch.push(LineVertex::default());
        batch.push(LineVertex::default());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.len(), batch.capacity);
        assert_eq!(batch.as_bytes().len(), 48);
    }

    #[test]
    #[should_panic(expected = "vertex batch overflow")]
    fn push_past_capacity_panics() {
        let mut batch = VertexBatch::<LineVertex>::with_capacity(1);
        batch.push(LineVertex::default());
        batch.push(LineVertex::default());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut batch = VertexBatch::<LineVertex>::with_capacity(4);
        batch.push(LineVertex::default());
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.capacity, 4);
        assert!(batch.vertices.capacity() >= 4);
    }
}
