//! Maps between tensor (multi) indices and flat indices
//!
//! The first direction varies fastest: in a `[3, 2]` index set the flat index of `[i, j]` is
//! `i + 3 * j`.

/// Bijection between the tensor indices of a box `[0, n_0) x ... x [0, n_{d-1})` and `[0, N)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TensorIndexer {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    flat_size: usize,
}

impl TensorIndexer {
    /// Create new
    pub fn new(sizes: &[usize]) -> Self {
        let mut strides = Vec::with_capacity(sizes.len());
        let mut flat_size = 1;
        for s in sizes {
            strides.push(flat_size);
            flat_size *= s;
        }
        Self {
            sizes: sizes.to_vec(),
            strides,
            flat_size,
        }
    }

    /// Number of directions
    pub fn dim(&self) -> usize {
        self.sizes.len()
    }

    /// Extent in each direction
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Distance between consecutive flat indices in each direction
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of tensor indices
    pub fn flat_size(&self) -> usize {
        self.flat_size
    }

    /// Convert a flat index to a tensor index
    pub fn flat_to_tensor(&self, flat: usize) -> Vec<usize> {
        let mut tensor = vec![0; self.dim()];
        self.flat_to_tensor_into(flat, &mut tensor);
        tensor
    }

    /// Convert a flat index to a tensor index, writing into `tensor`
    pub fn flat_to_tensor_into(&self, flat: usize, tensor: &mut [usize]) {
        assert!(
            flat < self.flat_size,
            "Flat index {flat} out of range for size {}",
            self.flat_size
        );
        assert_eq!(tensor.len(), self.dim());
        let mut rest = flat;
        for (t, s) in tensor.iter_mut().zip(&self.sizes) {
            *t = rest % s;
            rest /= s;
        }
    }

    /// Convert a tensor index to a flat index
    pub fn tensor_to_flat(&self, tensor: &[usize]) -> usize {
        assert_eq!(tensor.len(), self.dim(), "Tensor index has wrong dimension");
        tensor
            .iter()
            .zip(&self.sizes)
            .zip(&self.strides)
            .map(|((t, s), st)| {
                assert!(t < s, "Tensor index {tensor:?} out of range for sizes {:?}", self.sizes);
                t * st
            })
            .sum()
    }

    /// Iterate over all tensor indices in flat order
    pub fn iter(&self) -> TensorIndexIter<'_> {
        TensorIndexIter {
            indexer: self,
            next: 0,
        }
    }
}

/// Iterator over the tensor indices of a [TensorIndexer]
#[derive(Debug)]
pub struct TensorIndexIter<'a> {
    indexer: &'a TensorIndexer,
    next: usize,
}

impl Iterator for TensorIndexIter<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.next < self.indexer.flat_size() {
            self.next += 1;
            Some(self.indexer.flat_to_tensor(self.next - 1))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.indexer.flat_size() - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TensorIndexIter<'_> {}

/// A [TensorIndexer] with every tensor index precomputed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartesianProductIndexer {
    indexer: TensorIndexer,
    table: Vec<usize>,
}

impl CartesianProductIndexer {
    /// Create new
    pub fn new(sizes: &[usize]) -> Self {
        let indexer = TensorIndexer::new(sizes);
        let mut table = vec![0; indexer.flat_size() * indexer.dim()];
        if indexer.dim() > 0 {
            for (flat, chunk) in table.chunks_exact_mut(indexer.dim()).enumerate() {
                indexer.flat_to_tensor_into(flat, chunk);
            }
        }
        Self { indexer, table }
    }

    /// The underlying indexer
    pub fn indexer(&self) -> &TensorIndexer {
        &self.indexer
    }

    /// Number of tensor indices
    pub fn len(&self) -> usize {
        self.indexer.flat_size()
    }

    /// Check if the index set is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tensor index of a flat index
    pub fn tensor_index(&self, flat: usize) -> &[usize] {
        assert!(flat < self.len(), "Flat index {flat} out of range");
        let dim = self.indexer.dim();
        &self.table[flat * dim..(flat + 1) * dim]
    }
}
