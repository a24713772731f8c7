//! Tables of the dynamic programming passes.
//!
//! Every table answers reads outside of its extent with a sentinel value
//! (the "upperbound"), so recursions can read neighbouring cells without
//! bound checks of their own.

/// Dense 2-D table over a fill window. Rows are relative to the window start.
#[derive(Debug, Clone)]
pub struct DPTable<T> {
    mem: Vec<T>,
    rows: usize,
    cols: usize,
    upperbound: T,
}

impl<T: Copy> DPTable<T> {
    pub fn new(rows: usize, cols: usize, ub: T) -> Self {
        let mut mem = Vec::with_capacity(rows * cols);
        mem.extend(std::iter::repeat(ub).take(rows * cols));
        Self {
            mem,
            rows,
            cols,
            upperbound: ub,
        }
    }
    /// Resize to `rows x cols` and reset every cell. The allocation is reused.
    pub fn initialize(&mut self, rows: usize, cols: usize, ub: T) {
        self.mem.clear();
        self.mem.extend(std::iter::repeat(ub).take(rows * cols));
        self.rows = rows;
        self.cols = cols;
        self.upperbound = ub;
    }
    pub fn upperbound(&self) -> T {
        self.upperbound
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn get(&self, i: usize, j: usize) -> T {
        if i < self.rows && j < self.cols {
            self.mem[i * self.cols + j]
        } else {
            self.upperbound
        }
    }
    pub fn set(&mut self, i: usize, j: usize, target: T) {
        if let Some(slot) = self.get_mut(i, j) {
            *slot = target;
        }
    }
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.rows && j < self.cols {
            self.mem.get_mut(i * self.cols + j)
        } else {
            None
        }
    }
    /// Cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let cols = self.cols.max(1);
        self.mem
            .iter()
            .enumerate()
            .map(move |(idx, &x)| (idx / cols, idx % cols, x))
    }
}

/// Dense N-dimensional recursion tensor.
#[derive(Debug, Clone)]
pub struct RecTable<T, const N: usize> {
    mem: Vec<T>,
    dims: [usize; N],
    upperbound: T,
}

impl<T: Copy, const N: usize> RecTable<T, N> {
    pub fn new(dims: [usize; N], ub: T) -> Self {
        let mut table = Self {
            mem: vec![],
            dims,
            upperbound: ub,
        };
        table.initialize(dims, ub);
        table
    }
    pub fn initialize(&mut self, dims: [usize; N], ub: T) {
        let total: usize = dims.iter().product();
        self.mem.clear();
        self.mem.extend(std::iter::repeat(ub).take(total));
        self.dims = dims;
        self.upperbound = ub;
    }
    pub fn dims(&self) -> [usize; N] {
        self.dims
    }
    fn location(&self, idx: [usize; N]) -> Option<usize> {
        let mut loc = 0;
        for (&i, &d) in idx.iter().zip(self.dims.iter()) {
            if d <= i {
                return None;
            }
            loc = loc * d + i;
        }
        Some(loc)
    }
    pub fn get(&self, idx: [usize; N]) -> T {
        match self.location(idx) {
            Some(loc) => self.mem[loc],
            None => self.upperbound,
        }
    }
    pub fn set(&mut self, idx: [usize; N], target: T) {
        if let Some(loc) = self.location(idx) {
            self.mem[loc] = target;
        }
    }
}

/// Fixed-capacity ring of the most recent values.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    mem: Vec<T>,
    // Index of the next slot to write.
    end: usize,
    len: usize,
    fill: T,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(capacity: usize, fill: T) -> Self {
        Self {
            mem: vec![fill; capacity],
            end: 0,
            len: 0,
            fill,
        }
    }
    pub fn capacity(&self) -> usize {
        self.mem.len()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn is_full(&self) -> bool {
        self.len == self.mem.len()
    }
    /// Push a value. If the ring is full, the oldest value is overwritten and returned.
    pub fn push(&mut self, x: T) -> Option<T> {
        if self.mem.is_empty() {
            return Some(x);
        }
        let evicted = if self.is_full() {
            Some(self.mem[self.end])
        } else {
            self.len += 1;
            None
        };
        self.mem[self.end] = x;
        self.end = (self.end + 1) % self.mem.len();
        evicted
    }
    /// The `k`-th most recent value, `k = 0` being the latest.
    pub fn recent(&self, k: usize) -> T {
        if self.len <= k {
            return self.fill;
        }
        let cap = self.mem.len();
        self.mem[(self.end + cap - 1 - k) % cap]
    }
    pub fn clear(&mut self) {
        let fill = self.fill;
        self.mem.iter_mut().for_each(|x| *x = fill);
        self.end = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn table_bounds() {
        let mut table = DPTable::new(3, 4, 100);
        table.set(2, 3, 1);
        table.set(3, 0, 2);
        assert_eq!(table.get(2, 3), 1);
        assert_eq!(table.get(3, 0), 100);
        assert_eq!(table.get(0, 4), 100);
        assert!(table.get_mut(0, 4).is_none());
        assert_eq!(table.iter().filter(|&(_, _, x)| x == 1).count(), 1);
        assert_eq!(table.iter().last(), Some((2, 3, 1)));
        table.initialize(2, 2, 0);
        assert_eq!(table.get(1, 1), 0);
        assert_eq!(table.get(2, 3), 0);
    }
    #[test]
    fn tensor() {
        let mut rec = RecTable::new([2, 3, 4], -1i64);
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    rec.set([i, j, k], (i * 100 + j * 10 + k) as i64);
                }
            }
        }
        assert_eq!(rec.get([1, 2, 3]), 123);
        assert_eq!(rec.get([0, 1, 0]), 10);
        assert_eq!(rec.get([1, 3, 0]), -1);
        assert_eq!(rec.get([2, 0, 0]), -1);
    }
    #[test]
    fn ring() {
        let mut ring = RingBuffer::new(3, 0);
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.push(3), None);
        assert!(ring.is_full());
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.recent(0), 4);
        assert_eq!(ring.recent(2), 2);
        assert_eq!(ring.recent(3), 0);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.recent(0), 0);
        let mut empty = RingBuffer::new(0, 0);
        assert_eq!(empty.push(5), Some(5));
    }
}
