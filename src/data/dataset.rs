/// A finite collection of instances with a stable iteration order.
///
/// A `Dataset` is responsible only for *providing access* to instances, it doesn't know
/// what an instance means. Every cursor created over the same dataset visits the
/// instances in the same order.
pub trait Dataset: Sync {
    /// Instance type produced by this dataset.
    type Instance;

    /// Cursor type walking this dataset.
    type Cursor<'a>: Cursor<Instance = Self::Instance>
    where
        Self: 'a;

    /// Returns the amount of instances.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new cursor positioned at the first instance.
    fn cursor(&self) -> Self::Cursor<'_>;
}

/// A sequential, restartable and skip-capable position over a `Dataset`.
pub trait Cursor {
    type Instance;

    /// Moves back to the first instance.
    fn start(&mut self);

    /// Returns whether the cursor went past the last instance.
    fn is_end(&self) -> bool;

    /// Moves to the next instance, does nothing at the end.
    fn advance(&mut self);

    /// Skips `n` instances, `skip(1)` is equivalent to `advance()`.
    fn skip(&mut self, n: usize);

    /// Returns the current instance, `None` once `is_end` is true.
    fn instance(&self) -> Option<&Self::Instance>;
}

/// A dataset holding its instances in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDataset<I> {
    instances: Vec<I>,
}

impl<I> InMemoryDataset<I> {
    pub fn new(instances: Vec<I>) -> Self {
        Self { instances }
    }

    pub fn push(&mut self, instance: I) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[I] {
        &self.instances
    }
}

impl<I> FromIterator<I> for InMemoryDataset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<I: Sync> Dataset for InMemoryDataset<I> {
    type Instance = I;
    type Cursor<'a>
        = InMemoryCursor<'a, I>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.instances.len()
    }

    fn cursor(&self) -> InMemoryCursor<'_, I> {
        InMemoryCursor {
            instances: &self.instances,
            index: 0,
        }
    }
}

/// Cursor over an `InMemoryDataset`.
#[derive(Debug, Clone)]
pub struct InMemoryCursor<'a, I> {
    instances: &'a [I],
    index: usize,
}

impl<I> Cursor for InMemoryCursor<'_, I> {
    type Instance = I;

    fn start(&mut self) {
        self.index = 0;
    }

    fn is_end(&self) -> bool {
        self.index >= self.instances.len()
    }

    fn advance(&mut self) {
        if !self.is_end() {
            self.index += 1;
        }
    }

    fn skip(&mut self, n: usize) {
        self.index = self.index.saturating_add(n);
    }

    fn instance(&self) -> Option<&I> {
        self.instances.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_in_order_and_restarts() {
        let set: InMemoryDataset<u32> = (10..13).collect();
        assert_eq!(set.len(), 3);

        let mut cursor = set.cursor();
        let mut seen = Vec::new();
        while let Some(&i) = cursor.instance() {
            seen.push(i);
            cursor.advance();
        }
        assert_eq!(seen, vec![10, 11, 12]);
        assert!(cursor.is_end());

        cursor.advance();
        assert!(cursor.is_end());

        cursor.start();
        assert_eq!(cursor.instance(), Some(&10));
    }

    #[test]
    fn skipping_past_the_end() {
        let set = InMemoryDataset::new(vec!['a', 'b', 'c']);
        let mut cursor = set.cursor();

        cursor.skip(2);
        assert_eq!(cursor.instance(), Some(&'c'));

        cursor.skip(5);
        assert!(cursor.is_end());
        assert_eq!(cursor.instance(), None);
    }

    #[test]
    fn empty_dataset_starts_at_end() {
        let set = InMemoryDataset::<f64>::new(Vec::new());
        assert!(set.is_empty());
        assert!(set.cursor().is_end());
    }
}
