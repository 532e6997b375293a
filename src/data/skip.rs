use super::{Cursor, Dataset};

/// One step of a skip pattern over an inner dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Hides the next `n` instances.
    Skip(usize),
    /// Exposes the next `n` instances.
    Take(usize),
}

/// A view over another dataset exposing only part of its instances.
///
/// The bucket pattern given at construction is repeated until the inner dataset is
/// exhausted. It's stored as a list of skips: `skips[0]` instances are skipped before the
/// first exposed one, then `skips[i]` inner instances separate the i-th exposed instance
/// from the next one. Once the list wraps around, `skips[0]` is applied again.
#[derive(Debug, Clone)]
pub struct SkipDataset<'d, D> {
    inner: &'d D,
    skips: Vec<usize>,
    len: usize,
}

impl<'d, D: Dataset> SkipDataset<'d, D> {
    /// Creates a new `SkipDataset` over `inner`.
    ///
    /// # Arguments
    /// * `inner` - The dataset to walk.
    /// * `buckets` - The pattern of skipped and taken instances.
    ///
    /// # Panics
    /// If no bucket takes at least one instance.
    pub fn new(inner: &'d D, buckets: &[Bucket]) -> Self {
        let skips = skips_from(buckets);
        let len = count_taken(&skips, inner.len());
        Self { inner, skips, len }
    }

    pub fn skips(&self) -> &[usize] {
        &self.skips
    }
}

fn skips_from(buckets: &[Bucket]) -> Vec<usize> {
    let mut skips = Vec::new();
    let mut skip = 0;

    for bucket in buckets {
        match *bucket {
            Bucket::Skip(n) => skip += n,
            Bucket::Take(n) => {
                for _ in 0..n {
                    skips.push(skip);
                    skip = 1;
                }
            }
        }
    }

    assert!(
        !skips.is_empty(),
        "a skip pattern must take at least one instance"
    );

    skips.push(skip);
    skips
}

/// Walks the pattern the same way `SkipCursor` does and counts the landings before `total`.
fn count_taken(skips: &[usize], total: usize) -> usize {
    let mut position = skips[0];
    let mut index = 1;
    let mut taken = 0;

    while position < total {
        taken += 1;
        position += skips[index];
        index = (index + 1) % skips.len();
        if index == 0 {
            position += skips[0];
            index = 1;
        }
    }

    taken
}

impl<D: Dataset> Dataset for SkipDataset<'_, D> {
    type Instance = D::Instance;
    type Cursor<'a>
        = SkipCursor<'a, D::Cursor<'a>>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.len
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let mut cursor = SkipCursor {
            inner: self.inner.cursor(),
            skips: &self.skips,
            index: 0,
        };
        cursor.start();
        cursor
    }
}

/// Cursor over a `SkipDataset`.
#[derive(Debug, Clone)]
pub struct SkipCursor<'a, C> {
    inner: C,
    skips: &'a [usize],
    index: usize,
}

impl<C: Cursor> Cursor for SkipCursor<'_, C> {
    type Instance = C::Instance;

    fn start(&mut self) {
        self.inner.start();
        self.inner.skip(self.skips[0]);
        self.index = 1;
    }

    fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    fn advance(&mut self) {
        if self.inner.is_end() {
            return;
        }

        self.inner.skip(self.skips[self.index]);
        self.index = (self.index + 1) % self.skips.len();
        if self.index == 0 {
            self.inner.skip(self.skips[0]);
            self.index = 1;
        }
    }

    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.is_end() {
                break;
            }
            self.advance();
        }
    }

    fn instance(&self) -> Option<&C::Instance> {
        self.inner.instance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataset;

    fn six() -> InMemoryDataset<usize> {
        (0..6).collect()
    }

    fn visit<D: Dataset<Instance = usize>>(set: &D) -> Vec<usize> {
        let mut cursor = set.cursor();
        let mut seen = Vec::new();
        while let Some(&i) = cursor.instance() {
            seen.push(i);
            cursor.advance();
        }
        seen
    }

    #[test]
    fn take_one_skip_three() {
        let set = six();
        let view = SkipDataset::new(
            &set,
            &[Bucket::Skip(0), Bucket::Take(1), Bucket::Skip(3)],
        );

        assert_eq!(view.skips(), &[0, 4]);
        assert_eq!(view.len(), 2);
        assert_eq!(visit(&view), vec![0, 4]);
    }

    #[test]
    fn leading_skip_only() {
        let set = six();
        let view = SkipDataset::new(&set, &[Bucket::Skip(3), Bucket::Take(1)]);

        assert_eq!(view.len(), 1);
        assert_eq!(visit(&view), vec![3]);
    }

    #[test]
    fn alternating_buckets() {
        let set = six();
        let view = SkipDataset::new(
            &set,
            &[
                Bucket::Skip(1),
                Bucket::Take(1),
                Bucket::Skip(1),
                Bucket::Take(1),
            ],
        );

        assert_eq!(view.skips(), &[1, 2, 1]);
        assert_eq!(view.len(), 3);
        assert_eq!(visit(&view), vec![1, 3, 5]);
    }

    #[test]
    fn consecutive_takes() {
        let set: InMemoryDataset<usize> = (0..7).collect();
        let view = SkipDataset::new(&set, &[Bucket::Take(2), Bucket::Skip(1)]);

        assert_eq!(view.len(), 5);
        assert_eq!(visit(&view), vec![0, 1, 3, 4, 6]);
    }

    #[test]
    fn restart_and_skip() {
        let set = six();
        let view = SkipDataset::new(&set, &[Bucket::Take(1), Bucket::Skip(1)]);
        let mut cursor = view.cursor();

        cursor.skip(2);
        assert_eq!(cursor.instance(), Some(&4));

        cursor.skip(10);
        assert!(cursor.is_end());

        cursor.start();
        assert_eq!(cursor.instance(), Some(&0));
    }

    #[test]
    fn empty_inner_dataset() {
        let set = InMemoryDataset::<usize>::new(Vec::new());
        let view = SkipDataset::new(&set, &[Bucket::Take(1)]);

        assert_eq!(view.len(), 0);
        assert!(view.cursor().is_end());
    }

    #[test]
    #[should_panic(expected = "at least one instance")]
    fn pattern_without_takes_panics() {
        let set = six();
        SkipDataset::new(&set, &[Bucket::Skip(2), Bucket::Take(0)]);
    }
}
