use super::{Bucket, Dataset, SkipDataset};

/// Returns the skip pattern of `worker_id` in an interleaved split among `num_workers`.
///
/// Worker `w` owns the instances whose index `i` satisfies `i % num_workers == w`.
pub fn interleaved_buckets(worker_id: usize, num_workers: usize) -> [Bucket; 3] {
    assert!(num_workers > 0);
    assert!(worker_id < num_workers, "worker_id out of range");

    [
        Bucket::Skip(worker_id),
        Bucket::Take(1),
        Bucket::Skip(num_workers - 1 - worker_id),
    ]
}

/// Splits `set` into `num_workers` disjoint interleaved shards.
///
/// Every instance of `set` belongs to exactly one shard, shards are returned in worker
/// order. Shards of workers past the last instance are empty.
pub fn interleaved<D: Dataset>(set: &D, num_workers: usize) -> Vec<SkipDataset<'_, D>> {
    (0..num_workers)
        .map(|worker_id| SkipDataset::new(set, &interleaved_buckets(worker_id, num_workers)))
        .collect()
}
