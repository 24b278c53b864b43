/// Default number of shards a large batch is split into
pub const DEFAULT_SHARD_COUNT: usize = 4;

/// Split `items` into exactly `shard_count` contiguous shards.
///
/// The first `shard_count - 1` shards take `items.len() / shard_count` items
/// each and the last shard takes whatever is left, so it can be larger than
/// the others. When there are fewer items than shards the leading shards take
/// one item each until the input runs out and the rest stay empty.
///
/// Order is preserved: concatenating the shards yields `items` again.
/// A `shard_count` of zero is treated as one.
#[must_use]
pub fn partition<T>(items: Vec<T>, shard_count: usize) -> Vec<Vec<T>> {
    let shard_count = shard_count.max(1);
    let per_shard = (items.len() / shard_count).max(1);

    let mut shards = Vec::with_capacity(shard_count);
    let mut rest = items.into_iter();
    for _ in 0..shard_count - 1 {
        shards.push(rest.by_ref().take(per_shard).collect());
    }
    shards.push(rest.collect());
    shards
}
