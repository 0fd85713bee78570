//! Row-aligned parallel iteration over image-shaped slices.
//!
//! Every chunk handed out covers whole rows and no two chunks overlap, so
//! callers can write into their chunk without synchronization.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};


/// Multiplier for number of chunks relative to worker threads.
/// Extra chunks let fast workers pick up the slack of slow ones.
const CHUNKS_PER_THREAD: usize = 3;

/// Rows per chunk so that `height` rows split into at most
/// `threads * CHUNKS_PER_THREAD` chunks. Never returns 0.
#[inline]
pub fn rows_per_chunk(height: usize, threads: usize) -> usize {
    let num_chunks = threads.max(1) * CHUNKS_PER_THREAD;
    height.div_ceil(num_chunks).max(1)
}

/// Split `data` into mutable chunks of `chunk_rows` complete rows.
///
/// Yields `(chunk_start_row, chunk)` pairs. The last chunk may hold fewer rows.
///
/// # Panics
///
/// Panics if `width` is 0 or `data.len()` is not a multiple of `width`.
pub fn par_rows_mut<'a, T: Send + 'a>(
    data: &'a mut [T],
    width: usize,
    chunk_rows: usize,
) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])> {
    assert!(width > 0, "width must be > 0");
    assert_eq!(
        data.len() % width,
        0,
        "slice length must be a whole number of rows"
    );
    let chunk_rows = chunk_rows.max(1);
    data.par_chunks_mut(width * chunk_rows)
        .enumerate()
        .map(move |(chunk_idx, chunk)| (chunk_idx * chunk_rows, chunk))
}

/// [`par_rows_mut`] with the chunk size derived from the current rayon pool.
///
/// Inside `ThreadPool::install` this sizes chunks for that pool.
pub fn par_rows_mut_auto<'a, T: Send + 'a>(
    data: &'a mut [T],
    width: usize,
) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])> {
    let height = if width == 0 { 0 } else { data.len() / width };
    let chunk_rows = rows_per_chunk(height, rayon::current_num_threads());
    par_rows_mut(data, width, chunk_rows)
}

/// Build a dedicated pool with exactly `threads` workers named `<prefix>-<i>`.
///
/// # Panics
///
/// Panics if `threads` is 0; rayon would otherwise pick a default size.
pub fn worker_pool(threads: usize, prefix: &str) -> Result<ThreadPool, ThreadPoolBuildError> {
    assert!(threads > 0, "threads must be > 0");
    let prefix = prefix.to_owned();
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("{prefix}-{i}"))
        .build()
}
