use rayon::prelude::*;

/// Map `f` over `items`, keeping results at their input index.
///
/// `jobs <= 1` runs inline on the caller's thread. Otherwise a dedicated rayon
/// pool of `jobs` threads is used; if it cannot be built the map runs inline.
pub fn map_ordered<T, U, F>(items: &[T], jobs: usize, f: F) -> Vec<U>
where
  T: Sync,
  U: Send,
  F: Fn(&T) -> U + Sync + Send,
{
  if jobs <= 1 || items.len() <= 1 {
    return items.iter().map(f).collect();
  }

  match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
    Ok(pool) => pool.install(|| items.par_iter().map(&f).collect()),
    Err(e) => {
      tracing::warn!(error = %e, jobs, "thread pool unavailable; fetching sequentially");
      items.iter().map(f).collect()
    }
  }
}
