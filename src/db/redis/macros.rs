/// Read-through caching around an async computation.
///
/// Returns the cached value when `$key` is present. Otherwise awaits `$block`,
/// queues its result for a background write with `$ttl` seconds to live, and
/// returns it. Errors from the cache read or from `$block` propagate with `?`, so
/// the macro must be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// cached!(cache, CacheKey::Candidates(fingerprint), 300, async {
///     fetch_from_upstream().await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
