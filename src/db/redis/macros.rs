/// Read-through caching for async fetches.
///
/// Returns the cached value for `$key` when present. On a miss the `$fetch`
/// future is awaited, its value is queued for caching with `$ttl` seconds to
/// live, and then returned. A failed cache read is logged and treated as a
/// miss so an unavailable Redis degrades to uncached behaviour. Errors from
/// `$fetch` are propagated with `?`.
///
/// # Example
/// ```ignore
/// let payload: serde_json::Value = cached!(cache, CacheKey::Popular, 3600, fetch_popular())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(hit)) => {
                ::tracing::debug!(key = %key, "Cache hit");
                Ok(hit)
            }
            outcome => {
                if let Err(e) = outcome {
                    ::tracing::warn!(
                        error = %e,
                        key = %key,
                        "Cache read failed, fetching upstream"
                    );
                }
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
