use async_trait::async_trait;

/// 缓存查询结果
///
/// `ExistsButNoValue` 表示后端暂时不可用或键存在但取值失败，
/// 调用方应当回退到数据库查询。
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

/// 对象缓存统一接口
///
/// 所有缓存后端以字符串形式存取，序列化由调用方负责。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// ttl 为 0 时使用后端的默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}
