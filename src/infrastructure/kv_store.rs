use std::future::Future;

use crate::error::StoreError;

/// 键值存储
///
/// 题库以序列化后的文本保存，存储本身不关心内容格式。
pub trait KvStore: Send + Sync {
    /// 保存键值，覆盖已有内容
    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// 读取键值，不存在时返回 `None`
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}
