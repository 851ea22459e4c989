use tracing::{info, warn};

use crate::error::CatalogError;
use crate::infrastructure::KvStore;
use crate::models::catalog::QuizCatalog;
use crate::models::question::Question;

/// 题库在存储中的默认键
pub const CATALOG_KEY: &str = "quiz_questions";

/// 从存储加载题库
///
/// 读取失败、不存在、格式错误或校验不通过时，使用内置题库并写回存储。
/// 写回失败只记录日志。只有内置题库为空时才返回错误。
pub async fn load_catalog<S: KvStore>(store: &S, key: &str) -> Result<QuizCatalog, CatalogError> {
    match try_load_stored(store, key).await {
        Some(catalog) => {
            info!("✓ 从存储加载题库: {} 道题", catalog.len());
            Ok(catalog)
        }
        None => {
            let catalog = QuizCatalog::builtin()?;
            info!("使用内置题库: {} 道题", catalog.len());
            write_back(store, key, catalog.questions()).await;
            Ok(catalog)
        }
    }
}

async fn try_load_stored<S: KvStore>(store: &S, key: &str) -> Option<QuizCatalog> {
    let content = match store.load(key).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            info!("存储中没有题库 (键: {})", key);
            return None;
        }
        Err(e) => {
            warn!("⚠️ 读取题库失败，改用内置题库: {}", e);
            return None;
        }
    };

    let questions: Vec<Question> = match serde_json::from_str(&content) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("⚠️ 题库数据格式错误，改用内置题库: {}", e);
            return None;
        }
    };

    match QuizCatalog::new(questions) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("⚠️ 题库校验失败，改用内置题库: {}", e);
            None
        }
    }
}

async fn write_back<S: KvStore>(store: &S, key: &str, questions: &[Question]) {
    let content = match serde_json::to_string_pretty(questions) {
        Ok(content) => content,
        Err(e) => {
            warn!("⚠️ 序列化内置题库失败: {}", e);
            return;
        }
    };
    if let Err(e) = store.save(key, &content).await {
        warn!("⚠️ 写回内置题库失败: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    #[tokio::test]
    async fn miss_falls_back_and_writes_back() {
        let store = MemoryStore::new();
        let catalog = load_catalog(&store, CATALOG_KEY).await.unwrap();
        assert_eq!(catalog, QuizCatalog::builtin().unwrap());

        let stored = store.load(CATALOG_KEY).await.unwrap().unwrap();
        let questions: Vec<Question> = serde_json::from_str(&stored).unwrap();
        assert_eq!(questions, catalog.questions());
    }

    #[tokio::test]
    async fn stored_catalog_is_used_as_is() {
        let custom = vec![
            Question::new("1 + 1 = ?", ["1", "2"], 1),
            Question::new("2 + 2 = ?", ["4", "5", "6"], 0),
        ];
        let store = MemoryStore::with_entry(CATALOG_KEY, serde_json::to_string(&custom).unwrap());
        let catalog = load_catalog(&store, CATALOG_KEY).await.unwrap();
        assert_eq!(catalog.questions(), custom.as_slice());
    }

    #[tokio::test]
    async fn malformed_and_invalid_data_fall_back() {
        for blob in [
            "not json",
            "[]",
            r#"[{"prompt":"x","options":["a","b"],"correctOptionIndex":9}]"#,
        ] {
            let store = MemoryStore::with_entry(CATALOG_KEY, blob);
            let catalog = load_catalog(&store, CATALOG_KEY).await.unwrap();
            assert_eq!(catalog.len(), 3, "blob: {blob}");
            let rewritten = store.load(CATALOG_KEY).await.unwrap().unwrap();
            assert_ne!(rewritten, blob);
        }
    }
}
