use std::path::PathBuf;

use quiz_session::models::CATALOG_KEY;
use quiz_session::{load_catalog, FileStore, KvStore, Question, QuizCatalog};
use tokio_test::assert_ok;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("quiz_catalog_{}_{}", name, std::process::id()))
}

#[tokio::test]
async fn first_load_seeds_the_store_and_second_load_reads_it() {
    let dir = temp_dir("seed");
    let _ = std::fs::remove_dir_all(&dir);
    let store = FileStore::new(&dir);

    let first = assert_ok!(load_catalog(&store, CATALOG_KEY).await);
    assert_eq!(first, assert_ok!(QuizCatalog::builtin()));
    assert!(dir.join("quiz_questions.json").exists());

    let second = assert_ok!(load_catalog(&store, CATALOG_KEY).await);
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn custom_catalog_survives_reload() {
    let dir = temp_dir("custom");
    let store = FileStore::new(&dir);
    let custom = vec![
        Question::new("Largest ocean?", ["Atlantic", "Pacific", "Indian"], 1),
        Question::new("Boiling point of water (°C)?", ["90", "100"], 1),
    ];
    let blob = serde_json::to_string(&custom).expect("序列化失败");
    assert_ok!(store.save("custom_set", &blob).await);

    let catalog = assert_ok!(load_catalog(&store, "custom_set").await);
    assert_eq!(catalog.questions(), custom.as_slice());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn corrupt_file_is_replaced_by_builtin_set() {
    let dir = temp_dir("corrupt");
    std::fs::create_dir_all(&dir).expect("创建目录失败");
    std::fs::write(dir.join("quiz_questions.json"), "{ not valid").expect("写入失败");

    let store = FileStore::new(&dir);
    let catalog = assert_ok!(load_catalog(&store, CATALOG_KEY).await);
    assert_eq!(catalog.len(), 3);

    let rewritten = assert_ok!(store.load(CATALOG_KEY).await).expect("应已写回内置题库");
    let questions: Vec<Question> = serde_json::from_str(&rewritten).expect("写回内容应可解析");
    assert_eq!(questions.len(), 3);

    let _ = std::fs::remove_dir_all(dir);
}
