pub mod answer;
pub mod catalog;
pub mod loaders;
pub mod question;

pub use answer::{AnswerRecord, Selection};
pub use catalog::QuizCatalog;
pub use loaders::{load_catalog, CATALOG_KEY};
pub use question::Question;
