//! 题库
//!
//! 一次测验使用的有序、不可变题目集合。加载逻辑见 `loaders::catalog_loader`。

use crate::error::{CatalogError, ValidationError};
use crate::models::question::Question;

/// 题库（加载后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizCatalog {
    questions: Vec<Question>,
}

impl QuizCatalog {
    /// 创建题库，校验所有题目
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyCatalog);
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self { questions })
    }

    /// 内置题库
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_builtin(builtin_questions())
    }

    fn from_builtin(questions: Vec<Question>) -> Result<Self, CatalogError> {
        Ok(Self::new(questions)?)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }
}

/// 内置的示例题目
pub fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new(
            "What is the capital of France?",
            ["Paris", "London", "Berlin", "Rome"],
            0,
        ),
        Question::new(
            "Who wrote \"Romeo and Juliet\"?",
            [
                "William Shakespeare",
                "Jane Austen",
                "Leo Tolstoy",
                "Charles Dickens",
            ],
            3,
        ),
        Question::new(
            "Which planet is known as the Red Planet?",
            ["Mars", "Venus", "Jupiter", "Saturn"],
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_sample_answers() {
        let catalog = QuizCatalog::builtin().unwrap();
        let correct: Vec<usize> = catalog
            .questions()
            .iter()
            .map(|q| q.correct_option_index)
            .collect();
        assert_eq!(correct, vec![0, 3, 0]);
        assert_eq!(catalog.last_index(), 2);
    }

    #[test]
    fn rejects_empty_and_invalid_lists() {
        assert_eq!(QuizCatalog::new(vec![]), Err(ValidationError::EmptyCatalog));
        let bad = vec![
            Question::new("ok", ["a", "b"], 0),
            Question::new("bad", ["a", "b"], 5),
        ];
        assert!(matches!(
            QuizCatalog::new(bad),
            Err(ValidationError::InvalidQuestion { index: 1, .. })
        ));
    }

    #[test]
    fn builtin_failures_keep_their_cause() {
        assert!(matches!(
            QuizCatalog::from_builtin(vec![]),
            Err(CatalogError::EmptyBuiltIn)
        ));
        let err = QuizCatalog::from_builtin(vec![Question::new("only one", ["a"], 0)]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidBuiltIn(ValidationError::InvalidQuestion { index: 0, .. })
        ));
        assert!(err.to_string().starts_with("内置题库不合法"));
    }
}
