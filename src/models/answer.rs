use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// 参与者对一道题的作答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "option", rename_all = "snake_case")]
pub enum Selection {
    /// 选择了某个选项
    Chosen(usize),
    /// 超时未作答，永远不计分
    NoSelection,
}

impl Selection {
    /// 选中的选项索引，未作答时为 `None`
    pub fn option(self) -> Option<usize> {
        match self {
            Selection::Chosen(index) => Some(index),
            Selection::NoSelection => None,
        }
    }

    pub fn is_chosen(self) -> bool {
        matches!(self, Selection::Chosen(_))
    }
}

/// 作答记录：题目索引 → 作答
///
/// 未作答的题目没有条目（包括当前题目在作答之前）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    entries: BTreeMap<usize, Selection>,
}

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录作答，覆盖该题已有的记录
    pub fn record(&mut self, question_index: usize, selection: Selection) {
        self.entries.insert(question_index, selection);
    }

    pub fn get(&self, question_index: usize) -> Option<Selection> {
        self.entries.get(&question_index).copied()
    }

    pub fn contains(&self, question_index: usize) -> bool {
        self.entries.contains_key(&question_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Selection)> + '_ {
        self.entries.iter().map(|(index, selection)| (*index, *selection))
    }

    /// 真正选择了选项的题目数量
    pub fn chosen_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_chosen()).count()
    }

    /// 答对的题目数量
    pub fn score(&self, questions: &[Question]) -> usize {
        self.iter()
            .filter(|(index, selection)| match (selection.option(), questions.get(*index)) {
                (Some(option), Some(question)) => question.is_correct(option),
                _ => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("a", ["x", "y"], 0),
            Question::new("b", ["x", "y"], 1),
        ]
    }

    #[test]
    fn no_selection_never_scores() {
        let mut record = AnswerRecord::new();
        record.record(0, Selection::NoSelection);
        record.record(1, Selection::Chosen(1));
        assert_eq!(record.score(&questions()), 1);
        assert_eq!(record.chosen_count(), 1);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn option_zero_is_distinct_from_absent() {
        let mut record = AnswerRecord::new();
        assert_eq!(record.get(0), None);
        record.record(0, Selection::Chosen(0));
        assert_eq!(record.get(0), Some(Selection::Chosen(0)));
        assert!(!record.contains(1));
    }

    #[test]
    fn rerecording_overwrites() {
        let mut record = AnswerRecord::new();
        record.record(0, Selection::Chosen(1));
        record.record(0, Selection::Chosen(0));
        assert_eq!(record.len(), 1);
        assert_eq!(record.score(&questions()), 1);
    }
}
