use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 单选题
///
/// 序列化格式为 `{ prompt, options, correctOptionIndex }`，
/// 读取时兼容旧格式的 `question` / `correctAnswer` 字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub correct_option_index: usize,
}

impl Question {
    /// 创建新题目（不做校验，见 [`Question::validate`]）
    pub fn new(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_option_index: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option_index,
        }
    }

    /// 校验题目
    ///
    /// # 参数
    /// - `index`: 题目在题库中的位置（仅用于错误信息）
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidQuestion {
            index,
            reason: reason.to_string(),
        };

        if self.prompt.trim().is_empty() {
            return Err(invalid("题干为空"));
        }
        if self.options.len() < 2 {
            return Err(invalid("选项少于 2 个"));
        }
        if self.correct_option_index >= self.options.len() {
            return Err(invalid("正确答案索引超出选项范围"));
        }
        Ok(())
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// 判断选项索引是否合法
    pub fn has_option(&self, option_index: usize) -> bool {
        option_index < self.options.len()
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} 个选项)", self.prompt, self.options.len())
    }
}
