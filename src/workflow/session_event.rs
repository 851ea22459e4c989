//! 会话事件
//!
//! 会话向展示层发出的三类事件。

use serde::Serialize;

use crate::models::question::Question;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 展示一道题
    QuestionPresented {
        question: Question,
        index: usize,
        remaining_time: u32,
        score_so_far: usize,
    },
    /// 当前题目超时
    TimedOut { participant_name: String },
    /// 测验结束
    Finished {
        participant_name: String,
        final_score: usize,
        total_questions: usize,
    },
}

impl SessionEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionEvent::Finished { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionEvent::TimedOut { .. })
    }
}
