//! 测验会话 - 流程层
//!
//! 核心职责：一次作答的完整状态机
//!
//! ```text
//! NotStarted --start--> InProgress --answer/tick(最后一题)--> Finished
//!      ^                                                         |
//!      +------------------------ restart ------------------------+
//! ```
//!
//! - 会话独占计时器，每次换题或换阶段都先停止再启动
//! - 被拒绝的操作不改变任何状态
//! - 不做 I/O，所有结果以 [`SessionEvent`] 返回

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TimerScope;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::{SessionTimer, TimerTick};
use crate::models::{AnswerRecord, Question, QuizCatalog, Selection};
use crate::workflow::session_event::SessionEvent;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::NotStarted => "NotStarted",
            Phase::InProgress => "InProgress",
            Phase::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 会话状态快照，供展示层查询
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub participant_name: String,
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub remaining_time: u32,
    pub score: usize,
    pub answered: usize,
}

/// 单题结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuestionOutcome {
    Correct,
    Wrong { chosen: usize },
    /// 超时未作答，是否算作"已作答"由展示层决定
    TimedOut,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub index: usize,
    pub prompt: String,
    pub outcome: QuestionOutcome,
}

/// 测验会话
pub struct QuizSession<T: SessionTimer> {
    catalog: Option<Arc<QuizCatalog>>,
    participant_name: String,
    phase: Phase,
    current_index: usize,
    answers: AnswerRecord,
    remaining_time: u32,
    duration: u32,
    scope: TimerScope,
    timer: T,
}

impl<T: SessionTimer> QuizSession<T> {
    /// 创建未开始的会话
    pub fn new(timer: T, scope: TimerScope) -> Self {
        Self {
            catalog: None,
            participant_name: String::new(),
            phase: Phase::NotStarted,
            current_index: 0,
            answers: AnswerRecord::new(),
            remaining_time: 0,
            duration: 0,
            scope,
            timer,
        }
    }

    // ========== 状态转移 ==========

    /// 开始测验
    ///
    /// # 参数
    /// - `name`: 参与者名字（去掉首尾空白后不能为空）
    /// - `catalog`: 题库
    /// - `duration_secs`: 每题（或整场）的计时时长
    ///
    /// # 返回
    /// 第一道题的 `QuestionPresented` 事件
    pub fn start(
        &mut self,
        name: &str,
        catalog: Arc<QuizCatalog>,
        duration_secs: u32,
    ) -> AppResult<Vec<SessionEvent>> {
        self.ensure_phase(Phase::NotStarted, "start")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyParticipantName.into());
        }
        if catalog.is_empty() {
            return Err(ValidationError::EmptyCatalog.into());
        }
        if duration_secs == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }

        self.participant_name = name.to_string();
        self.catalog = Some(catalog);
        self.current_index = 0;
        self.answers.clear();
        self.duration = duration_secs;
        self.remaining_time = duration_secs;
        self.phase = Phase::InProgress;
        self.timer.arm();

        info!(
            "🚀 {} 开始测验: {} 道题, 计时 {} 秒 ({:?})",
            self.participant_name,
            self.total_questions(),
            duration_secs,
            self.scope
        );

        Ok(vec![self.present_current()])
    }

    /// 计时器节拍（每秒一次）
    ///
    /// 非进行中或剩余时间已为 0 时不做任何事。
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if self.phase != Phase::InProgress || self.remaining_time == 0 {
            return Vec::new();
        }

        self.remaining_time -= 1;
        debug!(
            "题目 {} 剩余 {} 秒",
            self.current_index + 1,
            self.remaining_time
        );

        if self.remaining_time > 0 {
            return Vec::new();
        }
        self.handle_timeout()
    }

    /// 处理来自计时器的节拍，丢弃旧计时器遗留的节拍
    pub fn on_timer_tick(&mut self, tick: TimerTick) -> Vec<SessionEvent> {
        if !self.timer.is_current(tick) {
            debug!("丢弃过期节拍 (代数 {})", tick.generation);
            return Vec::new();
        }
        self.tick()
    }

    /// 作答当前题目
    pub fn answer(&mut self, option_index: usize) -> AppResult<Vec<SessionEvent>> {
        self.ensure_phase(Phase::InProgress, "answer")?;

        let Some(question) = self.current_question() else {
            return Err(AppError::invalid_phase("answer", self.phase.name()));
        };
        if !question.has_option(option_index) {
            return Err(AppError::option_out_of_range(
                option_index,
                question.option_count(),
            ));
        }

        self.answers
            .record(self.current_index, Selection::Chosen(option_index));
        debug!(
            "题目 {} 选择了选项 {}",
            self.current_index + 1,
            option_index + 1
        );

        let mut events = Vec::new();
        self.advance_or_finish(&mut events);
        Ok(events)
    }

    /// 重新开始，任何阶段都可以调用
    pub fn restart(&mut self) {
        self.timer.disarm();
        self.catalog = None;
        self.participant_name.clear();
        self.phase = Phase::NotStarted;
        self.current_index = 0;
        self.answers.clear();
        self.remaining_time = 0;
        self.duration = 0;
        info!("🔄 会话已重置");
    }

    // ========== 查询 ==========

    /// 当前得分
    pub fn score(&self) -> usize {
        self.answers.score(self.questions())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn total_questions(&self) -> usize {
        self.questions().len()
    }

    /// 正在作答的题目，仅进行中时有值
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.catalog.as_deref()?.get(self.current_index)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            participant_name: self.participant_name.clone(),
            phase: self.phase,
            current_index: self.current_index,
            total_questions: self.total_questions(),
            remaining_time: self.remaining_time,
            score: self.score(),
            answered: self.answers.chosen_count(),
        }
    }

    /// 每道题的结果
    pub fn results(&self) -> Vec<QuestionResult> {
        self.questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let outcome = match self.answers.get(index) {
                    Some(Selection::Chosen(chosen)) if question.is_correct(chosen) => {
                        QuestionOutcome::Correct
                    }
                    Some(Selection::Chosen(chosen)) => QuestionOutcome::Wrong { chosen },
                    Some(Selection::NoSelection) => QuestionOutcome::TimedOut,
                    None => QuestionOutcome::Unanswered,
                };
                QuestionResult {
                    index,
                    prompt: question.prompt.clone(),
                    outcome,
                }
            })
            .collect()
    }

    // ========== 内部辅助方法 ==========

    fn questions(&self) -> &[Question] {
        self.catalog
            .as_deref()
            .map(QuizCatalog::questions)
            .unwrap_or(&[])
    }

    fn ensure_phase(&self, expected: Phase, operation: &'static str) -> AppResult<()> {
        if self.phase != expected {
            return Err(AppError::invalid_phase(operation, self.phase.name()));
        }
        Ok(())
    }

    fn handle_timeout(&mut self) -> Vec<SessionEvent> {
        warn!(
            "⏰ {} 第 {} 题超时",
            self.participant_name,
            self.current_index + 1
        );

        let mut events = vec![SessionEvent::TimedOut {
            participant_name: self.participant_name.clone(),
        }];

        match self.scope {
            TimerScope::PerQuestion => {
                self.answers
                    .record(self.current_index, Selection::NoSelection);
                self.advance_or_finish(&mut events);
            }
            TimerScope::PerSession => {
                for index in self.current_index..self.total_questions() {
                    if !self.answers.contains(index) {
                        self.answers.record(index, Selection::NoSelection);
                    }
                }
                self.finish(&mut events);
            }
        }
        events
    }

    fn advance_or_finish(&mut self, events: &mut Vec<SessionEvent>) {
        if self.current_index + 1 >= self.total_questions() {
            self.finish(events);
            return;
        }

        self.current_index += 1;
        if self.scope == TimerScope::PerQuestion {
            self.remaining_time = self.duration;
            // 重新计时，旧计时器遗留的节拍会因代数不符被丢弃
            self.timer.arm();
        }
        events.push(self.present_current());
    }

    fn finish(&mut self, events: &mut Vec<SessionEvent>) {
        self.timer.disarm();
        self.phase = Phase::Finished;

        let final_score = self.score();
        let total_questions = self.total_questions();
        info!(
            "🏁 {} 完成测验: 得分 {}/{}",
            self.participant_name, final_score, total_questions
        );

        events.push(SessionEvent::Finished {
            participant_name: self.participant_name.clone(),
            final_score,
            total_questions,
        });
    }

    fn present_current(&self) -> SessionEvent {
        SessionEvent::QuestionPresented {
            question: self.questions()[self.current_index].clone(),
            index: self.current_index,
            remaining_time: self.remaining_time,
            score_so_far: self.score(),
        }
    }
}
