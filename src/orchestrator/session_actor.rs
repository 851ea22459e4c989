//! 会话任务 - 编排层
//!
//! 唯一持有 `QuizSession` 的 tokio 任务。用户命令和计时器节拍都通过队列进入
//! 同一个任务，按顺序执行，不会交错修改会话状态。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{IntervalTimer, TimerTick};
use crate::models::QuizCatalog;
use crate::workflow::{QuestionResult, QuizSession, SessionEvent, SessionSnapshot};

const COMMAND_BUFFER: usize = 32;

enum Command {
    Start {
        name: String,
        catalog: Arc<QuizCatalog>,
        duration_secs: u32,
        reply: oneshot::Sender<AppResult<()>>,
    },
    Answer {
        option_index: usize,
        reply: oneshot::Sender<AppResult<()>>,
    },
    Restart {
        reply: oneshot::Sender<()>,
    },
    Score {
        reply: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Results {
        reply: oneshot::Sender<Vec<QuestionResult>>,
    },
}

/// 会话句柄
///
/// 可以克隆；所有句柄都被丢弃后会话任务结束，计时器随之停止。
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

/// 启动会话任务
///
/// # 返回
/// 会话句柄和事件接收端
pub fn spawn_session(config: &Config) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();

    let timer = IntervalTimer::new(Duration::from_millis(config.tick_interval_ms), tick_tx);
    let session = QuizSession::new(timer, config.timer_scope);

    let actor = SessionActor {
        session,
        commands: command_rx,
        ticks: tick_rx,
        events: event_tx,
    };
    tokio::spawn(actor.run());

    (SessionHandle { commands: command_tx }, event_rx)
}

impl SessionHandle {
    /// 开始测验
    pub async fn start(
        &self,
        name: impl Into<String>,
        catalog: Arc<QuizCatalog>,
        duration_secs: u32,
    ) -> AppResult<()> {
        let name = name.into();
        self.request(|reply| Command::Start {
            name,
            catalog,
            duration_secs,
            reply,
        })
        .await?
    }

    /// 作答当前题目
    pub async fn answer(&self, option_index: usize) -> AppResult<()> {
        self.request(|reply| Command::Answer {
            option_index,
            reply,
        })
        .await?
    }

    /// 重新开始
    pub async fn restart(&self) -> AppResult<()> {
        self.request(|reply| Command::Restart { reply }).await
    }

    pub async fn score(&self) -> AppResult<usize> {
        self.request(|reply| Command::Score { reply }).await
    }

    pub async fn snapshot(&self) -> AppResult<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn results(&self) -> AppResult<Vec<QuestionResult>> {
        self.request(|reply| Command::Results { reply }).await
    }

    async fn request<R>(&self, build: impl FnOnce(oneshot::Sender<R>) -> Command) -> AppResult<R> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(build(reply_tx))
            .await
            .map_err(|_| AppError::SessionClosed)?;
        reply_rx.await.map_err(|_| AppError::SessionClosed)
    }
}

struct SessionActor {
    session: QuizSession<IntervalTimer>,
    commands: mpsc::Receiver<Command>,
    ticks: mpsc::UnboundedReceiver<TimerTick>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionActor {
    async fn run(mut self) {
        debug!("会话任务已启动");
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(tick) = self.ticks.recv() => {
                    let events = self.session.on_timer_tick(tick);
                    self.emit(events);
                }
            }
        }
        self.session.restart();
        info!("会话任务已结束");
    }

    fn handle(&mut self, command: Command) {
        // 调用方可能已放弃等待回复，发送失败可以忽略
        match command {
            Command::Start {
                name,
                catalog,
                duration_secs,
                reply,
            } => {
                let result = self
                    .session
                    .start(&name, catalog, duration_secs)
                    .map(|events| self.emit(events));
                let _ = reply.send(result);
            }
            Command::Answer {
                option_index,
                reply,
            } => {
                let result = self
                    .session
                    .answer(option_index)
                    .map(|events| self.emit(events));
                let _ = reply.send(result);
            }
            Command::Restart { reply } => {
                self.session.restart();
                let _ = reply.send(());
            }
            Command::Score { reply } => {
                let _ = reply.send(self.session.score());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Results { reply } => {
                let _ = reply.send(self.session.results());
            }
        }
    }

    fn emit(&self, events: Vec<SessionEvent>) {
        for event in events {
            if self.events.send(event).is_err() {
                debug!("事件接收端已关闭，丢弃事件");
            }
        }
    }
}
