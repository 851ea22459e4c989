//! 终端应用 - 编排层
//!
//! 加载题库，读取标准输入，把会话事件打印到标准输出。
//! 输入：选项编号作答，`r` 重新开始，`q` 退出。

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::FileStore;
use crate::models::{load_catalog, QuizCatalog};
use crate::orchestrator::session_actor::{spawn_session, SessionHandle};
use crate::utils::logging::{log_startup, print_final_stats, truncate_text};
use crate::workflow::SessionEvent;

type Input = Lines<BufReader<Stdin>>;

/// 一轮测验的结束方式
enum RoundEnd {
    Finished,
    Restarted,
    Quit,
}

/// 应用主结构
pub struct App {
    config: Config,
    catalog: Arc<QuizCatalog>,
}

impl App {
    /// 初始化应用：加载题库
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = FileStore::new(&config.store_dir);
        let catalog = load_catalog(&store, &config.catalog_key)
            .await
            .context("加载题库失败")?;

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let (handle, mut events) = spawn_session(&self.config);
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        loop {
            if !self.ask_name_and_start(&handle, &mut input).await? {
                break;
            }

            match self.play_round(&handle, &mut events, &mut input).await? {
                RoundEnd::Finished => {
                    let snapshot = handle.snapshot().await?;
                    let results = handle.results().await?;
                    print_final_stats(&snapshot.participant_name, &results);
                    handle.restart().await?;
                    drain(&mut events);
                    println!("\n再来一次? (y/n)");
                    match input.next_line().await? {
                        Some(line) if line.trim().eq_ignore_ascii_case("y") => continue,
                        _ => break,
                    }
                }
                RoundEnd::Restarted => {
                    handle.restart().await?;
                    drain(&mut events);
                    println!("🔄 已重新开始");
                }
                RoundEnd::Quit => break,
            }
        }

        handle.restart().await?;
        info!("👋 程序结束");
        Ok(())
    }

    /// 读取名字并开始测验，输入结束时返回 false
    async fn ask_name_and_start(&self, handle: &SessionHandle, input: &mut Input) -> Result<bool> {
        loop {
            println!("请输入你的名字:");
            let Some(line) = input.next_line().await? else {
                return Ok(false);
            };

            match handle
                .start(line, self.catalog.clone(), self.config.timer_duration_secs)
                .await
            {
                Ok(()) => return Ok(true),
                Err(e) if e.is_validation() => println!("⚠️ {}", e),
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn play_round(
        &self,
        handle: &SessionHandle,
        events: &mut mpsc::UnboundedReceiver<SessionEvent>,
        input: &mut Input,
    ) -> Result<RoundEnd> {
        loop {
            tokio::select! {
                event = events.recv() => {
                    let event = event.context("会话任务意外结束")?;
                    render(&event);
                    if event.is_finished() {
                        return Ok(RoundEnd::Finished);
                    }
                }
                line = input.next_line() => {
                    let Some(line) = line? else {
                        return Ok(RoundEnd::Quit);
                    };
                    match line.trim() {
                        "q" => return Ok(RoundEnd::Quit),
                        "r" => return Ok(RoundEnd::Restarted),
                        other => submit(handle, other).await?,
                    }
                }
            }
        }
    }
}

/// 提交作答，输入的编号从 1 开始
async fn submit(handle: &SessionHandle, raw: &str) -> Result<()> {
    let Some(option_index) = raw.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
        println!("请输入选项编号，r 重新开始，q 退出");
        return Ok(());
    };

    match handle.answer(option_index).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_validation() || e.is_state() => {
            warn!("作答被拒绝: {}", e);
            println!("⚠️ {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// 丢弃上一轮遗留的事件
fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while events.try_recv().is_ok() {}
}

fn render(event: &SessionEvent) {
    match event {
        SessionEvent::QuestionPresented {
            question,
            index,
            remaining_time,
            score_so_far,
        } => {
            debug!("展示第 {} 题: {}", index + 1, truncate_text(&question.prompt, 40));
            println!("\n得分: {}  |  剩余时间: {} 秒", score_so_far, remaining_time);
            println!("第 {} 题: {}", index + 1, question.prompt);
            for (i, option) in question.options.iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }
        }
        SessionEvent::TimedOut { participant_name } => {
            println!("⏰ {}，时间到！本题不计分", participant_name);
        }
        SessionEvent::Finished {
            participant_name,
            final_score,
            total_questions,
        } => {
            println!(
                "\n🏁 {}，你的最终得分: {}/{}",
                participant_name, final_score, total_questions
            );
        }
    }
}
