//! 会话计时器 - 基础设施层
//!
//! 会话独占一个计时器。每次 `arm` 都会先 `disarm`，并让代数（generation）加一；
//! 节拍携带发出时的代数，消费方据此丢弃旧计时器遗留在队列中的节拍。

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// 计时器节拍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub generation: u64,
}

/// 会话计时器能力
pub trait SessionTimer {
    /// 启动计时（已启动时先停止再重新启动）
    fn arm(&mut self);

    /// 停止计时，可重复调用
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;

    /// 当前代数，每次 `arm` 加一
    fn generation(&self) -> u64;

    /// 节拍是否来自当前仍在运行的计时器
    fn is_current(&self, tick: TimerTick) -> bool {
        self.is_armed() && tick.generation == self.generation()
    }
}

/// 基于 tokio 的周期计时器
///
/// 启动后在后台任务中每个周期向 `ticks` 发送一个节拍。
pub struct IntervalTimer {
    period: Duration,
    ticks: mpsc::UnboundedSender<TimerTick>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl IntervalTimer {
    pub fn new(period: Duration, ticks: mpsc::UnboundedSender<TimerTick>) -> Self {
        Self {
            period,
            ticks,
            handle: None,
            generation: 0,
        }
    }
}

impl SessionTimer for IntervalTimer {
    fn arm(&mut self) {
        self.disarm();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let ticks = self.ticks.clone();

        self.handle = Some(tokio::spawn(async move {
            // 第一个节拍在一个周期之后
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(TimerTick { generation }).is_err() {
                    break;
                }
            }
        }));
        debug!("计时器已启动 (代数 {})", generation);
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("计时器已停止 (代数 {})", self.generation);
        }
    }

    fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// 手动计时器
///
/// 不产生节拍，由调用方自行驱动 `tick()`（例如界面的帧循环或测试）。
/// 记录启动和停止次数以便检查。
#[derive(Debug, Default)]
pub struct ManualTimer {
    armed: bool,
    generation: u64,
    arm_count: usize,
    disarm_count: usize,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_count(&self) -> usize {
        self.arm_count
    }

    /// 实际停止了运行中计时器的次数
    pub fn disarm_count(&self) -> usize {
        self.disarm_count
    }
}

impl SessionTimer for ManualTimer {
    fn arm(&mut self) {
        self.disarm();
        self.generation += 1;
        self.arm_count += 1;
        self.armed = true;
    }

    fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            self.disarm_count += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_one_tick_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = IntervalTimer::new(Duration::from_secs(1), tx);
        timer.arm();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut count = 0;
        while let Ok(tick) = rx.try_recv() {
            assert_eq!(tick.generation, 1);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_bumps_generation_and_stops_old_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = IntervalTimer::new(Duration::from_secs(1), tx);
        timer.arm();
        timer.arm();
        assert_eq!(timer.generation(), 2);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let ticks: Vec<TimerTick> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(ticks.len(), 2);
        assert!(ticks.iter().all(|t| timer.is_current(*t)));
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_is_idempotent_and_silences_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = IntervalTimer::new(Duration::from_secs(1), tx);
        timer.arm();
        timer.disarm();
        timer.disarm();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.is_current(TimerTick { generation: 1 }));
    }

    #[test]
    fn manual_timer_counts_transitions() {
        let mut timer = ManualTimer::new();
        timer.disarm();
        timer.arm();
        timer.arm();
        timer.disarm();
        assert_eq!(timer.arm_count(), 2);
        assert_eq!(timer.disarm_count(), 2);
        assert_eq!(timer.generation(), 2);
    }
}
