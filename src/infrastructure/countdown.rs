//! 倒计时器 - 基础设施层
//!
//! 持有唯一的计时任务，只暴露"每秒发一次信号"的能力

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// 计时间隔
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// 倒计时器
///
/// 职责：
/// - 持有后台计时任务
/// - 每过一秒向接收端发送一次信号
/// - 不认识 QuizSession
/// - 停止或被 drop 时终止任务，不留孤儿定时器
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// 启动计时任务，返回计时器和信号接收端
    ///
    /// 第一次信号在一秒之后发出
    pub fn start() -> (Self, mpsc::Receiver<()>) {
        Self::with_period(TICK_PERIOD)
    }

    /// 使用自定义间隔启动
    pub fn with_period(period: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if tx.send(()).await.is_err() {
                    debug!("[计时] 接收端已关闭，停止计时");
                    break;
                }
            }
        });

        (Self { handle }, rx)
    }

    /// 停止计时
    pub fn stop(self) {
        // 实际的终止在 Drop 中完成
        drop(self);
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (_countdown, mut rx) = Countdown::start();

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(rx.recv().await.is_some());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_closes_channel() {
        let (countdown, mut rx) = Countdown::start();
        countdown.stop();

        // 任务被终止后发送端随之释放
        assert!(rx.recv().await.is_none());
    }
}
