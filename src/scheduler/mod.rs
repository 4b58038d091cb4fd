use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::metrics::Sample;
use crate::runner::{Runner, VirtualUser};
use crate::{Result, RuloadError};

/// VU 池调度器
///
/// 拥有一组 VU，决定并发数量与运行边界，反复调用各 VU 的迭代
/// 入口。迭代失败只影响该次迭代：记录日志后 VU 继续下一次迭代。
/// 停止条件为时长或全池迭代总数，先到先停。
pub struct Scheduler {
    vus: usize,
    duration: Option<Duration>,
    iterations: Option<u64>,
}

impl Scheduler {
    pub fn new(vus: usize) -> Self {
        Self {
            vus,
            duration: None,
            iterations: None,
        }
    }

    /// 运行时长上限
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// 全池迭代总数上限（允许少量超出）
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// 启动 VU 池并运行到任一上限触发，返回所有 VU 的累积样本
    pub async fn run<R>(&self, runner: &R) -> Result<Vec<Sample>>
    where
        R: Runner,
    {
        if self.duration.is_none() && self.iterations.is_none() {
            return Err(RuloadError::SchedulerError(
                "必须设置时长或迭代数上限".to_string(),
            ));
        }

        let cancel = CancellationToken::new();
        let budget = Arc::new(AtomicU64::new(0));
        let mut tasks = JoinSet::new();
        let mut collectors = Vec::with_capacity(self.vus);

        for id in 0..self.vus {
            let mut vu = runner.new_vu()?;
            vu.reconfigure(id as u64)?;
            collectors.push(vu.collector());

            let cancel = cancel.clone();
            let budget = Arc::clone(&budget);
            let max_iterations = self.iterations;

            tasks.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }

                    if let Some(max) = max_iterations {
                        if budget.fetch_add(1, Ordering::Relaxed) >= max {
                            cancel.cancel();
                            break;
                        }
                    }

                    if let Err(error) = vu.run_once(&cancel).await {
                        if cancel.is_cancelled() {
                            break;
                        }
                        tracing::error!(vu = id, error = %error, "iteration failed");
                    }
                }
            });
        }

        if let Some(duration) = self.duration {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(duration) => cancel.cancel(),
                    _ = cancel.cancelled() => {}
                }
            });
        }

        while tasks.join_next().await.is_some() {}

        Ok(collectors.iter().flat_map(|collector| collector.drain()).collect())
    }
}
