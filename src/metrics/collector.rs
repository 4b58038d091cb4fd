use std::sync::{Mutex, MutexGuard};

use crate::metrics::sample::Sample;

/// 每个 VU 独占的追加式样本缓冲
///
/// 热路径上只有单一写入者（所属 VU）；互斥锁只为外部聚合器的
/// drain/snapshot 提供短临界区访问，不会长时间阻塞 add。
#[derive(Debug, Default)]
pub struct Collector {
    samples: Mutex<Vec<Sample>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个样本
    pub fn add(&self, sample: Sample) {
        self.lock().push(sample);
    }

    /// 取走全部累积样本，缓冲清空
    pub fn drain(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.lock())
    }

    /// 复制当前累积样本，缓冲保持不变
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Sample>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metrics::sample::{Intent, Stat, StatKind, Tags, value};

    fn sample(stat: &Arc<Stat>) -> Sample {
        Sample::new(Arc::clone(stat), Tags::new(), value(1.0))
    }

    #[test]
    fn test_add_and_drain() {
        let stat = Arc::new(Stat::new("requests", StatKind::Histogram, Intent::Time));
        let collector = Collector::new();

        collector.add(sample(&stat));
        collector.add(sample(&stat));
        assert_eq!(collector.len(), 2);

        let drained = collector.drain();
        assert_eq!(drained.len(), 2);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_samples() {
        let stat = Arc::new(Stat::new("errors", StatKind::Counter, Intent::Count));
        let collector = Collector::new();
        collector.add(sample(&stat));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(collector.len(), 1);
        // 样本保留统计量的形态区分
        assert_eq!(snapshot[0].stat.kind, StatKind::Counter);
    }
}
