pub mod executor;
pub mod postman;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::metrics::{Collector, Intent, Stat, StatKind};

// Re-export commonly used types
pub use executor::RequestExecutor;
pub use postman::{PostmanRunner, PostmanVu};

/// 从不可变计划铸造独立 VU 的工厂
///
/// 解析完成后 Runner 自身不再变化，可被任意数量的并发 new_vu
/// 调用共享。不同计划源格式各自实现本 trait；VU 侧契约保持一致，
/// 调度器因此与具体实现无关。
pub trait Runner: Send + Sync {
    type Vu: VirtualUser + 'static;

    /// 铸造一个新的 VU
    ///
    /// 必须廉价：不做 I/O，不深拷贝计划；只有本地资源分配
    /// （如 VU 专属 HTTP 客户端）可能失败。
    fn new_vu(&self) -> Result<Self::Vu>;
}

/// 单个虚拟用户：独立、有状态的执行单元
#[async_trait]
pub trait VirtualUser: Send {
    /// 赋予/刷新身份（如用于打标签），可以是空操作
    fn reconfigure(&mut self, id: u64) -> Result<()>;

    /// 执行一次完整迭代（对计划树的一次前序遍历）
    ///
    /// 迭代内部严格串行；首个请求失败即中止剩余遍历，并作为本次
    /// 迭代的结果返回。VU 本身不因此销毁，下次调用从头开始遍历。
    async fn run_once(&mut self, cancel: &CancellationToken) -> Result<()>;

    /// VU 专属的样本收集器，供外部聚合器读取
    fn collector(&self) -> Arc<Collector>;
}

/// 请求路径使用的统计量描述
///
/// 每个 Runner 构造一次，共享给它铸造的所有 VU。
#[derive(Debug)]
pub struct RunnerStats {
    pub requests: Arc<Stat>,
    pub errors: Arc<Stat>,
}

impl RunnerStats {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Stat::new("requests", StatKind::Histogram, Intent::Time)),
            errors: Arc::new(Stat::new("errors", StatKind::Counter, Intent::Count)),
        }
    }
}

impl Default for RunnerStats {
    fn default() -> Self {
        Self::new()
    }
}
