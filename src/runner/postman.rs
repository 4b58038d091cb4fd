use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::collection::{self, Auth, Collection, Item};
use crate::metrics::Collector;
use crate::runner::executor::RequestExecutor;
use crate::runner::{Runner, RunnerStats, VirtualUser};
use crate::{Result, RuloadError};

/// Postman 风格 JSON 集合的 Runner
///
/// 计划源只解析一次；此后 Runner 不可变，计划以 Arc 共享给
/// 它铸造的每个 VU，任何 VU 都无法修改它。
#[derive(Debug)]
pub struct PostmanRunner {
    collection: Arc<Collection>,
    stats: Arc<RunnerStats>,
}

impl PostmanRunner {
    /// 从计划源字节构建 Runner
    pub fn new(source: &[u8]) -> Result<Self> {
        let collection = collection::parse(source)?;
        Ok(Self {
            collection: Arc::new(collection),
            stats: Arc::new(RunnerStats::new()),
        })
    }

    /// 从文件构建 Runner
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read(path)?;
        Self::new(&source)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }
}

impl Runner for PostmanRunner {
    type Vu = PostmanVu;

    fn new_vu(&self) -> Result<PostmanVu> {
        Ok(PostmanVu {
            collection: Arc::clone(&self.collection),
            executor: RequestExecutor::new(Arc::clone(&self.stats))?,
            id: 0,
            iterations: 0,
        })
    }
}

/// 绑定到一个 PostmanRunner 的虚拟用户
///
/// 持有计划的只读共享引用、专属 HTTP 客户端与专属收集器。
/// id 与 iterations 等本地状态跨 run_once 存续，但绝不与其他
/// VU 共享。
pub struct PostmanVu {
    collection: Arc<Collection>,
    executor: RequestExecutor,
    id: u64,
    iterations: u64,
}

impl PostmanVu {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 本 VU 已完成的迭代次数
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    async fn run_item(
        &self,
        item: &Item,
        inherited: &Auth,
        cancel: &CancellationToken,
    ) -> Result<()> {
        // 有效授权每次遍历重新计算，对本节点及其子树生效
        let auth = item.effective_auth(inherited);

        if let Some(request) = &item.request {
            self.executor.execute(request, auth, cancel).await?;
        }

        for child in &item.item {
            Box::pin(self.run_item(child, auth, cancel)).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl VirtualUser for PostmanVu {
    fn reconfigure(&mut self, id: u64) -> Result<()> {
        self.id = id;
        Ok(())
    }

    async fn run_once(&mut self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(RuloadError::Cancelled);
        }

        tracing::debug!(vu = self.id, iteration = self.iterations, "iteration start");

        for item in &self.collection.item {
            self.run_item(item, &self.collection.auth, cancel).await?;
        }

        self.iterations += 1;
        Ok(())
    }

    fn collector(&self) -> Arc<Collector> {
        self.executor.collector()
    }
}
