use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::collection::{ApiKeyLocation, Auth, AuthKind, Request as RequestSpec};
use crate::http::{Client, Request, encode_body};
use crate::metrics::{Collector, Sample, Tags, value};
use crate::runner::RunnerStats;

/// 请求执行器：构建并发出一个请求，测量并产出样本
///
/// 每个已执行请求恰好记录一个时长样本（直方图统计量，纳秒）；
/// 失败时额外记录一个错误计数样本，随后错误上抛中止本次迭代。
/// 不做内部重试，重试策略属于调度方。
pub struct RequestExecutor {
    client: Client,
    stats: Arc<RunnerStats>,
    collector: Arc<Collector>,
}

impl RequestExecutor {
    pub fn new(stats: Arc<RunnerStats>) -> Result<Self> {
        Ok(Self {
            client: Client::new()?,
            stats,
            collector: Arc::new(Collector::new()),
        })
    }

    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }

    /// 以有效授权执行一个节点请求
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        auth: &Auth,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let request = build_request(spec, auth)?;
        let outcome = self.client.execute(request, cancel).await;

        let mut tags = Tags::new();
        tags.insert("method".to_string(), spec.method.to_string());
        tags.insert("url".to_string(), spec.url.clone());
        tags.insert("status".to_string(), outcome.status.to_string());

        self.collector.add(Sample::new(
            Arc::clone(&self.stats.requests),
            tags.clone(),
            HashMap::from([(
                "duration".to_string(),
                outcome.duration.as_nanos() as f64,
            )]),
        ));

        match outcome.error {
            None => Ok(()),
            Some(error) => {
                tracing::error!(method = %spec.method, url = %spec.url, error = %error, "Request error");
                self.collector.add(Sample::new(
                    Arc::clone(&self.stats.errors),
                    tags,
                    value(1.0),
                ));
                Err(error)
            }
        }
    }
}

/// 将节点请求与有效授权翻译为可发送的请求
///
/// 构建失败（非法 URL/请求头）发生在计时与采样之前。
fn build_request(spec: &RequestSpec, auth: &Auth) -> Result<Request> {
    let mut request = Request::new(spec.method, &spec.url)?;

    for header in &spec.header {
        request = request.with_header(&header.key, &header.value)?;
    }

    let boundary = uuid::Uuid::new_v4().simple().to_string();
    if let Some(body) = encode_body(&spec.body, &boundary) {
        request = request.with_body(body);
    }

    request = match auth.kind {
        AuthKind::Inherit | AuthKind::None => request,
        AuthKind::Basic => request.with_basic_auth(&auth.basic.username, &auth.basic.password),
        AuthKind::Bearer => request.with_bearer_auth(&auth.bearer.token),
        AuthKind::ApiKey => match auth.apikey.location {
            ApiKeyLocation::Header => request.with_header(&auth.apikey.key, &auth.apikey.value)?,
            ApiKeyLocation::Query => request.with_query(&auth.apikey.key, &auth.apikey.value),
        },
    };

    Ok(request)
}
