use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::collection::Method;
use crate::http::request::{Credentials, Request};
use crate::{Result, RuloadError};

/// 单次请求的结局
///
/// status 为 0 表示未获得响应（连接失败、超时或取消）。
#[derive(Debug)]
pub struct Outcome {
    pub status: u16,
    pub duration: Duration,
    pub error: Option<RuloadError>,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// 每个 VU 独占的 HTTP 客户端
///
/// 连接池不跨 VU 共享，避免跨 VU 连接复用影响延迟测量。
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder()
                .pool_max_idle_per_host(usize::MAX)
                .timeout(Duration::from_secs(30))
                .build()?,
        })
    }

    /// 发出请求并测量
    ///
    /// 计时从派发前开始，到获得响应头（或错误）为止，包含连接建立；
    /// 随后响应体被完整读出并丢弃，保证连接可复用。
    /// 取消按传输失败处理。
    pub async fn execute(&self, request: Request, cancel: &CancellationToken) -> Outcome {
        let builder = self.prepare(request);

        let start = Instant::now();
        let result = tokio::select! {
            result = builder.send() => result.map_err(RuloadError::from),
            _ = cancel.cancelled() => Err(RuloadError::Cancelled),
        };
        let duration = start.elapsed();

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // 读完并丢弃响应体
                let _ = response.bytes().await;
                Outcome {
                    status,
                    duration,
                    error: None,
                }
            }
            Err(error) => Outcome {
                status: 0,
                duration,
                error: Some(error),
            },
        }
    }

    fn prepare(&self, request: Request) -> reqwest::RequestBuilder {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let mut builder = self
            .inner
            .request(method, request.url)
            .headers(request.headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.credentials {
            Credentials::None => builder,
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Bearer { token } => builder.bearer_auth(token),
        };

        if let Some(body) = request.body {
            if let Some(content_type) = &body.content_type {
                builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
            }
            builder = builder.body(body.bytes);
        }

        builder
    }
}
