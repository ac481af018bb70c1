// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::CrawlerSettings;
use crate::fetch::retry_policy::RetryPolicy;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 配置错误
    #[error("Invalid fetch configuration: {0}")]
    Config(String),

    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 请求超时
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// 非预期的HTTP状态码（4xx不重试）
    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    /// 重试耗尽
    #[error("Retries exhausted after {attempts} attempts for {url}: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        url: String,
        last_error: String,
    },
}

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP状态码
    pub status: u16,
    /// 响应体
    pub body: String,
    /// 请求耗时（毫秒）
    pub elapsed_ms: u64,
}

/// HTTP抓取客户端
///
/// reqwest的薄封装：共享连接池、统一User-Agent与超时，
/// 出站请求之间施加全局礼貌延迟，失败时按退避策略有界重试。
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: DefaultDirectRateLimiter,
    retry_policy: RetryPolicy,
}

impl HttpFetcher {
    /// 根据抓取配置创建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取配置
    ///
    /// # 返回值
    ///
    /// * `Ok(HttpFetcher)` - 客户端实例
    /// * `Err(FetchError)` - 配置非法或客户端构建失败
    pub fn new(settings: &CrawlerSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        let period = Duration::from_millis(settings.delay_ms.max(1));
        let quota = Quota::with_period(period)
            .ok_or_else(|| FetchError::Config("delay_ms must be positive".to_string()))?;

        Ok(Self {
            client,
            limiter: RateLimiter::direct(quota),
            retry_policy: RetryPolicy::with_max_retries(settings.max_retries),
        })
    }

    /// 抓取一个文本页面
    ///
    /// 请求前等待全局礼貌延迟；连接失败、超时和5xx按策略重试，
    /// 4xx视为永久失败不重试。
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 响应状态、正文与耗时
    /// * `Err(FetchError)` - 永久失败或重试耗尽
    pub async fn fetch_text(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let max_attempts = self.retry_policy.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            self.limiter.until_ready().await;

            let start = Instant::now();
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let body = response.text().await?;
                        debug!(url, status = status.as_u16(), attempt, "fetched page");
                        return Ok(FetchedPage {
                            status: status.as_u16(),
                            body,
                            elapsed_ms: start.elapsed().as_millis() as u64,
                        });
                    }

                    // 4xx means the request itself is wrong, retrying won't help
                    if status.is_client_error() {
                        return Err(FetchError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    last_error = format!("status {}", status.as_u16());
                }
                Err(e) if e.is_timeout() => {
                    last_error = format!("timeout: {e}");
                }
                Err(e) => {
                    last_error = format!("transport: {e}");
                }
            }

            if self.retry_policy.should_retry(attempt) {
                let backoff = self.retry_policy.calculate_backoff(attempt);
                warn!(
                    url,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %last_error,
                    "fetch attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: max_attempts,
            url: url.to_string(),
            last_error,
        })
    }

    /// 抓取并解析一个JSON接口
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let page = self.fetch_text(url).await?;
        serde_json::from_str(&page.body).map_err(|e| FetchError::Status {
            status: page.status,
            url: format!("{url} (invalid json: {e})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_settings(max_retries: u32) -> CrawlerSettings {
        CrawlerSettings {
            sources_path: "urls.json".to_string(),
            delay_ms: 1,
            timeout_seconds: 5,
            max_retries,
            user_agent: "rankrs-test".to_string(),
        }
    }

    fn fast_fetcher(settings: &CrawlerSettings) -> HttpFetcher {
        let mut fetcher = HttpFetcher::new(settings).unwrap();
        fetcher.retry_policy.initial_backoff = Duration::ZERO;
        fetcher.retry_policy.enable_jitter = false;
        fetcher
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rank"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let fetcher = fast_fetcher(&test_settings(3));
        let page = fetcher
            .fetch_text(&format!("{}/rank", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "hello");
    }

    #[tokio::test]
    async fn test_retry_count_respected_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rank"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = fast_fetcher(&test_settings(3));
        let err = fetcher
            .fetch_text(&format!("{}/rank", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::RetriesExhausted { attempts: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rank"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fast_fetcher(&test_settings(3));
        let err = fetcher
            .fetch_text(&format!("{}/rank", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":0}"#))
            .mount(&server)
            .await;

        let fetcher = fast_fetcher(&test_settings(1));
        let value = fetcher
            .fetch_json(&format!("{}/api", server.uri()))
            .await
            .unwrap();
        assert_eq!(value["code"], 0);
    }
}
