// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 重试策略配置
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            enable_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// 创建标准重试策略
    pub fn standard() -> Self {
        Self::default()
    }

    /// 创建指定重试次数的策略
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// 计算下次重试的退避时间
    ///
    /// attempt 从1开始计数
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        // 计算指数退避
        let backoff_secs = self.initial_backoff.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        // 限制最大退避时间
        let capped_backoff = backoff_secs.min(self.max_backoff.as_secs_f64());

        // 添加抖动
        let final_backoff = if self.enable_jitter && capped_backoff > 0.0 {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_secs_f64(final_backoff)
    }

    /// 是否应该重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff_exponential() {
        let mut policy = RetryPolicy::standard();
        policy.enable_jitter = false; // 禁用抖动以获得精确值

        assert_eq!(policy.calculate_backoff(1), Duration::from_secs(1));
        assert_eq!(policy.calculate_backoff(2), Duration::from_secs(2)); // 1 * 2^1
        assert_eq!(policy.calculate_backoff(3), Duration::from_secs(4)); // 1 * 2^2
    }

    #[test]
    fn test_calculate_backoff_capped() {
        let mut policy = RetryPolicy::standard();
        policy.enable_jitter = false;
        policy.max_backoff = Duration::from_secs(5);

        assert_eq!(policy.calculate_backoff(10), Duration::from_secs(5));
    }

    #[test]
    fn test_calculate_backoff_with_jitter() {
        let mut policy = RetryPolicy::standard();
        policy.enable_jitter = true;
        policy.jitter_factor = 0.1;

        let backoff = policy.calculate_backoff(2);
        let expected = Duration::from_secs(2);
        let jitter_range = Duration::from_millis(200); // 10% of 2s

        assert!(backoff >= expected - jitter_range);
        assert!(backoff <= expected + jitter_range);
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::with_max_retries(3);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }
}
