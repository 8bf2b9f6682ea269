//! 资源获取模块
//!
//! 按URL获取字节内容。通过 [`Fetcher`] 抽象，测试中可以替换为不访问网络的实现。

use crate::epub::error::{EpubError, Result};
use reqwest::Url;
use std::fs;
use std::time::Duration;
use tracing::debug;

/// 默认请求超时时间（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 默认User-Agent
const DEFAULT_USER_AGENT: &str = concat!("bindery/", env!("CARGO_PKG_VERSION"));

/// 按URL获取资源内容
pub trait Fetcher {
    /// 获取URL对应的字节内容，失败（网络错误、非2xx状态、文件不存在）时返回错误
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// 基于reqwest的阻塞式实现，同时支持`file://`地址
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// 使用默认超时创建
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// 使用指定的超时时间创建
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| EpubError::Fetch {
                url: String::new(),
                reason: format!("无法创建HTTP客户端: {}", e),
            })?;

        Ok(Self { client })
    }

    fn fetch_file(url: &Url) -> Result<Vec<u8>> {
        let path = url.to_file_path().map_err(|_| EpubError::Fetch {
            url: url.to_string(),
            reason: "无效的文件地址".to_string(),
        })?;

        fs::read(&path).map_err(|e| EpubError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn fetch_http(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| EpubError::Fetch {
                url: url.to_string(),
                reason: format!("请求失败: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(EpubError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| EpubError::Fetch {
                url: url.to_string(),
                reason: format!("读取响应失败: {}", e),
            })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("获取资源: {}", url);
        match url.scheme() {
            "file" => Self::fetch_file(url),
            "http" | "https" => self.fetch_http(url),
            other => Err(EpubError::Fetch {
                url: url.to_string(),
                reason: format!("不支持的协议: {}", other),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) use stub::StubFetcher;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.gif");
        fs::write(&path, b"GIF89a").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::from_file_path(&path).unwrap();
        assert_eq!(fetcher.fetch(&url).unwrap(), b"GIF89a");
    }

    #[test]
    fn test_fetch_missing_local_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.png")).unwrap();
        let fetcher = HttpFetcher::new().unwrap();
        assert!(matches!(fetcher.fetch(&url), Err(EpubError::Fetch { .. })));
    }

    #[test]
    fn test_unsupported_scheme_fails() {
        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse("ftp://example.com/a.png").unwrap();
        assert!(matches!(fetcher.fetch(&url), Err(EpubError::Fetch { .. })));
    }

    #[test]
    fn test_stub_fetcher() {
        let fetcher = StubFetcher::new().with("http://example.com/a.png", b"png");
        let hit = Url::parse("http://example.com/a.png").unwrap();
        let miss = Url::parse("http://example.com/b.png").unwrap();
        assert_eq!(fetcher.fetch(&hit).unwrap(), b"png");
        assert!(fetcher.fetch(&miss).is_err());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
