use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Transport seam. The fetcher only ever sees a byte stream, so tests swap
/// the network out entirely.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open `url` for streaming. Non-2xx statuses are an error.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send;

    /// Expected payload size, when the server reports one.
    fn head(&self, url: &str) -> impl Future<Output = Result<Option<u64>, Self::Error>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn stream(
        &self,
        url: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
        let response = self.inner.get(url).send().await?.error_for_status()?;
        Ok(Box::pin(response.bytes_stream()))
    }

    async fn head(&self, url: &str) -> Result<Option<u64>, Self::Error> {
        let response = self.inner.head(url).send().await?.error_for_status()?;
        Ok(response.content_length())
    }
}
