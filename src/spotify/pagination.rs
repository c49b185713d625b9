use std::fmt;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::types::Page;

#[derive(Debug)]
pub enum FetchError {
    Request(reqwest::Error),
    Status(StatusCode),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "request failed: {}", e),
            FetchError::Status(status) => write!(f, "server answered {}", status),
        }
    }
}

impl std::error::Error for FetchError {}

/// A walk that stopped early. `partial` holds the items of every page that
/// arrived before `url` failed.
#[derive(Debug)]
pub struct WalkError {
    pub url: String,
    pub partial: Vec<Value>,
    pub source: FetchError,
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} items ({})",
            self.source,
            self.partial.len(),
            self.url
        )
    }
}

impl std::error::Error for WalkError {}

/// Fetches one authenticated page.
///
/// Non-2xx answers and bodies that are not a page object are failures; a
/// page without `items` is an empty page.
pub async fn fetch_page(client: &Client, url: &str, token: &str) -> Result<Page, FetchError> {
    let response = client.get(url).bearer_auth(token).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response.json::<Page>().await?)
}

/// Lazily follows a server-driven `next` chain, one page per call.
pub struct PageCursor<'a> {
    client: &'a Client,
    token: &'a str,
    next: Option<String>,
}

impl<'a> PageCursor<'a> {
    pub fn new(client: &'a Client, start_url: impl Into<String>, token: &'a str) -> Self {
        Self {
            client,
            token,
            next: Some(start_url.into()),
        }
    }

    /// URL the next call will fetch, if the chain is not exhausted.
    pub fn pending_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// `None` once the previous page carried no `next`. After an error the
    /// cursor is exhausted as well.
    pub async fn next_page(&mut self) -> Option<Result<Vec<Value>, FetchError>> {
        let url = self.next.take()?;
        match fetch_page(self.client, &url, self.token).await {
            Ok(page) => {
                self.next = page.next.filter(|next| !next.is_empty());
                Some(Ok(page.items.unwrap_or_default()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Drains every page starting at `start_url`, preserving server order.
pub async fn walk_pages(
    client: &Client,
    start_url: &str,
    token: &str,
) -> Result<Vec<Value>, WalkError> {
    let mut cursor = PageCursor::new(client, start_url, token);
    let mut items = Vec::new();

    loop {
        let url = match cursor.pending_url() {
            Some(url) => url.to_string(),
            None => return Ok(items),
        };

        match cursor.next_page().await {
            Some(Ok(page)) => items.extend(page),
            Some(Err(source)) => {
                return Err(WalkError {
                    url,
                    partial: items,
                    source,
                });
            }
            None => return Ok(items),
        }
    }
}
