use async_trait::async_trait;
use outreach_core::{DriverError, PageDriver};
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::listing::element_text;

struct LoadedPage {
    url: String,
    html: String,
}

/// A [`PageDriver`] over plain HTTP with no JavaScript.
///
/// Controls can be found but never activated, so pages that need a click
/// to reveal content report a browser error for that step.
pub struct HttpPage {
    client: Client,
    current: Mutex<Option<LoadedPage>>,
}

impl HttpPage {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: Mutex::new(None),
        }
    }

    async fn with_document<T>(&self, f: impl FnOnce(&str, &Html) -> Result<T, DriverError>) -> Result<T, DriverError> {
        let current = self.current.lock().await;
        let page = current
            .as_ref()
            .ok_or_else(|| DriverError::browser_error("No page loaded"))?;
        let document = Html::parse_document(&page.html);
        f(&page.url, &document)
    }

    async fn require_element(&self, selector: &str) -> Result<(), DriverError> {
        let sel = parse(selector)?;
        self.with_document(|_, document| {
            if document.select(&sel).next().is_some() {
                Ok(())
            } else {
                Err(DriverError::element_not_found(selector))
            }
        })
        .await
    }
}

impl Default for HttpPage {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(selector: &str) -> Result<Selector, DriverError> {
    Selector::parse(selector)
        .map_err(|e| DriverError::parsing_error(format!("Invalid selector '{}': {}", selector, e)))
}

#[async_trait]
impl PageDriver for HttpPage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DriverError::navigation_error(format!("Navigation failed: {}", e)).with_context(json!({ "url": url })))?;

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| DriverError::navigation_error(format!("Reading body failed: {}", e)))?;

        tracing::debug!(url = %final_url, bytes = html.len(), "fetched page");
        *self.current.lock().await = Some(LoadedPage { url: final_url, html });
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.require_element(selector).await?;
        Err(DriverError::browser_error(format!(
            "Cannot activate '{}' without a browser",
            selector
        )))
    }

    async fn wait_until_clickable(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.click(selector).await
    }

    async fn inner_text(&self, selector: &str) -> Result<String, DriverError> {
        let sel = parse(selector)?;
        self.with_document(|_, document| {
            document
                .select(&sel)
                .next()
                .map(element_text)
                .ok_or_else(|| DriverError::element_not_found(selector))
        })
        .await
    }

    async fn content(&self) -> Result<String, DriverError> {
        let current = self.current.lock().await;
        current
            .as_ref()
            .map(|p| p.html.clone())
            .ok_or_else(|| DriverError::browser_error("No page loaded"))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.with_document(|url, _| Ok(url.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_core::ErrorCategory;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POSTING: &str = r#"
        <html><body>
          <p property="qualification">English</p>
          <button id="applynowbutton">Show how to apply</button>
          <div id="howtoapply">By email: <strong>hiring@dinerco.ca</strong></div>
        </body></html>
    "#;

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobposting/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn reads_text_from_fetched_page() {
        let server = serve(POSTING).await;
        let page = HttpPage::new();
        page.navigate(&format!("{}/jobposting/1", server.uri())).await.unwrap();

        assert_eq!(page.inner_text("p[property='qualification']").await.unwrap(), "English");
        assert_eq!(page.inner_text("#howtoapply").await.unwrap(), "By email: hiring@dinerco.ca");
        assert!(page.current_url().await.unwrap().ends_with("/jobposting/1"));
    }

    #[tokio::test]
    async fn missing_and_unclickable_elements_are_distinguished() {
        let server = serve(POSTING).await;
        let page = HttpPage::new();
        page.navigate(&format!("{}/jobposting/1", server.uri())).await.unwrap();

        let missing = page.click("#morepage button").await.unwrap_err();
        assert!(missing.is_not_found());

        let present = page.click("#applynowbutton").await.unwrap_err();
        assert_eq!(present.category, ErrorCategory::Browser);
    }

    #[tokio::test]
    async fn http_errors_fail_navigation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let page = HttpPage::new();
        let err = page.navigate(&format!("{}/gone", server.uri())).await.unwrap_err();
        assert_eq!(err.category, ErrorCategory::Navigation);
    }

    #[tokio::test]
    async fn nothing_loaded_yet() {
        let page = HttpPage::new();
        assert_eq!(page.content().await.unwrap_err().category, ErrorCategory::Browser);
    }
}
