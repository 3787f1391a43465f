//! Live lookup against fitness websites
//!
//! Each configured site's nutrition page is fetched and scanned for article
//! blocks mentioning the query. Sites are fetched concurrently with a bound
//! and a per-request timeout. A failing site is logged and contributes
//! nothing; it never fails the lookup.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::knowledge::NutritionFact;
use super::resolver::LookupStrategy;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const MAX_ARTICLES: usize = 5;
const MAX_CONTENT_CHARS: usize = 200;

/// A site with a nutrition section worth scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSite {
    pub name: String,
    pub base_url: String,
    pub nutrition_section: String,
}

impl LiveSite {
    pub fn page_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.nutrition_section.starts_with('/') {
            format!("{}{}", base, self.nutrition_section)
        } else {
            format!("{}/{}", base, self.nutrition_section)
        }
    }
}

/// Failure reaching or reading one site
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Failed to read {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Live lookup setup failed: {0}")]
    Setup(String),
}

/// Title and teaser text of one article block
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// Regex-based scanner for article blocks
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    block_open: Regex,
    class_attr: Regex,
    block_class: Regex,
    content_open: Regex,
    content_class: Regex,
    heading: Regex,
    tag_token: Regex,
    any_tag: Regex,
    whitespace: Regex,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            block_open: Regex::new(r"(?i)<(article|div)\b([^>]*)>")?,
            class_attr: Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?,
            block_class: Regex::new(r"(?i)article|post|content")?,
            content_open: Regex::new(r"(?i)<(p|div)\b([^>]*)>")?,
            content_class: Regex::new(r"(?i)content|excerpt|summary")?,
            heading: Regex::new(r"(?is)<h[1-4]\b[^>]*>(.*?)</h[1-4]\s*>")?,
            tag_token: Regex::new(r"(?i)<(/?)(article|div|p)\b[^>]*>")?,
            any_tag: Regex::new(r"(?s)<[^>]*>")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Up to five articles that have both a heading and a content element
    pub fn extract(&self, html: &str) -> Vec<Article> {
        self.classed_elements(html, &self.block_open, &self.block_class)
            .into_iter()
            .take(MAX_ARTICLES)
            .filter_map(|block| self.article_in(block))
            .collect()
    }

    fn article_in(&self, block: &str) -> Option<Article> {
        let title = self
            .heading
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| self.clean_text(m.as_str()))?;
        let content = self
            .classed_elements(block, &self.content_open, &self.content_class)
            .into_iter()
            .next()
            .map(|inner| self.clean_text(inner))?;

        Some(Article {
            title,
            content: format!("{}...", truncate_chars(&content, MAX_CONTENT_CHARS)),
        })
    }

    /// Inner HTML of every element opened by `open` whose class matches `class_filter`,
    /// in document order (nested matches included)
    fn classed_elements<'h>(&self, html: &'h str, open: &Regex, class_filter: &Regex) -> Vec<&'h str> {
        open.captures_iter(html)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let tag = caps.get(1)?.as_str();
                let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                let class = self.class_attr.captures(attrs).and_then(|c| c.get(1).or_else(|| c.get(2)))?;
                if !class_filter.is_match(class.as_str()) {
                    return None;
                }
                let end = self.matching_close(html, whole.end(), tag);
                Some(&html[whole.end()..end])
            })
            .collect()
    }

    /// Byte offset where the element opened just before `start` closes; end of input if never
    fn matching_close(&self, html: &str, start: usize, tag: &str) -> usize {
        let mut depth = 1usize;
        for caps in self.tag_token.captures_iter(&html[start..]) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            if !name.as_str().eq_ignore_ascii_case(tag) || whole.as_str().ends_with("/>") {
                continue;
            }
            let closing = caps.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false);
            if closing {
                depth -= 1;
                if depth == 0 {
                    return start + whole.start();
                }
            } else {
                depth += 1;
            }
        }
        html.len()
    }

    fn clean_text(&self, fragment: &str) -> String {
        let stripped = self.any_tag.replace_all(fragment, " ");
        let decoded = html_escape::decode_html_entities(&stripped);
        self.whitespace.replace_all(decoded.trim(), " ").into_owned()
    }
}

/// Live tier of the resolver
pub struct LiveLookup {
    client: reqwest::Client,
    sites: Vec<LiveSite>,
    timeout: Duration,
    concurrency: usize,
    extractor: ArticleExtractor,
}

impl LiveLookup {
    pub fn new(sites: Vec<LiveSite>, timeout: Duration, concurrency: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;
        let extractor = ArticleExtractor::new().map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            sites,
            timeout,
            concurrency: concurrency.max(1),
            extractor,
        })
    }

    pub fn sites(&self) -> &[LiveSite] {
        &self.sites
    }

    /// Matching articles from every reachable site, in configured site order
    pub async fn scrape(&self, query: &str) -> Vec<NutritionFact> {
        let mut outcomes: Vec<_> = stream::iter(self.sites.clone().into_iter().enumerate())
            .map(|(index, site)| async move {
                let outcome = self.fetch_site(&site, query).await;
                (index, site, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut results = Vec::new();
        for (_, site, outcome) in outcomes {
            match outcome {
                Ok(facts) => {
                    debug!("{}: {} matching articles", site.name, facts.len());
                    results.extend(facts);
                }
                Err(e) => warn!("Skipping {}: {}", site.name, e),
            }
        }
        results
    }

    async fn fetch_site(&self, site: &LiveSite, query: &str) -> Result<Vec<NutritionFact>, FetchError> {
        let url = site.page_url();
        let request_error = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.clone(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                FetchError::Request {
                    url: url.clone(),
                    source,
                }
            }
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| FetchError::Parse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let timestamp = crate::nutrition::now_iso();
        let needle = query.to_lowercase();
        let facts = self
            .extractor
            .extract(&html)
            .into_iter()
            .filter(|a| a.title.to_lowercase().contains(&needle) || a.content.to_lowercase().contains(&needle))
            .map(|a| NutritionFact {
                title: a.title,
                content: a.content,
                source: title_case(&site.name),
                category: "scraped".to_string(),
                timestamp: timestamp.clone(),
                url: Some(url.clone()),
            })
            .collect();

        Ok(facts)
    }
}

#[async_trait]
impl LookupStrategy for LiveLookup {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn attempt(&self, query: &str) -> Vec<NutritionFact> {
        self.scrape(query).await
    }
}

/// Upper-case the first letter of every alphabetic run: `men_health` -> `Men_Health`
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::sync::Arc;

    const PAGE: &str = r#"
        <html><body>
          <div class="article-card">
            <h2>High Protein <em>Breakfast</em> Ideas</h2>
            <div class="card">
              <p class="excerpt">Eggs &amp; oats keep you full.</p>
            </div>
          </div>
          <article class="post">
            <h3>Hydration basics</h3>
            <p class="summary">Drink   water
              before training.</p>
          </article>
          <article class="sidebar"><h2>Ignored</h2><p class="content">protein</p></article>
          <div class="content"><h4>No teaser here</h4><p>plain paragraph</p></div>
        </body></html>
    "#;

    fn extractor() -> ArticleExtractor {
        ArticleExtractor::new().unwrap()
    }

    #[test]
    fn test_extract_articles() {
        let articles = extractor().extract(PAGE);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "High Protein Breakfast Ideas");
        assert_eq!(articles[0].content, "Eggs & oats keep you full....");
        assert_eq!(articles[1].title, "Hydration basics");
        assert_eq!(articles[1].content, "Drink water before training....");
    }

    #[test]
    fn test_nested_blocks_close_at_their_own_tag() {
        let html = r#"<div class="post"><div><h2>Outer</h2></div><p class="summary">a</p></div>
                      <div class="post"><h2>Second</h2><p class="summary">b</p></div>"#;
        let titles: Vec<_> = extractor().extract(html).into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Outer", "Second"]);
    }

    #[test]
    fn test_at_most_five_blocks() {
        let block = r#"<article class="post"><h2>Tip</h2><p class="summary">text</p></article>"#;
        let html = block.repeat(8);
        assert_eq!(extractor().extract(&html).len(), MAX_ARTICLES);
    }

    #[test]
    fn test_content_truncated_to_200_chars() {
        let long = "é".repeat(300);
        let html = format!(r#"<article class="post"><h2>Long</h2><p class="summary">{long}</p></article>"#);
        let articles = extractor().extract(&html);
        assert_eq!(articles[0].content.chars().count(), 203);
        assert!(articles[0].content.ends_with("..."));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("men_health"), "Men_Health");
        assert_eq!(title_case("bodybuilding"), "Bodybuilding");
        assert_eq!(title_case("WOMEN health"), "Women Health");
    }

    #[test]
    fn test_page_url() {
        let site = LiveSite {
            name: "x".into(),
            base_url: "https://example.com/".into(),
            nutrition_section: "/nutrition".into(),
        };
        assert_eq!(site.page_url(), "https://example.com/nutrition");
    }

    #[tokio::test]
    async fn test_failing_sites_are_skipped() {
        let app = Router::new()
            .route("/nutrition", get(|| async { PAGE }))
            .route("/broken/nutrition", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // A port nobody listens on
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed_addr = closed.local_addr().unwrap();
        drop(closed);

        let site = |name: &str, base: String| LiveSite {
            name: name.to_string(),
            base_url: base,
            nutrition_section: "/nutrition".to_string(),
        };
        let lookup = LiveLookup::new(
            vec![
                site("unreachable", format!("http://{closed_addr}")),
                site("broken_site", format!("http://{addr}/broken")),
                site("men_health", format!("http://{addr}")),
            ],
            Duration::from_secs(5),
            2,
        )
        .unwrap();

        let results = lookup.scrape("PROTEIN").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "High Protein Breakfast Ideas");
        assert_eq!(results[0].source, "Men_Health");
        assert_eq!(results[0].category, "scraped");
        assert_eq!(results[0].url.as_deref(), Some(format!("http://{addr}/nutrition").as_str()));

        assert!(lookup.attempt("kale").await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_runs_on_spawned_task() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed_addr = closed.local_addr().unwrap();
        drop(closed);

        let lookup: Arc<dyn LookupStrategy> = Arc::new(
            LiveLookup::new(
                vec![LiveSite {
                    name: "offline".into(),
                    base_url: format!("http://{closed_addr}"),
                    nutrition_section: "/nutrition".into(),
                }],
                Duration::from_secs(2),
                1,
            )
            .unwrap(),
        );

        let results = tokio::spawn(async move { lookup.attempt("protein").await })
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
