//! Web-article extraction: fetch a page and reduce it to its readable text.
//!
//! The reduction is a small readability pass:
//!
//! 1. Narrow to the main content container: `<article>`, else `<main>`,
//!    else `<body>`, else the whole document.
//! 2. Drop elements that never carry article prose (scripts, navigation,
//!    headers/footers, forms, …) and HTML comments.
//! 3. Unwrap links and drop images so the text reads as prose.
//! 4. Render the rest to plain text with `html2text`.
//!
//! [`extract_article`] is pure so it can be tested against fixtures without a
//! network.

use crate::error::SummaizeError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// Line width used when rendering article HTML to text.
const ARTICLE_WRAP_WIDTH: usize = 100;

/// User agent sent with article requests; many news sites reject bare clients.
const USER_AGENT: &str = concat!("summaize/", env!("CARGO_PKG_VERSION"));

/// The readable part of a web page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub text: String,
}

/// Download a page and return its HTML.
pub async fn fetch_html(url: &str, timeout_secs: u64) -> Result<String, SummaizeError> {
    if reqwest::Url::parse(url).is_err() || !crate::pipeline::input::is_url(url) {
        return Err(SummaizeError::InvalidUrl {
            input: url.to_string(),
        });
    }

    info!("Fetching article from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SummaizeError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SummaizeError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummaizeError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SummaizeError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let html = response.text().await.map_err(|e| {
        if e.is_timeout() {
            SummaizeError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummaizeError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    debug!("Fetched {} bytes of HTML", html.len());
    Ok(html)
}

static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// One pattern per element type; the regex crate has no backreferences.
static RE_BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg",
        "iframe", "template",
    ]
    .iter()
    .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
    .collect()
});

static RE_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*)</article\s*>").unwrap());
static RE_MAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<main\b[^>]*>(.*)</main\s*>").unwrap());
static RE_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").unwrap());

static RE_LINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?a\b[^>]*>").unwrap());
static RE_IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());

static RE_META_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());
static RE_OG_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)property\s*=\s*["']og:title["']"#).unwrap());
static RE_CONTENT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)content\s*=\s*"([^"]*)"|content\s*=\s*'([^']*)'"#).unwrap());
static RE_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());

/// Reduce an HTML page to its title and readable text.
pub fn extract_article(html: &str) -> Result<Article, SummaizeError> {
    let title = extract_title(html)?;

    let without_comments = RE_COMMENT.replace_all(html, "");
    let mut pruned = without_comments.into_owned();
    for re in RE_BOILERPLATE.iter() {
        pruned = re.replace_all(&pruned, "").into_owned();
    }

    let container = [&*RE_ARTICLE, &*RE_MAIN, &*RE_BODY]
        .iter()
        .find_map(|re| re.captures(&pruned).map(|c| c[1].to_string()))
        .unwrap_or_else(|| pruned.clone());

    let unlinked = RE_LINK_TAG.replace_all(&container, "");
    let content = RE_IMG_TAG.replace_all(&unlinked, "");

    let text = html_to_text(&content)?;
    Ok(Article { title, text })
}

fn extract_title(html: &str) -> Result<Option<String>, SummaizeError> {
    let og = RE_META_TAG
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|tag| RE_OG_TITLE.is_match(tag))
        .and_then(|tag| RE_CONTENT_ATTR.captures(tag))
        .and_then(|c| c.get(1).or_else(|| c.get(2)).map(|m| m.as_str().to_string()));

    let raw = og.or_else(|| RE_TITLE.captures(html).map(|c| c[1].to_string()));

    match raw {
        Some(raw) => {
            // Route through the HTML renderer so entities are decoded.
            let decoded = html_to_text(&format!("<p>{raw}</p>"))?;
            let title = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
            Ok(Some(title).filter(|t| !t.is_empty()))
        }
        None => Ok(None),
    }
}

fn html_to_text(html: &str) -> Result<String, SummaizeError> {
    html2text::config::plain()
        .string_from_read(html.as_bytes(), ARTICLE_WRAP_WIDTH)
        .map_err(|e| SummaizeError::Internal(format!("HTML rendering failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Ignored &amp; Fallback</title>
  <meta content="City Approves New Park" property="og:title">
  <style>body { color: red; }</style>
  <script>var tracking = "do not read me";</script>
</head>
<body>
  <header><nav><a href="/">Home</a> | <a href="/world">World</a></nav></header>
  <article>
    <h1>City Approves New Park</h1>
    <p>The council voted <a href="/votes">7-2</a> on Tuesday to fund the park.</p>
    <!-- ad slot -->
    <img src="park.jpg" alt="park">
    <p>Construction begins in spring.</p>
    <aside>Related: other stories</aside>
  </article>
  <footer>Copyright 2024</footer>
</body>
</html>"#;

    #[test]
    fn article_body_extracted() {
        let article = extract_article(NEWS_PAGE).unwrap();
        assert!(article.text.contains("The council voted 7-2 on Tuesday"), "got: {}", article.text);
        assert!(article.text.contains("Construction begins in spring."));
    }

    #[test]
    fn boilerplate_dropped() {
        let article = extract_article(NEWS_PAGE).unwrap();
        for junk in ["tracking", "color: red", "Home", "Copyright", "Related:", "ad slot"] {
            assert!(!article.text.contains(junk), "leaked {junk:?}: {}", article.text);
        }
    }

    #[test]
    fn og_title_preferred() {
        let article = extract_article(NEWS_PAGE).unwrap();
        assert_eq!(article.title.as_deref(), Some("City Approves New Park"));
    }

    #[test]
    fn title_tag_fallback_decodes_entities() {
        let html = "<html><head><title>Rates &amp; Rents</title></head><body><p>Body</p></body></html>";
        let article = extract_article(html).unwrap();
        assert_eq!(article.title.as_deref(), Some("Rates & Rents"));
        assert!(article.text.contains("Body"));
    }

    #[test]
    fn main_used_when_no_article() {
        let html = "<body><div>menu junk</div><main><p>Main story.</p></main></body>";
        let article = extract_article(html).unwrap();
        assert!(article.text.contains("Main story."));
        assert!(!article.text.contains("menu junk"));
    }

    #[test]
    fn fragment_without_body_still_renders() {
        let article = extract_article("<p>Just a fragment</p>").unwrap();
        assert!(article.text.contains("Just a fragment"));
        assert_eq!(article.title, None);
    }

    #[tokio::test]
    async fn fetch_rejects_non_http_urls() {
        let err = fetch_html("ftp://example.com/story", 5).await.unwrap_err();
        assert!(matches!(err, SummaizeError::InvalidUrl { .. }));
    }
}
