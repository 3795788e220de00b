//! mvnrepository.com source implementation.
//!
//! The site has no API, so every lookup fetches a page and reads it with CSS
//! selectors. The selectors below are the whole contract with the site.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::models::{ArtifactRecord, BuildTool, Coordinate, SearchRecord, VersionSnippet};
use crate::sources::{Repository, SourceError};
use crate::utils::HttpClient;

/// One block per search hit
const RESULT_BLOCK: &str = "#maincontent div.im";
const TITLE_LINK: &str = "div.im-header > h2.im-title > a:nth-child(2)";
const GROUP_LINK: &str = "div.im-header > p > a:nth-child(1)";
const ARTIFACT_LINK: &str = "div.im-header > p > a:nth-child(2)";
const DESCRIPTION: &str = "div.im-description";

/// Version buttons on the artifact page
const VERSION_BUTTON: &str = "#snippets a.vbtn";

/// Snippets start with a comment pointing back at the site. Matched anywhere in
/// the text, not only at the start of the first line.
const SITE_COMMENT_PATTERN: &str = r"https?://mvnrepository\.com";

/// mvnrepository.com source
#[derive(Debug, Clone)]
pub struct MvnRepositorySource {
    client: Arc<HttpClient>,
    base_url: String,
    site_comment: Regex,
}

impl MvnRepositorySource {
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&SiteConfig::default())
    }

    /// Create a source for the site and timeouts in `config`
    pub fn from_config(config: &SiteConfig) -> Result<Self, SourceError> {
        let client = HttpClient::from_config(config)?;
        Self::with_client(client, &config.base_url)
    }

    /// Create a source with a prepared client, rooted at `base_url`
    pub fn with_client(client: HttpClient, base_url: &str) -> Result<Self, SourceError> {
        url::Url::parse(base_url).map_err(|e| {
            SourceError::InvalidRequest(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            site_comment: site_comment_marker()?,
        })
    }

    /// GET a page and return its body
    async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        // 404 pages are parsed like any other page and simply match nothing.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::Network(format!("{} returned status: {}", url, status)));
        }

        if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.contains("html") {
                return Err(SourceError::Parse(format!(
                    "Expected HTML from {}, got '{}'",
                    url, content_type
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read HTML: {}", e)))
    }
}

#[async_trait]
impl Repository for MvnRepositorySource {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchRecord>, SourceError> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(keyword));
        let html = self.fetch_page(&url).await?;
        let records = parse_search_page(&html, &self.base_url)?;

        tracing::debug!("Found {} artifacts for '{}'", records.len(), keyword);
        Ok(records)
    }

    async fn list_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<ArtifactRecord>, SourceError> {
        let url = Coordinate::new(group_id, artifact_id).page_url(&self.base_url);
        let html = self.fetch_page(&url).await?;
        let records = parse_versions_page(&html, &self.base_url, group_id, artifact_id)?;

        tracing::debug!(
            "Found {} versions of {}:{}",
            records.len(),
            group_id,
            artifact_id
        );
        Ok(records)
    }

    async fn fetch_snippet(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<VersionSnippet, SourceError> {
        let url = Coordinate::new(group_id, artifact_id)
            .with_version(version)
            .page_url(&self.base_url);
        let html = self.fetch_page(&url).await?;
        parse_snippet_page(&html, &self.site_comment)
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

/// Text of the first element under `elem` matching `sel`, trimmed
fn first_text(elem: &ElementRef, sel: &Selector) -> String {
    elem.select(sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Parse the search results page into records.
///
/// Blocks without a title (ads, headers) are skipped.
pub fn parse_search_page(html: &str, base_url: &str) -> Result<Vec<SearchRecord>, SourceError> {
    let document = Html::parse_document(html);

    let block_selector = selector(RESULT_BLOCK)?;
    let title_selector = selector(TITLE_LINK)?;
    let group_selector = selector(GROUP_LINK)?;
    let artifact_selector = selector(ARTIFACT_LINK)?;
    let description_selector = selector(DESCRIPTION)?;

    let mut records = Vec::new();
    for block in document.select(&block_selector) {
        let Some(title_link) = block.select(&title_selector).next() else {
            continue;
        };

        let title = title_link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let description = block
            .select(&description_selector)
            .next()
            .map(|d| truncate_description(&d.inner_html()))
            .unwrap_or_default();

        let url = title_link
            .value()
            .attr("href")
            .map(|href| resolve_url(base_url, href))
            .unwrap_or_default();

        records.push(SearchRecord {
            title,
            group_id: first_text(&block, &group_selector),
            artifact_id: first_text(&block, &artifact_selector),
            url,
            description,
        });
    }

    Ok(records)
}

/// Cut a description fragment before the first nested `<div` and drop newlines.
///
/// The description node on the search page also carries the artifact's stats
/// in child `div`s; only the leading text is the description itself.
pub fn truncate_description(fragment: &str) -> String {
    let head = fragment.split("<div").next().unwrap_or_default();
    head.replace('\n', "").trim().to_string()
}

/// Resolve an `href` from the site against its origin
pub fn resolve_url(base_url: &str, href: &str) -> String {
    match url::Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), href),
    }
}

/// Parse the version buttons of an artifact page
pub fn parse_versions_page(
    html: &str,
    base_url: &str,
    group_id: &str,
    artifact_id: &str,
) -> Result<Vec<ArtifactRecord>, SourceError> {
    let document = Html::parse_document(html);
    let version_selector = selector(VERSION_BUTTON)?;

    let records = document
        .select(&version_selector)
        .map(|button| button.text().collect::<String>().trim().to_string())
        .filter(|version| !version.is_empty())
        .map(|version| ArtifactRecord::new(base_url, group_id, artifact_id, version))
        .collect();

    Ok(records)
}

/// Parse the four snippet textareas of a version page
pub fn parse_snippet_page(html: &str, marker: &Regex) -> Result<VersionSnippet, SourceError> {
    let document = Html::parse_document(html);

    let read = |tool: BuildTool| -> Result<String, SourceError> {
        let sel = selector(&format!("textarea#{}", tool.textarea_id()))?;
        let text: String = document
            .select(&sel)
            .flat_map(|area| area.text())
            .collect();
        Ok(strip_site_comment(&text, marker))
    };

    Ok(VersionSnippet {
        maven: read(BuildTool::Maven)?,
        gradle: read(BuildTool::Gradle)?,
        sbt: read(BuildTool::Sbt)?,
        ivy: read(BuildTool::Ivy)?,
    })
}

/// Regex recognising the site-origin comment of a snippet
pub fn site_comment_marker() -> Result<Regex, SourceError> {
    Regex::new(SITE_COMMENT_PATTERN)
        .map_err(|e| SourceError::Other(format!("Invalid site comment pattern: {}", e)))
}

/// Drop the first line of `text` if the site URL appears anywhere in it.
pub fn strip_site_comment(text: &str, marker: &Regex) -> String {
    if !marker.is_match(text) {
        return text.to_string();
    }

    match text.split_once('\n') {
        Some((_, rest)) => rest.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://mvnrepository.com";

    const SEARCH_PAGE: &str = r#"
<html><body>
<div id="maincontent">
  <div class="im">
    <div class="im-header">
      <h2 class="im-title"><span class="im-index">1. </span><a href="/artifact/org.jetbrains.kotlin/kotlin-stdlib">Kotlin Stdlib</a><a class="im-usage" href="/artifact/org.jetbrains.kotlin/kotlin-stdlib/usages"><b>8,102</b> usages</a></h2>
      <p class="im-subtitle"><a href="/artifact/org.jetbrains.kotlin">org.jetbrains.kotlin</a> » <a href="/artifact/org.jetbrains.kotlin/kotlin-stdlib">kotlin-stdlib</a></p>
    </div>
    <div class="im-description">
Kotlin Standard Library for JVM
<div class="im-stats">Last Release on Dec 5, 2018</div>
    </div>
  </div>
  <div class="im">
    <div class="im-header"><h2 class="im-title"><span></span><a href="/ads"></a></h2></div>
  </div>
  <div class="im">
    <div class="im-header">
      <h2 class="im-title"><span class="im-index">2. </span><a>Kotlin Reflect</a></h2>
      <p class="im-subtitle"><a>org.jetbrains.kotlin</a> » <a>kotlin-reflect</a></p>
    </div>
  </div>
</div>
</body></html>
"#;

    #[test]
    fn test_parse_search_page() {
        let records = parse_search_page(SEARCH_PAGE, BASE).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title, "Kotlin Stdlib");
        assert_eq!(first.group_id, "org.jetbrains.kotlin");
        assert_eq!(first.artifact_id, "kotlin-stdlib");
        assert_eq!(
            first.url,
            "https://mvnrepository.com/artifact/org.jetbrains.kotlin/kotlin-stdlib"
        );
        assert_eq!(first.description, "Kotlin Standard Library for JVM");
    }

    #[test]
    fn test_parse_search_page_missing_fields_degrade() {
        let records = parse_search_page(SEARCH_PAGE, BASE).unwrap();
        let second = &records[1];
        assert_eq!(second.title, "Kotlin Reflect");
        assert_eq!(second.artifact_id, "kotlin-reflect");
        assert_eq!(second.url, "");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_parse_search_page_unknown_markup() {
        let records = parse_search_page("<html><body><p>maintenance</p></body></html>", BASE);
        assert!(records.unwrap().is_empty());
    }

    #[test]
    fn test_truncate_description() {
        assert_eq!(
            truncate_description("\nJSON library\n<div class=\"im-stats\">x</div>"),
            "JSON library"
        );
        assert_eq!(truncate_description("no\nnested\nblocks"), "nonestedblocks");
        assert_eq!(truncate_description("<div>only stats</div>"), "");
        assert_eq!(truncate_description(""), "");
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url(BASE, "/artifact/g/a"),
            "https://mvnrepository.com/artifact/g/a"
        );
        assert_eq!(
            resolve_url("http://127.0.0.1:4000", "/artifact/g/a"),
            "http://127.0.0.1:4000/artifact/g/a"
        );
    }

    #[test]
    fn test_parse_versions_page() {
        let html = r#"
<div id="snippets">
  <table><tbody>
    <tr><td><a class="vbtn release" href="kotlin-stdlib/1.3.11">1.3.11</a></td></tr>
    <tr><td><a class="vbtn release" href="kotlin-stdlib/1.3.10">1.3.10</a></td></tr>
    <tr><td><a class="vbtn beta" href="kotlin-stdlib/1.3.20-eap-25"> 1.3.20-eap-25 </a></td></tr>
  </tbody></table>
</div>
<a class="vbtn" href="/elsewhere">9.9.9</a>
"#;
        let records =
            parse_versions_page(html, BASE, "org.jetbrains.kotlin", "kotlin-stdlib").unwrap();
        let versions: Vec<_> = records.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.3.11", "1.3.10", "1.3.20-eap-25"]);
        assert_eq!(
            records[0].url,
            "https://mvnrepository.com/artifact/org.jetbrains.kotlin/kotlin-stdlib/1.3.11"
        );
    }

    #[test]
    fn test_parse_snippet_page() {
        let html = r#"
<textarea id="maven-a"><!-- https://mvnrepository.com/artifact/org.jetbrains.kotlin/kotlin-stdlib -->
<dependency>
    <groupId>org.jetbrains.kotlin</groupId>
    <artifactId>kotlin-stdlib</artifactId>
    <version>1.3.11</version>
</dependency>
</textarea>
<textarea id="gradle-a">// https://mvnrepository.com/artifact/org.jetbrains.kotlin/kotlin-stdlib
compile group: 'org.jetbrains.kotlin', name: 'kotlin-stdlib', version: '1.3.11'
</textarea>
<textarea id="sbt-a">libraryDependencies += "org.jetbrains.kotlin" % "kotlin-stdlib" % "1.3.11"</textarea>
"#;
        let marker = site_comment_marker().unwrap();
        let snippet = parse_snippet_page(html, &marker).unwrap();

        assert!(snippet.maven.starts_with("<dependency>"));
        assert!(snippet
            .maven
            .contains("<artifactId>kotlin-stdlib</artifactId>"));
        assert!(!snippet.maven.contains("mvnrepository.com"));
        assert!(snippet.gradle.starts_with("compile group:"));
        assert_eq!(
            snippet.sbt,
            r#"libraryDependencies += "org.jetbrains.kotlin" % "kotlin-stdlib" % "1.3.11""#
        );
        assert_eq!(snippet.ivy, "");
    }

    #[test]
    fn test_strip_site_comment_permissive_match() {
        let marker = site_comment_marker().unwrap();

        // The URL does not have to open the first line.
        let text = "first line\nsecond https://mvnrepository.com/x\nthird";
        assert_eq!(
            strip_site_comment(text, &marker),
            "second https://mvnrepository.com/x\nthird"
        );

        assert_eq!(strip_site_comment("plain\ntext", &marker), "plain\ntext");
        assert_eq!(strip_site_comment("https://mvnrepository.com", &marker), "");
    }

    #[test]
    fn test_strip_site_comment_idempotent() {
        let marker = site_comment_marker().unwrap();
        let snippets = [
            "<!-- https://mvnrepository.com/artifact/g1/a1 -->\n<dependency>\n    <groupId>g1</groupId>\n</dependency>",
            "// https://mvnrepository.com/artifact/g1/a1\ncompile group: 'g1', name: 'a1', version: '1.0'",
            "<dependency org=\"g1\" name=\"a1\" rev=\"1.0\"/>",
            "",
        ];

        for snippet in snippets {
            let once = strip_site_comment(snippet, &marker);
            let twice = strip_site_comment(&once, &marker);
            assert_eq!(once, twice, "stripping twice changed {:?}", snippet);
        }
    }
}
