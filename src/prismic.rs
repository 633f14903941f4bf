use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use url::Url;

/// One page of results from the `documents/search` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Opaque URL of the following page; absent on the last one.
    #[serde(default)]
    pub next_page: Option<String>,
    pub results: Vec<Document>,
}

/// A post document as the content service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: DocumentData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default)]
    pub content: Vec<SectionData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionData {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<ParagraphData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParagraphData {
    #[serde(default)]
    pub text: Option<String>,
}

/// API metadata from the endpoint root.
#[derive(Debug, Deserialize)]
struct Api {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Listing order over the post publication date.
#[derive(Debug, Clone, Copy)]
pub enum Order {
    /// `[document.first_publication_date]`
    Oldest,
    /// `[document.first_publication_date desc]`
    Newest,
}

/// Blocking client for the content service.
pub struct Client {
    http: reqwest::blocking::Client,
    api_url: Url,
    reference: String,
}

impl Client {
    /// Set up a client against the API endpoint. Queries run against the
    /// master content ref unless a preview ref overrides it (draft view).
    pub fn new(api_url: &str, preview_ref: Option<String>) -> Result<Self> {
        let api_url = Url::parse(api_url).context("Invalid content API URL")?;
        let http = reqwest::blocking::Client::new();
        let reference = match preview_ref {
            Some(reference) => reference,
            None => fetch_master_ref(&http, &api_url)?,
        };
        Ok(Client {
            http,
            api_url,
            reference,
        })
    }

    /// The content ref queries are pinned to.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Query one page of `posts` documents.
    pub fn query_posts(
        &self,
        page_size: u32,
        after: Option<&str>,
        order: Option<Order>,
    ) -> Result<SearchResponse> {
        let url = build_search_url(
            &self.api_url,
            &self.reference,
            r#"[[at(document.type,"posts")]]"#,
            page_size,
            after,
            order,
        )?;
        self.fetch_page(url.as_str())
    }

    /// Look up a single post by uid. A miss is `None`, not an error.
    pub fn get_by_uid(&self, uid: &str) -> Result<Option<Document>> {
        let predicate = format!(r#"[[at(my.posts.uid,"{}")]]"#, uid);
        let url = build_search_url(&self.api_url, &self.reference, &predicate, 1, None, None)?;
        let page = self.fetch_page(url.as_str())?;
        Ok(page.results.into_iter().next())
    }

    /// Posts adjacent to `document_id` in publication order, for the
    /// previous/next navigation on a post page.
    pub fn neighbors(&self, document_id: &str) -> Result<(Option<Document>, Option<Document>)> {
        let previous = self
            .query_posts(1, Some(document_id), Some(Order::Oldest))?
            .results
            .into_iter()
            .next();
        let next = self
            .query_posts(1, Some(document_id), Some(Order::Newest))?
            .results
            .into_iter()
            .next();
        Ok((previous, next))
    }

    /// Fetch one page of search results. `page_url` is either a freshly
    /// built query URL or the opaque `next_page` cursor of an earlier page.
    pub fn fetch_page(&self, page_url: &str) -> Result<SearchResponse> {
        let resp = self
            .http
            .get(page_url)
            .header("Accept", "application/json")
            .send()
            .context("HTTP request failed")?;

        if !resp.status().is_success() {
            bail!(
                "Content service returned HTTP {} for {}",
                resp.status(),
                page_url
            );
        }

        let page: SearchResponse = resp
            .json()
            .context("Failed to parse search response JSON")?;
        Ok(page)
    }
}

/// Fetch the endpoint metadata and pick out the master ref.
fn fetch_master_ref(http: &reqwest::blocking::Client, api_url: &Url) -> Result<String> {
    let resp = http
        .get(api_url.clone())
        .header("Accept", "application/json")
        .send()
        .context("HTTP request failed")?;

    if !resp.status().is_success() {
        bail!("Failed to fetch API metadata: HTTP {}", resp.status());
    }

    let api: Api = resp.json().context("Failed to parse API metadata JSON")?;
    pick_master_ref(&api.refs)
        .map(str::to_string)
        .context("API metadata lists no master ref")
}

fn pick_master_ref(refs: &[ApiRef]) -> Option<&str> {
    refs.iter()
        .find(|r| r.is_master_ref)
        .map(|r| r.reference.as_str())
}

/// Build a `documents/search` query URL against the API endpoint.
fn build_search_url(
    api_url: &Url,
    reference: &str,
    predicate: &str,
    page_size: u32,
    after: Option<&str>,
    order: Option<Order>,
) -> Result<Url> {
    let mut url = api_url.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("API URL cannot be a base: {}", api_url))?
        .pop_if_empty()
        .extend(["documents", "search"]);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("ref", reference);
        query.append_pair("q", predicate);
        query.append_pair("pageSize", &page_size.to_string());
        if let Some(id) = after {
            query.append_pair("after", id);
        }
        match order {
            Some(Order::Oldest) => {
                query.append_pair("orderings", "[document.first_publication_date]");
            }
            Some(Order::Newest) => {
                query.append_pair("orderings", "[document.first_publication_date desc]");
            }
            None => {}
        }
    }

    Ok(url)
}

/// Publication timestamps arrive as RFC 3339 or with a compact `+0000`
/// offset depending on the API version; accept both.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|parsed| parsed.with_timezone(&Utc))
}
