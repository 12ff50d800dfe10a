//! Public-domain book search through the Gutendex API

use std::{collections::HashSet, time::Duration};

use indexmap::IndexMap;

use crate::{
    config::SearchConfig,
    error::{AppError, AppResult},
    models::{
        optional_text,
        remote_book::{
            BookSearchQuery, DownloadKind, DownloadOption, GutendexBook, GutendexPage,
            RemoteBook, SearchResults,
        },
    },
};

pub const PLACEHOLDER_COVER: &str = "https://placehold.co/128x192/E0E0E0/505050?text=No+Cover";
const UNKNOWN_AUTHOR: &str = "Unknown author";

#[derive(Clone)]
pub struct GutendexClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl GutendexClient {
    pub fn new(config: SearchConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("biblioteca-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Search the catalogue, merging up to `max_pages` result pages
    pub async fn search(&self, query: &BookSearchQuery) -> AppResult<SearchResults> {
        let url = format!("{}/books/", self.config.base_url.trim_end_matches('/'));
        let params = self.query_params(query);
        tracing::debug!("Gutendex search {} {:?}", url, params);

        let first = self.fetch(self.http.get(&url).query(&params)).await?;
        let count = first.count;
        let mut next = first.next.clone();
        let mut pages = vec![first];

        while pages.len() < self.config.max_pages.max(1) as usize {
            let Some(link) = next.take() else { break };
            let page = self.fetch(self.http.get(&link)).await?;
            next = page.next.clone();
            pages.push(page);
        }

        Ok(SearchResults {
            count,
            books: merge_pages(pages),
        })
    }

    /// Query string for a search; empty criteria fall back to the popular listing
    pub fn query_params(&self, query: &BookSearchQuery) -> Vec<(&'static str, String)> {
        let search = optional_text(query.search.as_deref());
        let language = optional_text(query.language.as_deref());
        let category = optional_text(query.category.as_deref());

        let mut params = Vec::new();
        if search.is_none() && language.is_none() && category.is_none() {
            params.push(("sort", "popular".to_string()));
            params.push(("languages", self.config.default_language.clone()));
        } else {
            if let Some(search) = search {
                params.push(("search", search));
            }
            if let Some(language) = language {
                params.push(("languages", language));
            }
            if let Some(category) = category {
                params.push(("topic", category));
            }
        }
        if let Some(page) = query.page.filter(|p| *p > 1) {
            params.push(("page", page.to_string()));
        }
        params
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> AppResult<GutendexPage> {
        let response = request.send().await.map_err(upstream)?;
        let response = response.error_for_status().map_err(upstream)?;
        response.json::<GutendexPage>().await.map_err(upstream)
    }
}

fn upstream(e: reqwest::Error) -> AppError {
    AppError::Upstream(format!("Book search service unavailable: {}", e))
}

/// Flatten pages into display results, first occurrence of each id wins
pub fn merge_pages(pages: Vec<GutendexPage>) -> Vec<RemoteBook> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flat_map(|page| page.results)
        .filter(|book| seen.insert(book.id))
        .map(to_remote_book)
        .collect()
}

pub fn to_remote_book(book: GutendexBook) -> RemoteBook {
    let author = book
        .authors
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    RemoteBook {
        id: book.id,
        cover_url: cover_url(&book.formats),
        download: select_download(&book.formats),
        title: book.title,
        author,
        languages: book.languages,
        download_count: book.download_count,
    }
}

/// Best download: PDF, then EPUB, then the first plain text, then HTML to view
pub fn select_download(formats: &IndexMap<String, String>) -> Option<DownloadOption> {
    let option = |url: &String, label: &str, kind| DownloadOption {
        url: url.clone(),
        label: label.to_string(),
        kind,
    };

    if let Some(url) = formats.get("application/pdf") {
        return Some(option(url, "PDF", DownloadKind::Download));
    }
    if let Some(url) = formats.get("application/epub+zip") {
        return Some(option(url, "EPUB", DownloadKind::Download));
    }
    if let Some((_, url)) = formats
        .iter()
        .find(|(media_type, url)| media_type.starts_with("text/plain") && !url.is_empty())
    {
        return Some(option(url, "Text", DownloadKind::Download));
    }
    formats
        .get("text/html")
        .map(|url| option(url, "HTML", DownloadKind::View))
}

pub fn cover_url(formats: &IndexMap<String, String>) -> String {
    ["image/jpeg", "image/png", "image/webp"]
        .iter()
        .find_map(|media_type| formats.get(*media_type))
        .cloned()
        .unwrap_or_else(|| PLACEHOLDER_COVER.to_string())
}
