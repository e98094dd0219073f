//! Interactive image scraper.
//!
//! Prompts for a search query and an image count, pulls image URLs out of
//! Bing's image-search markup, and downloads them into a query-named
//! subdirectory of the output root. The fetch side sits behind a trait so
//! the prompt, validation, and download-loop logic are testable without
//! touching the network.
//!
//! Validation happens before any fetcher call: a non-integer count aborts
//! the run with `Error::InvalidCount` and nothing is downloaded.

use crate::config::ScrapeConfig;
use bt_common::{Error, Result};
use regex::Regex;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const SEARCH_ENDPOINT: &str = "https://www.bing.com/images/async";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0 Safari/537.36";

/// Capability to search for and fetch images.
pub trait ImageFetcher {
    /// Return up to `limit` image URLs for `query`.
    fn image_urls(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    /// Fetch one image's bytes.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches images through Bing's image-search index.
pub struct BingFetcher {
    client: reqwest::blocking::Client,
    murl: Regex,
    safe_search: bool,
    page_size: usize,
}

impl BingFetcher {
    /// Build a fetcher with the per-item timeout and safe-search setting
    /// from the config.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Download(e.to_string()))?;

        // Media URLs are embedded in the result markup as
        // `murl&quot;:&quot;<url>&quot;`.
        let murl = Regex::new(r#"murl&quot;:&quot;(.*?)&quot;"#)
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            client,
            murl,
            safe_search: config.safe_search,
            page_size: config.page_size.max(1),
        })
    }
}

impl ImageFetcher for BingFetcher {
    #[instrument(skip(self))]
    fn image_urls(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let adlt = if self.safe_search { "on" } else { "off" };
        let mut urls: Vec<String> = Vec::new();
        let mut first = 0usize;

        while urls.len() < limit {
            let offset = first.to_string();
            let count = self.page_size.to_string();
            let page = self
                .client
                .get(SEARCH_ENDPOINT)
                .query(&[
                    ("q", query),
                    ("first", offset.as_str()),
                    ("count", count.as_str()),
                    ("adlt", adlt),
                ])
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|e| Error::Download(e.to_string()))?;

            let before = urls.len();
            for capture in self.murl.captures_iter(&page) {
                let url = capture[1].to_string();
                if !urls.contains(&url) {
                    urls.push(url);
                    if urls.len() == limit {
                        break;
                    }
                }
            }

            // No new results means the index ran dry.
            if urls.len() == before {
                break;
            }
            first += self.page_size;
        }

        debug!(found = urls.len(), "collected image urls");
        Ok(urls)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| Error::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Summary of one scrape run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScrapeSummary {
    /// The search query.
    pub query: String,

    /// How many images the user asked for.
    pub requested: usize,

    /// Images written to disk this run.
    pub saved: usize,

    /// Items skipped: already present, or the individual fetch failed.
    pub skipped: usize,

    /// Directory the images landed in.
    pub directory: PathBuf,
}

/// Prompt for a query and a count on `input`, then download.
///
/// A non-integer count is rejected with `Error::InvalidCount` before any
/// fetcher call is made.
pub fn run_interactive(
    fetcher: &impl ImageFetcher,
    config: &ScrapeConfig,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<ScrapeSummary> {
    writeln!(out, "--- Image Scraper ---")?;

    writeln!(out, "What do you want to search for?")?;
    write!(out, "> ")?;
    out.flush()?;
    let query = read_line(input)?;

    writeln!(out, "How many images do you want to download?")?;
    write!(out, "> ")?;
    out.flush()?;
    let raw = read_line(input)?;
    let limit: usize = raw.parse().map_err(|_| Error::InvalidCount { input: raw })?;

    writeln!(
        out,
        "Searching for {query:?} and downloading up to {limit} images..."
    )?;
    download(fetcher, config, &query, limit, out)
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut buf = String::new();
    input.read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Download up to `limit` images for `query` into the query's directory.
///
/// Existing files are left alone unless the config says otherwise, and a
/// single failed fetch skips that item rather than aborting the run.
#[instrument(skip(fetcher, config, out))]
pub fn download(
    fetcher: &impl ImageFetcher,
    config: &ScrapeConfig,
    query: &str,
    limit: usize,
    out: &mut impl Write,
) -> Result<ScrapeSummary> {
    let directory = config.output_dir.join(query);
    fs::create_dir_all(&directory)?;

    let urls = fetcher.image_urls(query, limit)?;
    if urls.len() < limit {
        warn!(
            found = urls.len(),
            requested = limit,
            "index returned fewer images than requested"
        );
    }

    let mut saved = 0usize;
    let mut skipped = 0usize;
    for (index, url) in urls.iter().enumerate() {
        let path = directory.join(file_name(index + 1, url));
        if path.exists() && !config.force_replace {
            debug!(path = %path.display(), "already present, skipping");
            skipped += 1;
            continue;
        }

        match fetcher.fetch(url) {
            Ok(bytes) => {
                fs::write(&path, &bytes)?;
                saved += 1;
                if config.verbose {
                    writeln!(out, "[{}/{}] {}", index + 1, urls.len(), path.display())?;
                }
            }
            Err(err) => {
                // One bad URL does not abort the run.
                warn!(url = %url, error = %err, "image fetch failed");
                skipped += 1;
            }
        }
    }

    info!(saved, skipped, "scrape complete");
    writeln!(out, "Saved {saved} images to {}", directory.display())?;

    Ok(ScrapeSummary {
        query: query.to_string(),
        requested: limit,
        saved,
        skipped,
        directory,
    })
}

/// `Image_<n>` with the extension carried by the URL path, `jpg` when the
/// URL does not end in a plausible one.
fn file_name(index: usize, url: &str) -> String {
    let clean = url.split(['?', '#']).next().unwrap_or(url);
    let ext = Path::new(clean)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 4 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("jpg");
    format!("Image_{index}.{ext}")
}
