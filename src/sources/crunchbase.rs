//! Crunchbase News funding-roundup scraper.
//!
//! Scrapes the Series A/B Europe & Middle East section of
//! [Crunchbase News](https://news.crunchbase.com). Each listing item links a
//! full article; the article page is fetched (paced) to pick up the
//! industry, country, and funding tags when present.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, warn};
use url::Url;

use super::{select_text, FundingSource};
use crate::models::FundingRecord;
use crate::pacing::Pacer;
use crate::utils::{extract_stage, normalize, today_iso, BoxError};

const LISTING_URL: &str =
    "https://news.crunchbase.com/startups/series-a-series-b-funding-europe-middle-east/";

/// Section-wide default when an article never states its round.
const STAGE_FALLBACK: &str = "Series A/B";

static ITEM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("article.post-block").unwrap());
static TITLE_LINK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("h2 a").unwrap());
static SUMMARY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".post-block__content").unwrap());
static INDUSTRY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".industry-tag").unwrap());
static COUNTRY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".country-tag").unwrap());
static FUNDING_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".funding-amount").unwrap());

/// One entry of the section listing before enrichment.
#[derive(Debug)]
struct ListingItem {
    name: String,
    link: String,
    summary: String,
}

/// Tags pulled from an individual article page.
#[derive(Debug, Default)]
struct ArticleDetails {
    industry: String,
    country: String,
    funding: String,
    body: String,
}

pub struct CrunchbaseNews {
    client: reqwest::Client,
    pacer: Pacer,
}

impl CrunchbaseNews {
    pub fn new(client: reqwest::Client, pacer: Pacer) -> Self {
        Self { client, pacer }
    }

    async fn try_fetch(&self) -> Result<Vec<FundingRecord>, BoxError> {
        let base = Url::parse(LISTING_URL)?;
        let html = self
            .client
            .get(LISTING_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let items = parse_listing(&html, &base);
        info!(count = items.len(), "Indexed Crunchbase News items");

        let mut records = Vec::new();
        for item in items {
            self.pacer.pace().await;
            let details = match self.fetch_details(&item.link).await {
                Ok(details) => details,
                Err(e) => {
                    warn!(link = %item.link, error = %e, "Article fetch failed; skipping item");
                    continue;
                }
            };

            let stage = if !details.funding.is_empty() {
                details.funding
            } else {
                let haystack = format!("{} {} {}", item.name, item.summary, details.body);
                extract_stage(&haystack).unwrap_or_else(|| STAGE_FALLBACK.to_string())
            };

            debug!(name = %item.name, %stage, "Extracted Crunchbase record");
            records.push(FundingRecord {
                name: item.name,
                industry: details.industry,
                country: details.country,
                activities: item.summary,
                funding_stage: stage,
                last_update: today_iso(),
                source: "crunchbase".to_string(),
                ..Default::default()
            });
        }
        Ok(records)
    }

    async fn fetch_details(&self, url: &str) -> Result<ArticleDetails, BoxError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_article(&html))
    }
}

#[async_trait::async_trait]
impl FundingSource for CrunchbaseNews {
    fn name(&self) -> &'static str {
        "crunchbase"
    }

    async fn fetch_records(&self) -> Vec<FundingRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(e) => {
                error!(url = LISTING_URL, error = %e, "Crunchbase News listing failed");
                Vec::new()
            }
        }
    }
}

/// Extract listing items from the section page.
///
/// An item without a usable title or link cannot be keyed or followed and
/// is skipped; a missing summary is tolerated as empty.
fn parse_listing(html: &str, base: &Url) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();

    for element in document.select(&ITEM_SEL) {
        let Some(title_el) = element.select(&TITLE_LINK_SEL).next() else {
            warn!("Listing item without a title link; skipping");
            continue;
        };
        let name = normalize(&title_el.text().collect::<Vec<_>>().join(" "));
        if name.is_empty() {
            warn!("Listing item with an empty title; skipping");
            continue;
        }
        let Some(href) = title_el.value().attr("href") else {
            warn!(%name, "Listing item without an href; skipping");
            continue;
        };
        let link = match base.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                warn!(%name, href, error = %e, "Unresolvable article link; skipping");
                continue;
            }
        };
        let summary = select_text(element, &SUMMARY_SEL);
        items.push(ListingItem {
            name,
            link,
            summary,
        });
    }
    items
}

/// Pull the optional enrichment tags out of an article page.
fn parse_article(html: &str) -> ArticleDetails {
    let document = Html::parse_document(html);
    let root = document.root_element();
    ArticleDetails {
        industry: select_text(root, &INDUSTRY_SEL),
        country: select_text(root, &COUNTRY_SEL),
        funding: select_text(root, &FUNDING_SEL),
        body: normalize(&root.text().collect::<Vec<_>>().join(" ")),
    }
}
