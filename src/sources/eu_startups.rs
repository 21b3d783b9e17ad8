//! EU-Startups funding-category scraper.
//!
//! Scrapes the funding category of [EU-Startups](https://www.eu-startups.com).
//! Headlines there follow the "Berlin-based Acme raises €10 million ..."
//! convention, so the company name and location are carved out of the title
//! text. Each post is fetched (paced) to scan the article body for the
//! round stage.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, error, info, warn};
use url::Url;

use super::{select_text, FundingSource};
use crate::models::FundingRecord;
use crate::pacing::Pacer;
use crate::utils::{extract_stage, normalize, today_iso, BoxError};

const LISTING_URL: &str = "https://www.eu-startups.com/category/funding/";

const STAGE_FALLBACK: &str = "Unknown";

static ITEM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.td_module_wrap").unwrap());
static TITLE_LINK_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.entry-title a[href]").unwrap());
static EXCERPT_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.td-excerpt").unwrap());
static BODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.td-post-content").unwrap());

/// "Berlin-based" and friends; the capital keeps "cloud-based" out.
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][\w'À-ÿ-]*)-based\b").unwrap());
static VERB_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+(raises|secures|lands|closes|bags|picks up|collects)\b").unwrap()
});
static BASED_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w'À-ÿ-]+-based\s+").unwrap());

#[derive(Debug)]
struct ListingItem {
    title: String,
    link: String,
    excerpt: String,
}

pub struct EuStartups {
    client: reqwest::Client,
    pacer: Pacer,
}

impl EuStartups {
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
        info!(count = items.len(), "Indexed EU-Startups posts");

        let mut records = Vec::new();
        for item in items {
            self.pacer.pace().await;
            let body = match self.fetch_body(&item.link).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(link = %item.link, error = %e, "Post fetch failed; skipping item");
                    continue;
                }
            };

            let name = company_from_title(&item.title);
            if name.is_empty() {
                warn!(title = %item.title, "Could not extract a company name; skipping");
                continue;
            }
            let haystack = format!("{} {} {}", item.title, item.excerpt, body);
            let stage = extract_stage(&haystack).unwrap_or_else(|| STAGE_FALLBACK.to_string());
            let country = location_from_title(&item.title).unwrap_or_default();

            debug!(%name, %stage, "Extracted EU-Startups record");
            records.push(FundingRecord {
                name,
                country,
                activities: item.excerpt,
                funding_stage: stage,
                last_update: today_iso(),
                source: "eu-startups".to_string(),
                ..Default::default()
            });
        }
        Ok(records)
    }

    async fn fetch_body(&self, url: &str) -> Result<String, BoxError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_body(&html))
    }
}

#[async_trait::async_trait]
impl FundingSource for EuStartups {
    fn name(&self) -> &'static str {
        "eu-startups"
    }

    async fn fetch_records(&self) -> Vec<FundingRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(e) => {
                error!(url = LISTING_URL, error = %e, "EU-Startups listing failed");
                Vec::new()
            }
        }
    }
}

fn parse_listing(html: &str, base: &Url) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();

    for element in document.select(&ITEM_SEL) {
        let Some(title_el) = element.select(&TITLE_LINK_SEL).next() else {
            warn!("Post without a title link; skipping");
            continue;
        };
        let title = normalize(&title_el.text().collect::<Vec<_>>().join(" "));
        if title.is_empty() {
            warn!("Post with an empty title; skipping");
            continue;
        }
        let Some(href) = title_el.value().attr("href") else {
            warn!(%title, "Post without an href; skipping");
            continue;
        };
        let link = match base.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                warn!(%title, href, error = %e, "Unresolvable post link; skipping");
                continue;
            }
        };
        let excerpt = select_text(element, &EXCERPT_SEL);
        items.push(ListingItem {
            title,
            link,
            excerpt,
        });
    }
    items
}

/// Article body text, for the stage scan.
fn parse_body(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&BODY_SEL)
        .next()
        .map(|el| normalize(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}

/// Carve the company name out of an EU-Startups headline.
///
/// Strips a leading "<Location>-based " and cuts at the first funding verb;
/// a headline that fits neither convention is kept whole so the record
/// still has a usable key.
fn company_from_title(title: &str) -> String {
    let stripped = BASED_PREFIX_RE.replace(title, "");
    let cut = match VERB_SPLIT_RE.find(&stripped) {
        Some(m) => &stripped[..m.start()],
        None => &stripped,
    };
    normalize(cut)
}

/// Location named in the "<Location>-based" headline prefix, if any.
fn location_from_title(title: &str) -> Option<String> {
    LOCATION_RE
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_FIXTURE: &str = r#"
        <html><body>
          <div class="td_module_wrap">
            <h3 class="entry-title"><a href="/2026/08/zeta-raises/">Berlin-based  Zeta
              raises €10 million for battery recycling</a></h3>
            <div class="td-excerpt"> Zeta recycles  grid batteries. </div>
          </div>
          <div class="td_module_wrap">
            <h3 class="entry-title"><a href="https://www.eu-startups.com/2026/08/eta/">Eta secures €3 million seed round</a></h3>
          </div>
          <div class="td_module_wrap">
            <h3 class="entry-title">no anchor inside</h3>
          </div>
        </body></html>"#;

    #[test]
    fn test_parse_listing_resolves_links_and_excerpts() {
        let base = Url::parse(LISTING_URL).unwrap();
        let items = parse_listing(LISTING_FIXTURE, &base);
        assert_eq!(items.len(), 2);

        assert_eq!(
            items[0].title,
            "Berlin-based Zeta raises €10 million for battery recycling"
        );
        assert_eq!(items[0].link, "https://www.eu-startups.com/2026/08/zeta-raises/");
        assert_eq!(items[0].excerpt, "Zeta recycles grid batteries.");

        assert_eq!(items[1].title, "Eta secures €3 million seed round");
        assert_eq!(items[1].excerpt, "");
    }

    #[test]
    fn test_company_from_title_strips_location_and_verb() {
        assert_eq!(
            company_from_title("Berlin-based Zeta raises €10 million for battery recycling"),
            "Zeta"
        );
        assert_eq!(company_from_title("Eta secures €3 million seed round"), "Eta");
        assert_eq!(
            company_from_title("Lisbon-based Theta Robotics closes Series A"),
            "Theta Robotics"
        );
    }

    #[test]
    fn test_company_from_title_keeps_unconventional_headlines_whole() {
        assert_eq!(
            company_from_title("Ten startups to watch in 2026"),
            "Ten startups to watch in 2026"
        );
    }

    #[test]
    fn test_location_from_title() {
        assert_eq!(
            location_from_title("Berlin-based Zeta raises €10 million"),
            Some("Berlin".to_string())
        );
        assert_eq!(location_from_title("Eta secures €3 million"), None);
        // Lowercase compounds are not locations.
        assert_eq!(location_from_title("A cloud-based platform raises €1M"), None);
    }

    #[test]
    fn test_parse_body_extracts_post_content() {
        let html = r#"<html><body>
            <div class="td-post-content"><p>Zeta  said the Series A round
              will fund expansion.</p></div>
        </body></html>"#;
        let body = parse_body(html);
        assert_eq!(body, "Zeta said the Series A round will fund expansion.");
        assert_eq!(extract_stage(&body), Some("Series A".to_string()));
    }

    #[test]
    fn test_parse_body_missing_container_is_empty() {
        assert_eq!(parse_body("<html><body><p>x</p></body></html>"), "");
    }
}
