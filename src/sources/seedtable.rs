//! SeedTable startup-directory scraper.
//!
//! SeedTable lists startups as self-contained directory cards, so all
//! fields come from the listing page itself and no per-item detail fetch
//! (and therefore no pacing) is needed.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::{select_text, FundingSource};
use crate::models::FundingRecord;
use crate::utils::{today_iso, BoxError};

const LISTING_URL: &str = "https://www.seedtable.com/startups-europe";

/// Directory cards do not state a round.
const STAGE_FALLBACK: &str = "Unknown";

static CARD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.startup-card").unwrap());
static NAME_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("h3.startup-name").unwrap());
static WEBSITE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.startup-website[href]").unwrap());
static DESCRIPTION_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.startup-description").unwrap());
static COUNTRY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.startup-country").unwrap());
static INDUSTRY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.startup-industry").unwrap());

pub struct SeedTable {
    client: reqwest::Client,
}

impl SeedTable {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
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
        let records = parse_cards(&html, &base);
        info!(count = records.len(), "Parsed SeedTable cards");
        Ok(records)
    }
}

#[async_trait::async_trait]
impl FundingSource for SeedTable {
    fn name(&self) -> &'static str {
        "seedtable"
    }

    async fn fetch_records(&self) -> Vec<FundingRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(e) => {
                error!(url = LISTING_URL, error = %e, "SeedTable listing failed");
                Vec::new()
            }
        }
    }
}

/// Map each directory card onto a record; cards without a name are skipped.
fn parse_cards(html: &str, base: &Url) -> Vec<FundingRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for card in document.select(&CARD_SEL) {
        let name = select_text(card, &NAME_SEL);
        if name.is_empty() {
            warn!("SeedTable card without a name; skipping");
            continue;
        }

        let website_url = card
            .select(&WEBSITE_SEL)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| base.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_default();

        records.push(FundingRecord {
            name,
            industry: select_text(card, &INDUSTRY_SEL),
            country: select_text(card, &COUNTRY_SEL),
            activities: select_text(card, &DESCRIPTION_SEL),
            website_url,
            funding_stage: STAGE_FALLBACK.to_string(),
            last_update: today_iso(),
            source: "seedtable".to_string(),
            ..Default::default()
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS_FIXTURE: &str = r#"
        <html><body>
          <div class="startup-card">
            <h3 class="startup-name">  Delta  Analytics </h3>
            <a class="startup-website" href="https://delta.example">site</a>
            <p class="startup-description">Data
               tooling for biotech labs.</p>
            <span class="startup-country">Sweden</span>
            <span class="startup-industry">Biotech</span>
          </div>
          <div class="startup-card">
            <h3 class="startup-name">Epsilon</h3>
          </div>
          <div class="startup-card">
            <p class="startup-description">card missing its name</p>
          </div>
        </body></html>"#;

    #[test]
    fn test_parse_cards_full_and_sparse() {
        let base = Url::parse(LISTING_URL).unwrap();
        let records = parse_cards(CARDS_FIXTURE, &base);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name, "Delta Analytics");
        assert_eq!(records[0].website_url, "https://delta.example/");
        assert_eq!(records[0].activities, "Data tooling for biotech labs.");
        assert_eq!(records[0].country, "Sweden");
        assert_eq!(records[0].industry, "Biotech");
        assert_eq!(records[0].funding_stage, "Unknown");
        assert_eq!(records[0].source, "seedtable");

        // Sparse card keeps defaults rather than failing.
        assert_eq!(records[1].name, "Epsilon");
        assert_eq!(records[1].website_url, "");
        assert_eq!(records[1].country, "");
    }

    #[test]
    fn test_nameless_card_is_skipped() {
        let base = Url::parse(LISTING_URL).unwrap();
        let records = parse_cards(CARDS_FIXTURE, &base);
        assert!(records.iter().all(|r| !r.name.is_empty()));
    }

    #[test]
    fn test_unrelated_markup_yields_nothing() {
        let base = Url::parse(LISTING_URL).unwrap();
        assert!(parse_cards("<html><body><table></table></body></html>", &base).is_empty());
    }
}
