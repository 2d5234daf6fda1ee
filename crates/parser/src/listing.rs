use outreach_core::{DriverError, JobRecord, Selectors};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One rendered result container: its title texts and outbound hrefs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCard {
    pub titles: Vec<String>,
    pub links: Vec<String>,
}

fn parse_selector(selector: &str) -> Result<Selector, DriverError> {
    Selector::parse(selector)
        .map_err(|e| DriverError::parsing_error(format!("Invalid selector '{}': {}", selector, e)))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects every result container on a rendered search page.
///
/// Relative hrefs are resolved against `page_url`; hrefs that cannot be
/// resolved are kept verbatim.
pub fn parse_listing(html: &str, page_url: &str, selectors: &Selectors) -> Result<Vec<ListingCard>, DriverError> {
    let item_sel = parse_selector(&selectors.listing_item)?;
    let title_sel = parse_selector(&selectors.listing_title)?;
    let link_sel = parse_selector(&selectors.listing_link)?;
    let base = Url::parse(page_url).ok();

    let document = Html::parse_document(html);
    let cards = document
        .select(&item_sel)
        .map(|item| ListingCard {
            titles: item.select(&title_sel).map(element_text).collect(),
            links: item
                .select(&link_sel)
                .filter_map(|a| a.value().attr("href"))
                .map(|href| resolve(base.as_ref(), href))
                .collect(),
        })
        .collect();

    Ok(cards)
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

/// Pairs every title in a card with every usable link in the same card.
pub fn job_records(cards: &[ListingCard], login_prefix: &str) -> Vec<JobRecord> {
    let mut records = Vec::new();
    for card in cards {
        for title in &card.titles {
            for link in &card.links {
                if link.is_empty() || link.contains(login_prefix) {
                    continue;
                }
                records.push(JobRecord::new(title.clone(), link.clone()));
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body>
          <div id="results">
            <article>
              <a href="/jobsearch/jobposting/41234567?source=searchresults">
                <span class="noctitle">
                  Cook
                </span>
              </a>
              <a href="https://www.jobbank.gc.ca/login?return=41234567">Save</a>
              <a href="https://www.jobbank.gc.ca/jobsearch/jobposting/41234567#map">Map</a>
            </article>
            <article>
              <span class="noctitle">Baker <small>(new)</small></span>
              <a href="/jobsearch/jobposting/41230000">View</a>
            </article>
            <article><p>No title here</p><a href="/x">x</a></article>
          </div>
          <div id="morepage"><button>Show more results</button></div>
        </body></html>
    "#;

    #[test]
    fn parses_cards_and_resolves_links() {
        let cards = parse_listing(PAGE, "https://www.jobbank.gc.ca/jobsearch/jobsearch?searchstring=cook", &Selectors::default())
            .unwrap();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].titles, vec!["Cook".to_string()]);
        assert_eq!(
            cards[0].links[0],
            "https://www.jobbank.gc.ca/jobsearch/jobposting/41234567?source=searchresults"
        );
        assert_eq!(cards[1].titles, vec!["Baker (new)".to_string()]);
        assert!(cards[2].titles.is_empty());
    }

    #[test]
    fn drops_login_links_and_pairs_titles() {
        let selectors = Selectors::default();
        let cards = parse_listing(PAGE, "https://www.jobbank.gc.ca/jobsearch/jobsearch", &selectors).unwrap();
        let records = job_records(&cards, &selectors.login_prefix);

        assert_eq!(
            records,
            vec![
                JobRecord::new(
                    "Cook",
                    "https://www.jobbank.gc.ca/jobsearch/jobposting/41234567?source=searchresults"
                ),
                JobRecord::new("Cook", "https://www.jobbank.gc.ca/jobsearch/jobposting/41234567#map"),
                JobRecord::new("Baker (new)", "https://www.jobbank.gc.ca/jobsearch/jobposting/41230000"),
            ]
        );
    }

    #[test]
    fn two_cards_two_links_each_give_four_records() {
        let cards = vec![
            ListingCard {
                titles: vec!["Welder".into()],
                links: vec!["https://a.example/1".into(), "https://a.example/2".into()],
            },
            ListingCard {
                titles: vec!["Welder".into()],
                links: vec!["https://a.example/3".into(), "https://a.example/login/x".into(), "https://a.example/4".into()],
            },
        ];

        let records = job_records(&cards, "https://a.example/login");
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.title == "Welder"));
    }

    #[test]
    fn invalid_selector_is_a_parsing_error() {
        let selectors = Selectors {
            listing_item: "article[".to_string(),
            ..Selectors::default()
        };
        let err = parse_listing(PAGE, "https://www.jobbank.gc.ca/", &selectors).unwrap_err();
        assert_eq!(err.category, outreach_core::ErrorCategory::Parsing);
    }
}
