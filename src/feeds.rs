use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::FeedSource;
use std::collections::HashSet;

/// Expands the fixed feed URL set for a year range.
///
/// The three "modified" feeds come first, followed by the legacy XML 1.2,
/// XML 2.0 and JSON 1.0 feeds for each year in `start_year..=end_year`,
/// ascending. A range with `start_year > end_year` yields only the
/// "modified" feeds.
///
/// # Errors
///
/// Returns `UrlError` if an expanded URL is invalid and `InvalidInput` if two
/// sources would be stored under the same filename.
pub fn feed_sources(start_year: i32, end_year: i32) -> AppResult<Vec<FeedSource>> {
    let mut urls = vec![
        CVE_XML_12_MODIFIED_URL.to_string(),
        CVE_XML_20_MODIFIED_URL.to_string(),
        CVE_JSON_10_MODIFIED_URL.to_string(),
    ];
    for year in start_year..=end_year {
        for template in [
            CVE_XML_12_YEAR_TEMPLATE,
            CVE_XML_20_YEAR_TEMPLATE,
            CVE_JSON_10_YEAR_TEMPLATE,
        ] {
            urls.push(expand_template(template, year));
        }
    }

    let sources = urls
        .iter()
        .map(|url| FeedSource::from_url(url))
        .collect::<AppResult<Vec<_>>>()?;
    ensure_unique_filenames(&sources)?;
    Ok(sources)
}

fn expand_template(template: &str, year: i32) -> String {
    template.replace(YEAR_PLACEHOLDER, &format!("{year:04}"))
}

fn ensure_unique_filenames(sources: &[FeedSource]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.filename()) {
            return Err(AppError::InvalidInput(format!(
                "Duplicate feed filename '{}' from {}",
                source.filename(),
                source.url()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filenames(sources: &[FeedSource]) -> Vec<&str> {
        sources.iter().map(FeedSource::filename).collect()
    }

    #[test]
    fn test_two_years_expand_to_nine_sources() {
        let sources = feed_sources(2020, 2021).unwrap();
        assert_eq!(sources.len(), 9);
    }

    #[test]
    fn test_modified_feeds_come_first_then_years_ascending() {
        let sources = feed_sources(2020, 2021).unwrap();
        assert_eq!(
            filenames(&sources),
            vec![
                "nvdcve-Modified.xml.gz",
                "nvdcve-2.0-Modified.xml.gz",
                "nvdcve-1.0-modified.json.gz",
                "nvdcve-2020.xml.gz",
                "nvdcve-2.0-2020.xml.gz",
                "nvdcve-1.0-2020.json.gz",
                "nvdcve-2021.xml.gz",
                "nvdcve-2.0-2021.xml.gz",
                "nvdcve-1.0-2021.json.gz",
            ]
        );
    }

    #[test]
    fn test_yearly_urls_use_expected_hosts() {
        let sources = feed_sources(2002, 2002).unwrap();
        assert_eq!(
            sources[3].url().as_str(),
            "https://nvd.nist.gov/download/nvdcve-2002.xml.gz"
        );
        assert_eq!(
            sources[4].url().as_str(),
            "https://nvd.nist.gov/feeds/xml/cve/nvdcve-2.0-2002.xml.gz"
        );
        assert_eq!(
            sources[5].url().as_str(),
            "https://static.nvd.nist.gov/feeds/json/cve/1.0/nvdcve-1.0-2002.json.gz"
        );
    }

    #[test]
    fn test_inverted_range_yields_only_modified_feeds() {
        let sources = feed_sources(2022, 2021).unwrap();
        assert_eq!(sources.len(), 3);
    }

    #[test]
    fn test_full_default_range_has_unique_filenames() {
        let sources = feed_sources(2002, 2026).unwrap();
        assert_eq!(sources.len(), 3 + 3 * 25);
        let unique: HashSet<_> = sources.iter().map(FeedSource::filename).collect();
        assert_eq!(unique.len(), sources.len());
    }

    #[test]
    fn test_duplicate_filenames_are_rejected() {
        let sources = vec![
            FeedSource::from_url("https://a.example.com/feed.gz").unwrap(),
            FeedSource::from_url("https://b.example.com/other/feed.gz").unwrap(),
        ];
        assert!(matches!(
            ensure_unique_filenames(&sources),
            Err(AppError::InvalidInput(_))
        ));
    }
}
