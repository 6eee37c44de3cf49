use serde::{Deserialize, Deserializer};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

/// `?page=&limit=` as sent by the client. Zero, empty, unparsable or missing
/// values fall back to defaults.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<u32>,
}

fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| raw.trim().parse().ok()))
}

impl Page {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> u32 {
        match self.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => limit.min(MAX_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        let page = self.page.unwrap_or(1).max(1);
        u64::from(page - 1) * u64::from(self.limit())
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::Query, http::Uri};

    use super::*;

    fn parse(uri: &'static str) -> Page {
        let Query(page) = Query::try_from_uri(&Uri::from_static(uri)).unwrap();
        page
    }

    #[test]
    fn blank_or_garbage_query_means_defaults() {
        for uri in ["/feed", "/feed?page=&limit=", "/feed?page=1&limit=abc", "/feed?page=-2&limit=-5"] {
            let page = parse(uri);
            assert_eq!((page.limit(), page.skip()), (DEFAULT_LIMIT, 0), "{uri}");
        }

        let page = parse("/feed?page=3&limit=20");
        assert_eq!((page.limit(), page.skip()), (20, 40));
    }

    #[test]
    fn defaults_and_clamping() {
        let page = Page::default();
        assert_eq!((page.limit(), page.skip()), (DEFAULT_LIMIT, 0));

        assert_eq!(Page::new(1, 1000).limit(), MAX_LIMIT);
        assert_eq!(Page::new(2, 10).skip(), 10);
        assert_eq!(Page::new(3, 1000).skip(), 100);
        assert_eq!(Page::new(0, 0).skip(), 0);
    }
}
