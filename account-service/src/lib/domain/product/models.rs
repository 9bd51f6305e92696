use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: description.into(),
            price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One page of a listing.
///
/// Pages are 1-based. Absent, unparsable or non-positive values fall back
/// to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PER_PAGE: u32 = 1000;

    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: if page == 0 { Self::DEFAULT_PAGE } else { page },
            per_page: if per_page == 0 {
                Self::DEFAULT_PER_PAGE
            } else {
                per_page
            },
        }
    }

    /// Build from raw query-string values.
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self::new(parse_positive(page), parse_positive(per_page))
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Rows to skip. Saturates instead of overflowing for absurd pages.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1).saturating_mul(i64::from(self.per_page))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_PER_PAGE)
    }
}

fn parse_positive(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        assert_eq!(Page::parse(None, None), Page::new(1, 1000));
        assert_eq!(Page::parse(Some("abc"), Some("-5")), Page::new(1, 1000));
        assert_eq!(Page::parse(Some("0"), Some("0")), Page::default());
    }

    #[test]
    fn test_page_limit_offset() {
        let page = Page::parse(Some("3"), Some("20"));

        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(Page::default().offset(), 0);
    }

    #[test]
    fn test_offset_saturates_at_maximum_values() {
        let page = Page::parse(Some("4294967295"), Some("4294967295"));

        assert_eq!(page.limit(), i64::from(u32::MAX));
        assert_eq!(page.offset(), i64::MAX);
    }
}
