//! Common types used across the domain

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::MAX_PAGE_SIZE;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(
    /// Citizen identifier
    CitizenId
);
define_id!(
    /// Civic issue identifier
    IssueId
);
define_id!(
    /// Event identifier
    EventId
);
define_id!(
    /// Survey identifier
    SurveyId
);
define_id!(
    /// Survey question identifier
    QuestionId
);
define_id!(
    /// Survey response identifier
    ResponseId
);
define_id!(
    /// Council member identifier
    MemberId
);
define_id!(
    /// Governance decision identifier
    DecisionId
);

/// Postal location with optional coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,
}

impl Location {
    /// Address with surrounding whitespace removed, if present and non-blank
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.address().is_none()
            && non_blank_ref(&self.city).is_none()
            && non_blank_ref(&self.state).is_none()
            && non_blank_ref(&self.zip_code).is_none()
            && self.coordinates.is_none()
    }
}

/// Requested page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build a request, clamping page to at least 1 and limit to `1..=MAX_PAGE_SIZE`
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// Pagination metadata returned with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: usize,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Cut a page out of an already filtered and sorted list
    pub fn from_sorted(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let limit = request.limit as usize;
        let pages = total.div_ceil(limit);
        let items = items
            .into_iter()
            .skip(request.offset())
            .take(limit)
            .collect();
        Self {
            items,
            pagination: Pagination {
                page: request.page,
                limit: request.limit,
                total,
                pages,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Case-insensitive text search
///
/// The term is treated as a regular expression. Terms that do not compile
/// fall back to a literal match.
#[derive(Debug, Clone)]
pub struct SearchPattern(Regex);

impl SearchPattern {
    const SIZE_LIMIT: usize = 1 << 16;

    /// Returns `None` for blank terms
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(Self::SIZE_LIMIT)
                .build()
        };
        build(term)
            .or_else(|_| build(&regex::escape(term)))
            .ok()
            .map(Self)
    }

    /// True when any of the fields matches
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields.into_iter().any(|f| self.0.is_match(f))
    }
}

/// Trimmed copy of an optional string, `None` when blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Borrowing variant of [`non_blank`]
pub fn non_blank_ref(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
