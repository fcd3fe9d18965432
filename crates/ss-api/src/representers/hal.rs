//! HAL+JSON building blocks
//!
//! Resources carry `_type` and `_links`; collections embed their
//! `elements` next to `total`, `count`, `pageSize` and `offset`.
//! See: https://datatracker.ietf.org/doc/html/draft-kelly-json-hal-08

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use ss_core::error::ValidationErrors;

pub const API_PREFIX: &str = "/api/v1";

/// A HAL link
#[derive(Debug, Clone, Serialize)]
pub struct HalLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl HalLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            method: None,
            templated: None,
        }
    }

    pub fn with_title(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(href)
        }
    }

    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            templated: Some(true),
            ..Self::new(href)
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// A link value can be a single link or an array of links
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HalLinkValue {
    Single(HalLink),
    Array(Vec<HalLink>),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HalLinks(HashMap<String, HalLinkValue>);

impl HalLinks {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn add(&mut self, rel: impl Into<String>, link: HalLink) {
        self.0.insert(rel.into(), HalLinkValue::Single(link));
    }

    pub fn add_array(&mut self, rel: impl Into<String>, links: Vec<HalLink>) {
        self.0.insert(rel.into(), HalLinkValue::Array(links));
    }

    pub fn with(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.add(rel, link);
        self
    }

    pub fn with_array(mut self, rel: impl Into<String>, links: Vec<HalLink>) -> Self {
        self.add_array(rel, links);
        self
    }

    pub fn has(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }

    pub fn get(&self, rel: &str) -> Option<&HalLinkValue> {
        self.0.get(rel)
    }
}

/// A HAL resource wrapper
#[derive(Debug, Clone, Serialize)]
pub struct HalResource<T> {
    #[serde(rename = "_type")]
    pub resource_type: String,
    #[serde(flatten)]
    pub resource: T,
    #[serde(rename = "_links")]
    pub links: HalLinks,
}

impl<T: Serialize> HalResource<T> {
    pub fn new(resource_type: impl Into<String>, resource: T) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource,
            links: HalLinks::new(),
        }
    }

    pub fn with_self_link(mut self, href: impl Into<String>) -> Self {
        self.links.add(rels::SELF, HalLink::new(href));
        self
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }

    pub fn with_links(mut self, links: HalLinks) -> Self {
        self.links = links;
        self
    }
}

/// A paginated HAL collection
#[derive(Debug, Clone, Serialize)]
pub struct HalCollection<T> {
    #[serde(rename = "_type")]
    pub collection_type: String,
    pub count: i64,
    pub total: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
    pub offset: i64,
    #[serde(rename = "_links")]
    pub links: HalLinks,
    #[serde(rename = "_embedded")]
    pub embedded: HalCollectionEmbedded<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HalCollectionEmbedded<T> {
    pub elements: Vec<T>,
}

impl<T: Serialize> HalCollection<T> {
    pub fn new(
        collection_type: impl Into<String>,
        elements: Vec<T>,
        total: i64,
        page_size: i64,
        offset: i64,
    ) -> Self {
        let count = elements.len() as i64;
        Self {
            collection_type: collection_type.into(),
            count,
            total,
            page_size,
            offset,
            links: HalLinks::new(),
            embedded: HalCollectionEmbedded { elements },
        }
    }

    /// Self, jump and neighbour page links
    pub fn with_pagination_links(mut self, base_url: &str) -> Self {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        let page_href = |offset: i64| {
            format!(
                "{}{}offset={}&pageSize={}",
                base_url, separator, offset, self.page_size
            )
        };

        let self_href = page_href(self.offset);
        let previous = (self.offset > 0).then(|| page_href((self.offset - self.page_size).max(0)));
        let next = (self.offset + self.page_size < self.total)
            .then(|| page_href(self.offset + self.page_size));

        self.links.add(rels::SELF, HalLink::new(self_href));
        self.links.add(
            "jumpTo",
            HalLink::templated(format!("{}{{?offset,pageSize}}", base_url)),
        );
        if let Some(href) = previous {
            self.links.add("previousByOffset", HalLink::new(href));
        }
        if let Some(href) = next {
            self.links.add("nextByOffset", HalLink::new(href));
        }
        self
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Error body in HAL format
#[derive(Debug, Clone, Serialize)]
pub struct HalError {
    #[serde(rename = "_type")]
    pub error_type: String,
    #[serde(rename = "errorIdentifier")]
    pub error_identifier: String,
    pub message: String,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<HalErrorEmbedded>,
}

/// Field errors keyed by attribute; record level errors use `base`
#[derive(Debug, Clone, Serialize)]
pub struct HalErrorEmbedded {
    pub details: BTreeMap<String, Vec<String>>,
}

impl HalError {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            error_type: "Error".to_string(),
            error_identifier: format!("urn:sheetstorm:api:v1:errors:{}", kind),
            message: message.into(),
            embedded: None,
        }
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut details = errors.errors.clone();
        if !errors.base_errors.is_empty() {
            details.insert("base".to_string(), errors.base_errors.clone());
        }
        Self {
            embedded: Some(HalErrorEmbedded { details }),
            ..Self::new("PropertyConstraintViolation", errors.full_messages().join(" "))
        }
    }
}

/// Link relations used across representers
pub mod rels {
    pub const SELF: &str = "self";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const PROJECT: &str = "project";
    pub const AUTHOR: &str = "author";
    pub const TASK_ACTIVITY: &str = "taskActivity";
    pub const TASK_ACTIVITIES: &str = "taskActivities";
    pub const MANAGERS: &str = "managers";
    pub const MEMBERS: &str = "members";
    pub const REPORTS: &str = "reports";
    pub const JOIN: &str = "join";
    pub const EXPORT: &str = "export";
}
