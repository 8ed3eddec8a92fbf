use super::collection::PaginationMetadata;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Navigation links for one page of a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Builds [`PaginationLinks`] for a base path, keeping every query parameter
/// except `page` and `limit`, which are set per link.
pub struct LinksBuilder<'a> {
    base_path: &'a str,
    metadata: &'a PaginationMetadata,
    query_params: BTreeMap<String, String>,
}

impl<'a> LinksBuilder<'a> {
    pub fn new(
        base_path: &'a str,
        metadata: &'a PaginationMetadata,
        query_params: &HashMap<String, String>,
    ) -> Self {
        let query_params = query_params
            .iter()
            .filter(|(key, _)| key.as_str() != "page" && key.as_str() != "limit")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        LinksBuilder {
            base_path,
            metadata,
            query_params,
        }
    }

    pub fn build(&self) -> PaginationLinks {
        PaginationLinks {
            self_link: self.url_for(self.metadata.current_page),
            first: self.url_for(1),
            last: self.url_for(self.metadata.total_pages),
            prev: self.metadata.prev_page.map(|page| self.url_for(page)),
            next: self.metadata.next_page.map(|page| self.url_for(page)),
        }
    }

    fn url_for(&self, page: usize) -> String {
        let mut params = self.query_params.clone();
        params.insert("page".to_string(), page.to_string());
        params.insert("limit".to_string(), self.metadata.per_page.to_string());

        let query = params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.base_path, query)
    }
}
