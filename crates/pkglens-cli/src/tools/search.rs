//! Registry search

use pkglens_core::error::LensResult;
use pkglens_registry::{RegistryClient, SearchOptions};
use serde::Serialize;

use super::Report;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub total: u64,
    pub offset: u32,
    /// Hits in registry ranking order
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub score: Option<f64>,
    pub date: Option<String>,
}

pub async fn search(client: &RegistryClient, query: &str, options: SearchOptions) -> Report<SearchSummary> {
    Report::from_result(collect(client, query, options).await)
}

async fn collect(client: &RegistryClient, query: &str, options: SearchOptions) -> LensResult<SearchSummary> {
    let query = query.trim();
    let result = client.search_packages(query, options).await?;

    let results = result
        .objects
        .into_iter()
        .map(|object| SearchHit {
            name: object.package.name,
            version: object.package.version,
            description: object.package.description,
            score: object.score.map(|score| score.final_score),
            date: object.package.date,
        })
        .collect();

    Ok(SearchSummary {
        query: query.to_string(),
        total: result.total,
        offset: options.offset,
        results,
    })
}
