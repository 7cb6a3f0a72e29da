use crate::models::{Listing, Status};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_BOROUGH: &str = "unknown";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BoroughCount {
    pub borough: String,
    pub count: usize,
}

/// Aggregates over the whole store. Averages skip discarded listings.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_borough: Vec<BoroughCount>,
    pub average_price: i64,
    pub average_price_per_area: i64,
    pub average_score: i64,
}

impl Stats {
    pub fn compute<'a>(listings: impl Iterator<Item = &'a Listing>) -> Self {
        let all: Vec<&Listing> = listings.collect();
        let active: Vec<&Listing> = all
            .iter()
            .copied()
            .filter(|l| l.status != Status::Discarded)
            .collect();

        let mut by_status: BTreeMap<&'static str, usize> =
            Status::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for listing in &all {
            *by_status.entry(listing.status.as_str()).or_default() += 1;
        }

        let mut boroughs: HashMap<&str, usize> = HashMap::new();
        for listing in &active {
            let borough = listing.borough.as_deref().unwrap_or(UNKNOWN_BOROUGH);
            *boroughs.entry(borough).or_default() += 1;
        }
        let mut by_borough: Vec<BoroughCount> = boroughs
            .into_iter()
            .map(|(borough, count)| BoroughCount {
                borough: borough.to_string(),
                count,
            })
            .collect();
        by_borough.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.borough.cmp(&b.borough)));

        Self {
            total: all.len(),
            by_status,
            by_borough,
            average_price: average(active.iter().map(|l| l.price)),
            average_price_per_area: average(
                active
                    .iter()
                    .filter_map(|l| l.price_per_area)
                    .filter(|ppa| *ppa != 0),
            ),
            average_score: average(active.iter().map(|l| i64::from(l.score))),
        }
    }
}

/// Truncated mean, 0 for no values
fn average(values: impl Iterator<Item = i64>) -> i64 {
    let (sum, n) = values.fold((0i64, 0i64), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0
    } else {
        sum / n
    }
}
