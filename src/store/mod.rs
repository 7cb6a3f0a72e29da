//! Listing storage.
//!
//! Everything lives in memory behind one `RwLock`. When the store is backed
//! by a file, the whole state is rewritten after each mutation, while the
//! write lock is still held, so concurrent ingestions of one URL are applied
//! one after the other. A mutation becomes visible only after its snapshot
//! is written; if the write fails the error is returned and memory keeps
//! the previous state.

pub mod error;
pub mod ingest;
pub mod query;
pub mod stats;

pub use error::{Result, StoreError};
pub use ingest::IngestStatus;
pub use query::{ListingPage, ListingQuery};
pub use stats::Stats;

use crate::models::{Listing, ListingCreate, ListingUpdate, Neighborhood};
use crate::scoring::tables::NEIGHBORHOODS;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    next_id: u64,
    listings: BTreeMap<u64, Listing>,
    neighborhoods: Vec<Neighborhood>,
    #[serde(skip)]
    by_url: HashMap<String, u64>,
}

impl StoreState {
    fn seeded() -> Self {
        let mut state = Self {
            neighborhoods: seed_neighborhoods(),
            ..Self::default()
        };
        state.reindex();
        state
    }

    fn reindex(&mut self) {
        self.by_url = self
            .listings
            .values()
            .map(|l| (l.url.clone(), l.id))
            .collect();
    }
}

fn seed_neighborhoods() -> Vec<Neighborhood> {
    NEIGHBORHOODS
        .iter()
        .map(|(name, borough, score)| Neighborhood {
            name: name.to_string(),
            borough: borough.to_string(),
            bike_minutes_station: None,
            bike_minutes_port: None,
            slope: None,
            score: Some(*score),
            notes: None,
        })
        .collect()
}

pub struct ListingStore {
    state: RwLock<StoreState>,
    path: Option<PathBuf>,
}

impl ListingStore {
    /// A store that forgets everything on drop
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(StoreState::seeded()),
            path: None,
        }
    }

    /// Load the store from `path`, or start a fresh one there
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mut state: StoreState = serde_json::from_slice(&bytes)?;
                state.reindex();
                info!(
                    "📂 Loaded {} listings and {} neighborhoods from {}",
                    state.listings.len(),
                    state.neighborhoods.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No data at {}, starting empty", path.display());
                StoreState::seeded()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: RwLock::new(state),
            path: Some(path),
        })
    }

    async fn persist(&self, state: &StoreState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_snapshot(path, state).await?;
        debug!("💾 Saved {} listings to {}", state.listings.len(), path.display());
        Ok(())
    }

    /// Apply `change` to a copy of the state and keep the copy only once it
    /// has been saved. A failed save leaves memory as it was.
    async fn commit<T>(&self, change: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let out = change(&mut next)?;

        self.persist(&next).await?;
        *state = next;
        Ok(out)
    }

    /// Create a listing, or refresh the one already stored under the same URL
    pub async fn ingest(&self, input: ListingCreate) -> Result<(IngestStatus, Listing)> {
        ingest::validate(&input)?;
        let now = Utc::now();

        let (status, listing, old_price) = self
            .commit(|state| match state.by_url.get(&input.url).copied() {
                Some(id) => {
                    let listing = state
                        .listings
                        .get_mut(&id)
                        .ok_or(StoreError::NotFound(id))?;
                    let old_price = listing.price;
                    ingest::reingest(listing, &input, now);
                    Ok((IngestStatus::Updated, listing.clone(), Some(old_price)))
                }
                None => {
                    state.next_id += 1;
                    let listing = ingest::new_listing(state.next_id, input, now);
                    state.by_url.insert(listing.url.clone(), listing.id);
                    state.listings.insert(listing.id, listing.clone());
                    Ok((IngestStatus::Created, listing, None))
                }
            })
            .await?;

        match old_price {
            Some(old_price) if old_price != listing.price => {
                info!(id = listing.id, old_price, new_price = listing.price, "Price changed for {}", listing.url);
            }
            Some(_) => {}
            None => info!(id = listing.id, score = listing.score, "New listing {}", listing.url),
        }
        Ok((status, listing))
    }

    pub async fn get(&self, id: u64) -> Result<Listing> {
        let state = self.state.read().await;
        state.listings.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    pub async fn find_by_url(&self, url: &str) -> Option<Listing> {
        let state = self.state.read().await;
        let id = state.by_url.get(url)?;
        state.listings.get(id).cloned()
    }

    pub async fn list(&self, query: &ListingQuery) -> Result<ListingPage> {
        let state = self.state.read().await;
        query.apply(state.listings.values())
    }

    pub async fn update(&self, id: u64, update: ListingUpdate) -> Result<Listing> {
        self.commit(|state| {
            let listing = state.listings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            ingest::apply_update(listing, update, Utc::now())?;
            Ok(listing.clone())
        })
        .await
    }

    pub async fn discard(&self, id: u64, reason: &str) -> Result<Listing> {
        let discarded = self
            .commit(|state| {
                let listing = state.listings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
                ingest::discard(listing, reason, Utc::now())?;
                Ok(listing.clone())
            })
            .await?;

        info!(id, "Discarded listing: {}", reason.trim());
        Ok(discarded)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let listing = self
            .commit(|state| {
                let listing = state.listings.remove(&id).ok_or(StoreError::NotFound(id))?;
                state.by_url.remove(&listing.url);
                Ok(listing)
            })
            .await?;

        info!(id, "Deleted listing {}", listing.url);
        Ok(())
    }

    pub async fn stats(&self) -> Stats {
        let state = self.state.read().await;
        Stats::compute(state.listings.values())
    }

    /// Best-rated first
    pub async fn neighborhoods(&self) -> Vec<Neighborhood> {
        let state = self.state.read().await;
        let mut neighborhoods = state.neighborhoods.clone();
        neighborhoods.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        neighborhoods
    }

    pub async fn add_neighborhood(&self, neighborhood: Neighborhood) -> Result<Neighborhood> {
        let name = neighborhood.name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("name must not be empty".to_string()));
        }
        if neighborhood.score.is_some_and(|s| s > 100) {
            return Err(StoreError::Invalid("score must be between 0 and 100".to_string()));
        }

        let neighborhood = Neighborhood {
            name: name.to_string(),
            ..neighborhood
        };

        self.commit(|state| {
            if state
                .neighborhoods
                .iter()
                .any(|n| n.name.eq_ignore_ascii_case(&neighborhood.name))
            {
                return Err(StoreError::Duplicate(format!("neighborhood '{}'", neighborhood.name)));
            }
            state.neighborhoods.push(neighborhood.clone());
            Ok(neighborhood)
        })
        .await
    }
}

/// Write to a sibling temp file, then rename over the target
async fn write_snapshot(path: &Path, state: &StoreState) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let json = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
