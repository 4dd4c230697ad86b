use crate::core::carrier::CarrierProfile;
use crate::domain::model::{BulkAddResult, TrackingCollection, TrackingEntry};
use crate::utils::error::{Result, TrackingError};
use regex::Regex;
use std::sync::LazyLock;

static TRACKING_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{20,22}$").expect("tracking number pattern is valid"));

static BULK_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n,\s]+").expect("bulk separator pattern is valid"));

/// Validation and collection operations for the tracking numbers of one order.
///
/// Every operation takes the current collection by value and hands back the new
/// one. Nothing here touches storage; the caller persists the result.
#[derive(Debug, Clone, Default)]
pub struct TrackingCollectionManager {
    carrier: CarrierProfile,
}

impl TrackingCollectionManager {
    pub fn new(carrier: CarrierProfile) -> Self {
        Self { carrier }
    }

    pub fn carrier(&self) -> &CarrierProfile {
        &self.carrier
    }

    /// Drops whitespace and hyphens, uppercases ASCII letters.
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    pub fn validate(raw: &str) -> bool {
        TRACKING_NUMBER_PATTERN.is_match(&Self::normalize(raw))
    }

    /// Candidate tokens of a pasted block, in input order, duplicates kept.
    pub fn parse_bulk(raw: &str) -> Vec<String> {
        BULK_SEPARATORS
            .split(raw)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn add_one(&self, collection: TrackingCollection, raw: &str) -> Result<TrackingCollection> {
        if raw.trim().is_empty() {
            return Err(TrackingError::EmptyInput);
        }
        if !Self::validate(raw) {
            return Err(TrackingError::InvalidFormat {
                number: raw.trim().to_string(),
            });
        }

        let normalized = Self::normalize(raw);
        if contains_normalized(&collection, &normalized) {
            return Err(TrackingError::Duplicate { number: normalized });
        }

        self.note_service(&normalized);
        let mut collection = collection;
        collection.push(normalized);
        Ok(collection)
    }

    /// Best-effort batch add. Only an empty block fails; per-token problems are
    /// counted and reported in the result.
    pub fn add_bulk(
        &self,
        collection: TrackingCollection,
        raw: &str,
    ) -> Result<(TrackingCollection, BulkAddResult)> {
        if raw.trim().is_empty() {
            return Err(TrackingError::EmptyInput);
        }
        let tokens = Self::parse_bulk(raw);
        if tokens.is_empty() {
            return Err(TrackingError::EmptyInput);
        }

        let mut working = collection;
        let mut result = BulkAddResult::default();

        for token in tokens {
            if !Self::validate(&token) {
                result.invalid += 1;
                result.errors.push(format!("Invalid format: {}", token));
                continue;
            }

            let normalized = Self::normalize(&token);
            // 同一批次中先前加入的號碼也算重複
            if contains_normalized(&working, &normalized) {
                result.skipped += 1;
                result.errors.push(format!("Already exists: {}", token));
                continue;
            }

            self.note_service(&normalized);
            working.push(normalized);
            result.added += 1;
        }

        tracing::debug!(
            "Bulk add processed: added={}, skipped={}, invalid={}",
            result.added,
            result.skipped,
            result.invalid
        );

        Ok((working, result))
    }

    pub fn delete_at(&self, collection: TrackingCollection, index: i64) -> Result<TrackingCollection> {
        let position = usize::try_from(index)
            .ok()
            .filter(|position| *position < collection.len())
            .ok_or(TrackingError::IndexNotFound { index })?;

        let mut collection = collection;
        let removed = collection.remove(position);
        tracing::debug!("Removed tracking number {} at index {}", removed, position);
        Ok(collection)
    }

    pub fn list(collection: &TrackingCollection) -> Vec<TrackingEntry> {
        collection
            .iter()
            .enumerate()
            .map(|(index, number)| TrackingEntry {
                index,
                number: number.to_string(),
            })
            .collect()
    }

    fn note_service(&self, normalized: &str) {
        match self.carrier.describe(normalized) {
            Some(service) => tracing::debug!(
                "{} recognized as {} {}",
                normalized,
                self.carrier.name,
                service
            ),
            None if !self.carrier.prefixes.is_empty() => tracing::debug!(
                "{} has no known {} prefix, accepting on format alone",
                normalized,
                self.carrier.name
            ),
            None => {}
        }
    }
}

fn contains_normalized(collection: &TrackingCollection, normalized: &str) -> bool {
    // 舊資料可能未經正規化，比對前一律正規化
    collection
        .iter()
        .any(|existing| TrackingCollectionManager::normalize(existing) == normalized)
}
