//! Deduplication and ordering of a researcher's publication list.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::PublicationRecord;

/// Which duplicate survives when several share a title and carry a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlPreference {
    /// Every later record with a URL displaces the kept one
    #[default]
    LastWithUrl,
    /// The first record with a URL is kept; later ones never displace it
    FirstWithUrl,
}

impl UrlPreference {
    /// Whether `candidate` replaces `kept` as the survivor of its group
    fn displaces(self, kept: &PublicationRecord, candidate: &PublicationRecord) -> bool {
        match self {
            UrlPreference::LastWithUrl => candidate.has_url(),
            UrlPreference::FirstWithUrl => candidate.has_url() && !kept.has_url(),
        }
    }
}

/// Errors raised while ranking publications
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// A record has no title and cannot be grouped
    #[error("Invalid publication record at position {position}: title is missing")]
    InvalidRecord { position: usize },
}

/// Deduplicate and order publications with the default [`UrlPreference`].
///
/// See [`rank_with`].
pub fn rank(records: Vec<PublicationRecord>) -> Result<Vec<PublicationRecord>, RankError> {
    rank_with(records, UrlPreference::default())
}

/// Deduplicate publications by case-insensitive title and sort them by that title.
///
/// Records are visited in input order. The first record of a title becomes the
/// survivor; a later record replaces it only if it carries a URL and `preference`
/// allows it. Survivors are returned ascending by lower-cased title, with their
/// own fields (including title casing) untouched.
///
/// # Errors
/// Returns [`RankError::InvalidRecord`] for the first record without a title.
pub fn rank_with(
    records: Vec<PublicationRecord>,
    preference: UrlPreference,
) -> Result<Vec<PublicationRecord>, RankError> {
    let input_len = records.len();
    let mut survivors: BTreeMap<String, PublicationRecord> = BTreeMap::new();

    for (position, record) in records.into_iter().enumerate() {
        let key = record
            .normalized_title()
            .ok_or(RankError::InvalidRecord { position })?;

        match survivors.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if preference.displaces(slot.get(), &record) {
                    tracing::trace!(title = %slot.key(), position, "Replacing duplicate with linked record");
                    slot.insert(record);
                }
            }
        }
    }

    tracing::debug!(
        input = input_len,
        unique = survivors.len(),
        "Ranked publication records"
    );

    Ok(survivors.into_values().collect())
}

/// Find records that share a case-insensitive title
///
/// Returns groups of input indices, one group per title that occurs more than
/// once, ordered by the position of each group's first member.
pub fn find_title_collisions(records: &[PublicationRecord]) -> Result<Vec<Vec<usize>>, RankError> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        let key = record
            .normalized_title()
            .ok_or(RankError::InvalidRecord { position })?;

        match group_of.get(&key) {
            Some(&group) => groups[group].push(position),
            None => {
                group_of.insert(key, groups.len());
                groups.push(vec![position]);
            }
        }
    }

    groups.retain(|group| group.len() > 1);
    Ok(groups)
}
