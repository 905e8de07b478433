//! "Last updated N minutes ago" helper.

use chrono::NaiveDateTime;

/// Whole minutes between `last_updated` and `now`, rounded down.
///
/// Returns `None` when the registry has never been updated. A timestamp in
/// the future (clock skew between writers) counts as zero minutes.
pub fn minutes_since(last_updated: Option<NaiveDateTime>, now: NaiveDateTime) -> Option<i64> {
    let last_updated = last_updated?;
    Some(now.signed_duration_since(last_updated).num_minutes().max(0))
}
