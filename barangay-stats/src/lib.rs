//! Barangay Stats - Dashboard Aggregator
//!
//! Derives summary statistics by scanning residents and family heads as one
//! logical population. Totals come straight from the minting counters, not
//! from scans, so they count lifetime registrations. A single record's
//! unparseable date is logged and skips only that record, never the whole
//! aggregation.

use barangay_core::{dates, entities, BarangayResult, FamilyHead, Resident};
use barangay_store::{ReadPolicy, RecordStore};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fixed age histogram buckets, upper bound inclusive.
const AGE_BUCKETS: [&str; 7] = ["0-10", "11-20", "21-30", "31-40", "41-50", "51-60", "61+"];

/// How many entries the recent-registrations panel shows.
const RECENT_LIMIT: usize = 5;

/// Aggregation behavior switches.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// When true (the historical behavior), monthly registration counts are
    /// keyed by month name only, so the same calendar month from different
    /// years collapses into one bucket. Kept behind this flag until someone
    /// decides whether the cross-year merge is a seasonal-trend feature or
    /// a bug.
    pub merge_months_across_years: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            merge_months_across_years: true,
        }
    }
}

/// One row of the recent-registrations panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentRegistration {
    pub id: String,
    pub full_name: String,
    pub date: String,
    /// `"resident"` or `"familyHead"`.
    pub kind: String,
}

/// Dashboard statistics payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    /// Lifetime resident registrations (counter-based, not live count).
    pub total_residents: i64,
    /// Lifetime family head registrations (counter-based).
    pub total_family_heads: i64,
    pub gender_distribution: BTreeMap<String, u64>,
    pub age_distribution: BTreeMap<String, u64>,
    pub monthly_registrations: BTreeMap<String, u64>,
    pub recent_registrations: Vec<RecentRegistration>,
}

/// One person in the combined resident + family head population.
struct Person {
    id: String,
    full_name: String,
    gender: String,
    birth_date: String,
    registration_date: String,
    kind: &'static str,
}

impl From<&Resident> for Person {
    fn from(r: &Resident) -> Self {
        Person {
            id: r.id.clone(),
            full_name: entities::full_name(&r.first_name, &r.last_name),
            gender: r.gender.clone(),
            birth_date: r.birth_date.clone(),
            registration_date: r.registration_date.clone(),
            kind: "resident",
        }
    }
}

impl From<&FamilyHead> for Person {
    fn from(h: &FamilyHead) -> Self {
        Person {
            id: h.id.clone(),
            full_name: entities::full_name(&h.first_name, &h.last_name),
            gender: h.gender.clone(),
            birth_date: h.birth_date.clone(),
            registration_date: h.registration_date.clone(),
            kind: "familyHead",
        }
    }
}

/// Histogram bucket for a whole-year age. Upper bounds are inclusive:
/// exactly 10 years old lands in "0-10", exactly 11 in "11-20".
fn bucket_for_age(age: i32) -> Option<&'static str> {
    match age {
        0..=10 => Some("0-10"),
        11..=20 => Some("11-20"),
        21..=30 => Some("21-30"),
        31..=40 => Some("31-40"),
        41..=50 => Some("41-50"),
        51..=60 => Some("51-60"),
        61.. => Some("61+"),
        _ => None,
    }
}

/// Compute dashboard statistics with the default configuration.
pub async fn compute_stats(store: &RecordStore) -> BarangayResult<DashboardStats> {
    compute_stats_with(store, &StatsConfig::default()).await
}

/// Compute dashboard statistics.
///
/// Scans run under [`ReadPolicy::Heal`] so legacy partial records still
/// count toward the distributions instead of failing the dashboard.
pub async fn compute_stats_with(
    store: &RecordStore,
    config: &StatsConfig,
) -> BarangayResult<DashboardStats> {
    let total_residents = store.resident_count().await?;
    let total_family_heads = store.family_head_count().await?;

    let residents = store.list_residents_with(ReadPolicy::Heal).await?;
    let heads = store.list_family_heads_with(ReadPolicy::Heal).await?;
    let population: Vec<Person> = residents
        .iter()
        .map(Person::from)
        .chain(heads.iter().map(Person::from))
        .collect();

    let current_year = Utc::now().year();

    let mut gender_distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut age_distribution: BTreeMap<String, u64> = AGE_BUCKETS
        .iter()
        .map(|label| (label.to_string(), 0))
        .collect();
    let mut monthly_registrations: BTreeMap<String, u64> = BTreeMap::new();

    for person in &population {
        let gender = person.gender.trim();
        let gender_key = if gender.is_empty() { "Unknown" } else { gender };
        *gender_distribution.entry(gender_key.to_string()).or_insert(0) += 1;

        match dates::parse_date(&person.birth_date) {
            Some(birth) => {
                // Whole-year approximation, not day-precise.
                let age = current_year - birth.year();
                match bucket_for_age(age) {
                    Some(bucket) => {
                        *age_distribution.entry(bucket.to_string()).or_insert(0) += 1;
                    }
                    None => {
                        tracing::debug!(id = %person.id, age, "age out of range, skipping");
                    }
                }
            }
            None => {
                tracing::debug!(
                    id = %person.id,
                    value = %person.birth_date,
                    "unparseable birth date, skipping age bucket"
                );
            }
        }

        match dates::parse_date(&person.registration_date) {
            Some(registered) => {
                let key = month_key(registered, config);
                *monthly_registrations.entry(key).or_insert(0) += 1;
            }
            None => {
                tracing::debug!(
                    id = %person.id,
                    value = %person.registration_date,
                    "unparseable registration date, skipping month bucket"
                );
            }
        }
    }

    let recent_registrations = recent(&population);

    Ok(DashboardStats {
        total_residents,
        total_family_heads,
        gender_distribution,
        age_distribution,
        monthly_registrations,
        recent_registrations,
    })
}

fn month_key(date: NaiveDate, config: &StatsConfig) -> String {
    if config.merge_months_across_years {
        dates::short_month_name(date)
    } else {
        date.format("%b %Y").to_string()
    }
}

/// Latest registrations with a parseable date, newest first.
fn recent(population: &[Person]) -> Vec<RecentRegistration> {
    let mut dated: Vec<(NaiveDate, &Person)> = population
        .iter()
        .filter_map(|person| {
            dates::parse_date(&person.registration_date).map(|date| (date, person))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|(_, person)| RecentRegistration {
            id: person.id.clone(),
            full_name: person.full_name.clone(),
            date: person.registration_date.clone(),
            kind: person.kind.to_string(),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
