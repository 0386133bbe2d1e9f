use chrono::DateTime;

use crate::catalog::Bilingual;
use crate::db::{Donation, Income, Provenance};

/// Deterministic id for the income row derived from a donation. Re-deriving
/// the same donation always lands on the same id; manual rows are UUID-keyed,
/// so the two namespaces cannot collide.
pub fn derived_income_id(donation_id: &str) -> String {
    format!("don-{}", donation_id)
}

fn derive(donation: &Donation) -> Income {
    Income {
        id: derived_income_id(&donation.id),
        source: Bilingual::new("Donation", "দান"),
        description: format!("From {} for {}", donation.donor_name, donation.purpose),
        amount: donation.amount,
        date: donation.date.clone(),
        provenance: Provenance::Donation,
        donation_id: Some(donation.id.clone()),
    }
}

/// Rebuild the income ledger against the current donation list: manual rows
/// pass through untouched, each donation contributes exactly one freshly
/// derived row, and the whole collection is re-sorted newest-first. Total and
/// idempotent; there is nothing here that can fail.
pub fn reconcile(donations: &[Donation], incomes: Vec<Income>) -> Vec<Income> {
    let mut next: Vec<Income> = incomes
        .into_iter()
        .filter(|income| income.provenance == Provenance::Manual)
        .collect();
    next.extend(donations.iter().map(derive));
    // Canonical order regardless of input order: date descending, id as the
    // tie-break, so reconciling a reconciled ledger is byte-identical.
    next.sort_by(|a, b| {
        date_sort_key(&b.date)
            .cmp(&date_sort_key(&a.date))
            .then_with(|| a.id.cmp(&b.id))
    });
    next
}

fn date_sort_key(date: &str) -> i64 {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.timestamp_millis())
        .unwrap_or(i64::MIN)
}
