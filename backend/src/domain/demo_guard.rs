//! Demo-data guard.
//!
//! Early builds seeded every new account with a fixed sample ledger. Anyone
//! still carrying it gets it removed before their numbers are computed. The
//! check is by content only, so real data that merely shares a title with the
//! sample set is left alone.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::info;

use crate::domain::commands::demo::DemoPurgeReport;
use crate::domain::errors::{require_owner, LedgerResult};
use crate::storage::LedgerStore;

static DEMO_ENTRY_TITLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["Salary", "Groceries", "Utilities", "Subscriptions"].into_iter().collect());

const DEMO_GOAL_NAME: &str = "Trip to Japan";
const DEMO_GOAL_TARGET: f64 = 5000.0;

/// True when there is at least one title and all of them are sample titles
pub fn is_demo_entry_set<S: AsRef<str>>(titles: &[S]) -> bool {
    !titles.is_empty() && titles.iter().all(|t| DEMO_ENTRY_TITLES.contains(t.as_ref()))
}

#[derive(Clone)]
pub struct DemoDataGuard {
    store: LedgerStore,
}

impl DemoDataGuard {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Purge the sample entries and sample goal independently. Safe to re-run.
    pub async fn purge_demo_data(&self, owner: &str) -> LedgerResult<DemoPurgeReport> {
        let owner = &require_owner(owner)?;
        let mut report = DemoPurgeReport::default();

        let titles = self.store.entries.distinct_titles(owner).await?;
        if is_demo_entry_set(&titles) {
            report.entries_deleted = self.store.entries.delete_all_entries(owner).await?;
        }

        let goals = self.store.goals.list_goals(owner).await?;
        let only_demo_goal = !goals.is_empty()
            && goals
                .iter()
                .all(|g| g.name == DEMO_GOAL_NAME && g.target_amount == DEMO_GOAL_TARGET);
        if only_demo_goal {
            report.goals_deleted = self.store.goals.delete_all_goals(owner).await?;
        }

        if report.purged_anything() {
            info!(
                "Removed demo data for {}: {} entries, {} goals",
                owner, report.entries_deleted, report.goals_deleted
            );
        }
        Ok(report)
    }
}
