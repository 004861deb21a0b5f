//! Domain-level command and result types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs in the `shared`
//! crate to these internal types, parsing dates on the way in.

pub mod entries {
    use chrono::NaiveDate;
    use shared::FinanceKind;

    /// Input for recording a new ledger entry.
    #[derive(Debug, Clone)]
    pub struct AddEntryCommand {
        pub kind: FinanceKind,
        pub title: String,
        pub amount: f64,
        /// Blank or missing falls back to "General"
        pub category: Option<String>,
        /// Today when missing
        pub entry_date: Option<NaiveDate>,
        pub source_key: Option<String>,
    }

    /// Result of deleting an entry.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DeleteEntryResult {
        pub deleted: bool,
        /// Goal whose progress was reversed, if the entry was an allocation
        pub reversed_goal_id: Option<i64>,
    }
}

pub mod autopay {
    use chrono::NaiveDate;
    use shared::AutopayCadence;

    /// Input for creating a recurring plan.
    #[derive(Debug, Clone)]
    pub struct CreatePlanCommand {
        pub title: String,
        pub amount: f64,
        pub cadence: AutopayCadence,
        pub start_date: NaiveDate,
    }

    /// A plan that could not be caught up during a run.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PlanFailure {
        pub plan_id: i64,
        pub reason: String,
    }

    /// Outcome of one catch-up run.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AutopayRunReport {
        pub plans_examined: usize,
        pub entries_materialized: usize,
        pub failures: Vec<PlanFailure>,
    }

    impl AutopayRunReport {
        pub fn is_clean(&self) -> bool {
            self.failures.is_empty()
        }
    }
}

pub mod goals {
    use chrono::NaiveDate;

    /// Input for creating a savings goal.
    #[derive(Debug, Clone)]
    pub struct AddGoalCommand {
        pub name: String,
        pub current_amount: f64,
        pub target_amount: f64,
        pub target_date: Option<NaiveDate>,
    }

    /// Input for putting money towards a goal.
    #[derive(Debug, Clone)]
    pub struct AllocateToGoalCommand {
        pub goal_id: i64,
        pub amount: f64,
        pub entry_date: Option<NaiveDate>,
    }
}

pub mod budgets {
    use crate::domain::dates::MonthKey;

    /// Input for setting a month's budget.
    #[derive(Debug, Clone)]
    pub struct UpsertBudgetCommand {
        pub amount: f64,
        /// Current month when missing
        pub month_key: Option<MonthKey>,
    }
}

pub mod demo {
    /// What the demo-data guard removed.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DemoPurgeReport {
        pub entries_deleted: u64,
        pub goals_deleted: u64,
    }

    impl DemoPurgeReport {
        pub fn purged_anything(&self) -> bool {
            self.entries_deleted > 0 || self.goals_deleted > 0
        }
    }
}
