use chrono::{Datelike, NaiveDate};
use shared::AutopayCadence;

use crate::domain::dates::advance_by_cadence;

/// A recurring expense template
#[derive(Debug, Clone, PartialEq)]
pub struct AutopayPlan {
    pub id: i64,
    pub user_email: String,
    pub title: String,
    pub amount: f64,
    pub cadence: AutopayCadence,
    pub start_date: NaiveDate,
    /// Earliest occurrence not yet materialized
    pub next_payment_date: NaiveDate,
    pub active: bool,
    pub created_at: String,
}

impl AutopayPlan {
    /// Occurrence following `due_date`. Monthly plans stay on the start
    /// date's day of month whenever the month has that day, so a plan started
    /// on Jan 31 runs Feb 29 then Mar 31 instead of drifting to the 29th.
    /// The answer depends only on the plan and `due_date`, so a cursor stored
    /// at any occurrence continues the same schedule.
    pub fn following_due_date(&self, due_date: NaiveDate) -> Option<NaiveDate> {
        advance_by_cadence(due_date, self.cadence, self.start_date.day())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAutopayPlan {
    pub user_email: String,
    pub title: String,
    pub amount: f64,
    pub cadence: AutopayCadence,
    pub start_date: NaiveDate,
    pub next_payment_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(cadence: AutopayCadence, start: NaiveDate) -> AutopayPlan {
        AutopayPlan {
            id: 1,
            user_email: "a@b.co".to_string(),
            title: "Rent".to_string(),
            amount: 900.0,
            cadence,
            start_date: start,
            next_payment_date: start,
            active: true,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_monthly_plan_keeps_start_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let plan = plan(AutopayCadence::Monthly, start);

        let feb = plan.following_due_date(start).unwrap();
        assert_eq!(feb, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let mar = plan.following_due_date(feb).unwrap();
        assert_eq!(mar, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_monthly_schedule_resumes_from_any_occurrence() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let plan = plan(AutopayCadence::Monthly, start);

        let mut schedule = vec![start];
        for _ in 0..5 {
            let last = *schedule.last().unwrap();
            schedule.push(plan.following_due_date(last).unwrap());
        }
        assert_eq!(schedule[1], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(schedule[2], NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());

        // Restarting from any stored cursor yields the same tail
        for (i, due) in schedule.iter().enumerate().take(5) {
            assert_eq!(plan.following_due_date(*due), Some(schedule[i + 1]));
        }
    }

    #[test]
    fn test_weekly_plan_adds_seven_days() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let plan = plan(AutopayCadence::Weekly, start);
        assert_eq!(plan.following_due_date(start), NaiveDate::from_ymd_opt(2025, 1, 4));
    }
}
