use chrono::NaiveDate;

const ALLOCATION_TITLE_PREFIX: &str = "Goal:";

/// A savings target
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub user_email: String,
    pub name: String,
    /// Never below zero; may exceed `target_amount`
    pub current_amount: f64,
    pub target_amount: f64,
    pub target_date: Option<NaiveDate>,
    pub created_at: String,
}

impl Goal {
    /// Title of the expense entry written when money is put towards this goal
    pub fn allocation_title(&self) -> String {
        format!("{} {}", ALLOCATION_TITLE_PREFIX, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub user_email: String,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub target_date: Option<NaiveDate>,
}

/// Goal name embedded in a `Goal: <name>` entry title, matched case-insensitively
pub fn goal_name_from_title(title: &str) -> Option<&str> {
    let trimmed = title.trim_start();
    let prefix = trimmed.get(..ALLOCATION_TITLE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(ALLOCATION_TITLE_PREFIX) {
        return None;
    }
    let name = trimmed[ALLOCATION_TITLE_PREFIX.len()..].trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
