use shared::{AddGoalRequest, AllocateToGoalRequest, Goal};

use super::parse_optional_date;
use crate::domain::commands::goals::{AddGoalCommand, AllocateToGoalCommand};
use crate::domain::dates::format_date;
use crate::domain::errors::ValidationError;
use crate::domain::models::Goal as DomainGoal;

pub struct GoalMapper;

impl GoalMapper {
    pub fn to_add_command(request: AddGoalRequest) -> Result<AddGoalCommand, ValidationError> {
        Ok(AddGoalCommand {
            name: request.name,
            current_amount: request.current_amount,
            target_amount: request.target_amount,
            target_date: parse_optional_date(request.target_date.as_deref())?,
        })
    }

    pub fn to_allocate_command(goal_id: i64, request: AllocateToGoalRequest) -> Result<AllocateToGoalCommand, ValidationError> {
        Ok(AllocateToGoalCommand {
            goal_id,
            amount: request.amount,
            entry_date: parse_optional_date(request.entry_date.as_deref())?,
        })
    }

    /// Convert domain Goal to shared Goal DTO
    pub fn to_dto(domain: DomainGoal) -> Goal {
        Goal {
            id: domain.id,
            user_email: domain.user_email,
            name: domain.name,
            current_amount: domain.current_amount,
            target_amount: domain.target_amount,
            target_date: domain.target_date.map(format_date),
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain_goals: Vec<DomainGoal>) -> Vec<Goal> {
        domain_goals.into_iter().map(Self::to_dto).collect()
    }
}
