use shared::{AutopayPlan, AutopayRunResponse, CreatePlanRequest};

use crate::domain::commands::autopay::{AutopayRunReport, CreatePlanCommand};
use crate::domain::dates::{format_date, parse_date};
use crate::domain::errors::ValidationError;
use crate::domain::models::AutopayPlan as DomainAutopayPlan;

pub struct AutopayMapper;

impl AutopayMapper {
    pub fn to_create_command(request: CreatePlanRequest) -> Result<CreatePlanCommand, ValidationError> {
        Ok(CreatePlanCommand {
            title: request.title,
            amount: request.amount,
            cadence: request.cadence,
            start_date: parse_date(&request.start_date)?,
        })
    }

    pub fn to_dto(domain: DomainAutopayPlan) -> AutopayPlan {
        AutopayPlan {
            id: domain.id,
            user_email: domain.user_email,
            title: domain.title,
            amount: domain.amount,
            cadence: domain.cadence,
            cadence_label: domain.cadence.label().to_string(),
            start_date: format_date(domain.start_date),
            next_payment_date: format_date(domain.next_payment_date),
            active: domain.active,
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain_plans: Vec<DomainAutopayPlan>) -> Vec<AutopayPlan> {
        domain_plans.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_run_response(report: AutopayRunReport) -> AutopayRunResponse {
        AutopayRunResponse {
            plans_examined: report.plans_examined,
            entries_materialized: report.entries_materialized,
            failed_plan_ids: report.failures.iter().map(|f| f.plan_id).collect(),
        }
    }
}
