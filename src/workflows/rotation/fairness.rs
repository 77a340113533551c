use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::domain::ChoreHistory;
use crate::workflows::roster::{HistoryAccessor, Member, MemberId, STANDARD_HOUSES};

/// Workload spread beyond which the report recommends shifting chores.
pub const WORKLOAD_SPREAD_THRESHOLD: u32 = 3;

/// Completion rate below which a member is flagged for support.
pub const SUPPORT_COMPLETION_THRESHOLD: f64 = 0.5;

/// Per-member stats backing a house's fairness score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberWorkload {
    pub member_id: MemberId,
    pub member_name: String,
    pub total_assigned: u32,
    pub total_completed: u32,
    pub completion_rate: f64,
}

/// One house's slice of the fairness report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseFairness {
    pub house: String,
    /// 0–100, higher is more balanced.
    pub fairness_score: f64,
    pub members: Vec<MemberWorkload>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessReport {
    pub overall_fairness: f64,
    pub houses: Vec<HouseFairness>,
}

/// Derives the workload-balance report across all houses. Stateless; every
/// call recomputes from the accessor.
pub struct FairnessReporter<H> {
    accessor: Arc<H>,
}

impl<H> FairnessReporter<H>
where
    H: HistoryAccessor,
{
    pub fn new(accessor: Arc<H>) -> Self {
        Self { accessor }
    }

    pub fn report(&self) -> FairnessReport {
        let houses: Vec<HouseFairness> = STANDARD_HOUSES
            .iter()
            .map(|house| self.house_report(house))
            .collect();

        let overall_fairness = if houses.is_empty() {
            0.0
        } else {
            houses.iter().map(|entry| entry.fairness_score).sum::<f64>() / houses.len() as f64
        };

        FairnessReport {
            overall_fairness,
            houses,
        }
    }

    fn house_report(&self, house: &str) -> HouseFairness {
        let members = match self.accessor.house_members(house) {
            Ok(members) => members,
            Err(error) => {
                warn!(%house, %error, "fairness report unavailable for house");
                return HouseFairness {
                    house: house.to_string(),
                    fairness_score: 0.0,
                    members: Vec::new(),
                    recommendations: vec!["Error generating report".to_string()],
                };
            }
        };

        let workloads: Vec<MemberWorkload> = members
            .iter()
            .map(|member| self.member_workload(member))
            .collect();

        HouseFairness {
            house: house.to_string(),
            fairness_score: fairness_score(&workloads),
            recommendations: recommendations(&workloads),
            members: workloads,
        }
    }

    fn member_workload(&self, member: &Member) -> MemberWorkload {
        let history = match self.accessor.member_task_history(&member.id) {
            Ok(records) => ChoreHistory::from_records(&records),
            Err(error) => {
                warn!(member = %member.display_name, %error, "history unavailable for report");
                ChoreHistory::default()
            }
        };

        MemberWorkload {
            member_id: member.id.clone(),
            member_name: member.display_name.clone(),
            total_assigned: history.total_assigned,
            total_completed: history.total_completed,
            completion_rate: history.completion_rate(),
        }
    }
}

/// `max(0, 100 - variance * 10)` over member workloads; an even split scores
/// 100 and the score never leaves [0,100].
fn fairness_score(workloads: &[MemberWorkload]) -> f64 {
    if workloads.is_empty() {
        return 100.0;
    }

    let counts: Vec<f64> = workloads
        .iter()
        .map(|entry| f64::from(entry.total_assigned))
        .collect();
    let average = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance = counts
        .iter()
        .map(|count| (count - average).powi(2))
        .sum::<f64>()
        / counts.len() as f64;

    (100.0 - variance * 10.0).max(0.0)
}

fn recommendations(workloads: &[MemberWorkload]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let busiest = workloads.iter().max_by_key(|entry| entry.total_assigned);
    let lightest = workloads.iter().min_by_key(|entry| entry.total_assigned);
    if let (Some(busiest), Some(lightest)) = (busiest, lightest) {
        if busiest.total_assigned - lightest.total_assigned > WORKLOAD_SPREAD_THRESHOLD {
            recommendations.push(format!(
                "Shift upcoming chores from {} to {} to rebalance the workload",
                busiest.member_name, lightest.member_name
            ));
        }
    }

    let struggling: Vec<&str> = workloads
        .iter()
        .filter(|entry| {
            entry.total_assigned > 0 && entry.completion_rate < SUPPORT_COMPLETION_THRESHOLD
        })
        .map(|entry| entry.member_name.as_str())
        .collect();
    if !struggling.is_empty() {
        recommendations.push(format!(
            "Offer completion support to {}",
            struggling.join(", ")
        ));
    }

    recommendations
}
