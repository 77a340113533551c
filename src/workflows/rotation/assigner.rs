use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{Assignment, ChoreHistory, HouseRotation, RotationOutcome, STANDARD_CHORES};
use super::scoring::FairnessScorer;
use crate::workflows::roster::{AccessorError, HistoryAccessor, Member, STANDARD_HOUSES};

/// Error raised when a house cannot be rotated at all. Member-level history
/// failures never surface here; those members degrade to empty histories.
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    #[error("failed to load members for {house}: {source}")]
    Roster {
        house: String,
        #[source]
        source: AccessorError,
    },
}

/// Greedy rotation engine. One pass per cycle, no global optimization: each
/// task type goes to the cheapest still-unassigned member.
pub struct RotationAssigner<H> {
    accessor: Arc<H>,
    scorer: FairnessScorer,
}

impl<H> RotationAssigner<H>
where
    H: HistoryAccessor,
{
    pub fn new(accessor: Arc<H>, scorer: FairnessScorer) -> Self {
        Self { accessor, scorer }
    }

    /// Assign `task_types`, in the caller's order, to members of `house`.
    ///
    /// A member receives at most one task per call; if there are more task
    /// types than members the surplus stays unassigned. Roster load failure
    /// is a hard error with no partial result.
    pub fn assign(
        &self,
        house: &str,
        task_types: &[String],
        now: DateTime<Utc>,
    ) -> Result<RotationOutcome, RotationError> {
        let members = self
            .accessor
            .house_members(house)
            .map_err(|source| RotationError::Roster {
                house: house.to_string(),
                source,
            })?;

        let candidates = self.load_candidates(&members);
        let house_average = house_average(&candidates);

        let mut outcome = RotationOutcome::default();
        let mut taken = vec![false; candidates.len()];

        for task_type in task_types {
            let mut best: Option<(usize, super::scoring::AssignabilityScore)> = None;

            for (index, candidate) in candidates.iter().enumerate() {
                if taken[index] {
                    continue;
                }

                let score = self
                    .scorer
                    .score(&candidate.history, house_average, task_type, now);

                // Strict comparison: on ties the first member in roster
                // order keeps the pick.
                let better = best
                    .as_ref()
                    .map_or(true, |(_, current)| score.total < current.total);
                if better {
                    best = Some((index, score));
                }
            }

            let Some((index, score)) = best else {
                break;
            };

            taken[index] = true;
            let candidate = &candidates[index];
            outcome.explanation.push(format!(
                "{task_type} → {}: Fairness: {:.2}, Skill: {:.2}, Total: {:.2}",
                candidate.member.display_name, score.fairness, score.skill, score.total
            ));
            outcome.assignments.push(Assignment {
                task_type: task_type.clone(),
                member_id: candidate.member.id.clone(),
                member_name: candidate.member.display_name.clone(),
                score: score.total,
            });
        }

        Ok(outcome)
    }

    /// Run one rotation cycle for every house against the standard chore
    /// catalogue. A failing house is reported in place of its assignments;
    /// the other houses are unaffected.
    pub fn weekly_assignments(&self, now: DateTime<Utc>) -> Vec<HouseRotation> {
        let catalogue: Vec<String> = STANDARD_CHORES.iter().map(|chore| chore.to_string()).collect();

        STANDARD_HOUSES
            .iter()
            .map(|house| match self.assign(house, &catalogue, now) {
                Ok(outcome) => HouseRotation {
                    house: house.to_string(),
                    outcome,
                },
                Err(error) => {
                    warn!(%house, %error, "skipping house in weekly rotation");
                    HouseRotation {
                        house: house.to_string(),
                        outcome: RotationOutcome {
                            assignments: Vec::new(),
                            explanation: vec![format!(
                                "Failed to generate assignments for {house}: {error}"
                            )],
                        },
                    }
                }
            })
            .collect()
    }

    fn load_candidates(&self, members: &[Member]) -> Vec<Candidate> {
        members
            .iter()
            .map(|member| {
                let history = match self.accessor.member_task_history(&member.id) {
                    Ok(records) => ChoreHistory::from_records(&records),
                    Err(error) => {
                        warn!(
                            member = %member.display_name,
                            %error,
                            "history unavailable, treating member as unassigned"
                        );
                        ChoreHistory::default()
                    }
                };
                Candidate {
                    member: member.clone(),
                    history,
                }
            })
            .collect()
    }
}

struct Candidate {
    member: Member,
    history: ChoreHistory,
}

fn house_average(candidates: &[Candidate]) -> f64 {
    if candidates.is_empty() {
        return 0.0;
    }
    let total: u32 = candidates
        .iter()
        .map(|candidate| candidate.history.total_assigned)
        .sum();
    f64::from(total) / candidates.len() as f64
}
