pub const DEFAULT_STAGGER_MS: u32 = 400;
/// Largest delay `setTimeout` honours; anything above wraps and fires at once.
pub const MAX_TIMER_DELAY_MS: u32 = 2_147_483_647;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    LogEntry { index: usize },
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRender {
    pub delay_ms: u32,
    pub step: RenderStep,
}

/// Delays for one answered query: entry `i` at `i * stagger`, the answer one
/// full slot after the last entry at `(n + 1) * stagger`.
///
/// Delays are clamped to [`MAX_TIMER_DELAY_MS`]. Entries stop one
/// millisecond short of it so the answer still fires after every entry.
///
/// Each step is meant to run as its own timer. Nothing here sequences or
/// cancels them; steps from two plans interleave purely by fire time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaggerPlan {
    steps: Vec<ScheduledRender>,
}

impl StaggerPlan {
    pub fn new(log_count: usize, stagger_ms: u32) -> Self {
        let mut steps = Vec::with_capacity(log_count + 1);
        for index in 0..log_count {
            steps.push(ScheduledRender {
                delay_ms: slot_delay(index, stagger_ms).min(MAX_TIMER_DELAY_MS - 1),
                step: RenderStep::LogEntry { index },
            });
        }
        steps.push(ScheduledRender {
            delay_ms: slot_delay(log_count + 1, stagger_ms),
            step: RenderStep::Answer,
        });
        Self { steps }
    }

    pub fn steps(&self) -> &[ScheduledRender] {
        &self.steps
    }

    pub fn answer_delay_ms(&self) -> u32 {
        self.steps
            .iter()
            .find(|scheduled| scheduled.step == RenderStep::Answer)
            .map_or(0, |scheduled| scheduled.delay_ms)
    }
}

impl IntoIterator for StaggerPlan {
    type Item = ScheduledRender;
    type IntoIter = std::vec::IntoIter<ScheduledRender>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

fn slot_delay(slot: usize, stagger_ms: u32) -> u32 {
    let slot = u32::try_from(slot).unwrap_or(u32::MAX);
    slot.saturating_mul(stagger_ms).min(MAX_TIMER_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_staggered_then_answer_skips_a_slot() {
        let plan = StaggerPlan::new(2, DEFAULT_STAGGER_MS);
        assert_eq!(
            plan.steps(),
            &[
                ScheduledRender {
                    delay_ms: 0,
                    step: RenderStep::LogEntry { index: 0 },
                },
                ScheduledRender {
                    delay_ms: 400,
                    step: RenderStep::LogEntry { index: 1 },
                },
                ScheduledRender {
                    delay_ms: 1_200,
                    step: RenderStep::Answer,
                },
            ]
        );
    }

    #[test]
    fn no_logs_still_delays_the_answer_one_slot() {
        let plan = StaggerPlan::new(0, DEFAULT_STAGGER_MS);
        assert_eq!(plan.steps().len(), 1);
        assert_eq!(plan.answer_delay_ms(), 400);
    }

    #[test]
    fn answer_is_always_last_and_fires_after_every_entry() {
        for count in [1_usize, 5, 17] {
            let plan = StaggerPlan::new(count, 250);
            let steps = plan.steps();
            assert_eq!(steps.len(), count + 1);
            let answer = steps[count];
            assert_eq!(answer.step, RenderStep::Answer);
            assert!(
                steps[..count]
                    .iter()
                    .all(|scheduled| scheduled.delay_ms < answer.delay_ms)
            );
            let indices: Vec<usize> = steps[..count]
                .iter()
                .filter_map(|scheduled| match scheduled.step {
                    RenderStep::LogEntry { index } => Some(index),
                    RenderStep::Answer => None,
                })
                .collect();
            assert_eq!(indices, (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn huge_delays_clamp_to_the_timer_limit() {
        assert_eq!(slot_delay(usize::MAX, 400), MAX_TIMER_DELAY_MS);
        assert!(i32::try_from(MAX_TIMER_DELAY_MS).is_ok());
    }

    #[test]
    fn oversized_stagger_keeps_answer_last_within_timer_limit() {
        let plan = StaggerPlan::new(2, 1_500_000_000);
        let steps = plan.steps();
        assert_eq!(steps[1].delay_ms, 1_500_000_000);
        assert_eq!(plan.answer_delay_ms(), MAX_TIMER_DELAY_MS);
        assert!(steps.iter().all(|scheduled| i32::try_from(scheduled.delay_ms).is_ok()));
        assert!(steps[..2].iter().all(|scheduled| scheduled.delay_ms < plan.answer_delay_ms()));
    }

    #[test]
    fn entries_past_the_limit_still_precede_the_answer() {
        let plan = StaggerPlan::new(4, MAX_TIMER_DELAY_MS);
        let steps = plan.steps();
        assert_eq!(steps[1].delay_ms, MAX_TIMER_DELAY_MS - 1);
        assert_eq!(steps[3].delay_ms, MAX_TIMER_DELAY_MS - 1);
        assert_eq!(steps[4].step, RenderStep::Answer);
        assert_eq!(steps[4].delay_ms, MAX_TIMER_DELAY_MS);
    }
}
