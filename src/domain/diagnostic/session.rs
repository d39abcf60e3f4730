//! Diagnostic conversation state machine.
//!
//! Strictly linear, one user message per transition. A validation failure
//! does not advance the stage and does not consume the input for anything
//! else; the caller re-prompts the same question. Only the bedtime stage
//! accepts free text.

/// Conversation stage. Each stage names the answer it is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingAge,
    AwaitingNapCount,
    AwaitingBedtime,
    AwaitingWakeCount,
    Complete,
}

/// The four collected answers, available only once the session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticAnswers {
    /// Child age in months.
    pub age_months: u32,
    /// Daytime naps per day.
    pub nap_count: u32,
    /// Evening bedtime as the parent wrote it, unvalidated.
    pub bedtime: String,
    /// Average night wakings.
    pub wake_count: u32,
}

/// Result of feeding one user message into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Input accepted; ask the question for the returned stage.
    Advanced(Stage),
    /// Input rejected; re-ask the question for the returned stage.
    Retry(Stage),
    /// Final answer accepted; the session is spent and must be discarded.
    Completed(DiagnosticAnswers),
}

/// Per-user diagnostic session. Held in memory only, never persisted.
#[derive(Debug, Clone)]
pub struct DiagnosticSession {
    stage: Stage,
    age_months: Option<u32>,
    nap_count: Option<u32>,
    bedtime: Option<String>,
    wake_count: Option<u32>,
}

impl DiagnosticSession {
    /// Fresh session waiting for the age answer.
    pub fn start() -> Self {
        Self {
            stage: Stage::AwaitingAge,
            age_months: None,
            nap_count: None,
            bedtime: None,
            wake_count: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Feeds one user message into the machine.
    pub fn answer(&mut self, input: &str) -> StepOutcome {
        match self.stage {
            Stage::AwaitingAge => match parse_count(input) {
                Some(age) => {
                    self.age_months = Some(age);
                    self.stage = Stage::AwaitingNapCount;
                    StepOutcome::Advanced(self.stage)
                }
                None => StepOutcome::Retry(self.stage),
            },
            Stage::AwaitingNapCount => match parse_count(input) {
                Some(naps) => {
                    self.nap_count = Some(naps);
                    self.stage = Stage::AwaitingBedtime;
                    StepOutcome::Advanced(self.stage)
                }
                None => StepOutcome::Retry(self.stage),
            },
            Stage::AwaitingBedtime => {
                // Free text, no validation.
                self.bedtime = Some(input.trim().to_string());
                self.stage = Stage::AwaitingWakeCount;
                StepOutcome::Advanced(self.stage)
            }
            Stage::AwaitingWakeCount => match parse_count(input) {
                Some(wakes) => {
                    self.wake_count = Some(wakes);
                    self.stage = Stage::Complete;
                    StepOutcome::Completed(DiagnosticAnswers {
                        age_months: self.age_months.unwrap_or_default(),
                        nap_count: self.nap_count.unwrap_or_default(),
                        bedtime: self.bedtime.clone().unwrap_or_default(),
                        wake_count: wakes,
                    })
                }
                None => StepOutcome::Retry(self.stage),
            },
            // Completed sessions are removed by the registry; a stray
            // message after completion is a no-op re-prompt.
            Stage::Complete => StepOutcome::Retry(Stage::Complete),
        }
    }
}

fn parse_count(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_answers(session: &mut DiagnosticSession) -> DiagnosticAnswers {
        session.answer("6");
        session.answer("2");
        session.answer("19h30");
        match session.answer("1") {
            StepOutcome::Completed(answers) => answers,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn happy_path_collects_all_four_answers() {
        let mut session = DiagnosticSession::start();
        let answers = completed_answers(&mut session);

        assert_eq!(
            answers,
            DiagnosticAnswers {
                age_months: 6,
                nap_count: 2,
                bedtime: "19h30".to_string(),
                wake_count: 1,
            }
        );
        assert_eq!(session.stage(), Stage::Complete);
    }

    #[test]
    fn non_integer_age_reprompts_without_advancing() {
        let mut session = DiagnosticSession::start();

        assert_eq!(session.answer("six mois"), StepOutcome::Retry(Stage::AwaitingAge));
        assert_eq!(session.stage(), Stage::AwaitingAge);

        // The malformed input was not consumed for anything else.
        assert_eq!(
            session.answer("6"),
            StepOutcome::Advanced(Stage::AwaitingNapCount)
        );
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut session = DiagnosticSession::start();
        assert_eq!(session.answer("-3"), StepOutcome::Retry(Stage::AwaitingAge));
    }

    #[test]
    fn bedtime_accepts_any_text() {
        let mut session = DiagnosticSession::start();
        session.answer("8");
        session.answer("2");

        assert_eq!(
            session.answer("vers 20h, parfois plus tard"),
            StepOutcome::Advanced(Stage::AwaitingWakeCount)
        );
    }

    #[test]
    fn non_integer_wake_count_reprompts() {
        let mut session = DiagnosticSession::start();
        session.answer("8");
        session.answer("2");
        session.answer("20h");

        assert_eq!(
            session.answer("beaucoup"),
            StepOutcome::Retry(Stage::AwaitingWakeCount)
        );
        assert_eq!(session.stage(), Stage::AwaitingWakeCount);
    }

    #[test]
    fn input_is_trimmed_before_parsing() {
        let mut session = DiagnosticSession::start();
        assert_eq!(
            session.answer("  12  "),
            StepOutcome::Advanced(Stage::AwaitingNapCount)
        );
    }
}
