//! Sleep assessment derived from the collected answers.
//!
//! Pure functions of the answer tuple, no I/O, so every verdict is
//! testable against literal inputs. Rendering (and the premium upsell)
//! happens in the application layer.

use super::session::DiagnosticAnswers;

/// Verdict on the reported nap count versus the age-appropriate ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NapVerdict {
    TooMany,
    TooFew,
    OnTarget,
}

/// Verdict on the reported night wakings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeVerdict {
    /// More than three per night: check sleep windows and bedtime.
    Frequent,
    /// One to three: normal, optimizable.
    Normal,
    /// None: excellent.
    Excellent,
}

/// Structured assessment of one completed diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepAssessment {
    /// Age-appropriate nap count the actual count was compared against.
    pub ideal_naps: u32,
    pub nap_verdict: NapVerdict,
    pub wake_verdict: WakeVerdict,
}

/// Ideal daytime naps by age bracket (months): 0-3 → 4, 4-6 → 3,
/// 7-12 → 2, 13+ → 1.
pub fn ideal_nap_count(age_months: u32) -> u32 {
    if age_months <= 3 {
        4
    } else if age_months <= 6 {
        3
    } else if age_months <= 12 {
        2
    } else {
        1
    }
}

/// Assesses a completed diagnostic.
pub fn assess(answers: &DiagnosticAnswers) -> SleepAssessment {
    let ideal_naps = ideal_nap_count(answers.age_months);

    let nap_verdict = if answers.nap_count > ideal_naps {
        NapVerdict::TooMany
    } else if answers.nap_count < ideal_naps {
        NapVerdict::TooFew
    } else {
        NapVerdict::OnTarget
    };

    let wake_verdict = if answers.wake_count > 3 {
        WakeVerdict::Frequent
    } else if answers.wake_count > 0 {
        WakeVerdict::Normal
    } else {
        WakeVerdict::Excellent
    };

    SleepAssessment {
        ideal_naps,
        nap_verdict,
        wake_verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(age: u32, naps: u32, wakes: u32) -> DiagnosticAnswers {
        DiagnosticAnswers {
            age_months: age,
            nap_count: naps,
            bedtime: "19h30".to_string(),
            wake_count: wakes,
        }
    }

    #[test]
    fn ideal_nap_boundary_table() {
        assert_eq!(ideal_nap_count(0), 4);
        assert_eq!(ideal_nap_count(3), 4);
        assert_eq!(ideal_nap_count(4), 3);
        assert_eq!(ideal_nap_count(6), 3);
        assert_eq!(ideal_nap_count(7), 2);
        assert_eq!(ideal_nap_count(12), 2);
        assert_eq!(ideal_nap_count(13), 1);
        assert_eq!(ideal_nap_count(36), 1);
    }

    #[test]
    fn six_months_two_naps_one_wake() {
        // Ideal for six months is 3, so two naps reads as too few.
        let assessment = assess(&answers(6, 2, 1));

        assert_eq!(assessment.ideal_naps, 3);
        assert_eq!(assessment.nap_verdict, NapVerdict::TooFew);
        assert_eq!(assessment.wake_verdict, WakeVerdict::Normal);
    }

    #[test]
    fn too_many_naps_detected() {
        let assessment = assess(&answers(14, 3, 0));
        assert_eq!(assessment.nap_verdict, NapVerdict::TooMany);
    }

    #[test]
    fn on_target_naps_detected() {
        let assessment = assess(&answers(9, 2, 2));
        assert_eq!(assessment.nap_verdict, NapVerdict::OnTarget);
    }

    #[test]
    fn wake_verdict_boundaries() {
        assert_eq!(assess(&answers(6, 3, 0)).wake_verdict, WakeVerdict::Excellent);
        assert_eq!(assess(&answers(6, 3, 1)).wake_verdict, WakeVerdict::Normal);
        assert_eq!(assess(&answers(6, 3, 3)).wake_verdict, WakeVerdict::Normal);
        assert_eq!(assess(&answers(6, 3, 4)).wake_verdict, WakeVerdict::Frequent);
    }

    #[test]
    fn assessment_is_deterministic() {
        let a = assess(&answers(8, 2, 5));
        let b = assess(&answers(8, 2, 5));
        assert_eq!(a, b);
    }
}
