//! Transition journal.
//!
//! Classrooms send every transition over a channel while holding their own
//! lock, so the events of any one classroom arrive in transition order.
//! Events of different classrooms interleave arbitrarily. After a run the
//! driver drains the channel into a `Journal` and audits it.

use crossbeam_channel::Receiver;
use serde::Serialize;
use std::collections::BTreeMap;

use schola_core::error::ProtocolError;
use schola_core::id::ClassroomId;
use schola_core::types::{LessonEvent, StartBasis, Transition};

/// Counts gathered while auditing a journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JournalStats {
    /// Lessons started and ended
    pub lessons: usize,

    /// Lessons started below quorum
    pub degraded: usize,

    /// Classrooms closed without a lesson
    pub closed: usize,

    /// Attendances summed over every ended lesson
    pub attendees: usize,
}

/// Where a classroom is within its cycle while replaying its events.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Unclaimed,
    Claimed,
    Running { enrolled: usize },
    Ended,
}

impl Phase {
    fn expected(&self) -> &'static str {
        match self {
            Self::Unclaimed => "Claimed",
            Self::Claimed => "Started or Closed",
            Self::Running { .. } => "Ended",
            Self::Ended => "Reset",
        }
    }
}

/// Ordered record of classroom transitions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Journal {
    events: Vec<LessonEvent>,
}

impl Journal {
    /// Build a journal from events in arrival order.
    pub fn from_events(events: Vec<LessonEvent>) -> Self {
        Self { events }
    }

    /// Take every event currently queued on `receiver`.
    pub fn drain(receiver: &Receiver<LessonEvent>) -> Self {
        Self::from_events(receiver.try_iter().collect())
    }

    /// All events in arrival order.
    pub fn events(&self) -> &[LessonEvent] {
        &self.events
    }

    /// Events of one classroom, in transition order.
    pub fn for_classroom(&self, classroom: ClassroomId) -> impl Iterator<Item = &LessonEvent> {
        self.events.iter().filter(move |e| e.classroom == classroom)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no transition was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Audit every classroom's transitions.
    ///
    /// Each cycle must read `Claimed, Started, Ended, Reset` or
    /// `Claimed, Closed`, with consecutive cycle numbers. Each start must be
    /// justified by its recorded counts: a quorum start needs `quorum`
    /// members, a fallback start needs at least one member and fewer than
    /// `quorum` eligible students that are not contested by another
    /// classroom. Every cycle must be complete.
    pub fn verify(&self, quorum: usize) -> Result<JournalStats, ProtocolError> {
        let mut by_classroom: BTreeMap<ClassroomId, Vec<&LessonEvent>> = BTreeMap::new();
        for event in &self.events {
            by_classroom.entry(event.classroom).or_default().push(event);
        }

        let mut stats = JournalStats::default();
        for (classroom, events) in by_classroom {
            verify_classroom(classroom, &events, quorum, &mut stats)?;
        }
        Ok(stats)
    }
}

fn verify_classroom(
    classroom: ClassroomId,
    events: &[&LessonEvent],
    quorum: usize,
    stats: &mut JournalStats,
) -> Result<(), ProtocolError> {
    let mut phase = Phase::Unclaimed;
    let mut cycle = 0u32;

    for event in events {
        if event.cycle != cycle {
            return Err(ProtocolError::Sequence {
                classroom,
                cycle,
                expected: format!("cycle {}", cycle),
                found: format!("{} in cycle {}", event.transition.name(), event.cycle),
            });
        }

        phase = match (phase, &event.transition) {
            (Phase::Unclaimed, Transition::Claimed { .. }) => Phase::Claimed,
            (Phase::Claimed, Transition::Closed) => {
                stats.closed += 1;
                Phase::Unclaimed
            }
            (Phase::Claimed, Transition::Started { enrolled, basis }) => {
                check_start(classroom, cycle, *enrolled, *basis, quorum)?;
                if basis.is_degraded() {
                    stats.degraded += 1;
                }
                Phase::Running {
                    enrolled: *enrolled,
                }
            }
            (Phase::Running { enrolled }, Transition::Ended { attendees }) => {
                if *attendees != enrolled {
                    return Err(ProtocolError::Conservation(format!(
                        "{} cycle {} started with {} students but ended with {}",
                        classroom, cycle, enrolled, attendees
                    )));
                }
                stats.lessons += 1;
                stats.attendees += attendees;
                Phase::Ended
            }
            (Phase::Ended, Transition::Reset) => {
                cycle += 1;
                Phase::Unclaimed
            }
            (phase, transition) => {
                return Err(ProtocolError::Sequence {
                    classroom,
                    cycle,
                    expected: phase.expected().to_string(),
                    found: transition.name().to_string(),
                })
            }
        };
    }

    match phase {
        Phase::Unclaimed => Ok(()),
        phase => Err(ProtocolError::Sequence {
            classroom,
            cycle,
            expected: phase.expected().to_string(),
            found: "end of journal".to_string(),
        }),
    }
}

fn check_start(
    classroom: ClassroomId,
    cycle: u32,
    enrolled: usize,
    basis: StartBasis,
    quorum: usize,
) -> Result<(), ProtocolError> {
    let justified = match basis {
        StartBasis::Quorum => enrolled >= quorum,
        StartBasis::Fallback {
            eligible,
            contested,
        } => enrolled >= 1 && contested <= eligible && eligible - contested < quorum,
    };
    if justified {
        Ok(())
    } else {
        Err(ProtocolError::UnjustifiedStart {
            classroom,
            cycle,
            detail: format!("{} enrolled, quorum {}, basis {:?}", enrolled, quorum, basis),
        })
    }
}
