//! The branching table: which node follows a given answer.
//!
//! Branching is plain data. `route()` looks an answer up in `BRANCHES`; the
//! controller interprets the result. There are no per-button callbacks.

use super::node::NodeId;

/// Informational message attached to an answer. Never changes the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// Alarm reminder after any physical follow-up answer.
    MedicationReminder,
    /// Alarm reminder after admitting to missed medication.
    AdherenceReminder,
    /// Contact number for arranging a talk.
    ContactInfo,
    /// The same number without the acknowledgement.
    ContactLine,
    /// The fixed list of small wellbeing steps.
    Suggestions,
}

/// Where an answer leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub next: NodeId,
    pub note: Option<Note>,
}

/// One row of the table. `answer: None` matches any free text.
struct Branch {
    node: NodeId,
    answer: Option<&'static str>,
    next: NodeId,
    note: Option<Note>,
}

const fn to(node: NodeId, answer: &'static str, next: NodeId) -> Branch {
    Branch {
        node,
        answer: Some(answer),
        next,
        note: None,
    }
}

const fn noted(node: NodeId, answer: &'static str, next: NodeId, note: Note) -> Branch {
    Branch {
        node,
        answer: Some(answer),
        next,
        note: Some(note),
    }
}

use NodeId::*;
use Note::*;

/// All branches, grouped by node in survey order.
static BRANCHES: &[Branch] = &[
    to(FeelingToday, "good", PositiveAction),
    to(FeelingToday, "normal", PositiveAction),
    to(FeelingToday, "not_good", NotGoodReason),
    to(NotGoodReason, "physical", PhysicalFollowUp),
    to(NotGoodReason, "mental", MentalFollowUp),
    to(NotGoodReason, "both", NotGoodFocus),
    to(NotGoodFocus, "physical", PhysicalFollowUp),
    to(NotGoodFocus, "mental", MentalFollowUp),
    noted(PhysicalFollowUp, "pain", Medication, MedicationReminder),
    noted(PhysicalFollowUp, "symptoms", Medication, MedicationReminder),
    noted(PhysicalFollowUp, "medication", Medication, MedicationReminder),
    noted(MentalFollowUp, "social_worker", Medication, ContactInfo),
    noted(MentalFollowUp, "psychologist", Medication, ContactInfo),
    to(MentalFollowUp, "no", Medication),
    to(PositiveAction, "yes", Medication),
    noted(PositiveAction, "want_to", Medication, Suggestions),
    noted(PositiveAction, "no", Medication, Suggestions),
    to(Medication, "regular", PhysicalDays),
    noted(Medication, "sometimes", PhysicalDays, AdherenceReminder),
    noted(Medication, "missed", PhysicalDays, AdherenceReminder),
    to(PhysicalDays, "energetic", MentalDays),
    to(PhysicalDays, "normal", MentalDays),
    to(PhysicalDays, "tired", MentalDays),
    to(MentalDays, "good", OpenEnded),
    to(MentalDays, "normal", OpenEnded),
    to(MentalDays, "sad", MentalDaysFollowUp),
    noted(MentalDaysFollowUp, "social_worker", OpenEnded, ContactLine),
    noted(MentalDaysFollowUp, "psychologist", OpenEnded, ContactLine),
    to(MentalDaysFollowUp, "no", OpenEnded),
    Branch {
        node: OpenEnded,
        answer: None,
        next: Done,
        note: None,
    },
];

/// Transition function. `None` for answers outside the node's option set
/// (and for blank free text).
pub fn route(node: NodeId, answer: &str) -> Option<Route> {
    BRANCHES
        .iter()
        .find(|b| {
            b.node == node
                && match b.answer {
                    Some(expected) => expected == answer,
                    None => !answer.trim().is_empty(),
                }
        })
        .map(|b| Route {
            next: b.next,
            note: b.note,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total_over_choices() {
        for node in NodeId::ALL {
            for choice in node.choices() {
                assert!(
                    route(node, choice.value).is_some(),
                    "{node} has no route for '{}'",
                    choice.value
                );
            }
        }
    }

    #[test]
    fn table_has_no_rows_outside_choices() {
        for branch in BRANCHES {
            match branch.answer {
                Some(answer) => assert!(
                    branch.node.choice(answer).is_some(),
                    "{} has a branch for unknown option '{answer}'",
                    branch.node
                ),
                None => assert!(branch.node.is_free_text()),
            }
        }
    }

    #[test]
    fn unknown_answers_have_no_route() {
        assert_eq!(route(FeelingToday, "great"), None);
        assert_eq!(route(NotGoodFocus, "both"), None);
        assert_eq!(route(Done, "anything"), None);
        assert_eq!(route(OpenEnded, "   "), None);
    }

    #[test]
    fn done_only_follows_open_ended() {
        for branch in BRANCHES {
            if branch.next == Done {
                assert_eq!(branch.node, OpenEnded);
            }
        }
    }

    #[test]
    fn both_reenters_restricted_question() {
        let route = route(NotGoodReason, "both").unwrap();
        assert_eq!(route.next, NotGoodFocus);
        assert_eq!(route.note, None);
    }

    #[test]
    fn notes_are_attached_to_the_right_answers() {
        assert_eq!(route(PhysicalFollowUp, "symptoms").unwrap().note, Some(MedicationReminder));
        assert_eq!(route(MentalFollowUp, "no").unwrap().note, None);
        assert_eq!(route(MentalFollowUp, "psychologist").unwrap().note, Some(ContactInfo));
        assert_eq!(route(PositiveAction, "yes").unwrap().note, None);
        assert_eq!(route(PositiveAction, "want_to").unwrap().note, Some(Suggestions));
        assert_eq!(route(Medication, "missed").unwrap().note, Some(AdherenceReminder));
        assert_eq!(route(MentalDays, "sad").unwrap().next, MentalDaysFollowUp);
        assert_eq!(route(MentalDaysFollowUp, "psychologist").unwrap().note, Some(ContactLine));
        assert_eq!(route(MentalDaysFollowUp, "no").unwrap().note, None);
    }

    #[test]
    fn graph_is_acyclic() {
        // Depth-first walk over every path; a revisit would loop forever.
        fn walk(node: NodeId, path: &mut Vec<NodeId>) {
            assert!(!path.contains(&node), "cycle through {node}: {path:?}");
            if node.is_terminal() {
                return;
            }
            path.push(node);
            if node.is_free_text() {
                walk(route(node, "text").unwrap().next, path);
            } else {
                for choice in node.choices() {
                    walk(route(node, choice.value).unwrap().next, path);
                }
            }
            path.pop();
        }
        walk(NodeId::FIRST, &mut Vec::new());
    }
}
