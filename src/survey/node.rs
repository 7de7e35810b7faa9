//! Question nodes of the survey dialogue.

use serde::{Deserialize, Serialize};

/// A selectable answer: the stored `value` and the text shown on the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

/// Every question/branch state of the survey.
///
/// `PositiveAction` is the follow-up for participants feeling good or normal.
/// `NotGoodFocus` is the not-good question asked again after `both`, restricted
/// to a single focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    FeelingToday,
    NotGoodReason,
    NotGoodFocus,
    PhysicalFollowUp,
    MentalFollowUp,
    PositiveAction,
    Medication,
    PhysicalDays,
    MentalDays,
    MentalDaysFollowUp,
    OpenEnded,
    Done,
}

const FEELING_TODAY: &[Choice] = &[
    choice("good", "▫️ I'm good"),
    choice("normal", "▫️ I'm okay"),
    choice("not_good", "▫️ I'm not feeling well"),
];

const NOT_GOOD_REASON: &[Choice] = &[
    choice("physical", "▫️ Physically"),
    choice("mental", "▫️ Emotionally"),
    choice("both", "▫️ Both"),
];

const NOT_GOOD_FOCUS: &[Choice] = &[
    choice("physical", "▫️ With how my body feels"),
    choice("mental", "▫️ With how I feel inside"),
];

const PHYSICAL_FOLLOW_UP: &[Choice] = &[
    choice("pain", "▫️ Had any particular pain or fatigue?"),
    choice("symptoms", "▫️ Noticed any new symptoms?"),
    choice("medication", "▫️ Taken your medication as scheduled?"),
];

const MENTAL_FOLLOW_UP: &[Choice] = &[
    choice("social_worker", "▫️ Yes, with my social worker"),
    choice("psychologist", "▫️ Yes, book a session with a psychologist"),
    choice("no", "▫️ Not now, I just wanted to say I'm not well"),
];

const POSITIVE_ACTION: &[Choice] = &[
    choice("yes", "▫️ Yes, I did something small"),
    choice("want_to", "▫️ Not yet, but I'd like to"),
    choice("no", "▫️ No, I didn't feel up to it"),
];

const MEDICATION: &[Choice] = &[
    choice("regular", "▫️ Yes, I take it regularly"),
    choice("sometimes", "▫️ Sometimes I forget"),
    choice("missed", "▫️ I haven't taken it for a few days"),
];

const PHYSICAL_DAYS: &[Choice] = &[
    choice("energetic", "▫️ Fresh and energetic"),
    choice("normal", "▫️ Normal"),
    choice("tired", "▫️ Tired or in pain"),
];

const MENTAL_DAYS: &[Choice] = &[
    choice("good", "▫️ Calm and good"),
    choice("normal", "▫️ Okay"),
    choice("sad", "▫️ Sad or low"),
];

const MENTAL_DAYS_FOLLOW_UP: &[Choice] = &[
    choice("social_worker", "▫️ Yes, with my social worker"),
    choice("psychologist", "▫️ Yes, book a session with a psychologist"),
    choice("no", "▫️ Not now"),
];

impl NodeId {
    pub const ALL: [NodeId; 12] = [
        Self::FeelingToday,
        Self::NotGoodReason,
        Self::NotGoodFocus,
        Self::PhysicalFollowUp,
        Self::MentalFollowUp,
        Self::PositiveAction,
        Self::Medication,
        Self::PhysicalDays,
        Self::MentalDays,
        Self::MentalDaysFollowUp,
        Self::OpenEnded,
        Self::Done,
    ];

    /// The first question of every session.
    pub const FIRST: NodeId = Self::FeelingToday;

    /// Canonical question text recorded in the response list.
    pub fn question(&self) -> &'static str {
        match self {
            Self::FeelingToday => "How are you feeling today?",
            Self::NotGoodReason | Self::NotGoodFocus => "In what way?",
            Self::PhysicalFollowUp => "What trouble have you had these past few days?",
            Self::MentalFollowUp => "Would you like to talk to someone?",
            Self::PositiveAction => "Did you take a small step for your wellbeing today?",
            Self::Medication => "Did you take your medication as scheduled?",
            Self::PhysicalDays => "How have you been physically these past few days?",
            Self::MentalDays => "How have you been emotionally these past few days?",
            Self::MentalDaysFollowUp => "Would you like to talk to someone to feel lighter?",
            Self::OpenEnded => "Is there anything you'd like to tell me or any help you need?",
            Self::Done => "",
        }
    }

    /// Bot message shown when the node is presented.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::FeelingToday => "🩵 1. How are you feeling today?",
            Self::NotGoodReason => {
                "I'm sorry you're not feeling well 🫶\nCan you tell me in what way?"
            }
            Self::NotGoodFocus => {
                "Thank you for telling me ❤️\n\
                 It sounds like both your body and your heart are tired.\n\
                 Shall we take it step by step? Where would you like to start?"
            }
            Self::PhysicalFollowUp => {
                "I understand, I hope you feel better soon 🌿\nThese past few days, have you:"
            }
            Self::MentalFollowUp => {
                "I see 💛\nSometimes talking helps us feel lighter.\n\
                 Would you like to talk to someone about it?"
            }
            Self::PositiveAction => {
                "Good 😌 I'm glad you're not feeling bad.\n\
                 Just one small question:\n\
                 Did you take a small step for your wellbeing today? 🌿\n\
                 For example resting, talking to someone, going for a walk or doing something you enjoy?"
            }
            Self::Medication => "🕒 2. Did you take your medication as scheduled?",
            Self::PhysicalDays => "🌦️ 3. How have you been physically these past few days?",
            Self::MentalDays => "💭 4. How have you been emotionally these past few days?",
            Self::MentalDaysFollowUp => "💬 Would you like to talk to someone to feel lighter?",
            Self::OpenEnded => {
                "✏️ 5. Is there anything you'd like to tell me or any help you need?"
            }
            Self::Done => "",
        }
    }

    /// Closed option set. Empty for the free-text and terminal nodes.
    pub fn choices(&self) -> &'static [Choice] {
        match self {
            Self::FeelingToday => FEELING_TODAY,
            Self::NotGoodReason => NOT_GOOD_REASON,
            Self::NotGoodFocus => NOT_GOOD_FOCUS,
            Self::PhysicalFollowUp => PHYSICAL_FOLLOW_UP,
            Self::MentalFollowUp => MENTAL_FOLLOW_UP,
            Self::PositiveAction => POSITIVE_ACTION,
            Self::Medication => MEDICATION,
            Self::PhysicalDays => PHYSICAL_DAYS,
            Self::MentalDays => MENTAL_DAYS,
            Self::MentalDaysFollowUp => MENTAL_DAYS_FOLLOW_UP,
            Self::OpenEnded | Self::Done => &[],
        }
    }

    /// Look up the option for `value` at this node.
    pub fn choice(&self, value: &str) -> Option<&'static Choice> {
        self.choices().iter().find(|c| c.value == value)
    }

    /// Whether this node takes free text instead of a choice.
    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::OpenEnded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Export column for answers to this node.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::FeelingToday => Some("feeling_today"),
            Self::NotGoodReason | Self::NotGoodFocus => Some("not_good_reason"),
            Self::PhysicalFollowUp => Some("physical_issue"),
            Self::MentalFollowUp => Some("want_to_talk"),
            Self::PositiveAction => Some("positive_action"),
            Self::Medication => Some("medication"),
            Self::PhysicalDays => Some("physical_days"),
            Self::MentalDays => Some("mental_days"),
            Self::MentalDaysFollowUp => Some("mental_days_follow_up"),
            Self::OpenEnded => Some("open_ended"),
            Self::Done => None,
        }
    }

    /// Export column for a recorded question text, if it is one of ours.
    pub fn column_for_question(question: &str) -> Option<&'static str> {
        Self::ALL
            .iter()
            .find(|node| !node.is_terminal() && node.question() == question)
            .and_then(|node| node.column())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FeelingToday => "feeling_today",
            Self::NotGoodReason => "not_good_reason",
            Self::NotGoodFocus => "not_good_focus",
            Self::PhysicalFollowUp => "physical_follow_up",
            Self::MentalFollowUp => "mental_follow_up",
            Self::PositiveAction => "positive_action",
            Self::Medication => "medication",
            Self::PhysicalDays => "physical_days",
            Self::MentalDays => "mental_days",
            Self::MentalDaysFollowUp => "mental_days_follow_up",
            Self::OpenEnded => "open_ended",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde() {
        for node in NodeId::ALL {
            let display = format!("{node}");
            let json = serde_json::to_string(&node).unwrap();
            assert_eq!(format!("\"{display}\""), json, "mismatch for {node:?}");
        }
    }

    #[test]
    fn choice_nodes_have_options() {
        for node in NodeId::ALL {
            if node.is_free_text() || node.is_terminal() {
                assert!(node.choices().is_empty(), "{node} should take no choices");
            } else {
                assert!(!node.choices().is_empty(), "{node} has no choices");
                assert!(!node.question().is_empty());
            }
        }
    }

    #[test]
    fn focus_is_restricted_to_single_area() {
        let values: Vec<_> = NodeId::NotGoodFocus
            .choices()
            .iter()
            .map(|c| c.value)
            .collect();
        assert_eq!(values, vec!["physical", "mental"]);
        assert!(NodeId::NotGoodFocus.choice("both").is_none());
    }

    #[test]
    fn question_text_maps_to_column() {
        assert_eq!(
            NodeId::column_for_question("How are you feeling today?"),
            Some("feeling_today")
        );
        assert_eq!(
            NodeId::column_for_question(NodeId::NotGoodFocus.question()),
            Some("not_good_reason")
        );
        assert_eq!(NodeId::column_for_question("Favourite colour?"), None);
        assert_eq!(NodeId::column_for_question(""), None);
    }
}
