//! The survey itself: question graph, session state, and the flow controller.

pub mod branch;
pub mod controller;
pub mod effect;
pub mod node;
pub mod runner;
pub mod script;
pub mod session;

pub use branch::{Note, Route, route};
pub use controller::{SubmitOutcome, SurveyController, new_user_id};
pub use effect::Effect;
pub use node::{Choice, NodeId};
pub use runner::SurveyRunner;
pub use session::{DeviceState, Response, Session, Submission, SubmissionState};
