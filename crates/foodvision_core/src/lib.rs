//! FoodVision core: pure session state machine, classification tables and
//! nutrient normalization. No IO happens here; the engine executes the
//! returned effects and feeds results back as messages.
mod catalog;
mod effect;
mod job;
mod msg;
mod nutrients;
mod poll;
mod state;
mod update;
mod view_model;

pub use catalog::Category;
pub use effect::Effect;
pub use job::{Job, JobId, JobIdGenerator};
pub use msg::{Msg, UploadOutcome};
pub use nutrients::{
    normalize_nutrients, NutrientRecord, NutrientUnit, RawNutrient, APPROVED_NUTRIENTS,
};
pub use poll::{JobStatus, PollObservation, PollState};
pub use state::{AppState, Session, SessionError};
pub use update::update;
pub use view_model::{Phase, SessionSnapshot};
