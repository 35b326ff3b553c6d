//! FoodVision engine: HTTP collaborators, the status poller and the session
//! driver that executes core effects.
mod encode;
mod enrich;
mod http;
mod poller;
mod session;
mod settings;
mod store;
mod submit;

pub use encode::{encode_artifact, read_artifact, EncodedPayload, EncodingError};
pub use enrich::{enrich, EnrichError, Enricher, UsdaEnricher};
pub use poller::{spawn_poller, PollHandle, PollSettings};
pub use session::{Clock, Collaborators, SessionDriver};
pub use settings::{ClientSettings, ConfigError};
pub use store::{decode_status, HttpStatusStore, StatusStore, StoreQueryError};
pub use submit::{submit_job, HttpUploader, SubmitError, Uploader};
