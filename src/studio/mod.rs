mod backend;
mod session;

pub use backend::{HttpBackend, StudioBackend, StudioRequest};
pub use session::{
    Notification, NotificationKind, StudioSession, SubmitOutcome, ANALYSIS_COMPLETE, COLLAGE_CREATED,
    CONNECTION_ERROR,
};
