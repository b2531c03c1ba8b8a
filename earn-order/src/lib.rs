pub mod checkin;
pub mod confirmation;
pub mod consent;
pub mod experience;

pub use checkin::{CheckInSnapshot, CheckInStage, FeedbackSession};
pub use confirmation::{ConfirmationSnapshot, OrderConfirmation};
pub use consent::{ConsentFooter, ConsentSnapshot};
pub use experience::{Experience, ExperienceConfig, ExperienceSnapshot};
