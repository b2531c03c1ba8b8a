pub mod models;

pub use models::events::{EventRecord, InteractionEvent};
pub use models::ids::OfferId;
pub use models::kinds::{NextStep, Sentiment, View};
