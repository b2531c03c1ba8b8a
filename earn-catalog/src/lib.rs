pub mod offer;
pub mod order;
pub mod rewards;
pub mod tracking;

pub use offer::{Catalog, CatalogError, ExpandedContent, Offer, OfferVariant};
pub use order::{format_amount, format_compact, LineItem, OrderSummary, Shipping};
pub use rewards::{NextStepCard, RewardStats, SupportStatus, IMPROVEMENT_TOPICS, SURVEY_CREDIT_CENTS};
pub use tracking::{DeliveryPhase, DeliveryProgress, Stage, StageStatus};
