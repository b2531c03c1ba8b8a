pub mod card;
pub mod section;

pub use card::{CardSnapshot, CardStatus, CardView, OfferCard};
pub use section::{EarnSection, SectionSnapshot};
