use crate::order::format_compact;
use earn_shared::OfferId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visual emphasis of an offer card
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferVariant {
    #[default]
    Default,
    Premium,
    Limited,
}

/// Supplementary "Learn more" content behind the details toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpandedContent {
    pub title: String,
    pub points: Vec<String>,
}

/// A promotional offer shown after checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: OfferId,
    pub icon: String,
    pub reward: String,
    pub action: String,
    pub details: Vec<String>,
    pub cta_primary: String,
    pub cta_secondary: String,
    pub price_cents: Option<i32>,
    pub trust_signal: Option<String>,
    pub variant: OfferVariant,
    pub badge: Option<String>,
    pub popularity_count: Option<u32>,
    pub savings_cents: Option<i32>,
    pub expanded_content: Option<ExpandedContent>,
}

impl Offer {
    pub fn new(
        id: impl Into<OfferId>,
        reward: impl Into<String>,
        action: impl Into<String>,
        cta_primary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            icon: String::new(),
            reward: reward.into(),
            action: action.into(),
            details: Vec::new(),
            cta_primary: cta_primary.into(),
            cta_secondary: "Skip".to_string(),
            price_cents: None,
            trust_signal: None,
            variant: OfferVariant::Default,
            badge: None,
            popularity_count: None,
            savings_cents: None,
            expanded_content: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_secondary(mut self, label: impl Into<String>) -> Self {
        self.cta_secondary = label.into();
        self
    }

    pub fn with_price(mut self, cents: i32) -> Self {
        self.price_cents = Some(cents);
        self
    }

    pub fn with_trust_signal(mut self, text: impl Into<String>) -> Self {
        self.trust_signal = Some(text.into());
        self
    }

    pub fn with_variant(mut self, variant: OfferVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_popularity(mut self, count: u32) -> Self {
        self.popularity_count = Some(count);
        self
    }

    pub fn with_savings(mut self, cents: i32) -> Self {
        self.savings_cents = Some(cents);
        self
    }

    pub fn with_expanded_content(mut self, content: ExpandedContent) -> Self {
        self.expanded_content = Some(content);
        self
    }

    /// Primary button text, suffixed with the price when there is one
    pub fn primary_label(&self) -> String {
        match self.price_cents {
            Some(cents) => format!("{} – {}", self.cta_primary, format_compact(cents)),
            None => self.cta_primary.clone(),
        }
    }

    pub fn social_proof(&self) -> Option<String> {
        self.popularity_count
            .filter(|count| *count > 0)
            .map(|count| format!("{}+ people chose this today", group_thousands(count)))
    }

    pub fn savings_label(&self) -> Option<String> {
        self.savings_cents.map(|cents| format!("Save {}", format_compact(cents)))
    }

    pub fn is_limited(&self) -> bool {
        self.variant == OfferVariant::Limited
    }

    pub fn has_details_toggle(&self) -> bool {
        self.expanded_content.is_some()
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// The ordered set of offers a container mounts with
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Catalog {
    offers: Vec<Offer>,
}

impl Catalog {
    pub fn new(offers: Vec<Offer>) -> Result<Self, CatalogError> {
        if offers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for offer in &offers {
            if !seen.insert(offer.id.clone()) {
                return Err(CatalogError::DuplicateOffer(offer.id.to_string()));
            }
            if offer.reward.trim().is_empty() {
                return Err(CatalogError::InvalidOffer {
                    id: offer.id.to_string(),
                    reason: "reward text is blank".to_string(),
                });
            }
            if offer.cta_primary.trim().is_empty() {
                return Err(CatalogError::InvalidOffer {
                    id: offer.id.to_string(),
                    reason: "primary call to action is blank".to_string(),
                });
            }
        }

        Ok(Self { offers })
    }

    /// The four offers shown on the post-purchase confirmation screen
    pub fn post_purchase() -> Self {
        let offers = vec![
            Offer::new(
                "delivery-updates",
                "Get 10% Off Your Next Order",
                "Enable delivery updates and we'll text you when your package is arriving.",
                "Enable Updates",
            )
            .with_icon("📦")
            .with_details([
                "Real-time GPS tracking",
                "Delivery photo alerts",
                "10% coupon (valid 30 days)",
            ])
            .with_trust_signal("We'll send 2–3 texts max. Unsubscribe anytime.")
            .with_badge("Most Popular")
            .with_popularity(12_847),
            Offer::new(
                "protection-plan",
                "Extend Your Return Window",
                "Add 2-year protection for $12 and get 60-day returns (vs 30).",
                "Add Protection",
            )
            .with_icon("🛡️")
            .with_details([
                "Accidental damage coverage",
                "Wear and tear protection",
                "Free repairs/replacement",
            ])
            .with_price(1_200)
            .with_trust_signal("Charged separately. Cancel anytime in first 30 days.")
            .with_variant(OfferVariant::Premium)
            .with_savings(4_700),
            Offer::new(
                "subscribe-save",
                "Never Run Out + Earn 500 Points",
                "Switch to auto-delivery and save 15% on every refill.",
                "Subscribe Now",
            )
            .with_icon("♻️")
            .with_details([
                "Delivers every 60 days",
                "Skip or cancel anytime",
                "Earn loyalty points 2x faster",
            ])
            .with_secondary("Not Now")
            .with_trust_signal("Next delivery: March 9. Adjust frequency or cancel from your account.")
            .with_variant(OfferVariant::Limited)
            .with_expanded_content(ExpandedContent {
                title: "How it works:".to_string(),
                points: vec![
                    "We'll send your first refill in 60 days".to_string(),
                    "Skip, reschedule, or cancel anytime from your account".to_string(),
                    "Get reminded 3 days before each delivery".to_string(),
                ],
            }),
            Offer::new(
                "setup-video",
                "Watch Tips & Get Free Shipping",
                "2-minute setup guide for your new headphones.",
                "Watch Now – 2 min",
            )
            .with_icon("🎬")
            .with_details([
                "Get perfect sound in 5 steps",
                "Learn hidden features",
                "Unlock free shipping (next order, no minimum)",
            ])
            .with_popularity(8_429),
        ];

        Self { offers }
    }

    pub fn get(&self, id: &OfferId) -> Option<&Offer> {
        self.offers.iter().find(|o| &o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offer> {
        self.offers.iter()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn into_offers(self) -> Vec<Offer> {
        self.offers
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::post_purchase()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog has no offers")]
    Empty,

    #[error("Duplicate offer id: {0}")]
    DuplicateOffer(String),

    #[error("Invalid offer {id}: {reason}")]
    InvalidOffer { id: String, reason: String },

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_purchase_catalog_is_valid() {
        let catalog = Catalog::post_purchase();
        let validated = Catalog::new(catalog.clone().into_offers()).unwrap();

        assert_eq!(validated.len(), 4);
        let ids: Vec<&str> = catalog.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["delivery-updates", "protection-plan", "subscribe-save", "setup-video"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            Offer::new("AX-1", "Reward", "Action", "Go"),
            Offer::new("AX-1", "Other", "Action", "Go"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateOffer(id)) if id == "AX-1"));
    }

    #[test]
    fn test_blank_offers_rejected() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
        assert!(Catalog::new(vec![Offer::new("AX-1", " ", "Action", "Go")]).is_err());
        assert!(Catalog::new(vec![Offer::new("AX-1", "Reward", "Action", "")]).is_err());
    }

    #[test]
    fn test_presentation_text() {
        let catalog = Catalog::post_purchase();

        let protection = catalog.get(&OfferId::new("protection-plan")).unwrap();
        assert_eq!(protection.primary_label(), "Add Protection – $12");
        assert_eq!(protection.savings_label().as_deref(), Some("Save $47"));
        assert_eq!(protection.cta_secondary, "Skip");

        let updates = catalog.get(&OfferId::new("delivery-updates")).unwrap();
        assert_eq!(updates.social_proof().as_deref(), Some("12,847+ people chose this today"));
        assert_eq!(updates.primary_label(), "Enable Updates");

        let subscription = catalog.get(&OfferId::new("subscribe-save")).unwrap();
        assert!(subscription.is_limited());
        assert!(subscription.has_details_toggle());
        assert_eq!(subscription.cta_secondary, "Not Now");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(8_429), "8,429");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
