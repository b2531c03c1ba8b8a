use crate::offer::CatalogError;
use serde::{Deserialize, Serialize};

/// Shipping charge as supplied by the order service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Shipping {
    Free,
    Flat { cents: i32 },
}

impl Shipping {
    pub fn cents(&self) -> i32 {
        match self {
            Shipping::Free => 0,
            Shipping::Flat { cents } => *cents,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Shipping::Free => "Free".to_string(),
            Shipping::Flat { cents } => format_amount(i64::from(*cents)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_price_cents: i32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_price_cents: i32, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price_cents,
            quantity,
        }
    }

    /// Widened so large quantities cannot overflow
    pub fn line_total_cents(&self) -> i64 {
        i64::from(self.unit_price_cents) * i64::from(self.quantity)
    }

    /// "2× Name" for multiples, the bare name otherwise
    pub fn display_name(&self) -> String {
        if self.quantity > 1 {
            format!("{}× {}", self.quantity, self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Order data handed to the confirmation screen by the external order service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_number: String,
    pub delivery_date: String,
    pub items: Vec<LineItem>,
    pub shipping: Shipping,
    pub total_cents: i32,
}

impl OrderSummary {
    pub fn subtotal_cents(&self) -> i64 {
        self.items
            .iter()
            .map(LineItem::line_total_cents)
            .fold(0, i64::saturating_add)
    }

    pub fn shipping_label(&self) -> String {
        self.shipping.label()
    }

    pub fn total_label(&self) -> String {
        format_amount(i64::from(self.total_cents))
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.order_number.trim().is_empty() {
            return Err(CatalogError::InvalidOrder("order number is blank".to_string()));
        }
        if self.items.is_empty() {
            return Err(CatalogError::InvalidOrder("order has no items".to_string()));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(CatalogError::InvalidOrder(format!("{} has zero quantity", item.name)));
        }
        if let Some(item) = self.items.iter().find(|i| i.unit_price_cents < 0) {
            return Err(CatalogError::InvalidOrder(format!("{} has a negative price", item.name)));
        }
        if self.total_cents < 0 {
            return Err(CatalogError::InvalidOrder("total is negative".to_string()));
        }
        Ok(())
    }
}

impl Default for OrderSummary {
    fn default() -> Self {
        Self {
            order_number: "AX7829".to_string(),
            delivery_date: "Thursday, Jan 9".to_string(),
            items: vec![LineItem::new("Sony WH-1000XM5 Wireless Headphones", 8_900, 1)],
            shipping: Shipping::Free,
            total_cents: 8_900,
        }
    }
}

/// "$89.00"
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

/// "$12" for whole amounts, "$12.50" otherwise
pub fn format_compact(cents: i32) -> String {
    if cents % 100 == 0 {
        let sign = if cents < 0 { "-" } else { "" };
        format!("{}${}", sign, cents.unsigned_abs() / 100)
    } else {
        format_amount(i64::from(cents))
    }
}
