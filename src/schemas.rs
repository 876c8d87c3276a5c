use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenericResponse<D> {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
    pub data: Option<D>,
}

impl<D> GenericResponse<D> {
    pub fn success(message: &str, data: Option<D>) -> Self {
        Self {
            status: true,
            customer_message: String::from(message),
            code: String::from("200"),
            data,
        }
    }

    pub fn error(message: &str, code: &str, data: Option<D>) -> Self {
        Self {
            status: false,
            customer_message: String::from(message),
            code: String::from(code),
            data,
        }
    }
}

/// Which transactional mail a message belongs to; each type picks its
/// transport from the email pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommunicationType {
    OrderReceipt,
    LeadAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    Usd,
}

impl std::fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrencyType::Usd => write!(f, "usd"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Primary,
    Upsell,
}

/// One line of the `items` JSON snapshot embedded in intent metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataOrderItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLineSummary {
    pub name: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl From<MetadataOrderItem> for OrderLineSummary {
    fn from(item: MetadataOrderItem) -> Self {
        Self {
            name: item.name,
            quantity: item.quantity,
            unit_price: item.price,
        }
    }
}

/// Write-once projection of a completed order, assembled from a checkout
/// session or intent metadata and handed to every notification channel.
/// Never persisted; lives for the duration of one webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotificationData {
    pub order_id: String,
    pub kind: OrderKind,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub shipping_address: Option<String>,
    pub shipping_cost: Option<i64>,
    pub line_items: Vec<OrderLineSummary>,
    pub total: i64,
    pub placed_at: DateTime<Utc>,
}

impl OrderNotificationData {
    pub fn is_upsell(&self) -> bool {
        self.kind == OrderKind::Upsell
    }
}
