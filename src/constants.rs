use lazy_static::lazy_static;
use regex::Regex;

/// Metadata tag marking payment intents created by this backend.
pub const CHECKOUT_SOURCE_TAG: &str = "jamaica-house-brand-checkout";
/// Metadata tag marking hosted checkout sessions created by this backend.
pub const WEB_SOURCE_TAG: &str = "jamaica-house-brand-web";
/// Metadata `type` discriminator for off-session upsell charges.
pub const UPSELL_CHARGE_TYPE: &str = "post_purchase_upsell";

pub const METADATA_SOURCE_KEY: &str = "source";
pub const METADATA_TYPE_KEY: &str = "type";
pub const METADATA_ITEMS_KEY: &str = "items";
pub const METADATA_SHIPPING_OPTION_KEY: &str = "shipping_option";
pub const METADATA_SHIPPING_COST_KEY: &str = "shipping_cost";
pub const METADATA_CUSTOMER_NAME_KEY: &str = "customer_name";
pub const METADATA_CUSTOMER_EMAIL_KEY: &str = "customer_email";
pub const METADATA_SHIPPING_ADDRESS_KEY: &str = "shipping_address";
pub const METADATA_ORIGINAL_INTENT_KEY: &str = "original_payment_intent";

/// Synthetic cart id for the free 2oz sample promo; never in the catalog.
pub const FREE_SAMPLE_PRODUCT_ID: &str = "free-sample-2oz";

/// Orders at or above this subtotal (cents) ship free unless express.
pub const FREE_SHIPPING_THRESHOLD: i64 = 5000;

lazy_static! {
  pub static ref UPSELL_VARIANT_PATTERN: Regex =
      Regex::new(r"-upsell-\d+$").expect("Failed to compile regex pattern");
  pub static ref LEAD_EMAIL_PATTERN: Regex =
      Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile regex pattern");
  pub static ref ZIP_PATTERN: Regex =
      Regex::new(r"^\d{5}(-\d{4})?$").expect("Failed to compile regex pattern");
}
