use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{FREE_SAMPLE_PRODUCT_ID, FREE_SHIPPING_THRESHOLD, UPSELL_VARIANT_PATTERN};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Sauce,
    Pikliz,
    Bundle,
}

/// Immutable reference data; never mutated at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: &'static str,
    pub slug: &'static str,
    pub name: &'static str,
    pub size: &'static str,
    pub image: &'static str,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub category: ProductCategory,
    pub in_stock: bool,
    pub bundle_items: &'static [&'static str],
}

pub static PRODUCTS: &[Product] = &[
    Product {
        id: "jerk-sauce-2oz",
        slug: "jerk-sauce-2oz",
        name: "Original Jerk Sauce",
        size: "2oz",
        image: "/images/products/jerk-sauce-2oz.jpg",
        price: 699,
        compare_at_price: None,
        category: ProductCategory::Sauce,
        in_stock: true,
        bundle_items: &[],
    },
    Product {
        id: "jerk-sauce-5oz",
        slug: "jerk-sauce-5oz",
        name: "Original Jerk Sauce",
        size: "5oz",
        image: "/images/products/jerk-sauce-5oz.jpg",
        price: 1199,
        compare_at_price: None,
        category: ProductCategory::Sauce,
        in_stock: true,
        bundle_items: &[],
    },
    Product {
        id: "jerk-sauce-10oz",
        slug: "jerk-sauce-10oz",
        name: "Original Jerk Sauce",
        size: "10oz",
        image: "/images/products/jerk-sauce-10oz.jpg",
        price: 1899,
        compare_at_price: None,
        category: ProductCategory::Sauce,
        in_stock: true,
        bundle_items: &[],
    },
    Product {
        id: "escovitch-pikliz-12oz",
        slug: "escovitch-pikliz-12oz",
        name: "Escovitch Pikliz",
        size: "12oz",
        image: "/images/products/pikliz-12oz.jpg",
        price: 1199,
        compare_at_price: None,
        category: ProductCategory::Pikliz,
        in_stock: true,
        bundle_items: &[],
    },
    Product {
        id: "jamaica-house-bundle",
        slug: "jamaica-house-bundle",
        name: "Jamaica House Bundle",
        size: "2oz + 5oz + 12oz",
        image: "/images/products/product-group.jpg",
        price: 2499,
        compare_at_price: Some(3097),
        category: ProductCategory::Bundle,
        in_stock: true,
        bundle_items: &["jerk-sauce-2oz", "jerk-sauce-5oz", "escovitch-pikliz-12oz"],
    },
];

pub fn get_product_by_id(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.id == id)
}

/// Strips the discounted-variant marker from a cart id, e.g.
/// `jerk-sauce-5oz-upsell-25` resolves to `jerk-sauce-5oz`.
pub fn strip_upsell_suffix(item_id: &str) -> Cow<'_, str> {
    UPSELL_VARIANT_PATTERN.replace(item_id, "")
}

/// 75% of the catalog price, rounded to the nearest cent.
pub fn upsell_unit_price(catalog_price: i64) -> i64 {
    (catalog_price * 3 + 2) / 4
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShippingOptionType {
    Standard,
    Express,
    Free,
}

impl ShippingOptionType {
    pub fn rate(&self) -> i64 {
        match self {
            ShippingOptionType::Standard => 599,
            ShippingOptionType::Express => 1299,
            ShippingOptionType::Free => 0,
        }
    }
}

impl std::fmt::Display for ShippingOptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShippingOptionType::Standard => write!(f, "standard"),
            ShippingOptionType::Express => write!(f, "express"),
            ShippingOptionType::Free => write!(f, "free"),
        }
    }
}

/// At or above the threshold every option ships free except express, which
/// always keeps its rate. Below the threshold the free tier is not earned
/// yet and falls back to the standard rate.
pub fn shipping_cost(option: ShippingOptionType, subtotal: i64) -> i64 {
    match option {
        ShippingOptionType::Express => ShippingOptionType::Express.rate(),
        _ if subtotal >= FREE_SHIPPING_THRESHOLD => 0,
        ShippingOptionType::Free => ShippingOptionType::Standard.rate(),
        other => other.rate(),
    }
}

/// A discounted add-on shown once after the primary payment succeeds. Offer
/// prices are flat cent amounts fixed at authoring time, not recomputed
/// from the live catalog.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsellOffer {
    pub product_id: &'static str,
    pub name: &'static str,
    pub size: &'static str,
    pub image: &'static str,
    pub original_price: i64,
    pub offer_price: i64,
    pub savings_text: &'static str,
}

static BIG_BOTTLE_OFFER: UpsellOffer = UpsellOffer {
    product_id: "jerk-sauce-10oz",
    name: "Original Jerk Sauce",
    size: "10oz",
    image: "/images/products/jerk-sauce-10oz.jpg",
    original_price: 1899,
    offer_price: 1599,
    savings_text: "Save $3.00",
};

static PIKLIZ_OFFER: UpsellOffer = UpsellOffer {
    product_id: "escovitch-pikliz-12oz",
    name: "Escovitch Pikliz",
    size: "12oz",
    image: "/images/products/pikliz-12oz.jpg",
    original_price: 1199,
    offer_price: 999,
    savings_text: "Save $2.00",
};

static MID_SAUCE_OFFER: UpsellOffer = UpsellOffer {
    product_id: "jerk-sauce-5oz",
    name: "Original Jerk Sauce",
    size: "5oz",
    image: "/images/products/jerk-sauce-5oz.jpg",
    original_price: 1199,
    offer_price: 999,
    savings_text: "Save $2.00",
};

static BUNDLE_OFFER: UpsellOffer = UpsellOffer {
    product_id: "jamaica-house-bundle",
    name: "Jamaica House Bundle",
    size: "2oz + 5oz + 12oz",
    image: "/images/products/product-group.jpg",
    original_price: 2499,
    offer_price: 2099,
    savings_text: "Save $4.00",
};

static DOWNSELL_OFFER: UpsellOffer = UpsellOffer {
    product_id: "jerk-sauce-2oz",
    name: "Original Jerk Sauce",
    size: "2oz",
    image: "/images/products/jerk-sauce-2oz.jpg",
    original_price: 699,
    offer_price: 599,
    savings_text: "Save $1.00",
};

/// Picks the one contextual offer for a cart by inspecting which product
/// families it already holds.
pub fn select_upsell_offer(cart_item_ids: &[&str]) -> &'static UpsellOffer {
    let has_sauce = cart_item_ids
        .iter()
        .any(|id| id.starts_with("jerk-sauce") || *id == FREE_SAMPLE_PRODUCT_ID);
    let has_pikliz = cart_item_ids.iter().any(|id| id.contains("pikliz"));
    let has_bundle = cart_item_ids.iter().any(|id| id.contains("bundle"));

    if has_bundle {
        // Already has the bundle, upsell the big bottle
        &BIG_BOTTLE_OFFER
    } else if has_sauce && !has_pikliz {
        &PIKLIZ_OFFER
    } else if has_pikliz && !has_sauce {
        &MID_SAUCE_OFFER
    } else {
        &BUNDLE_OFFER
    }
}

pub fn downsell_offer() -> &'static UpsellOffer {
    &DOWNSELL_OFFER
}

/// Looks up an off-session offer by product id. Client-sent amounts are never
/// charged directly; the charge amount always comes from the matched offer.
pub fn offer_for(product_id: &str) -> Option<&'static UpsellOffer> {
    [
        &BIG_BOTTLE_OFFER,
        &PIKLIZ_OFFER,
        &MID_SAUCE_OFFER,
        &BUNDLE_OFFER,
        &DOWNSELL_OFFER,
    ]
    .into_iter()
    .find(|offer| offer.product_id == product_id)
}

pub fn offer_price_for(product_id: &str) -> Option<i64> {
    offer_for(product_id).map(|offer| offer.offer_price)
}
