#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::payment_client::{
        CheckoutSession, PaymentIntent, SessionAddress, SessionCollectedInformation,
        SessionCustomerDetails, SessionLineItem, SessionLineItems, SessionShippingCost,
        SessionShippingDetails,
    };
    use crate::routes::webhook::utils::{
        build_order_from_intent, build_order_from_session, failed_channels,
        format_session_address, generate_receipt_html, generate_receipt_subject,
    };
    use crate::schemas::OrderKind;
    use crate::tests::tests::get_dummy_order_notification_data;

    fn intent_with_metadata(metadata: &[(&str, &str)]) -> PaymentIntent {
        PaymentIntent {
            id: "pi_test_123".to_string(),
            amount: 1798,
            currency: "usd".to_string(),
            status: "succeeded".to_string(),
            customer: Some("cus_test_123".to_string()),
            client_secret: None,
            payment_method: Some("pm_test_123".to_string()),
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_order_built_from_primary_intent_metadata() {
        let intent = intent_with_metadata(&[
            ("source", "jamaica-house-brand-checkout"),
            (
                "items",
                r#"[{"id":"jerk-sauce-5oz","name":"Original Jerk Sauce (5oz)","price":1199,"quantity":1}]"#,
            ),
            ("shipping_option", "standard"),
            ("shipping_cost", "599"),
            ("customer_name", "Desmond Green"),
            ("customer_email", "desmond@example.com"),
            ("shipping_address", "14 Palm Way, Miami, FL 33101"),
        ]);
        let order = build_order_from_intent(&intent);
        assert_eq!(order.kind, OrderKind::Primary);
        assert_eq!(order.order_id, "pi_test_123");
        assert_eq!(order.total, 1798);
        assert_eq!(order.shipping_cost, Some(599));
        assert_eq!(order.customer_email.as_deref(), Some("desmond@example.com"));
        assert_eq!(
            order.shipping_address.as_deref(),
            Some("14 Palm Way, Miami, FL 33101")
        );
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].name, "Original Jerk Sauce (5oz)");
        assert_eq!(order.line_items[0].unit_price, 1199);
    }

    #[test]
    fn test_order_built_from_upsell_intent_metadata() {
        let intent = intent_with_metadata(&[
            ("source", "jamaica-house-brand-checkout"),
            ("type", "post_purchase_upsell"),
            ("original_payment_intent", "pi_original_456"),
            (
                "items",
                r#"[{"id":"escovitch-pikliz-12oz","name":"Escovitch Pikliz (12oz)","price":999,"quantity":1}]"#,
            ),
        ]);
        let order = build_order_from_intent(&intent);
        assert_eq!(order.kind, OrderKind::Upsell);
        assert!(order.is_upsell());
        assert_eq!(order.shipping_cost, None);
        assert_eq!(order.shipping_address, None);
        assert_eq!(order.customer_email, None);
    }

    #[test]
    fn test_malformed_items_metadata_degrades_to_empty_list() {
        let intent = intent_with_metadata(&[
            ("source", "jamaica-house-brand-checkout"),
            ("items", "not json at all"),
        ]);
        let order = build_order_from_intent(&intent);
        assert!(order.line_items.is_empty());
        assert_eq!(order.total, 1798);
    }

    #[test]
    fn test_order_built_from_expanded_session() {
        let session = CheckoutSession {
            id: "cs_test_123".to_string(),
            url: None,
            payment_status: Some("paid".to_string()),
            amount_total: Some(1298),
            customer_details: Some(SessionCustomerDetails {
                email: Some("tanya@example.com".to_string()),
                name: Some("Tanya Brown".to_string()),
            }),
            collected_information: Some(SessionCollectedInformation {
                shipping_details: Some(SessionShippingDetails {
                    name: None,
                    address: Some(SessionAddress {
                        line1: Some("123 Test Street".to_string()),
                        line2: Some("Apt 4".to_string()),
                        city: Some("Miami".to_string()),
                        state: Some("FL".to_string()),
                        postal_code: Some("33101".to_string()),
                        country: Some("US".to_string()),
                    }),
                }),
            }),
            shipping_cost: Some(SessionShippingCost { amount_total: 599 }),
            line_items: Some(SessionLineItems {
                data: vec![SessionLineItem {
                    description: Some("Original Jerk Sauce (2oz)".to_string()),
                    quantity: Some(1),
                    amount_total: Some(699),
                }],
            }),
            metadata: HashMap::new(),
        };
        let order = build_order_from_session(&session);
        assert_eq!(order.kind, OrderKind::Primary);
        // Ship-to name falls back to the customer details.
        assert_eq!(order.customer_name.as_deref(), Some("Tanya Brown"));
        assert_eq!(
            order.shipping_address.as_deref(),
            Some("123 Test Street, Apt 4, Miami, FL 33101")
        );
        assert_eq!(order.shipping_cost, Some(599));
        assert_eq!(order.total, 1298);
        assert_eq!(order.line_items[0].unit_price, 699);
    }

    #[test]
    fn test_session_address_skips_missing_second_line() {
        let address = SessionAddress {
            line1: Some("123 Test Street".to_string()),
            line2: None,
            city: Some("Miami".to_string()),
            state: Some("FL".to_string()),
            postal_code: Some("33101".to_string()),
            country: Some("US".to_string()),
        };
        assert_eq!(
            format_session_address(&address),
            "123 Test Street, Miami, FL 33101"
        );
    }

    #[test]
    fn test_receipt_subject_and_heading_switch_on_order_kind() {
        let mut order = get_dummy_order_notification_data();
        assert_eq!(
            generate_receipt_subject(&order),
            "New Order - Desmond Green - $17.98"
        );
        assert!(generate_receipt_html(&order).contains("New Order Received"));

        order.kind = OrderKind::Upsell;
        assert_eq!(
            generate_receipt_subject(&order),
            "New Upsell Order - Desmond Green - $17.98"
        );
        assert!(generate_receipt_html(&order).contains("New Upsell Order"));
    }

    #[test]
    fn test_receipt_html_lists_items_and_total() {
        let order = get_dummy_order_notification_data();
        let html = generate_receipt_html(&order);
        assert!(html.contains("1x Original Jerk Sauce (5oz) - $11.99"));
        assert!(html.contains("<strong>Shipping:</strong> $5.99"));
        assert!(html.contains("<strong>Total: $17.98</strong>"));
        assert!(html.contains("14 Palm Way, Miami, FL 33101"));
    }

    #[test]
    fn test_receipt_html_degrades_without_items_or_shipping() {
        let mut order = get_dummy_order_notification_data();
        order.line_items.clear();
        order.shipping_cost = None;
        order.shipping_address = None;
        let html = generate_receipt_html(&order);
        assert!(html.contains("Items not available"));
        assert!(!html.contains("Shipping Address"));
        assert!(!html.contains("<strong>Shipping:</strong>"));
    }

    #[test]
    fn test_failed_channels_collects_only_failures() {
        let outcomes: [(&'static str, Result<(), anyhow::Error>); 3] = [
            ("email", Err(anyhow::anyhow!("connection refused"))),
            ("slack", Ok(())),
            ("command center", Err(anyhow::anyhow!("500"))),
        ];
        assert_eq!(failed_channels(&outcomes), vec!["email", "command center"]);

        let all_ok: [(&'static str, Result<(), anyhow::Error>); 2] =
            [("email", Ok(())), ("slack", Ok(()))];
        assert!(failed_channels(&all_ok).is_empty());
    }
}
