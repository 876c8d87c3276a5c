#[cfg(test)]
mod tests {
    use crate::routes::lead::schemas::{CateringQuoteWebRequest, MembershipSignupWebRequest};
    use crate::routes::lead::utils::{generate_catering_alert, generate_membership_alert};

    #[test]
    fn test_catering_alert_carries_every_field() {
        let quote = CateringQuoteWebRequest {
            name: "Marcia Campbell".to_string(),
            email: "marcia@example.com".to_string(),
            phone: "305-555-0142".to_string(),
            event_type: "Wedding".to_string(),
            event_date: "2026-10-04".to_string(),
            guest_count: "120".to_string(),
            venue: "Coral Gables".to_string(),
            proteins: "Jerk chicken, oxtail".to_string(),
            message: "Buffet style preferred".to_string(),
        };
        let (subject, body) = generate_catering_alert(&quote);
        assert_eq!(subject, "New Catering Quote Request - Marcia Campbell");
        assert!(body.contains("Email: marcia@example.com"));
        assert!(body.contains("Guest Count: 120"));
        assert!(body.contains("Proteins: Jerk chicken, oxtail"));
        assert!(body.contains("Message: Buffet style preferred"));
    }

    #[test]
    fn test_membership_alert_formats_name_tier_and_address() {
        let signup = MembershipSignupWebRequest {
            tier: "gold".to_string(),
            first_name: "Andre".to_string(),
            last_name: "Walker".to_string(),
            email: "andre@example.com".to_string(),
            phone: "305-555-0199".to_string(),
            address: "88 Ocean Drive".to_string(),
            city: "Miami".to_string(),
            state: "FL".to_string(),
            zip: "33139".to_string(),
            agree_terms: true,
        };
        let (subject, body) = generate_membership_alert(&signup);
        assert_eq!(subject, "New Membership Signup - Andre Walker (gold)");
        assert!(body.contains("Tier: gold"));
        assert!(body.contains("Address: 88 Ocean Drive, Miami, FL 33139"));
    }
}
