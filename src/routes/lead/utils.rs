use std::sync::Arc;

use crate::email_client::GenericEmailService;

use super::schemas::{CateringQuoteWebRequest, MembershipSignupWebRequest};

#[tracing::instrument(name = "Send lead alert", skip(email_service), fields(recipient))]
pub async fn send_email_background(
    email_service: Arc<dyn GenericEmailService>,
    recipient: String,
    subject: String,
    body: String,
) {
    let response = email_service
        .send_text_email(&recipient, &subject, body)
        .await;

    match response {
        Ok(_) => tracing::info!("Lead alert email sent in the background"),
        Err(err) => tracing::error!(
            "Failed to send the lead alert email in the background: {:?}",
            err
        ),
    }
}

pub fn generate_catering_alert(quote: &CateringQuoteWebRequest) -> (String, String) {
    let subject = format!("New Catering Quote Request - {}", quote.name);
    let body = format!(
        "Name: {}\nEmail: {}\nPhone: {}\nEvent Type: {}\nEvent Date: {}\nGuest Count: {}\nVenue: {}\nProteins: {}\nMessage: {}\n",
        quote.name,
        quote.email,
        quote.phone,
        quote.event_type,
        quote.event_date,
        quote.guest_count,
        quote.venue,
        quote.proteins,
        quote.message,
    );
    (subject, body)
}

pub fn generate_membership_alert(signup: &MembershipSignupWebRequest) -> (String, String) {
    let subject = format!(
        "New Membership Signup - {} {} ({})",
        signup.first_name, signup.last_name, signup.tier
    );
    let body = format!(
        "Tier: {}\nName: {} {}\nEmail: {}\nPhone: {}\nAddress: {}, {}, {} {}\n",
        signup.tier,
        signup.first_name,
        signup.last_name,
        signup.email,
        signup.phone,
        signup.address,
        signup.city,
        signup.state,
        signup.zip,
    );
    (subject, body)
}
