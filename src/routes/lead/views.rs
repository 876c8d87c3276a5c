use std::collections::HashMap;
use std::sync::Arc;

use actix_web::web;

use super::errors::LeadError;
use super::schemas::{
    CateringQuoteWebRequest, LeadSubmissionResponse, MembershipSignupWebRequest,
    SubscribeWebRequest,
};
use super::utils::{generate_catering_alert, generate_membership_alert, send_email_background};
use crate::configuration::NotificationSettings;
use crate::constants::LEAD_EMAIL_PATTERN;
use crate::crm_client::CrmClient;
use crate::email_client::GenericEmailService;
use crate::schemas::{CommunicationType, GenericResponse};

#[utoipa::path(
    post,
    path = "/lead/catering_quote",
    tag = "Lead",
    request_body(content = CateringQuoteWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Quote request submitted", body= GenericResponse<LeadSubmissionResponse>),
    )
)]
#[tracing::instrument(
    err,
    name = "Submit catering quote",
    skip(email_pool, notification_settings, body),
    fields(email = %body.email)
)]
pub async fn submit_catering_quote(
    body: CateringQuoteWebRequest,
    email_pool: web::Data<HashMap<CommunicationType, Arc<dyn GenericEmailService>>>,
    notification_settings: web::Data<NotificationSettings>,
) -> Result<web::Json<GenericResponse<LeadSubmissionResponse>>, LeadError> {
    if body.name.is_empty()
        || body.email.is_empty()
        || body.phone.is_empty()
        || body.event_type.is_empty()
        || body.event_date.is_empty()
        || body.guest_count.is_empty()
    {
        return Err(LeadError::ValidationError(
            "Name, email, phone, event type, date, and guest count are required".to_string(),
        ));
    }
    if !LEAD_EMAIL_PATTERN.is_match(&body.email) {
        return Err(LeadError::ValidationError(
            "Please provide a valid email address".to_string(),
        ));
    }
    tracing::info!(
        "New catering quote request from {} for {} guests on {}",
        body.name,
        body.guest_count,
        body.event_date
    );
    let (subject, alert_body) = generate_catering_alert(&body);
    if let Some(email_service) = email_pool.get(&CommunicationType::LeadAlert) {
        tokio::spawn(send_email_background(
            email_service.clone(),
            notification_settings.order_email_recipient.clone(),
            subject,
            alert_body,
        ));
    } else {
        return Err(LeadError::UnexpectedStringError(
            "Internal Server Error".to_string(),
        ));
    }

    Ok(web::Json(GenericResponse::success(
        "Quote request submitted successfully",
        Some(LeadSubmissionResponse { success: true }),
    )))
}

#[utoipa::path(
    post,
    path = "/lead/membership_signup",
    tag = "Lead",
    request_body(content = MembershipSignupWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Signup submitted", body= GenericResponse<LeadSubmissionResponse>),
    )
)]
#[tracing::instrument(
    err,
    name = "Submit membership signup",
    skip(email_pool, notification_settings, body),
    fields(email = %body.email, tier = %body.tier)
)]
pub async fn submit_membership_signup(
    body: MembershipSignupWebRequest,
    email_pool: web::Data<HashMap<CommunicationType, Arc<dyn GenericEmailService>>>,
    notification_settings: web::Data<NotificationSettings>,
) -> Result<web::Json<GenericResponse<LeadSubmissionResponse>>, LeadError> {
    if body.tier.is_empty()
        || body.first_name.is_empty()
        || body.last_name.is_empty()
        || body.email.is_empty()
        || body.phone.is_empty()
        || body.address.is_empty()
        || body.city.is_empty()
        || body.state.is_empty()
        || body.zip.is_empty()
    {
        return Err(LeadError::ValidationError(
            "All fields are required".to_string(),
        ));
    }
    if !body.agree_terms {
        return Err(LeadError::ValidationError(
            "You must agree to the terms and conditions".to_string(),
        ));
    }
    if !LEAD_EMAIL_PATTERN.is_match(&body.email) {
        return Err(LeadError::ValidationError(
            "Please provide a valid email address".to_string(),
        ));
    }
    tracing::info!(
        "New membership signup: {} {} on the {} tier",
        body.first_name,
        body.last_name,
        body.tier
    );
    let (subject, alert_body) = generate_membership_alert(&body);
    if let Some(email_service) = email_pool.get(&CommunicationType::LeadAlert) {
        tokio::spawn(send_email_background(
            email_service.clone(),
            notification_settings.order_email_recipient.clone(),
            subject,
            alert_body,
        ));
    } else {
        return Err(LeadError::UnexpectedStringError(
            "Internal Server Error".to_string(),
        ));
    }

    Ok(web::Json(GenericResponse::success(
        "Signup submitted successfully",
        Some(LeadSubmissionResponse { success: true }),
    )))
}

/// The shopper gets their sample whether or not the CRM cooperates, so every
/// upsert failure is logged and swallowed.
#[utoipa::path(
    post,
    path = "/lead/subscribe",
    tag = "Lead",
    request_body(content = SubscribeWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Subscriber recorded", body= GenericResponse<LeadSubmissionResponse>),
    )
)]
#[tracing::instrument(
    err,
    name = "Subscribe for free sample",
    skip(crm_client, body),
    fields(email = %body.email)
)]
pub async fn subscribe_free_sample(
    body: SubscribeWebRequest,
    crm_client: web::Data<CrmClient>,
) -> Result<web::Json<GenericResponse<LeadSubmissionResponse>>, LeadError> {
    if body.first_name.is_empty() || body.email.is_empty() {
        return Err(LeadError::ValidationError(
            "Name and email are required".to_string(),
        ));
    }
    tracing::info!(
        "New free sample signup: {} (email opt-in: {}, sms opt-in: {})",
        body.first_name,
        body.email_opt_in,
        body.sms_opt_in
    );
    let phone = if body.sms_opt_in {
        body.phone.as_deref().filter(|phone| !phone.is_empty())
    } else {
        None
    };
    if let Err(err) = crm_client
        .upsert_subscriber(&body.email, &body.first_name, phone)
        .await
    {
        tracing::error!("Failed to upsert the subscriber into the CRM: {:?}", err);
    }

    Ok(web::Json(GenericResponse::success(
        "Subscriber recorded successfully",
        Some(LeadSubmissionResponse { success: true }),
    )))
}
