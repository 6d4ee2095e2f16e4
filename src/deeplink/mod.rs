//! Links into the web and mobile apps.
//!
//! `web` is the base URL of the web app without a trailing slash, e.g.
//! `https://app.example.com`. Ids are inserted as given.

use url::form_urlencoded;

pub fn org_url(web: &str, org_id: &str) -> String {
    format!("{}/org/{}", web, org_id)
}

pub fn org_details_url(web: &str, org_id: &str) -> String {
    format!("{}/details", org_url(web, org_id))
}

pub fn saved_query_url(web: &str, org_id: &str, saved_query_id: &str) -> String {
    format!("{}/list/{}", org_url(web, org_id), saved_query_id)
}

pub fn saved_query_details_url(web: &str, org_id: &str, saved_query_id: &str) -> String {
    format!("{}/details", saved_query_url(web, org_id, saved_query_id))
}

pub fn thread_url(web: &str, org_id: &str, saved_query_id: &str, thread_id: &str) -> String {
    format!("{}/thread/{}", saved_query_url(web, org_id, saved_query_id), thread_id)
}

pub fn thread_details_url(
    web: &str,
    org_id: &str,
    saved_query_id: &str,
    thread_id: &str,
) -> String {
    format!("{}/details", thread_url(web, org_id, saved_query_id, thread_id))
}

/// Thread link that does not depend on the recipient's saved queries
pub fn thread_url_shareable(web: &str, org_id: &str, thread_id: &str) -> String {
    format!("{}/thread/{}", org_url(web, org_id), thread_id)
}

pub fn thread_message_url(
    web: &str,
    org_id: &str,
    saved_query_id: &str,
    thread_id: &str,
    message_id: &str,
) -> String {
    format!(
        "{}/message/{}",
        thread_url(web, org_id, saved_query_id, thread_id),
        message_id
    )
}

pub fn thread_message_details_url(
    web: &str,
    org_id: &str,
    saved_query_id: &str,
    thread_id: &str,
    message_id: &str,
) -> String {
    format!(
        "{}/details",
        thread_message_url(web, org_id, saved_query_id, thread_id, message_id)
    )
}

pub fn thread_message_url_shareable(
    web: &str,
    org_id: &str,
    thread_id: &str,
    message_id: &str,
) -> String {
    format!(
        "{}/message/{}",
        thread_url_shareable(web, org_id, thread_id),
        message_id
    )
}

pub fn thread_message_details_url_shareable(
    web: &str,
    org_id: &str,
    thread_id: &str,
    message_id: &str,
) -> String {
    format!(
        "{}/details",
        thread_message_url_shareable(web, org_id, thread_id, message_id)
    )
}

pub fn org_settings_email_url(web: &str, org_id: &str) -> String {
    format!("{}/settings/email", org_url(web, org_id))
}

pub fn org_settings_phone_url(web: &str, org_id: &str) -> String {
    format!("{}/settings/phone", org_url(web, org_id))
}

pub fn org_settings_notifications_url(web: &str, org_id: &str) -> String {
    format!("{}/settings/notifications", org_url(web, org_id))
}

pub fn org_colleague_invite_url(web: &str, org_id: &str) -> String {
    format!("{}/invite", org_url(web, org_id))
}

pub fn visit_url(web: &str, thread_id: &str, visit_id: &str) -> String {
    format!("{}/thread/{}/visit/{}", web, thread_id, visit_id)
}

/// With a thread the care plan opens inside it
pub fn care_plan_url(web: &str, thread_id: Option<&str>, care_plan_id: &str) -> String {
    match thread_id {
        Some(thread_id) if !thread_id.is_empty() => {
            format!("{}/thread/{}/careplan/{}", web, thread_id, care_plan_id)
        }
        _ => format!("{}/careplan/{}", web, care_plan_id),
    }
}

pub fn payment_url(web: &str, payment_id: &str) -> String {
    format!("{}/payment/{}/", web, payment_id)
}

/// Link that makes the app post a client event, e.g. from a setup message
pub fn post_event_url(web: &str, event: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("name", event);
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!("{}/post_event?{}", web, query.finish())
}
