//! Best-effort outbound notifications.
//!
//! Every notification maps to a row in `email_templates`; rendering is plain
//! `{{placeholder}}` substitution. Dispatch happens after the primary
//! transaction commits: one spawned task per notification, failures logged
//! and swallowed, never joined back into the caller's result.

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::{config::AppConfig, models::EmailTemplate, state::AppState};

pub const TEMPLATE_IDS: [&str; 7] = [
    "order_notification",
    "user_confirmation",
    "pickup_confirmation",
    "return_confirmation",
    "cancel_confirmation",
    "wishlist_available_notification",
    "calendar_invite",
];

#[derive(Debug, Clone)]
pub enum Notification {
    /// Internal notice that a new order landed.
    OrderPlaced {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
        item_summary: String,
    },
    /// Requester-facing confirmation of the submission.
    UserConfirmation {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
        item_summary: String,
    },
    PickupConfirmation {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        pickup_date: NaiveDate,
    },
    ReturnConfirmation {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        return_date: NaiveDate,
    },
    CancelConfirmation {
        order_id: Uuid,
        user_name: String,
        user_email: String,
    },
    /// A pending wishlist request was fulfilled into the requester's order.
    WishlistFulfilled {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        item_name: String,
        fulfilled_quantity: i32,
    },
    /// Calendar reminder with an attached iCalendar document.
    CalendarInvite {
        order_id: Uuid,
        user_name: String,
        user_email: String,
        title: String,
        date: NaiveDate,
    },
}

impl Notification {
    pub fn template_id(&self) -> &'static str {
        match self {
            Notification::OrderPlaced { .. } => "order_notification",
            Notification::UserConfirmation { .. } => "user_confirmation",
            Notification::PickupConfirmation { .. } => "pickup_confirmation",
            Notification::ReturnConfirmation { .. } => "return_confirmation",
            Notification::CancelConfirmation { .. } => "cancel_confirmation",
            Notification::WishlistFulfilled { .. } => "wishlist_available_notification",
            Notification::CalendarInvite { .. } => "calendar_invite",
        }
    }

    pub fn recipient<'a>(&'a self, config: &'a AppConfig) -> &'a str {
        match self {
            Notification::OrderPlaced { .. } => &config.notify_email,
            Notification::UserConfirmation { user_email, .. } => user_email,
            Notification::PickupConfirmation { user_email, .. } => user_email,
            Notification::ReturnConfirmation { user_email, .. } => user_email,
            Notification::CancelConfirmation { user_email, .. } => user_email,
            Notification::WishlistFulfilled { user_email, .. } => user_email,
            Notification::CalendarInvite { user_email, .. } => user_email,
        }
    }

    pub fn placeholders(&self, config: &AppConfig) -> Vec<(&'static str, String)> {
        let mut vars = vec![("storeLink", config.store_url.clone())];
        match self {
            Notification::OrderPlaced {
                order_id,
                user_name,
                user_email,
                pickup_date,
                return_date,
                item_summary,
            }
            | Notification::UserConfirmation {
                order_id,
                user_name,
                user_email,
                pickup_date,
                return_date,
                item_summary,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
                vars.push(("pickupDate", format_date(*pickup_date)));
                vars.push(("returnDate", format_date(*return_date)));
                vars.push(("items", item_summary.clone()));
            }
            Notification::PickupConfirmation {
                order_id,
                user_name,
                user_email,
                pickup_date,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
                vars.push(("pickupDate", format_date(*pickup_date)));
            }
            Notification::ReturnConfirmation {
                order_id,
                user_name,
                user_email,
                return_date,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
                vars.push(("returnDate", format_date(*return_date)));
            }
            Notification::CancelConfirmation {
                order_id,
                user_name,
                user_email,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
            }
            Notification::WishlistFulfilled {
                order_id,
                user_name,
                user_email,
                item_name,
                fulfilled_quantity,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
                vars.push(("itemName", item_name.clone()));
                vars.push(("fulfilledQuantity", fulfilled_quantity.to_string()));
            }
            Notification::CalendarInvite {
                order_id,
                user_name,
                user_email,
                title,
                date,
            } => {
                vars.push(("orderId", order_id.to_string()));
                vars.push(("userName", user_name.clone()));
                vars.push(("userEmail", user_email.clone()));
                vars.push(("eventTitle", title.clone()));
                vars.push(("eventDate", format_date(*date)));
            }
        }
        vars
    }

    fn ics_attachment(&self) -> Option<String> {
        match self {
            Notification::CalendarInvite {
                order_id,
                title,
                date,
                ..
            } => Some(build_ics(title, *date, &format!("{order_id}"))),
            _ => None,
        }
    }
}

/// Replace every `{{key}}` token in the template with its value.
pub fn render(template: &str, replacements: &[(&'static str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in replacements {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// All-day VEVENT for a pickup or return reminder.
pub fn build_ics(summary: &str, date: NaiveDate, uid: &str) -> String {
    let start = date.format("%Y%m%d");
    let end = date.succ_opt().unwrap_or(date).format("%Y%m%d");
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Vellum Event Items//Calendar//EN\r\n\
         BEGIN:VEVENT\r\n\
         DTSTART;VALUE=DATE:{start}\r\n\
         DTEND;VALUE=DATE:{end}\r\n\
         SUMMARY:{summary}\r\n\
         UID:{uid}@vellummortgage.com\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

/// Spawn one independent send task per notification. Called only after the
/// primary mutation committed; errors are logged, never propagated.
pub fn dispatch_all(state: &AppState, notifications: Vec<Notification>) {
    for notification in notifications {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(err) = send(&state, &notification).await {
                tracing::warn!(
                    template = notification.template_id(),
                    error = %err,
                    "notification dispatch failed"
                );
            }
        });
    }
}

async fn send(state: &AppState, notification: &Notification) -> anyhow::Result<()> {
    let Some(url) = state.config.email_function_url.as_deref() else {
        tracing::debug!(
            template = notification.template_id(),
            "EMAIL_FUNCTION_URL not set, skipping notification"
        );
        return Ok(());
    };

    let template: Option<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates WHERE template_id = $1")
            .bind(notification.template_id())
            .fetch_optional(&state.pool)
            .await?;
    let template = template
        .ok_or_else(|| anyhow!("email template {} not found", notification.template_id()))?;

    let vars = notification.placeholders(&state.config);
    let subject = render(&template.subject, &vars);
    let html = render(&template.body_html, &vars);

    let mut body = json!({
        "from": state.config.email_from,
        "to": [notification.recipient(&state.config)],
        "subject": subject,
        "html": html,
    });
    if let Some(ics) = notification.ics_attachment() {
        body["attachments"] = json!([{ "filename": "calendar-event.ics", "content": ics }]);
    }

    let mut request = state.http.post(url).json(&body);
    if let Some(key) = state.config.email_api_key.as_deref() {
        request = request.bearer_auth(key);
    }
    let response = request.send().await?;
    if !response.status().is_success() {
        bail!("mail endpoint returned {}", response.status());
    }

    tracing::info!(
        template = notification.template_id(),
        "notification dispatched"
    );
    Ok(())
}
