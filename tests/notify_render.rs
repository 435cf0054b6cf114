use chrono::NaiveDate;
use event_items_api::{
    config::AppConfig,
    notify::{Notification, build_ics, render},
};
use uuid::Uuid;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        allowed_email_domain: "@vellummortgage.com".into(),
        email_function_url: None,
        email_api_key: None,
        email_from: "Event Items Store <events@vellummortgage.com>".into(),
        notify_email: "events@vellummortgage.com".into(),
        store_url: "https://eventitemstore.vercel.app".into(),
    }
}

#[test]
fn render_replaces_every_occurrence() {
    let out = render(
        "Hi {{userName}}, order for {{userName}} on {{pickupDate}}.",
        &[
            ("userName", "Jordan".to_string()),
            ("pickupDate", "September 1, 2026".to_string()),
        ],
    );
    assert_eq!(out, "Hi Jordan, order for Jordan on September 1, 2026.");
}

#[test]
fn render_leaves_unknown_tokens_alone() {
    let out = render("{{known}} and {{unknown}}", &[("known", "yes".to_string())]);
    assert_eq!(out, "yes and {{unknown}}");
}

#[test]
fn ics_is_an_all_day_event() {
    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let ics = build_ics("Event items pickup", date, "abc123");

    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.contains("PRODID:-//Vellum Event Items//Calendar//EN"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20260901"));
    assert!(ics.contains("DTEND;VALUE=DATE:20260902"));
    assert!(ics.contains("SUMMARY:Event items pickup"));
    assert!(ics.contains("UID:abc123@vellummortgage.com"));
    assert!(ics.trim_end().ends_with("END:VCALENDAR"));
}

#[test]
fn order_notice_goes_to_the_internal_address() {
    let config = test_config();
    let notification = Notification::OrderPlaced {
        order_id: Uuid::new_v4(),
        user_name: "Jordan".into(),
        user_email: "jordan@vellummortgage.com".into(),
        pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
        item_summary: "3 x Backdrop Banner".into(),
    };

    assert_eq!(notification.recipient(&config), "events@vellummortgage.com");
    assert_eq!(notification.template_id(), "order_notification");
}

#[test]
fn confirmation_goes_to_the_requester_with_their_fields() {
    let config = test_config();
    let order_id = Uuid::new_v4();
    let notification = Notification::UserConfirmation {
        order_id,
        user_name: "Jordan".into(),
        user_email: "jordan@vellummortgage.com".into(),
        pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
        item_summary: "3 x Backdrop Banner".into(),
    };

    assert_eq!(notification.recipient(&config), "jordan@vellummortgage.com");

    let vars = notification.placeholders(&config);
    let get = |key: &str| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_eq!(get("orderId"), order_id.to_string());
    assert_eq!(get("pickupDate"), "September 1, 2026");
    assert_eq!(get("returnDate"), "September 5, 2026");
    assert_eq!(get("items"), "3 x Backdrop Banner");
    assert_eq!(get("storeLink"), "https://eventitemstore.vercel.app");
}

#[test]
fn wishlist_notice_carries_item_and_quantity() {
    let config = test_config();
    let notification = Notification::WishlistFulfilled {
        order_id: Uuid::new_v4(),
        user_name: "Jordan".into(),
        user_email: "jordan@vellummortgage.com".into(),
        item_name: "Travel Mug".into(),
        fulfilled_quantity: 2,
    };

    assert_eq!(
        notification.template_id(),
        "wishlist_available_notification"
    );
    let vars = notification.placeholders(&config);
    assert!(vars.contains(&("itemName", "Travel Mug".to_string())));
    assert!(vars.contains(&("fulfilledQuantity", "2".to_string())));
}
