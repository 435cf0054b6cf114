use event_items_api::models::OrderStatus;

#[test]
fn pending_offers_pickup_or_cancel() {
    let next = OrderStatus::Pending.allowed_next();
    assert_eq!(next, &[OrderStatus::PickedUp, OrderStatus::Cancelled][..]);
}

#[test]
fn picked_up_offers_only_return() {
    assert_eq!(
        OrderStatus::PickedUp.allowed_next(),
        &[OrderStatus::Returned][..]
    );
}

#[test]
fn terminal_states_offer_nothing() {
    assert!(OrderStatus::Returned.allowed_next().is_empty());
    assert!(OrderStatus::Cancelled.allowed_next().is_empty());
    assert!(OrderStatus::Returned.is_terminal());
    assert!(OrderStatus::Cancelled.is_terminal());
}

#[test]
fn wishlist_only_offers_only_cancel() {
    assert_eq!(
        OrderStatus::WishlistOnly.allowed_next(),
        &[OrderStatus::Cancelled][..]
    );
}

#[test]
fn no_transition_skips_states() {
    assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Returned));
    assert!(!OrderStatus::WishlistOnly.can_transition_to(OrderStatus::PickedUp));
    assert!(!OrderStatus::WishlistOnly.can_transition_to(OrderStatus::Returned));
    assert!(!OrderStatus::PickedUp.can_transition_to(OrderStatus::Cancelled));
}

#[test]
fn status_strings_round_trip() {
    for status in [
        OrderStatus::Pending,
        OrderStatus::PickedUp,
        OrderStatus::Returned,
        OrderStatus::Cancelled,
        OrderStatus::WishlistOnly,
    ] {
        let parsed = status.as_str().parse::<OrderStatus>().unwrap();
        assert_eq!(parsed, status);
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
}

#[test]
fn status_serializes_as_snake_case() {
    let json = serde_json::to_string(&OrderStatus::PickedUp).unwrap();
    assert_eq!(json, "\"picked_up\"");
    let json = serde_json::to_string(&OrderStatus::WishlistOnly).unwrap();
    assert_eq!(json, "\"wishlist_only\"");
}
