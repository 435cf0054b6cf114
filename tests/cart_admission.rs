use event_items_api::cart::{Admission, AdmissionError, CartState, ItemSnapshot};
use uuid::Uuid;

fn snapshot(available: i32) -> ItemSnapshot {
    ItemSnapshot {
        id: Uuid::new_v4(),
        name: "Backdrop Banner".into(),
        available_quantity: available,
    }
}

#[test]
fn in_stock_request_lands_in_cart() {
    let mut cart = CartState::new();
    let item = snapshot(10);

    let admission = cart.add(&item, 3).unwrap();
    assert_eq!(admission, Admission::Cart);
    assert_eq!(cart.item_quantity(item.id), 3);
    assert!(cart.wishlist_lines().is_empty());
}

#[test]
fn out_of_stock_request_lands_in_wishlist_and_merges() {
    let mut cart = CartState::new();
    let item = snapshot(0);

    assert_eq!(cart.add(&item, 2).unwrap(), Admission::Wishlist);
    assert_eq!(cart.add(&item, 5).unwrap(), Admission::Wishlist);

    assert_eq!(cart.wishlist_lines().len(), 1);
    assert_eq!(cart.wishlist_lines()[0].requested_quantity, 7);
    assert!(cart.cart_lines().is_empty());
}

#[test]
fn exceeding_availability_rejects_and_leaves_cart_unchanged() {
    let mut cart = CartState::new();
    let item = snapshot(10);

    cart.add(&item, 3).unwrap();
    let err = cart.add(&item, 8).unwrap_err();
    assert!(matches!(
        err,
        AdmissionError::ExceedsAvailable {
            available: 10,
            in_cart: 3,
            ..
        }
    ));
    assert_eq!(cart.item_quantity(item.id), 3);
}

#[test]
fn single_add_larger_than_availability_is_rejected() {
    let mut cart = CartState::new();
    let item = snapshot(2);

    assert!(cart.add(&item, 3).is_err());
    assert_eq!(cart.item_quantity(item.id), 0);
    assert!(cart.is_empty());
}

#[test]
fn repeated_adds_merge_instead_of_duplicating() {
    let mut cart = CartState::new();
    let item = snapshot(10);

    cart.add(&item, 2).unwrap();
    cart.add(&item, 4).unwrap();

    assert_eq!(cart.cart_lines().len(), 1);
    assert_eq!(cart.item_quantity(item.id), 6);
}

#[test]
fn zero_or_negative_quantity_is_invalid() {
    let mut cart = CartState::new();
    let item = snapshot(10);

    assert_eq!(cart.add(&item, 0), Err(AdmissionError::InvalidQuantity));
    assert_eq!(cart.add(&item, -1), Err(AdmissionError::InvalidQuantity));
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_zero_removes_the_line() {
    let mut cart = CartState::new();
    let item = snapshot(10);

    cart.add(&item, 3).unwrap();
    cart.set_quantity(item.id, 0).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_past_availability_is_rejected() {
    let mut cart = CartState::new();
    let item = snapshot(4);

    cart.add(&item, 2).unwrap();
    assert!(cart.set_quantity(item.id, 5).is_err());
    assert_eq!(cart.item_quantity(item.id), 2);

    cart.set_quantity(item.id, 4).unwrap();
    assert_eq!(cart.item_quantity(item.id), 4);
}

#[test]
fn total_quantity_counts_cart_lines_only() {
    let mut cart = CartState::new();
    let in_stock = snapshot(10);
    let sold_out = snapshot(0);

    cart.add(&in_stock, 3).unwrap();
    cart.add(&sold_out, 5).unwrap();

    assert_eq!(cart.total_quantity(), 3);
}

#[test]
fn clear_empties_both_lists() {
    let mut cart = CartState::new();
    cart.add(&snapshot(5), 1).unwrap();
    cart.add(&snapshot(0), 2).unwrap();

    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total_quantity(), 0);
}
