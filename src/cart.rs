//! Session-scoped cart/wishlist selection with admission control.
//!
//! Decides, at add time, whether a requested quantity routes to the cart
//! (immediately reservable) or the wishlist (item out of stock), and enforces
//! the availability cap on cart lines. Pure state, no I/O; the submission
//! service replays client lines through this against freshly locked item
//! rows, so the same rules gate what gets persisted.

use uuid::Uuid;

/// The slice of an item the cart needs to admit a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub id: Uuid,
    pub name: String,
    pub available_quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: ItemSnapshot,
    pub requested_quantity: i32,
}

#[derive(Debug, Clone)]
pub struct WishlistLine {
    pub item: ItemSnapshot,
    pub requested_quantity: i32,
}

/// Where an admitted request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Cart,
    Wishlist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// Requested quantity was zero or negative.
    InvalidQuantity,
    /// The cumulative cart quantity for the item would exceed availability.
    /// The cart is left unchanged; no partial admission.
    ExceedsAvailable {
        item_id: Uuid,
        available: i32,
        in_cart: i32,
    },
}

impl std::fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionError::InvalidQuantity => write!(f, "quantity must be greater than 0"),
            AdmissionError::ExceedsAvailable {
                available, in_cart, ..
            } => write!(
                f,
                "requested quantity exceeds availability ({available} available, {in_cart} already selected)"
            ),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CartState {
    cart: Vec<CartLine>,
    wishlist: Vec<WishlistLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of an item. Out-of-stock items merge into the wishlist
    /// uncapped; in-stock items merge into the cart as long as the cumulative
    /// quantity stays within `available_quantity`. Adding the same item twice
    /// merges lines, never duplicates them.
    pub fn add(
        &mut self,
        item: &ItemSnapshot,
        quantity: i32,
    ) -> Result<Admission, AdmissionError> {
        if quantity <= 0 {
            return Err(AdmissionError::InvalidQuantity);
        }

        if item.available_quantity <= 0 {
            match self.wishlist.iter_mut().find(|l| l.item.id == item.id) {
                Some(line) => line.requested_quantity += quantity,
                None => self.wishlist.push(WishlistLine {
                    item: item.clone(),
                    requested_quantity: quantity,
                }),
            }
            return Ok(Admission::Wishlist);
        }

        let in_cart = self.item_quantity(item.id);
        if in_cart + quantity > item.available_quantity {
            return Err(AdmissionError::ExceedsAvailable {
                item_id: item.id,
                available: item.available_quantity,
                in_cart,
            });
        }

        match self.cart.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.requested_quantity += quantity,
            None => self.cart.push(CartLine {
                item: item.clone(),
                requested_quantity: quantity,
            }),
        }
        Ok(Admission::Cart)
    }

    /// Replace a cart line's quantity. Zero or negative removes the line;
    /// raising it past availability is rejected like an add.
    pub fn set_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<(), AdmissionError> {
        if quantity <= 0 {
            self.remove(item_id);
            return Ok(());
        }
        let Some(line) = self.cart.iter_mut().find(|l| l.item.id == item_id) else {
            return Ok(());
        };
        if quantity > line.item.available_quantity {
            return Err(AdmissionError::ExceedsAvailable {
                item_id,
                available: line.item.available_quantity,
                in_cart: line.requested_quantity,
            });
        }
        line.requested_quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, item_id: Uuid) {
        self.cart.retain(|l| l.item.id != item_id);
        self.wishlist.retain(|l| l.item.id != item_id);
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.wishlist.clear();
    }

    /// Quantity of an item currently in the cart (not the wishlist).
    pub fn item_quantity(&self, item_id: Uuid) -> i32 {
        self.cart
            .iter()
            .find(|l| l.item.id == item_id)
            .map(|l| l.requested_quantity)
            .unwrap_or(0)
    }

    pub fn total_quantity(&self) -> i32 {
        self.cart.iter().map(|l| l.requested_quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty() && self.wishlist.is_empty()
    }

    pub fn cart_lines(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn wishlist_lines(&self) -> &[WishlistLine] {
        &self.wishlist
    }
}
