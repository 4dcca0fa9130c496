//! Order composition
//!
//! Turns a cart or selection snapshot plus customer contact details into a
//! structured [`OrderDraft`] and a human-readable WhatsApp message. Both are
//! pure functions of their inputs: the same snapshot always yields the same
//! payload and byte-identical message text.

use thiserror::Error;

use crate::{
    cart::Cart,
    money::{format_brl, round_amount},
    orders::{OrderDraft, OrderItem, OrderStatus},
    profile::CustomerProfile,
    selection::SelectionSet,
};

/// Literal used in place of an address for guest checkouts.
pub const GUEST_ADDRESS: &str = "Endereço a combinar";

/// Errors from order composition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// Composition was attempted over an empty cart or selection.
    #[error("cart is empty")]
    EmptyCart,
}

/// Compose an order draft from the quantity-aware cart.
///
/// # Errors
///
/// Returns [`ComposeError::EmptyCart`] if the cart has no lines.
pub fn compose_from_cart(
    cart: &Cart,
    customer: Option<&CustomerProfile>,
) -> Result<OrderDraft, ComposeError> {
    if cart.is_empty() {
        return Err(ComposeError::EmptyCart);
    }

    let items = cart.items().iter().map(OrderItem::from).collect();

    Ok(draft(items, customer))
}

/// Compose an order draft from the selection set; every selected product
/// becomes a quantity-1 line.
///
/// # Errors
///
/// Returns [`ComposeError::EmptyCart`] if nothing is selected.
pub fn compose_from_selection(
    selection: &SelectionSet,
    customer: Option<&CustomerProfile>,
) -> Result<OrderDraft, ComposeError> {
    if selection.is_empty() {
        return Err(ComposeError::EmptyCart);
    }

    let items = selection
        .products()
        .iter()
        .map(|product| OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price: product.price,
            quantity: 1,
            image_url: product.image.clone(),
            category: product.category.clone(),
            size: product.size.clone(),
            brand: product.brand.clone(),
        })
        .collect();

    Ok(draft(items, customer))
}

fn draft(items: Vec<OrderItem>, customer: Option<&CustomerProfile>) -> OrderDraft {
    let total = round_amount(items.iter().map(OrderItem::line_total).sum());

    let notes = customer
        .and_then(|c| c.notes.as_deref())
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(ToString::to_string);

    OrderDraft {
        customer: customer.cloned(),
        items,
        total,
        status: OrderStatus::Pending,
        notes,
    }
}

/// Render the order message for the external messaging handoff.
///
/// The template is fixed: header, customer block (omitted for guests),
/// itemized lines, total, delivery address (guests get the
/// [`GUEST_ADDRESS`] literal), optional notes, closing call-to-action.
pub fn order_message(draft: &OrderDraft) -> String {
    let mut message = String::from("🛒 *PEDIDO DO CARRINHO*\n\n");

    if let Some(customer) = &draft.customer {
        message.push_str(&format!("*Cliente:* {}\n", customer.name));
        message.push_str(&format!("*Telefone:* {}\n", customer.phone));

        if let Some(email) = customer.email.as_deref().filter(|e| !e.trim().is_empty()) {
            message.push_str(&format!("*Email:* {email}\n"));
        }
    }

    message.push_str("*Itens do Pedido:*\n");

    for item in &draft.items {
        let size = item
            .size
            .as_deref()
            .map(|size| format!("({size})"))
            .unwrap_or_default();

        message.push_str(&format!(
            "• {} {} - Qtd: {} - {}\n",
            item.product_name,
            size,
            item.quantity,
            format_brl(item.line_total()),
        ));
    }

    message.push_str(&format!("\n*Total: {}*\n\n", format_brl(draft.total)));

    let address = draft
        .customer
        .as_ref()
        .map_or(GUEST_ADDRESS, |customer| customer.address.as_str());

    message.push_str(&format!("*Endereço de entrega:* {address}\n"));

    if let Some(notes) = &draft.notes {
        message.push_str(&format!("\n*Observações:* {notes}\n"));
    }

    message.push_str("\n📱 *Pedido realizado pelo site*\nGostaria de confirmar este pedido! 🙏");

    message
}
