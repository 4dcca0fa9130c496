//! Checkout orchestration.
//!
//! Drives a cart or selection snapshot through validation, composition,
//! and either order persistence or the messaging handoff. The source cart
//! is cleared only after the submission path has fully succeeded; any
//! failure leaves it exactly as the customer built it, ready for a retry.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use vitrine::{
    cart::Cart,
    message::{ComposeError, compose_from_cart, compose_from_selection, order_message},
    profile::CustomerProfile,
    selection::SelectionSet,
};

use crate::{
    documents::DocumentId,
    handoff::{HandoffError, MessagingHandoff},
    orders::{OrdersService, OrdersServiceError},
    storage::ProfileStore,
    subscription::Subscription,
};

/// Observable checkout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// No submission in flight.
    Idle,
    /// Checking the cart and customer details.
    Validating,
    /// Building the order payload and message.
    Composing,
    /// Writing the order to the document store.
    Persisting,
    /// Waiting on the messaging channel to accept the message.
    HandoffPending,
    /// The last submission succeeded.
    Completed,
    /// The last submission failed; the cart is untouched.
    Failed,
}

/// Errors from checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Submission was attempted over an empty cart or selection.
    #[error("cart is empty")]
    EmptyCart,

    /// A required customer field is blank.
    #[error("missing required field: {0}")]
    Validation(&'static str),

    #[error("order could not be persisted")]
    Persistence(#[from] OrdersServiceError),

    #[error("order message could not be handed off")]
    Handoff(#[from] HandoffError),

    /// Another submission is already in flight.
    #[error("a checkout is already in progress")]
    Busy,
}

impl From<ComposeError> for CheckoutError {
    fn from(error: ComposeError) -> Self {
        match error {
            ComposeError::EmptyCart => Self::EmptyCart,
        }
    }
}

/// Orchestrates checkout submissions.
pub struct CheckoutOrchestrator {
    orders: OrdersService,
    handoff: Arc<dyn MessagingHandoff>,
    profiles: Option<ProfileStore>,
    state: watch::Sender<CheckoutState>,
    // Keeps the channel open; `watch::Sender::send` drops the value when
    // no receiver exists.
    _state_rx: watch::Receiver<CheckoutState>,
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new(
        orders: OrdersService,
        handoff: Arc<dyn MessagingHandoff>,
        profiles: Option<ProfileStore>,
    ) -> Self {
        let (state, _state_rx) = watch::channel(CheckoutState::Idle);

        Self {
            orders,
            handoff,
            profiles,
            state,
            _state_rx,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> CheckoutState {
        *self.state.borrow()
    }

    /// Watch lifecycle transitions.
    pub fn watch_state(&self) -> Subscription<CheckoutState> {
        Subscription::new(self.state.subscribe())
    }

    /// Persist the cart as a site order. Requires full customer details;
    /// the messaging channel is not involved.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Busy`] if a submission is in flight, a
    /// validation error, or a persistence error. On any error the cart
    /// keeps its lines.
    pub async fn submit_site_order(
        &self,
        cart: &mut Cart,
        customer: &CustomerProfile,
    ) -> Result<DocumentId, CheckoutError> {
        self.begin()?;

        let result = self.site_order(cart, customer).await;
        self.settle(&result);

        result
    }

    /// Hand the cart to the messaging channel as a prefilled order
    /// message. Guests are allowed; with no customer the message carries
    /// the placeholder delivery address.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Busy`] if a submission is in flight, a
    /// validation error, or a handoff error. On any error the cart keeps
    /// its lines.
    pub async fn submit_whatsapp_order(
        &self,
        cart: &mut Cart,
        customer: Option<&CustomerProfile>,
    ) -> Result<(), CheckoutError> {
        self.begin()?;

        let result = self.whatsapp_order(cart, customer).await;
        self.settle(&result);

        result
    }

    /// Hand the home-page selection to the messaging channel; every
    /// selected product becomes a quantity-1 line.
    ///
    /// # Errors
    ///
    /// Same contract as [`CheckoutOrchestrator::submit_whatsapp_order`],
    /// with the selection in place of the cart.
    pub async fn submit_selection_order(
        &self,
        selection: &mut SelectionSet,
        customer: Option<&CustomerProfile>,
    ) -> Result<(), CheckoutError> {
        self.begin()?;

        let result = self.selection_order(selection, customer).await;
        self.settle(&result);

        result
    }

    async fn site_order(
        &self,
        cart: &mut Cart,
        customer: &CustomerProfile,
    ) -> Result<DocumentId, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if let Some(field) = customer.missing_required() {
            return Err(CheckoutError::Validation(field));
        }

        self.transition(CheckoutState::Composing);
        let draft = compose_from_cart(cart, Some(customer))?;

        self.transition(CheckoutState::Persisting);
        let id = self.orders.place_order(&draft).await?;

        self.remember_customer(Some(customer));
        cart.clear();

        tracing::info!(order = %id, "site order submitted");

        Ok(id)
    }

    async fn whatsapp_order(
        &self,
        cart: &mut Cart,
        customer: Option<&CustomerProfile>,
    ) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.validate_customer(customer)?;

        self.transition(CheckoutState::Composing);
        let draft = compose_from_cart(cart, customer)?;
        let message = order_message(&draft);

        self.transition(CheckoutState::HandoffPending);
        self.handoff.open(&message)?;

        self.remember_customer(customer);
        cart.clear();

        Ok(())
    }

    async fn selection_order(
        &self,
        selection: &mut SelectionSet,
        customer: Option<&CustomerProfile>,
    ) -> Result<(), CheckoutError> {
        if selection.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.validate_customer(customer)?;

        self.transition(CheckoutState::Composing);
        let draft = compose_from_selection(selection, customer)?;
        let message = order_message(&draft);

        self.transition(CheckoutState::HandoffPending);
        self.handoff.open(&message)?;

        self.remember_customer(customer);
        selection.clear();

        Ok(())
    }

    /// A customer is optional on messaging paths, but one that is present
    /// must be complete.
    fn validate_customer(&self, customer: Option<&CustomerProfile>) -> Result<(), CheckoutError> {
        if let Some(field) = customer.and_then(CustomerProfile::missing_required) {
            return Err(CheckoutError::Validation(field));
        }

        Ok(())
    }

    fn begin(&self) -> Result<(), CheckoutError> {
        let state = *self.state.borrow();

        if matches!(
            state,
            CheckoutState::Validating
                | CheckoutState::Composing
                | CheckoutState::Persisting
                | CheckoutState::HandoffPending
        ) {
            return Err(CheckoutError::Busy);
        }

        self.transition(CheckoutState::Validating);

        Ok(())
    }

    fn settle<T>(&self, result: &Result<T, CheckoutError>) {
        let state = match result {
            Ok(_) => CheckoutState::Completed,
            Err(error) => {
                tracing::warn!(%error, "checkout failed");
                CheckoutState::Failed
            }
        };

        self.transition(state);
    }

    fn transition(&self, state: CheckoutState) {
        _ = self.state.send(state);
    }

    fn remember_customer(&self, customer: Option<&CustomerProfile>) {
        let (Some(store), Some(customer)) = (&self.profiles, customer) else {
            return;
        };

        // Saving the profile is a convenience, never a reason to fail a
        // submitted order.
        if let Err(error) = store.save_profile(customer) {
            tracing::warn!(%error, "could not save customer profile");
        }
    }
}
