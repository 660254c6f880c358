//! Payment order state machine and subscription granting.
//!
//! `pendiente → en_revision → {verificado | rechazado}`, with `expirado`
//! reachable from the two open states by the expiry sweep. Approval is the
//! only path that creates or extends subscriptions; rejection cancels them.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use gymhub_core::clock::Clock;
use gymhub_core::config::booking::BookingConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::traits::storage::ReceiptStorage;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_database::stores::{MemberStore, PaymentOrderStore, PlanStore, SubscriptionStore};
use gymhub_entity::payment::{PaymentOrder, PaymentOrderStatus};
use gymhub_entity::payment::model::CreatePaymentOrder;
use gymhub_entity::subscription::model::CreateSubscription;
use gymhub_entity::subscription::Subscription;

/// Drives payment orders through their lifecycle and grants subscriptions
/// on approval.
#[derive(Debug, Clone)]
pub struct PaymentOrderService {
    orders: Arc<dyn PaymentOrderStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    plans: Arc<dyn PlanStore>,
    members: Arc<dyn MemberStore>,
    receipts: Arc<dyn ReceiptStorage>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl PaymentOrderService {
    /// Creates a new payment order service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: Arc<dyn PaymentOrderStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        plans: Arc<dyn PlanStore>,
        members: Arc<dyn MemberStore>,
        receipts: Arc<dyn ReceiptStorage>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            orders,
            subscriptions,
            plans,
            members,
            receipts,
            clock,
            config,
        }
    }

    /// Opens a payment order for a member buying a plan. The amount is the
    /// plan's current price; the expiry deadline comes from config.
    pub async fn create_order(&self, member_id: Uuid, plan_id: Uuid) -> AppResult<PaymentOrder> {
        if !self.members.exists(member_id).await? {
            return Err(AppError::not_found(format!("Member {member_id} not found")));
        }
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| AppError::validation(format!("Unknown plan: {plan_id}")))?;

        let now = self.clock.now();
        let order = self
            .orders
            .insert(&CreatePaymentOrder {
                member_id,
                plan_id,
                amount_cents: plan.price_cents,
                expires_at: now + Duration::days(self.config.order_expiry_days),
            })
            .await?;

        info!(
            order_id = %order.id,
            member_id = %member_id,
            plan_id = %plan_id,
            amount_cents = order.amount_cents,
            "Created payment order"
        );
        Ok(order)
    }

    /// Stores a proof of payment and moves the order to `en_revision`.
    ///
    /// The file is written before the state flips so a failed upload never
    /// leaves an order in review without its receipt. Re-uploading while
    /// still in review replaces the recorded path.
    pub async fn attach_receipt(
        &self,
        order_id: Uuid,
        data: Bytes,
        filename: &str,
    ) -> AppResult<PaymentOrder> {
        let order = self.require_order(order_id).await?;
        if !order.status.can_attach_receipt() {
            return Err(Self::illegal_transition(&order, "attach a receipt to"));
        }

        let path = self
            .receipts
            .save(data, filename, &order.id.to_string())
            .await?;

        let updated = self
            .orders
            .attach_receipt(
                order.id,
                &path,
                &[PaymentOrderStatus::Pendiente, PaymentOrderStatus::EnRevision],
            )
            .await?;

        match updated {
            Some(order) => {
                info!(order_id = %order.id, receipt = %path, "Attached receipt");
                Ok(order)
            }
            None => Err(self.conflict_from_current(order_id, "attach a receipt to").await?),
        }
    }

    /// Approves an order: `verificado`, then create or monotonically extend
    /// the member's subscription for the plan.
    pub async fn approve(
        &self,
        order_id: Uuid,
        requested_days: Option<i64>,
    ) -> AppResult<(PaymentOrder, Subscription)> {
        let days = requested_days.unwrap_or(self.config.default_subscription_days);
        if days <= 0 {
            return Err(AppError::validation("Subscription days must be positive"));
        }

        let order = self.require_order(order_id).await?;
        if !order.status.can_approve() {
            return Err(Self::illegal_transition(&order, "approve"));
        }

        let now = self.clock.now();
        let order = match self
            .orders
            .transition(
                order.id,
                &[PaymentOrderStatus::Pendiente, PaymentOrderStatus::EnRevision],
                PaymentOrderStatus::Verificado,
                None,
                now,
            )
            .await?
        {
            Some(order) => order,
            None => return Err(self.conflict_from_current(order_id, "approve").await?),
        };

        let subscription = match self
            .subscriptions
            .find_latest_active(order.member_id, order.plan_id)
            .await?
        {
            Some(existing) => {
                let new_end = existing.extended_end(now, days);
                let extended = self.subscriptions.extend(existing.id, new_end).await?;
                info!(
                    subscription_id = %extended.id,
                    ends_at = %extended.ends_at,
                    "Extended subscription"
                );
                extended
            }
            None => {
                let created = self
                    .subscriptions
                    .insert(&CreateSubscription {
                        member_id: order.member_id,
                        plan_id: order.plan_id,
                        payment_order_id: Some(order.id),
                        starts_at: now,
                        ends_at: now + Duration::days(days),
                    })
                    .await?;
                info!(
                    subscription_id = %created.id,
                    ends_at = %created.ends_at,
                    "Created subscription"
                );
                created
            }
        };

        info!(order_id = %order.id, "Approved payment order");
        Ok((order, subscription))
    }

    /// Rejects an order and cancels (never deletes) any active subscription
    /// the member holds for the plan.
    pub async fn reject(&self, order_id: Uuid, notes: Option<String>) -> AppResult<PaymentOrder> {
        let order = self.require_order(order_id).await?;
        if !order.status.can_reject() {
            return Err(Self::illegal_transition(&order, "reject"));
        }

        let now = self.clock.now();
        let order = match self
            .orders
            .transition(
                order.id,
                &[
                    PaymentOrderStatus::Pendiente,
                    PaymentOrderStatus::EnRevision,
                    PaymentOrderStatus::Expirado,
                ],
                PaymentOrderStatus::Rechazado,
                notes.as_deref(),
                now,
            )
            .await?
        {
            Some(order) => order,
            None => return Err(self.conflict_from_current(order_id, "reject").await?),
        };

        let cancelled = self
            .subscriptions
            .cancel_for_member_plan(order.member_id, order.plan_id)
            .await?;

        info!(
            order_id = %order.id,
            cancelled_subscriptions = cancelled,
            "Rejected payment order"
        );
        Ok(order)
    }

    /// Marks every open order past its deadline `expirado`. Exposed as an
    /// admin operation; there is no internal scheduler.
    pub async fn expire_overdue(&self) -> AppResult<u64> {
        let expired = self.orders.expire_overdue(self.clock.now()).await?;
        if expired > 0 {
            info!(expired, "Expired overdue payment orders");
        }
        Ok(expired)
    }

    /// Fetches a single order.
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<PaymentOrder> {
        self.require_order(order_id).await
    }

    /// Lists a member's orders, newest first.
    pub async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        self.orders.list_for_member(member_id, page).await
    }

    /// Lists orders in one state, oldest first (review queue order).
    pub async fn list_by_status(
        &self,
        status: PaymentOrderStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        self.orders.list_by_status(status, page).await
    }

    /// Lists a member's subscriptions, newest first.
    pub async fn list_subscriptions_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Subscription>> {
        self.subscriptions.list_for_member(member_id, page).await
    }

    async fn require_order(&self, order_id: Uuid) -> AppResult<PaymentOrder> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment order {order_id} not found")))
    }

    fn illegal_transition(order: &PaymentOrder, verb: &str) -> AppError {
        AppError::conflict(format!(
            "Cannot {verb} payment order {} in state '{}'",
            order.id, order.status
        ))
    }

    /// The guard failed after the initial read: re-read for a precise
    /// Conflict describing the state the order is actually in.
    async fn conflict_from_current(&self, order_id: Uuid, verb: &str) -> AppResult<AppError> {
        let order = self.require_order(order_id).await?;
        Ok(Self::illegal_transition(&order, verb))
    }
}
