//! Order creation and history.
//!
//! ## Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order(ctx, request)                                             │
//! │                                                                         │
//! │  1. items empty?                         → EmptyOrder                  │
//! │  2. begin transaction                                                  │
//! │  3. insert header (reference, tracking number, totals = 0)             │
//! │  4. per line: price (cache → tx)  → BookNotFound if unknown            │
//! │               insert item, add price × quantity to totals              │
//! │  5. update totals                                                       │
//! │  6. commit                 any error in 3..6 → rollback, nothing saved │
//! │  7. confirmation email (spawned, not awaited)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::auth::CustomerContext;
use crate::cache::PriceCache;
use crate::notification::{dispatch, order_confirmation, Notifier};
use shelf_core::reference::{customer_reference, tracking_number};
use shelf_core::{
    CoreError, CreateOrderRequest, Money, NewItem, NewOrder, OrderItemView, OrderLine,
    OrderReceipt, OrderTotals, OrderView,
};
use shelf_db::{Database, DbError, OrderTransaction, TransactionProvider};

/// Places orders and reads them back.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
    transactions: Arc<dyn TransactionProvider>,
    prices: Arc<PriceCache>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl OrderService {
    pub fn new(
        db: Database,
        transactions: Arc<dyn TransactionProvider>,
        prices: Arc<PriceCache>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        OrderService {
            db,
            transactions,
            prices,
            notifier,
        }
    }

    /// Persists an order and its items atomically.
    ///
    /// Input must already have passed `validate_order_request`; the empty
    /// check is repeated here because an order without items must never
    /// reach the database.
    pub async fn create_order(
        &self,
        ctx: &CustomerContext,
        req: CreateOrderRequest,
    ) -> ServiceResult<OrderReceipt> {
        if req.items.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }

        let header = build_header(ctx, &req, Utc::now());

        let mut tx = self
            .transactions
            .begin()
            .await
            .map_err(ServiceError::storage("starting transaction"))?;

        let (order_id, totals) = match self.write_order(tx.as_mut(), &header, &req.items).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        if let Err(e) = tx.commit().await {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback after failed commit failed");
            }
            return Err(ServiceError::Storage {
                context: "committing order",
                source: e,
            });
        }

        let receipt = OrderReceipt {
            order_id,
            customer_reference: header.customer_reference,
            tracking_number: header.tracking_number,
            order_date: header.order_date.to_rfc3339(),
        };

        info!(
            order_id,
            customer_id = ctx.id,
            total_item = totals.total_item,
            total_price = %totals.total_price,
            "Order created"
        );

        if let Some(notifier) = &self.notifier {
            dispatch(
                notifier.clone(),
                order_confirmation(&ctx.email, &receipt, &totals),
            );
        }

        Ok(receipt)
    }

    async fn write_order(
        &self,
        tx: &mut dyn OrderTransaction,
        header: &NewOrder,
        lines: &[OrderLine],
    ) -> ServiceResult<(i64, OrderTotals)> {
        let order_id = tx
            .insert_order(header)
            .await
            .map_err(ServiceError::storage("inserting order"))?;

        let created_at = truncate_to_minute(header.order_date);
        let mut totals = OrderTotals::default();

        for line in lines {
            let price = self.book_price(tx, line.book_id).await?;
            totals.add_line(price, line.quantity)?;

            tx.insert_item(&NewItem {
                order_id,
                book_id: line.book_id,
                quantity: line.quantity,
                created_at,
            })
            .await
            .map_err(ServiceError::storage("inserting order item"))?;
        }

        tx.update_totals(order_id, &totals)
            .await
            .map_err(ServiceError::storage("updating order totals"))?;

        Ok((order_id, totals))
    }

    /// Read-through price lookup; misses are loaded inside `tx`.
    async fn book_price(&self, tx: &mut dyn OrderTransaction, book_id: i64) -> ServiceResult<Money> {
        if let Some(price) = self.prices.get(&book_id).await {
            return Ok(price);
        }

        let price = tx
            .book_price(book_id)
            .await
            .map_err(ServiceError::storage("loading book price"))?
            .ok_or(CoreError::BookNotFound(book_id))?;

        self.prices.insert(book_id, price).await;
        Ok(price)
    }

    /// The customer's orders, newest first, each with its lines.
    pub async fn order_history(&self, ctx: &CustomerContext) -> ServiceResult<Vec<OrderView>> {
        let orders = self
            .db
            .orders()
            .history_for_customer(ctx.id)
            .await
            .map_err(ServiceError::storage("loading order history"))?;

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self
                .db
                .orders()
                .items_for_order(order.id)
                .await
                .map_err(ServiceError::storage("loading order items"))?;

            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                let book = self
                    .db
                    .books()
                    .get_any_by_id(item.book_id)
                    .await
                    .map_err(ServiceError::storage("loading book"))?
                    .ok_or_else(|| ServiceError::Storage {
                        context: "loading book",
                        source: DbError::not_found("Book", item.book_id),
                    })?;

                lines.push(OrderItemView {
                    book_id: book.id,
                    price: book.price().to_major_units(),
                    title: book.title,
                    author: book.author,
                    quantity: item.quantity,
                });
            }

            views.push(OrderView::from_order(order, lines));
        }

        Ok(views)
    }
}

/// Order header for `req`; receiver falls back to the username.
fn build_header(ctx: &CustomerContext, req: &CreateOrderRequest, order_date: DateTime<Utc>) -> NewOrder {
    let receiver_name = match req.receiver_name.trim() {
        "" => ctx.username.clone(),
        name => name.to_string(),
    };
    let shipper = req.shipper.trim().to_string();
    let tracking_number = tracking_number(&shipper, &mut rand::thread_rng());

    NewOrder {
        customer_id: ctx.id,
        customer_reference: customer_reference(order_date),
        receiver_name,
        address: req.address.trim().to_string(),
        city: req.city.trim().to_string(),
        district: req.district.trim().to_string(),
        postal_code: req.postal_code.trim().to_string(),
        shipper,
        tracking_number,
        order_date,
    }
}

fn truncate_to_minute(date: DateTime<Utc>) -> DateTime<Utc> {
    date.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date)
}
