use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CreateOrderRequest, OrderItemResponse, OrderList, OrderResponse, UpdateOrderStatusRequest,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        order_status_changes::ActiveModel as StatusChangeActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::Entity as Products,
        restaurant_tables::Entity as RestaurantTables,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{OrderStatus, Role},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Price of one order line: unit price times quantity, rounded to two
/// decimal places, midpoint away from zero.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    (unit_price * Decimal::from(quantity))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of line totals over (unit price, quantity) pairs.
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum()
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    if !matches!(user.role, Role::Customer | Role::Admin) {
        return Err(AppError::Forbidden);
    }
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".into()));
    }
    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "quantity must be positive (product {})",
                item.product_id
            )));
        }
    }

    // Customers are always attributed as the order's customer; a mismatching
    // customer_id in the payload is rejected rather than trusted.
    let customer_id = match user.role {
        Role::Customer => {
            if payload.customer_id.is_some_and(|id| id != user.user_id) {
                return Err(AppError::Forbidden);
            }
            Some(user.user_id)
        }
        _ => payload.customer_id,
    };

    let txn = state.orm.begin().await?;

    if let Some(id) = customer_id {
        Users::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer not found: {id}")))?;
    }
    if let Some(id) = payload.table_id {
        RestaurantTables::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Table not found: {id}")))?;
    }

    let mut lines: Vec<(Uuid, Decimal, i32)> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = Products::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Product not found: {}", item.product_id))
            })?;
        // Snapshot the current unit price; later catalog changes must not
        // affect this order.
        lines.push((product.id, product.price, item.quantity));
    }

    let total_price = order_total(lines.iter().map(|(_, price, qty)| (*price, *qty)));

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        customer_id: Set(customer_id),
        table_id: Set(payload.table_id),
        total_price: Set(total_price),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (product_id, price, quantity) in &lines {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(*product_id),
            quantity: Set(*quantity),
            price: Set(*price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    // The initial PENDING state is recorded explicitly, not just held in
    // the status column.
    StatusChangeActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let response = assemble_order(&txn, order).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "total_price": total_price })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    tracing::info!(order_id = %order_id, total = %total_price, "order created");

    Ok(ApiResponse::success(
        "Order created",
        response,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {id}")))?;

    // Customers may only read their own orders; walk-in orders have no
    // owner and stay staff-only.
    if user.role == Role::Customer && order.customer_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }

    let response = assemble_order(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", response, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.normalize_pagination();

    let mut condition = Condition::all();
    if let Some(table_id) = query.table_id {
        condition = condition.add(OrderCol::TableId.eq(table_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        items.push(assemble_order(&state.orm, order).await?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;

    // Row lock so two concurrent updates serialize; the current status is
    // re-read inside the same transaction that applies the change.
    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {id}")))?;

    let current = parse_status(&order.status)?;
    let new_status = payload.status;
    if !current.can_transition_to(new_status) {
        return Err(AppError::InvalidTransition {
            from: current,
            to: new_status,
        });
    }

    let mut active: OrderActive = order.into();
    active.status = Set(new_status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    StatusChangeActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        status: Set(new_status.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let response = assemble_order(&txn, order).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "status": new_status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    tracing::info!(order_id = %id, from = %current, to = %new_status, "order status updated");

    Ok(ApiResponse::success(
        "Order updated",
        response,
        Some(Meta::empty()),
    ))
}

fn parse_status(s: &str) -> AppResult<OrderStatus> {
    OrderStatus::parse(s)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order status in store: {s}")))
}

/// Resolve customer name, table number and product names into the public
/// order view. Internal-only columns never leave this module.
async fn assemble_order<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderResponse> {
    let customer_name = match order.customer_id {
        Some(id) => Users::find_by_id(id).one(conn).await?.map(|u| u.name),
        None => None,
    };

    let table_number = match order.table_id {
        Some(id) => RestaurantTables::find_by_id(id)
            .one(conn)
            .await?
            .map(|t| t.number),
        None => None,
    };

    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .find_also_related(Products)
        .all(conn)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (item, product) in rows {
        let product = product.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("order item {} has no product", item.id))
        })?;
        items.push(OrderItemResponse {
            id: item.id,
            product_id: item.product_id,
            product_name: product.name,
            quantity: item.quantity,
            price: item.price,
        });
    }

    Ok(OrderResponse {
        id: order.id,
        customer_id: order.customer_id,
        customer_name,
        table_id: order.table_id,
        table_number,
        total_price: order.total_price,
        status: parse_status(&order.status)?,
        created_at: order.created_at.with_timezone(&Utc),
        updated_at: order.updated_at.with_timezone(&Utc),
        items,
    })
}
