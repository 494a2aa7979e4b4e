use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    OrderDraft, OrderLineInput, OrderLineView, OrderStatus, OrderView,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn view_of(order: OrderRow, lines: Vec<OrderLineRow>) -> Result<OrderView, DomainError> {
    let status = OrderStatus::parse(&order.status).ok_or_else(|| {
        DomainError::Internal(format!("order {} has unknown status '{}'", order.id, order.status))
    })?;
    Ok(OrderView {
        id: order.id,
        customer_name: order.customer_name,
        customer_email: order.customer_email,
        customer_phone: order.customer_phone,
        address: order.address,
        city: order.city,
        total_price: order.total_price,
        status,
        user_id: order.user_id,
        created_at: order.created_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    })
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: OrderDraft, lines: Vec<OrderLineInput>) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order, always born pending.
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_name: draft.customer_name,
                    customer_email: draft.customer_email,
                    customer_phone: draft.customer_phone,
                    address: draft.address,
                    city: draft.city,
                    total_price: draft.total_price,
                    status: OrderStatus::Pending.as_str().to_string(),
                    user_id: draft.user_id,
                })
                .execute(conn)?;

            // 2. Insert one line per cart line, price snapshot included.
            let new_lines: Vec<NewOrderLineRow> = lines
                .iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.clone(),
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = order_lines::table
            .filter(order_lines::order_id.eq(order.id))
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        Ok(Some(view_of(order, lines)?))
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        rows.into_iter().map(|o| view_of(o, Vec::new())).collect()
    }

    fn list_by_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        let lines = OrderLineRow::belonging_to(&rows)
            .select(OrderLineRow::as_select())
            .load(&mut conn)?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(lines)
            .map(|(order, lines)| view_of(order, lines))
            .collect()
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let affected = diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Lines first; the foreign key forbids orphaning them.
            diesel::delete(order_lines::table.filter(order_lines::order_id.eq(id)))
                .execute(conn)?;
            let affected = diesel::delete(orders::table.find(id)).execute(conn)?;
            if affected == 0 {
                return Err(DomainError::NotFound);
            }
            Ok(())
        })
    }
}
