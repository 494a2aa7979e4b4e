use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductInput};
use crate::domain::user::{NewUser, User};
use crate::schema::{order_lines, orders, products, users};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub promo_price: Option<BigDecimal>,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    pub out_of_stock: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            promo_price: row.promo_price,
            reduction: row.reduction,
            image_url: row.image_url,
            animal: row.animal,
            product_type: row.product_type,
            subtype: row.subtype,
            brand: row.brand,
            stock: row.stock,
            out_of_stock: row.out_of_stock,
            featured: row.featured,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub promo_price: Option<BigDecimal>,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    pub out_of_stock: bool,
    pub featured: bool,
}

impl NewProductRow {
    pub fn from_input(id: Uuid, input: ProductInput) -> Self {
        NewProductRow {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            promo_price: input.promo_price,
            reduction: input.reduction,
            image_url: input.image_url,
            animal: input.animal,
            product_type: input.product_type,
            subtype: input.subtype,
            brand: input.brand,
            stock: input.stock,
            out_of_stock: input.out_of_stock,
            featured: input.featured,
        }
    }
}

/// Full-row replacement; a `None` really does clear the nullable column.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub promo_price: Option<BigDecimal>,
    pub reduction: Option<i32>,
    pub image_url: Option<String>,
    pub animal: String,
    pub product_type: String,
    pub subtype: Option<String>,
    pub brand: String,
    pub stock: i32,
    pub out_of_stock: bool,
    pub featured: bool,
}

impl From<ProductInput> for ProductChanges {
    fn from(input: ProductInput) -> Self {
        ProductChanges {
            name: input.name,
            description: input.description,
            price: input.price,
            promo_price: input.promo_price,
            reduction: input.reduction,
            image_url: input.image_url,
            animal: input.animal,
            product_type: input.product_type,
            subtype: input.subtype,
            brand: input.brand,
            stock: input.stock,
            out_of_stock: input.out_of_stock,
            featured: input.featured,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub total_price: BigDecimal,
    pub status: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub total_price: BigDecimal,
    pub status: String,
    pub user_id: Uuid,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUserRow {
    pub fn from_input(id: Uuid, input: NewUser) -> Self {
        NewUserRow {
            id,
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
        }
    }
}
