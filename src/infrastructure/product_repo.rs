use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Animal, Product, ProductInput, ProductPage};
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::schema::products;

use super::models::{NewProductRow, ProductChanges, ProductRow};

/// Products live in Postgres; rows come back in creation order so the
/// "newest" sort stage (a plain reversal) behaves deterministically.
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_by_animal(&self, animal: Animal) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::animal.eq(animal.as_str()))
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_types(&self, animal: Animal) -> Result<Vec<String>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(products::table
            .filter(products::animal.eq(animal.as_str()))
            .select(products::product_type)
            .distinct()
            .order(products::product_type.asc())
            .load(&mut conn)?)
    }

    fn list_brands(&self, animal: Animal) -> Result<Vec<String>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(products::table
            .filter(products::animal.eq(animal.as_str()))
            .select(products::brand)
            .distinct()
            .order(products::brand.asc())
            .load(&mut conn)?)
    }

    fn list_featured(&self, animal: Animal, limit: i64) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::animal.eq(animal.as_str()))
            .filter(products::featured.eq(true))
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .limit(limit)
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn page_by_animal(
        &self,
        animal: Animal,
        page: i64,
        page_size: i64,
    ) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        let offset = (page - 1) * page_size;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = products::table
                .filter(products::animal.eq(animal.as_str()))
                .count()
                .get_result(conn)?;

            let rows = products::table
                .filter(products::animal.eq(animal.as_str()))
                .select(ProductRow::as_select())
                .order(products::created_at.asc())
                .limit(page_size)
                .offset(offset)
                .load(conn)?;

            Ok(ProductPage {
                items: rows.into_iter().map(Product::from).collect(),
                total,
                page,
                page_size,
                total_pages: (total + page_size - 1) / page_size,
            })
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn insert(&self, input: ProductInput) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProductRow::from_input(id, input))
            .execute(&mut conn)?;
        Ok(id)
    }

    fn update(&self, id: Uuid, input: ProductInput) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let affected = diesel::update(products::table.find(id))
            .set(&ProductChanges::from(input))
            .execute(&mut conn)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let affected = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
