use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{DependOnOrderItemQuery, OrderItemQuery};
use kernel::interface::update::{DependOnOrderItemModifier, OrderItemModifier};
use kernel::prelude::entity::{BookId, OrderItem, OrderItemId, OrderItemQuantity, UserId};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresOrderItemRepository;

#[async_trait::async_trait]
impl OrderItemQuery for PostgresOrderItemRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &OrderItemId,
    ) -> error_stack::Result<Option<OrderItem>, KernelError> {
        PgOrderItemInternal::find_by_id(con, id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        PgOrderItemInternal::find_by_user_id(con, user_id).await
    }
}

#[async_trait::async_trait]
impl OrderItemModifier for PostgresOrderItemRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderItemInternal::create(con, order_item).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderItemInternal::update(con, order_item).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        order_item_id: &OrderItemId,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderItemInternal::delete(con, order_item_id).await
    }
}

impl DependOnOrderItemQuery for PostgresDatabase {
    type OrderItemQuery = PostgresOrderItemRepository;
    fn order_item_query(&self) -> &Self::OrderItemQuery {
        &PostgresOrderItemRepository
    }
}

impl DependOnOrderItemModifier for PostgresDatabase {
    type OrderItemModifier = PostgresOrderItemRepository;
    fn order_item_modifier(&self) -> &Self::OrderItemModifier {
        &PostgresOrderItemRepository
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(value: OrderItemRow) -> Self {
        OrderItem::new(
            OrderItemId::new(value.id),
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            OrderItemQuantity::new(value.quantity),
        )
    }
}

pub(in crate::database) struct PgOrderItemInternal;

impl PgOrderItemInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderItemId,
    ) -> error_stack::Result<Option<OrderItem>, KernelError> {
        let row = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, quantity
            FROM order_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(OrderItem::from))
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT o.id, o.user_id, o.book_id, o.quantity
            FROM order_items o
            JOIN books b ON b.id = o.book_id
            WHERE o.user_id = $1
            ORDER BY b.title DESC, o.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO order_items (id, user_id, book_id, quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order_item.id().as_ref())
        .bind(order_item.user_id().as_ref())
        .bind(order_item.book_id().as_ref())
        .bind(order_item.quantity().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE order_items
            SET quantity = $2
            WHERE id = $1
            "#,
        )
        .bind(order_item.id().as_ref())
        .bind(order_item.quantity().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        order_item_id: &OrderItemId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM order_items
            WHERE id = $1
            "#,
        )
        .bind(order_item_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderItemQuery;
    use kernel::interface::update::{BookModifier, OrderItemModifier};
    use kernel::prelude::entity::{BookId, OrderItem, OrderItemId, OrderItemQuantity, UserId};
    use kernel::KernelError;

    use crate::database::postgres::book::test::sample_book;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresOrderItemRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(10);
        PostgresBookRepository.create(&mut con, &book).await?;

        let user_id = UserId::new(Uuid::new_v4());
        let item = OrderItem::new(
            OrderItemId::new(Uuid::new_v4()),
            user_id.clone(),
            book.id().clone(),
            OrderItemQuantity::new(2),
        );
        PostgresOrderItemRepository.create(&mut con, &item).await?;
        let found = PostgresOrderItemRepository
            .find_by_user_id(&mut con, &user_id)
            .await?;
        assert_eq!(found, vec![item.clone()]);

        let item = item.reconstruct(|i| i.quantity = OrderItemQuantity::new(5));
        PostgresOrderItemRepository.update(&mut con, &item).await?;
        let found = PostgresOrderItemRepository
            .find_by_id(&mut con, item.id())
            .await?;
        assert_eq!(found, Some(item.clone()));

        PostgresOrderItemRepository
            .delete(&mut con, item.id())
            .await?;
        let found = PostgresOrderItemRepository
            .find_by_id(&mut con, item.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn zero_quantity_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(10);
        PostgresBookRepository.create(&mut con, &book).await?;
        let item = OrderItem::new(
            OrderItemId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            book.id().clone(),
            OrderItemQuantity::new(0),
        );
        let result = PostgresOrderItemRepository.create(&mut con, &item).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn cascades_with_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(10);
        PostgresBookRepository.create(&mut con, &book).await?;
        let item = OrderItem::new(
            OrderItemId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            BookId::new(*book.id().as_ref()),
            OrderItemQuantity::new(1),
        );
        PostgresOrderItemRepository.create(&mut con, &item).await?;

        PostgresBookRepository.delete(&mut con, book.id()).await?;
        let found = PostgresOrderItemRepository
            .find_by_id(&mut con, item.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }
}
