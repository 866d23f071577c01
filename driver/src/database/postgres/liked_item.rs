use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{DependOnLikedItemQuery, LikedItemQuery};
use kernel::interface::update::{DependOnLikedItemModifier, LikedItemModifier};
use kernel::prelude::entity::{BookId, LikedItem, LikedItemId, UserId};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresLikedItemRepository;

#[async_trait::async_trait]
impl LikedItemQuery for PostgresLikedItemRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &LikedItemId,
    ) -> error_stack::Result<Option<LikedItem>, KernelError> {
        PgLikedItemInternal::find_by_id(con, id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LikedItem>, KernelError> {
        PgLikedItemInternal::find_by_user_id(con, user_id).await
    }
}

#[async_trait::async_trait]
impl LikedItemModifier for PostgresLikedItemRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        liked_item: &LikedItem,
    ) -> error_stack::Result<(), KernelError> {
        PgLikedItemInternal::create(con, liked_item).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        liked_item_id: &LikedItemId,
    ) -> error_stack::Result<(), KernelError> {
        PgLikedItemInternal::delete(con, liked_item_id).await
    }
}

impl DependOnLikedItemQuery for PostgresDatabase {
    type LikedItemQuery = PostgresLikedItemRepository;
    fn liked_item_query(&self) -> &Self::LikedItemQuery {
        &PostgresLikedItemRepository
    }
}

impl DependOnLikedItemModifier for PostgresDatabase {
    type LikedItemModifier = PostgresLikedItemRepository;
    fn liked_item_modifier(&self) -> &Self::LikedItemModifier {
        &PostgresLikedItemRepository
    }
}

#[derive(sqlx::FromRow)]
struct LikedItemRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
}

impl From<LikedItemRow> for LikedItem {
    fn from(value: LikedItemRow) -> Self {
        LikedItem::new(
            LikedItemId::new(value.id),
            UserId::new(value.user_id),
            BookId::new(value.book_id),
        )
    }
}

pub(in crate::database) struct PgLikedItemInternal;

impl PgLikedItemInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &LikedItemId,
    ) -> error_stack::Result<Option<LikedItem>, KernelError> {
        let row = sqlx::query_as::<_, LikedItemRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id
            FROM liked_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(LikedItem::from))
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LikedItem>, KernelError> {
        let rows = sqlx::query_as::<_, LikedItemRow>(
            // language=postgresql
            r#"
            SELECT l.id, l.user_id, l.book_id
            FROM liked_items l
            JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1
            ORDER BY b.title DESC, l.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(LikedItem::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        liked_item: &LikedItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO liked_items (id, user_id, book_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(liked_item.id().as_ref())
        .bind(liked_item.user_id().as_ref())
        .bind(liked_item.book_id().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        liked_item_id: &LikedItemId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM liked_items
            WHERE id = $1
            "#,
        )
        .bind(liked_item_id.as_ref())
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
    use kernel::interface::query::LikedItemQuery;
    use kernel::interface::update::{BookModifier, LikedItemModifier};
    use kernel::prelude::entity::{LikedItem, LikedItemId, UserId};
    use kernel::KernelError;

    use crate::database::postgres::book::test::sample_book;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresLikedItemRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn like_and_unlike() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        let user_id = UserId::new(Uuid::new_v4());
        let liked = LikedItem::new(
            LikedItemId::new(Uuid::new_v4()),
            user_id.clone(),
            book.id().clone(),
        );
        PostgresLikedItemRepository.create(&mut con, &liked).await?;
        let found = PostgresLikedItemRepository
            .find_by_user_id(&mut con, &user_id)
            .await?;
        assert_eq!(found, vec![liked.clone()]);

        PostgresLikedItemRepository
            .delete(&mut con, liked.id())
            .await?;
        let found = PostgresLikedItemRepository
            .find_by_id(&mut con, liked.id())
            .await?;
        assert!(found.is_none());

        PostgresLikedItemRepository.create(&mut con, &liked).await?;
        let twin = LikedItem::new(
            LikedItemId::new(Uuid::new_v4()),
            user_id.clone(),
            book.id().clone(),
        );
        // a failed statement aborts the transaction, so this stays last
        let result = PostgresLikedItemRepository.create(&mut con, &twin).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }
}
