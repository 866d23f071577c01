use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{DependOnReviewQuery, ReviewQuery};
use kernel::interface::update::{DependOnReviewModifier, ReviewModifier};
use kernel::prelude::entity::{
    BookId, CreatedAt, Review, ReviewComment, ReviewId, ReviewValue, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresReviewRepository;

#[async_trait::async_trait]
impl ReviewQuery for PostgresReviewRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        PgReviewInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        PgReviewInternal::find_all(con).await
    }

    async fn find_by_book_id(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        PgReviewInternal::find_by_book_id(con, book_id).await
    }

    async fn average_value_by_book_id(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Option<Decimal>, KernelError> {
        PgReviewInternal::average_value_by_book_id(con, book_id).await
    }
}

#[async_trait::async_trait]
impl ReviewModifier for PostgresReviewRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::create(con, review).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::update(con, review).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::delete(con, review_id).await
    }
}

impl DependOnReviewQuery for PostgresDatabase {
    type ReviewQuery = PostgresReviewRepository;
    fn review_query(&self) -> &Self::ReviewQuery {
        &PostgresReviewRepository
    }
}

impl DependOnReviewModifier for PostgresDatabase {
    type ReviewModifier = PostgresReviewRepository;
    fn review_modifier(&self) -> &Self::ReviewModifier {
        &PostgresReviewRepository
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    value: i32,
    comment: String,
    created_at: OffsetDateTime,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        Review::new(
            ReviewId::new(value.id),
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            ReviewValue::new(value.value),
            ReviewComment::new(value.comment),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgReviewInternal;

impl PgReviewInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, value, comment, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Review::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Review>, KernelError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            // language=postgresql
            r#"
            SELECT r.id, r.user_id, r.book_id, r.value, r.comment, r.created_at
            FROM reviews r
            JOIN books b ON b.id = r.book_id
            ORDER BY b.title DESC, r.created_at DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, value, comment, created_at
            FROM reviews
            WHERE book_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn average_value_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Option<Decimal>, KernelError> {
        // AVG over INTEGER yields NUMERIC, NULL for an empty set
        let average = sqlx::query_scalar::<_, Option<Decimal>>(
            // language=postgresql
            r#"
            SELECT AVG(value)
            FROM reviews
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(average)
    }

    async fn create(con: &mut PgConnection, review: &Review) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO reviews (id, user_id, book_id, value, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id().as_ref())
        .bind(review.user_id().as_ref())
        .bind(review.book_id().as_ref())
        .bind(review.value().as_ref())
        .bind(review.comment().as_ref())
        .bind(review.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, review: &Review) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE reviews
            SET value = $2, comment = $3
            WHERE id = $1
            "#,
        )
        .bind(review.id().as_ref())
        .bind(review.value().as_ref())
        .bind(review.comment().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(review_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::ReviewQuery;
    use kernel::interface::update::{BookModifier, ReviewModifier};
    use kernel::prelude::entity::{
        BookId, CreatedAt, Review, ReviewComment, ReviewId, ReviewValue, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::test::sample_book;
    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresReviewRepository,
    };

    fn review(book_id: &BookId, value: i32) -> Review {
        Review::new(
            ReviewId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            book_id.clone(),
            ReviewValue::new(value),
            ReviewComment::new("sample comment"),
            CreatedAt::now(),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        let review = review(book.id(), 4);
        PostgresReviewRepository.create(&mut con, &review).await?;
        let found = PostgresReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert_eq!(found, Some(review.clone()));

        let review = review.reconstruct(|r| r.value = ReviewValue::new(2));
        PostgresReviewRepository.update(&mut con, &review).await?;
        let found = PostgresReviewRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(found, vec![review.clone()]);

        PostgresReviewRepository.delete(&mut con, review.id()).await?;
        let found = PostgresReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn average() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        let average = PostgresReviewRepository
            .average_value_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(average, None);

        PostgresReviewRepository
            .create(&mut con, &review(book.id(), 4))
            .await?;
        PostgresReviewRepository
            .create(&mut con, &review(book.id(), 3))
            .await?;
        let average = PostgresReviewRepository
            .average_value_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(average.map(|a| a.normalize()), Some(Decimal::new(35, 1)));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn one_review_per_user_and_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;
        let first = review(book.id(), 4);
        PostgresReviewRepository.create(&mut con, &first).await?;

        let second = review(book.id(), 1).reconstruct(|r| r.user_id = first.user_id().clone());
        let result = PostgresReviewRepository.create(&mut con, &second).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn unknown_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let result = PostgresReviewRepository
            .create(&mut con, &review(&BookId::new(Uuid::new_v4()), 3))
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }
}
