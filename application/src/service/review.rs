use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnReviewQuery, ReviewQuery};
use kernel::interface::update::{DependOnReviewModifier, ReviewModifier};
use kernel::prelude::entity::{
    BookId, CreatedAt, Review, ReviewComment, ReviewId, ReviewValue, UserId,
};
use kernel::KernelError;

use crate::service::RatingAggregator;
use crate::transfer::{
    CreateReviewDto, DeleteReviewDto, GetBookReviewsDto, GetReviewDto, ReviewDto,
    UpdateReviewDto,
};

#[async_trait::async_trait]
pub trait GetReviewService: 'static + Sync + Send + DependOnReviewQuery + DependOnBookQuery {
    async fn get_review(
        &self,
        dto: GetReviewDto,
    ) -> error_stack::Result<Option<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let review = self
            .review_query()
            .find_by_id(&mut connection, &ReviewId::new(dto.id))
            .await?;
        Ok(review.map(ReviewDto::from))
    }

    async fn get_all_reviews(&self) -> error_stack::Result<Vec<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let reviews = self.review_query().find_all(&mut connection).await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    /// Fails with [`KernelError::NotFound`] for an unknown book rather than returning nothing.
    async fn get_reviews_by_book(
        &self,
        dto: GetBookReviewsDto,
    ) -> error_stack::Result<Vec<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let book_id = BookId::new(dto.book_id);
        if self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("book {} not found", dto.book_id)));
        }
        let reviews = self
            .review_query()
            .find_by_book_id(&mut connection, &book_id)
            .await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }
}

impl<T> GetReviewService for T where T: DependOnReviewQuery + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateReviewService: 'static + Sync + Send + DependOnReviewModifier + RatingAggregator {
    async fn create_review(&self, dto: CreateReviewDto) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let uuid = Uuid::new_v4();
        let review = Review::new(
            ReviewId::new(uuid),
            UserId::new(dto.user_id),
            BookId::new(dto.book_id),
            ReviewValue::try_new(dto.value)?,
            ReviewComment::new(dto.comment),
            CreatedAt::now(),
        );
        self.review_modifier()
            .create(&mut connection, &review)
            .await?;
        self.record_review(&mut connection, &review).await?;

        connection.commit().await?;
        Ok(uuid)
    }
}

impl<T> CreateReviewService for T where T: DependOnReviewModifier + RatingAggregator {}

#[async_trait::async_trait]
pub trait UpdateReviewService:
    'static + Sync + Send + DependOnReviewQuery + DependOnReviewModifier
{
    /// The book's rating is left as is, even when `value` changes.
    async fn update_review(&self, dto: UpdateReviewDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let mut review = self
            .review_query()
            .find_by_id(&mut connection, &ReviewId::new(dto.id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("review {} not found", dto.id))
            })?;
        let value = dto.value.map(ReviewValue::try_new).transpose()?;
        review.substitute(|review| {
            if let Some(value) = value {
                *review.value = value;
            }
            if let Some(comment) = dto.comment {
                *review.comment = ReviewComment::new(comment);
            }
        });
        self.review_modifier()
            .update(&mut connection, &review)
            .await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> UpdateReviewService for T where T: DependOnReviewQuery + DependOnReviewModifier {}

#[async_trait::async_trait]
pub trait DeleteReviewService:
    'static + Sync + Send + DependOnReviewQuery + DependOnReviewModifier + RatingAggregator
{
    async fn delete_review(&self, dto: DeleteReviewDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let review = self
            .review_query()
            .find_by_id(&mut connection, &ReviewId::new(dto.id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("review {} not found", dto.id))
            })?;
        self.review_modifier()
            .delete(&mut connection, review.id())
            .await?;
        self.remove_review(&mut connection, &review).await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> DeleteReviewService for T where
    T: DependOnReviewQuery + DependOnReviewModifier + RatingAggregator
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::{InMemoryDatabase, PostgresDatabase};
    use kernel::KernelError;

    use crate::service::book::test::create_dto;
    use crate::service::{
        CreateBookService, CreateReviewService, DeleteBookService, DeleteReviewService,
        GetBookService, GetReviewService, UpdateReviewService,
    };
    use crate::transfer::{
        CreateReviewDto, DeleteBookDto, DeleteReviewDto, GetBookDto, GetBookReviewsDto,
        GetReviewDto, UpdateReviewDto,
    };

    async fn rating(db: &InMemoryDatabase, book_id: Uuid) -> error_stack::Result<Decimal, KernelError> {
        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        Ok(book.rating)
    }

    fn review(book_id: Uuid, value: i32) -> CreateReviewDto {
        CreateReviewDto {
            user_id: Uuid::new_v4(),
            book_id,
            value,
            comment: String::new(),
        }
    }

    #[tokio::test]
    async fn rating_follows_reviews() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Rashomon", 1)).await?;
        assert_eq!(rating(&db, book_id).await?, Decimal::ZERO);

        let first = db.create_review(review(book_id, 4)).await?;
        assert_eq!(rating(&db, book_id).await?, Decimal::new(40, 1));

        let second = db.create_review(review(book_id, 3)).await?;
        assert_eq!(rating(&db, book_id).await?, Decimal::new(35, 1));

        db.delete_review(DeleteReviewDto { id: second }).await?;
        assert_eq!(rating(&db, book_id).await?, Decimal::new(40, 1));

        db.delete_review(DeleteReviewDto { id: first }).await?;
        assert_eq!(rating(&db, book_id).await?, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn rating_is_rounded() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Kappa", 1)).await?;
        for value in [5, 4, 2] {
            db.create_review(review(book_id, value)).await?;
        }
        assert_eq!(rating(&db, book_id).await?, Decimal::new(37, 1));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_review_keeps_rating() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("In a Grove", 1)).await?;
        let first = review(book_id, 5);
        let user_id = first.user_id;
        db.create_review(first).await?;

        let result = db
            .create_review(CreateReviewDto {
                user_id,
                book_id,
                value: 0,
                comment: "changed my mind".to_string(),
            })
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        assert_eq!(rating(&db, book_id).await?, Decimal::new(50, 1));
        let reviews = db
            .get_reviews_by_book(GetBookReviewsDto { book_id })
            .await?;
        assert_eq!(reviews.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_does_not_recompute() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("The Spider's Thread", 1)).await?;
        let id = db.create_review(review(book_id, 2)).await?;

        db.update_review(UpdateReviewDto {
            id,
            value: Some(5),
            comment: Some("better on a second read".to_string()),
        })
        .await?;

        let updated = db.get_review(GetReviewDto { id }).await?.unwrap();
        assert_eq!(updated.value, 5);
        assert_eq!(rating(&db, book_id).await?, Decimal::new(20, 1));
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_value() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Hell Screen", 1)).await?;
        let result = db.create_review(review(book_id, 6)).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let result = db.create_review(review(Uuid::new_v4(), 3)).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn reviews_go_with_the_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("The Nose", 1)).await?;
        let id = db.create_review(review(book_id, 3)).await?;

        db.delete_book(DeleteBookDto { id: book_id }).await?;
        assert!(db.get_review(GetReviewDto { id }).await?.is_none());
        assert!(db.get_all_reviews().await?.is_empty());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_reviews_on_one_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let book_id = db.create_book(create_dto("The Wayfarer", 1)).await?;

        let (first, second) = tokio::join!(
            db.create_review(review(book_id, 4)),
            db.create_review(review(book_id, 3)),
        );
        first?;
        second?;

        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        assert_eq!(book.rating, Decimal::new(35, 1));

        db.delete_book(DeleteBookDto { id: book_id }).await?;
        Ok(())
    }
}
