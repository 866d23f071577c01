use error_stack::Report;

use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnReviewQuery, ReviewQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookId, BookRating, Review};
use kernel::KernelError;

use crate::service::TransactionOf;

/// Keeps `Book.rating` equal to the mean review value of the book, or zero without reviews.
///
/// Must run in the same transaction as the review write it follows.
#[async_trait::async_trait]
pub trait RatingAggregator:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier + DependOnReviewQuery
{
    async fn record_review(
        &self,
        con: &mut TransactionOf<Self>,
        review: &Review,
    ) -> error_stack::Result<BookRating, KernelError> {
        self.recompute_rating(con, review.book_id()).await
    }

    async fn remove_review(
        &self,
        con: &mut TransactionOf<Self>,
        review: &Review,
    ) -> error_stack::Result<BookRating, KernelError> {
        self.recompute_rating(con, review.book_id()).await
    }

    async fn recompute_rating(
        &self,
        con: &mut TransactionOf<Self>,
        book_id: &BookId,
    ) -> error_stack::Result<BookRating, KernelError> {
        // lock first so concurrent writers on the same book queue up here
        let book = self
            .book_query()
            .find_by_id_for_update(con, book_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Internal).attach_printable(format!(
                    "book {} vanished while aggregating its rating",
                    book_id.as_ref()
                ))
            })?;
        let mean = self
            .review_query()
            .average_value_by_book_id(con, book.id())
            .await?;
        let rating = BookRating::from_mean(mean);
        self.book_modifier()
            .update_rating(con, book.id(), &rating)
            .await?;
        tracing::debug!(
            book_id = %book.id().as_ref(),
            previous = %book.rating().as_ref(),
            rating = %rating.as_ref(),
            "recomputed book rating"
        );
        Ok(rating)
    }
}

impl<T> RatingAggregator for T where
    T: DependOnBookQuery + DependOnBookModifier + DependOnReviewQuery
{
}
