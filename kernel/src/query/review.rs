use rust_decimal::Decimal;

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, Review, ReviewId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReviewQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError>;

    /// Ordered by book title, descending.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Review>, KernelError>;

    /// Newest first.
    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError>;

    /// Unrounded mean of `value` over the book's reviews; `None` when there are none.
    async fn average_value_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Option<Decimal>, KernelError>;
}

pub trait DependOnReviewQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReviewQuery: ReviewQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn review_query(&self) -> &Self::ReviewQuery;
}
