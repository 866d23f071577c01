use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{LikedItem, LikedItemId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LikedItemQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &LikedItemId,
    ) -> error_stack::Result<Option<LikedItem>, KernelError>;

    /// Ordered by book title, descending.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LikedItem>, KernelError>;
}

pub trait DependOnLikedItemQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LikedItemQuery: LikedItemQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn liked_item_query(&self) -> &Self::LikedItemQuery;
}
