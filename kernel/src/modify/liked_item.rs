use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{LikedItem, LikedItemId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LikedItemModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        liked_item: &LikedItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        liked_item_id: &LikedItemId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLikedItemModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LikedItemModifier: LikedItemModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn liked_item_modifier(&self) -> &Self::LikedItemModifier;
}
