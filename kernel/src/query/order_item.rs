use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{OrderItem, OrderItemId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderItemQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderItemId,
    ) -> error_stack::Result<Option<OrderItem>, KernelError>;

    /// Ordered by book title, descending.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError>;
}

pub trait DependOnOrderItemQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderItemQuery: OrderItemQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_item_query(&self) -> &Self::OrderItemQuery;
}
