use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{OrderItem, OrderItemId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderItemModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Fails with [`KernelError::Conflict`] when the user already has a line for the book.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        order_item_id: &OrderItemId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnOrderItemModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderItemModifier: OrderItemModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_item_modifier(&self) -> &Self::OrderItemModifier;
}
