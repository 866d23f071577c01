use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Attribute, AttributeId, AttributeKind, AttributeName, BookId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AttributeQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        kind: &AttributeKind,
        id: &AttributeId,
    ) -> error_stack::Result<Option<Attribute>, KernelError>;

    async fn find_by_name(
        &self,
        con: &mut Self::Transaction,
        kind: &AttributeKind,
        name: &AttributeName,
    ) -> error_stack::Result<Option<Attribute>, KernelError>;

    /// Ordered by name.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        kind: &AttributeKind,
    ) -> error_stack::Result<Vec<Attribute>, KernelError>;

    /// Every attribute linked to the book, all kinds mixed, ordered by name.
    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Attribute>, KernelError>;
}

pub trait DependOnAttributeQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type AttributeQuery: AttributeQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn attribute_query(&self) -> &Self::AttributeQuery;
}
