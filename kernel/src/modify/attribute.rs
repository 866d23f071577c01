use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Attribute, AttributeId, AttributeKind, BookId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AttributeModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError>;

    /// Linking an already linked attribute is a no-op.
    async fn link_book(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError>;

    /// Removes every link of `kind` from the book.
    async fn unlink_book(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        kind: &AttributeKind,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnAttributeModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type AttributeModifier: AttributeModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn attribute_modifier(&self) -> &Self::AttributeModifier;
}
