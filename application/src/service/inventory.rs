use error_stack::Report;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookAvailableQuantity, BookId, OrderItem};
use kernel::KernelError;

use crate::service::TransactionOf;

/// Moves stock between `Book.available_quantity` and cart lines by the line's quantity.
///
/// Must run in the same transaction as the cart line write it follows.
#[async_trait::async_trait]
pub trait InventoryAdjuster:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    /// Fails with [`KernelError::Validation`] when the book has fewer copies than requested.
    async fn reserve_inventory(
        &self,
        con: &mut TransactionOf<Self>,
        item: &OrderItem,
    ) -> error_stack::Result<BookAvailableQuantity, KernelError> {
        let book = self.lock_book(con, item.book_id()).await?;
        let remaining = book
            .available_quantity()
            .reserve(item.quantity())
            .map_err(|report| {
                tracing::warn!(
                    book_id = %book.id().as_ref(),
                    available = book.available_quantity().as_ref(),
                    requested = item.quantity().as_ref(),
                    "rejected reservation"
                );
                report
            })?;
        self.book_modifier()
            .update_available_quantity(con, book.id(), &remaining)
            .await?;
        tracing::debug!(
            book_id = %book.id().as_ref(),
            available = remaining.as_ref(),
            "reserved stock"
        );
        Ok(remaining)
    }

    async fn release_inventory(
        &self,
        con: &mut TransactionOf<Self>,
        item: &OrderItem,
    ) -> error_stack::Result<BookAvailableQuantity, KernelError> {
        let book = self.lock_book(con, item.book_id()).await?;
        let remaining = book.available_quantity().release(item.quantity())?;
        self.book_modifier()
            .update_available_quantity(con, book.id(), &remaining)
            .await?;
        tracing::debug!(
            book_id = %book.id().as_ref(),
            available = remaining.as_ref(),
            "released stock"
        );
        Ok(remaining)
    }

    async fn lock_book(
        &self,
        con: &mut TransactionOf<Self>,
        book_id: &BookId,
    ) -> error_stack::Result<Book, KernelError> {
        self.book_query()
            .find_by_id_for_update(con, book_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Internal).attach_printable(format!(
                    "book {} vanished while adjusting its stock",
                    book_id.as_ref()
                ))
            })
    }
}

impl<T> InventoryAdjuster for T where T: DependOnBookQuery + DependOnBookModifier {}
