use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{
    Attribute, AttributeId, Book, BookId, LikedItem, LikedItemId, OrderItem, OrderItemId, Review,
    ReviewId,
};
use kernel::KernelError;

pub use self::{attribute::*, book::*, liked_item::*, order_item::*, review::*};

mod attribute;
mod book;
mod liked_item;
mod order_item;
mod review;

/// Process-local store with the same constraint behaviour as the postgres schema.
///
/// Transactions are fully serialized: [`DatabaseConnection::transact`] waits until the previous
/// transaction is committed or dropped, then works on a private copy of the store.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct MemoryStore {
    books: HashMap<BookId, Book>,
    attributes: HashMap<AttributeId, Attribute>,
    book_attributes: HashSet<(BookId, AttributeId)>,
    reviews: HashMap<ReviewId, Review>,
    order_items: HashMap<OrderItemId, OrderItem>,
    liked_items: HashMap<LikedItemId, LikedItem>,
}

impl MemoryStore {
    fn book_title(&self, book_id: &BookId) -> Option<&str> {
        self.books
            .get(book_id)
            .map(|book| book.title().as_ref().as_str())
    }

    fn ensure_book(&self, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        if self.books.contains_key(book_id) {
            Ok(())
        } else {
            Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("book {} does not exist", book_id.as_ref())))
        }
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = self.store.clone().lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryStore>,
    working: MemoryStore,
}

impl InMemoryTransaction {
    pub(in crate::database) fn store(&self) -> &MemoryStore {
        &self.working
    }

    pub(in crate::database) fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.working
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

fn conflict(message: String) -> Report<KernelError> {
    Report::new(KernelError::Conflict).attach_printable(message)
}

fn violation(message: String) -> Report<KernelError> {
    Report::new(KernelError::Validation).attach_printable(message)
}

#[cfg(test)]
pub(in crate::database::memory) mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAvailableQuantity, BookDescription, BookId, BookIsbn, BookPrice, BookRating,
        BookTitle, CreatedAt,
    };
    use kernel::KernelError;

    use crate::database::memory::{InMemoryBookRepository, InMemoryDatabase};

    pub fn sample_book(title: &str, quantity: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(title),
            BookIsbn::new("978-3-16-148410-0"),
            None,
            BookAvailableQuantity::new(quantity),
            BookPrice::new(Decimal::new(1200, 2)),
            BookDescription::default(),
            BookRating::default(),
            CreatedAt::now(),
        )
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book = sample_book("Dropped", 1);

        let mut con = db.transact().await?;
        InMemoryBookRepository.create(&mut con, &book).await?;
        drop(con);

        let mut con = db.transact().await?;
        assert!(InMemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book = sample_book("Committed", 1);

        let mut con = db.transact().await?;
        InMemoryBookRepository.create(&mut con, &book).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = InMemoryBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book));
        Ok(())
    }
}
