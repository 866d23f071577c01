use std::cmp::Reverse;

use rust_decimal::Decimal;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookAvailableQuantity, BookId, BookRating};
use kernel::KernelError;

use crate::database::memory::{
    conflict, violation, InMemoryDatabase, InMemoryTransaction, MemoryStore,
};

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.store().books.get(id).cloned())
    }

    // the whole store is already held exclusively by `con`
    async fn find_by_id_for_update(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.store().books.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let mut books = con.store().books.values().cloned().collect::<Vec<_>>();
        books.sort_by_key(|book| (Reverse(*book.created_at().as_ref()), *book.id().as_ref()));
        Ok(books)
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;
    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        check_book(book)?;
        let store = con.store_mut();
        if store.books.contains_key(book.id()) {
            return Err(conflict(format!(
                "book {} already exists",
                book.id().as_ref()
            )));
        }
        store.books.insert(book.id().clone(), book.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        check_book(book)?;
        if let Some(stored) = con.store_mut().books.get_mut(book.id()) {
            let rating = *stored.rating();
            let created_at = stored.created_at().clone();
            *stored = book.clone().reconstruct(|b| {
                b.rating = rating;
                b.created_at = created_at.clone();
            });
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        if store.books.remove(book_id).is_some() {
            cascade(store, book_id);
        }
        Ok(())
    }

    async fn update_rating(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        rating: &BookRating,
    ) -> error_stack::Result<(), KernelError> {
        let value = *rating.as_ref();
        if value.is_sign_negative() || value > Decimal::from(5) {
            return Err(violation(format!("rating {value} is outside 0..=5")));
        }
        if let Some(book) = con.store_mut().books.get_mut(book_id) {
            book.substitute(|b| *b.rating = *rating);
        }
        Ok(())
    }

    async fn update_available_quantity(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        quantity: &BookAvailableQuantity,
    ) -> error_stack::Result<(), KernelError> {
        let quantity = BookAvailableQuantity::try_new(*quantity.as_ref())?;
        if let Some(book) = con.store_mut().books.get_mut(book_id) {
            book.substitute(|b| *b.available_quantity = quantity);
        }
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

fn check_book(book: &Book) -> error_stack::Result<(), KernelError> {
    BookAvailableQuantity::try_new(*book.available_quantity().as_ref())?;
    Ok(())
}

fn cascade(store: &mut MemoryStore, book_id: &BookId) {
    store.reviews.retain(|_, review| review.book_id() != book_id);
    store.order_items.retain(|_, item| item.book_id() != book_id);
    store.liked_items.retain(|_, item| item.book_id() != book_id);
    store.book_attributes.retain(|(linked, _)| linked != book_id);
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{BookQuery, ReviewQuery};
    use kernel::interface::update::{BookModifier, ReviewModifier};
    use kernel::prelude::entity::{
        BookAvailableQuantity, BookTitle, CreatedAt, Review, ReviewComment, ReviewId, ReviewValue,
        UserId,
    };
    use kernel::KernelError;

    use crate::database::memory::test::sample_book;
    use crate::database::memory::{
        InMemoryBookRepository, InMemoryDatabase, InMemoryReviewRepository,
    };

    #[tokio::test]
    async fn update_keeps_derived_fields() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let book = sample_book("First", 3);
        InMemoryBookRepository.create(&mut con, &book).await?;
        let edited = book.clone().reconstruct(|b| {
            b.title = BookTitle::new("Second");
            b.created_at = CreatedAt::new(time::OffsetDateTime::UNIX_EPOCH);
        });
        InMemoryBookRepository.update(&mut con, &edited).await?;

        let found = InMemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .unwrap();
        assert_eq!(found.title(), &BookTitle::new("Second"));
        assert_eq!(found.created_at(), book.created_at());
        Ok(())
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let book = sample_book("Stock", 1);
        InMemoryBookRepository.create(&mut con, &book).await?;
        let result = InMemoryBookRepository
            .update_available_quantity(&mut con, book.id(), &BookAvailableQuantity::new(-1))
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let book = sample_book("Cascade", 1);
        InMemoryBookRepository.create(&mut con, &book).await?;
        let review = Review::new(
            ReviewId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            book.id().clone(),
            ReviewValue::new(5),
            ReviewComment::default(),
            CreatedAt::now(),
        );
        InMemoryReviewRepository.create(&mut con, &review).await?;

        InMemoryBookRepository.delete(&mut con, book.id()).await?;
        let found = InMemoryReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }
}
