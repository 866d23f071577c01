use std::cmp::Reverse;

use rust_decimal::Decimal;

use kernel::interface::query::{DependOnReviewQuery, ReviewQuery};
use kernel::interface::update::{DependOnReviewModifier, ReviewModifier};
use kernel::prelude::entity::{BookId, Review, ReviewId, ReviewValue};
use kernel::KernelError;

use crate::database::memory::{conflict, InMemoryDatabase, InMemoryTransaction};

pub struct InMemoryReviewRepository;

#[async_trait::async_trait]
impl ReviewQuery for InMemoryReviewRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        Ok(con.store().reviews.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let store = con.store();
        let mut reviews = store.reviews.values().cloned().collect::<Vec<_>>();
        reviews.sort_by_key(|review| {
            (
                Reverse(store.book_title(review.book_id()).map(str::to_owned)),
                Reverse(*review.created_at().as_ref()),
            )
        });
        Ok(reviews)
    }

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let mut reviews = con
            .store()
            .reviews
            .values()
            .filter(|review| review.book_id() == book_id)
            .cloned()
            .collect::<Vec<_>>();
        reviews.sort_by_key(|review| {
            (
                Reverse(*review.created_at().as_ref()),
                *review.id().as_ref(),
            )
        });
        Ok(reviews)
    }

    async fn average_value_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Option<Decimal>, KernelError> {
        let values = con
            .store()
            .reviews
            .values()
            .filter(|review| review.book_id() == book_id)
            .map(|review| i64::from(*review.value().as_ref()))
            .collect::<Vec<_>>();
        if values.is_empty() {
            return Ok(None);
        }
        let sum = Decimal::from(values.iter().sum::<i64>());
        Ok(Some(sum / Decimal::from(values.len())))
    }
}

#[async_trait::async_trait]
impl ReviewModifier for InMemoryReviewRepository {
    type Transaction = InMemoryTransaction;
    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        ReviewValue::try_new(*review.value().as_ref())?;
        let store = con.store_mut();
        store.ensure_book(review.book_id())?;
        let duplicated = store.reviews.values().any(|stored| {
            stored.id() == review.id()
                || (stored.user_id() == review.user_id() && stored.book_id() == review.book_id())
        });
        if duplicated {
            return Err(conflict(format!(
                "user {} already reviewed book {}",
                review.user_id().as_ref(),
                review.book_id().as_ref()
            )));
        }
        store.reviews.insert(review.id().clone(), review.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        ReviewValue::try_new(*review.value().as_ref())?;
        if let Some(stored) = con.store_mut().reviews.get_mut(review.id()) {
            stored.substitute(|r| {
                *r.value = *review.value();
                *r.comment = review.comment().clone();
            });
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        con.store_mut().reviews.remove(review_id);
        Ok(())
    }
}

impl DependOnReviewQuery for InMemoryDatabase {
    type ReviewQuery = InMemoryReviewRepository;
    fn review_query(&self) -> &Self::ReviewQuery {
        &InMemoryReviewRepository
    }
}

impl DependOnReviewModifier for InMemoryDatabase {
    type ReviewModifier = InMemoryReviewRepository;
    fn review_modifier(&self) -> &Self::ReviewModifier {
        &InMemoryReviewRepository
    }
}
