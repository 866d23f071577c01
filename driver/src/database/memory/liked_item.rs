use std::cmp::Reverse;

use kernel::interface::query::{DependOnLikedItemQuery, LikedItemQuery};
use kernel::interface::update::{DependOnLikedItemModifier, LikedItemModifier};
use kernel::prelude::entity::{LikedItem, LikedItemId, UserId};
use kernel::KernelError;

use crate::database::memory::{conflict, InMemoryDatabase, InMemoryTransaction};

pub struct InMemoryLikedItemRepository;

#[async_trait::async_trait]
impl LikedItemQuery for InMemoryLikedItemRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &LikedItemId,
    ) -> error_stack::Result<Option<LikedItem>, KernelError> {
        Ok(con.store().liked_items.get(id).cloned())
    }

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LikedItem>, KernelError> {
        let store = con.store();
        let mut items = store
            .liked_items
            .values()
            .filter(|item| item.user_id() == user_id)
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by_key(|item| {
            (
                Reverse(store.book_title(item.book_id()).map(str::to_owned)),
                *item.id().as_ref(),
            )
        });
        Ok(items)
    }
}

#[async_trait::async_trait]
impl LikedItemModifier for InMemoryLikedItemRepository {
    type Transaction = InMemoryTransaction;
    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        liked_item: &LikedItem,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        store.ensure_book(liked_item.book_id())?;
        let duplicated = store.liked_items.values().any(|stored| {
            stored.id() == liked_item.id()
                || (stored.user_id() == liked_item.user_id()
                    && stored.book_id() == liked_item.book_id())
        });
        if duplicated {
            return Err(conflict(format!(
                "user {} already likes book {}",
                liked_item.user_id().as_ref(),
                liked_item.book_id().as_ref()
            )));
        }
        store
            .liked_items
            .insert(liked_item.id().clone(), liked_item.clone());
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        liked_item_id: &LikedItemId,
    ) -> error_stack::Result<(), KernelError> {
        con.store_mut().liked_items.remove(liked_item_id);
        Ok(())
    }
}

impl DependOnLikedItemQuery for InMemoryDatabase {
    type LikedItemQuery = InMemoryLikedItemRepository;
    fn liked_item_query(&self) -> &Self::LikedItemQuery {
        &InMemoryLikedItemRepository
    }
}

impl DependOnLikedItemModifier for InMemoryDatabase {
    type LikedItemModifier = InMemoryLikedItemRepository;
    fn liked_item_modifier(&self) -> &Self::LikedItemModifier {
        &InMemoryLikedItemRepository
    }
}
