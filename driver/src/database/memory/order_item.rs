use std::cmp::Reverse;

use kernel::interface::query::{DependOnOrderItemQuery, OrderItemQuery};
use kernel::interface::update::{DependOnOrderItemModifier, OrderItemModifier};
use kernel::prelude::entity::{OrderItem, OrderItemId, OrderItemQuantity, UserId};
use kernel::KernelError;

use crate::database::memory::{conflict, InMemoryDatabase, InMemoryTransaction};

pub struct InMemoryOrderItemRepository;

#[async_trait::async_trait]
impl OrderItemQuery for InMemoryOrderItemRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OrderItemId,
    ) -> error_stack::Result<Option<OrderItem>, KernelError> {
        Ok(con.store().order_items.get(id).cloned())
    }

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        let store = con.store();
        let mut items = store
            .order_items
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
impl OrderItemModifier for InMemoryOrderItemRepository {
    type Transaction = InMemoryTransaction;
    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        OrderItemQuantity::try_new(*order_item.quantity().as_ref())?;
        let store = con.store_mut();
        store.ensure_book(order_item.book_id())?;
        let duplicated = store.order_items.values().any(|stored| {
            stored.id() == order_item.id()
                || (stored.user_id() == order_item.user_id()
                    && stored.book_id() == order_item.book_id())
        });
        if duplicated {
            return Err(conflict(format!(
                "user {} already has book {} in the cart",
                order_item.user_id().as_ref(),
                order_item.book_id().as_ref()
            )));
        }
        store
            .order_items
            .insert(order_item.id().clone(), order_item.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        order_item: &OrderItem,
    ) -> error_stack::Result<(), KernelError> {
        let quantity = OrderItemQuantity::try_new(*order_item.quantity().as_ref())?;
        if let Some(stored) = con.store_mut().order_items.get_mut(order_item.id()) {
            stored.substitute(|i| *i.quantity = quantity);
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        order_item_id: &OrderItemId,
    ) -> error_stack::Result<(), KernelError> {
        con.store_mut().order_items.remove(order_item_id);
        Ok(())
    }
}

impl DependOnOrderItemQuery for InMemoryDatabase {
    type OrderItemQuery = InMemoryOrderItemRepository;
    fn order_item_query(&self) -> &Self::OrderItemQuery {
        &InMemoryOrderItemRepository
    }
}

impl DependOnOrderItemModifier for InMemoryDatabase {
    type OrderItemModifier = InMemoryOrderItemRepository;
    fn order_item_modifier(&self) -> &Self::OrderItemModifier {
        &InMemoryOrderItemRepository
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderItemQuery;
    use kernel::interface::update::{BookModifier, OrderItemModifier};
    use kernel::prelude::entity::{OrderItem, OrderItemId, OrderItemQuantity, UserId};
    use kernel::KernelError;

    use crate::database::memory::test::sample_book;
    use crate::database::memory::{
        InMemoryBookRepository, InMemoryDatabase, InMemoryOrderItemRepository,
    };

    #[tokio::test]
    async fn cart_is_ordered_by_title_descending() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let user_id = UserId::new(Uuid::new_v4());
        let mut expected = Vec::new();
        for title in ["Anna Karenina", "War and Peace", "Resurrection"] {
            let book = sample_book(title, 5);
            InMemoryBookRepository.create(&mut con, &book).await?;
            let item = OrderItem::new(
                OrderItemId::new(Uuid::new_v4()),
                user_id.clone(),
                book.id().clone(),
                OrderItemQuantity::new(1),
            );
            InMemoryOrderItemRepository.create(&mut con, &item).await?;
            expected.push((title, item));
        }
        expected.sort_by(|a, b| b.0.cmp(&a.0));

        let found = InMemoryOrderItemRepository
            .find_by_user_id(&mut con, &user_id)
            .await?;
        let expected = expected.into_iter().map(|(_, item)| item).collect::<Vec<_>>();
        assert_eq!(found, expected);
        Ok(())
    }

    #[tokio::test]
    async fn one_line_per_user_and_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let book = sample_book("Twice", 5);
        InMemoryBookRepository.create(&mut con, &book).await?;
        let user_id = UserId::new(Uuid::new_v4());
        let line = |quantity: i32| {
            OrderItem::new(
                OrderItemId::new(Uuid::new_v4()),
                user_id.clone(),
                book.id().clone(),
                OrderItemQuantity::new(quantity),
            )
        };
        InMemoryOrderItemRepository.create(&mut con, &line(1)).await?;
        let result = InMemoryOrderItemRepository.create(&mut con, &line(2)).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }
}
