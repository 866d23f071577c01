use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnAttributeQuery, DependOnBookQuery, DependOnOrderItemQuery, OrderItemQuery,
};
use kernel::interface::update::{DependOnOrderItemModifier, OrderItemModifier};
use kernel::prelude::entity::{BookId, OrderItem, OrderItemId, OrderItemQuantity, UserId};
use kernel::KernelError;

use crate::service::book::load_book;
use crate::service::{InventoryAdjuster, TransactionOf};
use crate::transfer::{
    CartLineDto, CreateOrderItemDto, DeleteOrderItemDto, GetCartDto, OrderItemDto,
    UpdateOrderItemDto,
};

#[async_trait::async_trait]
pub trait GetCartService:
    'static + Sync + Send + DependOnOrderItemQuery + DependOnBookQuery + DependOnAttributeQuery
{
    /// Lines ordered by book title, descending.
    async fn get_cart(&self, dto: GetCartDto) -> error_stack::Result<Vec<CartLineDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let items = self
            .order_item_query()
            .find_by_user_id(&mut connection, &UserId::new(dto.user_id))
            .await?;
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let book = load_book(self, &mut connection, item.book_id())
                .await?
                .ok_or_else(|| {
                    Report::new(KernelError::Internal).attach_printable(format!(
                        "cart line {} points to a missing book",
                        item.id().as_ref()
                    ))
                })?;
            lines.push(CartLineDto {
                item: OrderItemDto::from(item),
                book,
            });
        }
        Ok(lines)
    }
}

impl<T> GetCartService for T where
    T: DependOnOrderItemQuery + DependOnBookQuery + DependOnAttributeQuery
{
}

#[async_trait::async_trait]
pub trait CreateOrderItemService:
    'static + Sync + Send + DependOnOrderItemModifier + InventoryAdjuster
{
    /// Adds a cart line and takes its quantity out of the book's stock.
    ///
    /// Fails with [`KernelError::Validation`] and leaves both untouched when stock is short.
    async fn create_order_item(
        &self,
        dto: CreateOrderItemDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let uuid = Uuid::new_v4();
        let item = OrderItem::new(
            OrderItemId::new(uuid),
            UserId::new(dto.user_id),
            BookId::new(dto.book_id),
            OrderItemQuantity::try_new(dto.quantity)?,
        );
        self.order_item_modifier()
            .create(&mut connection, &item)
            .await?;
        self.reserve_inventory(&mut connection, &item).await?;

        connection.commit().await?;
        Ok(uuid)
    }
}

impl<T> CreateOrderItemService for T where T: DependOnOrderItemModifier + InventoryAdjuster {}

#[async_trait::async_trait]
pub trait UpdateOrderItemService:
    'static + Sync + Send + DependOnOrderItemQuery + DependOnOrderItemModifier
{
    /// Changes the line's quantity without touching the book's stock.
    async fn update_order_item(
        &self,
        dto: UpdateOrderItemDto,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let quantity = OrderItemQuantity::try_new(dto.quantity)?;
        let mut item = find_owned(self, &mut connection, dto.id, dto.user_id).await?;
        item.substitute(|item| *item.quantity = quantity);
        self.order_item_modifier()
            .update(&mut connection, &item)
            .await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> UpdateOrderItemService for T where T: DependOnOrderItemQuery + DependOnOrderItemModifier {}

#[async_trait::async_trait]
pub trait DeleteOrderItemService:
    'static + Sync + Send + DependOnOrderItemQuery + DependOnOrderItemModifier + InventoryAdjuster
{
    /// Removes a cart line and gives its quantity back to the book's stock.
    async fn delete_order_item(
        &self,
        dto: DeleteOrderItemDto,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let item = find_owned(self, &mut connection, dto.id, dto.user_id).await?;
        self.order_item_modifier()
            .delete(&mut connection, item.id())
            .await?;
        self.release_inventory(&mut connection, &item).await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> DeleteOrderItemService for T where
    T: DependOnOrderItemQuery + DependOnOrderItemModifier + InventoryAdjuster
{
}

/// Lines of other users are reported as missing.
async fn find_owned<T>(
    module: &T,
    con: &mut TransactionOf<T>,
    id: Uuid,
    user_id: Uuid,
) -> error_stack::Result<OrderItem, KernelError>
where
    T: ?Sized + DependOnOrderItemQuery,
{
    module
        .order_item_query()
        .find_by_id(con, &OrderItemId::new(id))
        .await?
        .filter(|item| item.user_id().as_ref() == &user_id)
        .ok_or_else(|| {
            Report::new(KernelError::NotFound).attach_printable(format!("cart line {id} not found"))
        })
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use driver::database::{InMemoryDatabase, PostgresDatabase};
    use kernel::KernelError;

    use crate::service::book::test::create_dto;
    use crate::service::{
        CreateBookService, CreateOrderItemService, DeleteBookService, DeleteOrderItemService,
        GetBookService, GetCartService, UpdateOrderItemService,
    };
    use crate::transfer::{
        CreateOrderItemDto, DeleteBookDto, DeleteOrderItemDto, GetBookDto, GetCartDto,
        UpdateOrderItemDto,
    };

    async fn stock(db: &InMemoryDatabase, book_id: Uuid) -> error_stack::Result<i32, KernelError> {
        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        Ok(book.available_quantity)
    }

    fn line(user_id: Uuid, book_id: Uuid, quantity: i32) -> CreateOrderItemDto {
        CreateOrderItemDto {
            user_id,
            book_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn stock_follows_cart() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Botchan", 10)).await?;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = db.create_order_item(line(alice, book_id, 2)).await?;
        assert_eq!(stock(&db, book_id).await?, 8);

        db.create_order_item(line(bob, book_id, 3)).await?;
        assert_eq!(stock(&db, book_id).await?, 5);

        db.delete_order_item(DeleteOrderItemDto {
            user_id: alice,
            id: first,
        })
        .await?;
        assert_eq!(stock(&db, book_id).await?, 8);
        Ok(())
    }

    #[tokio::test]
    async fn over_reservation_is_rolled_back() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Sanshiro", 2)).await?;
        let user_id = Uuid::new_v4();

        let result = db.create_order_item(line(user_id, book_id, 3)).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        assert_eq!(stock(&db, book_id).await?, 2);
        assert!(db.get_cart(GetCartDto { user_id }).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn whole_stock_can_be_reserved() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("The Gate", 3)).await?;
        db.create_order_item(line(Uuid::new_v4(), book_id, 3)).await?;
        assert_eq!(stock(&db, book_id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn quantity_update_keeps_stock() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Kusamakura", 10)).await?;
        let user_id = Uuid::new_v4();
        let id = db.create_order_item(line(user_id, book_id, 2)).await?;

        db.update_order_item(UpdateOrderItemDto {
            user_id,
            id,
            quantity: 6,
        })
        .await?;

        assert_eq!(stock(&db, book_id).await?, 8);
        let cart = db.get_cart(GetCartDto { user_id }).await?;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item.quantity, 6);
        assert_eq!(cart[0].book.title, "Kusamakura");
        Ok(())
    }

    #[tokio::test]
    async fn one_line_per_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Kokoro", 10)).await?;
        let user_id = Uuid::new_v4();
        db.create_order_item(line(user_id, book_id, 1)).await?;

        let result = db.create_order_item(line(user_id, book_id, 1)).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        assert_eq!(stock(&db, book_id).await?, 9);
        Ok(())
    }

    #[tokio::test]
    async fn other_users_lines_are_hidden() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("I Am a Cat", 10)).await?;
        let owner = Uuid::new_v4();
        let id = db.create_order_item(line(owner, book_id, 4)).await?;

        let result = db
            .delete_order_item(DeleteOrderItemDto {
                user_id: Uuid::new_v4(),
                id,
            })
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        assert_eq!(stock(&db, book_id).await?, 6);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let result = db
            .create_order_item(line(Uuid::new_v4(), Uuid::new_v4(), 1))
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn lines_go_with_the_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Light and Darkness", 5)).await?;
        let user_id = Uuid::new_v4();
        db.create_order_item(line(user_id, book_id, 1)).await?;

        db.delete_book(DeleteBookDto { id: book_id }).await?;
        assert!(db.get_cart(GetCartDto { user_id }).await?.is_empty());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_lines_on_one_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let book_id = db.create_book(create_dto("Ten Nights of Dreams", 10)).await?;

        let (first, second) = tokio::join!(
            db.create_order_item(line(Uuid::new_v4(), book_id, 2)),
            db.create_order_item(line(Uuid::new_v4(), book_id, 3)),
        );
        first?;
        second?;

        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        assert_eq!(book.available_quantity, 5);

        db.delete_book(DeleteBookDto { id: book_id }).await?;
        Ok(())
    }
}
