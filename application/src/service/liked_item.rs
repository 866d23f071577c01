use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnAttributeQuery, DependOnBookQuery, DependOnLikedItemQuery, LikedItemQuery,
};
use kernel::interface::update::{DependOnLikedItemModifier, LikedItemModifier};
use kernel::prelude::entity::{BookId, LikedItem, LikedItemId, UserId};
use kernel::KernelError;

use crate::service::book::load_book;
use crate::transfer::{CreateLikedItemDto, DeleteLikedItemDto, GetLikedItemsDto, LikedItemDto};

#[async_trait::async_trait]
pub trait GetLikedItemsService:
    'static + Sync + Send + DependOnLikedItemQuery + DependOnBookQuery + DependOnAttributeQuery
{
    async fn get_liked_items(
        &self,
        dto: GetLikedItemsDto,
    ) -> error_stack::Result<Vec<LikedItemDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let items = self
            .liked_item_query()
            .find_by_user_id(&mut connection, &UserId::new(dto.user_id))
            .await?;
        let mut liked = Vec::with_capacity(items.len());
        for item in items {
            let Some(book) = load_book(self, &mut connection, item.book_id()).await? else {
                continue;
            };
            liked.push(LikedItemDto {
                id: *item.id().as_ref(),
                book,
            });
        }
        Ok(liked)
    }
}

impl<T> GetLikedItemsService for T where
    T: DependOnLikedItemQuery + DependOnBookQuery + DependOnAttributeQuery
{
}

#[async_trait::async_trait]
pub trait CreateLikedItemService: 'static + Sync + Send + DependOnLikedItemModifier {
    async fn create_liked_item(
        &self,
        dto: CreateLikedItemDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let uuid = Uuid::new_v4();
        let item = LikedItem::new(
            LikedItemId::new(uuid),
            UserId::new(dto.user_id),
            BookId::new(dto.book_id),
        );
        self.liked_item_modifier()
            .create(&mut connection, &item)
            .await?;

        connection.commit().await?;
        Ok(uuid)
    }
}

impl<T> CreateLikedItemService for T where T: DependOnLikedItemModifier {}

#[async_trait::async_trait]
pub trait DeleteLikedItemService:
    'static + Sync + Send + DependOnLikedItemQuery + DependOnLikedItemModifier
{
    async fn delete_liked_item(
        &self,
        dto: DeleteLikedItemDto,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = LikedItemId::new(dto.id);
        let owned = self
            .liked_item_query()
            .find_by_id(&mut connection, &id)
            .await?
            .is_some_and(|item| item.user_id().as_ref() == &dto.user_id);
        if !owned {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("liked item {} not found", dto.id)));
        }
        self.liked_item_modifier()
            .delete(&mut connection, &id)
            .await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> DeleteLikedItemService for T where T: DependOnLikedItemQuery + DependOnLikedItemModifier {}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::book::test::create_dto;
    use crate::service::{
        CreateBookService, CreateLikedItemService, DeleteLikedItemService, GetBookService,
        GetLikedItemsService,
    };
    use crate::transfer::{CreateLikedItemDto, DeleteLikedItemDto, GetBookDto, GetLikedItemsDto};

    #[tokio::test]
    async fn like_and_unlike() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Spring Snow", 4)).await?;
        let user_id = Uuid::new_v4();

        let id = db
            .create_liked_item(CreateLikedItemDto { user_id, book_id })
            .await?;
        let liked = db.get_liked_items(GetLikedItemsDto { user_id }).await?;
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, id);
        assert_eq!(liked[0].book.id, book_id);

        // liking has no effect on the book
        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        assert_eq!(book.available_quantity, 4);

        let result = db
            .create_liked_item(CreateLikedItemDto { user_id, book_id })
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );

        db.delete_liked_item(DeleteLikedItemDto { user_id, id })
            .await?;
        assert!(db
            .get_liked_items(GetLikedItemsDto { user_id })
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn other_users_items_are_hidden() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let book_id = db.create_book(create_dto("Runaway Horses", 1)).await?;
        let id = db
            .create_liked_item(CreateLikedItemDto {
                user_id: Uuid::new_v4(),
                book_id,
            })
            .await?;

        let result = db
            .delete_liked_item(DeleteLikedItemDto {
                user_id: Uuid::new_v4(),
                id,
            })
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }
}
