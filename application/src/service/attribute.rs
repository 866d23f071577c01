use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{AttributeQuery, DependOnAttributeQuery};
use kernel::interface::update::{AttributeModifier, DependOnAttributeModifier};
use kernel::prelude::entity::{
    Attribute, AttributeDescription, AttributeId, AttributeKind, AttributeName,
};
use kernel::KernelError;

use crate::transfer::{
    AttributeDto, CreateAttributeDto, DeleteAttributeDto, GetAttributeDto, UpdateAttributeDto,
};

#[async_trait::async_trait]
pub trait GetAttributeService: 'static + Sync + Send + DependOnAttributeQuery {
    async fn get_attribute(
        &self,
        dto: GetAttributeDto,
    ) -> error_stack::Result<Option<AttributeDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let attribute = self
            .attribute_query()
            .find_by_id(&mut connection, &dto.kind, &AttributeId::new(dto.id))
            .await?;
        Ok(attribute.map(AttributeDto::from))
    }

    async fn get_all_attributes(
        &self,
        kind: AttributeKind,
    ) -> error_stack::Result<Vec<AttributeDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let attributes = self
            .attribute_query()
            .find_all(&mut connection, &kind)
            .await?;
        Ok(attributes.into_iter().map(AttributeDto::from).collect())
    }
}

impl<T> GetAttributeService for T where T: DependOnAttributeQuery {}

#[async_trait::async_trait]
pub trait CreateAttributeService: 'static + Sync + Send + DependOnAttributeModifier {
    /// Fails with [`KernelError::Conflict`] when the kind already has an attribute of that name.
    async fn create_attribute(
        &self,
        dto: CreateAttributeDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let uuid = Uuid::new_v4();
        let attribute = Attribute::new(
            AttributeId::new(uuid),
            dto.kind,
            AttributeName::new(dto.name),
            dto.description.map(AttributeDescription::new),
        );
        self.attribute_modifier()
            .create(&mut connection, &attribute)
            .await?;

        connection.commit().await?;
        Ok(uuid)
    }
}

impl<T> CreateAttributeService for T where T: DependOnAttributeModifier {}

#[async_trait::async_trait]
pub trait UpdateAttributeService:
    'static + Sync + Send + DependOnAttributeQuery + DependOnAttributeModifier
{
    async fn update_attribute(&self, dto: UpdateAttributeDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let attribute = self
            .attribute_query()
            .find_by_id(&mut connection, &dto.kind, &AttributeId::new(dto.id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("{} {} not found", dto.kind, dto.id))
            })?;
        let attribute = attribute.reconstruct(|attribute| {
            if let Some(name) = dto.name {
                attribute.name = AttributeName::new(name);
            }
            if let Some(description) = dto.description {
                attribute.description = Some(AttributeDescription::new(description));
            }
        });
        // re-apply the kind's description rule
        let attribute = Attribute::new(
            attribute.id().clone(),
            *attribute.kind(),
            attribute.name().clone(),
            attribute.description().clone(),
        );
        self.attribute_modifier()
            .update(&mut connection, &attribute)
            .await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> UpdateAttributeService for T where T: DependOnAttributeQuery + DependOnAttributeModifier {}

#[async_trait::async_trait]
pub trait DeleteAttributeService:
    'static + Sync + Send + DependOnAttributeQuery + DependOnAttributeModifier
{
    /// Books linked to the attribute lose the link.
    async fn delete_attribute(&self, dto: DeleteAttributeDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = AttributeId::new(dto.id);
        if self
            .attribute_query()
            .find_by_id(&mut connection, &dto.kind, &id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("{} {} not found", dto.kind, dto.id)));
        }
        self.attribute_modifier()
            .delete(&mut connection, &id)
            .await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> DeleteAttributeService for T where T: DependOnAttributeQuery + DependOnAttributeModifier {}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::AttributeKind;
    use kernel::KernelError;

    use crate::service::book::test::create_dto;
    use crate::service::{
        CreateAttributeService, CreateBookService, DeleteAttributeService, GetAttributeService,
        GetBookService, UpdateAttributeService,
    };
    use crate::transfer::{
        CreateAttributeDto, DeleteAttributeDto, GetAttributeDto, GetBookDto,
        ReplaceAttributesDto, UpdateAttributeDto,
    };

    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let id = db
            .create_attribute(CreateAttributeDto {
                kind: AttributeKind::Publisher,
                name: "Shinchosha".to_string(),
                description: None,
            })
            .await?;

        let publisher = db
            .get_attribute(GetAttributeDto {
                kind: AttributeKind::Publisher,
                id,
            })
            .await?
            .unwrap();
        assert_eq!(publisher.description, Some(String::new()));

        // ids are scoped by kind
        let genre = db
            .get_attribute(GetAttributeDto {
                kind: AttributeKind::Genre,
                id,
            })
            .await?;
        assert!(genre.is_none());

        db.update_attribute(UpdateAttributeDto {
            kind: AttributeKind::Publisher,
            id,
            name: None,
            description: Some("Tokyo".to_string()),
        })
        .await?;
        let publishers = db.get_all_attributes(AttributeKind::Publisher).await?;
        assert_eq!(publishers.len(), 1);
        assert_eq!(publishers[0].name, "Shinchosha");
        assert_eq!(publishers[0].description.as_deref(), Some("Tokyo"));

        db.delete_attribute(DeleteAttributeDto {
            kind: AttributeKind::Publisher,
            id,
        })
        .await?;
        assert!(db
            .get_all_attributes(AttributeKind::Publisher)
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn authors_have_no_description() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let id = db
            .create_attribute(CreateAttributeDto {
                kind: AttributeKind::Author,
                name: "Natsume Soseki".to_string(),
                description: Some("ignored".to_string()),
            })
            .await?;
        let author = db
            .get_attribute(GetAttributeDto {
                kind: AttributeKind::Author,
                id,
            })
            .await?
            .unwrap();
        assert_eq!(author.description, None);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let dto = || CreateAttributeDto {
            kind: AttributeKind::Language,
            name: "Japanese".to_string(),
            description: None,
        };
        db.create_attribute(dto()).await?;
        let result = db.create_attribute(dto()).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_unlinks_books() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto("Kokoro", 1);
        dto.attributes = vec![ReplaceAttributesDto {
            kind: AttributeKind::Bookshelf,
            names: vec!["Classics".to_string()],
        }];
        let book_id = db.create_book(dto).await?;

        let shelf = db.get_all_attributes(AttributeKind::Bookshelf).await?;
        db.delete_attribute(DeleteAttributeDto {
            kind: AttributeKind::Bookshelf,
            id: shelf[0].id,
        })
        .await?;

        let book = db.get_book(GetBookDto { id: book_id }).await?.unwrap();
        assert!(book.attributes.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_attribute() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let result = db
            .update_attribute(UpdateAttributeDto {
                kind: AttributeKind::Genre,
                id: Uuid::new_v4(),
                name: Some("Mystery".to_string()),
                description: None,
            })
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }
}
