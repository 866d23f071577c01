use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    AttributeQuery, BookQuery, DependOnAttributeQuery, DependOnBookQuery,
};
use kernel::interface::update::{
    AttributeModifier, BookModifier, DependOnAttributeModifier, DependOnBookModifier,
};
use kernel::prelude::entity::{
    Attribute, AttributeId, AttributeName, Book, BookAvailableQuantity, BookDescription, BookId,
    BookIsbn, BookPrice, BookPublicationDate, BookRating, BookTitle, CreatedAt,
};
use kernel::KernelError;

use crate::service::TransactionOf;
use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, ReplaceAttributesDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnAttributeQuery
{
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        load_book(self, &mut connection, &BookId::new(dto.id)).await
    }

    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        let mut dtos = Vec::with_capacity(books.len());
        for book in books {
            let attributes = self
                .attribute_query()
                .find_by_book_id(&mut connection, book.id())
                .await?;
            dtos.push(BookDto::new(book, attributes));
        }
        Ok(dtos)
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery + DependOnAttributeQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnBookModifier + DependOnAttributeQuery + DependOnAttributeModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let uuid = Uuid::new_v4();
        let book = Book::new(
            BookId::new(uuid),
            BookTitle::new(dto.title),
            BookIsbn::new(dto.isbn13),
            dto.publication_date.map(BookPublicationDate::new),
            BookAvailableQuantity::try_new(dto.available_quantity)?,
            BookPrice::try_new(dto.price)?,
            BookDescription::new(dto.description),
            BookRating::default(),
            CreatedAt::now(),
        );
        self.book_modifier().create(&mut connection, &book).await?;
        replace_attributes(self, &mut connection, book.id(), &dto.attributes).await?;

        connection.commit().await?;
        tracing::info!(book_id = %uuid, "created book");
        Ok(uuid)
    }
}

impl<T> CreateBookService for T where
    T: DependOnBookModifier + DependOnAttributeQuery + DependOnAttributeModifier
{
}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static
    + Sync
    + Send
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnAttributeQuery
    + DependOnAttributeModifier
{
    /// Fields left `None` keep their value. Attribute lists replace the links of their kind.
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let mut book = self
            .book_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("book {} not found", dto.id))
            })?;

        let available_quantity = dto
            .available_quantity
            .map(BookAvailableQuantity::try_new)
            .transpose()?;
        let price = dto.price.map(BookPrice::try_new).transpose()?;
        book.substitute(|book| {
            if let Some(title) = dto.title {
                *book.title = BookTitle::new(title);
            }
            if let Some(isbn13) = dto.isbn13 {
                *book.isbn13 = BookIsbn::new(isbn13);
            }
            if let Some(publication_date) = dto.publication_date {
                *book.publication_date = publication_date.map(BookPublicationDate::new);
            }
            if let Some(available_quantity) = available_quantity {
                *book.available_quantity = available_quantity;
            }
            if let Some(price) = price {
                *book.price = price;
            }
            if let Some(description) = dto.description {
                *book.description = BookDescription::new(description);
            }
        });
        self.book_modifier().update(&mut connection, &book).await?;
        replace_attributes(self, &mut connection, &id, &dto.attributes).await?;

        connection.commit().await?;
        Ok(())
    }
}

impl<T> UpdateBookService for T where
    T: DependOnBookQuery + DependOnBookModifier + DependOnAttributeQuery + DependOnAttributeModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    /// Reviews, cart lines, liked items and attribute links go with the book.
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if self
            .book_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("book {} not found", dto.id)));
        }
        self.book_modifier().delete(&mut connection, &id).await?;

        connection.commit().await?;
        tracing::info!(book_id = %dto.id, "deleted book");
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

/// Book with its attributes, or `None` when it does not exist.
pub(crate) async fn load_book<T>(
    module: &T,
    con: &mut TransactionOf<T>,
    book_id: &BookId,
) -> error_stack::Result<Option<BookDto>, KernelError>
where
    T: ?Sized + DependOnBookQuery + DependOnAttributeQuery,
{
    let Some(book) = module.book_query().find_by_id(con, book_id).await? else {
        return Ok(None);
    };
    let attributes = module
        .attribute_query()
        .find_by_book_id(con, book_id)
        .await?;
    Ok(Some(BookDto::new(book, attributes)))
}

async fn replace_attributes<T>(
    module: &T,
    con: &mut TransactionOf<T>,
    book_id: &BookId,
    replacements: &[ReplaceAttributesDto],
) -> error_stack::Result<(), KernelError>
where
    T: ?Sized + DependOnAttributeQuery + DependOnAttributeModifier,
{
    for ReplaceAttributesDto { kind, names } in replacements {
        module
            .attribute_modifier()
            .unlink_book(con, book_id, kind)
            .await?;
        for name in names {
            let name = AttributeName::new(name.as_str());
            let attribute = match module
                .attribute_query()
                .find_by_name(con, kind, &name)
                .await?
            {
                Some(attribute) => attribute,
                None => {
                    let attribute =
                        Attribute::new(AttributeId::new(Uuid::new_v4()), *kind, name, None);
                    module.attribute_modifier().create(con, &attribute).await?;
                    tracing::debug!(
                        %kind,
                        name = %attribute.name().as_ref(),
                        "created attribute for book"
                    );
                    attribute
                }
            };
            module
                .attribute_modifier()
                .link_book(con, book_id, attribute.id())
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(in crate::service) mod test {
    use rust_decimal::Decimal;
    use time::{Date, Month};
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::AttributeKind;
    use kernel::KernelError;

    use crate::service::{
        CreateBookService, DeleteBookService, GetAttributeService, GetBookService,
        UpdateBookService,
    };
    use crate::transfer::{
        CreateBookDto, DeleteBookDto, GetBookDto, ReplaceAttributesDto, UpdateBookDto,
    };

    pub(crate) fn create_dto(title: &str, quantity: i32) -> CreateBookDto {
        CreateBookDto {
            title: title.to_string(),
            isbn13: "978-4-06-519981-7".to_string(),
            publication_date: None,
            available_quantity: quantity,
            price: Decimal::new(1980, 2),
            description: String::new(),
            attributes: Vec::new(),
        }
    }

    fn names(kind: AttributeKind, names: &[&str]) -> ReplaceAttributesDto {
        ReplaceAttributesDto {
            kind,
            names: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_and_get() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto("Norwegian Wood", 7);
        dto.attributes = vec![
            names(AttributeKind::Author, &["Haruki Murakami"]),
            names(AttributeKind::Genre, &["Fiction", "Romance"]),
        ];
        let id = db.create_book(dto).await?;

        let book = db.get_book(GetBookDto { id }).await?.unwrap();
        assert_eq!(book.title, "Norwegian Wood");
        assert_eq!(book.available_quantity, 7);
        assert_eq!(book.rating, Decimal::ZERO);
        assert_eq!(book.attributes_of(AttributeKind::Genre).count(), 2);
        assert_eq!(book.attributes_of(AttributeKind::Author).count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn attributes_are_reused_by_name() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        for title in ["Kafka on the Shore", "1Q84"] {
            let mut dto = create_dto(title, 1);
            dto.attributes = vec![names(AttributeKind::Author, &["Haruki Murakami"])];
            db.create_book(dto).await?;
        }
        let authors = db.get_all_attributes(AttributeKind::Author).await?;
        assert_eq!(authors.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_given_kinds_only() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto("Snow Country", 2);
        dto.attributes = vec![
            names(AttributeKind::Author, &["Yasunari Kawabata"]),
            names(AttributeKind::Genre, &["Fiction"]),
        ];
        let id = db.create_book(dto).await?;

        db.update_book(UpdateBookDto {
            id,
            title: Some("Yukiguni".to_string()),
            isbn13: None,
            publication_date: None,
            available_quantity: None,
            price: None,
            description: None,
            attributes: vec![names(AttributeKind::Genre, &["Classic"])],
        })
        .await?;

        let book = db.get_book(GetBookDto { id }).await?.unwrap();
        assert_eq!(book.title, "Yukiguni");
        assert_eq!(book.available_quantity, 2);
        let genres = book
            .attributes_of(AttributeKind::Genre)
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(genres, vec!["Classic"]);
        assert_eq!(book.attributes_of(AttributeKind::Author).count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn publication_date_can_be_cleared() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto("Botchan", 1);
        let published = Date::from_calendar_date(1906, Month::April, 1).unwrap();
        dto.publication_date = Some(published);
        let id = db.create_book(dto).await?;

        let patch = |publication_date| UpdateBookDto {
            id,
            title: None,
            isbn13: None,
            publication_date,
            available_quantity: None,
            price: None,
            description: None,
            attributes: Vec::new(),
        };

        db.update_book(patch(None)).await?;
        let book = db.get_book(GetBookDto { id }).await?.unwrap();
        assert_eq!(book.publication_date, Some(published));

        db.update_book(patch(Some(None))).await?;
        let book = db.get_book(GetBookDto { id }).await?.unwrap();
        assert_eq!(book.publication_date, None);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_price_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto("Too expensive", 1);
        dto.price = Decimal::new(100000, 2);
        let result = db.create_book(dto).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        assert!(db.get_all_books().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let result = db.delete_book(DeleteBookDto { id: Uuid::new_v4() }).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }
}
