use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAvailableQuantity, BookDescription, BookId, BookIsbn, BookPrice,
    BookPublicationDate, BookRating, BookTitle, CreatedAt,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id_for_update(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }

    async fn update_rating(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        rating: &BookRating,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update_rating(con, book_id, rating).await
    }

    async fn update_available_quantity(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        quantity: &BookAvailableQuantity,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update_available_quantity(con, book_id, quantity).await
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    isbn13: String,
    publication_date: Option<Date>,
    available_quantity: i32,
    price: Decimal,
    description: String,
    rating: Decimal,
    created_at: OffsetDateTime,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookIsbn::new(value.isbn13),
            value.publication_date.map(BookPublicationDate::new),
            BookAvailableQuantity::new(value.available_quantity),
            BookPrice::new(value.price),
            BookDescription::new(value.description),
            BookRating::new(value.rating),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, isbn13, publication_date, available_quantity, price, description, rating, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_id_for_update(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, isbn13, publication_date, available_quantity, price, description, rating, created_at
            FROM books
            WHERE id = $1
            FOR NO KEY UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, isbn13, publication_date, available_quantity, price, description, rating, created_at
            FROM books
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, isbn13, publication_date, available_quantity, price, description, rating, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.isbn13().as_ref())
        .bind(book.publication_date().as_ref().map(AsRef::<Date>::as_ref))
        .bind(book.available_quantity().as_ref())
        .bind(book.price().as_ref())
        .bind(book.description().as_ref())
        .bind(book.rating().as_ref())
        .bind(book.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, isbn13 = $3, publication_date = $4, available_quantity = $5, price = $6, description = $7
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.isbn13().as_ref())
        .bind(book.publication_date().as_ref().map(AsRef::<Date>::as_ref))
        .bind(book.available_quantity().as_ref())
        .bind(book.price().as_ref())
        .bind(book.description().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_rating(
        con: &mut PgConnection,
        book_id: &BookId,
        rating: &BookRating,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET rating = $2
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .bind(rating.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_available_quantity(
        con: &mut PgConnection,
        book_id: &BookId,
        quantity: &BookAvailableQuantity,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET available_quantity = $2
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
pub(in crate::database::postgres) mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAvailableQuantity, BookDescription, BookId, BookIsbn, BookPrice, BookRating,
        BookTitle, CreatedAt,
    };
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookRepository, PostgresDatabase};

    pub(in crate::database::postgres) fn sample_book(quantity: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Sample book title"),
            BookIsbn::new("978-3-16-148410-0"),
            None,
            BookAvailableQuantity::new(quantity),
            BookPrice::new(Decimal::new(550, 2)),
            BookDescription::new("Sample book description"),
            BookRating::default(),
            CreatedAt::now(),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(25);
        let id = book.id().clone();
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        let book = book.reconstruct(|b| b.title = BookTitle::new("Second title"));
        PostgresBookRepository.update(&mut con, &book).await?;
        let found = PostgresBookRepository
            .find_by_id_for_update(&mut con, &id)
            .await?;
        assert_eq!(found, Some(book));

        PostgresBookRepository.delete(&mut con, &id).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn derived_fields() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(10);
        let id = book.id().clone();
        PostgresBookRepository.create(&mut con, &book).await?;

        let rating = BookRating::new(Decimal::new(35, 1));
        PostgresBookRepository
            .update_rating(&mut con, &id, &rating)
            .await?;
        let quantity = BookAvailableQuantity::new(8);
        PostgresBookRepository
            .update_available_quantity(&mut con, &id, &quantity)
            .await?;

        let found = PostgresBookRepository
            .find_by_id(&mut con, &id)
            .await?
            .unwrap();
        assert_eq!(found.rating(), &rating);
        assert_eq!(found.available_quantity(), &quantity);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn negative_quantity_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        let result = PostgresBookRepository
            .update_available_quantity(&mut con, book.id(), &BookAvailableQuantity::new(-1))
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Validation
        );
        Ok(())
    }
}
