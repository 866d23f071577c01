use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{AttributeQuery, DependOnAttributeQuery};
use kernel::interface::update::{AttributeModifier, DependOnAttributeModifier};
use kernel::prelude::entity::{
    Attribute, AttributeDescription, AttributeId, AttributeKind, AttributeName, BookId,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresAttributeRepository;

#[async_trait::async_trait]
impl AttributeQuery for PostgresAttributeRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        kind: &AttributeKind,
        id: &AttributeId,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        PgAttributeInternal::find_by_id(con, kind, id).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresConnection,
        kind: &AttributeKind,
        name: &AttributeName,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        PgAttributeInternal::find_by_name(con, kind, name).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        kind: &AttributeKind,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        PgAttributeInternal::find_all(con, kind).await
    }

    async fn find_by_book_id(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        PgAttributeInternal::find_by_book_id(con, book_id).await
    }
}

#[async_trait::async_trait]
impl AttributeModifier for PostgresAttributeRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        PgAttributeInternal::create(con, attribute).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        PgAttributeInternal::update(con, attribute).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        PgAttributeInternal::delete(con, attribute_id).await
    }

    async fn link_book(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        PgAttributeInternal::link_book(con, book_id, attribute_id).await
    }

    async fn unlink_book(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        kind: &AttributeKind,
    ) -> error_stack::Result<(), KernelError> {
        PgAttributeInternal::unlink_book(con, book_id, kind).await
    }
}

impl DependOnAttributeQuery for PostgresDatabase {
    type AttributeQuery = PostgresAttributeRepository;
    fn attribute_query(&self) -> &Self::AttributeQuery {
        &PostgresAttributeRepository
    }
}

impl DependOnAttributeModifier for PostgresDatabase {
    type AttributeModifier = PostgresAttributeRepository;
    fn attribute_modifier(&self) -> &Self::AttributeModifier {
        &PostgresAttributeRepository
    }
}

#[derive(sqlx::FromRow)]
struct AttributeRow {
    id: Uuid,
    kind: String,
    name: String,
    description: Option<String>,
}

impl TryFrom<AttributeRow> for Attribute {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: AttributeRow) -> Result<Self, Self::Error> {
        Ok(Attribute::new(
            AttributeId::new(value.id),
            value.kind.parse::<AttributeKind>()?,
            AttributeName::new(value.name),
            value.description.map(AttributeDescription::new),
        ))
    }
}

pub(in crate::database) struct PgAttributeInternal;

impl PgAttributeInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        kind: &AttributeKind,
        id: &AttributeId,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        let row = sqlx::query_as::<_, AttributeRow>(
            // language=postgresql
            r#"
            SELECT id, kind, name, description
            FROM attributes
            WHERE kind = $1 AND id = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Attribute::try_from).transpose()
    }

    async fn find_by_name(
        con: &mut PgConnection,
        kind: &AttributeKind,
        name: &AttributeName,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        let row = sqlx::query_as::<_, AttributeRow>(
            // language=postgresql
            r#"
            SELECT id, kind, name, description
            FROM attributes
            WHERE kind = $1 AND name = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(name.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Attribute::try_from).transpose()
    }

    async fn find_all(
        con: &mut PgConnection,
        kind: &AttributeKind,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        let rows = sqlx::query_as::<_, AttributeRow>(
            // language=postgresql
            r#"
            SELECT id, kind, name, description
            FROM attributes
            WHERE kind = $1
            ORDER BY name
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Attribute::try_from).collect()
    }

    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        let rows = sqlx::query_as::<_, AttributeRow>(
            // language=postgresql
            r#"
            SELECT a.id, a.kind, a.name, a.description
            FROM attributes a
            JOIN book_attributes ba ON ba.attribute_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Attribute::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO attributes (id, kind, name, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(attribute.id().as_ref())
        .bind(attribute.kind().as_str())
        .bind(attribute.name().as_ref())
        .bind(
            attribute
                .description()
                .as_ref()
                .map(AsRef::<String>::as_ref),
        )
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE attributes
            SET name = $2, description = $3
            WHERE id = $1
            "#,
        )
        .bind(attribute.id().as_ref())
        .bind(attribute.name().as_ref())
        .bind(
            attribute
                .description()
                .as_ref()
                .map(AsRef::<String>::as_ref),
        )
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM attributes
            WHERE id = $1
            "#,
        )
        .bind(attribute_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn link_book(
        con: &mut PgConnection,
        book_id: &BookId,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_attributes (book_id, attribute_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id.as_ref())
        .bind(attribute_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn unlink_book(
        con: &mut PgConnection,
        book_id: &BookId,
        kind: &AttributeKind,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM book_attributes ba
            USING attributes a
            WHERE ba.attribute_id = a.id AND ba.book_id = $1 AND a.kind = $2
            "#,
        )
        .bind(book_id.as_ref())
        .bind(kind.as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::AttributeQuery;
    use kernel::interface::update::{AttributeModifier, BookModifier};
    use kernel::prelude::entity::{
        Attribute, AttributeDescription, AttributeId, AttributeKind, AttributeName,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::test::sample_book;
    use crate::database::postgres::{
        PostgresAttributeRepository, PostgresBookRepository, PostgresDatabase,
    };

    fn sample_attribute(kind: AttributeKind) -> Attribute {
        Attribute::new(
            AttributeId::new(Uuid::new_v4()),
            kind,
            AttributeName::new(format!("attribute-{}", Uuid::new_v4())),
            Some(AttributeDescription::new("sample")),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let genre = sample_attribute(AttributeKind::Genre);
        PostgresAttributeRepository.create(&mut con, &genre).await?;

        let found = PostgresAttributeRepository
            .find_by_name(&mut con, &AttributeKind::Genre, genre.name())
            .await?;
        assert_eq!(found, Some(genre.clone()));

        // same id under another kind is not visible
        let found = PostgresAttributeRepository
            .find_by_id(&mut con, &AttributeKind::Publisher, genre.id())
            .await?;
        assert!(found.is_none());

        let genre = genre.reconstruct(|g| g.name = AttributeName::new("renamed genre"));
        PostgresAttributeRepository.update(&mut con, &genre).await?;
        let found = PostgresAttributeRepository
            .find_by_id(&mut con, &AttributeKind::Genre, genre.id())
            .await?;
        assert_eq!(found, Some(genre.clone()));

        PostgresAttributeRepository
            .delete(&mut con, genre.id())
            .await?;
        let found = PostgresAttributeRepository
            .find_by_id(&mut con, &AttributeKind::Genre, genre.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_name_conflicts() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let author = sample_attribute(AttributeKind::Author);
        PostgresAttributeRepository.create(&mut con, &author).await?;
        let twin = Attribute::new(
            AttributeId::new(Uuid::new_v4()),
            AttributeKind::Author,
            author.name().clone(),
            None,
        );
        let result = PostgresAttributeRepository.create(&mut con, &twin).await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn links() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book = sample_book(1);
        PostgresBookRepository.create(&mut con, &book).await?;
        let genre = sample_attribute(AttributeKind::Genre);
        let language = sample_attribute(AttributeKind::Language);
        PostgresAttributeRepository.create(&mut con, &genre).await?;
        PostgresAttributeRepository
            .create(&mut con, &language)
            .await?;

        PostgresAttributeRepository
            .link_book(&mut con, book.id(), genre.id())
            .await?;
        PostgresAttributeRepository
            .link_book(&mut con, book.id(), genre.id())
            .await?;
        PostgresAttributeRepository
            .link_book(&mut con, book.id(), language.id())
            .await?;
        let linked = PostgresAttributeRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(linked.len(), 2);

        PostgresAttributeRepository
            .unlink_book(&mut con, book.id(), &AttributeKind::Genre)
            .await?;
        let linked = PostgresAttributeRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(linked, vec![language]);
        Ok(())
    }
}
