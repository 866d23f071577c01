use error_stack::Report;

use kernel::interface::query::{AttributeQuery, DependOnAttributeQuery};
use kernel::interface::update::{AttributeModifier, DependOnAttributeModifier};
use kernel::prelude::entity::{Attribute, AttributeId, AttributeKind, AttributeName, BookId};
use kernel::KernelError;

use crate::database::memory::{conflict, InMemoryDatabase, InMemoryTransaction, MemoryStore};

pub struct InMemoryAttributeRepository;

#[async_trait::async_trait]
impl AttributeQuery for InMemoryAttributeRepository {
    type Transaction = InMemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        kind: &AttributeKind,
        id: &AttributeId,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        Ok(con
            .store()
            .attributes
            .get(id)
            .filter(|attribute| attribute.kind() == kind)
            .cloned())
    }

    async fn find_by_name(
        &self,
        con: &mut InMemoryTransaction,
        kind: &AttributeKind,
        name: &AttributeName,
    ) -> error_stack::Result<Option<Attribute>, KernelError> {
        Ok(find_by_name(con.store(), kind, name).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        kind: &AttributeKind,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        let mut attributes = con
            .store()
            .attributes
            .values()
            .filter(|attribute| attribute.kind() == kind)
            .cloned()
            .collect::<Vec<_>>();
        attributes.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(attributes)
    }

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Attribute>, KernelError> {
        let store = con.store();
        let mut attributes = store
            .book_attributes
            .iter()
            .filter(|(linked, _)| linked == book_id)
            .filter_map(|(_, attribute_id)| store.attributes.get(attribute_id))
            .cloned()
            .collect::<Vec<_>>();
        attributes.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(attributes)
    }
}

#[async_trait::async_trait]
impl AttributeModifier for InMemoryAttributeRepository {
    type Transaction = InMemoryTransaction;
    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        if store.attributes.contains_key(attribute.id()) {
            return Err(conflict(format!(
                "attribute {} already exists",
                attribute.id().as_ref()
            )));
        }
        ensure_unique_name(store, attribute)?;
        store
            .attributes
            .insert(attribute.id().clone(), attribute.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        attribute: &Attribute,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        ensure_unique_name(store, attribute)?;
        if let Some(stored) = store.attributes.get_mut(attribute.id()) {
            let kind = *stored.kind();
            *stored = Attribute::new(
                attribute.id().clone(),
                kind,
                attribute.name().clone(),
                attribute.description().clone(),
            );
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        store.attributes.remove(attribute_id);
        store
            .book_attributes
            .retain(|(_, linked)| linked != attribute_id);
        Ok(())
    }

    async fn link_book(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        attribute_id: &AttributeId,
    ) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        store.ensure_book(book_id)?;
        if !store.attributes.contains_key(attribute_id) {
            return Err(Report::new(KernelError::NotFound).attach_printable(format!(
                "attribute {} does not exist",
                attribute_id.as_ref()
            )));
        }
        store
            .book_attributes
            .insert((book_id.clone(), attribute_id.clone()));
        Ok(())
    }

    async fn unlink_book(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        kind: &AttributeKind,
    ) -> error_stack::Result<(), KernelError> {
        let MemoryStore {
            attributes,
            book_attributes,
            ..
        } = con.store_mut();
        book_attributes.retain(|(linked, attribute_id)| {
            linked != book_id
                || attributes
                    .get(attribute_id)
                    .map_or(true, |attribute| attribute.kind() != kind)
        });
        Ok(())
    }
}

impl DependOnAttributeQuery for InMemoryDatabase {
    type AttributeQuery = InMemoryAttributeRepository;
    fn attribute_query(&self) -> &Self::AttributeQuery {
        &InMemoryAttributeRepository
    }
}

impl DependOnAttributeModifier for InMemoryDatabase {
    type AttributeModifier = InMemoryAttributeRepository;
    fn attribute_modifier(&self) -> &Self::AttributeModifier {
        &InMemoryAttributeRepository
    }
}

fn find_by_name<'a>(
    store: &'a MemoryStore,
    kind: &AttributeKind,
    name: &AttributeName,
) -> Option<&'a Attribute> {
    store
        .attributes
        .values()
        .find(|attribute| attribute.kind() == kind && attribute.name() == name)
}

fn ensure_unique_name(
    store: &MemoryStore,
    attribute: &Attribute,
) -> error_stack::Result<(), KernelError> {
    let kind = store
        .attributes
        .get(attribute.id())
        .map_or(*attribute.kind(), |stored| *stored.kind());
    match find_by_name(store, &kind, attribute.name()) {
        Some(other) if other.id() != attribute.id() => Err(conflict(format!(
            "{kind} `{}` already exists",
            attribute.name().as_ref()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::AttributeQuery;
    use kernel::interface::update::{AttributeModifier, BookModifier};
    use kernel::prelude::entity::{Attribute, AttributeId, AttributeKind, AttributeName};
    use kernel::KernelError;

    use crate::database::memory::test::sample_book;
    use crate::database::memory::{
        InMemoryAttributeRepository, InMemoryBookRepository, InMemoryDatabase,
    };

    fn attribute(kind: AttributeKind, name: &str) -> Attribute {
        Attribute::new(
            AttributeId::new(Uuid::new_v4()),
            kind,
            AttributeName::new(name),
            None,
        )
    }

    #[tokio::test]
    async fn names_are_unique_per_kind() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        InMemoryAttributeRepository
            .create(&mut con, &attribute(AttributeKind::Genre, "Poetry"))
            .await?;
        InMemoryAttributeRepository
            .create(&mut con, &attribute(AttributeKind::Bookshelf, "Poetry"))
            .await?;
        let result = InMemoryAttributeRepository
            .create(&mut con, &attribute(AttributeKind::Genre, "Poetry"))
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::Conflict
        );
        Ok(())
    }

    #[tokio::test]
    async fn unlink_only_touches_kind() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let book = sample_book("Linked", 1);
        InMemoryBookRepository.create(&mut con, &book).await?;
        let genre = attribute(AttributeKind::Genre, "Drama");
        let author = attribute(AttributeKind::Author, "Anton Chekhov");
        for attribute in [&genre, &author] {
            InMemoryAttributeRepository.create(&mut con, attribute).await?;
            InMemoryAttributeRepository
                .link_book(&mut con, book.id(), attribute.id())
                .await?;
        }

        InMemoryAttributeRepository
            .unlink_book(&mut con, book.id(), &AttributeKind::Genre)
            .await?;
        let linked = InMemoryAttributeRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(linked, vec![author]);
        Ok(())
    }
}
