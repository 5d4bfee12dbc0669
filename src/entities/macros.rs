//! Macros for reducing boilerplate when defining entities
//!
//! The validation engine only needs a name, an id and dynamic field access
//! from each entity type. These macros generate the struct and the
//! `Entity` implementation so that field names stay in one place.

/// Create an entity struct with an automatic `Entity` implementation
///
/// Every field type must implement `IntoFieldValue`. Relation fields are
/// declared as `Option<EntityReference>` and compare by the related id.
///
/// # Example
///
/// ```rust,ignore
/// use entity_validator::prelude::*;
///
/// impl_entity!(
///     Article,
///     "Article",
///     {
///         title: String,
///         category: Option<EntityReference>,
///     }
/// );
///
/// let article = Article::new("First article".to_string(), Some(category.reference()));
/// assert_eq!(Article::fields(), &["title", "category"]);
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $type_name:expr,
        {
            $( $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,
            $( pub $field : $field_type ),*
        }

        impl $type {
            /// Create a new instance with a fresh id
            #[allow(clippy::too_many_arguments)]
            pub fn new( $( $field: $field_type ),* ) -> Self {
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    $( $field ),*
                }
            }
        }

        impl $crate::core::entity::Entity for $type {
            fn entity_name() -> &'static str {
                $type_name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn fields() -> &'static [&'static str] {
                &[ $( stringify!($field) ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::IntoFieldValue;

                match field {
                    "id" => Some($crate::core::field::FieldValue::Uuid(self.id)),
                    $( stringify!($field) => Some(self.$field.to_field_value()), )*
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::entity::Entity;
    use crate::core::field::FieldValue;
    use crate::core::relation::EntityReference;
    use uuid::Uuid;

    crate::impl_entity!(Book, "Book", {
        title: String,
        pages: i64,
        author: Option<EntityReference>,
    });

    #[test]
    fn test_generated_entity() {
        let author = EntityReference::new(Uuid::new_v4(), "Author");
        let book = Book::new("Dune".to_string(), 412, Some(author.clone()));

        assert_eq!(Book::entity_name(), "Book");
        assert_eq!(Book::fields(), &["title", "pages", "author"]);
        assert!(Book::has_field("id"));
        assert!(!Book::has_field("isbn"));

        assert_eq!(book.field_value("id"), Some(FieldValue::Uuid(book.id)));
        assert_eq!(
            book.field_value("title"),
            Some(FieldValue::String("Dune".to_string()))
        );
        assert_eq!(book.field_value("pages"), Some(FieldValue::Integer(412)));
        assert_eq!(book.field_value("author"), Some(FieldValue::Reference(author)));
        assert_eq!(book.field_value("isbn"), None);
    }

    #[test]
    fn test_unset_relation_is_null() {
        let book = Book::new("Draft".to_string(), 0, None);
        assert_eq!(book.field_value("author"), Some(FieldValue::Null));
        assert_ne!(Book::new("Draft".to_string(), 0, None).id, book.id);
    }
}
