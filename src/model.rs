//! Directory data model: categories own suppliers, suppliers own contacts.
//!
//! The persisted form keeps the field names of the existing
//! `suppliers_db.json` document (`nume`, `telefoane`, `contacte`, ...), so an
//! existing file loads without conversion. In memory, categories are kept in
//! an insertion-ordered map keyed by their unique name; removing a category
//! drops every supplier and contact it owns in one keyed removal.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EntityKind;

/// A contact person attached to a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique within the owning supplier.
    #[serde(rename = "nume_contact")]
    pub contact_name: String,
    pub email: String,
    #[serde(rename = "telefon")]
    pub phone: String,
}

impl Contact {
    /// Build a contact from its three fields.
    pub fn new(
        contact_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            contact_name: contact_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A supplier listed under one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique within the owning category.
    #[serde(rename = "nume")]
    pub name: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(rename = "telefoane", default)]
    pub phones: Vec<String>,
    #[serde(rename = "contacte", default)]
    pub contacts: Vec<Contact>,
}

impl Supplier {
    /// Create a supplier with no emails, phones or contacts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Replace the email list.
    pub fn with_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emails = emails.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the phone list.
    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = phones.into_iter().map(Into::into).collect();
        self
    }

    /// Append a contact.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    /// Look up a contact by exact name.
    pub fn contact(&self, contact_name: &str) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.contact_name == contact_name)
    }

    pub(crate) fn contact_position(&self, contact_name: &str) -> Option<usize> {
        self.contacts
            .iter()
            .position(|c| c.contact_name == contact_name)
    }
}

/// The complete directory: the snapshot every command returns.
///
/// Equality is order-sensitive: two directories are equal only when their
/// categories, suppliers and contacts appear in the same order.
///
/// Serialization and deserialization check the same invariants, so a
/// document that was written can always be loaded again.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "DirectoryDocument")]
pub struct Directory {
    pub(crate) categories: IndexMap<String, Vec<Supplier>>,
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.categories.iter().eq(other.categories.iter())
    }
}

impl Eq for Directory {}

impl Directory {
    /// Category names in insertion order.
    pub fn categories(&self) -> impl ExactSizeIterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Suppliers of `category` in insertion order, or `None` if the
    /// category does not exist.
    pub fn suppliers(&self, category: &str) -> Option<&[Supplier]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Look up a supplier by category and exact name.
    pub fn supplier(&self, category: &str, supplier_name: &str) -> Option<&Supplier> {
        self.suppliers(category)?
            .iter()
            .find(|s| s.name == supplier_name)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub(crate) fn supplier_mut(
        &mut self,
        category: &str,
        supplier_name: &str,
    ) -> Option<&mut Supplier> {
        self.categories
            .get_mut(category)?
            .iter_mut()
            .find(|s| s.name == supplier_name)
    }
}

/// Reasons a persisted document cannot be materialized as a [`Directory`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("category listed twice: {0}")]
    DuplicateCategory(String),

    #[error("blank {kind} name under category {category:?}")]
    BlankName { kind: EntityKind, category: String },

    #[error("suppliers recorded for unknown category: {0}")]
    OrphanedSuppliers(String),

    #[error("supplier listed twice in category {category}: {supplier}")]
    DuplicateSupplier { category: String, supplier: String },

    #[error("contact listed twice for supplier {supplier} in category {category}: {contact}")]
    DuplicateContact {
        category: String,
        supplier: String,
        contact: String,
    },
}

/// On-disk shape: the category list plus a map from category name to its
/// suppliers.
#[derive(Debug, Default, Deserialize)]
struct DirectoryDocument {
    categories: Vec<String>,
    #[serde(default)]
    suppliers: IndexMap<String, Vec<Supplier>>,
}

impl TryFrom<DirectoryDocument> for Directory {
    type Error = DocumentError;

    fn try_from(doc: DirectoryDocument) -> Result<Self, Self::Error> {
        let DirectoryDocument {
            categories: names,
            mut suppliers,
        } = doc;

        let mut categories = IndexMap::with_capacity(names.len());
        for name in names {
            if categories.contains_key(&name) {
                return Err(DocumentError::DuplicateCategory(name));
            }
            // A listed category with no supplier entry is an empty category.
            let list = suppliers.shift_remove(&name).unwrap_or_default();
            check_category(&name, &list)?;
            categories.insert(name, list);
        }

        if let Some(orphan) = suppliers.into_keys().next() {
            return Err(DocumentError::OrphanedSuppliers(orphan));
        }

        Ok(Self { categories })
    }
}

/// Borrowed form of [`DirectoryDocument`] used when writing.
#[derive(Serialize)]
struct DocumentView<'a> {
    categories: Vec<&'a str>,
    suppliers: &'a IndexMap<String, Vec<Supplier>>,
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        for (category, suppliers) in &self.categories {
            check_category(category, suppliers).map_err(serde::ser::Error::custom)?;
        }
        DocumentView {
            categories: self.categories().collect(),
            suppliers: &self.categories,
        }
        .serialize(serializer)
    }
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Names under one category must be non-blank and unique in their scope.
fn check_category(category: &str, suppliers: &[Supplier]) -> Result<(), DocumentError> {
    let blank = |kind| DocumentError::BlankName {
        kind,
        category: category.to_owned(),
    };
    if is_blank(category) {
        return Err(blank(EntityKind::Category));
    }
    for (i, supplier) in suppliers.iter().enumerate() {
        if is_blank(&supplier.name) {
            return Err(blank(EntityKind::Supplier));
        }
        if suppliers[..i].iter().any(|s| s.name == supplier.name) {
            return Err(DocumentError::DuplicateSupplier {
                category: category.to_owned(),
                supplier: supplier.name.clone(),
            });
        }
        for (j, contact) in supplier.contacts.iter().enumerate() {
            if is_blank(&contact.contact_name) {
                return Err(blank(EntityKind::Contact));
            }
            if supplier.contacts[..j]
                .iter()
                .any(|c| c.contact_name == contact.contact_name)
            {
                return Err(DocumentError::DuplicateContact {
                    category: category.to_owned(),
                    supplier: supplier.name.clone(),
                    contact: contact.contact_name.clone(),
                });
            }
        }
    }
    Ok(())
}
