//! Validation and application of directory mutations.
//!
//! Follows a decide/apply split: [`Directory::handle`] checks a
//! [`DirectoryCommand`] against the current state and returns the
//! [`DirectoryEvent`] describing the accepted change, and
//! [`Directory::apply`] folds that event into the next state.
//!
//! # Contract
//!
//! - `handle` is a pure decision function: no I/O, no mutation of `self`.
//!   Checks run in a fixed order: blank names (`InvalidArgument`), then
//!   missing ancestors outermost first (`NotFound`), then collisions
//!   (`DuplicateKey`).
//! - `apply` is total. An event whose target no longer exists leaves the
//!   state unchanged.
//! - Names are compared exactly and case-sensitively. Nothing is trimmed
//!   here; see [`DirectoryHandle`](crate::DirectoryHandle) for that.

use crate::command::DirectoryCommand;
use crate::error::{DirectoryError, EntityKind};
use crate::model::{Contact, Directory, Supplier};

/// An accepted change to the directory. Only produced by
/// [`Directory::handle`], so every event applied has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DirectoryEvent {
    CategoryAdded {
        name: String,
    },
    /// The category and everything it owned were removed.
    CategoryRemoved {
        name: String,
    },
    SupplierAdded {
        category: String,
        supplier: Supplier,
    },
    /// The supplier and its contacts were removed.
    SupplierRemoved {
        category: String,
        name: String,
    },
    SupplierUpdated {
        category: String,
        old_name: String,
        name: String,
        emails: Vec<String>,
        phones: Vec<String>,
    },
    ContactAdded {
        category: String,
        supplier: String,
        contact: Contact,
    },
    ContactRemoved {
        category: String,
        supplier: String,
        contact_name: String,
    },
    ContactUpdated {
        category: String,
        supplier: String,
        old_contact_name: String,
        contact: Contact,
    },
}

impl DirectoryEvent {
    /// Event type name, as used in log lines.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::CategoryAdded { .. } => "CategoryAdded",
            Self::CategoryRemoved { .. } => "CategoryRemoved",
            Self::SupplierAdded { .. } => "SupplierAdded",
            Self::SupplierRemoved { .. } => "SupplierRemoved",
            Self::SupplierUpdated { .. } => "SupplierUpdated",
            Self::ContactAdded { .. } => "ContactAdded",
            Self::ContactRemoved { .. } => "ContactRemoved",
            Self::ContactUpdated { .. } => "ContactUpdated",
        }
    }
}

impl Directory {
    /// Validate a command against the current state.
    ///
    /// # Errors
    ///
    /// * [`DirectoryError::InvalidArgument`] -- a name being introduced is blank.
    /// * [`DirectoryError::NotFound`] -- a referenced entity does not exist.
    /// * [`DirectoryError::DuplicateKey`] -- a name collides within its scope.
    pub(crate) fn handle(&self, cmd: DirectoryCommand) -> Result<DirectoryEvent, DirectoryError> {
        match cmd {
            DirectoryCommand::AddCategory { name } => {
                require_name(EntityKind::Category, &name)?;
                if self.contains_category(&name) {
                    return Err(DirectoryError::duplicate(EntityKind::Category, name));
                }
                Ok(DirectoryEvent::CategoryAdded { name })
            }

            DirectoryCommand::RemoveCategory { name } => {
                self.require_category(&name)?;
                Ok(DirectoryEvent::CategoryRemoved { name })
            }

            DirectoryCommand::AddSupplier { category, supplier } => {
                require_name(EntityKind::Supplier, &supplier.name)?;
                for contact in &supplier.contacts {
                    require_name(EntityKind::Contact, &contact.contact_name)?;
                }
                let siblings = self.require_category(&category)?;
                if siblings.iter().any(|s| s.name == supplier.name) {
                    return Err(DirectoryError::duplicate(
                        EntityKind::Supplier,
                        supplier.name,
                    ));
                }
                if let Some(dup) = first_duplicate_contact(&supplier.contacts) {
                    return Err(DirectoryError::duplicate(EntityKind::Contact, dup));
                }
                Ok(DirectoryEvent::SupplierAdded { category, supplier })
            }

            DirectoryCommand::RemoveSupplier {
                category,
                supplier_name,
            } => {
                self.require_supplier(&category, &supplier_name)?;
                Ok(DirectoryEvent::SupplierRemoved {
                    category,
                    name: supplier_name,
                })
            }

            DirectoryCommand::UpdateSupplier {
                category,
                old_name,
                new_name,
                new_emails,
                new_phones,
            } => {
                require_name(EntityKind::Supplier, &new_name)?;
                self.require_supplier(&category, &old_name)?;
                if new_name != old_name && self.supplier(&category, &new_name).is_some() {
                    return Err(DirectoryError::duplicate(EntityKind::Supplier, new_name));
                }
                Ok(DirectoryEvent::SupplierUpdated {
                    category,
                    old_name,
                    name: new_name,
                    emails: new_emails,
                    phones: new_phones,
                })
            }

            DirectoryCommand::AddContact {
                category,
                supplier_name,
                contact,
            } => {
                require_name(EntityKind::Contact, &contact.contact_name)?;
                let supplier = self.require_supplier(&category, &supplier_name)?;
                if supplier.contact(&contact.contact_name).is_some() {
                    return Err(DirectoryError::duplicate(
                        EntityKind::Contact,
                        contact.contact_name,
                    ));
                }
                Ok(DirectoryEvent::ContactAdded {
                    category,
                    supplier: supplier_name,
                    contact,
                })
            }

            DirectoryCommand::RemoveContact {
                category,
                supplier_name,
                contact_name,
            } => {
                let supplier = self.require_supplier(&category, &supplier_name)?;
                if supplier.contact(&contact_name).is_none() {
                    return Err(DirectoryError::not_found(EntityKind::Contact, contact_name));
                }
                Ok(DirectoryEvent::ContactRemoved {
                    category,
                    supplier: supplier_name,
                    contact_name,
                })
            }

            DirectoryCommand::UpdateContact {
                category,
                supplier_name,
                old_contact_name,
                new_contact_name,
                new_email,
                new_phone,
            } => {
                require_name(EntityKind::Contact, &new_contact_name)?;
                let supplier = self.require_supplier(&category, &supplier_name)?;
                if supplier.contact(&old_contact_name).is_none() {
                    return Err(DirectoryError::not_found(
                        EntityKind::Contact,
                        old_contact_name,
                    ));
                }
                if new_contact_name != old_contact_name
                    && supplier.contact(&new_contact_name).is_some()
                {
                    return Err(DirectoryError::duplicate(
                        EntityKind::Contact,
                        new_contact_name,
                    ));
                }
                Ok(DirectoryEvent::ContactUpdated {
                    category,
                    supplier: supplier_name,
                    old_contact_name,
                    contact: Contact::new(new_contact_name, new_email, new_phone),
                })
            }
        }
    }

    /// Fold an accepted event into the next state.
    pub(crate) fn apply(mut self, event: &DirectoryEvent) -> Self {
        match event {
            DirectoryEvent::CategoryAdded { name } => {
                self.categories.entry(name.clone()).or_default();
            }
            DirectoryEvent::CategoryRemoved { name } => {
                // Suppliers and their contacts are owned by the entry.
                self.categories.shift_remove(name);
            }
            DirectoryEvent::SupplierAdded { category, supplier } => {
                if let Some(list) = self.categories.get_mut(category) {
                    list.push(supplier.clone());
                }
            }
            DirectoryEvent::SupplierRemoved { category, name } => {
                if let Some(list) = self.categories.get_mut(category) {
                    list.retain(|s| &s.name != name);
                }
            }
            DirectoryEvent::SupplierUpdated {
                category,
                old_name,
                name,
                emails,
                phones,
            } => {
                if let Some(s) = self.supplier_mut(category, old_name) {
                    s.name.clone_from(name);
                    s.emails.clone_from(emails);
                    s.phones.clone_from(phones);
                }
            }
            DirectoryEvent::ContactAdded {
                category,
                supplier,
                contact,
            } => {
                if let Some(s) = self.supplier_mut(category, supplier) {
                    s.contacts.push(contact.clone());
                }
            }
            DirectoryEvent::ContactRemoved {
                category,
                supplier,
                contact_name,
            } => {
                if let Some(s) = self.supplier_mut(category, supplier) {
                    s.contacts.retain(|c| &c.contact_name != contact_name);
                }
            }
            DirectoryEvent::ContactUpdated {
                category,
                supplier,
                old_contact_name,
                contact,
            } => {
                if let Some(s) = self.supplier_mut(category, supplier)
                    && let Some(i) = s.contact_position(old_contact_name)
                {
                    s.contacts[i] = contact.clone();
                }
            }
        }
        self
    }

    /// Validate and apply a command, returning the next state.
    ///
    /// `self` is left untouched whether or not the command is accepted.
    pub fn execute(&self, cmd: DirectoryCommand) -> Result<Directory, DirectoryError> {
        let event = self.handle(cmd)?;
        Ok(self.clone().apply(&event))
    }

    /// Append a new, empty category.
    pub fn add_category(&self, name: &str) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::AddCategory {
            name: name.to_owned(),
        })
    }

    /// Remove a category together with all of its suppliers and contacts.
    pub fn remove_category(&self, name: &str) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::RemoveCategory {
            name: name.to_owned(),
        })
    }

    /// Append a supplier to `category`, keeping its contact list as given.
    pub fn add_supplier(
        &self,
        category: &str,
        supplier: Supplier,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::AddSupplier {
            category: category.to_owned(),
            supplier,
        })
    }

    /// Remove a supplier together with its contacts.
    pub fn remove_supplier(
        &self,
        category: &str,
        supplier_name: &str,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::RemoveSupplier {
            category: category.to_owned(),
            supplier_name: supplier_name.to_owned(),
        })
    }

    /// Replace a supplier's name, emails and phones in place. Position and
    /// contacts are preserved.
    pub fn update_supplier(
        &self,
        category: &str,
        old_name: &str,
        new_name: &str,
        new_emails: Vec<String>,
        new_phones: Vec<String>,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::UpdateSupplier {
            category: category.to_owned(),
            old_name: old_name.to_owned(),
            new_name: new_name.to_owned(),
            new_emails,
            new_phones,
        })
    }

    pub fn add_contact(
        &self,
        category: &str,
        supplier_name: &str,
        contact: Contact,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::AddContact {
            category: category.to_owned(),
            supplier_name: supplier_name.to_owned(),
            contact,
        })
    }

    pub fn remove_contact(
        &self,
        category: &str,
        supplier_name: &str,
        contact_name: &str,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::RemoveContact {
            category: category.to_owned(),
            supplier_name: supplier_name.to_owned(),
            contact_name: contact_name.to_owned(),
        })
    }

    /// Replace a contact's fields in place, preserving its position.
    pub fn update_contact(
        &self,
        category: &str,
        supplier_name: &str,
        old_contact_name: &str,
        new_contact: Contact,
    ) -> Result<Directory, DirectoryError> {
        self.execute(DirectoryCommand::UpdateContact {
            category: category.to_owned(),
            supplier_name: supplier_name.to_owned(),
            old_contact_name: old_contact_name.to_owned(),
            new_contact_name: new_contact.contact_name,
            new_email: new_contact.email,
            new_phone: new_contact.phone,
        })
    }

    fn require_category(&self, category: &str) -> Result<&[Supplier], DirectoryError> {
        self.suppliers(category)
            .ok_or_else(|| DirectoryError::not_found(EntityKind::Category, category))
    }

    fn require_supplier(
        &self,
        category: &str,
        supplier_name: &str,
    ) -> Result<&Supplier, DirectoryError> {
        self.require_category(category)?
            .iter()
            .find(|s| s.name == supplier_name)
            .ok_or_else(|| DirectoryError::not_found(EntityKind::Supplier, supplier_name))
    }
}

fn require_name(kind: EntityKind, name: &str) -> Result<(), DirectoryError> {
    if name.trim().is_empty() {
        return Err(DirectoryError::InvalidArgument {
            kind,
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn first_duplicate_contact(contacts: &[Contact]) -> Option<&str> {
    contacts.iter().enumerate().find_map(|(i, c)| {
        contacts[..i]
            .iter()
            .any(|prev| prev.contact_name == c.contact_name)
            .then_some(c.contact_name.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Supplier {
        Supplier::new("Acme")
            .with_emails(["a@x.com"])
            .with_phones(["123"])
    }

    /// `{categories: ["A"], suppliers: {"A": []}}`
    fn with_category_a() -> Directory {
        Directory::default()
            .add_category("A")
            .expect("add_category should succeed")
    }

    fn with_acme_and_bob() -> Directory {
        with_category_a()
            .add_supplier("A", acme())
            .and_then(|d| d.add_contact("A", "Acme", Contact::new("Bob", "b@x.com", "555")))
            .expect("setup should succeed")
    }

    #[test]
    fn add_category_appends_in_insertion_order() {
        let dir = Directory::default()
            .add_category("Zeta")
            .and_then(|d| d.add_category("Alpha"))
            .and_then(|d| d.add_category("alpha"))
            .expect("distinct names should be accepted");
        assert_eq!(dir.categories().collect::<Vec<_>>(), ["Zeta", "Alpha", "alpha"]);
        assert_eq!(dir.suppliers("Alpha"), Some(&[][..]));
    }

    #[test]
    fn add_category_twice_is_duplicate_key() {
        let dir = Directory::default()
            .add_category("Electronics")
            .expect("first add should succeed");
        let err = dir.add_category("Electronics").unwrap_err();
        assert_eq!(
            err,
            DirectoryError::duplicate(EntityKind::Category, "Electronics")
        );
    }

    #[test]
    fn add_then_remove_category_restores_prior_state() {
        let before = with_acme_and_bob();
        let after = before
            .add_category("Temporary")
            .and_then(|d| d.remove_category("Temporary"))
            .expect("round-trip should succeed");
        assert_eq!(after, before);
    }

    #[test]
    fn remove_category_cascades() {
        let dir = with_acme_and_bob()
            .remove_category("A")
            .expect("remove should succeed");
        assert!(dir.is_empty());
        assert!(dir.supplier("A", "Acme").is_none());

        let json = serde_json::to_string(&dir).expect("serialize");
        assert!(!json.contains("Acme"));
        assert!(!json.contains("Bob"));
    }

    #[test]
    fn remove_missing_category_is_not_found() {
        let err = with_category_a().remove_category("B").unwrap_err();
        assert_eq!(err, DirectoryError::not_found(EntityKind::Category, "B"));
    }

    #[test]
    fn blank_names_are_invalid_arguments() {
        let dir = with_category_a();
        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                dir.add_category(name),
                Err(DirectoryError::InvalidArgument {
                    kind: EntityKind::Category,
                    ..
                })
            ));
        }
        assert!(matches!(
            dir.add_supplier("A", Supplier::new(" ")),
            Err(DirectoryError::InvalidArgument {
                kind: EntityKind::Supplier,
                ..
            })
        ));
        // Blank name is reported before the missing category.
        assert!(matches!(
            dir.add_supplier("missing", Supplier::new("")),
            Err(DirectoryError::InvalidArgument { .. })
        ));

        let nested = Supplier::new("Acme").with_contact(Contact::new("  ", "b@x.com", ""));
        assert!(matches!(
            dir.add_supplier("A", nested),
            Err(DirectoryError::InvalidArgument {
                kind: EntityKind::Contact,
                ..
            })
        ));

        let dir = dir.add_supplier("A", acme()).expect("add_supplier should succeed");
        assert!(matches!(
            dir.update_supplier("A", "Acme", " \t", vec![], vec![]),
            Err(DirectoryError::InvalidArgument {
                kind: EntityKind::Supplier,
                ..
            })
        ));
        assert!(matches!(
            dir.update_supplier("missing", "Acme", "", vec![], vec![]),
            Err(DirectoryError::InvalidArgument { .. })
        ));
        assert_eq!(dir.supplier("A", "Acme"), Some(&acme()));
    }

    #[test]
    fn store_does_not_trim_names() {
        let dir = with_category_a()
            .add_category(" A ")
            .expect("padded name is a distinct category");
        assert_eq!(dir.len(), 2);
        assert!(dir.contains_category(" A "));
    }

    #[test]
    fn scenario_add_supplier_contact_then_remove_supplier() {
        let dir = with_category_a()
            .add_supplier("A", acme())
            .expect("add_supplier should succeed");
        let suppliers = dir.suppliers("A").expect("category A exists");
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name, "Acme");

        let dir = dir
            .add_contact("A", "Acme", Contact::new("Bob", "b@x.com", "555"))
            .expect("add_contact should succeed");
        let acme = dir.supplier("A", "Acme").expect("Acme exists");
        assert_eq!(acme.contacts, vec![Contact::new("Bob", "b@x.com", "555")]);

        let dir = dir
            .remove_supplier("A", "Acme")
            .expect("remove_supplier should succeed");
        assert_eq!(dir.suppliers("A"), Some(&[][..]));
        assert!(!serde_json::to_string(&dir).expect("serialize").contains("Bob"));
    }

    #[test]
    fn add_supplier_to_missing_category_is_not_found() {
        let err = Directory::default().add_supplier("A", acme()).unwrap_err();
        assert_eq!(err, DirectoryError::not_found(EntityKind::Category, "A"));
    }

    #[test]
    fn add_supplier_duplicate_within_category_only() {
        let dir = with_category_a()
            .add_category("B")
            .and_then(|d| d.add_supplier("A", acme()))
            .expect("setup should succeed");

        let err = dir.add_supplier("A", Supplier::new("Acme")).unwrap_err();
        assert_eq!(err, DirectoryError::duplicate(EntityKind::Supplier, "Acme"));

        let dir = dir
            .add_supplier("B", Supplier::new("Acme"))
            .expect("same name in another category is allowed");
        assert!(dir.supplier("B", "Acme").is_some());
    }

    #[test]
    fn add_supplier_keeps_given_contacts() {
        let supplier = acme()
            .with_contact(Contact::new("Bob", "", ""))
            .with_contact(Contact::new("Ann", "", ""));
        let dir = with_category_a()
            .add_supplier("A", supplier.clone())
            .expect("add_supplier should succeed");
        assert_eq!(dir.supplier("A", "Acme"), Some(&supplier));
    }

    #[test]
    fn add_supplier_rejects_duplicate_contacts_in_payload() {
        let supplier = acme()
            .with_contact(Contact::new("Bob", "", ""))
            .with_contact(Contact::new("Bob", "x", "y"));
        let err = with_category_a().add_supplier("A", supplier).unwrap_err();
        assert_eq!(err, DirectoryError::duplicate(EntityKind::Contact, "Bob"));
    }

    #[test]
    fn remove_supplier_missing_ancestor_or_supplier() {
        let dir = with_category_a();
        assert_eq!(
            dir.remove_supplier("X", "Acme").unwrap_err(),
            DirectoryError::not_found(EntityKind::Category, "X")
        );
        assert_eq!(
            dir.remove_supplier("A", "Acme").unwrap_err(),
            DirectoryError::not_found(EntityKind::Supplier, "Acme")
        );
    }

    #[test]
    fn update_supplier_preserves_position_and_contacts() {
        let dir = with_acme_and_bob()
            .add_supplier("A", Supplier::new("Globex"))
            .and_then(|d| {
                d.update_supplier(
                    "A",
                    "Acme",
                    "Acme Ltd",
                    vec!["sales@acme.example".into()],
                    vec![],
                )
            })
            .expect("update should succeed");

        let suppliers = dir.suppliers("A").expect("category A exists");
        assert_eq!(suppliers[0].name, "Acme Ltd");
        assert_eq!(suppliers[0].emails, vec!["sales@acme.example"]);
        assert!(suppliers[0].phones.is_empty());
        assert_eq!(suppliers[0].contacts, vec![Contact::new("Bob", "b@x.com", "555")]);
        assert_eq!(suppliers[1].name, "Globex");
    }

    #[test]
    fn update_missing_supplier_is_not_found_and_leaves_state() {
        let dir = with_category_a();
        let snapshot = dir.clone();
        let err = dir
            .update_supplier("A", "Nobody", "Somebody", vec![], vec![])
            .unwrap_err();
        assert_eq!(err, DirectoryError::not_found(EntityKind::Supplier, "Nobody"));
        assert_eq!(dir, snapshot);
    }

    #[test]
    fn rename_supplier_to_sibling_is_duplicate_but_to_self_succeeds() {
        let dir = with_category_a()
            .add_supplier("A", acme())
            .and_then(|d| d.add_supplier("A", Supplier::new("Globex")))
            .expect("setup should succeed");

        let err = dir
            .update_supplier("A", "Acme", "Globex", vec![], vec![])
            .unwrap_err();
        assert_eq!(err, DirectoryError::duplicate(EntityKind::Supplier, "Globex"));

        let dir = dir
            .update_supplier("A", "Acme", "Acme", vec!["new@acme.example".into()], vec![])
            .expect("renaming to the same name never collides");
        assert_eq!(
            dir.supplier("A", "Acme").map(|s| s.emails.clone()),
            Some(vec!["new@acme.example".to_owned()])
        );
    }

    #[test]
    fn add_contact_duplicate_and_missing_supplier() {
        let dir = with_acme_and_bob();
        assert_eq!(
            dir.add_contact("A", "Acme", Contact::new("Bob", "other", "other"))
                .unwrap_err(),
            DirectoryError::duplicate(EntityKind::Contact, "Bob")
        );
        assert_eq!(
            dir.add_contact("A", "Globex", Contact::new("Bob", "", ""))
                .unwrap_err(),
            DirectoryError::not_found(EntityKind::Supplier, "Globex")
        );
    }

    #[test]
    fn remove_contact_removes_only_that_contact() {
        let dir = with_acme_and_bob()
            .add_contact("A", "Acme", Contact::new("Ann", "", ""))
            .and_then(|d| d.remove_contact("A", "Acme", "Bob"))
            .expect("remove should succeed");
        let acme = dir.supplier("A", "Acme").expect("Acme exists");
        assert_eq!(acme.contacts, vec![Contact::new("Ann", "", "")]);

        assert_eq!(
            dir.remove_contact("A", "Acme", "Bob").unwrap_err(),
            DirectoryError::not_found(EntityKind::Contact, "Bob")
        );
    }

    #[test]
    fn update_contact_in_place() {
        let dir = with_acme_and_bob()
            .add_contact("A", "Acme", Contact::new("Ann", "", ""))
            .and_then(|d| {
                d.update_contact("A", "Acme", "Bob", Contact::new("Robert", "r@x.com", "556"))
            })
            .expect("update should succeed");
        let acme = dir.supplier("A", "Acme").expect("Acme exists");
        assert_eq!(
            acme.contacts,
            vec![
                Contact::new("Robert", "r@x.com", "556"),
                Contact::new("Ann", "", "")
            ]
        );
    }

    #[test]
    fn update_contact_collisions_and_self_rename() {
        let dir = with_acme_and_bob()
            .add_contact("A", "Acme", Contact::new("Ann", "", ""))
            .expect("setup should succeed");

        assert_eq!(
            dir.update_contact("A", "Acme", "Bob", Contact::new("Ann", "", ""))
                .unwrap_err(),
            DirectoryError::duplicate(EntityKind::Contact, "Ann")
        );
        assert_eq!(
            dir.update_contact("A", "Acme", "Zed", Contact::new("Zed2", "", ""))
                .unwrap_err(),
            DirectoryError::not_found(EntityKind::Contact, "Zed")
        );

        let dir = dir
            .update_contact("A", "Acme", "Bob", Contact::new("Bob", "new@x.com", ""))
            .expect("same-name update never collides");
        assert_eq!(
            dir.supplier("A", "Acme")
                .and_then(|s| s.contact("Bob"))
                .map(|c| c.email.as_str()),
            Some("new@x.com")
        );
    }

    #[test]
    fn handle_then_apply_matches_execute() {
        let dir = with_category_a();
        let cmd = DirectoryCommand::AddSupplier {
            category: "A".into(),
            supplier: acme(),
        };
        let event = dir.handle(cmd.clone()).expect("handle should succeed");
        assert_eq!(
            event,
            DirectoryEvent::SupplierAdded {
                category: "A".into(),
                supplier: acme()
            }
        );
        assert_eq!(dir.clone().apply(&event), dir.execute(cmd).expect("execute"));
    }

    #[test]
    fn apply_ignores_events_for_missing_targets() {
        let dir = with_category_a();
        let next = dir.clone().apply(&DirectoryEvent::ContactRemoved {
            category: "Z".into(),
            supplier: "Acme".into(),
            contact_name: "Bob".into(),
        });
        assert_eq!(next, dir);
    }
}
