//! Mutation commands and the by-name request envelope.
//!
//! [`DirectoryCommand`] is what the directory validates and applies.
//! [`CommandRequest`] is the boundary form a presentation layer sends: the
//! command name plus camelCase arguments, exactly as the front-end invokes
//! them (`{"command": "add_category", "catName": "Electronics"}`).

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::model::{Contact, Directory, Supplier};

/// One mutation against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCommand {
    AddCategory {
        name: String,
    },
    RemoveCategory {
        name: String,
    },
    AddSupplier {
        category: String,
        supplier: Supplier,
    },
    RemoveSupplier {
        category: String,
        supplier_name: String,
    },
    UpdateSupplier {
        category: String,
        old_name: String,
        new_name: String,
        new_emails: Vec<String>,
        new_phones: Vec<String>,
    },
    AddContact {
        category: String,
        supplier_name: String,
        contact: Contact,
    },
    RemoveContact {
        category: String,
        supplier_name: String,
        contact_name: String,
    },
    UpdateContact {
        category: String,
        supplier_name: String,
        old_contact_name: String,
        new_contact_name: String,
        new_email: String,
        new_phone: String,
    },
}

impl DirectoryCommand {
    /// Gateway command name, used for spans and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddCategory { .. } => "add_category",
            Self::RemoveCategory { .. } => "remove_category",
            Self::AddSupplier { .. } => "add_supplier",
            Self::RemoveSupplier { .. } => "remove_supplier",
            Self::UpdateSupplier { .. } => "update_supplier",
            Self::AddContact { .. } => "add_contact",
            Self::RemoveContact { .. } => "remove_contact",
            Self::UpdateContact { .. } => "update_contact",
        }
    }

    /// Trim surrounding whitespace from every name this command introduces.
    ///
    /// Lookup keys (the names of existing entities) are left untouched.
    pub(crate) fn trim_names(self) -> Self {
        match self {
            Self::AddCategory { name } => Self::AddCategory { name: trimmed(name) },
            Self::AddSupplier {
                category,
                mut supplier,
            } => {
                supplier.name = trimmed(supplier.name);
                for contact in &mut supplier.contacts {
                    contact.contact_name = trimmed(std::mem::take(&mut contact.contact_name));
                }
                Self::AddSupplier { category, supplier }
            }
            Self::UpdateSupplier {
                category,
                old_name,
                new_name,
                new_emails,
                new_phones,
            } => Self::UpdateSupplier {
                category,
                old_name,
                new_name: trimmed(new_name),
                new_emails,
                new_phones,
            },
            Self::AddContact {
                category,
                supplier_name,
                mut contact,
            } => {
                contact.contact_name = trimmed(contact.contact_name);
                Self::AddContact {
                    category,
                    supplier_name,
                    contact,
                }
            }
            Self::UpdateContact {
                category,
                supplier_name,
                old_contact_name,
                new_contact_name,
                new_email,
                new_phone,
            } => Self::UpdateContact {
                category,
                supplier_name,
                old_contact_name,
                new_contact_name: trimmed(new_contact_name),
                new_email,
                new_phone,
            },
            other => other,
        }
    }
}

fn trimmed(s: String) -> String {
    s.trim().to_owned()
}

/// A gateway command addressed by name, as sent by a presentation layer.
///
/// Every argument is required. Updates replace all fields, so an omitted
/// field is a malformed request rather than an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandRequest {
    ReadDbFile,
    #[serde(rename_all = "camelCase")]
    AddCategory { cat_name: String },
    #[serde(rename_all = "camelCase")]
    RemoveCategory { cat_name: String },
    #[serde(rename_all = "camelCase")]
    AddSupplier { cat_name: String, supplier: Supplier },
    #[serde(rename_all = "camelCase")]
    RemoveSupplier {
        cat_name: String,
        supplier_name: String,
    },
    #[serde(rename_all = "camelCase")]
    UpdateSupplier {
        cat_name: String,
        old_name: String,
        new_name: String,
        new_emails: Vec<String>,
        new_telefoane: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddContact {
        cat_name: String,
        supplier_name: String,
        contact: Contact,
    },
    #[serde(rename_all = "camelCase")]
    RemoveContact {
        cat_name: String,
        supplier_name: String,
        contact_name: String,
    },
    #[serde(rename_all = "camelCase")]
    UpdateContact {
        cat_name: String,
        supplier_name: String,
        old_contact_name: String,
        new_contact_name: String,
        new_email: String,
        new_phone: String,
    },
}

impl CommandRequest {
    /// The mutation this request carries, or `None` for `read_db_file`.
    pub fn into_command(self) -> Option<DirectoryCommand> {
        let cmd = match self {
            Self::ReadDbFile => return None,
            Self::AddCategory { cat_name } => DirectoryCommand::AddCategory { name: cat_name },
            Self::RemoveCategory { cat_name } => {
                DirectoryCommand::RemoveCategory { name: cat_name }
            }
            Self::AddSupplier { cat_name, supplier } => DirectoryCommand::AddSupplier {
                category: cat_name,
                supplier,
            },
            Self::RemoveSupplier {
                cat_name,
                supplier_name,
            } => DirectoryCommand::RemoveSupplier {
                category: cat_name,
                supplier_name,
            },
            Self::UpdateSupplier {
                cat_name,
                old_name,
                new_name,
                new_emails,
                new_telefoane,
            } => DirectoryCommand::UpdateSupplier {
                category: cat_name,
                old_name,
                new_name,
                new_emails,
                new_phones: new_telefoane,
            },
            Self::AddContact {
                cat_name,
                supplier_name,
                contact,
            } => DirectoryCommand::AddContact {
                category: cat_name,
                supplier_name,
                contact,
            },
            Self::RemoveContact {
                cat_name,
                supplier_name,
                contact_name,
            } => DirectoryCommand::RemoveContact {
                category: cat_name,
                supplier_name,
                contact_name,
            },
            Self::UpdateContact {
                cat_name,
                supplier_name,
                old_contact_name,
                new_contact_name,
                new_email,
                new_phone,
            } => DirectoryCommand::UpdateContact {
                category: cat_name,
                supplier_name,
                old_contact_name,
                new_contact_name,
                new_email,
                new_phone,
            },
        };
        Some(cmd)
    }
}

/// Reply to a [`CommandRequest`]: `{"ok": <snapshot>}` or
/// `{"error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResponse {
    Ok(Directory),
    Error(CommandError),
}

impl From<Result<Directory, CommandError>> for CommandResponse {
    fn from(result: Result<Directory, CommandError>) -> Self {
        match result {
            Ok(directory) => Self::Ok(directory),
            Err(err) => Self::Error(err),
        }
    }
}
