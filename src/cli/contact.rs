//! kb contact command implementations.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::{Contact, ContactId};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub async fn run_add(
    ctx: Context,
    options: OutputOptions,
    name: String,
    mail: String,
    phone: String,
) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let id = repo.add_contact(name, mail, phone).await?;
    let contact = repo.contact(id).ok_or(Error::ContactNotFound(id.0))?;

    let mut human = HumanOutput::new("Contact successfully created");
    human.push_summary("name", contact.name.clone());
    human.push_summary("id", id.to_string());

    emit_success(options, "contact add", contact, Some(&human))
}

pub async fn run_edit(
    ctx: Context,
    options: OutputOptions,
    id: Uuid,
    name: Option<String>,
    mail: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let contact_id = ContactId(id);
    let current = repo.contact(contact_id).ok_or(Error::ContactNotFound(id))?;

    let name = name.unwrap_or_else(|| current.name.clone());
    let mail = mail.unwrap_or_else(|| current.mail.clone());
    let phone = phone.unwrap_or_else(|| current.phone.clone());
    repo.update_contact(contact_id, name, mail, phone).await?;

    let contact = repo
        .contact(contact_id)
        .ok_or(Error::ContactNotFound(id))?;
    let mut human = HumanOutput::new("Contact changes saved");
    human.push_summary("name", contact.name.clone());

    emit_success(options, "contact edit", contact, Some(&human))
}

#[derive(Serialize)]
struct ContactListBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    contacts: Vec<Contact>,
}

pub fn run_list(ctx: Context, options: OutputOptions, prefix: Option<String>) -> Result<()> {
    let contacts: Vec<Contact> = match &prefix {
        Some(prefix) => ctx
            .repo
            .contacts_with_prefix(prefix)
            .into_iter()
            .cloned()
            .collect(),
        None => ctx.repo.contacts().to_vec(),
    };

    let mut human = HumanOutput::new(format!("Contacts ({})", contacts.len()));
    // The book is sorted by name; group entries under letter headers.
    let mut current_letter = None;
    for contact in &contacts {
        let letter = contact
            .name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?');
        if current_letter != Some(letter) {
            current_letter = Some(letter);
            human.push_detail(format!("{letter}"));
        }
        human.push_detail(format!(
            "  [{}] {} <{}> {}  {}",
            contact.initials(),
            contact.name,
            contact.mail,
            contact.phone,
            contact.id
        ));
    }

    emit_success(
        options,
        "contact list",
        &ContactListBody { prefix, contacts },
        Some(&human),
    )
}

#[derive(Serialize)]
struct DeletedBody {
    contact: ContactId,
}

pub async fn run_rm(ctx: Context, options: OutputOptions, id: Uuid) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let contact_id = ContactId(id);
    repo.delete_contact(contact_id).await?;

    let human = HumanOutput::new("Contact deleted");
    emit_success(
        options,
        "contact rm",
        &DeletedBody {
            contact: contact_id,
        },
        Some(&human),
    )
}
