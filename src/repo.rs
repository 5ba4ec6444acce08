//! Domain repository for kb.
//!
//! Owns the three collections (users, contacts, tasks) for the process
//! lifetime: hydrated from the remote store once at startup, mutated in
//! memory, and pushed back after every mutation. Persistence is always the
//! entire owning collection, never a delta; the store has no per-record
//! granularity. That keeps writes simple at the cost of write
//! amplification, and two sessions mutating the same collection can lose
//! each other's writes (last whole-document write wins). Within one
//! session, mutations are sequenced because every mutating method awaits
//! its persist before returning.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::model::{contact_color, Contact, ContactId, Status, Task, TaskId, User};
use crate::store::StoreBackend;

/// In-memory collections synchronized against the remote store.
pub struct Repository<S> {
    store: S,
    users_key: String,
    tasks_key: String,
    contacts_key: String,
    users: Vec<User>,
    tasks: Vec<Task>,
    contacts: Vec<Contact>,
}

fn decode_collection<T: DeserializeOwned>(value: Option<Value>) -> Result<Vec<T>> {
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

impl<S: StoreBackend> Repository<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        Self {
            store,
            users_key: config.users_key.clone(),
            tasks_key: config.tasks_key.clone(),
            contacts_key: config.contacts_key.clone(),
            users: Vec::new(),
            tasks: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Hydrate all three collections in parallel. A key with no data yet
    /// yields an empty collection; transport errors are surfaced.
    pub async fn load(&mut self) -> Result<()> {
        let (users, tasks, contacts) = tokio::join!(
            self.store.get_item(&self.users_key),
            self.store.get_item(&self.tasks_key),
            self.store.get_item(&self.contacts_key),
        );
        self.users = decode_collection(users?)?;
        self.tasks = decode_collection(tasks?)?;
        self.contacts = decode_collection(contacts?)?;
        tracing::debug!(
            users = self.users.len(),
            tasks = self.tasks.len(),
            contacts = self.contacts.len(),
            "collections loaded"
        );
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    /// Case-insensitive prefix match on contact names, used to narrow the
    /// assignment picker. A view filter only.
    pub fn contacts_with_prefix(&self, input: &str) -> Vec<&Contact> {
        let needle = input.to_lowercase();
        self.contacts
            .iter()
            .filter(|contact| contact.name.to_lowercase().starts_with(&needle))
            .collect()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Insert a new task, or replace the stored task with the same id.
    pub async fn commit_task(&mut self, task: Task) -> Result<TaskId> {
        let id = task.id;
        match self.tasks.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        self.persist_tasks().await?;
        Ok(id)
    }

    pub async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id.0))?;
        self.tasks.remove(index);
        self.persist_tasks().await
    }

    /// The lane transition: any lane may move to any other lane directly.
    pub async fn move_task(&mut self, id: TaskId, status: Status) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id.0))?;
        let from = task.status;
        task.status = status;
        tracing::info!(task = %id, %from, to = %status, "task moved");
        self.persist_tasks().await
    }

    /// Flip a committed task's subtask between complete and incomplete.
    /// An out-of-range index is ignored; it never touches another subtask.
    pub async fn toggle_subtask(&mut self, id: TaskId, index: usize) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id.0))?;
        match task.subtasks.get_mut(index) {
            Some(subtask) => subtask.is_complete = !subtask.is_complete,
            None => return Ok(()),
        }
        self.persist_tasks().await
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Add a contact. The icon color is fixed at creation, cycling the
    /// palette by contact count.
    pub async fn add_contact(
        &mut self,
        name: impl Into<String>,
        mail: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<ContactId> {
        let contact = Contact {
            id: ContactId::new(),
            name: name.into(),
            mail: mail.into(),
            phone: phone.into(),
            color: contact_color(self.contacts.len()).to_string(),
        };
        let id = contact.id;
        self.contacts.push(contact);
        self.sort_contacts();
        self.persist_contacts().await?;
        Ok(id)
    }

    /// Overwrite a contact's fields, keeping its creation color.
    pub async fn update_contact(
        &mut self,
        id: ContactId,
        name: impl Into<String>,
        mail: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<()> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or(Error::ContactNotFound(id.0))?;
        contact.name = name.into();
        contact.mail = mail.into();
        contact.phone = phone.into();
        self.sort_contacts();
        self.persist_contacts().await
    }

    /// Remove a contact. Tasks keep any reference to it; those resolve to
    /// "no contact" at read time.
    pub async fn delete_contact(&mut self, id: ContactId) -> Result<()> {
        let index = self
            .contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or(Error::ContactNotFound(id.0))?;
        self.contacts.remove(index);
        self.persist_contacts().await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn register_user(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<()> {
        self.users.push(User {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        });
        self.persist_users().await
    }

    /// Credential lookup. `None` means wrong password or unknown email;
    /// the caller decides how to present that.
    pub fn login(&self, email: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.email == email && user.password == password)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    pub async fn reset_password(
        &mut self,
        email: &str,
        new_password: impl Into<String>,
    ) -> Result<()> {
        let user = self
            .users
            .iter_mut()
            .find(|user| user.email == email)
            .ok_or_else(|| Error::UnknownAccount(email.to_string()))?;
        user.password = new_password.into();
        self.persist_users().await
    }

    // =========================================================================
    // Persistence (always the whole collection)
    // =========================================================================

    async fn persist_tasks(&self) -> Result<()> {
        let value = serde_json::to_value(&self.tasks)?;
        self.store.set_item(&self.tasks_key, value).await?;
        tracing::debug!(count = self.tasks.len(), "tasks persisted");
        Ok(())
    }

    async fn persist_contacts(&self) -> Result<()> {
        let value = serde_json::to_value(&self.contacts)?;
        self.store.set_item(&self.contacts_key, value).await?;
        tracing::debug!(count = self.contacts.len(), "contacts persisted");
        Ok(())
    }

    async fn persist_users(&self) -> Result<()> {
        let value = serde_json::to_value(&self.users)?;
        self.store.set_item(&self.users_key, value).await?;
        tracing::debug!(count = self.users.len(), "users persisted");
        Ok(())
    }

    fn sort_contacts(&mut self) {
        self.contacts
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority, Subtask};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn new_repo() -> Repository<Arc<MemoryStore>> {
        Repository::new(Arc::new(MemoryStore::new()), &StoreConfig::default())
    }

    fn sample_task(name: &str) -> Task {
        Task {
            id: TaskId::new(),
            name: name.to_string(),
            description: "Draft UI".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            category: Category::TechnicalTask,
            priority: Priority::Urgent,
            status: Status::ToDo,
            assigned_contacts: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    #[tokio::test]
    async fn load_with_empty_store_yields_empty_collections() {
        let mut repo = new_repo();
        repo.load().await.expect("load");
        assert!(repo.tasks().is_empty());
        assert!(repo.contacts().is_empty());
        assert!(repo.users().is_empty());
    }

    #[tokio::test]
    async fn committed_task_survives_a_reload() {
        let store = Arc::new(MemoryStore::new());
        let config = StoreConfig::default();

        let task = sample_task("Design");
        let mut repo = Repository::new(Arc::clone(&store), &config);
        repo.load().await.expect("load");
        repo.commit_task(task.clone()).await.expect("commit");

        let mut reloaded = Repository::new(Arc::clone(&store), &config);
        reloaded.load().await.expect("reload");
        assert_eq!(reloaded.tasks(), &[task]);
    }

    #[tokio::test]
    async fn commit_with_known_id_replaces_the_task() {
        let mut repo = new_repo();
        let mut task = sample_task("Design");
        repo.commit_task(task.clone()).await.expect("commit");

        task.description = "Final UI".to_string();
        repo.commit_task(task.clone()).await.expect("recommit");

        assert_eq!(repo.tasks().len(), 1);
        assert_eq!(repo.tasks()[0].description, "Final UI");
    }

    #[tokio::test]
    async fn move_task_changes_only_the_status() {
        let mut repo = new_repo();
        let task = sample_task("Design");
        let id = repo.commit_task(task.clone()).await.expect("commit");

        repo.move_task(id, Status::Done).await.expect("move");
        let moved = repo.task(id).expect("task");
        assert_eq!(moved.status, Status::Done);
        assert_eq!(moved.name, task.name);
    }

    #[tokio::test]
    async fn move_unknown_task_is_an_error() {
        let mut repo = new_repo();
        let err = repo
            .move_task(TaskId::new(), Status::Done)
            .await
            .expect_err("unknown task");
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn toggle_subtask_flips_and_ignores_stale_indices() {
        let mut repo = new_repo();
        let mut task = sample_task("Design");
        task.subtasks.push(Subtask::new("write spec"));
        task.subtasks.push(Subtask::new("review spec"));
        let id = repo.commit_task(task).await.expect("commit");

        repo.toggle_subtask(id, 0).await.expect("toggle");
        assert!(repo.task(id).expect("task").subtasks[0].is_complete);

        // Stale index after a removal elsewhere: ignored, nothing corrupted.
        repo.toggle_subtask(id, 5).await.expect("stale toggle");
        let task = repo.task(id).expect("task");
        assert!(task.subtasks[0].is_complete);
        assert!(!task.subtasks[1].is_complete);
    }

    #[tokio::test]
    async fn contacts_stay_sorted_by_name() {
        let mut repo = new_repo();
        repo.add_contact("Zoe Waters", "zoe@example.net", "1")
            .await
            .expect("add");
        repo.add_contact("anna berg", "anna@example.net", "2")
            .await
            .expect("add");
        repo.add_contact("Mia Kern", "mia@example.net", "3")
            .await
            .expect("add");

        let names: Vec<&str> = repo.contacts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["anna berg", "Mia Kern", "Zoe Waters"]);
    }

    #[tokio::test]
    async fn assignments_survive_contact_resorting() {
        let mut repo = new_repo();
        let zoe = repo
            .add_contact("Zoe Waters", "zoe@example.net", "1")
            .await
            .expect("add");

        let mut task = sample_task("Design");
        task.assigned_contacts.push(zoe);
        let id = repo.commit_task(task).await.expect("commit");

        // Inserting a name that sorts first moves Zoe's position, not her id.
        repo.add_contact("anna berg", "anna@example.net", "2")
            .await
            .expect("add");

        let assigned = &repo.task(id).expect("task").assigned_contacts;
        let resolved = crate::model::resolve_contacts(assigned, repo.contacts());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Zoe Waters");
    }

    #[tokio::test]
    async fn deleting_a_contact_leaves_task_references_dangling_but_harmless() {
        let mut repo = new_repo();
        let zoe = repo
            .add_contact("Zoe Waters", "zoe@example.net", "1")
            .await
            .expect("add");

        let mut task = sample_task("Design");
        task.assigned_contacts.push(zoe);
        let id = repo.commit_task(task).await.expect("commit");

        repo.delete_contact(zoe).await.expect("delete");

        let assigned = &repo.task(id).expect("task").assigned_contacts;
        assert_eq!(assigned.len(), 1);
        assert!(crate::model::resolve_contacts(assigned, repo.contacts()).is_empty());
    }

    #[tokio::test]
    async fn prefix_filter_is_case_insensitive() {
        let mut repo = new_repo();
        repo.add_contact("Mia Kern", "mia@example.net", "1")
            .await
            .expect("add");
        repo.add_contact("Milan Roth", "milan@example.net", "2")
            .await
            .expect("add");
        repo.add_contact("Zoe Waters", "zoe@example.net", "3")
            .await
            .expect("add");

        let hits = repo.contacts_with_prefix("mi");
        assert_eq!(hits.len(), 2);
        assert!(repo.contacts_with_prefix("waters").is_empty());
    }

    #[tokio::test]
    async fn register_login_and_reset_password() {
        let mut repo = new_repo();
        repo.register_user("Ada", "ada@example.net", "secret1")
            .await
            .expect("register");

        assert!(repo.login("ada@example.net", "secret1").is_some());
        assert!(repo.login("ada@example.net", "wrong").is_none());
        assert!(repo.login("none@example.net", "secret1").is_none());

        repo.reset_password("ada@example.net", "secret2")
            .await
            .expect("reset");
        assert!(repo.login("ada@example.net", "secret1").is_none());
        assert!(repo.login("ada@example.net", "secret2").is_some());

        let err = repo
            .reset_password("none@example.net", "x")
            .await
            .expect_err("unknown account");
        assert!(matches!(err, Error::UnknownAccount(_)));
    }
}
