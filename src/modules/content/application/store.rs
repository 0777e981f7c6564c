//! Content synchronization store.
//!
//! One instance per process. On `start` it opens a live subscription per
//! entity class and mirrors every snapshot into `tokio::watch` channels,
//! applying local ordering on the way in. Mutations write through to the
//! remote store; the resulting change comes back through the live channel, so
//! callers never re-fetch. Optimistic local updates happen only here, never
//! in consumers.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::modules::booking::application::ports::outgoing::appointment_booker::AppointmentBooker;
use crate::modules::content::application::ordering;
use crate::modules::content::application::ports::outgoing::theme_sink::ThemeSink;
use crate::modules::content::application::skill_list::{self, SkillListError};
use crate::modules::content::domain::defaults;
use crate::modules::content::domain::entities::{
    About, Appointment, AppointmentStatus, Category, CategoryPatch, Contact, Experience, Hero,
    NewAppointment, NewCategory, NewProject, NewService, Project, ProjectPatch, Service,
    ServicePatch, Skill, SkillCategory, Theme,
};
use crate::modules::remote::application::ports::outgoing::document_store::{
    DocumentStore, ListenerRegistration, RawDocument, RemoteWriteError,
};
use crate::shared::notify::Notifier;

const COLLECTION_CONTENT: &str = "content";
const DOC_ABOUT: &str = "about";
const DOC_HERO: &str = "hero";
const DOC_EXPERIENCE: &str = "experience";
const DOC_CONTACT: &str = "contact";
const DOC_THEME: &str = "theme";
const DOC_SKILLS: &str = "skills";

const COLLECTION_PROJECTS: &str = "projects";
const COLLECTION_CATEGORIES: &str = "categories";
const COLLECTION_APPOINTMENTS: &str = "appointments";
const COLLECTION_SERVICES: &str = "services";

#[derive(Debug, thiserror::Error)]
pub enum SkillMutationError {
    #[error(transparent)]
    List(#[from] SkillListError),

    #[error(transparent)]
    Remote(#[from] RemoteWriteError),
}

/// Mirrored state, shared between the store and its listener tasks.
struct MirrorState {
    about: watch::Sender<About>,
    hero: watch::Sender<Hero>,
    experience: watch::Sender<Experience>,
    contact: watch::Sender<Contact>,
    theme: watch::Sender<Theme>,
    skills: watch::Sender<Vec<SkillCategory>>,
    projects: watch::Sender<Vec<Project>>,
    categories: watch::Sender<Vec<Category>>,
    appointments: watch::Sender<Vec<Appointment>>,
    services: watch::Sender<Vec<Service>>,
}

impl MirrorState {
    fn with_fallbacks() -> Self {
        Self {
            about: watch::channel(defaults::initial_about()).0,
            hero: watch::channel(defaults::initial_hero()).0,
            experience: watch::channel(Experience::default()).0,
            contact: watch::channel(defaults::initial_contact()).0,
            theme: watch::channel(defaults::initial_theme()).0,
            skills: watch::channel(Vec::new()).0,
            projects: watch::channel(Vec::new()).0,
            categories: watch::channel(Vec::new()).0,
            appointments: watch::channel(Vec::new()).0,
            services: watch::channel(Vec::new()).0,
        }
    }
}

pub struct ContentStore {
    remote: Arc<dyn DocumentStore>,
    theme_sink: Arc<dyn ThemeSink>,
    notifier: Notifier,
    state: Arc<MirrorState>,
    listeners: Mutex<Vec<ListenerRegistration>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ContentStore {
    pub fn new(
        remote: Arc<dyn DocumentStore>,
        theme_sink: Arc<dyn ThemeSink>,
        notifier: Notifier,
    ) -> Self {
        let state = MirrorState::with_fallbacks();
        // Apply the fallback palette immediately: presentation state is live
        // from process start, before any snapshot arrives.
        theme_sink.apply(&state.theme.borrow());

        Self {
            remote,
            theme_sink,
            notifier,
            state: Arc::new(state),
            listeners: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    //
    // ──────────────────────────────────────────────────────
    // Subscriptions
    // ──────────────────────────────────────────────────────
    //

    /// Opens every live subscription. Call once; snapshots start flowing into
    /// the watch channels as soon as the backend answers.
    pub async fn start(&self) {
        {
            let state = self.state.clone();
            self.listen_document(DOC_ABOUT, move |value| {
                apply_singleton(&state.about, value, DOC_ABOUT);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_document(DOC_HERO, move |value| {
                apply_singleton(&state.hero, value, DOC_HERO);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_document(DOC_EXPERIENCE, move |value| {
                apply_singleton(&state.experience, value, DOC_EXPERIENCE);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_document(DOC_CONTACT, move |value| {
                apply_singleton(&state.contact, value, DOC_CONTACT);
            })
            .await;
        }
        {
            let state = self.state.clone();
            let sink = self.theme_sink.clone();
            self.listen_document(DOC_THEME, move |value| {
                match serde_json::from_value::<Theme>(value) {
                    Ok(theme) => {
                        sink.apply(&theme);
                        state.theme.send_replace(theme);
                    }
                    Err(err) => tracing::warn!(doc = DOC_THEME, error = %err, "bad snapshot"),
                }
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_document(DOC_SKILLS, move |value| {
                let categories = value.get("categories").cloned().unwrap_or(json!([]));
                match serde_json::from_value::<Vec<SkillCategory>>(categories) {
                    Ok(list) => {
                        tracing::debug!(count = list.len(), "skill categories refreshed");
                        state.skills.send_replace(list);
                    }
                    Err(err) => tracing::warn!(doc = DOC_SKILLS, error = %err, "bad snapshot"),
                }
            })
            .await;
        }

        {
            let state = self.state.clone();
            self.listen_collection(COLLECTION_PROJECTS, move |rows| {
                let mut projects: Vec<Project> = decode_rows(rows, COLLECTION_PROJECTS);
                ordering::sort_projects(&mut projects);
                tracing::debug!(count = projects.len(), "projects refreshed");
                state.projects.send_replace(projects);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_collection(COLLECTION_CATEGORIES, move |rows| {
                let mut categories: Vec<Category> = decode_rows(rows, COLLECTION_CATEGORIES);
                ordering::sort_categories(&mut categories);
                state.categories.send_replace(categories);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_collection(COLLECTION_APPOINTMENTS, move |rows| {
                let mut appointments: Vec<Appointment> =
                    decode_rows(rows, COLLECTION_APPOINTMENTS);
                ordering::sort_appointments(&mut appointments);
                state.appointments.send_replace(appointments);
            })
            .await;
        }
        {
            let state = self.state.clone();
            self.listen_collection(COLLECTION_SERVICES, move |rows| {
                let mut services: Vec<Service> = decode_rows(rows, COLLECTION_SERVICES);
                ordering::sort_services(&mut services);
                state.services.send_replace(services);
            })
            .await;
        }
    }

    /// Cancels every live registration and stops the fold tasks. Skipping
    /// this leaks open listeners for the rest of the process lifetime.
    pub fn shutdown(&self) {
        let listeners: Vec<ListenerRegistration> = match self.listeners.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for registration in listeners {
            registration.cancel();
        }

        let tasks: Vec<JoinHandle<()>> = match self.tasks.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for task in tasks {
            task.abort();
        }
        tracing::info!("content store shut down");
    }

    async fn listen_document(
        &self,
        doc_id: &'static str,
        on_value: impl Fn(Value) + Send + 'static,
    ) {
        let sub = self.remote.subscribe_document(COLLECTION_CONTENT, doc_id).await;
        let mut events = sub.events;
        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    // A missing document keeps the current fallback value.
                    None => tracing::debug!(doc = doc_id, "document absent upstream"),
                    Some(value) => on_value(value),
                }
            }
        });
        self.track(sub.registration, handle);
    }

    async fn listen_collection(
        &self,
        collection: &'static str,
        on_rows: impl Fn(Vec<RawDocument>) + Send + 'static,
    ) {
        let sub = self.remote.subscribe_collection(collection).await;
        let mut events = sub.events;
        let handle = tokio::spawn(async move {
            while let Some(rows) = events.recv().await {
                on_rows(rows);
            }
        });
        self.track(sub.registration, handle);
    }

    fn track(&self, registration: ListenerRegistration, handle: JoinHandle<()>) {
        if let Ok(mut guard) = self.listeners.lock() {
            guard.push(registration);
        }
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(handle);
        }
    }

    //
    // ──────────────────────────────────────────────────────
    // Reads
    // ──────────────────────────────────────────────────────
    //

    pub fn about(&self) -> About {
        self.state.about.borrow().clone()
    }

    pub fn hero(&self) -> Hero {
        self.state.hero.borrow().clone()
    }

    pub fn experience(&self) -> Experience {
        self.state.experience.borrow().clone()
    }

    pub fn contact(&self) -> Contact {
        self.state.contact.borrow().clone()
    }

    pub fn theme(&self) -> Theme {
        self.state.theme.borrow().clone()
    }

    pub fn skills(&self) -> Vec<SkillCategory> {
        self.state.skills.borrow().clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state.projects.borrow().clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.categories.borrow().clone()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.state.appointments.borrow().clone()
    }

    pub fn services(&self) -> Vec<Service> {
        self.state.services.borrow().clone()
    }

    /// Reactive handles, for consumers that re-render on change.
    pub fn watch_projects(&self) -> watch::Receiver<Vec<Project>> {
        self.state.projects.subscribe()
    }

    pub fn watch_categories(&self) -> watch::Receiver<Vec<Category>> {
        self.state.categories.subscribe()
    }

    pub fn watch_appointments(&self) -> watch::Receiver<Vec<Appointment>> {
        self.state.appointments.subscribe()
    }

    pub fn watch_services(&self) -> watch::Receiver<Vec<Service>> {
        self.state.services.subscribe()
    }

    pub fn watch_theme(&self) -> watch::Receiver<Theme> {
        self.state.theme.subscribe()
    }

    pub fn watch_skills(&self) -> watch::Receiver<Vec<SkillCategory>> {
        self.state.skills.subscribe()
    }

    //
    // ──────────────────────────────────────────────────────
    // Project mutations
    // ──────────────────────────────────────────────────────
    //

    pub async fn add_project(&self, project: NewProject) -> Result<String, RemoteWriteError> {
        let mut data = encode(&project)?;
        set_field(&mut data, "createdAt", now_stamp());
        self.remote
            .create_document(COLLECTION_PROJECTS, data)
            .await
            .map_err(|err| self.report("add project", err))
    }

    pub async fn update_project(
        &self,
        id: &str,
        patch: ProjectPatch,
    ) -> Result<(), RemoteWriteError> {
        let data = encode(&patch)?;
        self.remote
            .merge_update(COLLECTION_PROJECTS, id, data)
            .await
            .map_err(|err| self.report("update project", err))
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), RemoteWriteError> {
        self.remote
            .delete_document(COLLECTION_PROJECTS, id)
            .await
            .map_err(|err| self.report("delete project", err))
    }

    //
    // ──────────────────────────────────────────────────────
    // Category mutations
    // ──────────────────────────────────────────────────────
    //

    pub async fn add_category(&self, category: NewCategory) -> Result<String, RemoteWriteError> {
        let data = encode(&category)?;
        self.remote
            .create_document(COLLECTION_CATEGORIES, data)
            .await
            .map_err(|err| self.report("add category", err))
    }

    pub async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<(), RemoteWriteError> {
        let data = encode(&patch)?;
        self.remote
            .merge_update(COLLECTION_CATEGORIES, id, data)
            .await
            .map_err(|err| self.report("update category", err))
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), RemoteWriteError> {
        self.remote
            .delete_document(COLLECTION_CATEGORIES, id)
            .await
            .map_err(|err| self.report("delete category", err))
    }

    /// Optimistically applies the new order locally, then persists one
    /// `order = index` write per item in parallel. Individual failures are
    /// logged and left alone; the next snapshot reconciles local state with
    /// whatever the backend actually accepted.
    pub async fn reorder_categories(&self, categories: Vec<Category>) {
        let mut optimistic = categories.clone();
        for (index, category) in optimistic.iter_mut().enumerate() {
            category.order = Some(index as i64);
        }
        self.state.categories.send_replace(optimistic);

        let writes = categories.iter().enumerate().map(|(index, category)| {
            let remote = self.remote.clone();
            let id = category.id.clone();
            async move {
                let result = remote
                    .merge_update(COLLECTION_CATEGORIES, &id, json!({ "order": index as i64 }))
                    .await;
                (id, result)
            }
        });

        for (id, result) in futures::future::join_all(writes).await {
            if let Err(err) = result {
                tracing::error!(category = %id, error = %err, "reorder write failed");
            }
        }
    }

    //
    // ──────────────────────────────────────────────────────
    // Service mutations
    // ──────────────────────────────────────────────────────
    //

    pub async fn add_service(&self, service: NewService) -> Result<String, RemoteWriteError> {
        let mut data = encode(&service)?;
        let stamp = now_stamp();
        set_field(&mut data, "createdAt", stamp.clone());
        set_field(&mut data, "updatedAt", stamp);
        self.remote
            .create_document(COLLECTION_SERVICES, data)
            .await
            .map_err(|err| self.report("add service", err))
    }

    pub async fn update_service(
        &self,
        id: &str,
        patch: ServicePatch,
    ) -> Result<(), RemoteWriteError> {
        let mut data = encode(&patch)?;
        set_field(&mut data, "updatedAt", now_stamp());
        self.remote
            .merge_update(COLLECTION_SERVICES, id, data)
            .await
            .map_err(|err| self.report("update service", err))
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), RemoteWriteError> {
        self.remote
            .delete_document(COLLECTION_SERVICES, id)
            .await
            .map_err(|err| self.report("delete service", err))
    }

    /// Same best-effort contract as `reorder_categories`.
    pub async fn reorder_services(&self, services: Vec<Service>) {
        let mut optimistic = services.clone();
        for (index, service) in optimistic.iter_mut().enumerate() {
            service.order = index as i64;
        }
        self.state.services.send_replace(optimistic);

        let writes = services.iter().enumerate().map(|(index, service)| {
            let remote = self.remote.clone();
            let id = service.id.clone();
            async move {
                let result = remote
                    .merge_update(COLLECTION_SERVICES, &id, json!({ "order": index as i64 }))
                    .await;
                (id, result)
            }
        });

        for (id, result) in futures::future::join_all(writes).await {
            if let Err(err) = result {
                tracing::error!(service = %id, error = %err, "reorder write failed");
            }
        }
    }

    //
    // ──────────────────────────────────────────────────────
    // Appointment mutations
    // ──────────────────────────────────────────────────────
    //

    /// Stamps the submission time, forces status to pending, and converts
    /// failure into `false` so the booking flow can branch without error
    /// handling.
    pub async fn add_appointment(&self, appointment: NewAppointment) -> bool {
        let data = match encode(&appointment) {
            Ok(mut data) => {
                set_field(&mut data, "timestamp", now_stamp());
                set_field(&mut data, "status", "pending".to_string());
                data
            }
            Err(err) => {
                tracing::error!(error = %err, "could not encode appointment");
                return false;
            }
        };

        match self
            .remote
            .create_document(COLLECTION_APPOINTMENTS, data)
            .await
        {
            Ok(id) => {
                tracing::info!(appointment = %id, "appointment booked");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "error booking appointment");
                false
            }
        }
    }

    pub async fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<(), RemoteWriteError> {
        let data = json!({ "status": status });
        self.remote
            .merge_update(COLLECTION_APPOINTMENTS, id, data)
            .await
            .map_err(|err| self.report("update appointment status", err))
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<(), RemoteWriteError> {
        self.remote
            .delete_document(COLLECTION_APPOINTMENTS, id)
            .await
            .map_err(|err| self.report("delete appointment", err))
    }

    //
    // ──────────────────────────────────────────────────────
    // Singleton mutations
    // ──────────────────────────────────────────────────────
    //

    pub async fn update_about(&self, about: About) -> Result<(), RemoteWriteError> {
        self.state.about.send_replace(about.clone());
        self.write_singleton(DOC_ABOUT, &about).await
    }

    pub async fn update_hero(&self, hero: Hero) -> Result<(), RemoteWriteError> {
        self.state.hero.send_replace(hero.clone());
        self.write_singleton(DOC_HERO, &hero).await
    }

    pub async fn update_experience(&self, experience: Experience) -> Result<(), RemoteWriteError> {
        self.state.experience.send_replace(experience.clone());
        self.write_singleton(DOC_EXPERIENCE, &experience).await
    }

    pub async fn update_contact(&self, contact: Contact) -> Result<(), RemoteWriteError> {
        self.state.contact.send_replace(contact.clone());
        self.write_singleton(DOC_CONTACT, &contact).await
    }

    /// Pushes the palette into presentation state synchronously, before the
    /// write resolves: the UI must reflect the new colors with zero latency.
    pub async fn update_theme(&self, theme: Theme) -> Result<(), RemoteWriteError> {
        self.theme_sink.apply(&theme);
        self.state.theme.send_replace(theme.clone());
        self.write_singleton(DOC_THEME, &theme).await
    }

    async fn write_singleton<T: serde::Serialize>(
        &self,
        doc_id: &'static str,
        value: &T,
    ) -> Result<(), RemoteWriteError> {
        let data = encode(value)?;
        self.remote
            .merge_update(COLLECTION_CONTENT, doc_id, data)
            .await
            .map_err(|err| self.report(doc_id, err))
    }

    //
    // ──────────────────────────────────────────────────────
    // Skill mutations (whole-list writes)
    // ──────────────────────────────────────────────────────
    //

    pub async fn add_skill_category(&self, title: &str) -> Result<(), SkillMutationError> {
        let current = self.skills();
        let next = skill_list::add_category(&current, title)?;
        self.persist_skills(next).await
    }

    pub async fn delete_skill_category(&self, title: &str) -> Result<(), SkillMutationError> {
        let current = self.skills();
        let next = skill_list::remove_category(&current, title)?;
        self.persist_skills(next).await
    }

    pub async fn add_skill(
        &self,
        category_title: &str,
        skill: Skill,
    ) -> Result<(), SkillMutationError> {
        let current = self.skills();
        let next = skill_list::add_skill(&current, category_title, skill)?;
        self.persist_skills(next).await
    }

    pub async fn delete_skill(
        &self,
        category_title: &str,
        skill_name: &str,
    ) -> Result<(), SkillMutationError> {
        let current = self.skills();
        let next = skill_list::remove_skill(&current, category_title, skill_name)?;
        self.persist_skills(next).await
    }

    async fn persist_skills(&self, next: Vec<SkillCategory>) -> Result<(), SkillMutationError> {
        self.state.skills.send_replace(next.clone());
        let payload = json!({ "categories": next });
        self.remote
            .merge_update(COLLECTION_CONTENT, DOC_SKILLS, payload)
            .await
            .map_err(|err| self.report("update skills", err))?;
        Ok(())
    }

    fn report(&self, action: &str, err: RemoteWriteError) -> RemoteWriteError {
        tracing::error!(action, error = %err, "remote write failed");
        self.notifier.error(format!("{action} failed: {err}"));
        err
    }
}

#[async_trait::async_trait]
impl AppointmentBooker for ContentStore {
    async fn book(&self, appointment: NewAppointment) -> bool {
        self.add_appointment(appointment).await
    }
}

//
// ──────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────
//

fn now_stamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, RemoteWriteError> {
    serde_json::to_value(value).map_err(|e| RemoteWriteError::Backend(e.to_string()))
}

fn set_field(data: &mut Value, key: &str, value: impl Into<Value>) {
    if let Value::Object(map) = data {
        map.insert(key.to_string(), value.into());
    }
}

fn apply_singleton<T: DeserializeOwned>(sender: &watch::Sender<T>, value: Value, doc: &str) {
    match serde_json::from_value::<T>(value) {
        Ok(entity) => {
            sender.send_replace(entity);
        }
        Err(err) => tracing::warn!(doc, error = %err, "bad snapshot"),
    }
}

/// Decodes collection rows, injecting the document id. Rows that fail to
/// decode are skipped with a warning rather than poisoning the snapshot.
fn decode_rows<T: DeserializeOwned>(rows: Vec<RawDocument>, collection: &str) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            let mut data = row.data;
            if let Value::Object(map) = &mut data {
                map.insert("id".to_string(), Value::String(row.id.clone()));
            }
            match serde_json::from_value(data) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    tracing::warn!(collection, doc = %row.id, error = %err, "skipping bad row");
                    None
                }
            }
        })
        .collect()
}
