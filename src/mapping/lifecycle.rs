use super::model::PrefillMapping;
use super::store::MappingStore;
use crate::error::{LifecycleError, StoreError};
use crate::graph::GraphModel;
use crate::notify::{Notifier, Severity, TracingNotifier};
use crate::persistence::MappingPersistence;
use crate::schema::Field;
use crate::source::DataSource;
use crate::validation::MappingValidator;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

/// Timestamp source for `createdAt`.
pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Configuration state of one `(form, field)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Unconfigured,
    Configuring,
    Saved,
}

/// Result of a save intent.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Type warnings were found and nothing was stored. Saving again commits.
    NeedsConfirmation(Vec<String>),
    Committed(PrefillMapping),
}

#[derive(Debug, Clone)]
struct ConfigureSession {
    form_id: String,
    field_id: String,
    candidate: Option<DataSource>,
    warning: Option<String>,
    /// Set once a warning has been surfaced; the next save then commits.
    warning_acknowledged: bool,
}

impl ConfigureSession {
    fn new(form_id: String, field_id: String) -> Self {
        Self {
            form_id,
            field_id,
            candidate: None,
            warning: None,
            warning_acknowledged: false,
        }
    }
}

/// Owns the mapping document and applies the configuration intents to it.
///
/// Every mutation is written through the persistence layer. Write failures
/// are logged and notified but do not roll back the in-memory store.
pub struct PrefillManager {
    store: MappingStore,
    persistence: Box<dyn MappingPersistence>,
    notifier: Box<dyn Notifier>,
    validator: MappingValidator,
    clock: Clock,
    selected_form: Option<String>,
    session: Option<ConfigureSession>,
}

pub struct PrefillManagerBuilder {
    persistence: Box<dyn MappingPersistence>,
    notifier: Box<dyn Notifier>,
    validator: MappingValidator,
    clock: Clock,
}

impl PrefillManagerBuilder {
    pub fn new(persistence: Box<dyn MappingPersistence>) -> Self {
        Self {
            persistence,
            notifier: Box::new(TracingNotifier),
            validator: MappingValidator::default(),
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_validator(mut self, validator: MappingValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Loads the stored document and builds the manager. A missing document
    /// starts an empty store; a malformed one is an error.
    pub fn open(self) -> Result<PrefillManager, StoreError> {
        let store = match self.persistence.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "failed to load saved mappings");
                return Err(e);
            }
        };
        debug!(mappings = store.len(), "opened mapping store");
        Ok(PrefillManager {
            store,
            persistence: self.persistence,
            notifier: self.notifier,
            validator: self.validator,
            clock: self.clock,
            selected_form: None,
            session: None,
        })
    }
}

impl PrefillManager {
    pub fn builder(persistence: Box<dyn MappingPersistence>) -> PrefillManagerBuilder {
        PrefillManagerBuilder::new(persistence)
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn validator(&self) -> &MappingValidator {
        &self.validator
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn selected_form(&self) -> Option<&str> {
        self.selected_form.as_deref()
    }

    /// Switches the active form. An open session on another form is discarded.
    pub fn select_form(&mut self, form_id: &str) {
        if self.session.as_ref().is_some_and(|s| s.form_id != form_id) {
            self.session = None;
        }
        self.selected_form = Some(form_id.to_string());
    }

    /// Starts configuring a field of the selected form, clearing any earlier
    /// candidate and warning.
    pub fn begin_configure(&mut self, field_id: &str) -> Result<(), LifecycleError> {
        let form_id = self
            .selected_form
            .clone()
            .ok_or(LifecycleError::NoFormSelected)?;
        self.session = Some(ConfigureSession::new(form_id, field_id.to_string()));
        Ok(())
    }

    pub fn configuring_field(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.field_id.as_str())
    }

    /// Records the tentative source. Validation is deferred to `save`.
    pub fn select_candidate(&mut self, source: DataSource) -> Result<(), LifecycleError> {
        let session = self.session.as_mut().ok_or(LifecycleError::NotConfiguring)?;
        session.candidate = Some(source);
        session.warning = None;
        session.warning_acknowledged = false;
        Ok(())
    }

    pub fn candidate(&self) -> Option<&DataSource> {
        self.session.as_ref()?.candidate.as_ref()
    }

    /// The warning surfaced by the last soft-stopped save, if any.
    pub fn pending_warning(&self) -> Option<&str> {
        self.session.as_ref()?.warning.as_deref()
    }

    /// Validates and commits the tentative candidate for `target`.
    ///
    /// The first attempt with type warnings stores nothing and returns
    /// `NeedsConfirmation`; the next attempt commits regardless.
    pub fn save(&mut self, target: &Field) -> Result<SaveOutcome, LifecycleError> {
        let session = self.session.as_mut().ok_or(LifecycleError::NotConfiguring)?;
        if session.field_id != target.id {
            return Err(LifecycleError::TargetMismatch {
                expected: session.field_id.clone(),
                found: target.id.clone(),
            });
        }
        let candidate = session.candidate.as_ref().ok_or(LifecycleError::NoCandidate)?;

        let warnings = self.validator.validate(target, candidate);
        if !warnings.is_empty() && !session.warning_acknowledged {
            session.warning = Some(warnings.join(", "));
            session.warning_acknowledged = true;
            debug!(field_id = %target.id, ?warnings, "save held back by validation warnings");
            return Ok(SaveOutcome::NeedsConfirmation(warnings));
        }

        let mapping = PrefillMapping::new(
            session.field_id.clone(),
            candidate.binding.clone(),
            (self.clock)(),
        );
        let form_id = session.form_id.clone();
        self.session = None;

        self.store.upsert(&form_id, mapping.clone());
        debug!(form_id = %form_id, field_id = %mapping.target_field_id, source_type = mapping.source_type(), "saved prefill mapping");
        self.persist();
        self.notifier
            .notify("Prefill mapping saved successfully", Severity::Success);
        Ok(SaveOutcome::Committed(mapping))
    }

    /// Like `save`, looking the target field up in the graph.
    pub fn save_in(&mut self, graph: &GraphModel) -> Result<SaveOutcome, LifecycleError> {
        let session = self.session.as_ref().ok_or(LifecycleError::NotConfiguring)?;
        let form = graph
            .node(&session.form_id)
            .ok_or_else(|| LifecycleError::FormNotFound(session.form_id.clone()))?;
        let target = graph.field(form, &session.field_id).ok_or_else(|| {
            LifecycleError::FieldNotFound {
                form_id: session.form_id.clone(),
                field_id: session.field_id.clone(),
            }
        })?;
        self.save(&target)
    }

    /// Discards the open session. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Deletes a mapping and ends any session open on the same field.
    /// Removing a mapping that does not exist does nothing.
    pub fn remove(&mut self, form_id: &str, field_id: &str) -> Option<PrefillMapping> {
        let Some(removed) = self.store.remove(form_id, field_id) else {
            debug!(form_id, field_id, "no prefill mapping to remove");
            return None;
        };
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.form_id == form_id && s.field_id == field_id)
        {
            self.session = None;
        }
        debug!(form_id, field_id, "removed prefill mapping");
        self.persist();
        self.notifier.notify("Prefill mapping removed", Severity::Success);
        Some(removed)
    }

    pub fn mapping(&self, form_id: &str, field_id: &str) -> Option<&PrefillMapping> {
        self.store.get(form_id, field_id)
    }

    pub fn has_prefill(&self, form_id: &str, field_id: &str) -> bool {
        self.store.contains(form_id, field_id)
    }

    /// Short provenance text for a configured field, `None` if unconfigured.
    pub fn display(&self, form_id: &str, field_id: &str) -> Option<String> {
        self.mapping(form_id, field_id)
            .map(|mapping| mapping.source.display())
    }

    pub fn field_state(&self, form_id: &str, field_id: &str) -> FieldState {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.form_id == form_id && s.field_id == field_id)
        {
            FieldState::Configuring
        } else if self.has_prefill(form_id, field_id) {
            FieldState::Saved
        } else {
            FieldState::Unconfigured
        }
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.store) {
            error!(error = %e, "failed to persist prefill mappings");
            self.notifier
                .notify("Failed to save prefill mapping", Severity::Error);
        }
    }
}
