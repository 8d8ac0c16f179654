use std::borrow::Cow;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use super::keys::{InputKind, KeyAction, KeyPress, key_action};
use super::state::{FieldState, Phase};
use crate::handler::BoxFuture;

/// Shown when a failed save carries no message of its own.
pub const SAVE_FAILED_FALLBACK: &str = "Failed to save changes";

type SaveFn<V> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;
type ValidateFn<V> = Arc<dyn Fn(&V) -> Option<String> + Send + Sync>;
type Notify = Arc<dyn Fn() + Send + Sync>;

/// How a call to [`InlineEdit::save`] ended.
///
/// Failures are reported here, never as an `Err`: the field has already
/// recorded the message in its state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaveOutcome {
    /// Not editing, or a save is already in flight.
    Skipped,
    /// Validation rejected the value; the save callback was not called.
    Invalid(String),
    /// The value equals the initial value; the save callback was not called.
    Unchanged,
    Saved,
    Failed(String),
    /// The field was unmounted while the save was in flight; its result was
    /// discarded.
    Detached,
}

impl SaveOutcome {
    /// `true` when the field left edit mode.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved | Self::Unchanged)
    }
}

struct Hooks<V> {
    on_save: SaveFn<V>,
    validate: Option<ValidateFn<V>>,
    on_cancel: Option<Notify>,
    on_enter_edit: Option<Notify>,
    on_exit_edit: Option<Notify>,
}

struct Inner<V> {
    label: Cow<'static, str>,
    state: watch::Sender<FieldState<V>>,
    mounted: AtomicBool,
    can_edit: AtomicBool,
    /// Held by the one `save` call allowed to run at a time.
    save_claimed: AtomicBool,
    save_on_blur: bool,
    hooks: Hooks<V>,
}

/// Controller for one inline-editable value.
///
/// Cloning yields another handle to the same field, which is how a UI hands
/// a save off to a spawned task. After [`unmount`](InlineEdit::unmount) every
/// operation is a no-op and an in-flight save's result is dropped.
pub struct InlineEdit<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for InlineEdit<V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<V> InlineEdit<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn builder(initial: V) -> InlineEditBuilder<V> {
        InlineEditBuilder {
            initial,
            label: Cow::Borrowed("field"),
            can_edit: true,
            save_on_blur: false,
            validate: None,
            on_cancel: None,
            on_enter_edit: None,
            on_exit_edit: None,
        }
    }

    // ── Projections ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> FieldState<V> {
        self.inner.state.borrow().clone()
    }

    /// Receives every state change. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<FieldState<V>> {
        self.inner.state.subscribe()
    }

    pub fn value(&self) -> V { self.inner.state.borrow().value.clone() }
    pub fn is_editing(&self) -> bool { self.inner.state.borrow().editing }
    pub fn is_saving(&self) -> bool { self.inner.state.borrow().saving }
    pub fn error(&self) -> Option<String> { self.inner.state.borrow().error.clone() }
    pub fn is_dirty(&self) -> bool { self.inner.state.borrow().dirty }
    pub fn phase(&self) -> Phase { self.inner.state.borrow().phase() }

    pub fn can_edit(&self) -> bool {
        self.inner.can_edit.load(Ordering::Relaxed)
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::Acquire)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Reading → Editing. Returns `false` (and does nothing) when editing is
    /// not allowed or the field is already in edit mode.
    pub fn enter_edit_mode(&self) -> bool {
        if !self.can_edit() {
            debug!(field = %self.inner.label, "edit refused: field is read-only");
            return false;
        }
        let entered = self.transition(|st| {
            if st.editing {
                return false;
            }
            st.editing = true;
            st.error = None;
            st.value = st.initial.clone();
            true
        });
        if entered {
            self.notify(&self.inner.hooks.on_enter_edit);
        }
        entered
    }

    /// Updates the working value. Ignored outside edit mode and while saving.
    pub fn set_value(&self, value: V) {
        self.transition(|st| {
            if !st.editing || st.saving {
                return false;
            }
            st.value = value;
            true
        });
    }

    /// Editing → Reading, discarding the working value.
    ///
    /// Does nothing while a save is in flight; the save decides the outcome.
    pub fn cancel(&self) -> bool {
        let cancelled = self.transition(|st| {
            if !st.editing || st.saving {
                return false;
            }
            st.value = st.initial.clone();
            st.error = None;
            st.editing = false;
            true
        });
        if cancelled {
            self.notify(&self.inner.hooks.on_cancel);
            self.notify(&self.inner.hooks.on_exit_edit);
        }
        cancelled
    }

    /// Forces the field back to its initial value and out of edit mode
    /// without invoking any callback.
    pub fn reset(&self) {
        self.transition(|st| {
            st.value = st.initial.clone();
            st.error = None;
            st.editing = false;
            true
        });
    }

    /// Replaces the initial value, e.g. after the record was refetched.
    ///
    /// Outside edit mode the displayed value follows; while editing, the
    /// working value is kept and only `dirty` is recomputed.
    pub fn set_initial_value(&self, initial: V) {
        self.transition(|st| {
            if st.initial == initial {
                return false;
            }
            st.initial = initial;
            if !st.editing {
                st.value = st.initial.clone();
            }
            true
        });
    }

    pub fn set_can_edit(&self, can_edit: bool) {
        self.inner.can_edit.store(can_edit, Ordering::Relaxed);
    }

    /// Validates, then commits the working value through the save callback.
    ///
    /// Only one save runs at a time across all clones; a concurrent call
    /// returns [`SaveOutcome::Skipped`] without validating.
    pub async fn save(&self) -> SaveOutcome {
        let Some(_claim) = SaveClaim::acquire(&self.inner.save_claimed) else {
            debug!(field = %self.inner.label, "save already in progress");
            return SaveOutcome::Skipped;
        };
        let value = {
            let st = self.inner.state.borrow();
            if !self.is_mounted() || !st.editing || st.saving {
                return SaveOutcome::Skipped;
            }
            st.value.clone()
        };

        if let Some(validate) = &self.inner.hooks.validate {
            if let Some(message) = validate(&value).filter(|m| !m.trim().is_empty()) {
                self.transition(|st| {
                    st.error = Some(message.clone());
                    true
                });
                return SaveOutcome::Invalid(message);
            }
        }

        let unchanged = self.inner.state.borrow().initial == value;
        if unchanged {
            self.transition(|st| {
                st.value = st.initial.clone();
                st.error = None;
                st.editing = false;
                true
            });
            self.notify(&self.inner.hooks.on_exit_edit);
            return SaveOutcome::Unchanged;
        }

        self.transition(|st| {
            st.saving = true;
            st.error = None;
            true
        });

        let result = (self.inner.hooks.on_save)(value.clone()).await;

        if !self.is_mounted() {
            debug!(field = %self.inner.label, "unmounted during save, dropping result");
            return SaveOutcome::Detached;
        }

        match result {
            Ok(()) => {
                self.transition(|st| {
                    st.initial = value;
                    st.value = st.initial.clone();
                    st.saving = false;
                    st.editing = false;
                    true
                });
                self.notify(&self.inner.hooks.on_exit_edit);
                SaveOutcome::Saved
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    SAVE_FAILED_FALLBACK.to_owned()
                } else {
                    message
                };
                warn!(field = %self.inner.label, error = %message, "save failed");
                self.transition(|st| {
                    st.saving = false;
                    st.error = Some(message.clone());
                    true
                });
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Saves on blur when configured to and no error is showing.
    /// Returns `None` when the blur was inert.
    pub async fn blur(&self) -> Option<SaveOutcome> {
        if !self.inner.save_on_blur {
            return None;
        }
        let eligible = {
            let st = self.inner.state.borrow();
            st.editing && !st.saving && st.error.is_none()
        };
        if eligible { Some(self.save().await) } else { None }
    }

    /// Applies the keyboard contract. Outside edit mode every key passes
    /// through.
    pub async fn handle_key(&self, press: KeyPress, input: InputKind) -> KeyAction {
        if !self.is_editing() {
            return KeyAction::PassThrough;
        }
        let action = key_action(press, input);
        match action {
            KeyAction::Cancel => {
                self.cancel();
            }
            KeyAction::Save => {
                self.save().await;
            }
            KeyAction::PassThrough => {}
        }
        action
    }

    /// Detaches the field from its view. Irreversible.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::Release);
    }

    /// Applies `f` and notifies subscribers if it reports a change.
    /// Unmounted fields ignore every update.
    fn transition(&self, f: impl FnOnce(&mut FieldState<V>) -> bool) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.inner.state.send_if_modified(|st| {
            let changed = f(st);
            st.settle();
            changed
        })
    }

    fn notify(&self, hook: &Option<Notify>) {
        if let Some(hook) = hook {
            if self.is_mounted() {
                hook();
            }
        }
    }
}

/// Exclusive right to run `save`, released on drop so a cancelled save
/// future frees it too.
struct SaveClaim<'a>(&'a AtomicBool);

impl<'a> SaveClaim<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SaveClaim<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Configures an [`InlineEdit`]. Obtain via [`InlineEdit::builder`];
/// terminated by [`build`](InlineEditBuilder::build) with the save callback.
pub struct InlineEditBuilder<V> {
    initial: V,
    label: Cow<'static, str>,
    can_edit: bool,
    save_on_blur: bool,
    validate: Option<ValidateFn<V>>,
    on_cancel: Option<Notify>,
    on_enter_edit: Option<Notify>,
    on_exit_edit: Option<Notify>,
}

impl<V> InlineEditBuilder<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Names the field in log lines.
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn can_edit(mut self, can_edit: bool) -> Self {
        self.can_edit = can_edit;
        self
    }

    pub fn save_on_blur(mut self, enabled: bool) -> Self {
        self.save_on_blur = enabled;
        self
    }

    /// A non-empty message rejects the value.
    pub fn validate(mut self, f: impl Fn(&V) -> Option<String> + Send + Sync + 'static) -> Self {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }

    pub fn on_enter_edit(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_enter_edit = Some(Arc::new(f));
        self
    }

    pub fn on_exit_edit(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_exit_edit = Some(Arc::new(f));
        self
    }

    /// Finishes the field. `save` receives the working value; its error's
    /// `Display` text becomes the field error.
    pub fn build<F, Fut, E>(self, save: F) -> InlineEdit<V>
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let on_save: SaveFn<V> = Arc::new(move |value: V| -> BoxFuture<'static, Result<(), String>> {
            let fut = save(value);
            Box::pin(async move { fut.await.map_err(|e| e.to_string()) })
        });

        let (state, _) = watch::channel(FieldState::new(self.initial));
        InlineEdit {
            inner: Arc::new(Inner {
                label: self.label,
                state,
                mounted: AtomicBool::new(true),
                can_edit: AtomicBool::new(self.can_edit),
                save_claimed: AtomicBool::new(false),
                save_on_blur: self.save_on_blur,
                hooks: Hooks {
                    on_save,
                    validate: self.validate,
                    on_cancel: self.on_cancel,
                    on_enter_edit: self.on_enter_edit,
                    on_exit_edit: self.on_exit_edit,
                },
            }),
        }
    }
}
