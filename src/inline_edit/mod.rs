//! Inline editing of a single value.
//!
//! An [`InlineEdit`] owns the read/edit/save/cancel lifecycle of one field,
//! independent of how it is rendered. A view binds to it through
//! [`InlineEdit::subscribe`] and drives it with the transition methods.
//!
//! ```text
//!            enter_edit_mode (if can_edit)
//!  Reading ───────────────────────────────▶ Editing ◀──┐ set_value
//!     ▲                                      │  │  │   │
//!     │ cancel / reset / unchanged save      │  │  └───┘
//!     ├──────────────────────────────────────┘  │ save (valid, changed)
//!     │                                         ▼
//!     └──────────────── success ──────────── Saving
//!                                               │ failure
//!                                               ▼
//!                                     Editing + error (Phase::Error)
//! ```
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use taskdeck::inline_edit::{InlineEdit, SaveOutcome};
//!
//! let title = InlineEdit::builder("Write release notes".to_owned())
//!     .validate(|v: &String| v.trim().is_empty().then(|| "Title is required".to_owned()))
//!     .build(|_value: String| async move {
//!         // PATCH /api/tasks/{id} with `value`
//!         Ok::<(), String>(())
//!     });
//!
//! title.enter_edit_mode();
//! title.set_value("Write and publish release notes".to_owned());
//! assert_eq!(title.save().await, SaveOutcome::Saved);
//! assert!(!title.is_editing());
//! # }
//! ```

mod controller;
mod keys;
mod state;

pub use controller::{InlineEdit, InlineEditBuilder, SAVE_FAILED_FALLBACK, SaveOutcome};
pub use keys::{InputKind, Key, KeyAction, KeyPress, Modifiers, key_action};
pub use state::{FieldState, Phase};
