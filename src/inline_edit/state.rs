use serde::Serialize;

/// Where a field is in its edit lifecycle.
///
/// `Error` is not a separate mode: the field is still editable, with a
/// message attached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reading,
    Editing,
    Saving,
    Error,
}

/// Render-facing state of one editable field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState<V> {
    pub(super) value: V,
    #[serde(skip)]
    pub(super) initial: V,
    pub(super) editing: bool,
    pub(super) saving: bool,
    pub(super) error: Option<String>,
    pub(super) dirty: bool,
}

impl<V: PartialEq> FieldState<V> {
    pub(super) fn new(initial: V) -> Self
    where
        V: Clone,
    {
        Self {
            value: initial.clone(),
            initial,
            editing: false,
            saving: false,
            error: None,
            dirty: false,
        }
    }

    /// Recomputes `dirty`. Called after every write to `value` or `initial`.
    pub(super) fn settle(&mut self) {
        self.dirty = self.value != self.initial;
    }

    pub fn value(&self) -> &V { &self.value }
    pub fn initial_value(&self) -> &V { &self.initial }
    pub fn is_editing(&self) -> bool { self.editing }
    pub fn is_saving(&self) -> bool { self.saving }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn is_dirty(&self) -> bool { self.dirty }

    pub fn phase(&self) -> Phase {
        if self.saving {
            Phase::Saving
        } else if !self.editing {
            Phase::Reading
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Editing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_projection() {
        let mut st = FieldState::new(1);
        assert_eq!(st.phase(), Phase::Reading);
        st.editing = true;
        assert_eq!(st.phase(), Phase::Editing);
        st.error = Some("required".into());
        assert_eq!(st.phase(), Phase::Error);
        st.saving = true;
        assert_eq!(st.phase(), Phase::Saving);
    }

    #[test]
    fn serialises_without_the_initial_value() {
        let mut st = FieldState::new("a".to_owned());
        st.value = "b".into();
        st.settle();
        let json = serde_json::to_value(&st).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": "b", "editing": false, "saving": false, "error": null, "dirty": true
            })
        );
    }
}
