use crate::{MapRegistry, Path, PathId, Result, WayfinderError};

/// Answer given by the user to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// Yes/no prompt shown by the host. The answer arrives later, through
/// [`PathDeletion::resolve`].
pub trait ConfirmationDialog {
    fn ask(&mut self, title: &str, message: &str);
}

/// Deletes a path only after the user confirms it.
#[derive(Debug, Default)]
pub struct PathDeletion {
    pending: Option<PathId>,
}

impl PathDeletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<PathId> {
        self.pending
    }

    /// Asks the user to confirm deleting `id` and parks the request until it
    /// is resolved.
    pub fn request<D: ConfirmationDialog>(
        &mut self,
        registry: &MapRegistry,
        id: PathId,
        dialog: &mut D,
    ) -> Result<()> {
        if let Some(pending) = self.pending {
            return Err(WayfinderError::invalid_state(format!(
                "deletion of {pending} is still awaiting an answer"
            )));
        }
        let path = registry.path(id).ok_or_else(|| {
            WayfinderError::invalid_argument(format!("{id} does not exist in any map"))
        })?;

        dialog.ask(
            "Delete path",
            &format!(
                "Delete the path from {} to {}?",
                path.source(),
                path.destination()
            ),
        );
        self.pending = Some(id);
        Ok(())
    }

    /// Applies the user's answer. The path is removed only on [`Answer::Yes`];
    /// without a pending request this does nothing.
    pub fn resolve(&mut self, registry: &mut MapRegistry, answer: Answer) -> Option<Path> {
        let id = self.pending.take()?;
        if answer == Answer::No {
            tracing::debug!(%id, "path deletion declined");
            return None;
        }

        let removed = registry.remove_path(id);
        if removed.is_none() {
            tracing::warn!(%id, "confirmed path vanished before deletion");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDialog {
        asked: Vec<(String, String)>,
    }

    impl ConfirmationDialog for RecordingDialog {
        fn ask(&mut self, title: &str, message: &str) {
            self.asked.push((title.to_string(), message.to_string()));
        }
    }

    fn registry() -> (MapRegistry, PathId) {
        let mut registry = MapRegistry::new();
        let id = registry
            .switch_to("Museum")
            .unwrap()
            .create_path("Entrance", "Cafe")
            .unwrap()
            .id();
        (registry, id)
    }

    #[test]
    fn deletes_only_after_yes() {
        let (mut registry, id) = registry();
        let mut dialog = RecordingDialog::default();
        let mut deletion = PathDeletion::new();

        deletion.request(&registry, id, &mut dialog).unwrap();
        assert_eq!(dialog.asked.len(), 1);
        assert!(dialog.asked[0].1.contains("Entrance"));
        assert!(registry.path(id).is_some());

        let removed = deletion.resolve(&mut registry, Answer::Yes).unwrap();
        assert_eq!(removed.id(), id);
        assert!(registry.path(id).is_none());
        assert_eq!(deletion.pending(), None);
    }

    #[test]
    fn no_keeps_the_path() {
        let (mut registry, id) = registry();
        let mut deletion = PathDeletion::new();

        deletion
            .request(&registry, id, &mut RecordingDialog::default())
            .unwrap();
        assert!(deletion.resolve(&mut registry, Answer::No).is_none());
        assert!(registry.path(id).is_some());
        assert!(deletion.resolve(&mut registry, Answer::Yes).is_none());
        assert!(registry.path(id).is_some());
    }

    #[test]
    fn one_request_at_a_time() {
        let (registry, id) = registry();
        let mut dialog = RecordingDialog::default();
        let mut deletion = PathDeletion::new();

        deletion.request(&registry, id, &mut dialog).unwrap();
        assert!(matches!(
            deletion.request(&registry, id, &mut dialog),
            Err(WayfinderError::InvalidState(_))
        ));
        assert_eq!(dialog.asked.len(), 1);
    }

    #[test]
    fn unknown_paths_are_rejected() {
        let (registry, _) = registry();
        let stranger = MapRegistry::new()
            .current_map_mut()
            .create_path("A", "B")
            .unwrap()
            .id();
        let mut deletion = PathDeletion::new();

        assert!(matches!(
            deletion.request(&registry, stranger, &mut RecordingDialog::default()),
            Err(WayfinderError::InvalidArgument(_))
        ));
        assert_eq!(deletion.pending(), None);
    }
}
