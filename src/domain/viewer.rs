use crate::domain::entities::AuthorRecord;

/// Per-request identity, resolved once by the HTTP layer and threaded into
/// every operation. There is no ambient request state anywhere below this.
#[derive(Debug, Clone, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Known(AuthorRecord),
}

impl Viewer {
    /// The single capability gate: staff or superuser. Everything in the
    /// mutation path and the draft-visibility check reduces to this boolean.
    pub fn is_privileged(&self) -> bool {
        match self {
            Viewer::Anonymous => false,
            Viewer::Known(author) => author.is_staff || author.is_superuser,
        }
    }

    pub fn author(&self) -> Option<&AuthorRecord> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Known(author) => Some(author),
        }
    }
}
