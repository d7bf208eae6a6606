use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::session::{Inner, Picasa};

/// Upward-only handle from a record to its parent record.
///
/// Holds a set-once, weak reference to the session that fetched the
/// document. A record that has no session of its own asks its parent.
#[derive(Clone, Default)]
pub struct Lineage(Arc<Frame>);

#[derive(Default)]
struct Frame {
    session: OnceLock<Weak<Inner>>,
    parent: Option<Lineage>,
}

impl Lineage {
    /// A lineage with no parent.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(parent: Option<&Lineage>) -> Self {
        Lineage(Arc::new(Frame {
            session: OnceLock::new(),
            parent: parent.cloned(),
        }))
    }

    pub fn parent(&self) -> Option<&Lineage> {
        self.0.parent.as_ref()
    }

    /// Attaches `session` to this record. Only the first call has effect.
    pub fn set_session(&self, session: &Picasa) {
        if self.0.session.set(session.downgrade()).is_err() {
            tracing::trace!("Session already set on this lineage");
        }
    }

    /// The nearest live session, walking up through parents.
    pub fn session(&self) -> Option<Picasa> {
        let mut current = Some(self);
        while let Some(lineage) = current {
            if let Some(inner) = lineage.0.session.get().and_then(Weak::upgrade) {
                return Some(Picasa::from_inner(inner));
            }
            current = lineage.parent();
        }
        None
    }
}

impl fmt::Debug for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lineage")
            .field("has_session", &self.0.session.get().is_some())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_root_without_session() {
        assert!(Lineage::root().session().is_none());
    }

    #[test]
    fn test_session_found_through_parent() {
        let session = Picasa::new(&Config::default()).expect("client");
        let parent = Lineage::root();
        let child = Lineage::new(Some(&parent));
        let grandchild = Lineage::new(Some(&child));

        assert!(grandchild.session().is_none());
        parent.set_session(&session);
        assert!(grandchild.session().is_some_and(|s| s.same_session(&session)));
    }

    #[test]
    fn test_session_is_not_owned() {
        let lineage = Lineage::root();
        {
            let session = Picasa::new(&Config::default()).expect("client");
            lineage.set_session(&session);
            assert!(lineage.session().is_some());
        }
        assert!(lineage.session().is_none());
    }

    #[test]
    fn test_first_session_wins() {
        let first = Picasa::new(&Config::default()).expect("client");
        let second = Picasa::new(&Config::default()).expect("client");
        let lineage = Lineage::root();
        lineage.set_session(&first);
        lineage.set_session(&second);
        assert!(lineage.session().is_some_and(|s| s.same_session(&first)));
    }
}
