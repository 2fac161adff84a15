//! Producer event stream.
//!
//! Generators write one JSON object per line:
//!
//! ```text
//! {"event":"entity","canonicalName":"com.example.Widget","pageUri":"/widget","anchorName":"Widget"}
//! {"event":"page","path":"/widget","root":{"type":"root","children":[]}}
//! {"event":"diagnostic","severity":"warning","message":"no javadoc for Widget"}
//! ```

use serde::Deserialize;
use serde_json::Value;
use yd_project::{Entity, EntityKind, Severity};
use yd_tree::Node;

/// One line of producer output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub(crate) enum ProducerEvent {
    Entity(EntityEvent),
    Page {
        path: String,
        root: Node,
    },
    Diagnostic {
        severity: Severity,
        message: String,
    },
}

/// Entity declaration. `data` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntityEvent {
    pub(crate) canonical_name: String,
    pub(crate) page_uri: String,
    #[serde(default)]
    pub(crate) anchor_name: String,
    #[serde(default)]
    pub(crate) kind: EntityKind,
    #[serde(default)]
    pub(crate) data: Option<Value>,
}

impl EntityEvent {
    pub(crate) fn into_entity(self) -> Entity<Value> {
        let entity = Entity::new(self.canonical_name, self.page_uri, self.anchor_name)
            .with_kind(self.kind);
        match self.data {
            Some(data) => entity.with_data(data),
            None => entity,
        }
    }
}
