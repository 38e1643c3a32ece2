use tracing::{debug, warn};

use super::edge::{EdgeStore, EdgeTypeStore};
use super::label::LabelStore;
use super::node::NodeStore;
use super::options::StoreOptions;
use super::props::{PropertyNameStore, PropertyStore};
use super::record::StoreConfig;
use super::store::RecordStore;
use crate::types::Result;

/// The six stores that make up one graph directory.
///
/// Each store keeps its own lock; this type only opens, syncs, and closes
/// them together.
pub struct GraphStores {
    /// Node records.
    pub nodes: NodeStore,
    /// Edge records.
    pub edges: EdgeStore,
    /// Edge type names.
    pub edge_types: EdgeTypeStore,
    /// Label names.
    pub labels: LabelStore,
    /// Property names.
    pub property_names: PropertyNameStore,
    /// Property headers and payloads.
    pub properties: PropertyStore,
}

/// Lifecycle shared by every member store.
trait Member {
    fn open(&self) -> Result<()>;
    fn close(&self);
    fn is_open(&self) -> bool;
    fn sync(&self) -> Result<()>;
}

impl<C: StoreConfig> Member for RecordStore<C> {
    fn open(&self) -> Result<()> {
        RecordStore::open(self)
    }

    fn close(&self) {
        RecordStore::close(self);
    }

    fn is_open(&self) -> bool {
        RecordStore::is_open(self)
    }

    fn sync(&self) -> Result<()> {
        RecordStore::sync(self)
    }
}

impl Member for PropertyStore {
    fn open(&self) -> Result<()> {
        PropertyStore::open(self)
    }

    fn close(&self) {
        PropertyStore::close(self);
    }

    fn is_open(&self) -> bool {
        PropertyStore::is_open(self)
    }

    fn sync(&self) -> Result<()> {
        PropertyStore::sync(self)
    }
}

impl GraphStores {
    /// Creates closed stores sharing `options`.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            nodes: NodeStore::new(options.clone()),
            edges: EdgeStore::new(options.clone()),
            edge_types: EdgeTypeStore::new(options.clone()),
            labels: LabelStore::new(options.clone()),
            property_names: PropertyNameStore::new(options.clone()),
            properties: PropertyStore::new(options),
        }
    }

    fn members(&self) -> [&dyn Member; 6] {
        [
            &self.nodes,
            &self.edges,
            &self.edge_types,
            &self.labels,
            &self.property_names,
            &self.properties,
        ]
    }

    /// Opens every store, in field order.
    ///
    /// If one fails, the stores this call opened before it are closed again
    /// and the error is returned. Stores opened by the caller beforehand are
    /// left as they were.
    pub fn open(&self) -> Result<()> {
        let members = self.members();
        for (idx, member) in members.iter().enumerate() {
            if let Err(err) = member.open() {
                warn!(error = %err, opened = idx, "graph_stores.open_failed");
                for opened in &members[..idx] {
                    opened.close();
                }
                return Err(err);
            }
        }
        debug!(dir = %self.nodes.options().dir.display(), "graph_stores.open");
        Ok(())
    }

    /// Closes every store. Stores that are not open are skipped.
    pub fn close(&self) {
        for member in self.members() {
            member.close();
        }
    }

    /// Returns true only when every store is open.
    pub fn is_open(&self) -> bool {
        self.members().iter().all(|member| member.is_open())
    }

    /// Flushes every store to disk.
    pub fn sync(&self) -> Result<()> {
        self.members().iter().try_for_each(|member| member.sync())
    }
}
