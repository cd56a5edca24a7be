//! Integer-keyed store of ZX graphs.
//!
//! The shell checks out, copies, and diffs graphs through this manager;
//! graphs are owned exclusively here and vended by id.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ZxError, ZxResult};
use crate::graph::ZxGraph;

/// Owns all [`ZxGraph`] instances and tracks the one in focus.
#[derive(Debug, Default)]
pub struct ZxGraphMgr {
    graphs: BTreeMap<usize, ZxGraph>,
    focused: Option<usize>,
    next_id: usize,
}

impl ZxGraphMgr {
    /// Create an empty manager.
    pub fn new() -> Self {
        ZxGraphMgr::default()
    }

    /// Store a new empty graph, focus it, and return its id.
    pub fn new_graph(&mut self) -> usize {
        self.insert(ZxGraph::new())
    }

    /// Store an existing graph, focus it, and return its id.
    pub fn insert(&mut self, mut graph: ZxGraph) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        graph.set_id(id);
        self.graphs.insert(id, graph);
        self.focused = Some(id);
        debug!("checked out new graph {id}");
        id
    }

    /// Delete a graph. Focus moves to the lowest remaining id, if any.
    pub fn remove(&mut self, id: usize) -> ZxResult<()> {
        if self.graphs.remove(&id).is_none() {
            return Err(ZxError::GraphNotFound(id));
        }
        if self.focused == Some(id) {
            self.focused = self.graphs.keys().next().copied();
        }
        Ok(())
    }

    /// Focus an existing graph.
    pub fn checkout(&mut self, id: usize) -> ZxResult<&mut ZxGraph> {
        if !self.graphs.contains_key(&id) {
            return Err(ZxError::GraphNotFound(id));
        }
        self.focused = Some(id);
        Ok(self.graphs.get_mut(&id).expect("checked above"))
    }

    /// Deep-copy a graph into a new slot, focusing the copy.
    pub fn copy(&mut self, id: usize) -> ZxResult<usize> {
        let graph = self.graphs.get(&id).ok_or(ZxError::GraphNotFound(id))?.clone();
        Ok(self.insert(graph))
    }

    /// Ids of all stored graphs in order.
    pub fn list(&self) -> Vec<usize> {
        self.graphs.keys().copied().collect()
    }

    /// The id in focus, if any.
    pub fn focused_id(&self) -> Option<usize> {
        self.focused
    }

    /// Borrow a graph by id.
    pub fn get(&self, id: usize) -> Option<&ZxGraph> {
        self.graphs.get(&id)
    }

    /// Mutably borrow a graph by id.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut ZxGraph> {
        self.graphs.get_mut(&id)
    }

    /// Borrow the focused graph.
    pub fn focused(&self) -> ZxResult<&ZxGraph> {
        let id = self.focused.ok_or(ZxError::NoFocus)?;
        self.graphs.get(&id).ok_or(ZxError::GraphNotFound(id))
    }

    /// Mutably borrow the focused graph.
    pub fn focused_mut(&mut self) -> ZxResult<&mut ZxGraph> {
        let id = self.focused.ok_or(ZxError::NoFocus)?;
        self.graphs.get_mut(&id).ok_or(ZxError::GraphNotFound(id))
    }
}
