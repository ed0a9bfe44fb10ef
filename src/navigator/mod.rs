//! Navigator for the remote directory tree
//!
//! The navigator owns the current [`Location`] and the decoded [`Node`] at that
//! location, and provides the only transitions between them:
//!
//! | From | Operation | To |
//! |------|-----------|----|
//! | folder | `move_to` a folder child | folder |
//! | folder | `move_to` a table child | table |
//! | table | `move_to` | error (`InvalidState`) |
//! | any | `move_back`, `set_path`, `reset` | as decoded |
//!
//! One navigator serves one walker; independent walkers each own their own.

mod location;
mod state;

pub use location::Location;
pub use state::{NavState, Selection};

use crate::node::{decode_payload, Node, TableDescriptor};
use crate::transport::Transport;
use crate::{Result, StatError};
use url::Url;

/// Stateful walker over the PXWeb folder tree
pub struct Navigator {
    transport: Transport,
    location: Location,
    /// `None` until the current location has been fetched
    node: Option<Node>,
}

impl Navigator {
    /// Creates a navigator positioned at `root`
    ///
    /// No request is made until the first operation needs the root node.
    pub fn new(transport: Transport, root: Url) -> Self {
        Self {
            transport,
            location: Location::new(root),
            node: None,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Full URL of the current location
    pub fn url(&self) -> Url {
        self.location.url()
    }

    pub fn root_url(&self) -> &Url {
        self.location.root()
    }

    pub fn state(&self) -> NavState {
        match self.node {
            Some(Node::Table(_)) => NavState::AtTable,
            _ => NavState::AtFolder,
        }
    }

    pub fn is_at_table(&self) -> bool {
        self.state().is_terminal()
    }

    /// The decoded node at the current location, if already fetched
    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn table(&self) -> Option<&TableDescriptor> {
        self.node.as_ref().and_then(Node::as_table)
    }

    /// Title of the current table
    pub fn title(&self) -> Option<&str> {
        self.table().map(|table| table.title.as_str())
    }

    /// Navigable ids of the current folder; empty at a table or before the first fetch
    pub fn options(&self) -> Vec<Option<&str>> {
        self.node
            .as_ref()
            .and_then(Node::as_folder)
            .map(|listing| listing.ids())
            .unwrap_or_default()
    }

    /// Returns to the root; the root is fetched by the next operation
    pub fn reset(&mut self) {
        tracing::debug!("Resetting to {}", self.location.root());
        self.location.clear();
        self.node = None;
    }

    /// Returns the current node, fetching it first if needed
    pub async fn current(&mut self) -> Result<&Node> {
        let node = match self.node.take() {
            Some(node) => node,
            None => self.load(&self.location.url()).await?,
        };
        Ok(self.node.insert(node))
    }

    /// Re-fetches the current location without moving
    pub async fn refresh(&mut self) -> Result<&Node> {
        let url = self.location.url();
        let node = self.load(&url).await?;
        Ok(self.node.insert(node))
    }

    /// Moves forward to a child of the current folder
    ///
    /// # Errors
    ///
    /// * `InvalidState` - the current node is a table
    /// * `InvalidSelection` - index out of range, unknown id, or an unnavigable entry
    /// * transport and decode errors; the location is left unchanged
    pub async fn move_to(&mut self, selection: impl Into<Selection>) -> Result<&Node> {
        let selection = selection.into();
        self.current().await?;

        let id = match self.node.as_ref() {
            Some(Node::Folder(listing)) => match &selection {
                Selection::Index(index) => listing.id_at(*index),
                Selection::Id(id) => listing.contains_id(id).then_some(id.as_str()),
            }
            .map(str::to_string),
            _ => {
                return Err(StatError::InvalidState {
                    location: self.location.to_string(),
                    operation: "move forward from a table",
                })
            }
        };

        let id = id.ok_or_else(|| StatError::InvalidSelection {
            location: self.location.to_string(),
            selection: selection.to_string(),
        })?;

        let url = self.location.child_url(&id);
        let node = self.load(&url).await.map_err(|e| {
            tracing::debug!("Selection '{}' at {} failed: {}", selection, self.location, e);
            e
        })?;

        self.location.push(id);
        if let Node::Table(table) = &node {
            tracing::info!("Reached table '{}' at {}", table.title, url);
        }

        Ok(self.node.insert(node))
    }

    /// Moves back `steps` segments, clamping at the root
    pub async fn move_back(&mut self, steps: usize) -> Result<&Node> {
        let depth = self.location.depth();
        if steps > depth {
            tracing::info!(
                "Cannot go back {} steps from depth {}, going to root",
                steps,
                depth
            );
            self.location.clear();
        } else {
            self.location.pop(steps);
        }

        self.node = None;
        self.refresh().await
    }

    /// Jumps directly to a path below the root and fetches it
    ///
    /// `path` is either relative to the root or a full URL under it.
    pub async fn set_path(&mut self, path: &str) -> Result<&Node> {
        let segments = Location::parse_path(self.location.root(), path).ok_or_else(|| {
            StatError::InvalidSelection {
                location: self.location.to_string(),
                selection: path.to_string(),
            }
        })?;

        self.location.replace(segments);
        self.node = None;
        self.refresh().await
    }

    async fn load(&self, url: &Url) -> Result<Node> {
        let payload = self.transport.get(url).await?;
        decode_payload(url, &payload)
    }
}
