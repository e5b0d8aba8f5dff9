//! Session storage: the simulation carried from one command to the next.

use std::{fs, io};

use tracing::debug;

use crate::simulator::Simulation;

use super::{Result, Storage, StorageError, read_json, write_json};

impl Storage {
    /// Loads the saved simulation, or a fresh one if none was saved.
    pub fn load_session(&self) -> Result<Simulation> {
        let path = self.session_path();
        let session = read_json(&path)?;
        if session.is_none() {
            debug!("no saved session, starting fresh");
        }
        Ok(session.unwrap_or_default())
    }

    pub fn save_session(&self, session: &Simulation) -> Result<()> {
        write_json(&self.session_path(), session)
    }

    /// Forgets the saved simulation. Idempotent.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}
