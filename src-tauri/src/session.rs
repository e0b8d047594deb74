use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{MarketError, MarketResult};

/// Snapshot of the active wallet connection
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub account: String,
    pub chain_id: String,
}

#[derive(Debug)]
struct ActiveConnection {
    account: String,
    chain_id: String,
    connected_at: Instant,
}

#[derive(Debug, Default)]
struct ConnectionState {
    active: Option<ActiveConnection>,
}

/// Tracks the wallet connection handed out to workflow functions.
///
/// Workflows never read ambient provider state; they receive the connected
/// account from here explicitly.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    state: Arc<RwLock<ConnectionState>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState::default())),
        }
    }

    pub fn is_connected(&self) -> bool {
        let state = self.state.read();
        state.active.is_some()
    }

    /// Record a fresh connection from the wallet provider.
    pub fn connect(&self, account: String, chain_id: String) {
        let mut state = self.state.write();
        state.active = Some(ActiveConnection {
            account,
            chain_id,
            connected_at: Instant::now(),
        });
    }

    /// Drop the active connection.
    pub fn disconnect(&self) {
        let mut state = self.state.write();
        state.active = None;
    }

    /// The connected account, or an error when nothing is connected.
    pub fn account(&self) -> MarketResult<String> {
        let state = self.state.read();
        state
            .active
            .as_ref()
            .map(|c| c.account.clone())
            .ok_or(MarketError::NotConnected)
    }

    /// Update the recorded chain after a wallet-side switch.
    pub fn set_chain(&self, chain_id: String) -> MarketResult<()> {
        let mut state = self.state.write();
        let active = state.active.as_mut().ok_or(MarketError::NotConnected)?;
        active.chain_id = chain_id;
        Ok(())
    }

    /// Snapshot of the connection, if any.
    pub fn info(&self) -> Option<ConnectionInfo> {
        let state = self.state.read();
        state.active.as_ref().map(|c| ConnectionInfo {
            account: c.account.clone(),
            chain_id: c.chain_id.clone(),
        })
    }

    /// Seconds since the connection was established.
    pub fn connected_for_secs(&self) -> Option<u64> {
        let state = self.state.read();
        state
            .active
            .as_ref()
            .map(|c| c.connected_at.elapsed().as_secs())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_and_disconnect_cycle() {
        let manager = ConnectionManager::new();
        assert!(!manager.is_connected());

        manager.connect(
            "0x00000000000000000000000000000000000000aa".to_string(),
            "0x27d8".to_string(),
        );
        assert!(manager.is_connected());
        assert_eq!(
            manager.account().unwrap(),
            "0x00000000000000000000000000000000000000aa"
        );

        manager.disconnect();
        assert!(!manager.is_connected());
    }

    #[test]
    fn account_errors_when_disconnected() {
        let manager = ConnectionManager::new();
        let err = manager.account().unwrap_err();
        assert!(matches!(err, MarketError::NotConnected));
    }

    #[test]
    fn chain_updates_require_connection() {
        let manager = ConnectionManager::new();
        assert!(manager.set_chain("0x64".to_string()).is_err());

        manager.connect(
            "0x00000000000000000000000000000000000000aa".to_string(),
            "0x27d8".to_string(),
        );
        manager.set_chain("0x64".to_string()).unwrap();
        assert_eq!(manager.info().unwrap().chain_id, "0x64");
    }
}
