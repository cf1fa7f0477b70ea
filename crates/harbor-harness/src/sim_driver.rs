//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`harbor_app::Runtime`] orchestration code runs in both production and
//! simulation, with injected inputs, captured outputs, and a virtual clock.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use harbor_app::{App, AppAction, AppEvent, Driver, ServerMessage};
use harbor_client::OutboundRequest;

/// Error type for the simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    incoming: VecDeque<ServerMessage>,
    sent: Vec<OutboundRequest>,
    connected: bool,
    fail_sends: bool,
    base: Instant,
    elapsed: Duration,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            pending_events: VecDeque::new(),
            incoming: VecDeque::new(),
            sent: Vec::new(),
            connected: false,
            fail_sends: false,
            base: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements the [`Driver`] trait so the same [`harbor_app::Runtime`]
/// orchestration code runs in both the production TUI and simulation tests.
/// Time never advances on its own; call [`SimDriver::advance`].
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())) }
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.state.lock().unwrap().pending_events.push_back(event);
    }

    /// Inject a message from the server.
    pub fn inject_server(&self, message: ServerMessage) {
        self.state.lock().unwrap().incoming.push_back(message);
    }

    /// Take all captured outgoing requests.
    pub fn take_sent(&self) -> Vec<OutboundRequest> {
        std::mem::take(&mut self.state.lock().unwrap().sent)
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        let state = self.state.lock().unwrap();
        !state.pending_events.is_empty() || !state.incoming.is_empty()
    }

    /// Advance the virtual clock.
    pub fn advance(&self, duration: Duration) {
        self.state.lock().unwrap().elapsed += duration;
    }

    /// Make subsequent sends fail, exercising the failed-ack path.
    pub fn set_fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let event = self.state.lock().unwrap().pending_events.pop_front();
        match event {
            Some(event) => Ok(app.handle(event)),
            None => Ok(vec![]),
        }
    }

    async fn send_request(&mut self, request: OutboundRequest) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(SimDriverError(format!("send of {} refused", request.id)));
        }
        state.sent.push(request);
        Ok(())
    }

    async fn recv_server(&mut self) -> Option<ServerMessage> {
        self.state.lock().unwrap().incoming.pop_front()
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.state.lock().unwrap().connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn now(&self) -> Self::Instant {
        let state = self.state.lock().unwrap();
        state.base + state.elapsed
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn inject_event_queues_event() {
        let driver = SimDriver::new();
        driver.inject_event(AppEvent::Tick);

        assert!(driver.has_pending());
    }

    #[test]
    fn virtual_clock_only_moves_when_advanced() {
        let driver = SimDriver::new();
        let before = driver.now();
        assert_eq!(driver.now(), before);

        driver.advance(Duration::from_secs(5));
        assert_eq!(driver.now() - before, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn poll_event_processes_event() {
        let mut driver = SimDriver::new();
        let mut app = App::new();
        driver.inject_event(AppEvent::Resize(120, 40));

        let actions = driver.poll_event(&mut app).await.unwrap();
        assert!(actions.iter().any(|a| matches!(a, AppAction::Render)));
        assert_eq!(app.terminal_size(), (120, 40));
    }

    #[tokio::test]
    async fn send_request_captures() {
        use harbor_proto::wire::{ClientRequest, RequestId};

        let mut driver = SimDriver::new();
        let request =
            OutboundRequest { id: RequestId(1), request: ClientRequest::Directory };

        driver.send_request(request).await.unwrap();

        let captured = driver.take_sent();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].id, RequestId(1));
    }

    #[tokio::test]
    async fn failing_sends_return_errors() {
        use harbor_proto::wire::{ClientRequest, RequestId};

        let mut driver = SimDriver::new();
        driver.set_fail_sends(true);

        let request =
            OutboundRequest { id: RequestId(7), request: ClientRequest::Directory };
        assert!(driver.send_request(request).await.is_err());
        assert!(driver.take_sent().is_empty());
    }
}
