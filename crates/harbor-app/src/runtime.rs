//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to the session
//! - [`Driver`]: Platform-specific I/O

use harbor_client::IdentityStorage;

use crate::{App, AppAction, AppEvent, Bridge, Driver, ServerMessage};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `S`: Identity storage backend
pub struct Runtime<D, S>
where
    D: Driver,
    S: IdentityStorage,
{
    driver: D,
    app: App,
    bridge: Bridge<S, D::Instant>,
}

impl<D, S> Runtime<D, S>
where
    D: Driver,
    S: IdentityStorage,
{
    /// Create a new runtime with the given driver and bridge.
    pub fn new(driver: D, bridge: Bridge<S, D::Instant>) -> Self {
        Self { driver, app: App::new(), bridge }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Receives server messages and pumps them through the bridge
    /// 3. Processes actions and events between App and Bridge
    /// 4. Sends outgoing requests through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;
        self.connect().await?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        if let Some(message) = self.driver.recv_server().await {
            let mut events = self.bridge.handle_server(message);
            events.extend(self.flush_outgoing().await);
            if self.process_events(events).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let events = self.bridge.handle_tick(now);
        if self.process_events(events).await? {
            return Ok(true);
        }

        Ok(false)
    }

    /// Process events from the Bridge back to the App.
    async fn process_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        let mut actions = Vec::new();
        for event in events {
            actions.extend(self.app.handle(event));
        }
        self.process_actions(actions).await
    }

    /// Process actions returned by the App.
    ///
    /// Session-bound actions are routed through the bridge; the events the
    /// bridge produces feed back into the App within the same pass, so a
    /// single user action settles completely before the next poll.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect => self.connect().await?,

                    // Session operations go through the bridge
                    AppAction::Login { .. }
                    | AppAction::Logout
                    | AppAction::SendMessage { .. }
                    | AppAction::RequestNewChannelName
                    | AppAction::RefreshDirectory => {
                        let mut events = self.bridge.process_app_action(action);
                        events.extend(self.flush_outgoing().await);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Start (or restart) the server connection.
    async fn connect(&mut self) -> Result<(), D::Error> {
        self.driver.connect().await?;
        Ok(())
    }

    /// Send all pending outgoing requests to the server.
    ///
    /// A request the driver cannot send is reported back to the session as a
    /// failed acknowledgement, so its pending slot is released.
    async fn flush_outgoing(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        for request in self.bridge.take_outgoing() {
            let id = request.id;
            if let Err(error) = self.driver.send_request(request).await {
                tracing::warn!(%id, %error, "failed to send request");
                events.extend(self.bridge.handle_server(ServerMessage::AckFailed { id }));
            }
        }
        events
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
