//! Bridge to a world simulated outside of the training loop
//!
//! A robot, a simulator or a remote RL peer runs on its own task or
//! thread and talks to the loop through three channels:
//!
//! - a `oneshot` handshake carrying the number of actions and the first
//!   observation, awaited by [`BridgeConnector::connect`];
//! - a `watch` slot for observations, so the loop only ever sees the most
//!   recent one;
//! - an unbounded FIFO of [`BridgeCommand`]s going back to the peer.
//!
//! ```no_run
//! # async fn demo() -> tdrl_core::Result<()> {
//! use tdrl_core::Step;
//! use tdrl_env::bridge::{self, BridgeCommand};
//!
//! let (mut peer, connector) = bridge::channel();
//! std::thread::spawn(move || {
//!     peer.announce(2, vec![0.0]).ok();
//!     while let Some(command) = peer.blocking_next_command() {
//!         let step = match command {
//!             BridgeCommand::Reset => Step::new(vec![0.0], 0.0, false),
//!             BridgeCommand::Action(a) => Step::new(vec![a as f64], -1.0, a == 1),
//!         };
//!         if peer.publish(step).is_err() {
//!             break;
//!         }
//!     }
//! });
//! let world = connector.connect().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tdrl_core::{check_action, RLError, Result, Step, World};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// Request sent by the training loop to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeCommand {
    /// Perform an action and publish the resulting observation
    Action(usize),
    /// Restart the episode and publish the initial observation
    Reset,
}

#[derive(Debug)]
struct Handshake {
    nb_actions: usize,
    initial: Vec<f64>,
}

/// Create the two ends of a bridge
#[must_use]
pub fn channel() -> (BridgePeer, BridgeConnector) {
    let (handshake_tx, handshake_rx) = oneshot::channel();
    let (observation_tx, observation_rx) = watch::channel(None);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let peer = BridgePeer {
        handshake: Some(handshake_tx),
        observations: observation_tx,
        commands: command_rx,
    };
    let connector = BridgeConnector {
        handshake: handshake_rx,
        observations: observation_rx,
        commands: command_tx,
    };
    (peer, connector)
}

/// Peer side of a bridge, owned by the external event source
#[derive(Debug)]
pub struct BridgePeer {
    handshake: Option<oneshot::Sender<Handshake>>,
    observations: watch::Sender<Option<Step>>,
    commands: mpsc::UnboundedReceiver<BridgeCommand>,
}

impl BridgePeer {
    /// Announce the number of actions and the initial state. Can only be
    /// called once.
    pub fn announce(&mut self, nb_actions: usize, initial: Vec<f64>) -> Result<()> {
        let handshake = self
            .handshake
            .take()
            .ok_or_else(|| RLError::Bridge("the world was already announced".to_string()))?;
        handshake
            .send(Handshake {
                nb_actions,
                initial,
            })
            .map_err(|_| RLError::Bridge("the connector was dropped".to_string()))
    }

    /// Publish an observation, replacing any observation not yet consumed
    pub fn publish(&self, step: Step) -> Result<()> {
        self.observations
            .send(Some(step))
            .map_err(|_| RLError::Bridge("the training loop went away".to_string()))
    }

    /// Wait for the next command, `None` once the world is dropped
    pub async fn next_command(&mut self) -> Option<BridgeCommand> {
        self.commands.recv().await
    }

    /// Blocking version of [`BridgePeer::next_command`], for peers running
    /// on their own thread. Panics if called from an async context.
    pub fn blocking_next_command(&mut self) -> Option<BridgeCommand> {
        self.commands.blocking_recv()
    }
}

/// Loop side of a bridge before the peer has announced itself
#[derive(Debug)]
pub struct BridgeConnector {
    handshake: oneshot::Receiver<Handshake>,
    observations: watch::Receiver<Option<Step>>,
    commands: mpsc::UnboundedSender<BridgeCommand>,
}

impl BridgeConnector {
    /// Wait until the peer announces the world
    pub async fn connect(self) -> Result<BridgeWorld> {
        let Handshake {
            nb_actions,
            initial,
        } = self.handshake.await.map_err(|_| {
            RLError::Bridge("the peer went away before announcing the world".to_string())
        })?;
        if nb_actions == 0 {
            return Err(RLError::config("the peer announced a world without actions"));
        }
        debug!(nb_actions, "bridge connected");

        Ok(BridgeWorld {
            nb_actions,
            initial,
            observations: self.observations,
            commands: self.commands,
        })
    }
}

/// World driven by a [`BridgePeer`]
#[derive(Debug)]
pub struct BridgeWorld {
    nb_actions: usize,
    initial: Vec<f64>,
    observations: watch::Receiver<Option<Step>>,
    commands: mpsc::UnboundedSender<BridgeCommand>,
}

impl BridgeWorld {
    /// Initial state of the current episode
    #[must_use]
    pub fn initial(&self) -> &[f64] {
        &self.initial
    }

    async fn request(&mut self, command: BridgeCommand) -> Result<Step> {
        // Observations published before the request are stale
        self.observations.borrow_and_update();
        self.commands
            .send(command)
            .map_err(|_| RLError::Bridge("the peer went away".to_string()))?;

        loop {
            self.observations
                .changed()
                .await
                .map_err(|_| RLError::Bridge("the peer went away".to_string()))?;
            let latest = self.observations.borrow_and_update().clone();
            if let Some(step) = latest {
                return Ok(step);
            }
        }
    }
}

#[async_trait]
impl World for BridgeWorld {
    fn nb_actions(&self) -> usize {
        self.nb_actions
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        let step = self.request(BridgeCommand::Reset).await?;
        self.initial.clone_from(&step.state);
        Ok(step.state)
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        check_action(action, self.nb_actions)?;
        self.request(BridgeCommand::Action(action)).await
    }
}
