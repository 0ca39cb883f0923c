use anyhow::Context;
use parking_lot::Mutex;
use std::{sync::Arc, time::Instant};

use trundle_command::{DriveController, Reply};
use trundle_drive::{DigitalOutput, DutyOutput, Settle};
use trundle_motion::MotionState;

/// The drive as seen by the transport.
pub trait CommandHandler: Send {
    fn handle(&mut self, text: &str) -> Reply;
    fn park(&mut self);
    fn motion(&self) -> MotionState;
}

impl<P, L, S> CommandHandler for DriveController<P, L, S>
where
    P: DutyOutput + Send,
    L: DigitalOutput + Send,
    S: Settle + Send,
{
    fn handle(&mut self, text: &str) -> Reply {
        DriveController::handle(self, text)
    }

    fn park(&mut self) {
        DriveController::park(self)
    }

    fn motion(&self) -> MotionState {
        *self.state()
    }
}

pub struct Station {
    handler: Box<dyn CommandHandler>,
    pub last_cmd_ts: Option<Instant>,
    pub commands_handled: u64,
}

pub type Blackboard = Arc<Mutex<Station>>;

pub fn new(handler: impl CommandHandler + 'static) -> Blackboard {
    Arc::new(Mutex::new(Station {
        handler: Box::new(handler),
        last_cmd_ts: None,
        commands_handled: 0,
    }))
}

pub fn snapshot(bb: &Blackboard) -> MotionState {
    bb.lock().handler.motion()
}

/// Run one command to completion on the blocking pool.
///
/// The settling interlock sleeps inside the handler, so the caller must not
/// accept the next command until this resolves.
pub async fn dispatch(bb: &Blackboard, text: String) -> anyhow::Result<Reply> {
    let bb = Arc::clone(bb);
    tokio::task::spawn_blocking(move || {
        let mut station = bb.lock();
        station.last_cmd_ts = Some(Instant::now());
        station.commands_handled += 1;
        station.handler.handle(&text)
    })
    .await
    .context("command handler panicked")
}

pub fn park(bb: &Blackboard) {
    bb.lock().handler.park();
}
