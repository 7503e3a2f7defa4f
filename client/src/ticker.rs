use std::{
    sync::{
        Arc, RwLock,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread,
    time::Duration,
};

use libgame::StepOutcome;
use log::{debug, error, info};

use crate::State;

/// Handle of the thread that steps the play field while the game is running.
/// Dropping the handle stops the thread before its next step.
pub struct TickerHost {
    stop_sender: Sender<()>,
    rate_sender: Sender<Duration>,
}

impl TickerHost {
    pub fn start(state_arc: Arc<RwLock<State>>, interval: Duration) -> Self {
        let (stop_sender, stop_receiver) = mpsc::channel();
        let (rate_sender, rate_receiver) = mpsc::channel();

        thread::spawn(move || run(state_arc, interval, stop_receiver, rate_receiver));

        Self {
            stop_sender,
            rate_sender,
        }
    }

    pub fn stop(self) {
        // The thread is gone already if the game went stable.
        let _ = self.stop_sender.send(());
    }

    pub fn set_interval(&self, interval: Duration) {
        let _ = self.rate_sender.send(interval);
    }
}

fn run(
    state_arc: Arc<RwLock<State>>,
    mut interval: Duration,
    stop_receiver: Receiver<()>,
    rate_receiver: Receiver<Duration>,
) {
    debug!("Ticker started, {interval:?} per generation");

    loop {
        spin_sleep::sleep(interval);

        let Ok(mut state) = state_arc.write() else {
            error!("State lock is poisoned, stopping the ticker");
            return;
        };

        // Checked under the lock, whoever stopped us did so while holding it.
        match stop_receiver.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Disconnected) => {
                debug!("Ticker stopped");
                return;
            }
        }

        if let Some(rate) = rate_receiver.try_iter().last() {
            interval = rate;
        }

        let outcome = state.play_field.step();
        state.play_field.living_cells();

        if outcome == StepOutcome::Stable {
            info!(
                "Generation {} is stable, pausing",
                state.play_field.generation()
            );
            state.ticker = None;
            return;
        }
    }
}
