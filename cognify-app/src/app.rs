use anyhow::Result;
use cognify_core::{ResponseValue, StimulusSpec, TaskKind, TrialRecord};
use cognify_engine::{
    ResponseOutcome, SessionConfig, SessionObserver, SessionResult, TaskSummary, TrialScheduler,
    aggregate,
};
use cognify_timing::{HighPrecisionTimer, Timer};
use rand::Rng;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Longest the loop sleeps before looking at input again.
const MAX_IDLE: Duration = Duration::from_millis(2);

/// Prints presentation callbacks to stdout and keeps the finished session.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    pub result: Option<SessionResult>,
}

impl SessionObserver for ConsoleObserver {
    fn on_cue_shown(&mut self, stimulus: &StimulusSpec) {
        println!("  [remember the next letter] (trial {})", stimulus.position + 1);
    }

    fn on_stimulus_shown(&mut self, stimulus: &StimulusSpec) {
        println!("{:>4}  {}", stimulus.position + 1, stimulus.payload);
    }

    fn on_trial_finalized(&mut self, trial: &TrialRecord) {
        match trial.reaction_time_ms {
            Some(rt) => println!("      {:?} ({rt:.0} ms)", trial.classification),
            None => println!("      {:?}", trial.classification),
        }
    }

    fn on_session_complete(&mut self, result: SessionResult) {
        self.result = Some(result);
    }
}

pub struct App {
    scheduler: TrialScheduler<HighPrecisionTimer, ConsoleObserver>,
    input: Receiver<String>,
}

impl App {
    pub fn new<R: Rng + ?Sized>(config: SessionConfig, rng: &mut R) -> Result<Self> {
        let timer = HighPrecisionTimer::new();
        let scheduler =
            TrialScheduler::generate(config, rng, timer, ConsoleObserver::default())?;
        Ok(Self {
            scheduler,
            input: spawn_stdin_reader(),
        })
    }

    pub fn run(mut self) -> Result<Option<SessionResult>> {
        let task = self.scheduler.task();
        println!("=== COGNIFY: {} ===", task.to_string().to_uppercase());
        println!("Platform: {}", std::env::consts::OS);
        println!("{}", instructions(task));
        println!("Type q and Enter to quit.\n");

        self.scheduler.start();
        let mut last = Instant::now();

        loop {
            if !self.drain_input() {
                self.scheduler.abort();
            }
            let phase = self.scheduler.poll();
            if phase.is_terminal() {
                break;
            }

            let timer = self.scheduler.timer();
            let wait = self
                .scheduler
                .next_deadline()
                .map(|deadline| Duration::from_nanos(deadline.saturating_sub(timer.now())))
                .unwrap_or(MAX_IDLE)
                .min(MAX_IDLE);
            timer.sleep(wait);

            let tick = last.elapsed();
            last = Instant::now();
            self.scheduler.timer_mut().record_tick(tick);
        }

        let stats = self.scheduler.timer().tick_stats();
        info!(
            samples = stats.samples,
            avg_tick_us = stats.average_tick_ns / 1000.0,
            jitter_us = stats.jitter_ns / 1000.0,
            max_tick_us = stats.max_tick_ns / 1000.0,
            "scheduler loop timing"
        );

        let status = self.scheduler.status();
        let result = self.scheduler.into_observer().result;
        if result.is_none() {
            println!("\nSession stopped ({status:?}); nothing was recorded.");
        }
        Ok(result)
    }

    /// Feeds pending input lines to the scheduler. False once the
    /// participant asked to quit.
    fn drain_input(&mut self) -> bool {
        let task = self.scheduler.task();
        loop {
            let line = match self.input.try_recv() {
                Ok(line) => line,
                // Closed stdin leaves the session to run out on its deadlines.
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return true,
            };
            let key = line.trim_end_matches(['\r', '\n']);
            if key.eq_ignore_ascii_case("q") {
                return false;
            }

            // A bare Enter stands in for the space bar.
            let key = key.chars().next().unwrap_or(' ');
            let Some(value) = ResponseValue::from_key(task, key) else {
                warn!(%key, "key has no meaning for this task");
                continue;
            };
            if let ResponseOutcome::Ignored(reason) = self.scheduler.submit_response(value) {
                info!(?reason, "response not counted");
            }
        }
    }
}

fn instructions(task: TaskKind) -> &'static str {
    match task {
        TaskKind::NBack => {
            "Press Enter when the letter matches the one shown n letters earlier."
        }
        TaskKind::Flanker => "Type < or > and Enter for the direction of the middle arrow.",
        TaskKind::Stroop => "Type the ink colour initial (r, g, b, p) and Enter. Ignore the word.",
    }
}

/// Reads stdin lines on a background thread.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Prints metrics and the persistence summary of a finished session.
pub fn report(result: &SessionResult) -> Result<()> {
    let metrics = aggregate(result);
    println!("\n=== RESULTS ===");
    println!(
        "Accuracy: {}% ({}/{})",
        metrics.accuracy, metrics.correct, metrics.total_trials
    );
    match metrics.avg_reaction_time_ms {
        Some(rt) => println!("Mean RT (correct): {rt:.1} ms"),
        None => println!("Mean RT (correct): n/a"),
    }
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    println!("\nSummary:");
    println!("{}", TaskSummary::from_metrics(result, &metrics).to_json()?);
    Ok(())
}
