//! UCI engine process - spawns the engine and asks it for moves.
//!
//! Architecture:
//! - Engine I/O runs on OS threads (reader/writer) connected by channels
//! - Requests are synchronous: `suggest_move` blocks until `bestmove` arrives
//!   or the deadline (thinking time + grace) passes
//! - The process is quit and reaped on shutdown, which `Drop` also performs

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::domain::uci::{BestMove, UciCommand, UciInfo, UciOutputKind};
use crate::domain::{ChessMove, EngineError, GameBoard, MoveEngine};

/// How long a quitting engine gets before it is killed
const QUIT_GRACE: Duration = Duration::from_millis(200);

/// Messages sent from the engine reader thread
#[derive(Debug)]
enum EngineEvent {
    /// A line of output from the engine
    Output(String),
    /// Engine process exited
    Exited,
    /// Error occurred
    Error(String),
}

pub struct UciEngine {
    /// Channel receiver for engine output
    events: Receiver<EngineEvent>,
    /// Channel sender for commands to the writer thread
    command_sender: Option<Sender<String>>,
    process: Option<Child>,
    running: bool,
    reply_grace: Duration,
}

impl UciEngine {
    /// Start the engine and complete the UCI handshake
    pub fn spawn(settings: &EngineSettings) -> Result<Self, EngineError> {
        let mut child = Command::new(&settings.path)
            .args(&settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: settings.path.display().to_string(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Disconnected);
        };

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<String>();

        // reader thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(text) => {
                        if event_tx.send(EngineEvent::Output(text)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(EngineEvent::Error(e.to_string()));
                        return;
                    }
                }
            }
            let _ = event_tx.send(EngineEvent::Exited);
        });

        // writer thread, ends when the sender is dropped
        thread::spawn(move || {
            let mut writer = stdin;
            while let Ok(cmd) = cmd_rx.recv() {
                if writeln!(writer, "{}", cmd).is_err() || writer.flush().is_err() {
                    break;
                }
            }
        });

        let pid = child.id();
        let mut engine = Self {
            events: event_rx,
            command_sender: Some(cmd_tx),
            process: Some(child),
            running: true,
            reply_grace: settings.reply_grace(),
        };

        // on failure `engine` is dropped here, which kills the process
        engine.handshake(settings)?;
        info!(path = %settings.path.display(), pid, "engine started");
        Ok(engine)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn handshake(&mut self, settings: &EngineSettings) -> Result<(), EngineError> {
        let timeout = settings.handshake_timeout();
        self.send_command(UciCommand::Uci)?;
        let deadline = Instant::now() + timeout;
        self.wait_for(deadline, |kind| match kind {
            UciOutputKind::Id(id) => {
                info!("engine {}", id);
                None
            }
            UciOutputKind::UciOk => Some(()),
            _ => None,
        })?
        .ok_or(EngineError::Handshake("uci"))?;

        for (name, value) in &settings.options {
            self.send_command(UciCommand::SetOption {
                name: name.clone(),
                value: value.clone(),
            })?;
        }

        self.send_command(UciCommand::IsReady)?;
        let deadline = Instant::now() + timeout;
        self.wait_for(deadline, |kind| matches!(kind, UciOutputKind::ReadyOk).then_some(()))?
            .ok_or(EngineError::Handshake("isready"))?;

        self.send_command(UciCommand::UciNewGame)
    }

    /// Send a UCI command to the engine
    fn send_command(&self, cmd: UciCommand) -> Result<(), EngineError> {
        let cmd_str = cmd.to_uci_string();
        debug!(">> {}", cmd_str);
        match &self.command_sender {
            Some(tx) => tx.send(cmd_str).map_err(|_| EngineError::Disconnected),
            None => Err(EngineError::Disconnected),
        }
    }

    /// Read lines until `accept` returns a value. `Ok(None)` means the
    /// deadline passed first.
    fn wait_for<T>(
        &mut self,
        deadline: Instant,
        mut accept: impl FnMut(UciOutputKind) -> Option<T>,
    ) -> Result<Option<T>, EngineError> {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            match self.events.recv_timeout(remaining) {
                Ok(EngineEvent::Output(line)) => {
                    debug!("<< {}", line);
                    if let Some(value) = accept(UciOutputKind::parse(&line)) {
                        return Ok(Some(value));
                    }
                }
                Ok(EngineEvent::Error(e)) => {
                    self.running = false;
                    return Err(EngineError::Io(std::io::Error::other(e)));
                }
                Ok(EngineEvent::Exited) | Err(RecvTimeoutError::Disconnected) => {
                    self.running = false;
                    return Err(EngineError::Disconnected);
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
            }
        }
    }

    /// Drop output left over from an earlier request
    fn drain_stale(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EngineEvent::Output(line) => debug!("<< (stale) {}", line),
                EngineEvent::Exited | EngineEvent::Error(_) => self.running = false,
            }
        }
    }

    /// Stop the engine process
    pub fn stop(&mut self) {
        if let Some(tx) = self.command_sender.take() {
            let _ = tx.send(UciCommand::Quit.to_uci_string());
        }
        self.running = false;

        let Some(mut child) = self.process.take() else {
            return;
        };
        let deadline = Instant::now() + QUIT_GRACE;
        while Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(_) => break,
            }
        }
        if let Ok(None) = child.try_wait() {
            let _ = child.kill();
        }
        let _ = child.wait();
        info!("engine stopped");
    }
}

/// `go movetime` argument; budgets beyond `u64` milliseconds saturate
fn movetime_ms(budget: Duration) -> u64 {
    u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)
}

impl MoveEngine for UciEngine {
    fn suggest_move(&mut self, board: &GameBoard, budget: Duration) -> Result<ChessMove, EngineError> {
        self.drain_stale();
        if !self.is_running() {
            return Err(EngineError::Disconnected);
        }

        self.send_command(UciCommand::Position {
            fen: Some(board.fen()),
            moves: vec![],
        })?;
        self.send_command(UciCommand::GoMoveTime(movetime_ms(budget)))?;

        let limit = budget + self.reply_grace;
        let mut last_info: Option<UciInfo> = None;
        let reply = self.wait_for(Instant::now() + limit, |kind| match kind {
            UciOutputKind::Info(text) => {
                let info = UciInfo::parse(&text);
                if info.depth.is_some() {
                    last_info = Some(info);
                }
                None
            }
            UciOutputKind::BestMove(rest) => Some(rest),
            _ => None,
        })?;

        let Some(rest) = reply else {
            warn!("engine silent for {:?}, sending stop", limit);
            let _ = self.send_command(UciCommand::Stop);
            return Err(EngineError::Timeout(limit));
        };

        if let Some(info) = last_info {
            debug!(
                depth = ?info.depth,
                score = ?info.score,
                nodes = ?info.nodes,
                time = ?info.time,
                pv = %info.pv.join(" "),
                "search finished"
            );
        }

        match BestMove::parse(&rest) {
            Some(BestMove::Move { best, ponder }) => {
                debug!(best = %best, ponder = ?ponder, "bestmove");
                Ok(best)
            }
            Some(BestMove::NoMove) => Err(EngineError::NoMove),
            None => Err(EngineError::MalformedReply(rest)),
        }
    }

    fn shutdown(&mut self) {
        self.stop();
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
