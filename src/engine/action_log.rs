use super::types::{ActionEntry, ActionPayload};
use crate::action::persistence::FileWriter;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Append-only audit trail of everything that happened during a match.
/// Engine logic never reads it back; it exists for replay and debugging.
#[derive(Debug)]
pub struct ActionLog {
    pub entries: Arc<Mutex<Vec<ActionEntry>>>,
    pub seq: AtomicU64,
    pub sender: mpsc::Sender<ActionEntry>,
    pub writer: Option<FileWriter>,
}

impl Clone for ActionLog {
    fn clone(&self) -> Self {
        // snapshot existing entries and seq
        let entries_vec = match self.entries.lock() {
            Ok(g) => g.clone(),
            Err(e) => e.into_inner().clone(),
        };
        let seq_val = self.seq.load(Ordering::SeqCst);
        // create a fresh ActionLog (spawns its own worker)
        let new = ActionLog::new();
        match new.entries.lock() {
            Ok(mut g) => *g = entries_vec,
            Err(err) => *err.into_inner() = entries_vec,
        }
        new.seq.store(seq_val, Ordering::SeqCst);
        Self {
            entries: new.entries,
            seq: new.seq,
            sender: new.sender,
            writer: self.writer.clone(),
        }
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        ActionLog::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel::<ActionEntry>();
        thread::spawn(move || {
            // Dedicated worker receives entries for offloaded processing
            // (persistence, analytics). append() writes into the in-memory
            // entries itself, so the worker only drains the channel.
            for _entry in rx {}
        });
        ActionLog {
            entries,
            seq: AtomicU64::new(0),
            sender: tx,
            writer: None,
        }
    }

    pub fn set_writer(&mut self, writer: Option<FileWriter>) {
        self.writer = writer;
    }

    pub fn load_from_file(path: &str) -> Result<ActionLog, String> {
        let file = File::open(path).map_err(|e| e.to_string())?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut max_seq = 0u64;
        for line in reader.lines() {
            let line = line.map_err(|e| e.to_string())?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: ActionEntry = serde_json::from_str(&line).map_err(|e| e.to_string())?;
            if entry.seq > max_seq {
                max_seq = entry.seq;
            }
            entries.push(entry);
        }
        let log = ActionLog::new();
        {
            match log.entries.lock() {
                Ok(mut g) => *g = entries,
                Err(e) => *e.into_inner() = entries,
            };
        }
        log.seq.store(max_seq, Ordering::SeqCst);
        Ok(log)
    }

    pub fn write_all_to_file(&self, path: &str) -> Result<(), String> {
        let entries = self.entries();
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| e.to_string())?;
        for e in entries {
            let line = serde_json::to_string(&e).map_err(|e| e.to_string())?;
            writeln!(f, "{}", line).map_err(|e| e.to_string())?;
        }
        f.flush().map_err(|e| e.to_string())
    }

    /// Append an entry, assigning the next sequence number. Writes into the
    /// in-memory entries synchronously and forwards a copy to the worker
    /// and (when configured) the file writer, best effort.
    pub fn append(&self, action_type: &str, payload: ActionPayload) -> ActionEntry {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(dur) => format!("{}", dur.as_millis()),
            Err(_) => "0".to_string(),
        };
        let entry = ActionEntry {
            seq,
            action_type: action_type.to_string(),
            payload,
            timestamp,
        };
        match self.entries.lock() {
            Ok(mut g) => g.push(entry.clone()),
            Err(e) => e.into_inner().push(entry.clone()),
        }
        if let Some(w) = &self.writer {
            w.send(entry.clone());
        }
        let _ = self.sender.send(entry.clone());
        entry
    }

    /// Cloned snapshot of all entries for replay/inspection.
    pub fn entries(&self) -> Vec<ActionEntry> {
        match self.entries.lock() {
            Ok(g) => g.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }
}
