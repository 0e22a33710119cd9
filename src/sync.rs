//! Debounced write-through persistence of board layouts.
//!
//! Layout carries no correctness-critical data, so writes are optimistic:
//! the local state stays authoritative, a failed write is logged and
//! dropped, and the next successful write (or a restart's re-fetch)
//! reconciles.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::{BlockType, PlacedBlock, Placement};
use crate::constants::SYNC_DEBOUNCE;

/// Serialized form of one placed block.
///
/// `position: None` marks a block saved before its first arrangement pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: Uuid,
    pub kind: BlockType,
    #[serde(default)]
    pub position: Option<[u16; 2]>,
    pub size: [u16; 2],
}

impl BlockRecord {
    pub fn from_block(block: &PlacedBlock) -> Self {
        Self {
            id: block.id,
            kind: block.kind,
            position: block.placement.explicit().map(|(x, y)| [x, y]),
            size: [block.w, block.h],
        }
    }

    pub fn into_block(self) -> PlacedBlock {
        PlacedBlock {
            id: self.id,
            kind: self.kind,
            placement: match self.position {
                Some([x, y]) => Placement::Explicit { x, y },
                None => Placement::AppendBelow,
            },
            w: self.size[0],
            h: self.size[1],
        }
    }
}

/// Storage for whole-board snapshots. There is no partial update: `replace`
/// always carries the full arrangement.
pub trait LayoutApi {
    /// Full snapshot for a board, or `None` if the board was never saved.
    fn fetch(&mut self, board_id: &str) -> Result<Option<Vec<BlockRecord>>, String>;

    /// Replaces the board's stored snapshot.
    fn replace(&mut self, board_id: &str, records: &[BlockRecord]) -> Result<(), String>;
}

#[derive(Serialize, Deserialize)]
struct BoardDocument {
    blocks: Vec<BlockRecord>,
}

/// One pretty-printed JSON document per board under the data directory.
pub struct FileBoardApi {
    boards_dir: PathBuf,
}

impl FileBoardApi {
    pub fn new(boards_dir: PathBuf) -> Self {
        Self { boards_dir }
    }

    fn board_path(&self, board_id: &str) -> PathBuf {
        self.boards_dir.join(format!("{board_id}.json"))
    }
}

impl LayoutApi for FileBoardApi {
    fn fetch(&mut self, board_id: &str) -> Result<Option<Vec<BlockRecord>>, String> {
        let path = self.board_path(board_id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&path).map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
        let document: BoardDocument = serde_json::from_slice(&bytes)
            .map_err(|err| format!("Failed to parse {}: {err}", path.display()))?;
        Ok(Some(document.blocks))
    }

    fn replace(&mut self, board_id: &str, records: &[BlockRecord]) -> Result<(), String> {
        fs::create_dir_all(&self.boards_dir).map_err(|err| {
            format!("Failed to create {}: {err}", self.boards_dir.display())
        })?;
        let path = self.board_path(board_id);
        let file = fs::File::create(&path)
            .map_err(|err| format!("Failed to create {}: {err}", path.display()))?;
        let document = BoardDocument {
            blocks: records.to_vec(),
        };
        serde_json::to_writer_pretty(file, &document)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))
    }
}

struct PendingWrite {
    due: Instant,
    records: Vec<BlockRecord>,
}

/// Debounced writer for one board.
///
/// At most one write is ever pending. Scheduling restarts the quiet window
/// and replaces the pending snapshot wholesale, so the write that eventually
/// fires carries the latest state. The deadline is plain owned data rather
/// than a background timer; dropping the sync drops any pending write with
/// it, so nothing can fire after teardown.
pub struct PersistenceSync {
    api: Box<dyn LayoutApi>,
    board_id: String,
    pending: Option<PendingWrite>,
}

impl PersistenceSync {
    pub fn new(api: Box<dyn LayoutApi>, board_id: impl Into<String>) -> Self {
        Self {
            api,
            board_id: board_id.into(),
            pending: None,
        }
    }

    /// Loads the board's stored snapshot for initial hydration.
    pub fn fetch_initial(&mut self) -> Result<Option<Vec<PlacedBlock>>, String> {
        let records = self.api.fetch(&self.board_id)?;
        Ok(records.map(|records| records.into_iter().map(BlockRecord::into_block).collect()))
    }

    /// Arms a write of `snapshot` due one debounce window from `now`,
    /// discarding any write already pending.
    pub fn schedule(&mut self, snapshot: &[PlacedBlock], now: Instant) {
        self.pending = Some(PendingWrite {
            due: now + SYNC_DEBOUNCE,
            records: snapshot.iter().map(BlockRecord::from_block).collect(),
        });
    }

    /// Fires the pending write once its deadline has passed.
    ///
    /// Returns the remaining wait while a write is still pending, so the
    /// caller can schedule its next wakeup; returns `None` once idle. A
    /// failed write is logged and dropped, leaving local state authoritative.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return Some(due - now);
        }
        let write = self.pending.take()?;
        if let Err(err) = self.api.replace(&self.board_id, &write.records) {
            log::warn!(
                "layout write for board '{}' failed, keeping local state: {err}",
                self.board_id
            );
        }
        None
    }

    /// Discards any pending write without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type WriteLog = Rc<RefCell<Vec<Vec<BlockRecord>>>>;

    struct RecordingApi {
        writes: WriteLog,
        fail: bool,
    }

    impl LayoutApi for RecordingApi {
        fn fetch(&mut self, _board_id: &str) -> Result<Option<Vec<BlockRecord>>, String> {
            Ok(None)
        }

        fn replace(&mut self, _board_id: &str, records: &[BlockRecord]) -> Result<(), String> {
            if self.fail {
                return Err("backend unavailable".to_string());
            }
            self.writes.borrow_mut().push(records.to_vec());
            Ok(())
        }
    }

    fn recording_sync(fail: bool) -> (PersistenceSync, WriteLog) {
        let writes: WriteLog = Rc::new(RefCell::new(Vec::new()));
        let api = RecordingApi {
            writes: Rc::clone(&writes),
            fail,
        };
        (PersistenceSync::new(Box::new(api), "test-board"), writes)
    }

    fn snapshot_of(n: usize) -> Vec<PlacedBlock> {
        (0..n)
            .map(|i| PlacedBlock {
                id: Uuid::new_v4(),
                kind: BlockType::Notes,
                placement: Placement::Explicit {
                    x: 0,
                    y: i as u16 * 2,
                },
                w: 3,
                h: 2,
            })
            .collect()
    }

    #[test]
    fn burst_of_schedules_coalesces_into_one_write() {
        let (mut sync, writes) = recording_sync(false);
        let base = Instant::now();

        sync.schedule(&snapshot_of(1), base);
        sync.schedule(&snapshot_of(2), base + Duration::from_millis(100));
        let last = snapshot_of(3);
        sync.schedule(&last, base + Duration::from_millis(400));

        // Quiet window restarted at 400 ms, so nothing fires at 800 ms.
        assert!(sync.poll(base + Duration::from_millis(800)).is_some());
        assert!(writes.borrow().is_empty());

        assert!(sync.poll(base + Duration::from_millis(900)).is_none());
        let fired = writes.borrow();
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fired[0],
            last.iter().map(BlockRecord::from_block).collect::<Vec<_>>(),
            "the write must carry the last-scheduled snapshot"
        );
    }

    #[test]
    fn a_second_quiet_window_yields_a_second_write() {
        let (mut sync, writes) = recording_sync(false);
        let base = Instant::now();

        sync.schedule(&snapshot_of(1), base);
        sync.schedule(&snapshot_of(2), base + Duration::from_millis(200));
        sync.poll(base + Duration::from_millis(800));

        sync.schedule(&snapshot_of(3), base + Duration::from_millis(900));
        sync.poll(base + Duration::from_millis(1500));

        assert_eq!(writes.borrow().len(), 2);
    }

    #[test]
    fn poll_before_the_deadline_reports_the_remaining_wait() {
        let (mut sync, writes) = recording_sync(false);
        let base = Instant::now();

        sync.schedule(&snapshot_of(1), base);
        let wait = sync
            .poll(base + Duration::from_millis(200))
            .expect("write still pending");
        assert_eq!(wait, Duration::from_millis(300));
        assert!(writes.borrow().is_empty());
        assert!(sync.has_pending());
    }

    #[test]
    fn idle_poll_does_nothing() {
        let (mut sync, writes) = recording_sync(false);
        assert!(sync.poll(Instant::now()).is_none());
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn cancel_discards_the_pending_write() {
        let (mut sync, writes) = recording_sync(false);
        let base = Instant::now();

        sync.schedule(&snapshot_of(1), base);
        sync.cancel();

        assert!(!sync.has_pending());
        assert!(sync.poll(base + Duration::from_secs(10)).is_none());
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn a_failed_write_is_dropped_not_retried() {
        let (mut sync, writes) = recording_sync(true);
        let base = Instant::now();

        sync.schedule(&snapshot_of(1), base);
        assert!(sync.poll(base + Duration::from_secs(1)).is_none());

        assert!(!sync.has_pending(), "no retry may be queued");
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn records_round_trip_both_placement_states() {
        let placed = PlacedBlock {
            id: Uuid::new_v4(),
            kind: BlockType::Calendar,
            placement: Placement::Explicit { x: 3, y: 5 },
            w: 4,
            h: 4,
        };
        let pending = PlacedBlock::new(BlockType::Notes, 3, 2);

        for block in [&placed, &pending] {
            let json = serde_json::to_string(&BlockRecord::from_block(block)).unwrap();
            let back: BlockRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(&back.into_block(), block);
        }
    }

    #[test]
    fn file_api_round_trips_a_board() {
        let dir = std::env::temp_dir().join(format!("gridboard-test-{}", Uuid::new_v4()));
        let mut api = FileBoardApi::new(dir.clone());

        assert_eq!(api.fetch("main"), Ok(None));

        let records: Vec<BlockRecord> =
            snapshot_of(3).iter().map(BlockRecord::from_block).collect();
        api.replace("main", &records).unwrap();
        assert_eq!(api.fetch("main"), Ok(Some(records)));

        let _ = fs::remove_dir_all(dir);
    }
}
