use cliptimer::clipboard::MemoryChannel;
use cliptimer::domain::{format_hms, ActionLabel, Task, TaskId};
use cliptimer::engine::{History, HistoryEntry, ManualClock, SharedHistory, TaskStore};
use cliptimer::persistence::{decode_tasks, MemoryStore};
use cliptimer::text::parse_line;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

/// History collaborator that only records what it is told
#[derive(Clone, Default)]
struct RecordingHistory {
    entries: Rc<RefCell<Vec<HistoryEntry>>>,
}

impl RecordingHistory {
    fn labels(&self) -> Vec<ActionLabel> {
        self.entries.borrow().iter().map(|e| e.label).collect()
    }

    fn last(&self) -> Option<HistoryEntry> {
        self.entries.borrow().last().cloned()
    }
}

impl History for RecordingHistory {
    fn record(&mut self, entry: HistoryEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

struct Harness {
    store: TaskStore,
    clock: ManualClock,
    history: RecordingHistory,
    saved: MemoryStore,
}

impl Harness {
    fn new() -> Self {
        Self::with_saved(MemoryStore::new())
    }

    fn with_saved(saved: MemoryStore) -> Self {
        let clock = ManualClock::default();
        let history = RecordingHistory::default();
        let store = TaskStore::open(
            Box::new(clock.clone()),
            Box::new(history.clone()),
            Box::new(saved.clone()),
        );
        Self {
            store,
            clock,
            history,
            saved,
        }
    }

    fn id(&self, name: &str) -> TaskId {
        self.store
            .find_by_name(name)
            .map(|t| t.id)
            .unwrap_or_else(|| panic!("no task named {name}"))
    }

    fn live(&self, name: &str) -> f64 {
        let task = self.store.find_by_name(name).unwrap().clone();
        self.store.current_elapsed(&task)
    }

    fn saved_tasks(&self) -> Vec<Task> {
        decode_tasks(&self.saved.content().unwrap_or_default()).unwrap()
    }

    fn assert_completed_last(&self) {
        let tasks = self.store.tasks();
        let first_completed = tasks.iter().position(|t| t.is_completed);
        let last_incomplete = tasks.iter().rposition(|t| !t.is_completed);
        if let (Some(done), Some(open)) = (first_completed, last_incomplete) {
            assert!(done > open, "completed task before an open one: {tasks:?}");
        }
    }
}

#[test]
fn add_on_empty_list_adopts_symbol() {
    let mut h = Harness::new();
    h.store.add_tasks("• Write Report\n• Review Code: 1:05");

    let got: Vec<(&str, f64)> = h
        .store
        .tasks()
        .iter()
        .map(|t| (t.name.as_str(), t.elapsed))
        .collect();
    assert_eq!(got, vec![("Write Report", 0.0), ("Review Code", 65.0)]);
    assert_eq!(h.store.item_symbol(), "• ");
    assert_eq!(h.history.labels(), vec![ActionLabel::AddTasks]);
}

#[test]
fn pause_folds_live_interval() {
    let mut h = Harness::new();
    h.store.add_tasks("X: 1:40");
    let x = h.id("X");
    h.store.toggle(x);

    h.clock.advance(30.0);
    assert_eq!(h.live("X"), 130.0);

    h.store.pause_active();
    assert_eq!(h.store.task(x).unwrap().elapsed, 130.0);
    assert_eq!(h.store.active_task_id(), None);
    assert_eq!(h.live("X"), 130.0);
}

#[test]
fn add_over_running_task_overwrites_exactly() {
    let mut h = Harness::new();
    h.store.add_tasks("X: 10");
    let x = h.id("X");
    h.store.toggle(x);
    h.clock.advance(40.0);

    h.store.add_tasks("X: 5:00");

    assert_eq!(h.store.task(x).unwrap().elapsed, 300.0);
    h.clock.advance(40.0);
    assert_eq!(h.live("X"), 300.0);

    let entry = h.history.last().unwrap();
    assert_eq!(entry.before[0].elapsed, 50.0);
    assert_eq!(entry.after[0].elapsed, 300.0);
}

#[test]
fn parse_lines_from_scenarios() {
    let parsed = parse_line("Task with time: 1:30:45").unwrap();
    assert_eq!(parsed.name, "Task with time");
    assert_eq!(parsed.elapsed, 5445.0);
    assert!(!parsed.is_completed);

    let parsed = parse_line("~~Done~~: 0:30").unwrap();
    assert_eq!(parsed.name, "Done");
    assert_eq!(parsed.elapsed, 30.0);
    assert!(parsed.is_completed);
}

#[test]
fn cut_all_hands_summary_to_channel() {
    let mut h = Harness::new();
    h.store.replace_tasks("- Alpha: 10:00\n- ~~Beta~~: 1:00:00");
    let mut channel = MemoryChannel::default();

    assert!(h.store.cut_all(&mut channel).unwrap());

    assert!(h.store.tasks().is_empty());
    assert_eq!(h.store.item_symbol(), "");
    assert_eq!(
        channel.text.as_deref(),
        Some("- Alpha: 0:10:00\n- ~~Beta~~: 1:00:00\n\nWorking time: 1:10:00")
    );
    let entry = h.history.last().unwrap();
    assert_eq!(entry.label, ActionLabel::CutAllTasks);
    assert_eq!(entry.before.len(), 2);
    assert!(entry.after.is_empty());
    assert!(h.saved_tasks().is_empty());
}

#[test]
fn symbol_precedence() {
    let mut h = Harness::new();
    h.store.replace_tasks("→ One\n→ Two");
    h.store.add_tasks("Three");
    assert_eq!(h.store.item_symbol(), "→ ");

    h.store.replace_tasks("One\nTwo");
    assert_eq!(h.store.item_symbol(), "");

    // an empty symbol is open to adoption again
    h.store.add_tasks("✓ Four");
    assert_eq!(h.store.item_symbol(), "✓ ");
}

#[test]
fn second_identical_replace_keeps_ids() {
    let mut h = Harness::new();
    let text = "• A: 5\n• B: 1:00\n• ~~C~~: 2:00";
    h.store.replace_tasks(text);
    let first: Vec<Task> = h.store.tasks().to_vec();

    h.store.replace_tasks(text);
    assert_eq!(h.store.tasks(), first.as_slice());
}

#[test]
fn only_one_task_runs_at_a_time() {
    let mut h = Harness::new();
    h.store.replace_tasks("A\nB\nC\n~~D~~");
    let ids: Vec<TaskId> = h.store.tasks().iter().map(|t| t.id).collect();

    for step in [0, 1, 1, 2, 3, 0, 2, 2, 1] {
        h.store.toggle(ids[step]);
        h.clock.advance(1.5);
        let running = ids.iter().filter(|id| h.store.is_active(**id)).count();
        assert!(running <= 1);
    }
    assert!(!h.store.is_active(ids[3]));
}

#[test]
fn repeated_names_never_share_an_id() {
    let mut h = Harness::new();
    h.store.replace_tasks("A");
    h.store.replace_tasks("A\nA");

    let ids: Vec<TaskId> = h.store.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    h.store.toggle(ids[0]);
    let running = ids.iter().filter(|id| h.store.is_active(**id)).count();
    assert_eq!(running, 1);

    h.store.delete_task(ids[1]);
    assert_eq!(h.store.tasks().len(), 1);
    assert!(h.store.is_active(ids[0]));
}

#[test]
fn undo_of_unrelated_change_keeps_running_time() {
    let clock = ManualClock::default();
    let mut store = TaskStore::new(
        Box::new(clock.clone()),
        Box::new(SharedHistory::default()),
        Box::new(MemoryStore::new()),
    );
    store.replace_tasks("A");
    let a = store.find_by_name("A").map(|t| t.id).unwrap();
    store.toggle(a);
    clock.advance(10.0);
    store.add_tasks("B");
    clock.advance(90.0);

    assert_eq!(store.undo(), Some(ActionLabel::AddTasks));
    assert_eq!(store.tasks().len(), 1);
    let task = store.task(a).unwrap().clone();
    assert_eq!(store.current_elapsed(&task), 100.0);
}

#[test]
fn total_time_is_conserved_across_switches() {
    let mut h = Harness::new();
    h.store.replace_tasks("A\nB");
    let a = h.id("A");
    let b = h.id("B");

    h.store.toggle(a);
    h.clock.advance(10.0);
    h.store.toggle(b);
    h.clock.advance(20.0);
    h.store.toggle(a);
    h.clock.advance(5.0);
    h.store.pause_active();

    assert_eq!(h.store.task(a).unwrap().elapsed, 15.0);
    assert_eq!(h.store.task(b).unwrap().elapsed, 20.0);
    assert_eq!(h.store.total_elapsed(), 35.0);
    assert_eq!(h.store.last_paused_task_id(), Some(a));
}

#[test]
fn restart_last_paused_resumes_toggled_task() {
    let mut h = Harness::new();
    h.store.replace_tasks("A");
    let a = h.id("A");
    h.store.toggle(a);
    h.store.toggle(a);

    h.store.restart_last_paused();
    assert!(h.store.is_active(a));
    assert_eq!(h.store.last_paused_task_id(), None);
}

#[test]
fn deleted_task_is_not_restarted() {
    let mut h = Harness::new();
    h.store.replace_tasks("A\nB");
    let a = h.id("A");
    h.store.toggle(a);
    h.store.pause_active();
    h.store.delete_task(a);

    h.store.restart_last_paused();
    assert!(!h.store.has_active_task());
    assert_eq!(h.store.last_paused_task_id(), None);
}

#[test]
fn completed_tasks_stay_last() {
    let mut h = Harness::new();
    h.store.replace_tasks("~~Old~~: 30\nA\nB");
    h.assert_completed_last();

    h.store.add_tasks("C\n~~Older~~");
    h.assert_completed_last();

    let b = h.id("B");
    h.store.finish_task(b);
    h.assert_completed_last();
    let names: Vec<&str> = h.store.tasks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "Old", "Older", "B"]);
}

#[test]
fn every_mutation_is_recorded_with_its_label() {
    let mut h = Harness::new();
    h.store.replace_tasks("A\nB\nC");
    h.store.add_tasks("D");
    let a = h.id("A");
    h.store.finish_task(a);
    h.store.restart_task(a);
    let b = h.id("B");
    h.store.delete_task(b);
    h.store.cut_all(&mut MemoryChannel::default()).unwrap();

    let labels: Vec<&str> = h.history.labels().iter().map(|l| l.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Replace tasks",
            "Add tasks",
            "Finish task",
            "Restart task",
            "Delete task",
            "Cut all tasks"
        ]
    );
}

#[test]
fn history_without_undo_support_makes_undo_a_noop() {
    let mut h = Harness::new();
    h.store.replace_tasks("A");
    assert_eq!(h.store.undo(), None);
    assert_eq!(h.store.tasks().len(), 1);
}

#[test]
fn editor_round_trip_keeps_the_timer() {
    let mut h = Harness::new();
    h.store.replace_tasks("• Write: 1:00\n• Review");
    let write = h.id("Write");
    h.store.toggle(write);
    h.clock.advance(30.0);

    let text = h.store.begin_edit();
    assert_eq!(text, "Write: 0:01:30\nReview: 0:00:00");

    h.clock.advance(120.0);
    h.store.end_edit(&format!("{text}\nDeploy: 5"));

    assert!(h.store.is_active(write));
    assert_eq!(h.store.task(write).unwrap().elapsed, 90.0);
    assert_eq!(h.store.tasks().len(), 3);
    assert_eq!(h.store.item_symbol(), "• ");
}

#[test]
fn corrupt_saved_data_starts_empty_and_recovers() {
    let mut h = Harness::with_saved(MemoryStore::with_content("[{\"id\": 5"));
    assert!(h.store.tasks().is_empty());

    h.store.add_tasks("Fresh: 1:00");
    assert_eq!(h.saved_tasks().len(), 1);
    assert_eq!(h.saved_tasks()[0].name, "Fresh");
}

#[test]
fn saved_tasks_reload_with_same_ids() {
    let saved = MemoryStore::new();
    let mut first = Harness::with_saved(saved.clone());
    first.store.replace_tasks("A: 1:00\n~~B~~: 30");
    let before = first.store.tasks().to_vec();

    let second = Harness::with_saved(saved);
    assert_eq!(second.store.tasks(), before.as_slice());
}

#[test]
fn formatted_durations_parse_back() {
    for seconds in [0u32, 1, 59, 60, 3599, 3600, 5445, 86_399, 359_999] {
        let line = format!("Task: {}", format_hms(f64::from(seconds)));
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.elapsed, f64::from(seconds), "{line}");
    }
}
