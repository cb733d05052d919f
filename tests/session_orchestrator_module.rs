use envprompt::channel::{Channel, ChannelError, MemoryChannel, Snapshot};
use envprompt::prompt::{
    parse_scripted_keys, FieldKind, FieldSpec, FieldValue, InputEvent, RenderOptions,
};
use envprompt::session::{
    ScriptedTerminal, Session, SessionError, SessionOptions, SessionOutcome, SessionReport,
};
use envprompt::shared::logging::SessionLog;
use std::collections::BTreeMap;
use std::fs;

fn plain_options() -> SessionOptions {
    SessionOptions {
        render: RenderOptions::plain(),
        log: SessionLog::disabled(),
    }
}

fn script(raw: &str) -> Vec<InputEvent> {
    parse_scripted_keys(raw).expect("parse script")
}

fn committed(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn strings(keys: &[&str]) -> Vec<FieldSpec> {
    keys.iter()
        .map(|key| FieldSpec::new(*key, FieldKind::String))
        .collect()
}

#[test]
fn session_orchestrator_module_accepts_default_then_typed_boolean() {
    let fields = vec![
        FieldSpec::new("PORT", FieldKind::Number).with_default(FieldValue::Number(3000.0)),
        FieldSpec::new("DEBUG", FieldKind::Boolean).with_default(FieldValue::Boolean(false)),
    ];
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("enter,text=true,enter"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    let expected = committed(&[("PORT", "3000"), ("DEBUG", "true")]);
    assert_eq!(
        outcome,
        SessionOutcome::Completed(SessionReport {
            committed: expected.clone(),
            skipped: Vec::new(),
        })
    );
    assert_eq!(store.values(), &expected);
    assert_eq!(store.writes().len(), 2);
    assert_eq!(terminal.screen(), ["✔ PORT = 3000", "✔ DEBUG = true"]);
    assert_eq!(terminal.remaining_events(), 0);
}

#[test]
fn session_orchestrator_module_keeping_a_stored_number_writes_it_back_verbatim() {
    let fields = vec![FieldSpec::new("ID", FieldKind::Number)];
    let stored = committed(&[("ID", "9007199254740993")]);
    let mut store = MemoryChannel::new(stored.clone());
    let mut terminal = ScriptedTerminal::new(script("enter"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(
        outcome,
        SessionOutcome::Completed(SessionReport {
            committed: stored.clone(),
            skipped: Vec::new(),
        })
    );
    assert_eq!(store.values(), &stored);
    assert_eq!(terminal.screen(), ["✔ ID = 9007199254740993"]);
}

#[test]
fn session_orchestrator_module_previous_erases_both_fields() {
    let fields = strings(&["A", "B", "C"]);
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal =
        ScriptedTerminal::new(script("text=a,enter,text=b,enter,tab,right,enter,ctrl-c"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(session.state().index, 1);
    assert_eq!(session.state().history, vec![1]);
    let erasures = terminal.erasures();
    let c_frame_lines = 3;
    let b_summary_lines = 1;
    assert_eq!(
        erasures[erasures.len() - 2],
        c_frame_lines + b_summary_lines
    );
    assert_eq!(terminal.screen(), ["✔ A = a", "✖ B cancelled"]);
    assert_eq!(
        outcome,
        SessionOutcome::Cancelled(SessionReport {
            committed: committed(&[("A", "a"), ("B", "b")]),
            skipped: Vec::new(),
        })
    );
}

#[test]
fn session_orchestrator_module_revisited_field_starts_from_committed_value() {
    let fields = strings(&["A", "B"]);
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("text=one,enter,tab,right,enter,enter,text=two,enter"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(
        outcome,
        SessionOutcome::Completed(SessionReport {
            committed: committed(&[("A", "one"), ("B", "two")]),
            skipped: Vec::new(),
        })
    );
    assert_eq!(store.writes().len(), 3);
    assert_eq!(terminal.screen(), ["✔ A = one", "✔ B = two"]);
}

#[test]
fn session_orchestrator_module_skip_leaves_store_untouched() {
    let fields = strings(&["A", "B"]);
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("tab,enter,text=b,enter"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(
        outcome,
        SessionOutcome::Completed(SessionReport {
            committed: committed(&[("B", "b")]),
            skipped: vec!["A".to_string()],
        })
    );
    assert_eq!(store.values().get("A"), None);
    assert_eq!(terminal.screen(), ["↷ A skipped", "✔ B = b"]);
}

#[test]
fn session_orchestrator_module_interrupt_cancels_immediately() {
    let fields = strings(&["A", "B"]);
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("ctrl-c"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(outcome, SessionOutcome::Cancelled(SessionReport::default()));
    assert!(store.writes().is_empty());
    assert_eq!(terminal.screen(), ["✖ A cancelled"]);
}

#[test]
fn session_orchestrator_module_reports_exhausted_scripts() {
    let fields = strings(&["A"]);
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("text=abc"));
    let mut session = Session::new(&fields, plain_options());

    let err = session
        .run(&mut store, &mut terminal)
        .expect_err("script ends early");
    assert!(matches!(err, SessionError::ScriptExhausted));
}

struct ReadOnlyChannel;

impl Channel for ReadOnlyChannel {
    fn get(&self) -> Result<Snapshot, ChannelError> {
        Ok(Snapshot::new())
    }

    fn set(&mut self, _values: &Snapshot) -> Result<(), ChannelError> {
        Err(ChannelError::Rejected("store is read-only".to_string()))
    }

    fn describe(&self) -> String {
        "read-only".to_string()
    }
}

#[test]
fn session_orchestrator_module_write_failure_aborts_the_session() {
    let fields = strings(&["A", "B"]);
    let mut terminal = ScriptedTerminal::new(script("text=a,enter,text=b,enter"));
    let mut session = Session::new(&fields, plain_options());

    let err = session
        .run(&mut ReadOnlyChannel, &mut terminal)
        .expect_err("write fails");

    match err {
        SessionError::StoreWrite { key, store, .. } => {
            assert_eq!(key, "A");
            assert_eq!(store, "read-only");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(session.state().committed.is_empty());
    assert_eq!(session.state().index, 0);
}

/// Stores every value upper-cased, like a backend that normalizes on write.
struct UppercasingChannel {
    inner: MemoryChannel,
}

impl Channel for UppercasingChannel {
    fn get(&self) -> Result<Snapshot, ChannelError> {
        self.inner.get()
    }

    fn set(&mut self, values: &Snapshot) -> Result<(), ChannelError> {
        let normalized = values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_uppercase()))
            .collect();
        self.inner.set(&normalized)
    }

    fn describe(&self) -> String {
        "uppercasing".to_string()
    }
}

#[test]
fn session_orchestrator_module_keeps_the_value_the_store_normalized() {
    let fields = strings(&["REGION"]);
    let mut store = UppercasingChannel {
        inner: MemoryChannel::new(Snapshot::new()),
    };
    let mut terminal = ScriptedTerminal::new(script("text=eu-west,enter"));
    let mut session = Session::new(&fields, plain_options());

    let outcome = session.run(&mut store, &mut terminal).expect("run session");

    assert_eq!(
        outcome,
        SessionOutcome::Completed(SessionReport {
            committed: committed(&[("REGION", "EU-WEST")]),
            skipped: Vec::new(),
        })
    );
}

#[test]
fn session_orchestrator_module_logs_keys_but_never_values() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log_path = temp.path().join("logs/session.log");
    let fields = vec![FieldSpec::new("API_TOKEN", FieldKind::String).with_secret(true)];
    let mut store = MemoryChannel::new(Snapshot::new());
    let mut terminal = ScriptedTerminal::new(script("text=hunter2,enter"));
    let mut session = Session::new(
        &fields,
        SessionOptions {
            render: RenderOptions::plain(),
            log: SessionLog::to_file(&log_path),
        },
    );

    session.run(&mut store, &mut terminal).expect("run session");

    let raw = fs::read_to_string(&log_path).expect("read log");
    assert!(!raw.contains("hunter2"));
    let events: Vec<String> = raw
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            value["event"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(
        events,
        vec!["session_started", "field_committed", "session_completed"]
    );
    assert_eq!(terminal.screen(), ["✔ API_TOKEN = *******"]);
}
