use gso_workload::{ExecOutput, NetworkAttachment, Workload, WorkloadError, BASE_CONFIG_PATH};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One recorded `exec` call, argv and all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedExec {
    pub command: Vec<String>,
    pub timeout: Duration,
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Default)]
struct State {
    connected: bool,
    dirs: BTreeSet<String>,
    files: BTreeMap<String, String>,
    push_error: Option<WorkloadError>,
    /// Scripted exec results, keyed by argv[0]. Unscripted commands succeed
    /// with empty output.
    exec_results: BTreeMap<String, Result<ExecOutput, WorkloadError>>,
    execs: Vec<RecordedExec>,
    probes: Vec<String>,
}

/// In-memory `Workload` double.
///
/// Records every readiness probe (`can_connect`, `exists`) and every side
/// effect (`push`, `exec`), so ordering and no-side-effect assertions are
/// possible. `Send + Sync` via a mutex so daemon tests can share it.
pub struct FakeWorkload {
    state: Mutex<State>,
}

impl FakeWorkload {
    /// Reachable workload with the config storage attached.
    pub fn ready() -> Self {
        let fake = Self::disconnected();
        fake.set_connected(true);
        fake.add_dir(BASE_CONFIG_PATH);
        fake
    }

    /// Workload that does not accept commands yet.
    pub fn disconnected() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Reachable workload whose storage volume is not attached yet.
    pub fn connected_without_storage() -> Self {
        let fake = Self::disconnected();
        fake.set_connected(true);
        fake
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().unwrap().connected = connected;
    }

    pub fn add_dir(&self, path: &str) {
        self.state.lock().unwrap().dirs.insert(path.to_string());
    }

    pub fn put_file(&self, path: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), content.to_string());
    }

    /// Make the next and all following pushes fail.
    pub fn fail_push(&self, err: WorkloadError) {
        self.state.lock().unwrap().push_error = Some(err);
    }

    /// Script the result of any exec whose argv[0] equals `program`.
    pub fn on_exec(&self, program: &str, result: Result<ExecOutput, WorkloadError>) {
        self.state
            .lock()
            .unwrap()
            .exec_results
            .insert(program.to_string(), result);
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn execs(&self) -> Vec<RecordedExec> {
        self.state.lock().unwrap().execs.clone()
    }

    /// Readiness probes in call order: `can_connect`, `exists:<path>`.
    pub fn probes(&self) -> Vec<String> {
        self.state.lock().unwrap().probes.clone()
    }
}

impl Workload for FakeWorkload {
    fn can_connect(&self) -> bool {
        let mut st = self.state.lock().unwrap();
        st.probes.push("can_connect".to_string());
        st.connected
    }

    fn exists(&self, path: &str) -> bool {
        let mut st = self.state.lock().unwrap();
        st.probes.push(format!("exists:{path}"));
        st.files.contains_key(path) || st.dirs.contains(path)
    }

    fn push(&self, path: &str, content: &str) -> Result<(), WorkloadError> {
        let mut st = self.state.lock().unwrap();
        if let Some(err) = &st.push_error {
            return Err(err.clone());
        }
        st.files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn exec(
        &self,
        command: &[String],
        timeout: Duration,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecOutput, WorkloadError> {
        let mut st = self.state.lock().unwrap();
        st.execs.push(RecordedExec {
            command: command.to_vec(),
            timeout,
            env: env.cloned(),
        });
        match command.first().and_then(|p| st.exec_results.get(p)) {
            Some(result) => result.clone(),
            None => Ok(ExecOutput::default()),
        }
    }
}

/// Fixed-answer attachment probe that counts how often it was consulted.
pub struct StubAttachment {
    ready: bool,
    probes: AtomicUsize,
}

impl StubAttachment {
    pub fn ready() -> Self {
        Self {
            ready: true,
            probes: AtomicUsize::new(0),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            probes: AtomicUsize::new(0),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl NetworkAttachment for StubAttachment {
    fn is_ready(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.ready
    }
}
