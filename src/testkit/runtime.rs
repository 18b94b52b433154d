//! In-memory [`ContainerRuntime`] for lifecycle tests.
//!
//! Networks and containers live in a `RefCell`; every call is logged as a
//! [`Call`]. Behaviour mirrors the docker CLI where it matters to the
//! orchestrator:
//!
//! - running a container on a missing network fails
//! - a duplicate container name is a [`RunOutcome::NameConflict`]
//! - removing a running container fails
//! - removing a network with attached containers fails

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::domain::membership::{ClusterMembership, Member};
use crate::domain::service::ServiceDescriptor;
use crate::error::{Result, SubprocessError};
use crate::port::{ContainerRuntime, ExecOutput, ExecRequest, NetworkCreation, RunOutcome};

/// A runtime call as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateNetwork(String),
    InspectNetwork(String),
    RemoveNetwork(String),
    RunContainer(String),
    StopContainer(String),
    RemoveContainer(String),
    Exec {
        container: String,
        command: Vec<String>,
        detach: bool,
    },
}

impl Call {
    fn is_mutating(&self) -> bool {
        !matches!(self, Call::InspectNetwork(_))
    }
}

#[derive(Debug, Clone)]
struct FakeContainer {
    id: String,
    name: String,
    network: String,
    running: bool,
    descriptor: Option<ServiceDescriptor>,
}

#[derive(Debug, Clone)]
struct ExecFailure {
    pattern: String,
    /// `None` fails forever.
    remaining: Option<u32>,
}

type ExecObserver = Box<dyn FnMut(&str, &ExecRequest)>;

#[derive(Default)]
struct State {
    networks: BTreeSet<String>,
    containers: Vec<FakeContainer>,
    calls: Vec<Call>,
    exec_requests: Vec<(String, ExecRequest)>,
    exec_failures: Vec<ExecFailure>,
    stop_failures: BTreeSet<String>,
    next_id: u64,
}

/// Scripted in-memory container runtime.
#[derive(Default)]
pub struct FakeRuntime {
    state: RefCell<State>,
    observer: RefCell<Option<ExecObserver>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Create a network without logging a call.
    pub fn add_network(&self, name: &str) {
        self.state.borrow_mut().networks.insert(name.to_string());
    }

    /// Attach a running container that the orchestrator did not start.
    ///
    /// Returns its id.
    pub fn attach_out_of_band(&self, network: &str, name: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.networks.insert(network.to_string());
        let id = next_id(&mut state);
        state.containers.push(FakeContainer {
            id: id.clone(),
            name: name.to_string(),
            network: network.to_string(),
            running: true,
            descriptor: None,
        });
        id
    }

    /// Fail the next `times` execs whose command mentions `pattern`.
    pub fn fail_exec_times(&self, pattern: &str, times: u32) {
        self.state.borrow_mut().exec_failures.push(ExecFailure {
            pattern: pattern.to_string(),
            remaining: Some(times),
        });
    }

    /// Fail every exec whose command mentions `pattern`.
    pub fn fail_exec_always(&self, pattern: &str) {
        self.state.borrow_mut().exec_failures.push(ExecFailure {
            pattern: pattern.to_string(),
            remaining: None,
        });
    }

    /// Make stopping the container named `name` fail.
    pub fn fail_stop(&self, name: &str) {
        self.state.borrow_mut().stop_failures.insert(name.to_string());
    }

    /// Run `observer` at the start of every exec, before any scripted
    /// failure is applied.
    pub fn observe_exec(&self, observer: impl FnMut(&str, &ExecRequest) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Calls other than inspections.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_mutating())
            .cloned()
            .collect()
    }

    pub fn network_names(&self) -> Vec<String> {
        self.state.borrow().networks.iter().cloned().collect()
    }

    /// Existing containers in creation order.
    pub fn container_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .containers
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.state
            .borrow()
            .containers
            .iter()
            .any(|c| c.name == name && c.running)
    }

    /// Descriptor a container was started from, if the orchestrator
    /// started it.
    pub fn descriptor(&self, name: &str) -> Option<ServiceDescriptor> {
        self.state
            .borrow()
            .containers
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.descriptor.clone())
    }

    /// Number of run attempts, including rejected ones.
    pub fn run_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::RunContainer(_)))
            .count()
    }

    /// Every exec as `(container, request)`, in order.
    pub fn exec_requests(&self) -> Vec<(String, ExecRequest)> {
        self.state.borrow().exec_requests.clone()
    }

    /// Number of execs whose command mentions `pattern`.
    pub fn exec_count_matching(&self, pattern: &str) -> usize {
        self.state
            .borrow()
            .exec_requests
            .iter()
            .filter(|(_, request)| mentions(request, pattern))
            .count()
    }

    fn log(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn next_id(state: &mut State) -> String {
    state.next_id += 1;
    format!("{:012x}", state.next_id)
}

fn mentions(request: &ExecRequest, pattern: &str) -> bool {
    request.command.iter().any(|arg| arg.contains(pattern))
}

fn failed(command: String, stderr: &str) -> crate::error::Error {
    SubprocessError::Failed {
        command,
        status: "exit status: 1".to_string(),
        stderr: stderr.to_string(),
    }
    .into()
}

fn find<'s>(containers: &'s mut [FakeContainer], key: &str) -> Option<&'s mut FakeContainer> {
    containers.iter_mut().find(|c| c.id == key || c.name == key)
}

impl ContainerRuntime for FakeRuntime {
    fn create_network(&self, name: &str) -> Result<NetworkCreation> {
        self.log(Call::CreateNetwork(name.to_string()));
        let mut state = self.state.borrow_mut();
        if state.networks.insert(name.to_string()) {
            Ok(NetworkCreation::Created)
        } else {
            Ok(NetworkCreation::AlreadyExists)
        }
    }

    fn inspect_network(&self, name: &str) -> Result<Option<ClusterMembership>> {
        self.log(Call::InspectNetwork(name.to_string()));
        let state = self.state.borrow();
        if !state.networks.contains(name) {
            return Ok(None);
        }
        let members = state
            .containers
            .iter()
            .filter(|c| c.network == name)
            .map(|c| Member::new(c.id.clone(), c.name.clone()))
            .collect();
        Ok(Some(ClusterMembership::new(members)))
    }

    fn remove_network(&self, name: &str) -> Result<()> {
        self.log(Call::RemoveNetwork(name.to_string()));
        let mut state = self.state.borrow_mut();
        let command = format!("docker network rm {name}");
        if state.containers.iter().any(|c| c.network == name) {
            return Err(failed(command, "network has active endpoints"));
        }
        if !state.networks.remove(name) {
            return Err(failed(command, "network not found"));
        }
        Ok(())
    }

    fn run_container(&self, service: &ServiceDescriptor) -> Result<RunOutcome> {
        self.log(Call::RunContainer(service.name.clone()));
        let mut state = self.state.borrow_mut();
        if !state.networks.contains(&service.network) {
            return Err(failed(
                format!("docker run --name {}", service.name),
                "network not found",
            ));
        }
        if state.containers.iter().any(|c| c.name == service.name) {
            return Ok(RunOutcome::NameConflict);
        }
        let id = next_id(&mut state);
        state.containers.push(FakeContainer {
            id: id.clone(),
            name: service.name.clone(),
            network: service.network.clone(),
            running: true,
            descriptor: Some(service.clone()),
        });
        Ok(RunOutcome::Started(id))
    }

    fn stop_container(&self, container: &str) -> Result<()> {
        self.log(Call::StopContainer(container.to_string()));
        let mut state = self.state.borrow_mut();
        let State {
            containers,
            stop_failures,
            ..
        } = &mut *state;
        let command = format!("docker stop {container}");
        match find(containers, container) {
            Some(c) if stop_failures.contains(&c.name) => Err(failed(command, "stop timed out")),
            Some(c) => {
                c.running = false;
                Ok(())
            }
            None => Err(failed(command, "no such container")),
        }
    }

    fn remove_container(&self, container: &str) -> Result<()> {
        self.log(Call::RemoveContainer(container.to_string()));
        let mut state = self.state.borrow_mut();
        let command = format!("docker rm {container}");
        let running = find(&mut state.containers, container).map(|c| c.running);
        match running {
            Some(true) => Err(failed(command, "container is running")),
            Some(false) => {
                state
                    .containers
                    .retain(|c| c.id != container && c.name != container);
                Ok(())
            }
            None => Err(failed(command, "no such container")),
        }
    }

    fn exec(&self, container: &str, request: &ExecRequest) -> Result<ExecOutput> {
        self.log(Call::Exec {
            container: container.to_string(),
            command: request.command.clone(),
            detach: request.detach,
        });
        self.state
            .borrow_mut()
            .exec_requests
            .push((container.to_string(), request.clone()));
        if let Some(observer) = self.observer.borrow_mut().as_mut() {
            observer(container, request);
        }

        let mut state = self.state.borrow_mut();
        let command = format!("docker exec {container} {}", request.display());
        if find(&mut state.containers, container).map_or(true, |c| !c.running) {
            return Err(failed(command, "container is not running"));
        }

        for failure in &mut state.exec_failures {
            if !mentions(request, &failure.pattern) {
                continue;
            }
            match &mut failure.remaining {
                None => return Err(failed(command, "scripted failure")),
                Some(0) => {}
                Some(n) => {
                    *n -= 1;
                    return Err(failed(command, "scripted failure"));
                }
            }
        }
        Ok(ExecOutput::default())
    }
}
